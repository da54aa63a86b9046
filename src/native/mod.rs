// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Native object boundary
//!
//! The CAD kernel owns its objects; this crate only sees them through the
//! per-type traits below. Handlers read and write attributes through these
//! interfaces and never construct or destroy native objects themselves.

mod model;

pub use model::{
    Circle, Geometry, InMemoryKernel, Length, LineSegment, NativeObject, NativeProperty,
    NativeValue,
};

use std::fmt;

/// Three-component native vector
pub type Vector = nalgebra::Vector3<f64>;

/// Type identifiers understood by the bundled handlers
pub mod type_tag {
    pub const PROPERTY_LENGTH: &str = "App::PropertyLength";
    pub const PROPERTY_GEOMETRY_LIST: &str = "Part::PropertyGeometryList";
    pub const GEOM_CIRCLE: &str = "Part::GeomCircle";
    pub const GEOM_LINE_SEGMENT: &str = "Part::GeomLineSegment";
}

/// Capability handed in by the caller when native objects may be mutated.
///
/// Reverse conversions of geometry only run when a kernel is attached to the
/// conversion context.
pub trait NativeKernel: Send + Sync + fmt::Debug {
    /// Human readable kernel name, used in logs
    fn name(&self) -> &str;

    /// Build a native vector
    fn vector(&self, x: f64, y: f64, z: f64) -> Vector;
}

/// Scalar quantity exposing `Value`
pub trait Quantity {
    fn value(&self) -> f64;
}

/// Circle exposing `Center`, `Axis`, `Radius` and `AngleXU`
pub trait GeomCircle {
    fn center(&self) -> Vector;
    fn axis(&self) -> Vector;
    fn radius(&self) -> f64;
    fn angle_xu(&self) -> f64;

    fn set_center(&mut self, center: Vector);
    fn set_axis(&mut self, axis: Vector);
    fn set_radius(&mut self, radius: f64);
    fn set_angle_xu(&mut self, angle: f64);
}

/// Line segment exposing `StartPoint` and `EndPoint`
pub trait GeomLineSegment {
    fn start_point(&self) -> Vector;
    fn end_point(&self) -> Vector;

    fn set_start_point(&mut self, point: Vector);
    fn set_end_point(&mut self, point: Vector);
}

/// A native geometry element carrying its runtime type tag.
///
/// The accessors return `None` unless the element implements that interface.
pub trait NativeGeometry {
    fn type_tag(&self) -> &str;

    fn as_circle(&self) -> Option<&dyn GeomCircle> {
        None
    }

    fn as_circle_mut(&mut self) -> Option<&mut dyn GeomCircle> {
        None
    }

    fn as_line_segment(&self) -> Option<&dyn GeomLineSegment> {
        None
    }

    fn as_line_segment_mut(&mut self) -> Option<&mut dyn GeomLineSegment> {
        None
    }
}

impl<G: NativeGeometry + ?Sized> NativeGeometry for Box<G> {
    fn type_tag(&self) -> &str {
        (**self).type_tag()
    }

    fn as_circle(&self) -> Option<&dyn GeomCircle> {
        (**self).as_circle()
    }

    fn as_circle_mut(&mut self) -> Option<&mut dyn GeomCircle> {
        (**self).as_circle_mut()
    }

    fn as_line_segment(&self) -> Option<&dyn GeomLineSegment> {
        (**self).as_line_segment()
    }

    fn as_line_segment_mut(&mut self) -> Option<&mut dyn GeomLineSegment> {
        (**self).as_line_segment_mut()
    }
}

/// Indexed sequence of native geometries
pub trait GeometryList {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn geometry(&self, index: usize) -> Option<&dyn NativeGeometry>;

    fn geometry_mut(&mut self, index: usize) -> Option<&mut dyn NativeGeometry>;
}

impl<G: NativeGeometry> GeometryList for Vec<G> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn geometry(&self, index: usize) -> Option<&dyn NativeGeometry> {
        self.get(index).map(|g| g as &dyn NativeGeometry)
    }

    fn geometry_mut(&mut self, index: usize) -> Option<&mut dyn NativeGeometry> {
        self.get_mut(index).map(|g| g as &mut dyn NativeGeometry)
    }
}

/// Borrowed native property value handed to `fc_to_jcad`
#[derive(Clone, Copy)]
pub enum NativeProp<'a> {
    Quantity(&'a dyn Quantity),
    Geometry(&'a dyn NativeGeometry),
    GeometryList(&'a dyn GeometryList),
}

impl NativeProp<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            NativeProp::Quantity(_) => "quantity",
            NativeProp::Geometry(_) => "geometry",
            NativeProp::GeometryList(_) => "geometry list",
        }
    }
}

impl fmt::Debug for NativeProp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeProp::Quantity(q) => write!(f, "Quantity({})", q.value()),
            NativeProp::Geometry(g) => write!(f, "Geometry({})", g.type_tag()),
            NativeProp::GeometryList(l) => write!(f, "GeometryList(len={})", l.len()),
        }
    }
}

/// Native object that `jcad_to_fc` writes into
pub enum NativeTarget<'a> {
    /// Nothing to write into; pass-through handlers return their value instead
    Detached,
    Geometry(&'a mut dyn NativeGeometry),
    GeometryList(&'a mut dyn GeometryList),
}

impl NativeTarget<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            NativeTarget::Detached => "detached",
            NativeTarget::Geometry(_) => "geometry",
            NativeTarget::GeometryList(_) => "geometry list",
        }
    }
}
