// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! In-memory native object model
//!
//! A concrete stand-in for kernel objects: snapshots dumped by the kernel side
//! deserialize into these types, and they implement the native traits so the
//! handlers can run against them without a live kernel.

use super::{
    type_tag, GeomCircle, GeomLineSegment, NativeGeometry, NativeKernel, NativeProp,
    NativeTarget, Quantity, Vector,
};
use crate::utils::math::{approx_eq, vec_approx_eq};
use serde::de::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Kernel capability backed by plain `nalgebra` vectors
#[derive(Debug, Default, Clone, Copy)]
pub struct InMemoryKernel;

impl NativeKernel for InMemoryKernel {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn vector(&self, x: f64, y: f64, z: f64) -> Vector {
        Vector::new(x, y, z)
    }
}

/// Scalar length
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Length(pub f64);

impl Quantity for Length {
    fn value(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Circle {
    pub center: Vector,
    pub axis: Vector,
    pub radius: f64,
    #[serde(rename = "AngleXU", default)]
    pub angle_xu: f64,
}

impl Circle {
    pub fn new(center: Vector, axis: Vector, radius: f64) -> Self {
        Self {
            center,
            axis,
            radius,
            angle_xu: 0.0,
        }
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new(Vector::zeros(), Vector::z(), 0.0)
    }
}

impl GeomCircle for Circle {
    fn center(&self) -> Vector {
        self.center
    }

    fn axis(&self) -> Vector {
        self.axis
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn angle_xu(&self) -> f64 {
        self.angle_xu
    }

    fn set_center(&mut self, center: Vector) {
        self.center = center;
    }

    fn set_axis(&mut self, axis: Vector) {
        self.axis = axis;
    }

    fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    fn set_angle_xu(&mut self, angle: f64) {
        self.angle_xu = angle;
    }
}

impl NativeGeometry for Circle {
    fn type_tag(&self) -> &str {
        type_tag::GEOM_CIRCLE
    }

    fn as_circle(&self) -> Option<&dyn GeomCircle> {
        Some(self)
    }

    fn as_circle_mut(&mut self) -> Option<&mut dyn GeomCircle> {
        Some(self)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineSegment {
    pub start_point: Vector,
    pub end_point: Vector,
}

impl LineSegment {
    pub fn new(start_point: Vector, end_point: Vector) -> Self {
        Self {
            start_point,
            end_point,
        }
    }
}

impl GeomLineSegment for LineSegment {
    fn start_point(&self) -> Vector {
        self.start_point
    }

    fn end_point(&self) -> Vector {
        self.end_point
    }

    fn set_start_point(&mut self, point: Vector) {
        self.start_point = point;
    }

    fn set_end_point(&mut self, point: Vector) {
        self.end_point = point;
    }
}

impl NativeGeometry for LineSegment {
    fn type_tag(&self) -> &str {
        type_tag::GEOM_LINE_SEGMENT
    }

    fn as_line_segment(&self) -> Option<&dyn GeomLineSegment> {
        Some(self)
    }

    fn as_line_segment_mut(&mut self) -> Option<&mut dyn GeomLineSegment> {
        Some(self)
    }
}

/// Geometry element tagged by `TypeId`.
///
/// Tags without a native model are kept verbatim as `Unsupported` so that a
/// snapshot survives a load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub enum Geometry {
    Circle(Circle),
    LineSegment(LineSegment),
    Unsupported {
        type_tag: String,
        fields: Map<String, Value>,
    },
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "TypeId")]
    type_tag: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl TryFrom<RawGeometry> for Geometry {
    type Error = serde_json::Error;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        let fields = Value::Object(raw.fields);
        Ok(match raw.type_tag.as_str() {
            type_tag::GEOM_CIRCLE => Geometry::Circle(serde_json::from_value(fields)?),
            type_tag::GEOM_LINE_SEGMENT => Geometry::LineSegment(serde_json::from_value(fields)?),
            _ => Geometry::Unsupported {
                type_tag: raw.type_tag,
                fields: match fields {
                    Value::Object(map) => map,
                    _ => Map::new(),
                },
            },
        })
    }
}

#[derive(Serialize)]
struct Tagged<'a, T: Serialize> {
    #[serde(rename = "TypeId")]
    type_tag: &'a str,
    #[serde(flatten)]
    inner: &'a T,
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Geometry::Circle(circle) => Tagged {
                type_tag: type_tag::GEOM_CIRCLE,
                inner: circle,
            }
            .serialize(serializer),
            Geometry::LineSegment(line) => Tagged {
                type_tag: type_tag::GEOM_LINE_SEGMENT,
                inner: line,
            }
            .serialize(serializer),
            Geometry::Unsupported { type_tag, fields } => Tagged {
                type_tag,
                inner: fields,
            }
            .serialize(serializer),
        }
    }
}

impl Geometry {
    /// Reset every modeled field to its default
    pub fn clear(&mut self) {
        match self {
            Geometry::Circle(c) => *c = Circle::default(),
            Geometry::LineSegment(l) => *l = LineSegment::default(),
            Geometry::Unsupported { .. } => {}
        }
    }

    pub fn approx_eq(&self, other: &Geometry, epsilon: f64) -> bool {
        match (self, other) {
            (Geometry::Circle(a), Geometry::Circle(b)) => {
                vec_approx_eq(&a.center, &b.center, epsilon)
                    && vec_approx_eq(&a.axis, &b.axis, epsilon)
                    && approx_eq(a.radius, b.radius, epsilon)
                    && approx_eq(a.angle_xu, b.angle_xu, epsilon)
            }
            (Geometry::LineSegment(a), Geometry::LineSegment(b)) => {
                vec_approx_eq(&a.start_point, &b.start_point, epsilon)
                    && vec_approx_eq(&a.end_point, &b.end_point, epsilon)
            }
            (a, b) => a == b,
        }
    }
}

impl From<Circle> for Geometry {
    fn from(circle: Circle) -> Self {
        Geometry::Circle(circle)
    }
}

impl From<LineSegment> for Geometry {
    fn from(line: LineSegment) -> Self {
        Geometry::LineSegment(line)
    }
}

impl NativeGeometry for Geometry {
    fn type_tag(&self) -> &str {
        match self {
            Geometry::Circle(c) => c.type_tag(),
            Geometry::LineSegment(l) => l.type_tag(),
            Geometry::Unsupported { type_tag, .. } => type_tag,
        }
    }

    fn as_circle(&self) -> Option<&dyn GeomCircle> {
        match self {
            Geometry::Circle(c) => Some(c),
            _ => None,
        }
    }

    fn as_circle_mut(&mut self) -> Option<&mut dyn GeomCircle> {
        match self {
            Geometry::Circle(c) => Some(c),
            _ => None,
        }
    }

    fn as_line_segment(&self) -> Option<&dyn GeomLineSegment> {
        match self {
            Geometry::LineSegment(l) => Some(l),
            _ => None,
        }
    }

    fn as_line_segment_mut(&mut self) -> Option<&mut dyn GeomLineSegment> {
        match self {
            Geometry::LineSegment(l) => Some(l),
            _ => None,
        }
    }
}

/// Value of a native property as it appears in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NativeValue {
    Quantity(Length),
    Geometry(Geometry),
    GeometryList(Vec<Geometry>),
    Other(Value),
}

impl NativeValue {
    /// Decode a snapshot value according to the property's type tag.
    ///
    /// Tags with a native model must match it; anything else falls back to
    /// the untagged shapes.
    pub fn decode(tag: &str, value: Value) -> serde_json::Result<Self> {
        match tag {
            type_tag::PROPERTY_LENGTH => serde_json::from_value(value).map(NativeValue::Quantity),
            type_tag::PROPERTY_GEOMETRY_LIST => {
                serde_json::from_value(value).map(NativeValue::GeometryList)
            }
            type_tag::GEOM_CIRCLE | type_tag::GEOM_LINE_SEGMENT => {
                serde_json::from_value(value).map(NativeValue::Geometry)
            }
            _ => serde_json::from_value(value),
        }
    }

    /// Borrow as a handler input; `Other` has no native interface
    pub fn as_prop(&self) -> Option<NativeProp<'_>> {
        match self {
            NativeValue::Quantity(q) => Some(NativeProp::Quantity(q)),
            NativeValue::Geometry(g) => Some(NativeProp::Geometry(g)),
            NativeValue::GeometryList(list) => Some(NativeProp::GeometryList(list)),
            NativeValue::Other(_) => None,
        }
    }

    pub fn as_target(&mut self) -> NativeTarget<'_> {
        match self {
            NativeValue::Geometry(g) => NativeTarget::Geometry(g),
            NativeValue::GeometryList(list) => NativeTarget::GeometryList(list),
            NativeValue::Quantity(_) | NativeValue::Other(_) => NativeTarget::Detached,
        }
    }

    pub fn clear(&mut self) {
        match self {
            NativeValue::Quantity(q) => *q = Length::default(),
            NativeValue::Geometry(g) => g.clear(),
            NativeValue::GeometryList(list) => list.iter_mut().for_each(Geometry::clear),
            NativeValue::Other(_) => {}
        }
    }

    pub fn approx_eq(&self, other: &NativeValue, epsilon: f64) -> bool {
        match (self, other) {
            (NativeValue::Quantity(a), NativeValue::Quantity(b)) => approx_eq(a.0, b.0, epsilon),
            (NativeValue::Geometry(a), NativeValue::Geometry(b)) => a.approx_eq(b, epsilon),
            (NativeValue::GeometryList(a), NativeValue::GeometryList(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.approx_eq(y, epsilon))
            }
            (a, b) => a == b,
        }
    }
}

/// Named, typed property of a native object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProperty")]
pub struct NativeProperty {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "TypeId")]
    pub type_tag: String,
    #[serde(rename = "Value")]
    pub value: NativeValue,
}

#[derive(Deserialize)]
struct RawProperty {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "TypeId")]
    type_tag: String,
    #[serde(rename = "Value", default)]
    value: Value,
}

impl TryFrom<RawProperty> for NativeProperty {
    type Error = serde_json::Error;

    fn try_from(raw: RawProperty) -> Result<Self, Self::Error> {
        let value = NativeValue::decode(&raw.type_tag, raw.value).map_err(|e| {
            serde_json::Error::custom(format!(
                "property `{}` ({}): {}",
                raw.name, raw.type_tag, e
            ))
        })?;
        Ok(Self {
            name: raw.name,
            type_tag: raw.type_tag,
            value,
        })
    }
}

impl NativeProperty {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>, value: NativeValue) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            value,
        }
    }
}

/// Snapshot of one native document object and its properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeObject {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "TypeId")]
    pub type_tag: String,
    #[serde(rename = "Properties", default)]
    pub properties: Vec<NativeProperty>,
}

impl NativeObject {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: NativeProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn property(&self, name: &str) -> Option<&NativeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut NativeProperty> {
        self.properties.iter_mut().find(|p| p.name == name)
    }
}
