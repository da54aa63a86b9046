// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! `Part::GeomCircle`

use super::GeometryHandler;
use crate::error::{PropError, Result};
use crate::native::{type_tag, NativeGeometry, NativeKernel, Vector};
use crate::props::fields::{read_f64, read_vector, write_vector};
use crate::props::ConversionContext;
use serde_json::{Map, Value};

const CENTER: [&str; 3] = ["CenterX", "CenterY", "CenterZ"];
const NORMAL: [&str; 3] = ["NormalX", "NormalY", "NormalZ"];
const ANGLE_XU: &str = "AngleXU";
const RADIUS: &str = "Radius";

/// Circle: center, normal axis, radius and the angle of the local X axis
pub struct GeomCircleHandler;

struct CircleFields {
    center: Vector,
    axis: Vector,
    angle_xu: f64,
    radius: f64,
}

impl GeomCircleHandler {
    fn read(
        &self,
        value: &Map<String, Value>,
        kernel: &dyn NativeKernel,
    ) -> Result<CircleFields> {
        Ok(CircleFields {
            center: read_vector(value, self.name(), CENTER, kernel)?,
            axis: read_vector(value, self.name(), NORMAL, kernel)?,
            angle_xu: read_f64(value, self.name(), ANGLE_XU)?,
            radius: read_f64(value, self.name(), RADIUS)?,
        })
    }

    fn mismatch(&self) -> PropError {
        PropError::NativeMismatch(self.name().into())
    }
}

impl GeometryHandler for GeomCircleHandler {
    fn name(&self) -> &'static str {
        type_tag::GEOM_CIRCLE
    }

    fn fc_to_jcad(
        &self,
        geometry: &dyn NativeGeometry,
        ctx: &ConversionContext,
    ) -> Result<Map<String, Value>> {
        let circle = geometry.as_circle().ok_or_else(|| self.mismatch())?;

        let mut map = ctx.new_mapping(self.name());
        write_vector(&mut map, CENTER, &circle.center());
        write_vector(&mut map, NORMAL, &circle.axis());
        map.insert(ANGLE_XU.into(), Value::from(circle.angle_xu()));
        map.insert(RADIUS.into(), Value::from(circle.radius()));
        Ok(map)
    }

    fn validate(
        &self,
        value: &Map<String, Value>,
        target: &dyn NativeGeometry,
        ctx: &ConversionContext,
    ) -> Result<()> {
        let Some(kernel) = ctx.kernel() else {
            return Ok(());
        };
        self.read(value, kernel)?;
        target.as_circle().map(|_| ()).ok_or_else(|| self.mismatch())
    }

    fn jcad_to_fc(
        &self,
        value: &Map<String, Value>,
        target: &mut dyn NativeGeometry,
        ctx: &ConversionContext,
    ) -> Result<()> {
        let Some(kernel) = ctx.kernel() else {
            tracing::debug!(type_tag = self.name(), "no kernel attached, skipping write-back");
            return Ok(());
        };

        // All fields are read before the first assignment
        let fields = self.read(value, kernel)?;
        let circle = target.as_circle_mut().ok_or_else(|| self.mismatch())?;
        circle.set_center(fields.center);
        circle.set_axis(fields.axis);
        circle.set_angle_xu(fields.angle_xu);
        circle.set_radius(fields.radius);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{Circle, InMemoryKernel, LineSegment, Vector};
    use serde_json::json;
    use std::sync::Arc;

    fn sample() -> Circle {
        Circle {
            center: Vector::new(1.0, 2.0, 3.0),
            axis: Vector::new(0.0, 0.0, 1.0),
            radius: 5.0,
            angle_xu: 0.3,
        }
    }

    #[test]
    fn test_fc_to_jcad_fields() {
        let ctx = ConversionContext::detached();
        let map = GeomCircleHandler.fc_to_jcad(&sample(), &ctx).unwrap();

        assert_eq!(
            Value::Object(map),
            json!({
                "TypeId": "Part::GeomCircle",
                "CenterX": 1.0,
                "CenterY": 2.0,
                "CenterZ": 3.0,
                "NormalX": 0.0,
                "NormalY": 0.0,
                "NormalZ": 1.0,
                "AngleXU": 0.3,
                "Radius": 5.0
            })
        );
    }

    #[test]
    fn test_round_trip_restores_fields() {
        let ctx = ConversionContext::with_kernel(Arc::new(InMemoryKernel));
        let original = sample();
        let map = GeomCircleHandler.fc_to_jcad(&original, &ctx).unwrap();

        let mut restored = Circle::default();
        GeomCircleHandler
            .jcad_to_fc(&map, &mut restored, &ctx)
            .unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_detached_write_back_is_noop() {
        let ctx = ConversionContext::detached();
        let map = GeomCircleHandler.fc_to_jcad(&sample(), &ctx).unwrap();

        let mut target = Circle::default();
        GeomCircleHandler.jcad_to_fc(&map, &mut target, &ctx).unwrap();
        assert_eq!(target, Circle::default());
    }

    #[test]
    fn test_missing_radius_leaves_target_untouched() {
        let ctx = ConversionContext::with_kernel(Arc::new(InMemoryKernel));
        let mut map = GeomCircleHandler.fc_to_jcad(&sample(), &ctx).unwrap();
        map.remove(RADIUS);

        let mut target = Circle::default();
        let err = GeomCircleHandler
            .jcad_to_fc(&map, &mut target, &ctx)
            .unwrap_err();
        assert!(matches!(err, PropError::MissingField { field: "Radius", .. }));
        assert_eq!(target, Circle::default());
    }

    #[test]
    fn test_validate_checks_fields_and_target() {
        let ctx = ConversionContext::with_kernel(Arc::new(InMemoryKernel));
        let mut map = GeomCircleHandler.fc_to_jcad(&sample(), &ctx).unwrap();

        assert!(GeomCircleHandler.validate(&map, &Circle::default(), &ctx).is_ok());
        let err = GeomCircleHandler
            .validate(&map, &LineSegment::default(), &ctx)
            .unwrap_err();
        assert!(matches!(err, PropError::NativeMismatch(_)));

        map.insert("CenterY".into(), json!("up"));
        let err = GeomCircleHandler
            .validate(&map, &Circle::default(), &ctx)
            .unwrap_err();
        assert!(matches!(err, PropError::InvalidField { field: "CenterY", .. }));
    }

    #[test]
    fn test_wrong_native_type() {
        let ctx = ConversionContext::with_kernel(Arc::new(InMemoryKernel));
        let err = GeomCircleHandler
            .fc_to_jcad(&LineSegment::default(), &ctx)
            .unwrap_err();
        assert!(matches!(err, PropError::NativeMismatch(_)));
    }
}
