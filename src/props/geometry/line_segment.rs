// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! `Part::GeomLineSegment`

use super::GeometryHandler;
use crate::error::{PropError, Result};
use crate::native::{type_tag, NativeGeometry, NativeKernel, Vector};
use crate::props::fields::{read_vector, write_vector};
use crate::props::ConversionContext;
use serde_json::{Map, Value};

const START: [&str; 3] = ["StartX", "StartY", "StartZ"];
const END: [&str; 3] = ["EndX", "EndY", "EndZ"];

/// Line segment between two points
pub struct GeomLineSegmentHandler;

impl GeomLineSegmentHandler {
    fn read(
        &self,
        value: &Map<String, Value>,
        kernel: &dyn NativeKernel,
    ) -> Result<(Vector, Vector)> {
        Ok((
            read_vector(value, self.name(), START, kernel)?,
            read_vector(value, self.name(), END, kernel)?,
        ))
    }

    fn mismatch(&self) -> PropError {
        PropError::NativeMismatch(self.name().into())
    }
}

impl GeometryHandler for GeomLineSegmentHandler {
    fn name(&self) -> &'static str {
        type_tag::GEOM_LINE_SEGMENT
    }

    fn fc_to_jcad(
        &self,
        geometry: &dyn NativeGeometry,
        ctx: &ConversionContext,
    ) -> Result<Map<String, Value>> {
        let line = geometry.as_line_segment().ok_or_else(|| self.mismatch())?;

        let mut map = ctx.new_mapping(self.name());
        write_vector(&mut map, START, &line.start_point());
        write_vector(&mut map, END, &line.end_point());
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
        target.as_line_segment().map(|_| ()).ok_or_else(|| self.mismatch())
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

        let (start, end) = self.read(value, kernel)?;
        let line = target.as_line_segment_mut().ok_or_else(|| self.mismatch())?;
        line.set_start_point(start);
        line.set_end_point(end);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{Circle, InMemoryKernel, LineSegment, Vector};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_fc_to_jcad_fields() {
        let ctx = ConversionContext::detached();
        let line = LineSegment::new(Vector::zeros(), Vector::new(1.0, 1.0, 1.0));
        let map = GeomLineSegmentHandler.fc_to_jcad(&line, &ctx).unwrap();

        assert_eq!(
            Value::Object(map),
            json!({
                "TypeId": "Part::GeomLineSegment",
                "StartX": 0.0,
                "StartY": 0.0,
                "StartZ": 0.0,
                "EndX": 1.0,
                "EndY": 1.0,
                "EndZ": 1.0
            })
        );
    }

    #[test]
    fn test_without_type_id() {
        let ctx = ConversionContext::detached().include_type_id(false);
        let map = GeomLineSegmentHandler
            .fc_to_jcad(&LineSegment::default(), &ctx)
            .unwrap();
        assert!(!map.contains_key("TypeId"));
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn test_jcad_to_fc_assigns_points() {
        let ctx = ConversionContext::with_kernel(Arc::new(InMemoryKernel));
        let value = json!({
            "StartX": -1, "StartY": 0.5, "StartZ": 2,
            "EndX": 4, "EndY": 5, "EndZ": 6
        });

        let mut line = LineSegment::default();
        GeomLineSegmentHandler
            .jcad_to_fc(value.as_object().unwrap(), &mut line, &ctx)
            .unwrap();

        assert_eq!(line.start_point, Vector::new(-1.0, 0.5, 2.0));
        assert_eq!(line.end_point, Vector::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_jcad_to_fc_rejects_circle_target() {
        let ctx = ConversionContext::with_kernel(Arc::new(InMemoryKernel));
        let map = GeomLineSegmentHandler
            .fc_to_jcad(&LineSegment::default(), &ctx)
            .unwrap();

        let mut circle = Circle::default();
        let err = GeomLineSegmentHandler
            .jcad_to_fc(&map, &mut circle, &ctx)
            .unwrap_err();
        assert!(matches!(err, PropError::NativeMismatch(_)));
    }
}
