// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! `Part::PropertyGeometryList`

use super::{ConversionContext, GeometryHandlers, PropHandler, TYPE_ID_KEY};
use crate::error::{describe, PropError, Result};
use crate::native::{type_tag, NativeProp, NativeTarget};
use serde_json::Value;
use std::sync::Arc;

/// Sequence of geometry elements, each dispatched by its type tag
pub struct GeometryListHandler {
    geometries: Arc<GeometryHandlers>,
}

impl GeometryListHandler {
    pub fn new(geometries: Arc<GeometryHandlers>) -> Self {
        Self { geometries }
    }

    fn mismatch(&self, found: &str) -> PropError {
        PropError::NativeMismatch(format!("{} (got {})", self.name(), found))
    }
}

impl PropHandler for GeometryListHandler {
    fn name(&self) -> &'static str {
        type_tag::PROPERTY_GEOMETRY_LIST
    }

    fn fc_to_jcad(&self, value: NativeProp<'_>, ctx: &ConversionContext) -> Result<Value> {
        let NativeProp::GeometryList(list) = value else {
            return Err(self.mismatch(value.kind()));
        };

        let mut out = Vec::with_capacity(list.len());
        for geometry in (0..list.len()).filter_map(|i| list.geometry(i)) {
            match self.geometries.get(geometry.type_tag()) {
                Some(handler) => out.push(Value::Object(handler.fc_to_jcad(geometry, ctx)?)),
                None => ctx.unknown_type(geometry.type_tag())?,
            }
        }
        Ok(Value::Array(out))
    }

    /// Elements are paired in order with the native elements that have a
    /// handler, mirroring what `fc_to_jcad` emitted.
    ///
    /// Elements without `TypeId` are dispatched by the paired native element's
    /// tag. Every element is validated before the first one is written, so a
    /// failure leaves the whole list untouched.
    fn jcad_to_fc(
        &self,
        value: &Value,
        target: NativeTarget<'_>,
        ctx: &ConversionContext,
    ) -> Result<Option<Value>> {
        let items = value.as_array().ok_or_else(|| PropError::InvalidShape {
            type_id: self.name().into(),
            expected: "array",
            found: describe(value),
        })?;

        let list = match target {
            NativeTarget::GeometryList(list) => list,
            NativeTarget::Detached => {
                tracing::debug!(type_tag = self.name(), "no native list to write into");
                return Ok(None);
            }
            other => return Err(self.mismatch(other.kind())),
        };

        if ctx.kernel().is_none() {
            tracing::debug!(type_tag = self.name(), "no kernel attached, skipping write-back");
            return Ok(None);
        }

        let slots: Vec<usize> = (0..list.len())
            .filter(|&i| {
                list.geometry(i)
                    .is_some_and(|g| self.geometries.contains(g.type_tag()))
            })
            .collect();
        let mut slots = slots.into_iter();

        let mut plan = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let map = item.as_object().ok_or_else(|| PropError::InvalidShape {
                type_id: self.name().into(),
                expected: "array of objects",
                found: describe(item),
            })?;

            let declared = map.get(TYPE_ID_KEY).and_then(Value::as_str);
            if let Some(tag) = declared {
                if !self.geometries.contains(tag) {
                    ctx.unknown_type(tag)?;
                    continue;
                }
            }

            let slot = slots.next().ok_or(PropError::MissingTarget(idx))?;
            let native = list.geometry(slot).ok_or(PropError::MissingTarget(idx))?;
            let tag = declared.unwrap_or_else(|| native.type_tag());

            match self.geometries.get(tag) {
                Some(handler) => {
                    handler.validate(map, native, ctx)?;
                    plan.push((slot, Arc::clone(handler), map));
                }
                None => ctx.unknown_type(tag)?,
            }
        }

        for (slot, handler, map) in plan {
            if let Some(native) = list.geometry_mut(slot) {
                handler.jcad_to_fc(map, native, ctx)?;
            }
        }
        Ok(None)
    }
}
