// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! `App::PropertyLength`

use super::{ConversionContext, PropHandler};
use crate::error::{PropError, Result};
use crate::native::{type_tag, NativeProp, NativeTarget};
use serde_json::Value;

/// Scalar length, serialized as a bare number
pub struct LengthHandler;

impl PropHandler for LengthHandler {
    fn name(&self) -> &'static str {
        type_tag::PROPERTY_LENGTH
    }

    fn fc_to_jcad(&self, value: NativeProp<'_>, _ctx: &ConversionContext) -> Result<Value> {
        match value {
            NativeProp::Quantity(quantity) => Ok(Value::from(quantity.value())),
            other => Err(PropError::NativeMismatch(format!(
                "{} (got {})",
                self.name(),
                other.kind()
            ))),
        }
    }

    /// Lengths carry no sub-fields; the value goes back to the caller as is
    fn jcad_to_fc(
        &self,
        value: &Value,
        _target: NativeTarget<'_>,
        _ctx: &ConversionContext,
    ) -> Result<Option<Value>> {
        Ok(Some(value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{Circle, Length};
    use serde_json::json;

    #[test]
    fn test_fc_to_jcad_returns_value() {
        let ctx = ConversionContext::detached();
        let value = LengthHandler
            .fc_to_jcad(NativeProp::Quantity(&Length(12.5)), &ctx)
            .unwrap();
        assert_eq!(value, json!(12.5));
    }

    #[test]
    fn test_jcad_to_fc_passes_through() {
        let ctx = ConversionContext::detached();
        let out = LengthHandler
            .jcad_to_fc(&json!(7.25), NativeTarget::Detached, &ctx)
            .unwrap();
        assert_eq!(out, Some(json!(7.25)));
    }

    #[test]
    fn test_rejects_geometry() {
        let ctx = ConversionContext::detached();
        let circle = Circle::default();
        assert!(LengthHandler
            .fc_to_jcad(NativeProp::Geometry(&circle), &ctx)
            .is_err());
    }
}
