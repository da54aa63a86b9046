// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Property handlers
//!
//! Each handler converts one property type between the native object model
//! and its JCAD form. `fc_to_jcad` reads native attributes into a fresh JSON
//! value; `jcad_to_fc` writes a JSON value back onto a native object.

mod fields;
pub mod geometry;
mod geometry_list;
mod length;
mod registry;

pub use geometry::{
    GeomCircleHandler, GeomLineSegmentHandler, GeometryHandler, GeometryHandlers, SingleGeometry,
};
pub use geometry_list::GeometryListHandler;
pub use length::LengthHandler;
pub use registry::{HandlerRegistry, RegistryBuilder};

use crate::error::{PropError, Result};
use crate::native::{NativeKernel, NativeProp, NativeTarget};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Key carrying the type identifier inside serialized mappings
pub const TYPE_ID_KEY: &str = "TypeId";

/// Conversion for one property type
pub trait PropHandler: Send + Sync {
    /// Type identifier this handler is registered under
    fn name(&self) -> &'static str;

    /// Read a native value into its JCAD form
    fn fc_to_jcad(&self, value: NativeProp<'_>, ctx: &ConversionContext) -> Result<Value>;

    /// Write a JCAD value onto a native target.
    ///
    /// Returns `Some(value)` when the handler passes the value through for the
    /// caller to assign, `None` when it wrote into `target` itself.
    fn jcad_to_fc(
        &self,
        value: &Value,
        target: NativeTarget<'_>,
        ctx: &ConversionContext,
    ) -> Result<Option<Value>>;
}

/// Settings and capabilities shared by every handler of a registry
#[derive(Debug, Clone)]
pub struct ConversionContext {
    kernel: Option<Arc<dyn NativeKernel>>,
    include_type_id: bool,
    strict: bool,
}

impl ConversionContext {
    /// Context able to write back into native objects
    pub fn with_kernel(kernel: Arc<dyn NativeKernel>) -> Self {
        Self {
            kernel: Some(kernel),
            include_type_id: true,
            strict: false,
        }
    }

    /// Context without a kernel; reverse geometry conversion becomes a no-op
    pub fn detached() -> Self {
        Self {
            kernel: None,
            include_type_id: true,
            strict: false,
        }
    }

    pub fn include_type_id(mut self, include: bool) -> Self {
        self.include_type_id = include;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn kernel(&self) -> Option<&dyn NativeKernel> {
        self.kernel.as_deref()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn includes_type_id(&self) -> bool {
        self.include_type_id
    }

    /// Fresh mapping, tagged with `TypeId` when enabled
    pub(crate) fn new_mapping(&self, type_tag: &str) -> Map<String, Value> {
        let mut map = Map::new();
        if self.include_type_id {
            map.insert(TYPE_ID_KEY.into(), Value::String(type_tag.into()));
        }
        map
    }

    /// Policy for tags without a handler: skip, or fail in strict mode
    pub(crate) fn unknown_type(&self, type_tag: &str) -> Result<()> {
        if self.strict {
            return Err(PropError::UnknownType(type_tag.into()));
        }
        tracing::debug!(type_tag, "skipping unrecognized type");
        Ok(())
    }
}

impl Default for ConversionContext {
    fn default() -> Self {
        Self::detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::InMemoryKernel;

    #[test]
    fn test_context_defaults() {
        let ctx = ConversionContext::default();
        assert!(ctx.kernel().is_none());
        assert!(ctx.includes_type_id());
        assert!(!ctx.is_strict());

        let ctx = ConversionContext::with_kernel(Arc::new(InMemoryKernel)).strict(true);
        assert_eq!(ctx.kernel().map(|k| k.name()), Some("in-memory"));
        assert!(ctx.is_strict());
    }

    #[test]
    fn test_new_mapping_type_id() {
        let ctx = ConversionContext::detached();
        let map = ctx.new_mapping("Part::GeomCircle");
        assert_eq!(map.get(TYPE_ID_KEY).and_then(Value::as_str), Some("Part::GeomCircle"));

        let ctx = ctx.include_type_id(false);
        assert!(ctx.new_mapping("Part::GeomCircle").is_empty());
    }

    #[test]
    fn test_unknown_type_policy() {
        let ctx = ConversionContext::detached();
        assert!(ctx.unknown_type("Part::GeomEllipse").is_ok());

        let ctx = ctx.strict(true);
        assert!(matches!(
            ctx.unknown_type("Part::GeomEllipse"),
            Err(PropError::UnknownType(t)) if t == "Part::GeomEllipse"
        ));
    }
}
