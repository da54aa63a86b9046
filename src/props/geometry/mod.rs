// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry element handlers
//!
//! Geometry elements live inside list properties; they convert to a single
//! flat mapping of scalar fields.

mod circle;
mod line_segment;

pub use circle::GeomCircleHandler;
pub use line_segment::GeomLineSegmentHandler;

use super::{ConversionContext, PropHandler};
use crate::error::{describe, PropError, Result};
use crate::native::{NativeGeometry, NativeProp, NativeTarget};
use ahash::AHashMap;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Conversion for one geometry element type
pub trait GeometryHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn fc_to_jcad(
        &self,
        geometry: &dyn NativeGeometry,
        ctx: &ConversionContext,
    ) -> Result<Map<String, Value>>;

    /// Check that `value` can be written onto `target` without touching it
    fn validate(
        &self,
        value: &Map<String, Value>,
        target: &dyn NativeGeometry,
        ctx: &ConversionContext,
    ) -> Result<()>;

    fn jcad_to_fc(
        &self,
        value: &Map<String, Value>,
        target: &mut dyn NativeGeometry,
        ctx: &ConversionContext,
    ) -> Result<()>;
}

/// Lookup table of geometry handlers keyed by type tag
#[derive(Clone, Default)]
pub struct GeometryHandlers {
    handlers: AHashMap<&'static str, Arc<dyn GeometryHandler>>,
}

impl GeometryHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Circle and line segment handlers
    pub fn standard() -> Self {
        let mut handlers = Self::new();
        handlers.register(Arc::new(GeomCircleHandler));
        handlers.register(Arc::new(GeomLineSegmentHandler));
        handlers
    }

    /// Register a handler, replacing any previous one for the same tag
    pub fn register(&mut self, handler: Arc<dyn GeometryHandler>) {
        self.handlers.insert(handler.name(), handler);
    }

    pub fn get(&self, type_tag: &str) -> Option<&Arc<dyn GeometryHandler>> {
        self.handlers.get(type_tag)
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.handlers.contains_key(type_tag)
    }

    /// Registered tags, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn GeometryHandler>> {
        self.handlers.values()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Exposes a geometry handler as a property handler for properties holding a
/// single geometry element
pub struct SingleGeometry {
    inner: Arc<dyn GeometryHandler>,
}

impl SingleGeometry {
    pub fn new(inner: Arc<dyn GeometryHandler>) -> Self {
        Self { inner }
    }
}

impl PropHandler for SingleGeometry {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn fc_to_jcad(&self, value: NativeProp<'_>, ctx: &ConversionContext) -> Result<Value> {
        match value {
            NativeProp::Geometry(geometry) => self.inner.fc_to_jcad(geometry, ctx).map(Value::Object),
            other => Err(PropError::NativeMismatch(format!(
                "{} (got {})",
                self.name(),
                other.kind()
            ))),
        }
    }

    fn jcad_to_fc(
        &self,
        value: &Value,
        target: NativeTarget<'_>,
        ctx: &ConversionContext,
    ) -> Result<Option<Value>> {
        let map = value.as_object().ok_or_else(|| PropError::InvalidShape {
            type_id: self.name().into(),
            expected: "object",
            found: describe(value),
        })?;

        match target {
            NativeTarget::Geometry(geometry) => self.inner.jcad_to_fc(map, geometry, ctx)?,
            NativeTarget::Detached => {
                tracing::debug!(type_tag = self.name(), "no native geometry to write into");
            }
            other => {
                return Err(PropError::NativeMismatch(format!(
                    "{} (got {})",
                    self.name(),
                    other.kind()
                )))
            }
        }
        Ok(None)
    }
}
