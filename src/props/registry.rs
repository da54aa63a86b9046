// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Handler registry
//!
//! Built once at startup and passed by reference; never mutated afterwards.

use super::{
    ConversionContext, GeomCircleHandler, GeomLineSegmentHandler, GeometryHandler,
    GeometryHandlers, GeometryListHandler, LengthHandler, PropHandler, SingleGeometry,
};
use crate::error::Result;
use crate::native::NativeProp;
use ahash::AHashMap;
use serde_json::Value;
use std::sync::Arc;

/// Immutable mapping from type identifier to property handler
pub struct HandlerRegistry {
    handlers: AHashMap<&'static str, Arc<dyn PropHandler>>,
    geometries: Arc<GeometryHandlers>,
    context: ConversionContext,
}

impl HandlerRegistry {
    /// Registry with every bundled handler
    pub fn standard(context: ConversionContext) -> Self {
        RegistryBuilder::new(context)
            .geometry(Arc::new(GeomCircleHandler))
            .geometry(Arc::new(GeomLineSegmentHandler))
            .handler(Arc::new(LengthHandler))
            .build()
    }

    pub fn builder(context: ConversionContext) -> RegistryBuilder {
        RegistryBuilder::new(context)
    }

    pub fn get(&self, type_tag: &str) -> Option<&dyn PropHandler> {
        self.handlers.get(type_tag).map(|h| h.as_ref())
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.handlers.contains_key(type_tag)
    }

    pub fn context(&self) -> &ConversionContext {
        &self.context
    }

    pub fn geometries(&self) -> &GeometryHandlers {
        &self.geometries
    }

    /// Registered property type identifiers, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Convert a native value with the handler registered for `type_tag`.
    ///
    /// Returns `Ok(None)` when no handler is registered.
    pub fn fc_to_jcad(&self, type_tag: &str, value: NativeProp<'_>) -> Result<Option<Value>> {
        match self.get(type_tag) {
            Some(handler) => handler.fc_to_jcad(value, &self.context).map(Some),
            None => {
                tracing::debug!(type_tag, "no handler registered");
                Ok(None)
            }
        }
    }
}

/// Collects handlers before freezing them into a [`HandlerRegistry`]
pub struct RegistryBuilder {
    context: ConversionContext,
    geometries: GeometryHandlers,
    handlers: Vec<Arc<dyn PropHandler>>,
}

impl RegistryBuilder {
    pub fn new(context: ConversionContext) -> Self {
        Self {
            context,
            geometries: GeometryHandlers::new(),
            handlers: Vec::new(),
        }
    }

    /// Add a geometry element handler.
    ///
    /// It becomes available inside geometry lists and as a property handler
    /// for properties holding one element.
    pub fn geometry(mut self, handler: Arc<dyn GeometryHandler>) -> Self {
        self.geometries.register(handler);
        self
    }

    /// Add a property handler; later registrations win over earlier ones
    pub fn handler(mut self, handler: Arc<dyn PropHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn build(self) -> HandlerRegistry {
        let geometries = Arc::new(self.geometries);
        let mut handlers: AHashMap<&'static str, Arc<dyn PropHandler>> = AHashMap::new();

        for geometry in geometries.iter() {
            let adapter: Arc<dyn PropHandler> = Arc::new(SingleGeometry::new(geometry.clone()));
            handlers.insert(adapter.name(), adapter);
        }

        let list: Arc<dyn PropHandler> = Arc::new(GeometryListHandler::new(geometries.clone()));
        handlers.insert(list.name(), list);

        for handler in self.handlers {
            handlers.insert(handler.name(), handler);
        }

        tracing::debug!(
            handlers = handlers.len(),
            geometries = geometries.len(),
            "handler registry built"
        );

        HandlerRegistry {
            handlers,
            geometries,
            context: self.context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{type_tag, Length, NativeTarget};
    use serde_json::json;

    struct Doubling;

    impl PropHandler for Doubling {
        fn name(&self) -> &'static str {
            type_tag::PROPERTY_LENGTH
        }

        fn fc_to_jcad(&self, value: NativeProp<'_>, _ctx: &ConversionContext) -> Result<Value> {
            match value {
                NativeProp::Quantity(q) => Ok(Value::from(q.value() * 2.0)),
                _ => Ok(Value::Null),
            }
        }

        fn jcad_to_fc(
            &self,
            value: &Value,
            _target: NativeTarget<'_>,
            _ctx: &ConversionContext,
        ) -> Result<Option<Value>> {
            Ok(Some(value.clone()))
        }
    }

    #[test]
    fn test_standard_registry() {
        let registry = HandlerRegistry::standard(ConversionContext::detached());
        assert_eq!(
            registry.names(),
            vec![
                type_tag::PROPERTY_LENGTH,
                type_tag::GEOM_CIRCLE,
                type_tag::GEOM_LINE_SEGMENT,
                type_tag::PROPERTY_GEOMETRY_LIST,
            ]
        );
        assert_eq!(registry.geometries().len(), 2);
    }

    #[test]
    fn test_dispatch_by_name() {
        let registry = HandlerRegistry::standard(ConversionContext::detached());
        let length = Length(12.5);

        let value = registry
            .fc_to_jcad(type_tag::PROPERTY_LENGTH, NativeProp::Quantity(&length))
            .unwrap();
        assert_eq!(value, Some(json!(12.5)));

        let value = registry
            .fc_to_jcad("App::PropertyString", NativeProp::Quantity(&length))
            .unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_later_handler_overrides() {
        let registry = HandlerRegistry::builder(ConversionContext::detached())
            .handler(Arc::new(LengthHandler))
            .handler(Arc::new(Doubling))
            .build();

        let value = registry
            .fc_to_jcad(type_tag::PROPERTY_LENGTH, NativeProp::Quantity(&Length(2.0)))
            .unwrap();
        assert_eq!(value, Some(json!(4.0)));
        assert!(registry.contains(type_tag::PROPERTY_GEOMETRY_LIST));
        assert!(!registry.contains(type_tag::GEOM_CIRCLE));
    }
}
