// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Object-level conversion between native snapshots and JCAD documents

use crate::error::{describe, PropError};
use crate::native::{NativeObject, NativeValue};
use crate::props::HandlerRegistry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// One object of a JCAD document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JcadObject {
    pub name: String,
    pub shape: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

fn default_visible() -> bool {
    true
}

/// JCAD document; top-level keys other than `objects` are carried through
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JcadDocument {
    #[serde(default)]
    pub objects: Vec<JcadObject>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JcadDocument {
    pub fn object(&self, name: &str) -> Option<&JcadObject> {
        self.objects.iter().find(|o| o.name == name)
    }
}

/// Outcome of applying one JCAD object onto a native object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub applied: Vec<String>,
    /// Parameters with no matching native property or no handler
    pub skipped: Vec<String>,
}

/// Outcome of a round-trip verification
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTrip {
    pub object: String,
    pub exported: usize,
    pub mismatched: Vec<String>,
}

impl RoundTrip {
    pub fn passed(&self) -> bool {
        self.mismatched.is_empty()
    }
}

/// Convert every property that has a registered handler
pub fn export_object(registry: &HandlerRegistry, object: &NativeObject) -> Result<JcadObject> {
    let mut parameters = Map::new();

    for property in &object.properties {
        let Some(prop) = property.value.as_prop() else {
            if registry.contains(&property.type_tag) {
                return Err(PropError::InvalidShape {
                    type_id: property.type_tag.clone(),
                    expected: "native value",
                    found: describe(&serde_json::to_value(&property.value)?),
                })
                .with_context(|| format!("Failed to export {}.{}", object.name, property.name));
            }
            tracing::debug!(property = %property.name, "property has no native interface");
            continue;
        };

        let converted = registry
            .fc_to_jcad(&property.type_tag, prop)
            .with_context(|| format!("Failed to export {}.{}", object.name, property.name))?;
        if let Some(value) = converted {
            parameters.insert(property.name.clone(), value);
        }
    }

    Ok(JcadObject {
        name: object.name.clone(),
        shape: object.type_tag.clone(),
        visible: true,
        parameters,
    })
}

/// Write each JCAD parameter onto the same-named native property.
///
/// Parameters are applied to a working copy; `object` is only replaced once
/// every parameter has been written, so an error leaves it unchanged.
pub fn apply_object(
    registry: &HandlerRegistry,
    jcad: &JcadObject,
    object: &mut NativeObject,
) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();
    let mut staged = object.clone();
    let object_name = object.name.clone();

    for (name, value) in &jcad.parameters {
        let Some(property) = staged.property_mut(name) else {
            tracing::debug!(parameter = %name, "no native property with this name");
            report.skipped.push(name.clone());
            continue;
        };
        let Some(handler) = registry.get(&property.type_tag) else {
            tracing::debug!(parameter = %name, type_tag = %property.type_tag, "no handler registered");
            report.skipped.push(name.clone());
            continue;
        };

        let passed = handler
            .jcad_to_fc(value, property.value.as_target(), registry.context())
            .with_context(|| format!("Failed to apply {}.{}", object_name, name))?;

        if let Some(value) = passed {
            assign_scalar(&mut property.value, &property.type_tag, &value)
                .with_context(|| format!("Failed to assign {}.{}", object_name, name))?;
        }
        report.applied.push(name.clone());
    }

    *object = staged;
    Ok(report)
}

fn assign_scalar(
    target: &mut NativeValue,
    type_tag: &str,
    value: &Value,
) -> std::result::Result<(), PropError> {
    match target {
        NativeValue::Quantity(quantity) => {
            quantity.0 = value.as_f64().ok_or_else(|| PropError::InvalidShape {
                type_id: type_tag.into(),
                expected: "number",
                found: describe(value),
            })?;
        }
        other => *other = NativeValue::Other(value.clone()),
    }
    Ok(())
}

/// Export `object`, apply the result onto a field-cleared copy and compare.
///
/// A property that does not come back within `tolerance` means its
/// serialized keys and its write-back disagree.
pub fn verify_round_trip(
    registry: &HandlerRegistry,
    object: &NativeObject,
    tolerance: f64,
) -> Result<RoundTrip> {
    let jcad = export_object(registry, object)?;

    let mut restored = object.clone();
    for property in &mut restored.properties {
        if jcad.parameters.contains_key(&property.name) {
            property.value.clear();
        }
    }
    apply_object(registry, &jcad, &mut restored)?;

    let mismatched = object
        .properties
        .iter()
        .zip(&restored.properties)
        .filter(|(before, after)| !before.value.approx_eq(&after.value, tolerance))
        .map(|(before, _)| before.name.clone())
        .collect();

    Ok(RoundTrip {
        object: object.name.clone(),
        exported: jcad.parameters.len(),
        mismatched,
    })
}

/// Load a native snapshot: a single object or an array of objects
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Vec<NativeObject>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;
    let objects: Vec<NativeObject> = match value {
        Value::Array(_) => serde_json::from_value(value),
        _ => serde_json::from_value(value).map(|object| vec![object]),
    }
    .with_context(|| format!("Invalid snapshot: {}", path.display()))?;

    Ok(objects)
}

pub fn save_snapshot(objects: &[NativeObject], path: impl AsRef<Path>, pretty: bool) -> Result<()> {
    write_json(objects, path.as_ref(), pretty)
}

pub fn load_document(path: impl AsRef<Path>) -> Result<JcadDocument> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JCAD document: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JCAD document: {}", path.display()))
}

pub fn save_document(document: &JcadDocument, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
    write_json(document, path.as_ref(), pretty)
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path, pretty: bool) -> Result<()> {
    let content = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize JSON")?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{
        type_tag, Circle, Geometry, InMemoryKernel, Length, LineSegment, NativeProperty, Vector,
    };
    use crate::props::ConversionContext;
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> HandlerRegistry {
        HandlerRegistry::standard(ConversionContext::with_kernel(Arc::new(InMemoryKernel)))
    }

    fn sketch() -> NativeObject {
        NativeObject::new("Sketch", "Sketcher::SketchObject")
            .with_property(NativeProperty::new(
                "Geometry",
                type_tag::PROPERTY_GEOMETRY_LIST,
                NativeValue::GeometryList(vec![
                    Geometry::from(Circle::new(Vector::new(1.0, 2.0, 3.0), Vector::z(), 5.0)),
                    Geometry::from(LineSegment::new(Vector::zeros(), Vector::new(1.0, 1.0, 1.0))),
                ]),
            ))
            .with_property(NativeProperty::new(
                "Width",
                type_tag::PROPERTY_LENGTH,
                NativeValue::Quantity(Length(12.5)),
            ))
            .with_property(NativeProperty::new(
                "Label",
                "App::PropertyString",
                NativeValue::Other(json!("Sketch001")),
            ))
    }

    #[test]
    fn test_export_skips_unhandled_properties() {
        let jcad = export_object(&registry(), &sketch()).unwrap();

        assert_eq!(jcad.shape, "Sketcher::SketchObject");
        assert_eq!(jcad.parameters.len(), 2);
        assert_eq!(jcad.parameters["Width"], json!(12.5));
        assert_eq!(jcad.parameters["Geometry"].as_array().unwrap().len(), 2);
        assert!(!jcad.parameters.contains_key("Label"));
    }

    #[test]
    fn test_apply_assigns_lengths_and_geometry() {
        let registry = registry();
        let mut jcad = export_object(&registry, &sketch()).unwrap();
        jcad.parameters.insert("Width".into(), json!(20.0));
        jcad.parameters["Geometry"][1]["EndZ"] = json!(9.0);
        jcad.parameters.insert("Missing".into(), json!(1));

        let mut object = sketch();
        let report = apply_object(&registry, &jcad, &mut object).unwrap();

        assert_eq!(report.skipped, vec!["Missing".to_string()]);
        assert_eq!(report.applied.len(), 2);
        assert_eq!(
            object.property("Width").unwrap().value,
            NativeValue::Quantity(Length(20.0))
        );
        match &object.property("Geometry").unwrap().value {
            NativeValue::GeometryList(list) => match &list[1] {
                Geometry::LineSegment(line) => assert_eq!(line.end_point.z, 9.0),
                other => panic!("unexpected geometry {:?}", other),
            },
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_apply_rejects_non_numeric_length() {
        let registry = registry();
        let mut jcad = export_object(&registry, &sketch()).unwrap();
        jcad.parameters.insert("Width".into(), json!("wide"));

        let mut object = sketch();
        assert!(apply_object(&registry, &jcad, &mut object).is_err());
    }

    #[test]
    fn test_failed_apply_leaves_object_unchanged() {
        let registry = registry();
        let mut jcad = export_object(&registry, &sketch()).unwrap();
        // Geometry is written before Width fails
        jcad.parameters["Geometry"][0]["CenterX"] = json!(7.0);
        jcad.parameters.insert("Width".into(), json!("wide"));

        let mut object = sketch();
        assert!(apply_object(&registry, &jcad, &mut object).is_err());
        assert_eq!(object, sketch());
    }

    #[test]
    fn test_export_rejects_handled_property_without_native_value() {
        let object = NativeObject::new("Pad", "PartDesign::Pad").with_property(
            NativeProperty::new(
                "Length",
                type_tag::PROPERTY_LENGTH,
                NativeValue::Other(json!("long")),
            ),
        );

        let err = export_object(&registry(), &object).unwrap_err();
        assert!(format!("{:#}", err).contains("Pad.Length"));
    }

    #[test]
    fn test_round_trip_passes() {
        let result = verify_round_trip(&registry(), &sketch(), 1e-9).unwrap();
        assert!(result.passed(), "mismatched: {:?}", result.mismatched);
        assert_eq!(result.exported, 2);
    }

    #[test]
    fn test_round_trip_detects_detached_write_back() {
        let registry = HandlerRegistry::standard(ConversionContext::detached());
        let result = verify_round_trip(&registry, &sketch(), 1e-9).unwrap();
        assert_eq!(result.mismatched, vec!["Geometry".to_string()]);
    }

    #[test]
    fn test_document_keeps_extra_keys() {
        let raw = json!({
            "objects": [{"name": "Box", "shape": "Part::Box", "parameters": {"Length": 1.0}}],
            "options": {},
            "metadata": {"author": "x"}
        });
        let doc: JcadDocument = serde_json::from_value(raw).unwrap();

        assert!(doc.object("Box").unwrap().visible);
        assert!(doc.extra.contains_key("metadata"));
        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["metadata"]["author"], json!("x"));
    }
}
