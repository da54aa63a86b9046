// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Field access on serialized mappings

use crate::error::{describe, PropError, Result};
use crate::native::{NativeKernel, Vector};
use serde_json::{Map, Value};

/// Read a numeric field
pub(crate) fn read_f64(map: &Map<String, Value>, type_tag: &str, field: &'static str) -> Result<f64> {
    let value = map.get(field).ok_or_else(|| PropError::MissingField {
        type_id: type_tag.into(),
        field,
    })?;

    value.as_f64().ok_or_else(|| PropError::InvalidField {
        type_id: type_tag.into(),
        field,
        found: describe(value),
    })
}

/// Read three numeric fields and build a native vector from them
pub(crate) fn read_vector(
    map: &Map<String, Value>,
    type_tag: &str,
    keys: [&'static str; 3],
    kernel: &dyn NativeKernel,
) -> Result<Vector> {
    let [x, y, z] = keys;
    Ok(kernel.vector(
        read_f64(map, type_tag, x)?,
        read_f64(map, type_tag, y)?,
        read_f64(map, type_tag, z)?,
    ))
}

pub(crate) fn write_vector(map: &mut Map<String, Value>, keys: [&'static str; 3], v: &Vector) {
    for (key, component) in keys.iter().zip(v.iter()) {
        map.insert((*key).into(), Value::from(*component));
    }
}
