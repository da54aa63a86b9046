// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Conversion errors

use thiserror::Error;

/// Errors raised while converting a property in either direction
#[derive(Debug, Error)]
pub enum PropError {
    /// A mapping lacks a key the reverse conversion reads
    #[error("Missing field '{field}' in {type_id} mapping")]
    MissingField { type_id: String, field: &'static str },

    /// A key is present but does not hold a number
    #[error("Field '{field}' of {type_id} is not a number: {found}")]
    InvalidField {
        type_id: String,
        field: &'static str,
        found: String,
    },

    /// The serialized value has the wrong JSON shape
    #[error("Expected {expected} for {type_id}, got {found}")]
    InvalidShape {
        type_id: String,
        expected: &'static str,
        found: String,
    },

    /// The native object does not expose the interface its tag claims
    #[error("Native object does not implement {0}")]
    NativeMismatch(String),

    /// Serialized list is longer than the paired native list
    #[error("No native geometry at index {0}")]
    MissingTarget(usize),

    /// Unrecognized type identifier (strict mode only)
    #[error("Unknown type identifier: {0}")]
    UnknownType(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PropError>;

/// Short description of a JSON value's kind for error messages
pub(crate) fn describe(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".into(),
        serde_json::Value::Bool(_) => "boolean".into(),
        serde_json::Value::Number(n) => format!("number {}", n),
        serde_json::Value::String(s) => format!("string {:?}", s),
        serde_json::Value::Array(a) => format!("array of {}", a.len()),
        serde_json::Value::Object(_) => "object".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = PropError::MissingField {
            type_id: "Part::GeomCircle".into(),
            field: "Radius",
        };
        assert_eq!(
            err.to_string(),
            "Missing field 'Radius' in Part::GeomCircle mapping"
        );
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&json!(null)), "null");
        assert_eq!(describe(&json!([1, 2])), "array of 2");
        assert_eq!(describe(&json!("a")), "string \"a\"");
    }
}
