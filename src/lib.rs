// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! jcad-fc
//!
//! Property marshalling between a CAD kernel's native object model and the
//! JSON-based JCAD document format. Each property type has a handler that
//! converts in both directions; handlers are looked up by type identifier in
//! an immutable [`HandlerRegistry`].

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod native;
pub mod props;
pub mod sketch;
pub mod utils;

pub use config::ConvertConfig;
pub use document::{apply_object, export_object, verify_round_trip, JcadDocument, JcadObject};
pub use error::PropError;
pub use native::{NativeGeometry, NativeKernel, NativeObject, NativeProp, NativeTarget};
pub use props::{ConversionContext, HandlerRegistry, PropHandler};
pub use sketch::Sketch;

use anyhow::Result;
use std::path::Path;

/// Export every object of a snapshot file with the standard handlers
pub fn export_snapshot_file(path: impl AsRef<Path>) -> Result<Vec<JcadObject>> {
    let registry = ConvertConfig::default().build_registry();
    document::load_snapshot(path)?
        .iter()
        .map(|object| export_object(&registry, object))
        .collect()
}
