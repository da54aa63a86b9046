// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! File-level conversion runner

use crate::document::{
    apply_object, export_object, load_document, load_snapshot, save_document, save_snapshot,
    verify_round_trip, ApplyReport, JcadDocument, RoundTrip,
};
use crate::props::HandlerRegistry;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Extension of written JCAD documents
pub const JCAD_EXTENSION: &str = "jcad";

/// Result of exporting one snapshot file
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub objects: usize,
    pub parameters: usize,
    pub duration: Duration,
}

/// Runs conversions against files with a shared registry
pub struct Runner<'a> {
    registry: &'a HandlerRegistry,
    pretty: bool,
}

impl<'a> Runner<'a> {
    pub fn new(registry: &'a HandlerRegistry) -> Self {
        Self {
            registry,
            pretty: true,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Convert a snapshot file into a JCAD document
    pub fn export_file(&self, input: &Path, output: &Path) -> Result<ExportOutcome> {
        let start = Instant::now();

        let objects = load_snapshot(input)?;
        let exported = objects
            .iter()
            .map(|object| export_object(self.registry, object))
            .collect::<Result<Vec<_>>>()?;
        let parameters = exported.iter().map(|o| o.parameters.len()).sum();

        let mut extra = Map::new();
        extra.insert("options".into(), Value::Object(Map::new()));
        extra.insert("metadata".into(), Value::Object(Map::new()));
        let document = JcadDocument {
            objects: exported,
            extra,
        };
        save_document(&document, output, self.pretty)?;

        tracing::info!(input = %input.display(), output = %output.display(), "exported");
        Ok(ExportOutcome {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            objects: objects.len(),
            parameters,
            duration: start.elapsed(),
        })
    }

    /// Export every snapshot under `dir` in parallel.
    ///
    /// With `out_dir`, outputs mirror the layout below `dir` so that
    /// same-named snapshots in different subdirectories stay distinct.
    /// Failures are reported per file and do not stop the batch.
    pub fn export_dir(
        &self,
        dir: &Path,
        out_dir: Option<&Path>,
    ) -> Result<Vec<(PathBuf, Result<ExportOutcome>)>> {
        let inputs = discover_snapshots(dir);
        if let Some(out_dir) = out_dir {
            std::fs::create_dir_all(out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;
        }

        Ok(inputs
            .into_par_iter()
            .map(|input| {
                let output = match out_dir {
                    Some(out_dir) => mirrored_output_path(&input, dir, out_dir),
                    None => output_path(&input, None),
                };
                let result =
                    create_parent(&output).and_then(|_| self.export_file(&input, &output));
                (input, result)
            })
            .collect())
    }

    /// Apply a JCAD document onto a snapshot, writing the updated snapshot
    pub fn apply_file(
        &self,
        document: &Path,
        snapshot: &Path,
        output: &Path,
    ) -> Result<Vec<(String, ApplyReport)>> {
        let document = load_document(document)?;
        let mut objects = load_snapshot(snapshot)?;

        let mut reports = Vec::new();
        for object in &mut objects {
            match document.object(&object.name) {
                Some(jcad) => {
                    let report = apply_object(self.registry, jcad, object)?;
                    reports.push((object.name.clone(), report));
                }
                None => tracing::warn!(object = %object.name, "not present in document"),
            }
        }

        save_snapshot(&objects, output, self.pretty)?;
        Ok(reports)
    }

    /// Round-trip every object of a snapshot
    pub fn check_file(&self, input: &Path, tolerance: f64) -> Result<Vec<RoundTrip>> {
        load_snapshot(input)?
            .iter()
            .map(|object| verify_round_trip(self.registry, object, tolerance))
            .collect()
    }
}

/// Snapshot files (`*.json`) under `dir`, sorted
pub fn discover_snapshots(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort();
    files
}

/// `input` with a `.jcad` extension, inside `out_dir` when given
pub fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let renamed = input.with_extension(JCAD_EXTENSION);
    match (out_dir, renamed.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => renamed,
    }
}

/// `input` relocated from `root` into `out_dir`, with a `.jcad` extension
pub fn mirrored_output_path(input: &Path, root: &Path, out_dir: &Path) -> PathBuf {
    match input.strip_prefix(root) {
        Ok(relative) => out_dir.join(relative).with_extension(JCAD_EXTENSION),
        Err(_) => output_path(input, Some(out_dir)),
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}
