// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem

pub mod reporter;
pub mod runner;

pub use reporter::Reporter;
pub use runner::{discover_snapshots, mirrored_output_path, output_path, ExportOutcome, Runner};
