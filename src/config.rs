// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Conversion configuration

use crate::native::InMemoryKernel;
use crate::props::{ConversionContext, HandlerRegistry};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default config file looked up in the working directory
pub const CONFIG_FILE: &str = "jcad-fc.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Emit `TypeId` inside geometry mappings
    pub include_type_id: bool,
    /// Fail on unrecognized type identifiers instead of skipping them
    pub strict: bool,
    /// Run without a kernel; write-back of geometry becomes a no-op
    pub detached: bool,
    /// Tolerance for round-trip comparison
    pub tolerance: f64,
    /// Pretty-print written JSON
    pub pretty: bool,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            include_type_id: true,
            strict: false,
            detached: false,
            tolerance: 1e-9,
            pretty: true,
            log_filter: "info".into(),
        }
    }
}

impl ConvertConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ConvertConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `jcad-fc.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(strict) = std::env::var("JCAD_FC_STRICT") {
            self.strict = strict.parse().unwrap_or(self.strict);
        }

        if let Ok(include) = std::env::var("JCAD_FC_INCLUDE_TYPE_ID") {
            self.include_type_id = include.parse().unwrap_or(self.include_type_id);
        }

        if let Ok(detached) = std::env::var("JCAD_FC_DETACHED") {
            self.detached = detached.parse().unwrap_or(self.detached);
        }

        if let Ok(filter) = std::env::var("JCAD_FC_LOG") {
            self.log_filter = filter;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn context(&self) -> ConversionContext {
        let ctx = if self.detached {
            ConversionContext::detached()
        } else {
            ConversionContext::with_kernel(Arc::new(InMemoryKernel))
        };
        ctx.include_type_id(self.include_type_id).strict(self.strict)
    }

    pub fn build_registry(&self) -> HandlerRegistry {
        HandlerRegistry::standard(self.context())
    }
}
