// File: src/config.rs
// Purpose: Configuration parsing from route-manifest.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::logging::LogLevel;
use crate::route::{Resolver, DEFAULT_MAX_FALLBACK_DEPTH};
use crate::table::RouteTable;

/// Default config file name
pub const CONFIG_FILE: &str = "route-manifest.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub manifest: ManifestConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the snapshot lives and how it is resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Snapshot JSON written by the site build (default: "dist/manifest.json")
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    /// Nesting limit for redirect and fallback routes
    #[serde(default = "default_max_fallback_depth")]
    pub max_fallback_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
}

// Default values
fn default_snapshot_path() -> String {
    "dist/manifest.json".to_string()
}

fn default_max_fallback_depth() -> usize {
    DEFAULT_MAX_FALLBACK_DEPTH
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            max_fallback_depth: default_max_fallback_depth(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing or empty file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from the default path (./route-manifest.toml)
    pub fn load_default() -> Result<Self> {
        Self::load(CONFIG_FILE)
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new().with_max_depth(self.manifest.max_fallback_depth)
    }

    /// Loads the configured snapshot and builds the route table
    pub fn build_table(&self) -> Result<RouteTable> {
        let snapshot = crate::snapshot::ManifestSnapshot::load(&self.manifest.snapshot_path)?;
        RouteTable::build_with(snapshot, &self.resolver()).with_context(|| {
            format!(
                "Failed to build route table from {:?}",
                self.manifest.snapshot_path
            )
        })
    }
}
