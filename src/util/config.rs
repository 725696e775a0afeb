//! Root configuration (`bosun.toml`) support.
//!
//! The config file doubles as the workspace-root marker: the nearest
//! ancestor directory containing one is the workspace root. Every key is
//! optional; an empty file is a valid workspace.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Bosun workspace configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace scanning settings
    pub workspace: WorkspaceSettings,

    /// Tailor heuristics
    pub tailor: TailorSettings,
}

/// Settings from the `[workspace]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Root-relative glob patterns for directories to skip while scanning
    /// (e.g. `vendor/**`). VCS metadata directories are always skipped.
    pub ignore: Vec<String>,
}

/// Settings from the `[tailor]` section, driving target suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TailorSettings {
    /// File extensions treated as code (without the dot).
    pub source_extensions: Vec<String>,

    /// Filename suffixes that mark a file as a test.
    pub test_suffixes: Vec<String>,

    /// File extensions treated as bundled resources.
    pub resource_extensions: Vec<String>,
}

impl Default for TailorSettings {
    fn default() -> Self {
        TailorSettings {
            source_extensions: vec!["py".to_string()],
            test_suffixes: vec!["_test.py".to_string()],
            resource_extensions: vec!["json".to_string(), "txt".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// The commented starter config written by `bosun init`.
    pub fn starter_toml() -> &'static str {
        r#"# Bosun workspace root.
# Every key is optional; delete what you don't need.

[workspace]
# Root-relative globs for directories to skip while scanning.
ignore = []

[tailor]
# Heuristics for `bosun tailor` target suggestions.
source_extensions = ["py"]
test_suffixes = ["_test.py"]
resource_extensions = ["json", "txt"]
"#
    }
}
