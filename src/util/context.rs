//! Global context for bosun operations.
//!
//! Provides centralized access to the current directory, workspace-root
//! discovery, and the loaded configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::workspace::CONFIG_FILE_NAME;
use crate::util::config::Config;
use crate::util::diagnostic::suggestions;

/// Process-wide context: cwd, workspace root, configuration.
#[derive(Debug)]
pub struct GlobalContext {
    cwd: PathBuf,
    root: Option<PathBuf>,
    config: Config,
}

impl GlobalContext {
    /// Create a context rooted at the current working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to determine current directory")?;
        Ok(Self::at(cwd))
    }

    /// Create a context rooted at an explicit directory.
    pub fn at(cwd: PathBuf) -> Self {
        let root = find_root(&cwd);
        let config = match &root {
            Some(root) => Config::load_or_default(&root.join(CONFIG_FILE_NAME)),
            None => Config::default(),
        };

        GlobalContext { cwd, root, config }
    }

    /// The directory bosun was invoked from.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The workspace root, if one was found.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// The workspace root, or an actionable error.
    pub fn require_root(&self) -> Result<&Path> {
        self.root.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "could not find {} in {} or any parent directory\n{}",
                CONFIG_FILE_NAME,
                self.cwd.display(),
                suggestions::NO_WORKSPACE
            )
        })
    }

    /// The loaded configuration (defaults outside a workspace).
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Walk upward from `start` looking for the workspace marker.
pub fn find_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(CONFIG_FILE_NAME).is_file() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
