//! Test fixtures for common test scenarios.
//!
//! `WorkspaceFixture` declares a workspace layout in memory and
//! materializes it into a temp directory: a root `bosun.toml`, any number
//! of build files, and the source files their globs should match.

use std::path::PathBuf;

use tempfile::TempDir;

use crate::core::workspace::CONFIG_FILE_NAME;

/// Declarative workspace layout for tests.
#[derive(Debug, Clone)]
pub struct WorkspaceFixture {
    /// Root bosun.toml content
    config: String,
    /// (workspace-relative path, content)
    files: Vec<(PathBuf, String)>,
}

impl WorkspaceFixture {
    /// An empty workspace with a default (empty) root config.
    pub fn new() -> Self {
        WorkspaceFixture {
            config: String::new(),
            files: Vec::new(),
        }
    }

    /// Replace the root config content.
    pub fn with_config(mut self, contents: impl Into<String>) -> Self {
        self.config = contents.into();
        self
    }

    /// Add a BUILD.toml under `dir` (workspace-relative, empty for root).
    pub fn with_build_file(mut self, dir: &str, contents: impl Into<String>) -> Self {
        let path = if dir.is_empty() {
            PathBuf::from("BUILD.toml")
        } else {
            PathBuf::from(dir).join("BUILD.toml")
        };
        self.files.push((path, contents.into()));
        self
    }

    /// Add an arbitrary file.
    pub fn with_source(mut self, path: &str, contents: impl Into<String>) -> Self {
        self.files.push((PathBuf::from(path), contents.into()));
        self
    }

    /// Write the layout into a fresh temp directory.
    pub fn materialize(&self) -> TempDir {
        let tmp = TempDir::new().expect("failed to create temp dir");
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), &self.config)
            .expect("failed to write config");

        for (path, contents) in &self.files {
            let full = tmp.path().join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).expect("failed to create fixture dirs");
            }
            std::fs::write(&full, contents).expect("failed to write fixture file");
        }

        tmp
    }
}

impl Default for WorkspaceFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materializes_nested_layout() {
        let tmp = WorkspaceFixture::new()
            .with_build_file("src/base", "[targets.base]\nkind = \"library\"\nsources = [\"*.py\"]\n")
            .with_source("src/base/base.py", "x = 1\n")
            .materialize();

        assert!(tmp.path().join("bosun.toml").is_file());
        assert!(tmp.path().join("src/base/BUILD.toml").is_file());
        assert!(tmp.path().join("src/base/base.py").is_file());
    }
}
