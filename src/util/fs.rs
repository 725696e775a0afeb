//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Expand a single glob pattern relative to a base directory.
///
/// Returns base-relative paths of matching *files*, sorted. Matches that
/// resolve to directories are dropped. The pattern itself is trusted to be
/// base-relative; callers reject absolute and `..` patterns up front.
pub fn glob_files(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = base.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let mut results = Vec::new();
    for entry in glob(&pattern_str)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
    {
        let path = entry.with_context(|| format!("failed to expand glob: {}", pattern))?;
        if path.is_file() {
            if let Ok(rel) = path.strip_prefix(base) {
                results.push(rel.to_path_buf());
            }
        }
    }

    results.sort();
    Ok(results)
}

/// Render a path with forward slashes regardless of platform.
///
/// Addresses and ownership keys are workspace-relative and must compare
/// equal across platforms.
pub fn portable_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}
