//! `bosun init` - mark a directory as the workspace root.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::workspace::CONFIG_FILE_NAME;
use crate::util::config::Config;
use crate::util::fs;

/// Write a starter `bosun.toml` at `dir`.
///
/// Refuses to overwrite an existing config.
pub fn init_workspace(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        bail!(
            "{} already exists at {}\n\
             help: edit the existing file instead",
            CONFIG_FILE_NAME,
            path.display()
        );
    }

    fs::write_string(&path, Config::starter_toml())?;
    Ok(path)
}
