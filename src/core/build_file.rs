//! `BUILD.toml` parsing.
//!
//! One build file per directory, one `[targets.<name>]` table per target.
//! TOML rejects duplicate table keys, so per-file name uniqueness is a
//! parse-time guarantee; bosun additionally checks each key against the
//! address name grammar.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::address::{validate_name, Address};
use crate::core::target::Target;
use crate::util::{fs, InternedString};

/// Per-directory build file name.
pub const BUILD_FILE_NAME: &str = "BUILD.toml";

/// Raw build-file schema.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBuildFile {
    #[serde(default)]
    targets: BTreeMap<String, Target>,
}

/// A parsed build file and the targets it declares.
#[derive(Debug, Clone)]
pub struct BuildFile {
    /// Workspace-relative directory, forward slashes, empty for the root
    dir: InternedString,

    /// Absolute path to the file on disk
    path: PathBuf,

    /// Declared targets, in name order
    targets: Vec<Target>,
}

impl BuildFile {
    /// Load and validate the build file at `path`.
    ///
    /// `workspace_root` anchors the workspace-relative directory that
    /// becomes the address prefix of every declared target.
    pub fn load(path: &Path, workspace_root: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents, path, workspace_root)
    }

    /// Parse build-file contents (split out for tests).
    pub fn parse(contents: &str, path: &Path, workspace_root: &Path) -> Result<Self> {
        let raw: RawBuildFile = toml::from_str(contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if raw.targets.is_empty() {
            bail!(
                "{} declares no targets\n\
                 help: add a [targets.<name>] table or delete the file",
                path.display()
            );
        }

        let dir_path = path.parent().unwrap_or(Path::new(""));
        let rel = dir_path
            .strip_prefix(workspace_root)
            .unwrap_or(dir_path);
        let dir = InternedString::new(fs::portable_path(rel));

        let mut targets = Vec::with_capacity(raw.targets.len());
        for (name, mut target) in raw.targets {
            validate_name(&name, &name)
                .with_context(|| format!("invalid target name in {}", path.display()))?;
            target.name = InternedString::new(&name);
            targets.push(target);
        }

        Ok(BuildFile {
            dir,
            path: path.to_path_buf(),
            targets,
        })
    }

    /// Workspace-relative directory this file governs.
    pub fn dir(&self) -> &str {
        self.dir.as_str()
    }

    /// Path to the file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared targets, in name order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// The full address of one of this file's targets.
    pub fn address_of(&self, target: &Target) -> Address {
        Address::new(self.dir, target.name)
    }

    /// Iterate targets together with their addresses.
    pub fn addressed_targets(&self) -> impl Iterator<Item = (Address, &Target)> {
        self.targets.iter().map(|t| (self.address_of(t), t))
    }
}
