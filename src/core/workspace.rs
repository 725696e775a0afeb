//! Workspace scanning.
//!
//! The workspace root is the directory holding `bosun.toml`. A scan walks
//! the tree, collects every `BUILD.toml`, parses them in parallel, and
//! indexes the declared targets by address. Parse failures are collected
//! rather than aborting the scan so `check` can report all of them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use glob::Pattern;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::core::address::Address;
use crate::core::build_file::{BuildFile, BUILD_FILE_NAME};
use crate::core::target::Target;
use crate::util::config::Config;
use crate::util::fs::portable_path;

/// Workspace-root marker and configuration file.
pub const CONFIG_FILE_NAME: &str = "bosun.toml";

/// Directories never scanned.
const ALWAYS_IGNORED: &[&str] = &[".git", ".hg", ".bosun"];

/// A build file that failed to parse.
#[derive(Debug)]
pub struct ParseFailure {
    /// Path of the broken file
    pub path: PathBuf,
    /// Rendered cause chain
    pub message: String,
}

/// The scanned workspace: every build file plus an address index.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
    build_files: Vec<BuildFile>,
    /// address -> (build_files index, targets index within the file)
    index: BTreeMap<Address, (usize, usize)>,
    failures: Vec<ParseFailure>,
}

impl Workspace {
    /// Scan and index the workspace rooted at `root`.
    pub fn load(root: &Path, config: Config) -> Result<Self> {
        let ignore = compile_ignores(&config)?;
        let paths = collect_build_files(root, &ignore);

        let mut parsed: Vec<Result<BuildFile, ParseFailure>> = paths
            .par_iter()
            .map(|path| {
                BuildFile::load(path, root).map_err(|e| ParseFailure {
                    path: path.clone(),
                    message: format!("{:#}", e),
                })
            })
            .collect();

        let mut build_files = Vec::new();
        let mut failures = Vec::new();
        for result in parsed.drain(..) {
            match result {
                Ok(bf) => build_files.push(bf),
                Err(failure) => failures.push(failure),
            }
        }

        // Deterministic order regardless of parse parallelism.
        build_files.sort_by(|a, b| a.dir().cmp(b.dir()));

        let mut index = BTreeMap::new();
        for (fi, bf) in build_files.iter().enumerate() {
            for (ti, target) in bf.targets().iter().enumerate() {
                // One file per directory and unique names per file make
                // address collisions impossible.
                index.insert(bf.address_of(target), (fi, ti));
            }
        }

        Ok(Workspace {
            root: root.to_path_buf(),
            config,
            build_files,
            index,
            failures,
        })
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The loaded root configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All parsed build files, ordered by directory.
    pub fn build_files(&self) -> &[BuildFile] {
        &self.build_files
    }

    /// Build files that failed to parse.
    pub fn failures(&self) -> &[ParseFailure] {
        &self.failures
    }

    /// Look up a declared target by address.
    pub fn get(&self, address: &Address) -> Option<&Target> {
        self.index
            .get(address)
            .map(|&(fi, ti)| &self.build_files[fi].targets()[ti])
    }

    /// The build file governing `dir`, if any.
    pub fn build_file_for(&self, dir: &str) -> Option<&BuildFile> {
        self.build_files.iter().find(|bf| bf.dir() == dir)
    }

    /// Iterate every declared target with its address, in address order.
    pub fn targets(&self) -> impl Iterator<Item = (Address, &Target)> {
        self.index
            .iter()
            .map(|(addr, &(fi, ti))| (*addr, &self.build_files[fi].targets()[ti]))
    }

    /// All declared addresses, sorted.
    pub fn addresses(&self) -> Vec<Address> {
        self.index.keys().copied().collect()
    }

    /// Number of declared targets.
    pub fn target_count(&self) -> usize {
        self.index.len()
    }
}

fn compile_ignores(config: &Config) -> Result<Vec<Pattern>> {
    config
        .workspace
        .ignore
        .iter()
        .map(|p| {
            Pattern::new(p)
                .map_err(|e| anyhow::anyhow!("invalid ignore pattern `{}` in {}: {}", p, CONFIG_FILE_NAME, e))
        })
        .collect()
}

fn collect_build_files(root: &Path, ignore: &[Pattern]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            if entry.file_type().is_dir() && ALWAYS_IGNORED.contains(&name.as_ref()) {
                return false;
            }
            let rel = match entry.path().strip_prefix(root) {
                Ok(rel) => portable_path(rel),
                Err(_) => return true,
            };
            !ignore.iter().any(|p| p.matches(&rel))
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file() && entry.file_name().to_string_lossy() == BUILD_FILE_NAME
        })
        .map(|entry| entry.into_path())
        .collect();

    paths.sort();
    paths
}
