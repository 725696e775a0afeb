//! Source ownership.
//!
//! Expanding a target's `sources` yields the files it owns: inclusion
//! globs minus `!` exclusions, matched relative to the build-file
//! directory. The index records every file's owners so `check` can flag
//! ambiguous sibling overlap, and `tailor` can find unowned files.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use anyhow::Result;
use glob::Pattern;
use rayon::prelude::*;

use crate::core::address::Address;
use crate::core::workspace::Workspace;
use crate::util::fs;

/// A problem discovered while expanding source globs.
#[derive(Debug, Clone)]
pub enum SourceFinding {
    /// An inclusion pattern matched no files.
    EmptyGlob { address: Address, pattern: String },

    /// A pattern failed to compile.
    InvalidPattern {
        address: Address,
        pattern: String,
        message: String,
    },

    /// Two sibling targets claim the same file.
    AmbiguousOwner {
        dir: String,
        /// Directory-relative file path
        file: String,
        owners: Vec<Address>,
    },
}

/// File-ownership index over the whole workspace.
#[derive(Debug)]
pub struct SourceIndex {
    /// workspace-relative file path -> owning targets
    owners: BTreeMap<String, Vec<Address>>,
    /// address -> workspace-relative owned files
    owned: BTreeMap<Address, BTreeSet<String>>,
    findings: Vec<SourceFinding>,
}

impl SourceIndex {
    /// Expand every target's sources and build the index.
    pub fn build(ws: &Workspace) -> Result<Self> {
        // Expansion hits the filesystem once per inclusion pattern, so
        // fan out per build file.
        let expansions: Vec<(Address, Result<Expansion>)> = ws
            .build_files()
            .par_iter()
            .flat_map_iter(|bf| {
                let dir_abs = ws.root().join(bf.dir());
                bf.addressed_targets()
                    .filter(|(_, t)| t.kind.owns_sources())
                    .map(move |(addr, target)| {
                        (addr, expand_target(&dir_abs, bf.dir(), target))
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let mut owners: BTreeMap<String, Vec<Address>> = BTreeMap::new();
        let mut owned: BTreeMap<Address, BTreeSet<String>> = BTreeMap::new();
        let mut findings = Vec::new();

        for (address, expansion) in expansions {
            let expansion = expansion?;
            for pattern in expansion.empty_patterns {
                findings.push(SourceFinding::EmptyGlob { address, pattern });
            }
            for (pattern, message) in expansion.bad_patterns {
                findings.push(SourceFinding::InvalidPattern {
                    address,
                    pattern,
                    message,
                });
            }
            for file in expansion.files {
                owners.entry(file.clone()).or_default().push(address);
                owned.entry(address).or_default().insert(file);
            }
        }

        // Sibling overlap: several targets in the same directory claiming
        // one file. A parent directory's recursive glob reaching into a
        // child's files is hierarchical ownership, not ambiguity.
        for (file, file_owners) in &owners {
            if file_owners.len() < 2 {
                continue;
            }
            let mut by_dir: BTreeMap<&str, Vec<Address>> = BTreeMap::new();
            for owner in file_owners {
                by_dir.entry(owner.dir()).or_default().push(*owner);
            }
            for (dir, siblings) in by_dir {
                if siblings.len() > 1 {
                    findings.push(SourceFinding::AmbiguousOwner {
                        dir: dir.to_string(),
                        file: file.clone(),
                        owners: siblings,
                    });
                }
            }
        }

        Ok(SourceIndex {
            owners,
            owned,
            findings,
        })
    }

    /// Problems found during expansion.
    pub fn findings(&self) -> &[SourceFinding] {
        &self.findings
    }

    /// Workspace-relative files owned by `address`, sorted.
    pub fn owned_files(&self, address: &Address) -> impl Iterator<Item = &str> {
        self.owned
            .get(address)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Whether any target owns the given workspace-relative file.
    pub fn is_owned(&self, rel_path: &str) -> bool {
        self.owners.contains_key(rel_path)
    }
}

struct Expansion {
    /// Workspace-relative matched files
    files: BTreeSet<String>,
    empty_patterns: Vec<String>,
    bad_patterns: Vec<(String, String)>,
}

fn expand_target(
    dir_abs: &std::path::Path,
    dir_rel: &str,
    target: &crate::core::target::Target,
) -> Result<Expansion> {
    let (includes, excludes) = target.source_patterns();

    let mut exclude_patterns = Vec::new();
    let mut bad_patterns = Vec::new();
    for pattern in excludes {
        match Pattern::new(pattern) {
            Ok(p) => exclude_patterns.push(p),
            Err(e) => bad_patterns.push((format!("!{}", pattern), e.to_string())),
        }
    }

    let mut files = BTreeSet::new();
    let mut empty_patterns = Vec::new();
    for pattern in includes {
        let matched: Vec<PathBuf> = match fs::glob_files(dir_abs, pattern) {
            Ok(matched) => matched,
            Err(e) => {
                bad_patterns.push((pattern.to_string(), format!("{:#}", e)));
                continue;
            }
        };

        // The empty-glob property is judged per inclusion pattern,
        // before exclusions apply.
        if matched.is_empty() {
            empty_patterns.push(pattern.to_string());
            continue;
        }

        for rel in matched {
            if exclude_patterns.iter().any(|p| p.matches_path(&rel)) {
                continue;
            }
            let local = fs::portable_path(&rel);
            let full = if dir_rel.is_empty() {
                local
            } else {
                format!("{}/{}", dir_rel, local)
            };
            files.insert(full);
        }
    }

    Ok(Expansion {
        files,
        empty_patterns,
        bad_patterns,
    })
}
