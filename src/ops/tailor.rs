//! `bosun tailor` - propose declarations for unowned sources.
//!
//! Walks the workspace for recognized files that no declared target owns,
//! groups them by directory, and proposes putative targets: test files
//! become a `test` target, other code a `library`, recognized data files
//! a `resources` target. Proposals are printed as the stanzas that would
//! be added; `--write` appends them to the build files with toml_edit so
//! existing content and formatting survive.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use glob::Pattern;
use toml_edit::{value, Array, DocumentMut, Item, Table};
use walkdir::WalkDir;

use crate::core::build_file::BUILD_FILE_NAME;
use crate::core::owners::SourceIndex;
use crate::core::target::TargetKind;
use crate::core::workspace::{Workspace, CONFIG_FILE_NAME};
use crate::util::fs::portable_path;

/// A proposed target, not yet written to a build file.
#[derive(Debug, Clone)]
pub struct PutativeTarget {
    /// Workspace-relative directory of the build file to extend
    pub dir: String,
    pub name: String,
    pub kind: TargetKind,
    /// Source globs the proposal would declare
    pub sources: Vec<String>,
    /// The unowned files that triggered the proposal
    pub triggering: Vec<String>,
}

impl PutativeTarget {
    /// The address the proposal would declare.
    pub fn address(&self) -> String {
        format!("//{}:{}", self.dir, self.name)
    }
}

/// Compute putative targets for every unowned recognized file.
pub fn tailor(ws: &Workspace, index: &SourceIndex) -> Result<Vec<PutativeTarget>> {
    let settings = &ws.config().tailor;
    let ignore: Vec<Pattern> = ws
        .config()
        .workspace
        .ignore
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    // dir -> (kind bucket -> directory-relative files)
    let mut buckets: BTreeMap<String, BTreeMap<TargetKind, Vec<String>>> = BTreeMap::new();

    for entry in WalkDir::new(ws.root())
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if e.file_type().is_dir() && name.starts_with('.') {
                return false;
            }
            match e.path().strip_prefix(ws.root()) {
                Ok(rel) => !ignore.iter().any(|p| p.matches(&portable_path(rel))),
                Err(_) => true,
            }
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name == BUILD_FILE_NAME || file_name == CONFIG_FILE_NAME {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(ws.root()) else {
            continue;
        };
        let rel_str = portable_path(rel);
        if index.is_owned(&rel_str) {
            continue;
        }

        let Some(kind) = classify(&file_name, settings) else {
            continue;
        };

        let dir = rel
            .parent()
            .map(|p| portable_path(p))
            .unwrap_or_default();
        buckets
            .entry(dir)
            .or_default()
            .entry(kind)
            .or_default()
            .push(file_name);
    }

    let mut proposals = Vec::new();
    for (dir, kinds) in buckets {
        // Names already declared in the build file, plus names assigned to
        // earlier proposals for the same directory.
        let mut taken: Vec<String> = ws
            .build_file_for(&dir)
            .map(|bf| bf.targets().iter().map(|t| t.name.to_string()).collect())
            .unwrap_or_default();

        for (kind, mut files) in kinds {
            files.sort();
            let base_name = match kind {
                TargetKind::Library => default_library_name(&dir),
                TargetKind::Test => "tests".to_string(),
                TargetKind::Resources => "assets".to_string(),
                TargetKind::Distribution => continue,
            };
            let name = disambiguate(&base_name, &taken);
            taken.push(name.clone());
            let sources = proposed_sources(kind, &files, settings);
            proposals.push(PutativeTarget {
                dir: dir.clone(),
                name,
                kind,
                sources,
                triggering: files,
            });
        }
    }

    Ok(proposals)
}

fn classify(
    file_name: &str,
    settings: &crate::util::config::TailorSettings,
) -> Option<TargetKind> {
    if settings.test_suffixes.iter().any(|s| file_name.ends_with(s)) {
        return Some(TargetKind::Test);
    }
    let ext = file_name.rsplit('.').next()?;
    if settings.source_extensions.iter().any(|e| e == ext) {
        return Some(TargetKind::Library);
    }
    if settings.resource_extensions.iter().any(|e| e == ext) {
        return Some(TargetKind::Resources);
    }
    None
}

fn default_library_name(dir: &str) -> String {
    dir.rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("root")
        .to_string()
}

fn disambiguate(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|t| t == base) {
        return base.to_string();
    }
    for n in 0.. {
        let candidate = format!("{}{}", base, n);
        if !taken.iter().any(|t| t == &candidate) {
            return candidate;
        }
    }
    unreachable!()
}

fn proposed_sources(
    kind: TargetKind,
    files: &[String],
    settings: &crate::util::config::TailorSettings,
) -> Vec<String> {
    let mut patterns: Vec<String> = Vec::new();
    match kind {
        TargetKind::Test => {
            for suffix in &settings.test_suffixes {
                let pattern = format!("*{}", suffix);
                if files.iter().any(|f| f.ends_with(suffix.as_str())) {
                    patterns.push(pattern);
                }
            }
        }
        _ => {
            let mut exts: Vec<&str> =
                files.iter().filter_map(|f| f.rsplit('.').next()).collect();
            exts.sort();
            exts.dedup();
            for ext in exts {
                patterns.push(format!("*.{}", ext));
            }
            if kind == TargetKind::Library {
                for suffix in &settings.test_suffixes {
                    patterns.push(format!("!*{}", suffix));
                }
            }
        }
    }
    patterns
}

/// Render the stanzas the proposals would add, grouped by build file.
pub fn render_stanzas(proposals: &[PutativeTarget]) -> String {
    let mut out = String::new();
    let mut current_dir: Option<&str> = None;

    for proposal in proposals {
        if current_dir != Some(proposal.dir.as_str()) {
            if current_dir.is_some() {
                out.push('\n');
            }
            let display_dir = if proposal.dir.is_empty() {
                BUILD_FILE_NAME.to_string()
            } else {
                format!("{}/{}", proposal.dir, BUILD_FILE_NAME)
            };
            out.push_str(&format!("# {}\n", display_dir));
            current_dir = Some(&proposal.dir);
        }
        out.push_str(&stanza_toml(proposal));
    }

    out
}

fn stanza_toml(proposal: &PutativeTarget) -> String {
    let mut targets = Table::new();
    targets.set_implicit(true);
    targets.insert(&proposal.name, Item::Table(target_table(proposal)));

    let mut doc = DocumentMut::new();
    doc.insert("targets", Item::Table(targets));
    doc.to_string()
}

fn target_table(proposal: &PutativeTarget) -> Table {
    let mut table = Table::new();
    table.insert("kind", value(proposal.kind.as_str()));
    let mut sources = Array::new();
    for pattern in &proposal.sources {
        sources.push(pattern.as_str());
    }
    table.insert("sources", value(sources));
    table
}

fn append_target(doc: &mut DocumentMut, proposal: &PutativeTarget) -> Result<()> {
    let targets = doc
        .entry("targets")
        .or_insert(Item::Table(Table::new()))
        .as_table_mut()
        .ok_or_else(|| anyhow::anyhow!("`targets` is not a table in {}/BUILD.toml", proposal.dir))?;
    targets.set_implicit(true);
    targets.insert(&proposal.name, Item::Table(target_table(proposal)));
    Ok(())
}

/// Append the proposals to their build files, creating files as needed.
///
/// Returns the number of build files touched.
pub fn write_stanzas(ws: &Workspace, proposals: &[PutativeTarget]) -> Result<usize> {
    let mut by_dir: BTreeMap<&str, Vec<&PutativeTarget>> = BTreeMap::new();
    for proposal in proposals {
        by_dir.entry(&proposal.dir).or_default().push(proposal);
    }

    for (dir, group) in &by_dir {
        let path = build_file_path(ws.root(), dir);
        let mut doc = if path.exists() {
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?
                .parse::<DocumentMut>()
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            DocumentMut::new()
        };

        for proposal in group {
            append_target(&mut doc, proposal)?;
        }

        std::fs::write(&path, doc.to_string())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(by_dir.len())
}

fn build_file_path(root: &Path, dir: &str) -> std::path::PathBuf {
    if dir.is_empty() {
        root.join(BUILD_FILE_NAME)
    } else {
        root.join(dir).join(BUILD_FILE_NAME)
    }
}
