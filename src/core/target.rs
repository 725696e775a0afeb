//! Target declarations.
//!
//! A target is a named, declarative build unit: a kind, a set of source
//! globs, dependency references, and packaging metadata. Targets are read
//! at analysis time and never mutated.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::util::InternedString;

/// The kind of build unit a target declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Code owned and compiled/imported as a unit
    #[serde(alias = "lib")]
    Library,

    /// A packaged artifact assembled from other targets
    #[serde(alias = "dist")]
    Distribution,

    /// Files bundled verbatim
    #[serde(alias = "resource")]
    Resources,

    /// A test suite
    #[serde(alias = "tests")]
    Test,
}

impl TargetKind {
    /// Canonical spelling used in build files and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Library => "library",
            TargetKind::Distribution => "distribution",
            TargetKind::Resources => "resources",
            TargetKind::Test => "test",
        }
    }

    /// Whether targets of this kind own source files.
    pub fn owns_sources(&self) -> bool {
        !matches!(self, TargetKind::Distribution)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "library" | "lib" => Ok(TargetKind::Library),
            "distribution" | "dist" => Ok(TargetKind::Distribution),
            "resources" | "resource" => Ok(TargetKind::Resources),
            "test" | "tests" => Ok(TargetKind::Test),
            other => bail!(
                "unknown target kind `{}`\n\
                 help: expected one of library, distribution, resources, test",
                other
            ),
        }
    }
}

/// A declared build target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Target {
    /// Target name (the `[targets.<name>]` key, set after parsing)
    #[serde(skip)]
    pub name: InternedString,

    /// What kind of unit this declares
    pub kind: TargetKind,

    /// Source globs relative to the build-file directory; a leading `!`
    /// marks an exclusion
    #[serde(default)]
    pub sources: Vec<String>,

    /// References to other targets (`//dir:name`, `//dir`, or `:name`)
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Entry-point group -> `module:symbol` (distributions only)
    #[serde(default)]
    pub entry_points: BTreeMap<String, String>,

    /// Native-extension module markers (distributions only)
    #[serde(default)]
    pub ext_modules: Vec<String>,

    /// Free-form tags for filtering
    #[serde(default)]
    pub tags: Vec<String>,

    /// Test timeout in seconds (tests only)
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Target {
    /// Create a new target with the given name and kind.
    pub fn new(name: impl Into<InternedString>, kind: TargetKind) -> Self {
        Target {
            name: name.into(),
            kind,
            sources: Vec::new(),
            dependencies: Vec::new(),
            entry_points: BTreeMap::new(),
            ext_modules: Vec::new(),
            tags: Vec::new(),
            timeout: None,
        }
    }

    /// Create a new library target.
    pub fn library(name: impl Into<InternedString>) -> Self {
        Self::new(name, TargetKind::Library)
    }

    /// Create a new distribution target.
    pub fn distribution(name: impl Into<InternedString>) -> Self {
        Self::new(name, TargetKind::Distribution)
    }

    /// Create a new resources target.
    pub fn resources(name: impl Into<InternedString>) -> Self {
        Self::new(name, TargetKind::Resources)
    }

    /// Create a new test target.
    pub fn test(name: impl Into<InternedString>) -> Self {
        Self::new(name, TargetKind::Test)
    }

    /// Set source patterns.
    pub fn with_sources(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sources = patterns.into_iter().map(|p| p.into()).collect();
        self
    }

    /// Set dependency references.
    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dependencies = deps.into_iter().map(|d| d.into()).collect();
        self
    }

    /// Set tags.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(|t| t.into()).collect();
        self
    }

    /// Set the test timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Split `sources` into inclusion and exclusion patterns.
    pub fn source_patterns(&self) -> (Vec<&str>, Vec<&str>) {
        let mut includes = Vec::new();
        let mut excludes = Vec::new();
        for pattern in &self.sources {
            match pattern.strip_prefix('!') {
                Some(exclude) => excludes.push(exclude),
                None => includes.push(pattern.as_str()),
            }
        }
        (includes, excludes)
    }

    /// Check if this target carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Validate kind/attribute rules.
    ///
    /// Checks that:
    /// - sourced kinds declare at least one inclusion pattern
    /// - distributions have no sources but at least one dependency
    /// - `entry_points`/`ext_modules` appear only on distributions
    /// - `timeout` appears only on tests, and is positive
    /// - patterns stay inside the build-file directory
    pub fn validate(&self) -> Result<()> {
        let (includes, _) = self.source_patterns();

        match self.kind {
            TargetKind::Distribution => {
                if !self.sources.is_empty() {
                    bail!(
                        "distribution `{}` must not declare sources\n\
                         help: distributions package the targets they depend on",
                        self.name
                    );
                }
                if self.dependencies.is_empty() {
                    bail!(
                        "distribution `{}` has nothing to package\n\
                         help: add the targets to bundle to `dependencies`",
                        self.name
                    );
                }
            }
            _ => {
                if includes.is_empty() {
                    bail!(
                        "{} `{}` declares no source patterns\n\
                         help: add at least one non-`!` pattern to `sources`",
                        self.kind,
                        self.name
                    );
                }
            }
        }

        if self.kind != TargetKind::Distribution {
            if !self.entry_points.is_empty() {
                bail!(
                    "`entry_points` is only valid on distributions, but `{}` is a {}",
                    self.name,
                    self.kind
                );
            }
            if !self.ext_modules.is_empty() {
                bail!(
                    "`ext_modules` is only valid on distributions, but `{}` is a {}",
                    self.name,
                    self.kind
                );
            }
        }

        match self.timeout {
            Some(_) if self.kind != TargetKind::Test => bail!(
                "`timeout` is only valid on tests, but `{}` is a {}",
                self.name,
                self.kind
            ),
            Some(0) => bail!("test `{}` has a zero timeout", self.name),
            _ => {}
        }

        for pattern in &self.sources {
            let raw = pattern.strip_prefix('!').unwrap_or(pattern);
            if raw.starts_with('/') || raw.split('/').any(|seg| seg == "..") {
                bail!(
                    "target `{}` has source pattern `{}` that escapes its directory\n\
                     help: patterns are relative to the build file and may not use `..`",
                    self.name,
                    pattern
                );
            }
        }

        Ok(())
    }
}
