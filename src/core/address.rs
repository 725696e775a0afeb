//! Target addresses.
//!
//! Every declared target is identified by `//<dir>:<name>`, where `<dir>`
//! is the build-file directory relative to the workspace root (empty for
//! the root itself). Dependency lists may spell an address three ways:
//!
//! - `//path/to/dir:name` — absolute
//! - `//path/to/dir` — absolute, name defaults to the last path segment
//! - `:name` — sibling target in the same build file
//!
//! Addresses are workspace-relative and platform-independent: directory
//! components always use forward slashes.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::util::InternedString;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

/// Errors produced while parsing an address spelling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty address")]
    Empty,

    #[error("invalid target name `{name}` in `{spec}`: names match [A-Za-z0-9][A-Za-z0-9._-]*")]
    InvalidName { spec: String, name: String },

    #[error("invalid directory `{dir}` in `{spec}`: directories are workspace-relative and may not contain `.`, `..`, or backslashes")]
    InvalidDirectory { spec: String, dir: String },

    #[error("`{spec}` has no target name: use `//dir:name`, `//dir`, or `:name`")]
    MissingName { spec: String },
}

/// A fully resolved target address: directory plus target name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    dir: InternedString,
    name: InternedString,
}

impl Address {
    /// Construct an address from an already-validated directory and name.
    pub fn new(dir: impl Into<InternedString>, name: impl Into<InternedString>) -> Self {
        Address {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// Workspace-relative build-file directory (empty string for the root).
    pub fn dir(&self) -> &str {
        self.dir.as_str()
    }

    /// Target name within the directory.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Parse a dependency spelling relative to the build file at `current_dir`.
    pub fn parse_spec(spec: &str, current_dir: &str) -> Result<Self, AddressError> {
        if spec.is_empty() {
            return Err(AddressError::Empty);
        }

        // Sibling reference: `:name`.
        if let Some(name) = spec.strip_prefix(':') {
            validate_name(spec, name)?;
            return Ok(Address::new(current_dir, name));
        }

        let rest = spec.strip_prefix("//").ok_or_else(|| AddressError::InvalidDirectory {
            spec: spec.to_string(),
            dir: spec.to_string(),
        })?;

        let (dir, name) = match rest.split_once(':') {
            Some((dir, name)) => (dir, name),
            // `//path/to/dir` defaults the name to the last segment.
            None => {
                let name = rest.rsplit('/').next().unwrap_or("");
                if name.is_empty() {
                    return Err(AddressError::MissingName {
                        spec: spec.to_string(),
                    });
                }
                (rest, name)
            }
        };

        validate_dir(spec, dir)?;
        validate_name(spec, name)?;
        Ok(Address::new(dir, name))
    }

    /// Parse a user-supplied address from the command line.
    ///
    /// Accepts the canonical `//dir:name` spellings and, as a convenience,
    /// the same forms without the leading `//`.
    pub fn parse_cli(spec: &str) -> Result<Self, AddressError> {
        let canonical;
        let spec_ref = if spec.starts_with("//") || spec.starts_with(':') {
            spec
        } else {
            canonical = format!("//{}", spec);
            &canonical
        };
        Self::parse_spec(spec_ref, "")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "//{}:{}", self.dir, self.name)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Validate a target name against the name grammar.
pub fn validate_name(spec: &str, name: &str) -> Result<(), AddressError> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else if name.is_empty() {
        Err(AddressError::MissingName {
            spec: spec.to_string(),
        })
    } else {
        Err(AddressError::InvalidName {
            spec: spec.to_string(),
            name: name.to_string(),
        })
    }
}

fn validate_dir(spec: &str, dir: &str) -> Result<(), AddressError> {
    let invalid = dir.contains('\\')
        || dir.starts_with('/')
        || dir.ends_with('/')
        || dir
            .split('/')
            .any(|seg| seg.is_empty() && !dir.is_empty() || seg == "." || seg == "..");

    if invalid {
        Err(AddressError::InvalidDirectory {
            spec: spec.to_string(),
            dir: dir.to_string(),
        })
    } else {
        Ok(())
    }
}
