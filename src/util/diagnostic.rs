//! User-friendly diagnostic messages.
//!
//! Every reported problem carries the root cause, the declaration it came
//! from, and a suggested fix where one can be computed.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use serde::Serialize;
use thiserror::Error;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no workspace root is found.
    pub const NO_WORKSPACE: &str = "help: Run `bosun init` at the repository root";

    /// Suggestion when an address does not name a declared target.
    pub const TARGET_NOT_FOUND: &str = "help: Run `bosun list` to see declared targets";

    /// Suggestion when a sources glob matches nothing.
    pub const EMPTY_GLOB: &str =
        "help: Fix the pattern, or delete it if the files are gone";

    /// Suggestion when two sibling targets claim the same file.
    pub const AMBIGUOUS_OWNER: &str =
        "help: Add a `!` exclusion to one of the targets so each file has one owner";

    /// Suggestion when the dependency graph has a cycle.
    pub const DEPENDENCY_CYCLE: &str =
        "help: Break the cycle by extracting the shared code into its own target";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
            Severity::Help => write!(f, "help"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
                Severity::Note => "\x1b[1;36mnote\x1b[0m",
                Severity::Help => "\x1b[1;32mhelp\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Note => "note",
                Severity::Help => "help",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        for suggestion in &self.suggestions {
            output.push_str(&format!("  {}\n", suggestion));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Unresolved dependency reference.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("`{from}` depends on `{spec}`, which is not a declared target")]
#[diagnostic(code(bosun::graph::unresolved_dependency))]
pub struct UnresolvedDependencyError {
    pub from: String,
    pub spec: String,
    #[help]
    pub suggestion: Option<String>,
}

/// Dependency cycle error.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("dependency cycle: {path}")]
#[diagnostic(
    code(bosun::graph::cycle),
    help("Break the cycle by extracting the shared code into its own target")
)]
pub struct DependencyCycleError {
    /// The cycle rendered as `//a:a -> //b:b -> //a:a`.
    pub path: String,
}

/// Two sibling targets claim the same source file.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("`{file}` is claimed by more than one target in {dir}")]
#[diagnostic(
    code(bosun::sources::ambiguous_owner),
    help("Add a `!` exclusion so each file has exactly one owner")
)]
pub struct AmbiguousOwnerError {
    pub dir: String,
    pub file: String,
    pub owners: Vec<String>,
}
