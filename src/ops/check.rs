//! `bosun check` - validate the whole declaration set.
//!
//! Runs every structural check over the scanned workspace and returns a
//! report of findings rather than failing on the first problem: broken
//! build files, kind/attribute violations, unresolved dependency edges,
//! cycles, empty globs, and ambiguous source ownership.

use anyhow::Result;
use serde::Serialize;

use crate::core::address::Address;
use crate::core::graph::TargetGraph;
use crate::core::owners::{SourceFinding, SourceIndex};
use crate::core::workspace::Workspace;
use crate::util::diagnostic::{
    suggestions, AmbiguousOwnerError, DependencyCycleError, Diagnostic, Severity,
    UnresolvedDependencyError,
};

/// One problem found by `check`.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// Stable machine-readable code, e.g. `unresolved-dependency`
    pub code: &'static str,
    pub message: String,
    /// Workspace-relative build file, when the finding maps to one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// The full validation report.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub findings: Vec<Finding>,
    pub targets_checked: usize,
    pub build_files_checked: usize,
}

impl CheckReport {
    /// Whether any finding is an error.
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }
}

/// Run the full validation suite.
pub fn check(ws: &Workspace) -> Result<CheckReport> {
    let mut findings = Vec::new();

    for failure in ws.failures() {
        findings.push(Finding {
            severity: Severity::Error,
            code: "broken-build-file",
            message: failure.message.clone(),
            file: Some(failure.path.display().to_string()),
            address: None,
            suggestion: None,
        });
    }

    for bf in ws.build_files() {
        for (address, target) in bf.addressed_targets() {
            if let Err(e) = target.validate() {
                findings.push(Finding {
                    severity: Severity::Error,
                    code: "invalid-target",
                    message: format!("{:#}", e),
                    file: Some(bf.path().display().to_string()),
                    address: Some(address),
                    suggestion: None,
                });
            }
        }
    }

    let graph = TargetGraph::build(ws);
    for unresolved in graph.unresolved() {
        let (message, suggestion) = match &unresolved.parse_error {
            Some(parse_error) => (
                format!(
                    "`{}` has a malformed dependency `{}`: {}",
                    unresolved.from, unresolved.spec, parse_error
                ),
                None,
            ),
            None => {
                let error = UnresolvedDependencyError {
                    from: unresolved.from.to_string(),
                    spec: unresolved.spec.clone(),
                    suggestion: unresolved
                        .suggestion
                        .map(|s| format!("did you mean `{}`?", s)),
                };
                (error.to_string(), error.suggestion)
            }
        };
        findings.push(Finding {
            severity: Severity::Error,
            code: "unresolved-dependency",
            message,
            file: None,
            address: Some(unresolved.from),
            suggestion,
        });
    }

    for cycle in graph.cycles() {
        let mut rendered: Vec<String> = cycle.iter().map(|a| a.to_string()).collect();
        rendered.push(cycle[0].to_string());
        let error = DependencyCycleError {
            path: rendered.join(" -> "),
        };
        findings.push(Finding {
            severity: Severity::Error,
            code: "dependency-cycle",
            message: error.to_string(),
            file: None,
            address: Some(cycle[0]),
            suggestion: Some(suggestions::DEPENDENCY_CYCLE.to_string()),
        });
    }

    let index = SourceIndex::build(ws)?;
    for finding in index.findings() {
        findings.push(source_finding(finding));
    }

    findings.sort_by(|a, b| {
        (a.severity, &a.code, &a.address, &a.message)
            .cmp(&(b.severity, &b.code, &b.address, &b.message))
    });

    Ok(CheckReport {
        findings,
        targets_checked: ws.target_count(),
        build_files_checked: ws.build_files().len(),
    })
}

fn source_finding(finding: &SourceFinding) -> Finding {
    match finding {
        SourceFinding::EmptyGlob { address, pattern } => Finding {
            severity: Severity::Error,
            code: "empty-glob",
            message: format!("`{}` has source pattern `{}` that matches no files", address, pattern),
            file: None,
            address: Some(*address),
            suggestion: Some(suggestions::EMPTY_GLOB.to_string()),
        },
        SourceFinding::InvalidPattern {
            address,
            pattern,
            message,
        } => Finding {
            severity: Severity::Error,
            code: "invalid-pattern",
            message: format!("`{}` has invalid source pattern `{}`: {}", address, pattern, message),
            file: None,
            address: Some(*address),
            suggestion: None,
        },
        SourceFinding::AmbiguousOwner { dir, file, owners } => {
            let error = AmbiguousOwnerError {
                dir: format!("//{}", dir),
                file: file.clone(),
                owners: owners.iter().map(|a| a.to_string()).collect(),
            };
            Finding {
                severity: Severity::Error,
                code: "ambiguous-owner",
                message: format!("{}: {}", error, error.owners.join(", ")),
                file: None,
                address: None,
                suggestion: Some(suggestions::AMBIGUOUS_OWNER.to_string()),
            }
        }
    }
}

/// Render the report for the terminal.
pub fn format_report(report: &CheckReport, color: bool) -> String {
    let mut out = String::new();

    for finding in &report.findings {
        let mut diag = match finding.severity {
            Severity::Error => Diagnostic::error(finding.message.clone()),
            _ => Diagnostic::warning(finding.message.clone()),
        };
        if let Some(file) = &finding.file {
            diag = diag.with_location(file);
        }
        if let Some(suggestion) = &finding.suggestion {
            diag = diag.with_suggestion(format!("help: {}", suggestion.trim_start_matches("help: ")));
        }
        out.push_str(&diag.format(color));
    }

    if report.has_errors() {
        let errors = report
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        out.push_str(&format!(
            "\ncheck failed: {} error{} across {} build file{}\n",
            errors,
            if errors == 1 { "" } else { "s" },
            report.build_files_checked,
            if report.build_files_checked == 1 { "" } else { "s" },
        ));
    } else {
        out.push_str(&format!(
            "check passed: {} targets in {} build files\n",
            report.targets_checked, report.build_files_checked
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::WorkspaceFixture;
    use crate::util::config::Config;

    fn run(fixture: WorkspaceFixture) -> CheckReport {
        let tmp = fixture.materialize();
        let ws = Workspace::load(tmp.path(), Config::default()).unwrap();
        check(&ws).unwrap()
    }

    #[test]
    fn clean_workspace_passes() {
        let report = run(
            WorkspaceFixture::new()
                .with_build_file(
                    "lib",
                    r#"
[targets.lib]
kind = "library"
sources = ["*.py", "!*_test.py"]

[targets.tests]
kind = "test"
sources = ["*_test.py"]
dependencies = [":lib"]
timeout = 60
"#,
                )
                .with_source("lib/core.py", "")
                .with_source("lib/core_test.py", ""),
        );

        assert!(!report.has_errors(), "{:?}", report.findings);
        assert_eq!(report.targets_checked, 2);
        let rendered = format_report(&report, false);
        assert!(rendered.contains("check passed"));
    }

    #[test]
    fn all_problems_are_reported_together() {
        let report = run(
            WorkspaceFixture::new()
                .with_build_file("broken", "not toml [")
                .with_build_file(
                    "lib",
                    r#"
[targets.lib]
kind = "library"
sources = ["*.py"]
dependencies = ["//nowhere:nothing"]
timeout = 5
"#,
                )
                .with_source("lib/a.py", ""),
        );

        let codes: Vec<&str> = report.findings.iter().map(|f| f.code).collect();
        assert!(codes.contains(&"broken-build-file"));
        assert!(codes.contains(&"invalid-target"));
        assert!(codes.contains(&"unresolved-dependency"));
        assert!(report.has_errors());
    }

    #[test]
    fn unresolved_dependency_carries_suggestion() {
        let report = run(
            WorkspaceFixture::new()
                .with_build_file(
                    "lib",
                    "[targets.parsing]\nkind = \"library\"\nsources = [\"*.py\"]\n",
                )
                .with_build_file(
                    "app",
                    "[targets.app]\nkind = \"library\"\nsources = [\"*.py\"]\ndependencies = [\"//lib:parsin\"]\n",
                )
                .with_source("lib/a.py", "")
                .with_source("app/a.py", ""),
        );

        let finding = report
            .findings
            .iter()
            .find(|f| f.code == "unresolved-dependency")
            .unwrap();
        assert_eq!(
            finding.suggestion.as_deref(),
            Some("did you mean `//lib:parsing`?")
        );
    }

    #[test]
    fn report_serializes_to_json() {
        let report = run(
            WorkspaceFixture::new()
                .with_build_file(
                    "lib",
                    "[targets.lib]\nkind = \"library\"\nsources = [\"*.py\"]\n",
                )
                .with_source("lib/a.py", ""),
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["targets_checked"], 1);
        assert!(json["findings"].as_array().unwrap().is_empty());
    }
}
