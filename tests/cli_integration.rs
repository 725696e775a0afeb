//! CLI integration tests for bosun.
//!
//! These tests verify the full CLI workflow from workspace init through
//! checking, querying, and tailoring declarations.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the bosun binary command.
fn bosun() -> Command {
    Command::cargo_bin("bosun").unwrap()
}

/// Create a temporary directory for test workspaces.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a file, creating parent directories.
fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A small two-directory workspace that passes `check`.
fn clean_workspace() -> TempDir {
    let tmp = temp_dir();
    write(tmp.path(), "bosun.toml", "");
    write(
        tmp.path(),
        "src/base/BUILD.toml",
        r#"
[targets.base]
kind = "library"
sources = ["*.py"]
tags = ["core"]
"#,
    );
    write(
        tmp.path(),
        "src/app/BUILD.toml",
        r#"
[targets.app]
kind = "library"
sources = ["*.py", "!*_test.py"]
dependencies = ["//src/base"]

[targets.tests]
kind = "test"
sources = ["*_test.py"]
dependencies = [":app"]
timeout = 60
"#,
    );
    write(tmp.path(), "src/base/base.py", "");
    write(tmp.path(), "src/app/app.py", "");
    write(tmp.path(), "src/app/app_test.py", "");
    tmp
}

// ============================================================================
// bosun init
// ============================================================================

#[test]
fn test_init_creates_workspace_marker() {
    let tmp = temp_dir();

    bosun()
        .args(["init"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("bosun.toml"));

    assert!(tmp.path().join("bosun.toml").exists());
}

#[test]
fn test_init_fails_if_marker_exists() {
    let tmp = temp_dir();
    fs::write(tmp.path().join("bosun.toml"), "").unwrap();

    bosun()
        .args(["init"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_fail_outside_workspace() {
    let tmp = temp_dir();

    bosun()
        .args(["check"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("bosun init"));
}

// ============================================================================
// bosun check
// ============================================================================

#[test]
fn test_check_passes_clean_workspace() {
    let tmp = clean_workspace();

    bosun()
        .args(["check"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("check passed: 3 targets"));
}

#[test]
fn test_check_runs_from_a_subdirectory() {
    let tmp = clean_workspace();

    bosun()
        .args(["check"])
        .current_dir(tmp.path().join("src/app"))
        .assert()
        .success();
}

#[test]
fn test_check_reports_unresolved_dependency_with_suggestion() {
    let tmp = clean_workspace();
    write(
        tmp.path(),
        "src/cli/BUILD.toml",
        r#"
[targets.cli]
kind = "library"
sources = ["*.py"]
dependencies = ["//src/base:bse"]
"#,
    );
    write(tmp.path(), "src/cli/cli.py", "");

    bosun()
        .args(["check"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a declared target"))
        .stderr(predicate::str::contains("did you mean `//src/base:base`?"));
}

#[test]
fn test_check_reports_empty_glob() {
    let tmp = clean_workspace();
    fs::remove_file(tmp.path().join("src/base/base.py")).unwrap();

    bosun()
        .args(["check"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("matches no files"));
}

#[test]
fn test_check_reports_dependency_cycle() {
    let tmp = temp_dir();
    write(tmp.path(), "bosun.toml", "");
    write(
        tmp.path(),
        "a/BUILD.toml",
        "[targets.a]\nkind = \"library\"\nsources = [\"*.py\"]\ndependencies = [\"//b\"]\n",
    );
    write(
        tmp.path(),
        "b/BUILD.toml",
        "[targets.b]\nkind = \"library\"\nsources = [\"*.py\"]\ndependencies = [\"//a\"]\n",
    );
    write(tmp.path(), "a/a.py", "");
    write(tmp.path(), "b/b.py", "");

    bosun()
        .args(["check"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("dependency cycle"))
        .stderr(predicate::str::contains("//a:a -> //b:b -> //a:a"));
}

#[test]
fn test_check_reports_ambiguous_ownership() {
    let tmp = temp_dir();
    write(tmp.path(), "bosun.toml", "");
    write(
        tmp.path(),
        "pkg/BUILD.toml",
        r#"
[targets.one]
kind = "library"
sources = ["*.py"]

[targets.two]
kind = "library"
sources = ["core.py"]
"#,
    );
    write(tmp.path(), "pkg/core.py", "");

    bosun()
        .args(["check"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("claimed by more than one target"));
}

#[test]
fn test_check_json_format() {
    let tmp = clean_workspace();

    let output = bosun()
        .args(["check", "--format", "json"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["targets_checked"], 3);
    assert_eq!(report["findings"].as_array().unwrap().len(), 0);
}

// ============================================================================
// bosun list
// ============================================================================

#[test]
fn test_list_all_targets() {
    let tmp = clean_workspace();

    bosun()
        .args(["list"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("//src/base:base (library)"))
        .stdout(predicate::str::contains("//src/app:tests (test)"));
}

#[test]
fn test_list_filters_by_kind_and_tag() {
    let tmp = clean_workspace();

    bosun()
        .args(["list", "--kind", "test"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("//src/app:tests"))
        .stdout(predicate::str::contains("//src/base:base").not());

    bosun()
        .args(["list", "--tag", "core"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("//src/base:base"))
        .stdout(predicate::str::contains("//src/app:app").not());
}

#[test]
fn test_list_rejects_unknown_kind() {
    let tmp = clean_workspace();

    bosun()
        .args(["list", "--kind", "binary"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown target kind"));
}

#[test]
fn test_list_json_format() {
    let tmp = clean_workspace();

    let output = bosun()
        .args(["list", "--format", "json"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let entries: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["address"], "//src/app:app");
    assert_eq!(entries[0]["kind"], "library");
}

// ============================================================================
// bosun tree / deps / rdeps
// ============================================================================

#[test]
fn test_tree_renders_dependencies() {
    let tmp = clean_workspace();

    bosun()
        .args(["tree", "//src/app:tests"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("//src/app:tests"))
        .stdout(predicate::str::contains("//src/base:base"));
}

#[test]
fn test_tree_unknown_target_fails() {
    let tmp = clean_workspace();

    bosun()
        .args(["tree", "//src/app:missing"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no target declared"));
}

#[test]
fn test_deps_and_rdeps() {
    let tmp = clean_workspace();

    bosun()
        .args(["deps", "//src/app:app"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("//src/base:base\n"));

    bosun()
        .args(["rdeps", "//src/base:base"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("//src/app:app"));

    bosun()
        .args(["deps", "//src/app:tests", "--transitive"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("//src/app:app"))
        .stdout(predicate::str::contains("//src/base:base"));
}

// ============================================================================
// bosun tailor
// ============================================================================

#[test]
fn test_tailor_prints_proposals() {
    let tmp = clean_workspace();
    write(tmp.path(), "src/new/helper.py", "");
    write(tmp.path(), "src/new/helper_test.py", "");

    bosun()
        .args(["tailor"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[targets.new]"))
        .stdout(predicate::str::contains("[targets.tests]"));

    // Dry run: nothing written.
    assert!(!tmp.path().join("src/new/BUILD.toml").exists());
}

#[test]
fn test_tailor_write_then_check_passes() {
    let tmp = clean_workspace();
    write(tmp.path(), "src/new/helper.py", "");

    bosun()
        .args(["tailor", "--write"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Added //src/new:new"));

    assert!(tmp.path().join("src/new/BUILD.toml").exists());

    bosun()
        .args(["check"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("check passed: 4 targets"));
}

#[test]
fn test_tailor_with_nothing_to_do() {
    let tmp = clean_workspace();

    bosun()
        .args(["tailor"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to tailor"));
}

// ============================================================================
// bosun completions
// ============================================================================

#[test]
fn test_completions_bash() {
    bosun()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bosun"));
}
