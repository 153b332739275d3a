use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn apigen_cmd() -> Command {
    let mut cmd = Command::cargo_bin("apigen").unwrap();
    for var in [
        "APIGEN_INPUT",
        "APIGEN_OUTPUT",
        "APIGEN_TESTS_OUTPUT",
        "APIGEN_OVERRIDES",
        "APIGEN_CRATE_NAME",
        "APIGEN_LINT_COMMAND",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../lib/tests/fixtures")
}

#[test]
fn test_help_flag() {
    apigen_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate REST API client modules"))
        .stdout(predicate::str::contains("--xpack"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_version_flag() {
    apigen_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("apigen"));
}

#[test]
fn test_dry_run_prints_code_without_writing() {
    let out = TempDir::new().unwrap();
    apigen_cmd()
        .arg("--input")
        .arg(fixtures().join("api"))
        .arg("--output")
        .arg(out.path().join("src"))
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("pub fn create("))
        .stdout(predicate::str::contains("rendered 6 endpoints"));

    assert!(!out.path().join("src").exists());
}

#[test]
fn test_generates_sources_and_tests() {
    let out = TempDir::new().unwrap();
    apigen_cmd()
        .arg("--input")
        .arg(fixtures().join("api"))
        .arg("--output")
        .arg(out.path().join("src"))
        .arg("--tests")
        .arg("--tests-output")
        .arg(out.path().join("tests"))
        .arg("--no-lint")
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains("create.rs"))
        .stdout(predicate::str::contains("generated 6 endpoints (21 files)"));

    assert!(out.path().join("src/indices/create.rs").exists());
    assert!(out.path().join("tests/indices/create_test.rs").exists());
    assert!(out.path().join("tests/support/mod.rs").exists());
    assert!(out.path().join("src/mod.rs").exists());
    assert!(out.path().join("src/indices/mod.rs").exists());
    assert!(out.path().join("tests/main.rs").exists());
}

#[test]
fn test_xpack_relabels_output_directories() {
    let out = TempDir::new().unwrap();
    apigen_cmd()
        .arg("--input")
        .arg(fixtures().join("api"))
        .arg("--output")
        .arg(out.path())
        .arg("--xpack")
        .arg("--no-lint")
        .assert()
        .success();

    assert!(out.path().join("machine_learning/get_jobs.rs").exists());
    assert!(!out.path().join("xpack").exists());
    let root = std::fs::read_to_string(out.path().join("mod.rs")).unwrap();
    assert!(root.contains("#[path = \".\"]"));
    assert!(root.contains("pub mod xpack {"));
}

#[test]
fn test_env_var_supplies_input() {
    let out = TempDir::new().unwrap();
    apigen_cmd()
        .env("APIGEN_INPUT", fixtures().join("api"))
        .arg("--output")
        .arg(out.path())
        .arg("--no-lint")
        .assert()
        .success();

    assert!(out.path().join("search.rs").exists());
}

#[test]
fn test_missing_input_fails() {
    let out = TempDir::new().unwrap();
    apigen_cmd()
        .arg("--input")
        .arg(out.path().join("missing"))
        .arg("--output")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("input directory does not exist"));
}

#[test]
fn test_malformed_spec_fails() {
    let input = TempDir::new().unwrap();
    std::fs::write(input.path().join("broken.json"), "{ \"a\": 1, \"b\": 2 }").unwrap();
    let out = TempDir::new().unwrap();
    apigen_cmd()
        .arg("--input")
        .arg(input.path())
        .arg("--output")
        .arg(out.path())
        .arg("--no-lint")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected exactly one top-level key"));
}

#[test]
fn test_no_lint_conflicts_with_lint_command() {
    apigen_cmd()
        .args(["--no-lint", "--lint-command", "rustfmt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_empty_lint_command_is_rejected() {
    let out = TempDir::new().unwrap();
    apigen_cmd()
        .arg("--input")
        .arg(fixtures().join("api"))
        .arg("--output")
        .arg(out.path())
        .args(["--lint-command", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("formatter command must not be empty"));

    assert!(!out.path().join("search.rs").exists());
}

#[test]
fn test_empty_lint_command_from_env_is_rejected() {
    let out = TempDir::new().unwrap();
    apigen_cmd()
        .env("APIGEN_LINT_COMMAND", "  ")
        .arg("--input")
        .arg(fixtures().join("api"))
        .arg("--output")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("formatter command must not be empty"));
}
