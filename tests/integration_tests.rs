//! Integration tests for the oax CLI
//!
//! These tests exercise the CLI end-to-end using assert_cmd. Nothing here
//! talks to the OpenAlex API; fetch paths are covered by unit tests with a
//! fake fetcher.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to get an oax command
fn oax() -> Command {
    Command::cargo_bin("oax").unwrap()
}

/// Helper to get a database path inside a temp directory
fn db_path(tmp: &TempDir) -> String {
    tmp.path().join("cache.db").display().to_string()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    oax()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("OpenAlex"));
}

#[test]
fn test_version_displays() {
    oax()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("oax"));
}

#[test]
fn test_unknown_command_fails() {
    oax()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_database() {
    let tmp = TempDir::new().unwrap();
    let db = db_path(&tmp);

    oax()
        .args(["--db", &db, "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join("cache.db").exists());
}

#[test]
fn test_reinit_succeeds_on_existing_database() {
    let tmp = TempDir::new().unwrap();
    let db = db_path(&tmp);

    oax().args(["--db", &db, "init"]).assert().success();
    oax().args(["--db", &db, "init"]).assert().success();

    oax()
        .args(["--db", &db, "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("authors"));
}

// ============================================================================
// Status Command Tests
// ============================================================================

#[test]
fn test_status_reports_every_kind_on_an_empty_cache() {
    let tmp = TempDir::new().unwrap();
    let db = db_path(&tmp);

    oax().args(["--db", &db, "init"]).assert().success();

    let assert = oax().args(["--db", &db, "status"]).assert().success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for table in ["authors", "concepts", "funders", "institutions", "publishers", "topics"] {
        assert!(output.contains(table), "status output missing {table}");
    }
}

// ============================================================================
// Show / Delete Command Tests
// ============================================================================

#[test]
fn test_show_of_an_uncached_id_fails_hard() {
    let tmp = TempDir::new().unwrap();
    let db = db_path(&tmp);

    oax().args(["--db", &db, "init"]).assert().success();

    oax()
        .args(["--db", &db, "show", "A5023888391"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("integrity mismatch"));
}

#[test]
fn test_show_rejects_an_uninferable_id() {
    let tmp = TempDir::new().unwrap();
    let db = db_path(&tmp);

    oax().args(["--db", &db, "init"]).assert().success();

    oax()
        .args(["--db", &db, "show", "X999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--kind"));
}

#[test]
fn test_delete_on_an_empty_cache_succeeds() {
    let tmp = TempDir::new().unwrap();
    let db = db_path(&tmp);

    oax().args(["--db", &db, "init"]).assert().success();

    oax()
        .args(["--db", &db, "delete", "A5023888391"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));
}

#[test]
fn test_fetch_rejects_an_uninferable_id() {
    let tmp = TempDir::new().unwrap();
    let db = db_path(&tmp);

    oax().args(["--db", &db, "init"]).assert().success();

    // Fails during kind inference, before any network traffic.
    oax()
        .args(["--db", &db, "fetch", "X999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--kind"));
}

// ============================================================================
// Completions Command Tests
// ============================================================================

#[test]
fn test_completions_generate_for_bash() {
    oax()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("oax"));
}
