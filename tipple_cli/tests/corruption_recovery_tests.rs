//! Corruption recovery tests for the tipple binary.
//!
//! These tests verify the CLI handles:
//! - Corrupted session files
//! - A corrupted or dangling active pointer
//! - Invalid config files
//! - Leftover temp files from interrupted writes

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const NOW: &str = "2025-06-14T21:00:00Z";

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli(temp_dir: &TempDir) -> Command {
    let config = temp_dir.path().join("config.toml");
    if !config.exists() {
        fs::write(&config, "[profile]\nweight_kg = 70.0\n").expect("Failed to write config");
    }

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tipple"));
    cmd.arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--config")
        .arg(config)
        .arg("--now")
        .arg(NOW);
    cmd
}

fn active_session_path(temp_dir: &TempDir) -> std::path::PathBuf {
    let sessions = temp_dir.path().join("sessions");
    let id = fs::read_to_string(sessions.join("active")).expect("No active pointer");
    sessions.join(format!("{}.json", id.trim()))
}

#[test]
fn test_corrupted_session_file_is_reported() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir).arg("start").assert().success();

    fs::write(active_session_path(&temp_dir), "{ invalid json }}}}")
        .expect("Failed to corrupt session");

    cli(&temp_dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Json"));

    // Logging must not overwrite the damaged file with a fresh session
    cli(&temp_dir).args(["drink", "beer"]).assert().failure();
    let contents = fs::read_to_string(active_session_path(&temp_dir)).unwrap();
    assert_eq!(contents, "{ invalid json }}}}");
}

#[test]
fn test_truncated_session_file() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir).arg("start").assert().success();
    cli(&temp_dir).args(["drink", "beer"]).assert().success();

    let path = active_session_path(&temp_dir);
    let contents = fs::read_to_string(&path).unwrap();
    fs::write(&path, &contents[..contents.len() / 2]).unwrap();

    cli(&temp_dir).arg("status").assert().failure();

    // Starting over recovers a usable session
    cli(&temp_dir).arg("start").assert().success();
    cli(&temp_dir).arg("status").assert().success();
}

#[test]
fn test_corrupted_active_pointer() {
    let temp_dir = setup_test_dir();
    let sessions = temp_dir.path().join("sessions");
    fs::create_dir_all(&sessions).unwrap();
    fs::write(sessions.join("active"), "not-a-uuid").unwrap();

    cli(&temp_dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Corrupt active session pointer"));

    cli(&temp_dir).arg("start").assert().success();
    cli(&temp_dir).arg("status").assert().success();
}

#[test]
fn test_dangling_active_pointer() {
    let temp_dir = setup_test_dir();
    let sessions = temp_dir.path().join("sessions");
    fs::create_dir_all(&sessions).unwrap();
    fs::write(
        sessions.join("active"),
        "00000000-0000-0000-0000-000000000000",
    )
    .unwrap();

    cli(&temp_dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SessionNotFound"));
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[profile]\nweight_kg = -5.0\n",
    )
    .unwrap();

    cli(&temp_dir)
        .arg("start")
        .assert()
        .failure()
        .stderr(predicate::str::contains("weight_kg"));
}

#[test]
fn test_malformed_config_file() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("config.toml"), "[profile\nweight_kg = ").unwrap();

    cli(&temp_dir).arg("start").assert().failure();
}

#[test]
fn test_stray_temp_files_are_ignored() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir).arg("start").assert().success();

    // Simulate a crash between temp write and rename
    let sessions = temp_dir.path().join("sessions");
    fs::write(sessions.join(".tmpXYZ123"), "{ partial").unwrap();

    cli(&temp_dir).args(["drink", "beer"]).assert().success();
    cli(&temp_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("BAC"));
}
