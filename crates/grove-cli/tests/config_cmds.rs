//! Integration tests for `grove config` subcommands.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_config_path_respects_home_override() {
    let temp_dir = TempDir::new().unwrap();

    cargo_bin_cmd!("grove")
        .env("GROVE_HOME", temp_dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains(
            temp_dir.path().to_string_lossy().to_string(),
        ));
}

#[test]
fn test_config_init_creates_file() {
    let temp_dir = TempDir::new().unwrap();

    cargo_bin_cmd!("grove")
        .env("GROVE_HOME", temp_dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = std::fs::read_to_string(temp_dir.path().join("config.toml")).unwrap();
    assert!(contents.contains("responder_url"));
    assert!(contents.contains("request_timeout_secs"));
}

#[test]
fn test_config_init_twice_fails() {
    let temp_dir = TempDir::new().unwrap();

    cargo_bin_cmd!("grove")
        .env("GROVE_HOME", temp_dir.path())
        .args(["config", "init"])
        .assert()
        .success();

    cargo_bin_cmd!("grove")
        .env("GROVE_HOME", temp_dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_help_lists_subcommands() {
    cargo_bin_cmd!("grove")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("send"))
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("config"));
}
