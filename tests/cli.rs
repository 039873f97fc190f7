use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;

/// Helper to get a temporary home directory
fn temp_home_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get config file path in the temp dir
fn config_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".securewipe").join("config.json")
}

const BINARY_NAME: &str = "securewipe";

/// Nothing listens on the discard port, so connections are refused immediately.
const UNREACHABLE_SERVER: &str = "http://127.0.0.1:9";

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("SecureWipe operator console"))
        .stdout(contains("dashboard"))
        .stdout(contains("wipe"));
}

#[test]
fn unknown_environment_is_rejected() {
    let tmp = temp_home_dir();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["--env", "staging", "devices"])
        .env("HOME", tmp.path())
        .assert()
        .failure()
        .stderr(contains("unknown environment"));
}

#[test]
/// Reset command should delete an existing config file.
fn reset_deletes_config_file() {
    let tmp = temp_home_dir();
    let config_path = config_file_path(&tmp);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, "{}").unwrap();

    // Ensure the file exists
    assert!(config_path.exists());

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("reset")
        .env("HOME", tmp.path()) // simulate different $HOME
        .assert()
        .success()
        .stdout(contains("Resetting"));

    // Confirm the file was deleted
    assert!(!config_path.exists());
}

#[test]
fn reset_without_config_file_succeeds() {
    let tmp = temp_home_dir();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("reset")
        .env("HOME", tmp.path())
        .assert()
        .success();
}

#[test]
fn set_server_writes_config_file() {
    let tmp = temp_home_dir();
    let config_path = config_file_path(&tmp);

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["set-server", "http://10.0.0.2:5000/"])
        .env("HOME", tmp.path())
        .assert()
        .success()
        .stdout(contains("Server saved"));

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("\"server_url\": \"http://10.0.0.2:5000\""));
}

#[test]
fn devices_reports_unreachable_backend() {
    let tmp = temp_home_dir();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["--server-url", UNREACHABLE_SERVER, "devices"])
        .env("HOME", tmp.path())
        .assert()
        .failure()
        .stderr(contains("Connection to backend failed"));
}

#[test]
/// Without a reachable backend the wipe is never prompted for or sent.
fn wipe_fails_without_backend() {
    let tmp = temp_home_dir();
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["--server-url", UNREACHABLE_SERVER, "wipe", "M1"])
        .env("HOME", tmp.path())
        .write_stdin("yes\n")
        .assert()
        .failure()
        .stdout(contains("ARE YOU ABSOLUTELY SURE?").not())
        .stderr(contains("Connection to backend failed"));
}
