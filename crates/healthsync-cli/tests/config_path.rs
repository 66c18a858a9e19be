use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("healthsync")
        .env("HEALTHSYNC_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    assert!(!config_path.exists());

    cargo_bin_cmd!("healthsync")
        .env("HEALTHSYNC_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    assert!(config_path.exists());

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("server_url ="));
    assert!(contents.contains("# request_timeout_secs ="));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    fs::write(&config_path, "# existing config").unwrap();

    cargo_bin_cmd!("healthsync")
        .env("HEALTHSYNC_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_set_url_writes_and_strips_slash() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("healthsync")
        .env("HEALTHSYNC_HOME", dir.path())
        .args(["config", "set-url", "https://portal.example.com/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://portal.example.com"));

    let contents = fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(contents.contains("server_url = \"https://portal.example.com\""));
}

#[test]
fn test_config_set_url_rejects_invalid() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("healthsync")
        .env("HEALTHSYNC_HOME", dir.path())
        .args(["config", "set-url", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid server URL"));
}
