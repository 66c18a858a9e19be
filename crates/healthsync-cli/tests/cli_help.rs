use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("healthsync")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("documents"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("wearable"))
        .stdout(predicate::str::contains("reports"));
}

#[test]
fn test_documents_help_shows_subcommands() {
    cargo_bin_cmd!("healthsync")
        .args(["documents", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("download"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("healthsync")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
