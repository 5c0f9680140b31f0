use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;



#[test]
fn shows_help_with_help_flag() {
    let mut cmd = Command::cargo_bin("pud").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("pud"))
        .stdout(predicates::str::contains("--no-keep-state"))
        .stdout(predicates::str::contains("--cursor"));
}

#[test]
fn shows_version_with_version_flag() {
    let mut cmd = Command::cargo_bin("pud").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("pud"));
}

#[test]
fn error_on_empty_cursor() {
    let mut cmd = Command::cargo_bin("pud").unwrap();
    cmd.args(["--cursor", "  "])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Cursor must not be empty"));
}

#[test]
fn error_on_nonexistent_directory() {
    let mut cmd = Command::cargo_bin("pud").unwrap();
    cmd.arg("nonexistent_directory/")
        .assert()
        .failure()
        .stderr(predicates::str::contains("Path does not exist"));
}

#[test]
fn error_on_file_instead_of_directory() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("test.txt");
    fs::write(&file_path, "Hello, World!").unwrap();

    let mut cmd = Command::cargo_bin("pud").unwrap();
    cmd.arg(file_path.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicates::str::contains("Not a directory"))
        .stdout(predicates::str::contains("Current Directory").not());
}

#[test]
fn error_on_unknown_flag() {
    let mut cmd = Command::cargo_bin("pud").unwrap();
    cmd.arg("--definitely-not-a-flag")
        .assert()
        .failure()
        .stderr(predicates::str::contains("unexpected argument"));
}

#[test]
fn help_mentions_log_file() {
    let mut cmd = Command::cargo_bin("pud").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("--log-file"));
}

#[test]
fn error_on_unwritable_log_file() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("missing").join("pud.log");

    let mut cmd = Command::cargo_bin("pud").unwrap();
    cmd.args(["--log-file", log_path.to_str().unwrap(), dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Failed to create log file"));
}
