//! Basic functionality integration tests for the sftpcp CLI.

#[path = "../common/mod.rs"]
mod common;

use common::sftpcp;
use predicates::prelude::*;

#[test]
fn test_help_lists_global_flags() {
    sftpcp()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--username"))
        .stdout(predicate::str::contains("--password"))
        .stdout(predicate::str::contains("--size"))
        .stdout(predicate::str::contains("--host"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("cp"));
}

#[test]
fn test_cp_help_shows_operands() {
    sftpcp()
        .args(["cp", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SRC"))
        .stdout(predicate::str::contains("DST"));
}

#[test]
fn test_version() {
    sftpcp()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sftpcp"));
}

#[test]
fn test_help_shows_defaults() {
    sftpcp()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("32768"))
        .stdout(predicate::str::contains("localhost"))
        .stdout(predicate::str::contains("22"));
}

#[test]
fn test_password_env_value_hidden_in_help() {
    sftpcp()
        .env("SFTP_PASSWORD", "hunter2")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2").not());
}
