//! Error handling integration tests for the sftpcp CLI.
//!
//! These tests verify the failure modes that do not need a live server:
//! - Usage errors exit with status 2
//! - A missing source fails before any connection attempt
//! - Missing credentials and unreachable hosts fail with a logged error

#[path = "../common/mod.rs"]
mod common;

use common::{TestFixture, sftpcp};
use predicates::prelude::*;

#[test]
fn test_missing_destination_is_usage_error() {
    let fixture = TestFixture::new();
    let src = fixture.write("a.txt", "content");

    sftpcp()
        .args(["--username", "deploy", "cp"])
        .arg(&src)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("DST"));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    sftpcp().args(["--username", "deploy"]).assert().code(2);
}

#[test]
fn test_invalid_port_is_usage_error() {
    let fixture = TestFixture::new();
    let src = fixture.write("a.txt", "content");

    sftpcp()
        .args(["--username", "deploy", "--port", "not-a-port", "cp"])
        .arg(&src)
        .arg("/remote/")
        .assert()
        .code(2);
}

/// A missing source is reported without contacting the host: port 1 would
/// otherwise produce a connection error.
#[test]
fn test_source_not_found() {
    let fixture = TestFixture::new();

    sftpcp()
        .args(["--username", "deploy", "--host", "127.0.0.1", "--port", "1", "cp"])
        .arg(fixture.missing())
        .arg("/remote/")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Source does not exist"))
        .stderr(predicate::str::contains("unable to connect").not());
}

#[test]
fn test_missing_username() {
    let fixture = TestFixture::new();
    let src = fixture.write("a.txt", "content");

    sftpcp()
        .arg("cp")
        .arg(&src)
        .arg("/remote/")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing username"));
}

#[test]
fn test_username_from_environment() {
    let fixture = TestFixture::new();
    let src = fixture.write("a.txt", "content");

    sftpcp()
        .env("SFTP_USERNAME", "deploy")
        .env("SFTP_HOST", "127.0.0.1")
        .env("SFTP_PORT", "1")
        .arg("cp")
        .arg(&src)
        .arg("/remote/")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing username").not())
        .stderr(predicate::str::contains("unable to connect to [127.0.0.1:1]"));
}

#[test]
fn test_connection_refused() {
    let fixture = TestFixture::new();
    fixture.write("tree/x/1.txt", "one");

    sftpcp()
        .args(["--username", "deploy", "--host", "127.0.0.1", "--port", "1", "cp"])
        .arg(fixture.root().join("tree"))
        .arg("/remote/out")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unable to connect to [127.0.0.1:1]"));
}
