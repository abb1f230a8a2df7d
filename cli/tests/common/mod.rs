//! Common test utilities for integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables the CLI reads; cleared so the host environment
/// cannot leak into a test.
const SFTP_ENV: &[&str] = &[
    "SFTP_USERNAME",
    "SFTP_PASSWORD",
    "SFTP_SIZE",
    "SFTP_HOST",
    "SFTP_PORT",
    "SFTP_TIMEOUT",
    "SSH_AUTH_SOCK",
    "RUST_LOG",
];

/// `sftpcp` with a clean environment.
pub fn sftpcp() -> Command {
    let mut cmd = cargo_bin_cmd!("sftpcp");
    for var in SFTP_ENV {
        cmd.env_remove(var);
    }
    cmd
}

/// A local source tree to copy from.
pub struct TestFixture {
    pub src: TempDir,
}

impl TestFixture {
    /// Create a new fixture with an empty source directory.
    pub fn new() -> Self {
        Self {
            src: TempDir::new().expect("Failed to create temp source dir"),
        }
    }

    /// Write a file under the source directory, creating parents.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.src.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directory");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Path that is guaranteed not to exist.
    pub fn missing(&self) -> PathBuf {
        self.src.path().join("does-not-exist")
    }

    pub fn root(&self) -> &Path {
        self.src.path()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
