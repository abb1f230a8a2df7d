//! Error types for sftpcopy.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur during a remote copy, and the [`Result`] type alias.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Validation | [`Error::SourceNotFound`], [`Error::IsADirectory`] |
//! | Local IO | [`Error::LocalOpen`], [`Error::Traversal`] |
//! | Remote IO | [`Error::RemoteDirectory`], [`Error::RemoteCreate`] |
//! | Transfer | [`Error::Stream`] |
//! | Session | [`Error::Session`], [`Error::Authentication`] |
//!
//! Every error is terminal for the invocation that produced it: files
//! transferred before the failure stay on the remote, nothing after it is
//! attempted.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sftpcopy operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during copy operations.
///
/// All errors include relevant path information to aid debugging.
/// Use the [`std::error::Error`] trait methods to access underlying
/// causes where applicable.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The copy root could not be stat'd locally
    #[error("Source path does not exist: {path}: {source}")]
    SourceNotFound {
        /// Local source path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Source is a directory but recursive copying is disabled
    #[error("Source is a directory and recursive copy is disabled: {0}")]
    IsADirectory(PathBuf),

    /// A required remote directory could not be stat'd or created
    #[error("Failed to prepare remote directory {path}: {source}")]
    RemoteDirectory {
        /// Remote directory path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A local file could not be opened for reading
    #[error("Failed to open local file {path}: {source}")]
    LocalOpen {
        /// Local file path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A remote file could not be created
    #[error("Failed to create remote file {path}: {source}")]
    RemoteCreate {
        /// Remote file path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Reading or writing failed part way through a transfer
    #[error("Failed to copy {src} -> {dst}: {source}")]
    Stream {
        /// Local file path
        src: PathBuf,
        /// Remote file path
        dst: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Walking the local directory tree failed
    #[error("Failed to walk {path}: {source}")]
    Traversal {
        /// Entry being visited when the walk failed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Establishing the SSH/SFTP session failed
    #[error("{context}: {source}")]
    Session {
        /// What was being attempted
        context: String,
        /// Underlying error
        source: io::Error,
    },

    /// No authentication method was accepted by the server
    #[error("Authentication failed for user {username} (tried: {})", .attempted.join(", "))]
    Authentication {
        /// User name presented to the server
        username: String,
        /// Methods tried, in order
        attempted: Vec<&'static str>,
    },
}

impl Error {
    pub(crate) fn traversal(root: &std::path::Path, error: walkdir::Error) -> Self {
        let path = error
            .path()
            .map_or_else(|| root.to_path_buf(), std::path::Path::to_path_buf);
        Self::Traversal {
            path,
            source: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_error_display() {
        let error = Error::Authentication {
            username: "deploy".to_string(),
            attempted: vec!["agent", "password"],
        };
        let msg = error.to_string();
        assert!(msg.contains("deploy"));
        assert!(msg.contains("agent, password"));
    }

    #[test]
    fn test_stream_error_display() {
        let error = Error::Stream {
            src: PathBuf::from("/local/a.txt"),
            dst: PathBuf::from("/remote/a.txt"),
            source: io::Error::new(io::ErrorKind::BrokenPipe, "channel closed"),
        };
        let msg = format!("{}", error);
        assert!(msg.contains("/local/a.txt -> /remote/a.txt"));
        assert!(msg.contains("channel closed"));
    }
}
