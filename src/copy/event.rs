//! Events reported by the copier.
//!
//! Each event is delivered to the configured handler, or logged when no
//! handler is set.

use std::fmt;
use std::path::PathBuf;

/// Something the copier did, reported once per occurrence.
///
/// The [`Display`](fmt::Display) form is the log line for the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyEvent {
    /// A file was transferred
    Copied {
        /// Local file
        src: PathBuf,
        /// Remote file
        dst: PathBuf,
        /// Bytes written
        bytes: u64,
    },
    /// A file was left alone because the remote copy looked up to date
    Skipped {
        /// Local file
        src: PathBuf,
        /// Remote file
        dst: PathBuf,
    },
    /// A remote directory chain was created
    DirCreated {
        /// Remote directory
        path: PathBuf,
    },
    /// A symlink to a directory was not descended into
    SymlinkSkipped {
        /// Local symlink
        path: PathBuf,
    },
}

impl fmt::Display for CopyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copied { src, dst, bytes } => {
                write!(f, "{} -> {} ({} bytes)", src.display(), dst.display(), bytes)
            }
            Self::Skipped { src, dst } => {
                write!(f, "[skipped, mtime+size] {} -> {}", src.display(), dst.display())
            }
            Self::DirCreated { path } => write!(f, "created remote directory {}", path.display()),
            Self::SymlinkSkipped { path } => {
                write!(f, "not following symlinked directory {}", path.display())
            }
        }
    }
}
