//! Remote filesystem capability.
//!
//! The copier only needs three operations from the far side: stat a path,
//! create a directory chain, and create a file for writing. [`RemoteFs`]
//! captures exactly that so the copy logic runs the same against a live
//! SFTP session ([`SftpSession`]) and the in-memory [`MemoryFs`].

mod memory;
#[cfg(feature = "ssh")]
mod sftp;

pub use memory::{MemoryFile, MemoryFs};
#[cfg(feature = "ssh")]
pub use sftp::{SessionConfig, SftpSession};

use std::fs::Metadata;
use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

/// The file attributes the copier looks at, for local and remote files alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileAttr {
    /// Whether the path is a directory
    pub is_dir: bool,
    /// Size in bytes
    pub size: u64,
    /// Last modification time, when the backend reports one
    pub modified: Option<SystemTime>,
}

impl FileAttr {
    /// Attributes of a regular file
    pub fn file(size: u64, modified: SystemTime) -> Self {
        Self {
            is_dir: false,
            size,
            modified: Some(modified),
        }
    }

    /// Attributes of a directory
    pub fn dir() -> Self {
        Self {
            is_dir: true,
            size: 0,
            modified: None,
        }
    }
}

impl From<&Metadata> for FileAttr {
    fn from(meta: &Metadata) -> Self {
        Self {
            is_dir: meta.is_dir(),
            size: meta.len(),
            modified: meta.modified().ok(),
        }
    }
}

/// Operations the copier performs against the remote side.
///
/// Implementations are used strictly sequentially by one copier.
pub trait RemoteFs {
    /// Write handle returned by [`RemoteFs::create`]; closed when dropped.
    type File: Write;

    /// Stat `path`.
    ///
    /// Returns `Ok(None)` when the path does not exist. Every other failure
    /// is an error.
    fn stat(&self, path: &Path) -> io::Result<Option<FileAttr>>;

    /// Create `path` and any missing parents. Succeeds if it already exists.
    fn mkdir_all(&self, path: &Path) -> io::Result<()>;

    /// Create `path` for writing, truncating any existing file.
    fn create(&self, path: &Path) -> io::Result<Self::File>;
}

impl<R: RemoteFs + ?Sized> RemoteFs for &R {
    type File = R::File;

    fn stat(&self, path: &Path) -> io::Result<Option<FileAttr>> {
        (**self).stat(path)
    }

    fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        (**self).mkdir_all(path)
    }

    fn create(&self, path: &Path) -> io::Result<Self::File> {
        (**self).create(path)
    }
}
