//! Core copy operations.
//!
//! [`PathCopier`] maps a local source (file or tree) onto a remote
//! destination, decides per file whether a transfer is needed, and streams
//! the bytes through a [`RemoteFs`].

mod dir;
mod event;
mod file;
mod utils;

use crate::options::CopyOptions;
use crate::remote::RemoteFs;

// Re-export public API
pub use dir::{CopyStats, copy};
pub use event::CopyEvent;
pub use file::{FileCopyResult, copy_file};

/// Copies local paths onto one remote filesystem.
///
/// Holds the remote capability and the options for the whole invocation.
/// Operations run strictly one after another.
///
/// # Example
///
/// ```
/// use sftpcopy::{CopyOptions, MemoryFs, PathCopier};
/// use std::path::Path;
///
/// let remote = MemoryFs::new();
/// let copier = PathCopier::new(&remote, CopyOptions::default());
/// let result = copier.copy(Path::new("does/not/exist"), Path::new("/remote/"));
/// assert!(result.is_err());
/// ```
#[derive(Debug)]
pub struct PathCopier<R> {
    remote: R,
    options: CopyOptions,
}

impl<R: RemoteFs> PathCopier<R> {
    /// Create a copier over `remote`.
    pub fn new(remote: R, options: CopyOptions) -> Self {
        Self { remote, options }
    }

    /// The options in effect.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// The remote filesystem being written to.
    pub fn remote(&self) -> &R {
        &self.remote
    }
}
