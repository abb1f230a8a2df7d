//! Builder API for ergonomic copying operations.
//!
//! The builder pattern provides a fluent interface for configuring and executing
//! copy operations. This is often more convenient than manually constructing
//! [`CopyOptions`].
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use sftpcopy::{CopyBuilder, MemoryFs};
//!
//! let remote = MemoryFs::new();
//! let stats = CopyBuilder::new(&remote, "site/", "/srv/www").run()?;
//! println!("Copied {} files", stats.files_copied);
//! # Ok::<(), sftpcopy::Error>(())
//! ```
//!
//! ## Always Transfer
//!
//! ```no_run
//! use sftpcopy::{CopyBuilder, MemoryFs};
//!
//! let remote = MemoryFs::new();
//! let stats = CopyBuilder::new(&remote, "release.tar.gz", "/srv/releases/")
//!     .overwrite()
//!     .buffer_size(64 * 1024)
//!     .run()?;
//! # Ok::<(), sftpcopy::Error>(())
//! ```

use crate::copy::{CopyEvent, CopyStats, PathCopier};
use crate::error::Result;
use crate::options::{CopyOptions, OnConflict};
use crate::remote::RemoteFs;
use std::path::{Path, PathBuf};

/// A builder for configuring and executing copy operations.
///
/// `CopyBuilder` detects whether the source is a file or directory and
/// copies it accordingly.
#[derive(Debug, Clone)]
pub struct CopyBuilder<R> {
    remote: R,
    src: PathBuf,
    dst: PathBuf,
    options: CopyOptions,
}

impl<R: RemoteFs> CopyBuilder<R> {
    /// Create a new `CopyBuilder` copying local `src` to remote `dst`.
    ///
    /// Uses default options (skip unchanged, recursive, 32 KiB writes).
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(remote: R, src: P, dst: Q) -> Self {
        Self {
            remote,
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            options: CopyOptions::default(),
        }
    }

    /// Skip files whose size matches and whose remote copy is newer (default behavior).
    #[must_use]
    pub fn skip_unchanged(mut self) -> Self {
        self.options = self.options.with_on_conflict(OnConflict::SkipUnchanged);
        self
    }

    /// Transfer every file, replacing what is on the remote.
    #[must_use]
    pub fn overwrite(mut self) -> Self {
        self.options = self.options.with_on_conflict(OnConflict::Overwrite);
        self
    }

    /// Set the size of each remote write.
    #[must_use]
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.options = self.options.with_buffer_size(size);
        self
    }

    /// Refuse to copy directories.
    #[must_use]
    pub fn no_recursive(mut self) -> Self {
        self.options = self.options.without_recursion();
        self
    }

    /// Follow symlinks while walking a directory.
    #[must_use]
    pub fn follow_symlinks(mut self) -> Self {
        self.options = self.options.with_follow_symlinks();
        self
    }

    /// Limit how deep a directory walk goes.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options = self.options.with_max_depth(depth);
        self
    }

    /// Receive per-file events instead of having them logged.
    #[must_use]
    pub fn on_event(mut self, handler: fn(&CopyEvent)) -> Self {
        self.options = self.options.with_event_handler(handler);
        self
    }

    /// Replace all options at once.
    #[must_use]
    pub fn options(mut self, options: CopyOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the copy.
    ///
    /// # Errors
    ///
    /// See [`PathCopier::copy`].
    pub fn run(self) -> Result<CopyStats> {
        PathCopier::new(self.remote, self.options).copy(&self.src, &self.dst)
    }
}
