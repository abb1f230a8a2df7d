//! Configuration options for copy operations.
//!
//! This module provides [`CopyOptions`] for configuring copy behavior and
//! [`OnConflict`] for deciding what happens when the remote file exists.
//!
//! # Example
//!
//! ```
//! use sftpcopy::{CopyOptions, OnConflict};
//!
//! let options = CopyOptions::default()
//!     .with_buffer_size(64 * 1024)
//!     .with_on_conflict(OnConflict::Overwrite);
//! ```

use crate::copy::CopyEvent;

/// Default remote write size in bytes, matching the SFTP max packet size.
pub const DEFAULT_BUFFER_SIZE: usize = 1 << 15;

/// Behavior when the remote destination file already exists.
///
/// # Default
///
/// The default is [`OnConflict::SkipUnchanged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OnConflict {
    /// Skip files that look up to date.
    ///
    /// A remote file is considered up to date when its size equals the
    /// source size and the source mtime is strictly earlier than the
    /// remote mtime. Anything else is re-copied, including byte-identical
    /// files whose source mtime is equal to or later than the remote one.
    #[default]
    SkipUnchanged,
    /// Always transfer, truncating whatever is on the remote.
    Overwrite,
}

/// Options for copy operations.
///
/// Use [`Default::default()`] to get sensible defaults, then customize
/// using the builder methods.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `on_conflict` | `SkipUnchanged` | Skip files whose size and mtime say up to date |
/// | `recursive` | `true` | Copy directory trees |
/// | `buffer_size` | 32768 | Bytes per remote write |
/// | `follow_symlinks` | `false` | Descend into symlinked directories |
/// | `max_depth` | `None` | No depth limit |
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyOptions {
    /// Behavior when the remote file already exists
    pub on_conflict: OnConflict,

    /// Whether directory sources are copied as trees (default: true)
    ///
    /// When false, a directory source fails with
    /// [`Error::IsADirectory`](crate::Error::IsADirectory).
    pub recursive: bool,

    /// Size of each write sent over the remote channel (default: 32768)
    pub buffer_size: usize,

    /// Whether to follow symlinks while walking a tree (default: false)
    ///
    /// Unfollowed symlinks to files are still copied as regular files;
    /// symlinks to directories are skipped with a warning.
    pub follow_symlinks: bool,

    /// Maximum directory depth to traverse (default: None = unlimited)
    pub max_depth: Option<usize>,

    /// Callback for per-file events (optional)
    ///
    /// If not set and `tracing` feature is enabled, events are logged via tracing.
    /// Otherwise, events are silently dropped.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub event_handler: Option<fn(&CopyEvent)>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            on_conflict: OnConflict::SkipUnchanged,
            recursive: true,
            buffer_size: DEFAULT_BUFFER_SIZE,
            follow_symlinks: false,
            max_depth: None,
            event_handler: None,
        }
    }
}

impl CopyOptions {
    /// Create options with an event handler
    #[must_use]
    pub fn with_event_handler(mut self, handler: fn(&CopyEvent)) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Set the conflict behavior
    #[must_use]
    pub fn with_on_conflict(mut self, on_conflict: OnConflict) -> Self {
        self.on_conflict = on_conflict;
        self
    }

    /// Set the remote write size
    ///
    /// Value is clamped to at least 1.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Refuse directory sources
    #[must_use]
    pub fn without_recursion(mut self) -> Self {
        self.recursive = false;
        self
    }

    /// Follow symlinks while walking
    #[must_use]
    pub fn with_follow_symlinks(mut self) -> Self {
        self.follow_symlinks = true;
        self
    }

    /// Set maximum directory depth
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub(crate) fn emit(&self, event: &CopyEvent) {
        if let Some(handler) = self.event_handler {
            handler(event);
            return;
        }

        #[cfg(feature = "tracing")]
        match event {
            CopyEvent::DirCreated { .. } => tracing::debug!("{}", event),
            CopyEvent::SymlinkSkipped { .. } => tracing::warn!("{}", event),
            CopyEvent::Copied { .. } | CopyEvent::Skipped { .. } => tracing::info!("{}", event),
        }
    }
}
