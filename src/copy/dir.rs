//! Copy entry point and directory tree copy.
//!
//! A file source is copied in single-file mode. A directory source is
//! walked lazily and every non-directory entry is copied in tree mode;
//! the first error of any kind stops the walk.

use crate::error::{Error, Result};
use crate::options::CopyOptions;
use crate::remote::{FileAttr, RemoteFs};
use crate::utils::path::base_directory;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use super::file::FileCopyResult;
use super::{CopyEvent, PathCopier};

/// Statistics from a copy operation.
///
/// # Example
///
/// ```no_run
/// use sftpcopy::{copy, CopyOptions, MemoryFs};
/// use std::path::Path;
///
/// let remote = MemoryFs::new();
/// let stats = copy(&remote, Path::new("src"), Path::new("/srv/app"), &CopyOptions::default())?;
/// println!("Copied {} files ({} bytes)", stats.files_copied, stats.bytes_copied);
/// println!("Skipped {} files", stats.files_skipped);
/// # Ok::<(), sftpcopy::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyStats {
    /// Number of files transferred
    pub files_copied: u64,
    /// Number of files skipped as up to date
    pub files_skipped: u64,
    /// Number of symlinked directories not descended into
    pub symlinks_skipped: u64,
    /// Number of remote directory chains created
    pub dirs_created: u64,
    /// Total bytes transferred
    pub bytes_copied: u64,
    /// Duration of the copy operation
    pub duration: Duration,
}

impl CopyStats {
    fn record(&mut self, result: &FileCopyResult) {
        if result.copied {
            self.files_copied += 1;
            self.bytes_copied += result.bytes;
        } else {
            self.files_skipped += 1;
        }
        if result.dir_created {
            self.dirs_created += 1;
        }
    }
}

impl<R: RemoteFs> PathCopier<R> {
    /// Copy `src` (a file or a directory tree) to `dst` on the remote.
    ///
    /// For a directory, the base used to compute relative paths is `src`
    /// itself when it is spelled with a trailing separator, otherwise its
    /// parent: `copy("site/", "/srv")` fills `/srv`, while
    /// `copy("site", "/srv")` creates `/srv/site`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Source cannot be stat'd ([`Error::SourceNotFound`])
    /// - Source is a directory and recursion is off ([`Error::IsADirectory`])
    /// - The local walk fails ([`Error::Traversal`])
    /// - Any single file fails (see [`PathCopier::copy_file`])
    pub fn copy(&self, src: &Path, dst: &Path) -> Result<CopyStats> {
        let start_time = Instant::now();

        let meta = fs::metadata(src).map_err(|source| Error::SourceNotFound {
            path: src.to_path_buf(),
            source,
        })?;

        let mut stats = CopyStats::default();

        if !meta.is_dir() {
            let result = self.copy_file(&FileAttr::from(&meta), src, dst, None)?;
            stats.record(&result);
        } else {
            if !self.options.recursive {
                return Err(Error::IsADirectory(src.to_path_buf()));
            }
            self.copy_tree(src, dst, &mut stats)?;
        }

        stats.duration = start_time.elapsed();
        Ok(stats)
    }

    fn copy_tree(&self, src: &Path, dst: &Path, stats: &mut CopyStats) -> Result<()> {
        let base = base_directory(src);

        let mut walker = WalkDir::new(src)
            .follow_links(self.options.follow_symlinks)
            .sort_by_file_name();
        if let Some(depth) = self.options.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry in walker {
            let entry = entry.map_err(|e| Error::traversal(src, e))?;
            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            let meta = if file_type.is_symlink() {
                // Unfollowed link: look through it to decide what it is.
                let meta = fs::metadata(entry.path()).map_err(|source| Error::Traversal {
                    path: entry.path().to_path_buf(),
                    source,
                })?;
                if meta.is_dir() {
                    stats.symlinks_skipped += 1;
                    self.options.emit(&CopyEvent::SymlinkSkipped {
                        path: entry.path().to_path_buf(),
                    });
                    continue;
                }
                meta
            } else {
                entry.metadata().map_err(|e| Error::traversal(src, e))?
            };

            let result = self.copy_file(&FileAttr::from(&meta), entry.path(), dst, Some(&base))?;
            stats.record(&result);
        }

        Ok(())
    }
}

/// Copy a file or directory tree onto `remote`.
///
/// Shorthand for `PathCopier::new(remote, options.clone()).copy(src, dst)`.
///
/// # Errors
///
/// See [`PathCopier::copy`].
pub fn copy<R: RemoteFs>(remote: R, src: &Path, dst: &Path, options: &CopyOptions) -> Result<CopyStats> {
    PathCopier::new(remote, options.clone()).copy(src, dst)
}

// =============================================================================
// Tests
// =============================================================================
