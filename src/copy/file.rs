//! Single file copy operations.
//!
//! Resolves where one local file lands on the remote, prepares the remote
//! directory, applies the skip rule and streams the contents.

use crate::error::{Error, Result};
use crate::options::{CopyOptions, OnConflict};
use crate::remote::{FileAttr, RemoteFs};
use crate::utils::path::{split_destination, tree_target_dir};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use super::utils::{copy_contents, ensure_remote_dir, is_up_to_date};
use super::{CopyEvent, PathCopier};

/// Result of a single file copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCopyResult {
    /// Remote path the file was mapped to
    pub destination: PathBuf,
    /// Whether the file was actually transferred (false = skipped)
    pub copied: bool,
    /// Number of bytes transferred (0 if skipped)
    pub bytes: u64,
    /// Whether the remote directory had to be created for this file
    pub dir_created: bool,
}

impl<R: RemoteFs> PathCopier<R> {
    /// Copy one local file.
    ///
    /// With `base` set (tree mode), the part of `src` below `base` is
    /// recreated under `dst` and the file keeps its name. Without it
    /// (single-file mode), `dst` is split into directory and file name; a
    /// destination naming only a directory keeps the source's name.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The remote directory cannot be stat'd or created ([`Error::RemoteDirectory`])
    /// - The local file cannot be opened ([`Error::LocalOpen`])
    /// - The remote file cannot be created ([`Error::RemoteCreate`])
    /// - Reading or writing fails mid-transfer ([`Error::Stream`])
    pub fn copy_file(
        &self,
        src_attr: &FileAttr,
        src: &Path,
        dst: &Path,
        base: Option<&Path>,
    ) -> Result<FileCopyResult> {
        let (directory, name) = match base {
            Some(base) => (tree_target_dir(src, base, dst), src.file_name()),
            None => {
                let (directory, name) = split_destination(dst);
                (directory, name.or_else(|| src.file_name()))
            }
        };
        let Some(name) = name else {
            return Err(Error::LocalOpen {
                path: src.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
            });
        };

        let dir_created = ensure_remote_dir(&self.remote, &directory)?;
        if dir_created {
            self.options.emit(&CopyEvent::DirCreated {
                path: directory.clone(),
            });
        }

        let target = directory.join(name);

        if self.options.on_conflict == OnConflict::SkipUnchanged {
            // A failed stat is treated like a missing file: transfer it.
            if let Ok(Some(dst_attr)) = self.remote.stat(&target) {
                if is_up_to_date(src_attr, &dst_attr) {
                    self.options.emit(&CopyEvent::Skipped {
                        src: src.to_path_buf(),
                        dst: target.clone(),
                    });
                    return Ok(FileCopyResult {
                        destination: target,
                        copied: false,
                        bytes: 0,
                        dir_created,
                    });
                }
            }
        }

        let src_file = File::open(src).map_err(|source| Error::LocalOpen {
            path: src.to_path_buf(),
            source,
        })?;
        let dst_file = self.remote.create(&target).map_err(|source| Error::RemoteCreate {
            path: target.clone(),
            source,
        })?;
        let bytes = copy_contents(src_file, dst_file, self.options.buffer_size).map_err(|source| {
            Error::Stream {
                src: src.to_path_buf(),
                dst: target.clone(),
                source,
            }
        })?;

        self.options.emit(&CopyEvent::Copied {
            src: src.to_path_buf(),
            dst: target.clone(),
            bytes,
        });

        Ok(FileCopyResult {
            destination: target,
            copied: true,
            bytes,
            dir_created,
        })
    }
}

/// Copy a single local file onto `remote`.
///
/// See [`PathCopier::copy_file`]. The source is stat'd here; a directory
/// source yields [`Error::IsADirectory`].
pub fn copy_file<R: RemoteFs>(
    remote: R,
    src: &Path,
    dst: &Path,
    options: &CopyOptions,
) -> Result<FileCopyResult> {
    let meta = std::fs::metadata(src).map_err(|source| Error::SourceNotFound {
        path: src.to_path_buf(),
        source,
    })?;
    if meta.is_dir() {
        return Err(Error::IsADirectory(src.to_path_buf()));
    }
    PathCopier::new(remote, options.clone()).copy_file(&FileAttr::from(&meta), src, dst, None)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryFs;
    use filetime::{FileTime, set_file_mtime};
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    const T0: i64 = 1_600_000_000;

    fn at(secs: i64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs as u64)
    }

    fn write_with_mtime(path: &Path, content: &str, mtime: i64) {
        fs::write(path, content).unwrap();
        set_file_mtime(path, FileTime::from_unix_time(mtime, 0)).unwrap();
    }

    #[test]
    fn test_copy_file_into_directory_destination() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        fs::write(&src, "hello world").unwrap();

        let remote = MemoryFs::new();
        let result = copy_file(&remote, &src, Path::new("/remote/dir/"), &CopyOptions::default()).unwrap();

        assert!(result.copied);
        assert_eq!(result.bytes, 11);
        assert_eq!(result.destination, Path::new("/remote/dir/b.txt"));
        assert!(result.dir_created);
        assert_eq!(remote.read("/remote/dir/b.txt").unwrap(), b"hello world");
    }

    #[test]
    fn test_copy_file_rename() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        fs::write(&src, "renamed").unwrap();

        let remote = MemoryFs::new();
        copy_file(&remote, &src, Path::new("/remote/dir/c.txt"), &CopyOptions::default()).unwrap();

        assert_eq!(remote.files(), vec![PathBuf::from("/remote/dir/c.txt")]);
        assert_eq!(remote.read("/remote/dir/c.txt").unwrap(), b"renamed");
    }

    #[test]
    fn test_copy_file_existing_directory_not_recreated() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        fs::write(&src, "x").unwrap();

        let remote = MemoryFs::new();
        remote.mkdir_all(Path::new("/remote")).unwrap();
        let result = copy_file(&remote, &src, Path::new("/remote/b.txt"), &CopyOptions::default()).unwrap();

        assert!(!result.dir_created);
    }

    #[test]
    fn test_skip_when_remote_newer_and_same_size() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        write_with_mtime(&src, "hello", T0);

        let remote = MemoryFs::new();
        remote.insert_file("/remote/b.txt", "world", at(T0 + 100));

        let result = copy_file(&remote, &src, Path::new("/remote/"), &CopyOptions::default()).unwrap();

        assert!(!result.copied);
        assert_eq!(result.bytes, 0);
        assert_eq!(remote.read("/remote/b.txt").unwrap(), b"world");
    }

    #[test]
    fn test_copy_when_sizes_differ() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        write_with_mtime(&src, "hello", T0);

        let remote = MemoryFs::new();
        remote.insert_file("/remote/b.txt", "much longer", at(T0 + 100));

        let result = copy_file(&remote, &src, Path::new("/remote/"), &CopyOptions::default()).unwrap();

        assert!(result.copied);
        assert_eq!(remote.read("/remote/b.txt").unwrap(), b"hello");
    }

    #[test]
    fn test_copy_when_mtimes_equal() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        write_with_mtime(&src, "hello", T0);

        let remote = MemoryFs::new();
        remote.insert_file("/remote/b.txt", "hello", at(T0));

        let result = copy_file(&remote, &src, Path::new("/remote/"), &CopyOptions::default()).unwrap();

        assert!(result.copied);
        assert_eq!(result.bytes, 5);
    }

    #[test]
    fn test_copy_when_source_newer() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        write_with_mtime(&src, "hello", T0 + 500);

        let remote = MemoryFs::new();
        remote.insert_file("/remote/b.txt", "world", at(T0));

        let result = copy_file(&remote, &src, Path::new("/remote/"), &CopyOptions::default()).unwrap();

        assert!(result.copied);
        assert_eq!(remote.read("/remote/b.txt").unwrap(), b"hello");
    }

    #[test]
    fn test_overwrite_ignores_skip_rule() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        write_with_mtime(&src, "hello", T0);

        let remote = MemoryFs::new();
        remote.insert_file("/remote/b.txt", "world", at(T0 + 100));

        let options = CopyOptions::default().with_on_conflict(OnConflict::Overwrite);
        let result = copy_file(&remote, &src, Path::new("/remote/"), &options).unwrap();

        assert!(result.copied);
        assert_eq!(remote.read("/remote/b.txt").unwrap(), b"hello");
    }

    #[test]
    fn test_remote_stat_failure_on_target_still_copies() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        fs::write(&src, "data").unwrap();

        let remote = MemoryFs::new();
        remote.mkdir_all(Path::new("/remote")).unwrap();
        remote.fail_stat("/remote/b.txt");

        let result = copy_file(&remote, &src, Path::new("/remote/"), &CopyOptions::default()).unwrap();
        assert!(result.copied);
    }

    #[test]
    fn test_copy_file_source_not_found() {
        let src_dir = tempdir().unwrap();
        let remote = MemoryFs::new();

        let result = copy_file(
            &remote,
            &src_dir.path().join("missing.txt"),
            Path::new("/remote/"),
            &CopyOptions::default(),
        );

        assert!(matches!(result, Err(Error::SourceNotFound { .. })));
        assert!(remote.files().is_empty());
    }

    #[test]
    fn test_copy_file_source_is_directory() {
        let src_dir = tempdir().unwrap();
        let remote = MemoryFs::new();

        let result = copy_file(&remote, src_dir.path(), Path::new("/remote/"), &CopyOptions::default());

        assert!(matches!(result, Err(Error::IsADirectory(_))));
    }

    #[test]
    fn test_remote_create_error() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        fs::write(&src, "data").unwrap();

        let remote = MemoryFs::new();
        remote.fail_create("/remote/b.txt");

        let result = copy_file(&remote, &src, Path::new("/remote/"), &CopyOptions::default());
        assert!(matches!(result, Err(Error::RemoteCreate { .. })));
    }

    #[test]
    fn test_stream_error() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        fs::write(&src, "data").unwrap();

        let remote = MemoryFs::new();
        remote.fail_write("/remote/b.txt");

        let result = copy_file(&remote, &src, Path::new("/remote/"), &CopyOptions::default());
        assert!(matches!(result, Err(Error::Stream { .. })));
    }

    #[test]
    fn test_local_open_error() {
        let src_dir = tempdir().unwrap();
        let remote = MemoryFs::new();
        let copier = PathCopier::new(&remote, CopyOptions::default());

        // Attributes claim a file that is not there by the time it is opened.
        let result = copier.copy_file(
            &FileAttr::file(4, SystemTime::now()),
            &src_dir.path().join("vanished.txt"),
            Path::new("/remote/"),
            None,
        );

        assert!(matches!(result, Err(Error::LocalOpen { .. })));
        assert!(remote.files().is_empty());
    }

    #[test]
    fn test_remote_directory_error() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        fs::write(&src, "data").unwrap();

        let remote = MemoryFs::new();
        remote.fail_mkdir("/remote");

        let result = copy_file(&remote, &src, Path::new("/remote/sub/"), &CopyOptions::default());
        assert!(matches!(result, Err(Error::RemoteDirectory { .. })));
    }

    #[test]
    fn test_bare_destination_name_uses_working_directory() {
        let src_dir = tempdir().unwrap();
        let src = src_dir.path().join("b.txt");
        fs::write(&src, "cwd").unwrap();

        let remote = MemoryFs::new();
        let result = copy_file(&remote, &src, Path::new("c.txt"), &CopyOptions::default()).unwrap();

        assert!(!result.dir_created);
        assert_eq!(remote.read("c.txt").unwrap(), b"cwd");
    }
}
