//! Helpers shared by the file and tree copy paths: change detection,
//! remote directory preparation and byte streaming.

use crate::error::{Error, Result};
use crate::remote::{FileAttr, RemoteFs};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// Whether the remote copy can be left alone.
///
/// True only when the sizes match and the source mtime is strictly before
/// the destination mtime. A missing mtime on either side means "changed".
pub(crate) fn is_up_to_date(src: &FileAttr, dst: &FileAttr) -> bool {
    if dst.is_dir || src.size != dst.size {
        return false;
    }
    match (src.modified, dst.modified) {
        (Some(src_time), Some(dst_time)) => src_time < dst_time,
        _ => false,
    }
}

/// Make sure the remote directory `dir` exists.
///
/// Returns `true` if it had to be created. The empty path is the session's
/// working directory and is never touched.
pub(crate) fn ensure_remote_dir<R: RemoteFs>(remote: &R, dir: &Path) -> Result<bool> {
    if dir.as_os_str().is_empty() {
        return Ok(false);
    }

    let to_error = |source| Error::RemoteDirectory {
        path: dir.to_path_buf(),
        source,
    };

    match remote.stat(dir).map_err(to_error)? {
        Some(_) => Ok(false),
        None => {
            remote.mkdir_all(dir).map_err(to_error)?;
            Ok(true)
        }
    }
}

/// Stream `src` into `dst`, writing at most `buffer_size` bytes at a time.
pub(crate) fn copy_contents<W: Write>(src: File, dst: W, buffer_size: usize) -> io::Result<u64> {
    let mut reader = BufReader::with_capacity(buffer_size, src);
    let mut writer = BufWriter::with_capacity(buffer_size, dst);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    Ok(bytes)
}
