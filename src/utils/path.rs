//! Path mapping between the local source and the remote destination.
//!
//! Trailing separators are significant here, so these helpers look at the
//! raw path bytes where [`Path`]'s component view would hide them.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Whether `path` is spelled with a trailing separator (`dir/`).
pub(crate) fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .as_encoded_bytes()
        .last()
        .is_some_and(|&b| std::path::is_separator(b as char))
}

/// Whether `path` is spelled ending in a `.` segment (`.`, `dir/.`).
///
/// [`Path::components`] drops such a trailing segment, so this looks at
/// the raw bytes.
fn ends_with_current_dir(path: &Path) -> bool {
    match path.as_os_str().as_encoded_bytes() {
        [b'.'] => true,
        [.., sep, b'.'] => std::path::is_separator(*sep as char),
        _ => false,
    }
}

/// Base directory for a tree copy rooted at `src`.
///
/// `src/` maps its contents directly under the destination, so it is its
/// own base. Without the separator the tree itself is recreated under the
/// destination, so the base is the parent. A source that does not end in a
/// plain name (`/`, `.`, `..`) is its own base, since its textual parent is
/// not the directory that contains it.
pub(crate) fn base_directory(src: &Path) -> PathBuf {
    if ends_with_separator(src)
        || ends_with_current_dir(src)
        || !matches!(src.components().next_back(), Some(Component::Normal(_)))
    {
        return src.to_path_buf();
    }
    src.parent().unwrap_or(src).to_path_buf()
}

/// Split a single-file destination into `(directory, file name)`.
///
/// The name is `None` when the destination only names a directory, either
/// by a trailing separator or by ending in `.`/`..`.
pub(crate) fn split_destination(dst: &Path) -> (PathBuf, Option<&OsStr>) {
    if ends_with_separator(dst) {
        return (dst.to_path_buf(), None);
    }
    match dst.file_name() {
        Some(name) => (
            dst.parent().map(Path::to_path_buf).unwrap_or_default(),
            Some(name),
        ),
        None => (dst.to_path_buf(), None),
    }
}

/// Remote directory for `file` when copying a tree based at `base` into `dst`.
///
/// The segments between `base` and `file` are reproduced under `dst`. Only
/// plain names are pushed, so the result never leaves `dst`.
pub(crate) fn tree_target_dir(file: &Path, base: &Path, dst: &Path) -> PathBuf {
    let rel = file.strip_prefix(base).unwrap_or(file);
    let mut dir = dst.to_path_buf();
    if let Some(parent) = rel.parent() {
        for component in parent.components() {
            if let Component::Normal(name) = component {
                dir.push(name);
            }
        }
    }
    dir
}
