//! In-memory remote filesystem.
//!
//! Used to exercise the copier without a network session. Paths are
//! compared component-wise, so `/a/b` and `/a/b/` name the same node. The
//! root, `.` and the empty path (the session's working directory) always exist.
//!
//! Faults can be injected per path so each remote error branch can be
//! driven from a test.

use super::{FileAttr, RemoteFs};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File { data: Vec<u8>, modified: SystemTime },
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<PathBuf, Node>,
    fail_stat: BTreeSet<PathBuf>,
    fail_mkdir: BTreeSet<PathBuf>,
    fail_create: BTreeSet<PathBuf>,
    fail_write: BTreeSet<PathBuf>,
}

impl State {
    fn exists_as_dir(&self, path: &Path) -> bool {
        is_implicit_dir(path) || matches!(self.nodes.get(path), Some(Node::Dir))
    }
}

fn is_implicit_dir(path: &Path) -> bool {
    path.as_os_str().is_empty() || path.parent().is_none() || path == Path::new(".")
}

fn injected(path: &Path, op: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("injected {op} failure: {}", path.display()),
    )
}

/// A shared, in-memory directory tree implementing [`RemoteFs`].
///
/// Cloning yields another handle onto the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    state: Arc<Mutex<State>>,
}

impl MemoryFs {
    /// Create an empty filesystem (only the root exists).
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Place a file with the given contents and mtime, creating parents.
    pub fn insert_file(&self, path: impl AsRef<Path>, data: impl Into<Vec<u8>>, modified: SystemTime) {
        let path = path.as_ref();
        let mut state = self.lock();
        for ancestor in path.ancestors().skip(1) {
            if !is_implicit_dir(ancestor) {
                state.nodes.insert(ancestor.to_path_buf(), Node::Dir);
            }
        }
        state.nodes.insert(
            path.to_path_buf(),
            Node::File {
                data: data.into(),
                modified,
            },
        );
    }

    /// Overwrite the mtime of an existing file. Returns false if there is no such file.
    pub fn set_modified(&self, path: impl AsRef<Path>, time: SystemTime) -> bool {
        match self.lock().nodes.get_mut(path.as_ref()) {
            Some(Node::File { modified, .. }) => {
                *modified = time;
                true
            }
            _ => false,
        }
    }

    /// Contents of a file, if it exists.
    pub fn read(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.lock().nodes.get(path.as_ref()) {
            Some(Node::File { data, .. }) => Some(data.clone()),
            _ => None,
        }
    }

    /// Whether `path` is a directory.
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.lock().exists_as_dir(path.as_ref())
    }

    /// All file paths, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.lock()
            .nodes
            .iter()
            .filter(|(_, node)| matches!(node, Node::File { .. }))
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Make every `stat` of `path` fail with a permission error.
    pub fn fail_stat(&self, path: impl AsRef<Path>) {
        self.lock().fail_stat.insert(path.as_ref().to_path_buf());
    }

    /// Make creating the directory `path` fail.
    pub fn fail_mkdir(&self, path: impl AsRef<Path>) {
        self.lock().fail_mkdir.insert(path.as_ref().to_path_buf());
    }

    /// Make `create` of `path` fail.
    pub fn fail_create(&self, path: impl AsRef<Path>) {
        self.lock().fail_create.insert(path.as_ref().to_path_buf());
    }

    /// Let `create` of `path` succeed but fail every write to it.
    pub fn fail_write(&self, path: impl AsRef<Path>) {
        self.lock().fail_write.insert(path.as_ref().to_path_buf());
    }
}

impl RemoteFs for MemoryFs {
    type File = MemoryFile;

    fn stat(&self, path: &Path) -> io::Result<Option<FileAttr>> {
        let state = self.lock();
        if state.fail_stat.contains(path) {
            return Err(injected(path, "stat"));
        }
        if is_implicit_dir(path) {
            return Ok(Some(FileAttr::dir()));
        }
        Ok(state.nodes.get(path).map(|node| match node {
            Node::Dir => FileAttr::dir(),
            Node::File { data, modified } => FileAttr::file(data.len() as u64, *modified),
        }))
    }

    fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.lock();
        let mut missing: Vec<&Path> = path
            .ancestors()
            .take_while(|p| !is_implicit_dir(p))
            .collect();
        missing.reverse();

        for dir in missing {
            match state.nodes.get(dir) {
                Some(Node::Dir) => continue,
                Some(Node::File { .. }) => {
                    return Err(io::Error::new(
                        io::ErrorKind::NotADirectory,
                        format!("not a directory: {}", dir.display()),
                    ));
                }
                None => {}
            }
            if state.fail_mkdir.contains(dir) {
                return Err(injected(dir, "mkdir"));
            }
            state.nodes.insert(dir.to_path_buf(), Node::Dir);
        }
        Ok(())
    }

    fn create(&self, path: &Path) -> io::Result<MemoryFile> {
        let mut state = self.lock();
        if state.fail_create.contains(path) {
            return Err(injected(path, "create"));
        }
        if state.exists_as_dir(path) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("is a directory: {}", path.display()),
            ));
        }
        let parent = path.parent().unwrap_or(Path::new(""));
        if !state.exists_as_dir(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", parent.display()),
            ));
        }

        state.nodes.insert(
            path.to_path_buf(),
            Node::File {
                data: Vec::new(),
                modified: SystemTime::now(),
            },
        );
        let broken = state.fail_write.contains(path);
        drop(state);

        Ok(MemoryFile {
            fs: self.clone(),
            path: path.to_path_buf(),
            broken,
        })
    }
}

/// Write handle onto a [`MemoryFs`] file. Bytes land in the tree as they are written.
#[derive(Debug)]
pub struct MemoryFile {
    fs: MemoryFs,
    path: PathBuf,
    broken: bool,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.broken {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("injected write failure: {}", self.path.display()),
            ));
        }
        match self.fs.lock().nodes.get_mut(&self.path) {
            Some(Node::File { data, modified }) => {
                data.extend_from_slice(buf);
                *modified = SystemTime::now();
                Ok(buf.len())
            }
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file vanished: {}", self.path.display()),
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
