//! # sftpcopy
//!
//! Copy a local file or directory tree to a remote host over SFTP.
//!
//! ## Core Features
//!
//! - **Path mapping**: `src/` copies a tree's contents, `src` recreates the tree itself
//! - **Rename on copy**: a single file can land under a new name
//! - **Change detection**: files whose remote copy has the same size and a newer mtime are skipped
//! - **Remote directory creation**: missing remote directories are created on demand
//! - **Fail fast**: the first error stops the whole copy
//! - **Pluggable remote**: anything implementing [`RemoteFs`], including the in-memory [`MemoryFs`]
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use sftpcopy::{CopyBuilder, SessionConfig, SftpSession};
//!
//! let config = SessionConfig::new("deploy").with_host("example.com");
//! let session = SftpSession::connect(&config)?;
//!
//! let stats = CopyBuilder::new(&session, "public/", "/srv/www").run()?;
//! println!("Copied {} files ({} bytes)", stats.files_copied, stats.bytes_copied);
//! # Ok::<(), sftpcopy::Error>(())
//! ```
//!
//! ## Function API
//!
//! ```
//! use sftpcopy::{copy, CopyOptions, MemoryFs, OnConflict};
//! use std::path::Path;
//!
//! let remote = MemoryFs::new();
//! let options = CopyOptions::default().with_on_conflict(OnConflict::Overwrite);
//! let result = copy(&remote, Path::new("missing"), Path::new("/srv"), &options);
//! assert!(result.is_err());
//! ```
//!
//! ## Path Mapping
//!
//! | Source | Destination | Result |
//! |--------|-------------|--------|
//! | `/a/b.txt` | `/remote/dir/` | `/remote/dir/b.txt` |
//! | `/a/b.txt` | `/remote/dir/c.txt` | `/remote/dir/c.txt` |
//! | `/data/src/` (with `x/1.txt`) | `/remote/out` | `/remote/out/x/1.txt` |
//! | `/data/src` (with `x/1.txt`) | `/remote/out` | `/remote/out/src/x/1.txt` |
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ssh` | [`SftpSession`] backed by ssh2 (default) |
//! | `tracing` | Per-file logging with the tracing crate (default) |
//! | `serde` | Serialize/Deserialize for [`CopyOptions`] and [`CopyStats`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod copy;
mod error;
mod options;
mod remote;
mod utils;

pub use builder::CopyBuilder;
pub use copy::{CopyEvent, CopyStats, FileCopyResult, PathCopier, copy, copy_file};
pub use error::{Error, Result};
pub use options::{CopyOptions, DEFAULT_BUFFER_SIZE, OnConflict};
pub use remote::{FileAttr, MemoryFile, MemoryFs, RemoteFs};

#[cfg(feature = "ssh")]
#[cfg_attr(docsrs, doc(cfg(feature = "ssh")))]
pub use remote::{SessionConfig, SftpSession};
