//! Error types for the `file` crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while opening or operating on a backing store.
#[derive(Debug, Error)]
pub enum FileError {
    /// The backing file could not be created or opened.
    #[error("could not open {path}: {source}")]
    NotAccessible { path: PathBuf, source: io::Error },

    /// A read, write, or append failed at the OS level.
    #[error("io error at offset {offset}: {source}")]
    Io { offset: u64, source: io::Error },

    /// A read returned fewer bytes than requested (short read / past end of file).
    #[error("short read at offset {offset}: requested {requested} bytes, got {actual}")]
    ShortRead {
        offset: u64,
        requested: usize,
        actual: usize,
    },
}
