//! Public API for the `file` crate.

use crate::errors::FileError;

/// A random-access byte store backing a single database file.
///
/// Implementations are thread-safe over `&self`: every method takes a shared
/// reference and is expected to handle its own internal synchronization, the
/// same way the engine this crate is modeled on does for its own disk
/// backend. The single-writer/single-reader model described by the storage
/// engine (one [`crate::disk_file_backend::DiskFileBackend`] per open
/// database) means that synchronization exists for safety, not for
/// concurrent-writer throughput.
pub trait FileBackend {
    /// Reads exactly `length` bytes starting at `offset`.
    ///
    /// A short read (fewer bytes available than requested) is reported as
    /// [`FileError::ShortRead`] rather than returning a truncated buffer;
    /// callers at the page/document layer treat that as `InvalidFileStructure`.
    fn read(&self, offset: u64, length: usize) -> Result<Vec<u8>, FileError>;

    /// Overwrites `data` at `offset`. The region `[offset, offset + data.len())`
    /// must already exist in the backing store (this is used for in-place
    /// rewrites of previously-allocated pages and slots, never to extend it).
    fn write(&self, offset: u64, data: &[u8]) -> Result<(), FileError>;

    /// Appends `data` at the current end of the store and returns the offset
    /// at which it was written.
    fn append(&self, data: &[u8]) -> Result<u64, FileError>;

    /// Current length of the backing store, in bytes.
    fn length(&self) -> Result<u64, FileError>;
}
