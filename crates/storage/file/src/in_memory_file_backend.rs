//! In-memory implementation of [`FileBackend`], used by tests and by
//! embedding scenarios that don't need persistence.

use crate::api::FileBackend;
use crate::errors::FileError;
use std::sync::RwLock;

/// A [`FileBackend`] backed by a growable in-memory byte buffer.
#[derive(Debug, Default)]
pub struct InMemoryFileBackend {
    bytes: RwLock<Vec<u8>>,
}

impl InMemoryFileBackend {
    /// Creates a new, empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileBackend for InMemoryFileBackend {
    fn read(&self, offset: u64, length: usize) -> Result<Vec<u8>, FileError> {
        let bytes = self.bytes.read().expect("InMemoryFileBackend poisoned");
        let start = offset as usize;
        let end = start + length;
        bytes
            .get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or(FileError::ShortRead {
                offset,
                requested: length,
                actual: bytes.len().saturating_sub(start),
            })
    }

    fn write(&self, offset: u64, data: &[u8]) -> Result<(), FileError> {
        let mut bytes = self.bytes.write().expect("InMemoryFileBackend poisoned");
        let start = offset as usize;
        let end = start + data.len();
        if end > bytes.len() {
            return Err(FileError::ShortRead {
                offset,
                requested: data.len(),
                actual: bytes.len().saturating_sub(start),
            });
        }
        bytes[start..end].copy_from_slice(data);
        Ok(())
    }

    fn append(&self, data: &[u8]) -> Result<u64, FileError> {
        let mut bytes = self.bytes.write().expect("InMemoryFileBackend poisoned");
        let offset = bytes.len() as u64;
        bytes.extend_from_slice(data);
        Ok(offset)
    }

    fn length(&self) -> Result<u64, FileError> {
        Ok(self.bytes.read().expect("InMemoryFileBackend poisoned").len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_read_round_trips() {
        let backend = InMemoryFileBackend::new();
        let offset = backend.append(b"hello").unwrap();
        assert_eq!(offset, 0);
        assert_eq!(backend.read(0, 5).unwrap(), b"hello");
        assert_eq!(backend.length().unwrap(), 5);
    }

    #[test]
    fn write_overwrites_in_place() {
        let backend = InMemoryFileBackend::new();
        backend.append(b"aaaaa").unwrap();
        backend.write(1, b"bb").unwrap();
        assert_eq!(backend.read(0, 5).unwrap(), b"abbaa");
    }

    #[test]
    fn short_read_past_end_errors() {
        let backend = InMemoryFileBackend::new();
        backend.append(b"ab").unwrap();
        let result = backend.read(0, 10);
        assert!(matches!(result, Err(FileError::ShortRead { .. })));
    }
}
