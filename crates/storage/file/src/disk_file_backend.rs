//! Disk-backed implementation of [`FileBackend`].

use crate::api::FileBackend;
use crate::errors::FileError;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[cfg(unix)]
use std::os::unix::fs::FileExt;
#[cfg(windows)]
use std::os::windows::fs::FileExt;

/// A [`FileBackend`] backed by a single OS file handle.
///
/// Reads and writes use positioned I/O (`pread`/`pwrite` on Unix,
/// `seek_read`/`seek_write` on Windows) so they don't disturb a shared file
/// cursor. `append` is serialized behind a mutex tracking the current file
/// length, since "seek to end, then write" is not itself atomic.
#[derive(Debug)]
pub struct DiskFileBackend {
    file: File,
    /// Current logical end-of-file. Protected so `append` can claim a byte
    /// range and write into it without racing another `append`.
    length: Mutex<u64>,
}

impl DiskFileBackend {
    /// Opens (creating if absent) the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path: PathBuf = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| FileError::NotAccessible {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| FileError::NotAccessible { path, source })?;

        let length = file
            .metadata()
            .map_err(|source| FileError::Io { offset: 0, source })?
            .len();

        Ok(Self {
            file,
            length: Mutex::new(length),
        })
    }

    #[inline]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
        #[cfg(unix)]
        {
            self.file.read_at(buf, offset)
        }
        #[cfg(windows)]
        {
            self.file.seek_read(buf, offset)
        }
    }

    #[inline]
    fn write_at(&self, buf: &[u8], offset: u64) -> std::io::Result<usize> {
        #[cfg(unix)]
        {
            self.file.write_at(buf, offset)
        }
        #[cfg(windows)]
        {
            self.file.seek_write(buf, offset)
        }
    }

    fn write_all_at(&self, mut buf: &[u8], mut offset: u64) -> Result<(), FileError> {
        while !buf.is_empty() {
            let n = self
                .write_at(buf, offset)
                .map_err(|source| FileError::Io { offset, source })?;
            if n == 0 {
                return Err(FileError::Io {
                    offset,
                    source: std::io::Error::from(std::io::ErrorKind::WriteZero),
                });
            }
            buf = &buf[n..];
            offset += n as u64;
        }
        Ok(())
    }
}

impl FileBackend for DiskFileBackend {
    fn read(&self, offset: u64, length: usize) -> Result<Vec<u8>, FileError> {
        let mut buf = vec![0u8; length];
        let mut total = 0;
        while total < length {
            let n = self
                .read_at(&mut buf[total..], offset + total as u64)
                .map_err(|source| FileError::Io { offset, source })?;
            if n == 0 {
                return Err(FileError::ShortRead {
                    offset,
                    requested: length,
                    actual: total,
                });
            }
            total += n;
        }
        Ok(buf)
    }

    fn write(&self, offset: u64, data: &[u8]) -> Result<(), FileError> {
        self.write_all_at(data, offset)
    }

    fn append(&self, data: &[u8]) -> Result<u64, FileError> {
        let mut length = self.length.lock().expect("DiskFileBackend length mutex poisoned");
        let offset = *length;
        self.write_all_at(data, offset)?;
        *length = offset + data.len() as u64;
        Ok(offset)
    }

    fn length(&self) -> Result<u64, FileError> {
        Ok(*self.length.lock().expect("DiskFileBackend length mutex poisoned"))
    }
}
