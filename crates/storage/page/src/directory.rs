//! Shared 10-byte directory-entry protocol used by master pages.
//!
//! An entry is `(page_size: u8, page_type: u8, file_offset: u64 LE)`. A
//! zero file offset denotes an unused slot and terminates iteration, the
//! same convention [`crate::slot_chain`] uses for document slots.

use crate::errors::slot_error::SlotError;
use crate::header::HEADER_SIZE;
use crate::page_ref::PageReference;
use crate::page_size::PageSize;
use crate::page_type::PageType;
use binary_helpers::le::{read_le, write_le};
use std::convert::TryFrom;

/// Size in bytes of a single directory entry.
pub const ENTRY_SIZE: usize = 10;

/// How many directory entries fit in a page of the given byte length.
pub fn capacity(page_byte_length: usize) -> usize {
    (page_byte_length - HEADER_SIZE) / ENTRY_SIZE
}

/// Byte offset of the `index`-th directory entry.
pub fn entry_offset(index: usize) -> usize {
    HEADER_SIZE + index * ENTRY_SIZE
}

/// Reads the entry at `offset`. Returns `None` for an unused (zero-offset) slot.
pub fn read_entry(bytes: &[u8], offset: usize) -> Result<Option<PageReference>, SlotError> {
    let file_offset = read_le::<u64>(bytes, offset + 2)?;
    if file_offset == 0 {
        return Ok(None);
    }
    let size_byte = read_le::<u8>(bytes, offset)?;
    let type_byte = read_le::<u8>(bytes, offset + 1)?;
    let size = PageSize::try_from(size_byte).map_err(|_| SlotError::InvalidSlot {
        slot_index: offset,
    })?;
    let page_type = PageType::try_from(type_byte).map_err(|_| SlotError::InvalidSlot {
        slot_index: offset,
    })?;
    Ok(Some(PageReference::new(size, page_type, file_offset)))
}

/// Writes `entry` at `offset`.
pub fn write_entry(bytes: &mut [u8], offset: usize, entry: PageReference) -> Result<(), SlotError> {
    write_le::<u8>(bytes, offset, entry.size.into())?;
    write_le::<u8>(bytes, offset + 1, entry.page_type.into())?;
    write_le::<u64>(bytes, offset + 2, entry.offset)?;
    Ok(())
}

/// Counts live (non-zero-offset) entries starting from index 0, stopping at
/// the first unused slot.
pub fn live_count(bytes: &[u8]) -> Result<usize, SlotError> {
    let mut count = 0;
    loop {
        let offset = entry_offset(count);
        if offset + ENTRY_SIZE > bytes.len() {
            return Ok(count);
        }
        if read_entry(bytes, offset)?.is_none() {
            return Ok(count);
        }
        count += 1;
    }
}

/// Lazily yields each live [`PageReference`] starting at entry 0, stopping at
/// the first unused slot.
pub struct DirectoryIter<'a> {
    bytes: &'a [u8],
    next_index: usize,
    done: bool,
}

impl<'a> DirectoryIter<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            next_index: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for DirectoryIter<'a> {
    type Item = Result<PageReference, SlotError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let offset = entry_offset(self.next_index);
        if offset + ENTRY_SIZE > self.bytes.len() {
            self.done = true;
            return None;
        }
        match read_entry(self.bytes, offset) {
            Ok(None) => {
                self.done = true;
                None
            }
            Ok(Some(reference)) => {
                self.next_index += 1;
                Some(Ok(reference))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_page_holds_99_entries() {
        assert_eq!(capacity(1000), 99);
    }

    #[test]
    fn entry_round_trip() {
        let mut bytes = [0u8; 1000];
        let entry = PageReference::new(PageSize::Small, PageType::CollectionHeader, 1234);
        write_entry(&mut bytes, entry_offset(0), entry).unwrap();

        let read_back = read_entry(&bytes, entry_offset(0)).unwrap().unwrap();
        assert_eq!(read_back, entry);
    }

    #[test]
    fn zero_offset_entry_is_none() {
        let bytes = [0u8; 1000];
        assert!(read_entry(&bytes, entry_offset(0)).unwrap().is_none());
    }

    #[test]
    fn directory_iter_stops_at_first_unused_slot() {
        let mut bytes = [0u8; 1000];
        let e0 = PageReference::new(PageSize::Small, PageType::CollectionHeader, 100);
        let e1 = PageReference::new(PageSize::Small, PageType::CollectionHeader, 200);
        write_entry(&mut bytes, entry_offset(0), e0).unwrap();
        write_entry(&mut bytes, entry_offset(1), e1).unwrap();

        let all: Vec<_> = DirectoryIter::new(&bytes).collect::<Result<_, _>>().unwrap();
        assert_eq!(all, vec![e0, e1]);
        assert_eq!(live_count(&bytes).unwrap(), 2);
    }
}
