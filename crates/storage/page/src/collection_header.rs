//! Collection header page: the root of a collection's chain. Carries the
//! collection's name, and the first slot array of document references.

use crate::errors::page_error::{PageError, PageResult};
use crate::errors::slot_error::SlotError;
use crate::header::{HeaderMut, HeaderRef, HEADER_SIZE};
use crate::page_size::PageSize;
use crate::page_type::PageType;
use crate::slot_chain::{self, SlotChainIter, SLOT_SIZE};
use binary_helpers::string::{read_len_prefixed_string, write_len_prefixed_string};

/// The root page of a collection: name plus the first document-slot array.
#[derive(Debug, Clone)]
pub struct CollectionHeaderPage {
    bytes: Vec<u8>,
}

impl CollectionHeaderPage {
    /// Builds a fresh, empty `Small` header page for a new collection named `name`.
    pub fn new_empty(name: &str) -> PageResult<Self> {
        let mut bytes = vec![0u8; PageSize::Small.byte_length().expect("Small has a byte length")];
        {
            let mut header = HeaderMut::new(&mut bytes[0..HEADER_SIZE])?;
            header.set_page_size_byte(PageSize::Small.into())?;
            header.set_page_type_byte(PageType::CollectionHeader.into())?;
        }
        write_len_prefixed_string(&mut bytes, HEADER_SIZE, name)?;
        Ok(Self { bytes })
    }

    /// Wraps an already size/type-validated buffer (see [`crate::page::Page::resolve`]).
    pub fn from_validated_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The page's raw bytes, ready to be persisted verbatim.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes `self`, returning the owned byte buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// File offset of the first `CollectionBody` page in this collection's
    /// chain, or `0` if the collection fits entirely in this header page.
    pub fn next_offset(&self) -> PageResult<u64> {
        Ok(HeaderRef::new(&self.bytes[0..HEADER_SIZE])?.get_next_offset()?)
    }

    /// Links this header page to its first body page.
    pub fn set_next_offset(&mut self, offset: u64) -> PageResult<()> {
        Ok(HeaderMut::new(&mut self.bytes[0..HEADER_SIZE])?.set_next_offset(offset)?)
    }

    /// This collection's name.
    pub fn name(&self) -> PageResult<String> {
        let (name, _consumed) = read_len_prefixed_string(&self.bytes, HEADER_SIZE)?;
        Ok(name)
    }

    /// Byte offset of the first document slot, i.e. just past the name.
    pub fn first_entry_offset(&self) -> PageResult<usize> {
        let (_name, consumed) = read_len_prefixed_string(&self.bytes, HEADER_SIZE)?;
        Ok(HEADER_SIZE + consumed)
    }

    /// Lazily iterates over `(slot_offset, document_offset)` for each live
    /// slot, stopping at the first empty one.
    pub fn iter(&self) -> PageResult<SlotChainIter<'_>> {
        Ok(SlotChainIter::new(&self.bytes, self.first_entry_offset()?))
    }

    /// Number of live document slots, i.e. slots before the first empty one.
    pub fn entry_count(&self) -> PageResult<usize> {
        Ok(slot_chain::live_count(&self.bytes, self.first_entry_offset()?)?)
    }

    /// Attempts to append a slot pointing at `document_offset`.
    ///
    /// Returns `Ok(true)` if written, `Ok(false)` if this page's slot array
    /// is full and the caller must spill into a new `CollectionBody` page.
    pub fn try_append_slot(&mut self, document_offset: u64) -> PageResult<bool> {
        let first = self.first_entry_offset()?;
        let count = slot_chain::live_count(&self.bytes, first)?;
        let offset = slot_chain::slot_offset(first, count);
        if offset + SLOT_SIZE > self.bytes.len() {
            return Ok(false);
        }
        slot_chain::write_slot(&mut self.bytes, offset, document_offset)?;
        Ok(true)
    }

    /// Reads the slot at `slot_offset`. Fails if the offset is out of bounds.
    pub fn read_slot(&self, slot_offset: usize) -> PageResult<u64> {
        self.check_slot_offset(slot_offset)?;
        Ok(slot_chain::read_slot(&self.bytes, slot_offset)?)
    }

    /// Overwrites the slot at `slot_offset` with `value`.
    pub fn write_slot(&mut self, slot_offset: usize, value: u64) -> PageResult<()> {
        self.check_slot_offset(slot_offset)?;
        Ok(slot_chain::write_slot(&mut self.bytes, slot_offset, value)?)
    }

    /// Zeroes the slot at `slot_offset`, marking it empty.
    pub fn remove_slot(&mut self, slot_offset: usize) -> PageResult<()> {
        self.write_slot(slot_offset, 0)
    }

    fn check_slot_offset(&self, slot_offset: usize) -> PageResult<()> {
        if slot_offset == 0 || slot_offset + SLOT_SIZE > self.bytes.len() {
            return Err(PageError::Slot(SlotError::InvalidSlot {
                slot_index: slot_offset,
            }));
        }
        Ok(())
    }
}
