//! Collection body page: a continuation node in a collection's
//! document-reference chain, once the header page's own slot array fills up.

use crate::errors::page_error::{PageError, PageResult};
use crate::errors::slot_error::SlotError;
use crate::header::{HeaderMut, HeaderRef, HEADER_SIZE};
use crate::page_size::PageSize;
use crate::page_type::PageType;
use crate::slot_chain::{self, SlotChainIter, SLOT_SIZE};

/// A continuation node of a collection's slot-array chain. Unlike the header
/// page, a body page carries no name — its slot array starts right after
/// the 10-byte header.
#[derive(Debug, Clone)]
pub struct CollectionBodyPage {
    bytes: Vec<u8>,
}

impl CollectionBodyPage {
    /// Byte offset of the first document slot in any body page.
    pub const FIRST_ENTRY_OFFSET: usize = HEADER_SIZE;

    /// Builds a fresh, empty `Small` body page.
    pub fn new_empty() -> Self {
        let mut bytes = vec![0u8; PageSize::Small.byte_length().expect("Small has a byte length")];
        {
            let mut header = HeaderMut::new(&mut bytes[0..HEADER_SIZE])
                .expect("freshly allocated buffer is exactly HEADER_SIZE-prefixed");
            header
                .set_page_size_byte(PageSize::Small.into())
                .expect("write into freshly allocated buffer cannot fail");
            header
                .set_page_type_byte(PageType::CollectionBody.into())
                .expect("write into freshly allocated buffer cannot fail");
        }
        Self { bytes }
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

    /// File offset of the next body page in this collection's chain, or `0`.
    pub fn next_offset(&self) -> PageResult<u64> {
        Ok(HeaderRef::new(&self.bytes[0..HEADER_SIZE])?.get_next_offset()?)
    }

    /// Links this body page to the next one in the chain.
    pub fn set_next_offset(&mut self, offset: u64) -> PageResult<()> {
        Ok(HeaderMut::new(&mut self.bytes[0..HEADER_SIZE])?.set_next_offset(offset)?)
    }

    /// Lazily iterates over `(slot_offset, document_offset)` for each live
    /// slot, stopping at the first empty one.
    pub fn iter(&self) -> SlotChainIter<'_> {
        SlotChainIter::new(&self.bytes, Self::FIRST_ENTRY_OFFSET)
    }

    /// Number of live document slots, i.e. slots before the first empty one.
    pub fn entry_count(&self) -> PageResult<usize> {
        Ok(slot_chain::live_count(&self.bytes, Self::FIRST_ENTRY_OFFSET)?)
    }

    /// Attempts to append a slot pointing at `document_offset`.
    ///
    /// Returns `Ok(true)` if written, `Ok(false)` if this page's slot array
    /// is full and the caller must spill into a new body page.
    pub fn try_append_slot(&mut self, document_offset: u64) -> PageResult<bool> {
        let count = slot_chain::live_count(&self.bytes, Self::FIRST_ENTRY_OFFSET)?;
        let offset = slot_chain::slot_offset(Self::FIRST_ENTRY_OFFSET, count);
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
