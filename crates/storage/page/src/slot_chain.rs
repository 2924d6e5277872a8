//! Shared 8-byte document-slot array protocol used by both collection header
//! and collection body pages.
//!
//! A slot is a single little-endian `u64` file offset. Zero means empty.
//! Iteration over a slot array stops at the first zero slot — see the design
//! notes on why this implementation does not distinguish "never used" from
//! "removed".

use crate::errors::slot_error::SlotError;
use binary_helpers::le::{read_le, write_le};

/// Size in bytes of a single document slot.
pub const SLOT_SIZE: usize = 8;

/// Byte offset of the `index`-th slot, given the offset of the first slot.
pub fn slot_offset(first_entry_offset: usize, index: usize) -> usize {
    first_entry_offset + index * SLOT_SIZE
}

/// Reads the slot at `offset`. Returns `Ok(0)` for an empty slot.
pub fn read_slot(bytes: &[u8], offset: usize) -> Result<u64, SlotError> {
    Ok(read_le::<u64>(bytes, offset)?)
}

/// Writes `value` into the slot at `offset`.
pub fn write_slot(bytes: &mut [u8], offset: usize, value: u64) -> Result<(), SlotError> {
    Ok(write_le::<u64>(bytes, offset, value)?)
}

/// Counts live (non-zero) entries starting at `first_entry_offset`, stopping
/// at the first zero slot or when the array runs out of room in `bytes`.
pub fn live_count(bytes: &[u8], first_entry_offset: usize) -> Result<usize, SlotError> {
    let mut count = 0;
    loop {
        let offset = slot_offset(first_entry_offset, count);
        if offset + SLOT_SIZE > bytes.len() {
            return Ok(count);
        }
        if read_slot(bytes, offset)? == 0 {
            return Ok(count);
        }
        count += 1;
    }
}

/// Lazily yields `(slot_offset, document_offset)` for each live slot starting
/// at `first_entry_offset`, stopping at the first zero slot.
pub struct SlotChainIter<'a> {
    bytes: &'a [u8],
    next_index: usize,
    first_entry_offset: usize,
    done: bool,
}

impl<'a> SlotChainIter<'a> {
    pub fn new(bytes: &'a [u8], first_entry_offset: usize) -> Self {
        Self {
            bytes,
            next_index: 0,
            first_entry_offset,
            done: false,
        }
    }
}

impl<'a> Iterator for SlotChainIter<'a> {
    type Item = Result<(usize, u64), SlotError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let offset = slot_offset(self.first_entry_offset, self.next_index);
        if offset + SLOT_SIZE > self.bytes.len() {
            self.done = true;
            return None;
        }
        match read_slot(self.bytes, offset) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(doc_offset) => {
                self.next_index += 1;
                Some(Ok((offset, doc_offset)))
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
    fn live_count_stops_at_first_zero() {
        let mut bytes = [0u8; 40];
        write_slot(&mut bytes, 0, 111).unwrap();
        write_slot(&mut bytes, 8, 222).unwrap();
        // slot at offset 16 left zero
        write_slot(&mut bytes, 24, 333).unwrap();
        assert_eq!(live_count(&bytes, 0).unwrap(), 2);
    }

    #[test]
    fn iterator_yields_offsets_and_values() {
        let mut bytes = [0u8; 24];
        write_slot(&mut bytes, 0, 100).unwrap();
        write_slot(&mut bytes, 8, 200).unwrap();

        let got: Vec<_> = SlotChainIter::new(&bytes, 0).collect::<Result<_, _>>().unwrap();
        assert_eq!(got, vec![(0, 100), (8, 200)]);
    }

    #[test]
    fn iterator_stops_at_end_of_buffer() {
        let bytes = [0u8; 4]; // too short for even one slot
        let got: Vec<_> = SlotChainIter::new(&bytes, 0).collect::<Result<_, _>>().unwrap();
        assert!(got.is_empty());
    }
}
