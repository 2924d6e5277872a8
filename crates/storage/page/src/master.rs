//! Master page: directory of collection-header page references, and the
//! first node of a chain of master pages used once the directory overflows.

use crate::directory::{self, DirectoryIter, ENTRY_SIZE};
use crate::errors::page_error::{PageError, PageResult};
use crate::header::{HeaderMut, HeaderRef, HEADER_SIZE};
use crate::page_ref::PageReference;
use crate::page_size::PageSize;
use crate::page_type::PageType;

/// A master page: a directory of up to `capacity(page_size)` entries, each
/// naming a `CollectionHeader` page. Master pages never reference anything
/// else, and the chain they form lists only other master pages.
#[derive(Debug, Clone)]
pub struct MasterPage {
    bytes: Vec<u8>,
}

impl MasterPage {
    /// Builds a fresh, empty `Small` master page, not yet persisted anywhere.
    pub fn new_empty() -> Self {
        let mut bytes = vec![0u8; PageSize::Small.byte_length().expect("Small has a byte length")];
        {
            let mut header = HeaderMut::new(&mut bytes[0..HEADER_SIZE])
                .expect("freshly allocated buffer is exactly HEADER_SIZE-prefixed");
            header
                .set_page_size_byte(PageSize::Small.into())
                .expect("write into freshly allocated buffer cannot fail");
            header
                .set_page_type_byte(PageType::Master.into())
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

    /// File offset of the next master page in this chain, or `0` if none.
    pub fn next_offset(&self) -> PageResult<u64> {
        Ok(HeaderRef::new(&self.bytes[0..HEADER_SIZE])?.get_next_offset()?)
    }

    /// Links this master page to the next one in the chain.
    pub fn set_next_offset(&mut self, offset: u64) -> PageResult<()> {
        Ok(HeaderMut::new(&mut self.bytes[0..HEADER_SIZE])?.set_next_offset(offset)?)
    }

    /// A [`PageReference`] to the next master page in the chain, or `None`.
    /// By construction (invariant 3 of the data model) the master chain only
    /// ever links to other master pages.
    pub fn next_reference(&self) -> PageResult<Option<PageReference>> {
        let offset = self.next_offset()?;
        if offset == 0 {
            return Ok(None);
        }
        Ok(Some(PageReference::new(PageSize::Small, PageType::Master, offset)))
    }

    /// Lazily iterates over this page's directory entries, stopping at the
    /// first unused slot.
    pub fn iter(&self) -> DirectoryIter<'_> {
        DirectoryIter::new(&self.bytes)
    }

    /// Number of live directory entries, i.e. entries before the first unused slot.
    pub fn entry_count(&self) -> PageResult<usize> {
        Ok(directory::live_count(&self.bytes)?)
    }

    /// Attempts to append `entry` to this page's directory.
    ///
    /// Returns `Ok(true)` if the entry was written, `Ok(false)` if the
    /// directory is full and the caller must spill into a new master page
    /// (see `storage-api`'s orchestration of the master chain). Rejects any
    /// entry whose type is not `CollectionHeader` — the master chain invariant.
    pub fn try_append_entry(&mut self, entry: PageReference) -> PageResult<bool> {
        if entry.page_type != PageType::CollectionHeader {
            return Err(PageError::UnexpectedPageType {
                expected: PageType::CollectionHeader,
                actual: entry.page_type,
            });
        }

        let count = self.entry_count()?;
        let offset = directory::entry_offset(count);
        if offset + ENTRY_SIZE > self.bytes.len() {
            return Ok(false);
        }
        directory::write_entry(&mut self.bytes, offset, entry)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_master_page_is_empty() {
        let page = MasterPage::new_empty();
        assert_eq!(page.entry_count().unwrap(), 0);
        assert_eq!(page.next_offset().unwrap(), 0);
    }

    #[test]
    fn append_fills_up_to_capacity() {
        let mut page = MasterPage::new_empty();
        let capacity = directory::capacity(page.bytes.len());
        for i in 0..capacity {
            let entry = PageReference::new(PageSize::Small, PageType::CollectionHeader, (i + 1) as u64 * 1000);
            assert!(page.try_append_entry(entry).unwrap());
        }
        let overflow = PageReference::new(PageSize::Small, PageType::CollectionHeader, 999_999);
        assert!(!page.try_append_entry(overflow).unwrap());
        assert_eq!(page.entry_count().unwrap(), capacity);
    }

    #[test]
    fn rejects_non_collection_header_entries() {
        let mut page = MasterPage::new_empty();
        let entry = PageReference::new(PageSize::Small, PageType::CollectionBody, 100);
        assert!(matches!(
            page.try_append_entry(entry),
            Err(PageError::UnexpectedPageType { .. })
        ));
    }
}
