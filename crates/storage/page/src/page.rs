//! The tagged sum over page variants, with shared header access and the
//! `resolve` entry point that turns a freshly read buffer into the right
//! concrete variant.

use crate::collection_body::CollectionBodyPage;
use crate::collection_header::CollectionHeaderPage;
use crate::errors::page_error::{PageError, PageResult};
use crate::master::MasterPage;
use crate::page_ref::PageReference;
use crate::page_size::PageSize;
use crate::page_type::PageType;
use std::convert::TryFrom;

/// A page read from, or about to be written to, the file.
///
/// `Page = Master | CollectionHeader | CollectionBody`, matching the three
/// types the engine ever allocates (`Unknown` and `Index` are reserved and
/// always rejected by [`Page::resolve`]).
#[derive(Debug, Clone)]
pub enum Page {
    Master(MasterPage),
    CollectionHeader(CollectionHeaderPage),
    CollectionBody(CollectionBodyPage),
}

impl Page {
    /// This page's on-disk size. Always `Small` today.
    pub fn size(&self) -> PageSize {
        PageSize::Small
    }

    /// This page's type discriminant.
    pub fn page_type(&self) -> PageType {
        match self {
            Page::Master(_) => PageType::Master,
            Page::CollectionHeader(_) => PageType::CollectionHeader,
            Page::CollectionBody(_) => PageType::CollectionBody,
        }
    }

    /// The page's raw bytes, ready to be persisted verbatim.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Page::Master(p) => p.bytes(),
            Page::CollectionHeader(p) => p.bytes(),
            Page::CollectionBody(p) => p.bytes(),
        }
    }

    /// File offset of the next page in this page's own chain, or `0`.
    pub fn next_offset(&self) -> PageResult<u64> {
        match self {
            Page::Master(p) => p.next_offset(),
            Page::CollectionHeader(p) => p.next_offset(),
            Page::CollectionBody(p) => p.next_offset(),
        }
    }

    /// Links this page to the next one in its chain.
    pub fn set_next_offset(&mut self, offset: u64) -> PageResult<()> {
        match self {
            Page::Master(p) => p.set_next_offset(offset),
            Page::CollectionHeader(p) => p.set_next_offset(offset),
            Page::CollectionBody(p) => p.set_next_offset(offset),
        }
    }

    /// A [`PageReference`] to the next page in this page's chain, or `None`
    /// if there isn't one. Per invariant 3 of the data model, a master
    /// page's chain only ever links to another `Master` page, while a
    /// collection's chain always links to a `CollectionBody` page — a
    /// `CollectionHeader` is only ever the head of its chain, never a link
    /// target, so a header's own `next` always names a body, not another
    /// header.
    pub fn next_reference(&self) -> PageResult<Option<PageReference>> {
        let offset = self.next_offset()?;
        if offset == 0 {
            return Ok(None);
        }
        let next_type = match self {
            Page::Master(_) => PageType::Master,
            Page::CollectionHeader(_) | Page::CollectionBody(_) => PageType::CollectionBody,
        };
        Ok(Some(PageReference::new(self.size(), next_type, offset)))
    }

    /// Parses a freshly read buffer into the page variant named by `reference`,
    /// validating size, type, and buffer length along the way.
    pub fn resolve(reference: PageReference, bytes: Vec<u8>) -> PageResult<Page> {
        let expected_len = reference
            .size
            .byte_length()
            .ok_or(PageError::InvalidPageSizeByte(0))?;
        if bytes.len() != expected_len {
            return Err(PageError::BufferSizeMismatch {
                actual: bytes.len(),
                expected: expected_len,
            });
        }

        let size_byte = bytes[0];
        let actual_size =
            PageSize::try_from(size_byte).map_err(|_| PageError::InvalidPageSizeByte(size_byte))?;
        if actual_size != reference.size {
            return Err(PageError::InvalidPageSizeByte(size_byte));
        }

        let type_byte = bytes[1];
        let actual_type =
            PageType::try_from(type_byte).map_err(|_| PageError::InvalidPageTypeByte(type_byte))?;
        if !actual_type.is_supported() {
            return Err(PageError::InvalidPageTypeByte(type_byte));
        }
        if actual_type != reference.page_type {
            return Err(PageError::UnexpectedPageType {
                expected: reference.page_type,
                actual: actual_type,
            });
        }

        match actual_type {
            PageType::Master => Ok(Page::Master(MasterPage::from_validated_bytes(bytes))),
            PageType::CollectionHeader => Ok(Page::CollectionHeader(
                CollectionHeaderPage::from_validated_bytes(bytes),
            )),
            PageType::CollectionBody => Ok(Page::CollectionBody(
                CollectionBodyPage::from_validated_bytes(bytes),
            )),
            PageType::Unknown | PageType::Index => {
                unreachable!("rejected by the is_supported() check above")
            }
        }
    }

    pub fn as_master(&self) -> Option<&MasterPage> {
        match self {
            Page::Master(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_collection_header(&self) -> Option<&CollectionHeaderPage> {
        match self {
            Page::CollectionHeader(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_collection_body(&self) -> Option<&CollectionBodyPage> {
        match self {
            Page::CollectionBody(p) => Some(p),
            _ => None,
        }
    }
}

impl From<MasterPage> for Page {
    fn from(p: MasterPage) -> Self {
        Page::Master(p)
    }
}

impl From<CollectionHeaderPage> for Page {
    fn from(p: CollectionHeaderPage) -> Self {
        Page::CollectionHeader(p)
    }
}

impl From<CollectionBodyPage> for Page {
    fn from(p: CollectionBodyPage) -> Self {
        Page::CollectionBody(p)
    }
}
