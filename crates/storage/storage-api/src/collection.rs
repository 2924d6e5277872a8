//! `Collection`: high-level append / update / remove / count / scan over a
//! single collection's header-plus-body page chain.

use crate::errors::{StoreError, StoreResult};
use binary_helpers::le::read_le;
use doc_codec::Document;
use file::api::FileBackend;
use page::collection_body::CollectionBodyPage;
use page::collection_header::CollectionHeaderPage;
use page::errors::page_error::PageError;
use page::page::Page;
use page::page_ref::{DocumentReference, PageReference};
use page::page_size::{PageSize, SMALL_PAGE_SIZE};
use page::page_type::PageType;
use page::slot_chain::{SlotChainIter, SLOT_SIZE};
use std::marker::PhantomData;

/// A handle onto one collection's chain of pages, borrowed from a
/// [`crate::database::Database`].
///
/// Carries no document codec of its own — every operation that touches
/// document bytes is generic over the caller's [`Document`] implementation,
/// so the same `Collection` can append, say, an `OwnedDocument` one call and
/// a caller-supplied type the next, as long as both satisfy the trait.
#[derive(Debug)]
pub struct Collection<'a, F: FileBackend> {
    file: &'a F,
    header_offset: u64,
}

impl<'a, F: FileBackend> Collection<'a, F> {
    pub(crate) fn new(file: &'a F, header_offset: u64) -> Self {
        Self { file, header_offset }
    }

    /// This collection's name.
    pub fn name(&self) -> StoreResult<String> {
        Ok(self.load_header()?.name()?)
    }

    /// Appends `doc` at end-of-file and links a new slot to it, per §4.5:
    /// walks to the tail page of the chain, writing the slot there if there's
    /// room, else allocating and linking a new `CollectionBody` page first.
    pub fn append<D: Document>(&self, doc: &D) -> StoreResult<(), D::Error> {
        let encoded = doc.encode().map_err(StoreError::InvalidDocument)?;
        let document_offset = self.file.append(&encoded)?;
        self.append_slot(document_offset)
    }

    /// Number of live document slots reachable from this collection's chain
    /// (see [`Self::slot_locations`] for what "reachable" means once a
    /// removal has left a hole).
    pub fn count(&self) -> StoreResult<usize> {
        Ok(self.slot_locations()?.len())
    }

    /// A lazy, finite, non-restartable sequence over every document
    /// currently reachable in this collection. A fresh call always starts a
    /// fresh sequence; an error while resolving one document terminates the
    /// sequence (the failing item is yielded, then the iterator is done).
    pub fn iterate<D: Document>(&self) -> StoreResult<DocumentIter<'a, F, D>, D::Error> {
        let locations = self.slot_locations().map_err(relax_error)?;
        Ok(DocumentIter {
            file: self.file,
            locations: locations.into_iter(),
            failed: false,
            _marker: PhantomData,
        })
    }

    /// Rewrites every document matching `pattern` to `new_doc`, in place if
    /// it fits (`new_doc.byte_length() <= existing.byte_length()`) or by
    /// appending and relinking the slot otherwise. Returns the number of
    /// documents updated.
    pub fn update<D: Document>(&self, pattern: &D, new_doc: &D) -> StoreResult<usize, D::Error> {
        let locations = self.slot_locations().map_err(relax_error)?;
        let mut updated = 0usize;
        for reference in locations {
            let existing = read_document::<F, D>(self.file, reference.document_offset)?;
            if !existing.matches(pattern) {
                continue;
            }
            updated += 1;
            let new_bytes = new_doc.encode().map_err(StoreError::InvalidDocument)?;
            let existing_len = existing.byte_length().map_err(StoreError::InvalidDocument)?;
            if new_bytes.len() <= existing_len {
                self.file.write(reference.document_offset, &new_bytes)?;
            } else {
                let new_offset = self.file.append(&new_bytes)?;
                self.rewrite_slot(reference.page_offset, reference.slot_offset, new_offset)?;
            }
        }
        tracing::debug!(updated, "updated matching documents");
        Ok(updated)
    }

    /// Zeroes the slot of every document matching `pattern`, leaving the
    /// document bytes themselves as dead space. Returns the number removed.
    pub fn remove<D: Document>(&self, pattern: &D) -> StoreResult<usize, D::Error> {
        let locations = self.slot_locations().map_err(relax_error)?;
        let mut removed = 0usize;
        for reference in locations {
            let existing = read_document::<F, D>(self.file, reference.document_offset)?;
            if !existing.matches(pattern) {
                continue;
            }
            self.rewrite_slot(reference.page_offset, reference.slot_offset, 0)?;
            removed += 1;
        }
        tracing::debug!(removed, "removed matching documents");
        Ok(removed)
    }

    /// Every live document's location, walking the chain in allocation order.
    ///
    /// A page contributes entries up to its own first empty slot. If that
    /// leaves the page short of its own capacity (i.e. a zero slot was found
    /// before the page filled up), the scan stops there — it does not visit
    /// any further body pages, even if they exist and hold live entries.
    /// This is the reference behavior chosen in the design notes: the
    /// on-disk format can't distinguish "never used" from "removed", so a
    /// mid-chain removal truncates the logical view of everything after it.
    fn slot_locations(&self) -> StoreResult<Vec<DocumentReference>> {
        let mut locations = Vec::new();
        let mut page_offset = self.header_offset;
        loop {
            let page = self.load_chain_page(page_offset)?;
            let capacity = page.capacity()?;

            let mut live = 0usize;
            for slot in page.iter_slots()? {
                let (slot_offset, document_offset) = slot.map_err(PageError::from)?;
                locations.push(DocumentReference::new(document_offset, page_offset, slot_offset));
                live += 1;
            }

            if live < capacity {
                break;
            }
            let next = page.next_offset()?;
            if next == 0 {
                break;
            }
            page_offset = next;
        }
        Ok(locations)
    }

    /// Implements §4.5's append algorithm: walk every link in the chain
    /// (regardless of fill state — unlike [`Self::slot_locations`], this
    /// follows `next_offset` unconditionally) to find the actual tail page,
    /// then write the new slot there, spilling into a freshly allocated body
    /// page if the tail is full.
    fn append_slot<E>(&self, document_offset: u64) -> StoreResult<(), E>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut page_offset = self.header_offset;
        let mut page = self.load_chain_page(page_offset).map_err(relax_error)?;
        loop {
            let next = page.next_offset()?;
            if next == 0 {
                break;
            }
            page_offset = next;
            page = self.load_chain_page(page_offset).map_err(relax_error)?;
        }

        if page.try_append_slot(document_offset)? {
            self.file.write(page_offset, page.bytes())?;
            return Ok(());
        }

        let mut new_body = CollectionBodyPage::new_empty();
        let new_offset = self.file.append(new_body.bytes())?;
        page.set_next_offset(new_offset)?;
        self.file.write(page_offset, page.bytes())?;
        tracing::debug!(new_offset, "collection body full, spilled into a new body page");

        let appended = new_body.try_append_slot(document_offset)?;
        debug_assert!(appended, "a freshly allocated body page always has room for the first slot");
        self.file.write(new_offset, new_body.bytes())?;
        Ok(())
    }

    fn rewrite_slot<E>(&self, page_offset: u64, slot_offset: usize, value: u64) -> StoreResult<(), E>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut page = self.load_chain_page(page_offset).map_err(relax_error)?;
        page.write_slot(slot_offset, value)?;
        self.file.write(page_offset, page.bytes())?;
        Ok(())
    }

    fn load_header(&self) -> StoreResult<CollectionHeaderPage> {
        let bytes = self.file.read(self.header_offset, SMALL_PAGE_SIZE)?;
        let reference = PageReference::new(PageSize::Small, PageType::CollectionHeader, self.header_offset);
        match Page::resolve(reference, bytes)? {
            Page::CollectionHeader(header) => Ok(header),
            _ => unreachable!("a collection's header_offset always names a CollectionHeader page"),
        }
    }

    fn load_body(&self, offset: u64) -> StoreResult<CollectionBodyPage> {
        let bytes = self.file.read(offset, SMALL_PAGE_SIZE)?;
        let reference = PageReference::new(PageSize::Small, PageType::CollectionBody, offset);
        match Page::resolve(reference, bytes)? {
            Page::CollectionBody(body) => Ok(body),
            _ => unreachable!("a collection's tail chain only ever names CollectionBody pages"),
        }
    }

    fn load_chain_page(&self, offset: u64) -> StoreResult<ChainPage> {
        if offset == self.header_offset {
            Ok(ChainPage::Header(self.load_header()?))
        } else {
            Ok(ChainPage::Body(self.load_body(offset)?))
        }
    }
}

/// Reads the document at `offset`: its leading 4-byte length prefix tells us
/// how many bytes to read in total, then the caller's codec takes over.
fn read_document<F: FileBackend, D: Document>(file: &F, offset: u64) -> StoreResult<D, D::Error> {
    let prefix = file.read(offset, 4)?;
    let total_len = read_le::<u32>(&prefix, 0)
        .map_err(|e| StoreError::InvalidFileStructure(e.to_string()))? as usize;
    let bytes = file.read(offset, total_len)?;
    D::decode(&bytes).map_err(StoreError::InvalidDocument)
}

/// Widens a document-agnostic `StoreError` (`E = Infallible`) into the
/// caller's own `StoreError<E>`. Sound because `InvalidDocument` can never
/// actually be constructed with an `Infallible` payload.
fn relax_error<E>(err: StoreError) -> StoreError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    match err {
        StoreError::NotAccessible(e) => StoreError::NotAccessible(e),
        StoreError::InvalidFileStructure(s) => StoreError::InvalidFileStructure(s),
        StoreError::InvalidPage(e) => StoreError::InvalidPage(e),
        StoreError::InvalidDocumentReference(s) => StoreError::InvalidDocumentReference(s),
        StoreError::InvalidDocument(never) => match never {},
    }
}

/// Either variant of page in a collection's chain, unified over the
/// slot-array protocol they share (see §4.5: "header and body pages share a
/// slot-array protocol").
enum ChainPage {
    Header(CollectionHeaderPage),
    Body(CollectionBodyPage),
}

impl ChainPage {
    fn first_entry_offset(&self) -> Result<usize, PageError> {
        match self {
            ChainPage::Header(h) => h.first_entry_offset(),
            ChainPage::Body(_) => Ok(CollectionBodyPage::FIRST_ENTRY_OFFSET),
        }
    }

    fn capacity(&self) -> Result<usize, PageError> {
        let first = self.first_entry_offset()?;
        Ok((SMALL_PAGE_SIZE - first) / SLOT_SIZE)
    }

    fn iter_slots(&self) -> Result<SlotChainIter<'_>, PageError> {
        match self {
            ChainPage::Header(h) => h.iter(),
            ChainPage::Body(b) => Ok(b.iter()),
        }
    }

    fn next_offset(&self) -> Result<u64, PageError> {
        match self {
            ChainPage::Header(h) => h.next_offset(),
            ChainPage::Body(b) => b.next_offset(),
        }
    }

    fn set_next_offset(&mut self, offset: u64) -> Result<(), PageError> {
        match self {
            ChainPage::Header(h) => h.set_next_offset(offset),
            ChainPage::Body(b) => b.set_next_offset(offset),
        }
    }

    fn try_append_slot(&mut self, document_offset: u64) -> Result<bool, PageError> {
        match self {
            ChainPage::Header(h) => h.try_append_slot(document_offset),
            ChainPage::Body(b) => b.try_append_slot(document_offset),
        }
    }

    fn write_slot(&mut self, slot_offset: usize, value: u64) -> Result<(), PageError> {
        match self {
            ChainPage::Header(h) => h.write_slot(slot_offset, value),
            ChainPage::Body(b) => b.write_slot(slot_offset, value),
        }
    }

    fn bytes(&self) -> &[u8] {
        match self {
            ChainPage::Header(h) => h.bytes(),
            ChainPage::Body(b) => b.bytes(),
        }
    }
}

/// Iterator returned by [`Collection::iterate`]. See that method's docs for
/// the laziness and early-termination contract.
pub struct DocumentIter<'a, F: FileBackend, D: Document> {
    file: &'a F,
    locations: std::vec::IntoIter<DocumentReference>,
    failed: bool,
    _marker: PhantomData<D>,
}

impl<'a, F: FileBackend, D: Document> Iterator for DocumentIter<'a, F, D> {
    type Item = StoreResult<D, D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let reference = self.locations.next()?;
        let result = read_document::<F, D>(self.file, reference.document_offset);
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_codec::{FieldValue, OwnedDocument};
    use file::in_memory_file_backend::InMemoryFileBackend;

    fn fresh_collection(file: &InMemoryFileBackend) -> Collection<'_, InMemoryFileBackend> {
        let header = CollectionHeaderPage::new_empty("kaas").unwrap();
        let header_offset = file.append(header.bytes()).unwrap();
        Collection::new(file, header_offset)
    }

    #[test]
    fn empty_collection_has_no_documents() {
        let file = InMemoryFileBackend::new();
        let collection = fresh_collection(&file);
        assert_eq!(collection.count().unwrap(), 0);
        let docs: Vec<_> = collection.iterate::<OwnedDocument>().unwrap().collect();
        assert!(docs.is_empty());
    }

    #[test]
    fn append_then_count_and_iterate() {
        let file = InMemoryFileBackend::new();
        let collection = fresh_collection(&file);
        let doc = OwnedDocument::new().with_bool("awesome", true);
        collection.append(&doc).unwrap();

        assert_eq!(collection.count().unwrap(), 1);
        let docs: Vec<_> = collection
            .iterate::<OwnedDocument>()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(docs, vec![doc]);
    }

    #[test]
    fn append_n_times_then_count_matches() {
        let file = InMemoryFileBackend::new();
        let collection = fresh_collection(&file);
        let doc = OwnedDocument::new().with_bool("awesome", true);
        for _ in 0..4 {
            collection.append(&doc).unwrap();
        }
        assert_eq!(collection.count().unwrap(), 4);
        let docs: Vec<_> = collection
            .iterate::<OwnedDocument>()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(docs.len(), 4);
        for d in docs {
            assert_eq!(d.get("awesome"), Some(&FieldValue::Bool(true)));
        }
    }

    #[test]
    fn update_matching_flips_field() {
        let file = InMemoryFileBackend::new();
        let collection = fresh_collection(&file);
        let doc = OwnedDocument::new().with_bool("awesome", true);
        for _ in 0..4 {
            collection.append(&doc).unwrap();
        }

        let pattern = OwnedDocument::new().with_bool("awesome", true);
        let replacement = OwnedDocument::new().with_bool("awesome", false);
        let updated = collection.update(&pattern, &replacement).unwrap();
        assert_eq!(updated, 4);
        assert_eq!(collection.count().unwrap(), 4);

        for d in collection.iterate::<OwnedDocument>().unwrap() {
            assert_eq!(d.unwrap().get("awesome"), Some(&FieldValue::Bool(false)));
        }
    }

    #[test]
    fn in_place_update_preserves_document_offset() {
        let file = InMemoryFileBackend::new();
        let collection = fresh_collection(&file);
        let doc = OwnedDocument::new().with("n", FieldValue::UInt(1));
        collection.append(&doc).unwrap();

        let before = collection.slot_locations().unwrap();
        let replacement = OwnedDocument::new().with("n", FieldValue::UInt(2));
        collection.update(&doc, &replacement).unwrap();
        let after = collection.slot_locations().unwrap();

        assert_eq!(before[0].document_offset, after[0].document_offset);
    }

    #[test]
    fn growing_update_relocates_to_end_of_file() {
        let file = InMemoryFileBackend::new();
        let collection = fresh_collection(&file);
        let doc = OwnedDocument::new().with("s", FieldValue::Str(String::new()));
        collection.append(&doc).unwrap();

        let length_before = file.length().unwrap();
        let bigger = OwnedDocument::new().with("s", FieldValue::Str("x".repeat(64)));
        collection.update(&doc, &bigger).unwrap();

        let after = collection.slot_locations().unwrap();
        assert!(after[0].document_offset >= length_before);
    }

    #[test]
    fn remove_matching_zeroes_slot_and_hides_document() {
        let file = InMemoryFileBackend::new();
        let collection = fresh_collection(&file);
        let doc = OwnedDocument::new().with_bool("awesome", true);
        collection.append(&doc).unwrap();

        let removed = collection.remove(&doc).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(collection.count().unwrap(), 0);
        let docs: Vec<_> = collection.iterate::<OwnedDocument>().unwrap().collect();
        assert!(docs.is_empty());
    }

    #[test]
    fn overflowing_header_spills_into_a_body_page() {
        let file = InMemoryFileBackend::new();
        let collection = fresh_collection(&file);
        let doc = OwnedDocument::new().with_bool("awesome", true);

        let to_append = 130;
        for _ in 0..to_append {
            collection.append(&doc).unwrap();
        }

        assert_eq!(collection.count().unwrap(), to_append);
        let header = collection.load_header().unwrap();
        assert_ne!(header.next_offset().unwrap(), 0, "header should have spilled into a body page");
    }
}
