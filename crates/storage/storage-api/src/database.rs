//! `Database`: file open/create, version handshake, master page bootstrap,
//! and collection creation/lookup.

use crate::collection::Collection;
use crate::errors::{StoreError, StoreResult};
use crate::options::DatabaseOptions;
use binary_helpers::le::{read_le, write_le};
use file::api::FileBackend;
use file::disk_file_backend::DiskFileBackend;
use file::in_memory_file_backend::InMemoryFileBackend;
use page::collection_header::CollectionHeaderPage;
use page::master::MasterPage;
use page::page::Page;
use page::page_ref::PageReference;
use page::page_size::{PageSize, SMALL_PAGE_SIZE};
use page::page_type::PageType;
use std::path::Path;

/// Current on-disk format version. Readers reject any other value.
const VERSION: u32 = 1;

/// File offset of the first master page, immediately after the 4-byte version.
const FIRST_MASTER_OFFSET: u64 = 4;

/// A single-file embedded document store.
///
/// `F` is the backing byte store; use [`Database::open`] for a disk-backed
/// instance or [`Database::open_in_memory`] for one backed entirely by
/// memory (handy for tests and embedding scenarios with no persistence
/// requirement). The file handle is this type's exclusive resource: per
/// §5 of the design, exactly one `Database` should hold a given backend at
/// a time.
#[derive(Debug)]
pub struct Database<F: FileBackend> {
    file: F,
}

impl Database<DiskFileBackend> {
    /// Opens (creating if absent) the database file at `path`, using default options.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_options(path, DatabaseOptions::default())
    }

    /// Opens (creating if absent) the database file at `path`, governed by `options`.
    pub fn open_with_options(path: impl AsRef<Path>, options: DatabaseOptions) -> StoreResult<Self> {
        let path = path.as_ref();
        let file = DiskFileBackend::open(path)?;
        tracing::info!(path = %path.display(), "opening database file");
        Self::from_backend(file, options)
    }
}

impl Database<InMemoryFileBackend> {
    /// Opens a fresh, entirely in-memory database with default options.
    ///
    /// Never persists anything to disk; useful for tests and for embedding
    /// scenarios where durability isn't required.
    pub fn open_in_memory() -> StoreResult<Self> {
        tracing::info!("opening in-memory database");
        Self::from_backend(InMemoryFileBackend::new(), DatabaseOptions::default())
    }
}

impl<F: FileBackend> Database<F> {
    /// Wraps an already-constructed backend, bootstrapping it if empty and
    /// validating it otherwise.
    pub fn from_backend(file: F, options: DatabaseOptions) -> StoreResult<Self> {
        let length = file.length()?;
        if length == 0 {
            Self::bootstrap(&file, &options)?;
        } else {
            Self::validate_existing(&file)?;
        }
        Ok(Self { file })
    }

    fn bootstrap(file: &F, options: &DatabaseOptions) -> StoreResult<()> {
        let mut version_bytes = [0u8; 4];
        write_le::<u32>(&mut version_bytes, 0, VERSION)
            .map_err(|e| StoreError::InvalidFileStructure(e.to_string()))?;
        let version_offset = file.append(&version_bytes)?;
        debug_assert_eq!(version_offset, 0, "version must be the first bytes written");

        let master = match options.default_page_size() {
            PageSize::Small => MasterPage::new_empty(),
            // No code path selects Medium yet (§9); fall back to Small.
            _ => MasterPage::new_empty(),
        };
        let master_offset = file.append(master.bytes())?;
        debug_assert_eq!(master_offset, FIRST_MASTER_OFFSET);

        tracing::info!("created a new database file and its initial master page");
        Ok(())
    }

    fn validate_existing(file: &F) -> StoreResult<()> {
        let version_bytes = file.read(0, 4)?;
        let version = read_le::<u32>(&version_bytes, 0)
            .map_err(|e| StoreError::InvalidFileStructure(e.to_string()))?;
        if version != VERSION {
            return Err(StoreError::InvalidFileStructure(format!(
                "unsupported format version {version}, expected {VERSION}"
            )));
        }

        let bytes = file.read(FIRST_MASTER_OFFSET, SMALL_PAGE_SIZE)?;
        let reference = PageReference::new(PageSize::Small, PageType::Master, FIRST_MASTER_OFFSET);
        Page::resolve(reference, bytes)?;
        Ok(())
    }

    /// Creates a new, empty collection named `name` and returns a handle to it.
    pub fn make_collection(&self, name: &str) -> StoreResult<Collection<'_, F>> {
        let header = CollectionHeaderPage::new_empty(name)?;
        let header_offset = self.file.append(header.bytes())?;
        tracing::debug!(name, header_offset, "appended a new collection header page");

        let entry = PageReference::new(PageSize::Small, PageType::CollectionHeader, header_offset);
        self.append_to_master_chain(entry)?;

        Ok(Collection::new(&self.file, header_offset))
    }

    /// Looks up an existing collection by name, walking the master directory.
    pub fn open_collection(&self, name: &str) -> StoreResult<Option<Collection<'_, F>>> {
        for reference in self.master_directory_entries()? {
            let bytes = self.file.read(reference.offset, SMALL_PAGE_SIZE)?;
            let header = match Page::resolve(reference, bytes)? {
                Page::CollectionHeader(h) => h,
                _ => unreachable!("master directory entries always name CollectionHeader pages"),
            };
            if header.name()? == name {
                return Ok(Some(Collection::new(&self.file, reference.offset)));
            }
        }
        Ok(None)
    }

    /// The name of every collection registered in the master directory, in
    /// directory order.
    pub fn collection_names(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        for reference in self.master_directory_entries()? {
            let bytes = self.file.read(reference.offset, SMALL_PAGE_SIZE)?;
            let header = match Page::resolve(reference, bytes)? {
                Page::CollectionHeader(h) => h,
                _ => unreachable!("master directory entries always name CollectionHeader pages"),
            };
            names.push(header.name()?);
        }
        Ok(names)
    }

    /// Returns the master page when `number == 0`. Every other number
    /// returns `None` — a placeholder for a future page index.
    pub fn read_page(&self, number: usize) -> StoreResult<Option<MasterPage>> {
        if number != 0 {
            return Ok(None);
        }
        Ok(Some(self.read_master_page(FIRST_MASTER_OFFSET)?))
    }

    fn read_master_page(&self, offset: u64) -> StoreResult<MasterPage> {
        let bytes = self.file.read(offset, SMALL_PAGE_SIZE)?;
        let reference = PageReference::new(PageSize::Small, PageType::Master, offset);
        match Page::resolve(reference, bytes)? {
            Page::Master(m) => Ok(m),
            _ => unreachable!("the master chain only ever names Master pages"),
        }
    }

    /// All directory entries across every master page in the chain, in order.
    fn master_directory_entries(&self) -> StoreResult<Vec<PageReference>> {
        let mut entries = Vec::new();
        let mut page_offset = FIRST_MASTER_OFFSET;
        loop {
            let master = self.read_master_page(page_offset)?;
            for entry in master.iter() {
                entries.push(entry.map_err(page::errors::page_error::PageError::from)?);
            }
            match master.next_reference()? {
                Some(next) => page_offset = next.offset,
                None => break,
            }
        }
        Ok(entries)
    }

    /// Implements §4.4's master-append algorithm: walk to the tail master
    /// page, append the entry if there's room, else spill into a new master
    /// page. Implemented iteratively rather than recursively to avoid
    /// unbounded stack growth on a very long master chain.
    fn append_to_master_chain(&self, entry: PageReference) -> StoreResult<()> {
        let mut page_offset = FIRST_MASTER_OFFSET;
        loop {
            let mut master = self.read_master_page(page_offset)?;

            if let Some(next) = master.next_reference()? {
                page_offset = next.offset;
                continue;
            }

            if master.try_append_entry(entry)? {
                self.file.write(page_offset, master.bytes())?;
                return Ok(());
            }

            let new_master = MasterPage::new_empty();
            let new_offset = self.file.append(new_master.bytes())?;
            master.set_next_offset(new_offset)?;
            self.file.write(page_offset, master.bytes())?;
            tracing::info!(new_offset, "master directory full, spilled into a new master page");

            page_offset = new_offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_codec::{FieldValue, OwnedDocument};

    fn open() -> Database<InMemoryFileBackend> {
        Database::open_in_memory().unwrap()
    }

    /// S1: a fresh collection is empty.
    #[test]
    fn s1_fresh_collection_is_empty() {
        let db = open();
        let kaas = db.make_collection("kaas").unwrap();
        assert_eq!(kaas.count().unwrap(), 0);
        let docs: Vec<_> = kaas.iterate::<OwnedDocument>().unwrap().collect();
        assert!(docs.is_empty());
    }

    /// S2: appending once is reflected in count and the iterated document's fields.
    #[test]
    fn s2_append_once() {
        let db = open();
        let kaas = db.make_collection("kaas").unwrap();
        kaas.append(&OwnedDocument::new().with_bool("awesome", true)).unwrap();

        assert_eq!(kaas.count().unwrap(), 1);
        let docs: Vec<_> = kaas
            .iterate::<OwnedDocument>()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get("awesome"), Some(&FieldValue::Bool(true)));
    }

    /// S3: appending four times is reflected in count and every document.
    #[test]
    fn s3_append_four_times() {
        let db = open();
        let kaas = db.make_collection("kaas").unwrap();
        for _ in 0..4 {
            kaas.append(&OwnedDocument::new().with_bool("awesome", true)).unwrap();
        }

        assert_eq!(kaas.count().unwrap(), 4);
        for doc in kaas.iterate::<OwnedDocument>().unwrap() {
            assert_eq!(doc.unwrap().get("awesome"), Some(&FieldValue::Bool(true)));
        }
    }

    /// S4: update flips every matching document's field, without changing the count.
    #[test]
    fn s4_update_matching() {
        let db = open();
        let kaas = db.make_collection("kaas").unwrap();
        for _ in 0..4 {
            kaas.append(&OwnedDocument::new().with_bool("awesome", true)).unwrap();
        }

        let pattern = OwnedDocument::new().with_bool("awesome", true);
        let replacement = OwnedDocument::new().with_bool("awesome", false);
        kaas.update(&pattern, &replacement).unwrap();

        assert_eq!(kaas.count().unwrap(), 4);
        for doc in kaas.iterate::<OwnedDocument>().unwrap() {
            assert_eq!(doc.unwrap().get("awesome"), Some(&FieldValue::Bool(false)));
        }
    }

    /// S5: remove clears out every matching document.
    #[test]
    fn s5_remove_matching() {
        let db = open();
        let kaas = db.make_collection("kaas").unwrap();
        for _ in 0..4 {
            kaas.append(&OwnedDocument::new().with_bool("awesome", false)).unwrap();
        }

        let pattern = OwnedDocument::new().with_bool("awesome", false);
        let removed = kaas.remove(&pattern).unwrap();
        assert_eq!(removed, 4);

        assert_eq!(kaas.count().unwrap(), 0);
        let docs: Vec<_> = kaas.iterate::<OwnedDocument>().unwrap().collect();
        assert!(docs.is_empty());
    }

    /// S6: overflowing a header page's slot array spills into a linked body page.
    #[test]
    fn s6_overflow_spills_into_body_page() {
        let db = open();
        let kaas = db.make_collection("kaas").unwrap();
        let doc = OwnedDocument::new().with_bool("awesome", true);

        let to_append = 130;
        for _ in 0..to_append {
            kaas.append(&doc).unwrap();
        }

        assert_eq!(kaas.count().unwrap(), to_append);
        assert!(db.read_page(0).unwrap().is_some(), "the initial master page should still resolve");
    }

    #[test]
    fn make_collection_registers_it_in_the_master_directory() {
        let db = open();
        db.make_collection("kaas").unwrap();
        db.make_collection("koek").unwrap();

        let names = db.collection_names().unwrap();
        assert_eq!(names, vec!["kaas".to_owned(), "koek".to_owned()]);
    }

    #[test]
    fn open_collection_finds_an_existing_collection_by_name() {
        let db = open();
        db.make_collection("kaas").unwrap();

        let found = db.open_collection("kaas").unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().name().unwrap(), "kaas");

        assert!(db.open_collection("nope").unwrap().is_none());
    }

    #[test]
    fn master_chain_spills_across_many_collections() {
        let db = open();
        // A Small master page holds 99 entries; make more than that to force a spill.
        for i in 0..150 {
            db.make_collection(&format!("c{i}")).unwrap();
        }

        let names = db.collection_names().unwrap();
        assert_eq!(names.len(), 150);
        assert_eq!(names[0], "c0");
        assert_eq!(names[149], "c149");
    }

    #[test]
    fn reopening_an_existing_file_validates_it_and_keeps_its_collections() {
        let path = std::env::temp_dir().join(format!(
            "docstore-database-test-{:?}.db",
            std::thread::current().id()
        ));
        std::fs::remove_file(&path).ok();

        {
            let db = Database::open(&path).unwrap();
            let kaas = db.make_collection("kaas").unwrap();
            kaas.append(&OwnedDocument::new().with_bool("awesome", true)).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.collection_names().unwrap(), vec!["kaas".to_owned()]);
        let kaas = db.open_collection("kaas").unwrap().unwrap();
        assert_eq!(kaas.count().unwrap(), 1);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let file = InMemoryFileBackend::new();
        file.append(&[2u8, 0, 0, 0]).unwrap();
        file.append(MasterPage::new_empty().bytes()).unwrap();
        let db = Database::from_backend(file, DatabaseOptions::default());
        assert!(matches!(db, Err(StoreError::InvalidFileStructure(_))));
    }
}
