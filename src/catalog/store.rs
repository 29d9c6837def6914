//! Catalog store: owns the item collection and its JSON persistence.
//!
//! The store is constructed with an explicit file path and mediates every
//! read and mutation. Successful mutations persist synchronously; read-only
//! operations never touch the file.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

use super::item::{Item, ItemId};
use super::CatalogError;

/// Why a record was skipped during load
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("record has no 'type' discriminator")]
    MissingDiscriminator,

    #[error("unknown item type: {0}")]
    UnknownVariant(String),

    #[error("duplicate item id: {0}")]
    DuplicateId(ItemId),

    #[error("malformed record: {0}")]
    Malformed(String),
}

/// A record the loader refused, with its position in the file
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// Zero-based index in the persisted array
    pub index: usize,
    pub reason: SkipReason,
}

/// Outcome of a [`CatalogStore::load`] call.
///
/// Load is partial-failure-tolerant: one bad record never aborts the whole
/// load. The report records exactly what was kept and what was refused so
/// callers (and tests) can inspect the damage instead of guessing from logs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Number of items loaded into the store
    pub loaded: usize,

    /// Records refused during load, in file order
    pub skipped: Vec<SkippedRecord>,

    /// The catalog file did not exist (first run)
    pub file_absent: bool,

    /// The document as a whole was not valid JSON; the store started empty
    pub document_error: Option<String>,
}

/// In-memory item collection plus its JSON persistence.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    items: Vec<Item>,
}

impl CatalogStore {
    /// Load the catalog from `path`.
    ///
    /// A missing file yields an empty store, not an error. A structurally
    /// invalid document also yields an empty store, with the parse error
    /// recorded in the report. Individual records that cannot be
    /// reconstructed are skipped with a reason. Only I/O failures on an
    /// existing file are returned as errors.
    pub async fn load(path: impl Into<PathBuf>) -> Result<(Self, LoadReport), CatalogError> {
        let path = path.into();
        let mut store = Self {
            path,
            items: Vec::new(),
        };
        let mut report = LoadReport::default();

        let raw = match fs::read_to_string(&store.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "catalog file not found, starting empty: {}",
                    store.path.display()
                );
                report.file_absent = true;
                return Ok((store, report));
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "catalog file is not a valid JSON array ({}), starting empty: {}",
                    e,
                    store.path.display()
                );
                report.document_error = Some(e.to_string());
                return Ok((store, report));
            }
        };

        for (index, record) in records.into_iter().enumerate() {
            match parse_record(record) {
                Ok(item) => {
                    if store.find_by_id(item.item_id().as_str()).is_some() {
                        let reason = SkipReason::DuplicateId(item.item_id().clone());
                        warn!("skipping record {}: {}", index, reason);
                        report.skipped.push(SkippedRecord { index, reason });
                    } else {
                        store.items.push(item);
                    }
                }
                Err(reason) => {
                    warn!("skipping record {}: {}", index, reason);
                    report.skipped.push(SkippedRecord { index, reason });
                }
            }
        }

        report.loaded = store.items.len();
        Ok((store, report))
    }

    /// Save the full collection to the catalog file.
    ///
    /// Writes to a sibling temp file and renames over the target, so a crash
    /// mid-write cannot truncate an existing catalog.
    pub async fn save(&self) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(&self.items)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;

        Ok(())
    }

    /// The file this store persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Find an item by its exact ID
    pub fn find_by_id(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.item_id().as_str() == id)
    }

    /// All items, in insertion order
    pub fn list_all(&self) -> &[Item] {
        &self.items
    }

    /// Items that can currently be borrowed
    pub fn list_available(&self) -> Vec<&Item> {
        self.items.iter().filter(|i| i.is_available()).collect()
    }

    /// Items currently checked out
    pub fn list_borrowed(&self) -> Vec<&Item> {
        self.items.iter().filter(|i| !i.is_available()).collect()
    }

    /// Search items by case-insensitive substring match against title or ID.
    ///
    /// An empty query yields an empty result set rather than the full
    /// catalog; dumping everything is what [`CatalogStore::list_all`] is for.
    pub fn search(&self, query: &str) -> Vec<&Item> {
        if query.is_empty() {
            return Vec::new();
        }
        let query = query.to_lowercase();

        self.items
            .iter()
            .filter(|item| {
                item.title().to_lowercase().contains(&query)
                    || item.item_id().as_str().to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Add an item and persist.
    ///
    /// Fails with [`CatalogError::DuplicateId`] when the ID is already taken;
    /// nothing is mutated and nothing is written in that case.
    pub async fn add_item(&mut self, item: Item) -> Result<(), CatalogError> {
        if self.find_by_id(item.item_id().as_str()).is_some() {
            return Err(CatalogError::DuplicateId(item.item_id().clone()));
        }
        self.items.push(item);
        self.save().await
    }

    /// Borrow an item by ID and persist the new state
    pub async fn borrow_item(&mut self, id: &str) -> Result<&Item, CatalogError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| CatalogError::NotFound(ItemId::new(id)))?;
        self.items[index].borrow()?;
        self.save().await?;
        Ok(&self.items[index])
    }

    /// Return an item by ID and persist the new state.
    ///
    /// Returning an item that is already available succeeds (the model's
    /// return is idempotent); the only failure is an unknown ID.
    pub async fn return_item(&mut self, id: &str) -> Result<&Item, CatalogError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| CatalogError::NotFound(ItemId::new(id)))?;
        self.items[index].return_item();
        self.save().await?;
        Ok(&self.items[index])
    }

    /// Populate an empty store with the fixed demo catalog and persist.
    ///
    /// Eleven items with literal IDs B001–B005, D001–D003, M001–M003;
    /// B002 and D003 start out borrowed to demonstrate both states.
    pub async fn seed_demo(&mut self) -> Result<(), CatalogError> {
        info!("seeding catalog with demo items: {}", self.path.display());

        self.items = demo_items();
        for id in ["B002", "D003"] {
            if let Some(index) = self.index_of(id) {
                self.items[index].borrow()?;
            }
        }

        self.save().await
    }

    /// Number of items in the catalog
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the catalog holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.item_id().as_str() == id)
    }
}

/// Reconstruct one persisted record, classifying any refusal
fn parse_record(record: Value) -> Result<Item, SkipReason> {
    let tag = match record.get("type") {
        Some(Value::String(tag)) => tag.clone(),
        Some(_) | None => return Err(SkipReason::MissingDiscriminator),
    };

    if !matches!(tag.as_str(), "Book" | "DVD" | "Magazine") {
        return Err(SkipReason::UnknownVariant(tag));
    }

    serde_json::from_value(record).map_err(|e| SkipReason::Malformed(e.to_string()))
}

/// The fixed demo set used to populate a first-run catalog
fn demo_items() -> Vec<Item> {
    fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
    }

    vec![
        Item::book("The Hobbit", "J.R.R. Tolkien", "B001", 310, "Fantasy"),
        Item::book("1984", "George Orwell", "B002", 328, "Dystopian"),
        Item::book("Dune", "Frank Herbert", "B003", 412, "Science Fiction"),
        Item::book("Foundation", "Isaac Asimov", "B004", 255, "Science Fiction"),
        Item::book("Brave New World", "Aldous Huxley", "B005", 311, "Dystopian"),
        Item::dvd("The Matrix", "Wachowskis", 136, "D001"),
        Item::dvd("Inception", "Christopher Nolan", 148, "D002"),
        Item::dvd("The Lord of the Rings", "Peter Jackson", 201, "D003"),
        Item::magazine("National Geographic", 230, date(2023, 10, 1), "M001"),
        Item::magazine("Scientific American", 1089, date(2024, 1, 1), "M002"),
        Item::magazine("Time", 5221, date(2023, 12, 25), "M003"),
    ]
}
