//! Catalog model and store for library items.
//!
//! The catalog is a flat collection of [`Item`]s (books, DVDs, magazines)
//! persisted as a JSON array, one object per item, with a `type`
//! discriminator naming the variant:
//!
//! ```text
//! catalog.json
//! [
//!   { "type": "Book", "itemId": "B001", ... },
//!   { "type": "DVD", "itemId": "D001", ... }
//! ]
//! ```
//!
//! [`CatalogStore`] owns the collection exclusively: every read and mutation
//! goes through it, and every successful mutation re-persists the file.

pub mod item;
pub mod store;

use thiserror::Error;

// Re-export key types
pub use item::{Item, ItemId};
pub use store::{CatalogStore, LoadReport, SkipReason, SkippedRecord};

/// Errors produced by catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no item with id {0}")]
    NotFound(ItemId),

    #[error("an item with id {0} already exists")]
    DuplicateId(ItemId),

    #[error("item {0} is already checked out")]
    AlreadyBorrowed(ItemId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
