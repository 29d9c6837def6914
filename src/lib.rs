//! libris - small library catalog manager
//!
//! A single-user command-line application that manages a catalog of library
//! items (books, DVDs, magazines) persisted to a local JSON file.
//!
//! # Architecture
//!
//! - `catalog`: the item model (closed set of variants with an
//!   available/borrowed state machine) and the store that owns the
//!   collection, enforces ID uniqueness, and round-trips it through JSON
//! - `cli`: clap subcommands driving the store
//! - `config`: catalog file path resolution
//!
//! The store exposes plain operations (list, search, borrow, return, add)
//! so any interface can drive it; the CLI is just one such caller.
//!
//! # Usage
//!
//! ```bash
//! # List everything (seeds a demo catalog on first run)
//! libris list
//!
//! # Borrow and return by ID
//! libris borrow B003
//! libris return B003
//!
//! # Add a new book
//! libris add book --title "Hyperion" --author "Dan Simmons" \
//!     --id B006 --pages 482 --genre "Science Fiction"
//! ```

pub mod catalog;
pub mod cli;
pub mod config;

// Re-export main types at crate root for convenience
pub use catalog::{CatalogError, CatalogStore, Item, ItemId, LoadReport, SkipReason};
