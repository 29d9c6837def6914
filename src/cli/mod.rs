//! Command-line interface for libris.
//!
//! Provides commands for listing, searching, borrowing, returning, and
//! adding catalog items. Each command resolves the catalog file, drives the
//! store, and renders the result; the store itself never prints.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use crate::catalog::{CatalogStore, Item, LoadReport};
use crate::config;

/// libris - small library catalog manager
#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog file (overrides LIBRIS_CATALOG and the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List catalog items
    List {
        /// Which items to show
        #[arg(short, long, value_enum, default_value = "all")]
        filter: ListFilter,
    },

    /// Search items by title or ID (case-insensitive substring)
    Search {
        /// Search query
        query: String,
    },

    /// Show the details of a single item
    Show {
        /// Item ID (e.g. B001)
        item_id: String,
    },

    /// Borrow an item
    Borrow {
        /// Item ID to borrow
        item_id: String,
    },

    /// Return a borrowed item
    Return {
        /// Item ID to return
        item_id: String,
    },

    /// Add a new item to the catalog
    Add {
        #[command(subcommand)]
        item: AddCommands,
    },
}

/// Availability filter for the list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFilter {
    /// Every item in the catalog
    All,

    /// Items that can be borrowed right now
    Available,

    /// Items currently checked out
    Borrowed,
}

#[derive(Subcommand, Debug)]
pub enum AddCommands {
    /// Add a book
    Book {
        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        /// Unique item ID (e.g. B006)
        #[arg(long = "id")]
        item_id: String,

        #[arg(long)]
        pages: u32,

        #[arg(long)]
        genre: String,
    },

    /// Add a DVD
    Dvd {
        #[arg(long)]
        title: String,

        #[arg(long)]
        director: String,

        /// Duration in minutes
        #[arg(long)]
        duration: u32,

        /// Unique item ID (e.g. D004)
        #[arg(long = "id")]
        item_id: String,
    },

    /// Add a magazine
    Magazine {
        #[arg(long)]
        title: String,

        /// Issue number
        #[arg(long)]
        issue: i64,

        /// Publication date (YYYY-MM-DD)
        #[arg(long)]
        published: NaiveDate,

        /// Unique item ID (e.g. M004)
        #[arg(long = "id")]
        item_id: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let path = match self.catalog {
            Some(path) => path,
            None => config::catalog_path()?,
        };

        let (mut store, report) = CatalogStore::load(&path).await?;
        report_load_problems(&report);

        // First run (or an emptied catalog): populate the demo set
        if store.is_empty() {
            store.seed_demo().await?;
            eprintln!("Catalog was empty; seeded {} demo items.", store.len());
        }

        match self.command {
            Commands::List { filter } => list_items(&store, filter),
            Commands::Search { query } => search_items(&store, &query),
            Commands::Show { item_id } => show_item(&store, &item_id),
            Commands::Borrow { item_id } => borrow_item(&mut store, &item_id).await,
            Commands::Return { item_id } => return_item(&mut store, &item_id).await,
            Commands::Add { item } => add_item(&mut store, item).await,
        }
    }
}

/// Surface anything the loader had to skip or recover from.
///
/// Per-record detail is already logged by the store; this is the short
/// user-facing summary.
fn report_load_problems(report: &LoadReport) {
    if report.document_error.is_some() {
        eprintln!("Warning: catalog file was unreadable; starting with an empty catalog.");
    }
    if !report.skipped.is_empty() {
        eprintln!(
            "Warning: {} record(s) skipped while loading the catalog.",
            report.skipped.len()
        );
    }
}

/// List items according to the availability filter
fn list_items(store: &CatalogStore, filter: ListFilter) -> Result<()> {
    let items: Vec<&Item> = match filter {
        ListFilter::All => store.list_all().iter().collect(),
        ListFilter::Available => store.list_available(),
        ListFilter::Borrowed => store.list_borrowed(),
    };

    if items.is_empty() {
        println!("No items to display in this category.");
        return Ok(());
    }

    print_item_table(&items);
    println!("\nTotal: {} item(s)", items.len());

    Ok(())
}

/// Search the catalog by title or ID
fn search_items(store: &CatalogStore, query: &str) -> Result<()> {
    let results = store.search(query);

    if results.is_empty() {
        println!("No items found matching: {}", query);
        return Ok(());
    }

    println!("Found {} result(s) for \"{}\":\n", results.len(), query);
    print_item_table(&results);

    Ok(())
}

/// Show one item's full description
fn show_item(store: &CatalogStore, item_id: &str) -> Result<()> {
    let item = store
        .find_by_id(item_id)
        .ok_or_else(|| anyhow::anyhow!("no item with id {}", item_id))?;

    println!("{}", item.describe());
    println!(
        "Status: {}",
        if item.is_available() {
            "available"
        } else {
            "checked out"
        }
    );

    Ok(())
}

/// Borrow an item and persist the new state
async fn borrow_item(store: &mut CatalogStore, item_id: &str) -> Result<()> {
    let item = store.borrow_item(item_id).await?;
    println!("You have borrowed '{}'.", item.title());
    Ok(())
}

/// Return an item and persist the new state
async fn return_item(store: &mut CatalogStore, item_id: &str) -> Result<()> {
    let item = store.return_item(item_id).await?;
    println!("Thank you for returning '{}'.", item.title());
    Ok(())
}

/// Add a new item to the catalog
async fn add_item(store: &mut CatalogStore, command: AddCommands) -> Result<()> {
    let item = match command {
        AddCommands::Book {
            title,
            author,
            item_id,
            pages,
            genre,
        } => Item::book(title, author, item_id.as_str(), pages, genre),
        AddCommands::Dvd {
            title,
            director,
            duration,
            item_id,
        } => Item::dvd(title, director, duration, item_id.as_str()),
        AddCommands::Magazine {
            title,
            issue,
            published,
            item_id,
        } => Item::magazine(title, issue, published, item_id.as_str()),
    };

    let summary = item.describe();
    store.add_item(item).await?;
    println!("Added {}", summary);

    Ok(())
}

/// Print items as an aligned table
fn print_item_table(items: &[&Item]) {
    println!("{:<8} {:<10} {:<11} {}", "ID", "TYPE", "STATUS", "TITLE");
    println!("{}", "-".repeat(60));

    for item in items {
        let status = if item.is_available() {
            "available"
        } else {
            "borrowed"
        };
        println!(
            "{:<8} {:<10} {:<11} {}",
            item.item_id().as_str(),
            item.kind(),
            status,
            item.title()
        );
    }
}
