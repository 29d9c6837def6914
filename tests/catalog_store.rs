//! Catalog Store Integration Tests
//!
//! Persistence round-trips, partial-failure-tolerant loading, and the demo
//! seed contract, all exercised against real files in a temp directory.

use chrono::NaiveDate;
use libris::catalog::{CatalogStore, Item, SkipReason};
use tempfile::TempDir;

fn catalog_path(temp: &TempDir) -> std::path::PathBuf {
    temp.path().join("catalog.json")
}

async fn fresh_store(temp: &TempDir) -> CatalogStore {
    let (store, report) = CatalogStore::load(catalog_path(temp)).await.unwrap();
    assert!(report.file_absent);
    store
}

#[tokio::test]
async fn test_round_trip_preserves_all_variants() {
    let temp = TempDir::new().unwrap();
    let mut store = fresh_store(&temp).await;

    store
        .add_item(Item::book(
            "Dune",
            "Frank Herbert",
            "B003",
            412,
            "Science Fiction",
        ))
        .await
        .unwrap();
    store
        .add_item(Item::dvd("The Matrix", "Wachowskis", 136, "D001"))
        .await
        .unwrap();
    store
        .add_item(Item::magazine(
            "National Geographic",
            230,
            NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(),
            "M001",
        ))
        .await
        .unwrap();

    // Availability must survive the round-trip too
    store.borrow_item("D001").await.unwrap();

    let original: Vec<Item> = store.list_all().to_vec();
    drop(store);

    let (reloaded, report) = CatalogStore::load(catalog_path(&temp)).await.unwrap();
    assert_eq!(report.loaded, 3);
    assert!(report.skipped.is_empty());
    assert_eq!(reloaded.list_all(), original.as_slice());
    assert!(!reloaded.find_by_id("D001").unwrap().is_available());

    let magazine = reloaded.find_by_id("M001").unwrap();
    assert_eq!(magazine.kind(), "Magazine");
    assert!(magazine.describe().contains("2023-10-01"));
}

#[tokio::test]
async fn test_load_keeps_good_record_and_skips_unknown_variant() {
    let temp = TempDir::new().unwrap();
    let path = catalog_path(&temp);

    std::fs::write(
        &path,
        r#"[
        { "type": "Book", "title": "Dune", "author": "Frank Herbert",
          "itemId": "B003", "numPages": 412, "genre": "Science Fiction",
          "available": true },
        { "type": "Cassette", "title": "Mixtape", "itemId": "C001" }
    ]"#,
    )
    .unwrap();

    let (store, report) = CatalogStore::load(&path).await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.find_by_id("B003").unwrap().title(), "Dune");

    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 1);
    assert_eq!(
        report.skipped[0].reason,
        SkipReason::UnknownVariant("Cassette".to_string())
    );
}

#[tokio::test]
async fn test_load_skips_duplicates_and_incomplete_records() {
    let temp = TempDir::new().unwrap();
    let path = catalog_path(&temp);

    std::fs::write(
        &path,
        r#"[
        { "type": "DVD", "title": "Inception", "director": "Christopher Nolan",
          "duration": 148, "itemId": "D002", "author": "", "available": true },
        { "type": "DVD", "title": "Inception (copy)", "director": "Christopher Nolan",
          "duration": 148, "itemId": "D002", "author": "", "available": true },
        { "title": "No discriminator", "itemId": "X001" },
        { "type": "Book", "title": "Missing fields", "itemId": "B009" }
    ]"#,
    )
    .unwrap();

    let (store, report) = CatalogStore::load(&path).await.unwrap();

    // First record wins, everything else is reported, nothing aborts
    assert_eq!(store.len(), 1);
    assert_eq!(store.find_by_id("D002").unwrap().title(), "Inception");

    assert_eq!(report.skipped.len(), 3);
    assert!(matches!(report.skipped[0].reason, SkipReason::DuplicateId(_)));
    assert_eq!(report.skipped[1].reason, SkipReason::MissingDiscriminator);
    assert!(matches!(report.skipped[2].reason, SkipReason::Malformed(_)));
}

#[tokio::test]
async fn test_malformed_document_recovers_to_empty() {
    let temp = TempDir::new().unwrap();
    let path = catalog_path(&temp);

    std::fs::write(&path, "{ this is not a JSON array").unwrap();

    let (store, report) = CatalogStore::load(&path).await.unwrap();
    assert!(store.is_empty());
    assert!(report.document_error.is_some());
    assert!(!report.file_absent);
}

#[tokio::test]
async fn test_seed_demo_persists_across_reload() {
    let temp = TempDir::new().unwrap();
    let mut store = fresh_store(&temp).await;

    store.seed_demo().await.unwrap();
    drop(store);

    let (reloaded, report) = CatalogStore::load(catalog_path(&temp)).await.unwrap();
    assert_eq!(report.loaded, 11);
    assert!(report.skipped.is_empty());

    assert_eq!(reloaded.len(), 11);
    assert!(!reloaded.find_by_id("B002").unwrap().is_available());
    assert!(!reloaded.find_by_id("D003").unwrap().is_available());
    assert_eq!(reloaded.list_available().len(), 9);
}

#[tokio::test]
async fn test_successful_mutations_persist_failed_ones_do_not() {
    let temp = TempDir::new().unwrap();
    let path = catalog_path(&temp);
    let mut store = fresh_store(&temp).await;

    store
        .add_item(Item::book("1984", "George Orwell", "B002", 328, "Dystopian"))
        .await
        .unwrap();
    store.borrow_item("B002").await.unwrap();

    let after_borrow = std::fs::read_to_string(&path).unwrap();
    assert!(after_borrow.contains("\"available\": false"));

    // A rejected mutation must not rewrite the file
    store
        .add_item(Item::book("1984 again", "George Orwell", "B002", 328, "Dystopian"))
        .await
        .unwrap_err();
    store.borrow_item("B002").await.unwrap_err();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), after_borrow);

    // Return persists the flip back to available
    store.return_item("B002").await.unwrap();
    let (reloaded, _) = CatalogStore::load(&path).await.unwrap();
    assert!(reloaded.find_by_id("B002").unwrap().is_available());
}
