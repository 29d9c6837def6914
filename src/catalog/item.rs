//! Catalog item variants and the availability state machine.
//!
//! Items form a closed set: Book, DVD, Magazine. The variant is persisted
//! as a `type` discriminator so records can be reconstructed on load.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::CatalogError;

/// Unique identifier of a catalog item (e.g. "B001")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

fn default_available() -> bool {
    true
}

/// A single catalog entry.
///
/// Wire format is an internally tagged JSON object, one per item:
///
/// ```json
/// { "type": "Book", "title": "Dune", "author": "Frank Herbert",
///   "itemId": "B003", "numPages": 412, "genre": "Science Fiction",
///   "available": true }
/// ```
///
/// DVD and Magazine carry a vestigial empty `author` field on the wire for
/// compatibility with the original file format; it defaults to empty on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Item {
    Book {
        title: String,
        author: String,
        #[serde(rename = "itemId")]
        item_id: ItemId,
        #[serde(rename = "numPages")]
        num_pages: u32,
        genre: String,
        #[serde(default = "default_available")]
        available: bool,
    },
    #[serde(rename = "DVD")]
    Dvd {
        title: String,
        director: String,
        /// Duration in minutes
        duration: u32,
        #[serde(rename = "itemId")]
        item_id: ItemId,
        #[serde(default)]
        author: String,
        #[serde(default = "default_available")]
        available: bool,
    },
    Magazine {
        title: String,
        #[serde(rename = "issueNumber")]
        issue_number: i64,
        /// ISO-8601 `YYYY-MM-DD` on the wire
        #[serde(rename = "publicationDate")]
        publication_date: NaiveDate,
        #[serde(rename = "itemId")]
        item_id: ItemId,
        #[serde(default)]
        author: String,
        #[serde(default = "default_available")]
        available: bool,
    },
}

impl Item {
    /// Create a new book, available by default
    pub fn book(
        title: impl Into<String>,
        author: impl Into<String>,
        item_id: impl Into<ItemId>,
        num_pages: u32,
        genre: impl Into<String>,
    ) -> Self {
        Item::Book {
            title: title.into(),
            author: author.into(),
            item_id: item_id.into(),
            num_pages,
            genre: genre.into(),
            available: true,
        }
    }

    /// Create a new DVD, available by default
    pub fn dvd(
        title: impl Into<String>,
        director: impl Into<String>,
        duration: u32,
        item_id: impl Into<ItemId>,
    ) -> Self {
        Item::Dvd {
            title: title.into(),
            director: director.into(),
            duration,
            item_id: item_id.into(),
            author: String::new(),
            available: true,
        }
    }

    /// Create a new magazine, available by default
    pub fn magazine(
        title: impl Into<String>,
        issue_number: i64,
        publication_date: NaiveDate,
        item_id: impl Into<ItemId>,
    ) -> Self {
        Item::Magazine {
            title: title.into(),
            issue_number,
            publication_date,
            item_id: item_id.into(),
            author: String::new(),
            available: true,
        }
    }

    /// The item's title
    pub fn title(&self) -> &str {
        match self {
            Item::Book { title, .. } | Item::Dvd { title, .. } | Item::Magazine { title, .. } => {
                title
            }
        }
    }

    /// The item's unique identifier
    pub fn item_id(&self) -> &ItemId {
        match self {
            Item::Book { item_id, .. }
            | Item::Dvd { item_id, .. }
            | Item::Magazine { item_id, .. } => item_id,
        }
    }

    /// The primary creator ("director" for a DVD, empty for a magazine)
    pub fn author(&self) -> &str {
        match self {
            Item::Book { author, .. } | Item::Magazine { author, .. } => author,
            Item::Dvd { director, .. } => director,
        }
    }

    /// The variant name as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Item::Book { .. } => "Book",
            Item::Dvd { .. } => "DVD",
            Item::Magazine { .. } => "Magazine",
        }
    }

    /// Check whether the item can currently be borrowed
    pub fn is_available(&self) -> bool {
        match self {
            Item::Book { available, .. }
            | Item::Dvd { available, .. }
            | Item::Magazine { available, .. } => *available,
        }
    }

    fn available_mut(&mut self) -> &mut bool {
        match self {
            Item::Book { available, .. }
            | Item::Dvd { available, .. }
            | Item::Magazine { available, .. } => available,
        }
    }

    /// Mark the item as borrowed.
    ///
    /// Fails with [`CatalogError::AlreadyBorrowed`] and leaves the state
    /// untouched when the item is already checked out.
    pub fn borrow(&mut self) -> Result<(), CatalogError> {
        if !self.is_available() {
            return Err(CatalogError::AlreadyBorrowed(self.item_id().clone()));
        }
        *self.available_mut() = false;
        Ok(())
    }

    /// Mark the item as returned.
    ///
    /// Deliberately idempotent: returning an item that was never borrowed
    /// succeeds and leaves it available.
    pub fn return_item(&mut self) {
        *self.available_mut() = true;
    }

    /// One-line human-readable summary of the item
    pub fn describe(&self) -> String {
        match self {
            Item::Book {
                title,
                author,
                item_id,
                num_pages,
                genre,
                ..
            } => format!(
                "Book: '{}' by {} | Pages: {} | Genre: {} | ID: {}",
                title, author, num_pages, genre, item_id
            ),
            Item::Dvd {
                title,
                director,
                duration,
                item_id,
                ..
            } => format!(
                "DVD: '{}' directed by {} | Duration: {} min | ID: {}",
                title, director, duration, item_id
            ),
            Item::Magazine {
                title,
                issue_number,
                publication_date,
                item_id,
                ..
            } => format!(
                "Magazine: '{}' | Issue: {} | Published: {} | ID: {}",
                title, issue_number, publication_date, item_id
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Item {
        Item::book("Dune", "Frank Herbert", "B003", 412, "Science Fiction")
    }

    #[test]
    fn test_new_item_is_available() {
        let book = sample_book();
        assert!(book.is_available());
        assert_eq!(book.title(), "Dune");
        assert_eq!(book.item_id().as_str(), "B003");
        assert_eq!(book.kind(), "Book");
    }

    #[test]
    fn test_borrow_then_return() {
        let mut book = sample_book();

        book.borrow().unwrap();
        assert!(!book.is_available());

        book.return_item();
        assert!(book.is_available());
    }

    #[test]
    fn test_borrow_unavailable_fails_without_state_change() {
        let mut book = sample_book();
        book.borrow().unwrap();

        let err = book.borrow().unwrap_err();
        assert!(matches!(err, CatalogError::AlreadyBorrowed(ref id) if id.as_str() == "B003"));
        assert!(!book.is_available());
    }

    #[test]
    fn test_return_is_idempotent() {
        let mut book = sample_book();
        book.return_item();
        book.return_item();
        assert!(book.is_available());
    }

    #[test]
    fn test_author_maps_to_director_for_dvd() {
        let dvd = Item::dvd("The Matrix", "Wachowskis", 136, "D001");
        assert_eq!(dvd.author(), "Wachowskis");
    }

    #[test]
    fn test_describe_includes_contract_fields() {
        let book = sample_book();
        let summary = book.describe();
        for field in ["Dune", "Frank Herbert", "412", "Science Fiction", "B003"] {
            assert!(summary.contains(field), "missing {field} in {summary}");
        }

        let magazine = Item::magazine(
            "Time",
            5221,
            NaiveDate::from_ymd_opt(2023, 12, 25).unwrap(),
            "M003",
        );
        assert!(magazine.describe().contains("2023-12-25"));
    }

    #[test]
    fn test_wire_format_book() {
        let json = serde_json::to_value(sample_book()).unwrap();
        assert_eq!(json["type"], "Book");
        assert_eq!(json["itemId"], "B003");
        assert_eq!(json["numPages"], 412);
        assert_eq!(json["available"], true);
    }

    #[test]
    fn test_wire_format_magazine_date_is_iso() {
        let magazine = Item::magazine(
            "National Geographic",
            230,
            NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(),
            "M001",
        );
        let json = serde_json::to_value(&magazine).unwrap();
        assert_eq!(json["type"], "Magazine");
        assert_eq!(json["publicationDate"], "2023-10-01");
        assert_eq!(json["author"], "");
    }

    #[test]
    fn test_deserialize_dvd_without_author_field() {
        let json = r#"{ "type": "DVD", "title": "Inception",
            "director": "Christopher Nolan", "duration": 148,
            "itemId": "D002" }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind(), "DVD");
        assert_eq!(item.author(), "Christopher Nolan");
        assert!(item.is_available());
    }

    #[test]
    fn test_roundtrip_all_variants() {
        let items = vec![
            sample_book(),
            Item::dvd("Inception", "Christopher Nolan", 148, "D002"),
            Item::magazine(
                "Scientific American",
                1089,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                "M002",
            ),
        ];

        let json = serde_json::to_string(&items).unwrap();
        let parsed: Vec<Item> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, items);
    }
}
