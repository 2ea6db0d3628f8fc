//! Catalog models.

use bookstall_storage::EntryId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Result of one indexing pass over the store.
///
/// Both maps are keyed by book title. A book without a cover has no entry
/// in `covers` at all; absence, not a sentinel, is the signal the
/// storefront uses to render a placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    /// title → document entry id
    pub documents: HashMap<String, EntryId>,
    /// title → matched cover image entry id
    pub covers: HashMap<String, EntryId>,
}

impl Index {
    /// Number of indexed books.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Titles in case-insensitive alphabetical order.
    pub fn titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        titles.sort_by_key(|t| t.to_lowercase());
        titles
    }
}

/// One sellable book as presented by the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub description: String,
    /// Price in minor currency units (499 = $4.99)
    pub price_minor: u64,
    /// Cover reference (URL or store entry id); `None` renders a placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub category: String,
    /// Opaque purchase identifier handed to the checkout provider
    pub product_id: String,
}

/// Aggregate description of a paginated catalog on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Number of page files; at least 1 even for an empty catalog
    pub total_pages: u32,
    /// Total records across all pages
    pub total_books: u64,
    /// category name → number of books
    pub categories: BTreeMap<String, u64>,
}
