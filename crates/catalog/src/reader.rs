//! Precomputed paginated catalog reading.
//!
//! Instead of indexing the store live, the storefront can serve a catalog
//! that was computed upstream: a `manifest.json` plus one `page_N.json`
//! file per page. A missing or malformed file is a fatal configuration
//! error for that load; the list view is meaningless without it, so
//! nothing here degrades silently.

use crate::error::{ErrorKind, Result};
use crate::models::{BookRecord, Manifest};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File name of the catalog manifest inside the catalog directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// File name of a 1-based catalog page.
pub fn page_file_name(page: u32) -> String {
    format!("page_{page}.json")
}

/// Reads a paginated catalog from a directory.
///
/// Loading is idempotent; callers that want memoization put the results in
/// a cache keyed by page number.
#[derive(Debug, Clone)]
pub struct CatalogReader {
    dir: PathBuf,
}

impl CatalogReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load and validate the manifest.
    pub async fn manifest(&self) -> Result<Manifest> {
        let path = self.dir.join(MANIFEST_FILE);
        let bytes = fs::read(&path).await.or_raise(|| ErrorKind::ManifestMissing(path.clone()))?;
        let manifest: Manifest = serde_json::from_slice(&bytes).or_raise(|| ErrorKind::ManifestInvalid(path.clone()))?;
        if manifest.total_pages == 0 {
            exn::bail!(ErrorKind::ManifestInvalid(path));
        }
        Ok(manifest)
    }

    /// Records of 1-based page `page`. Rejects page numbers outside
    /// `1..=total_pages`.
    pub async fn page(&self, page: u32) -> Result<Vec<BookRecord>> {
        let manifest = self.manifest().await?;
        if page == 0 || page > manifest.total_pages {
            exn::bail!(ErrorKind::PageOutOfRange(page, manifest.total_pages));
        }
        self.load_page_file(page).await
    }

    /// Every record across all pages in ascending page order, then sorted
    /// by case-insensitive title.
    pub async fn all(&self) -> Result<Vec<BookRecord>> {
        let manifest = self.manifest().await?;
        let mut records = Vec::with_capacity(manifest.total_books as usize);
        for page in 1..=manifest.total_pages {
            records.extend(self.load_page_file(page).await?);
        }
        records.sort_by_key(|record| record.title.to_lowercase());
        Ok(records)
    }

    async fn load_page_file(&self, page: u32) -> Result<Vec<BookRecord>> {
        let path = self.dir.join(page_file_name(page));
        let bytes = fs::read(&path).await.or_raise(|| ErrorKind::PageMissing(page))?;
        serde_json::from_slice(&bytes).or_raise(|| ErrorKind::PageInvalid(page))
    }
}
