//! Precomputed catalog export.

use crate::error::{ErrorKind, Result};
use crate::models::{BookRecord, Manifest};
use crate::reader::{MANIFEST_FILE, page_file_name};
use exn::ResultExt;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

/// Write `records` as a paginated catalog into `dir` (manifest plus one
/// file per page), returning the manifest that was written.
///
/// Records are title-sorted before chunking so that page order matches the
/// storefront's listing order. An empty catalog still writes one empty
/// page; `total_pages` is never zero.
pub async fn write_catalog(dir: &Path, records: &[BookRecord], page_size: usize) -> Result<Manifest> {
    let page_size = page_size.max(1);
    let mut sorted: Vec<&BookRecord> = records.iter().collect();
    sorted.sort_by_key(|record| record.title.to_lowercase());

    let total_pages = sorted.len().div_ceil(page_size).max(1) as u32;
    let mut categories: BTreeMap<String, u64> = BTreeMap::new();
    for record in &sorted {
        *categories.entry(record.category.clone()).or_insert(0) += 1;
    }
    let manifest = Manifest {
        total_pages,
        total_books: sorted.len() as u64,
        categories,
    };

    fs::create_dir_all(dir).await.or_raise(|| ErrorKind::Write)?;
    for page in 1..=total_pages {
        let start = (page as usize - 1) * page_size;
        let end = (start + page_size).min(sorted.len());
        let chunk = &sorted[start.min(sorted.len())..end];
        let json = serde_json::to_vec_pretty(chunk).or_raise(|| ErrorKind::Write)?;
        fs::write(dir.join(page_file_name(page)), json).await.or_raise(|| ErrorKind::Write)?;
    }
    let json = serde_json::to_vec_pretty(&manifest).or_raise(|| ErrorKind::Write)?;
    fs::write(dir.join(MANIFEST_FILE), json).await.or_raise(|| ErrorKind::Write)?;
    tracing::info!(dir = %dir.display(), books = manifest.total_books, pages = manifest.total_pages, "catalog written");
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CatalogReader;

    fn record(title: &str) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            description: String::new(),
            price_minor: 499,
            cover: None,
            category: "General".to_string(),
            product_id: title.to_string(),
        }
    }

    #[tokio::test]
    async fn empty_catalog_still_has_one_page() {
        let temp = tempfile::tempdir().unwrap();
        let manifest = write_catalog(temp.path(), &[], 40).await.unwrap();
        assert_eq!(manifest.total_pages, 1);
        assert_eq!(manifest.total_books, 0);

        let reader = CatalogReader::new(temp.path());
        assert!(reader.page(1).await.unwrap().is_empty());
        assert!(reader.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pages_are_chunked_in_sorted_order() {
        let temp = tempfile::tempdir().unwrap();
        let records: Vec<BookRecord> = ["c", "a", "d", "b", "e"].into_iter().map(record).collect();
        let manifest = write_catalog(temp.path(), &records, 2).await.unwrap();
        assert_eq!(manifest.total_pages, 3);

        let reader = CatalogReader::new(temp.path());
        let titles = |records: Vec<BookRecord>| records.into_iter().map(|r| r.title).collect::<Vec<_>>();
        assert_eq!(titles(reader.page(1).await.unwrap()), ["a", "b"]);
        assert_eq!(titles(reader.page(2).await.unwrap()), ["c", "d"]);
        assert_eq!(titles(reader.page(3).await.unwrap()), ["e"]);
    }
}
