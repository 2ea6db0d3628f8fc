//! Cached catalog service and record hydration.

use crate::error::Result;
use crate::index::{IndexOptions, index};
use crate::models::{BookRecord, Index};
use bookstall_cache::MemoCache;
use bookstall_storage::{EntryId, FolderStore, StoreHandle};
use std::sync::Arc;
use std::time::Duration;

/// Fallback description for books whose document can't be excerpted.
pub const FALLBACK_DESCRIPTION: &str = "A great read. Full description coming soon.";

/// Presentation options applied while hydrating records.
#[derive(Debug, Clone)]
pub struct HydrateOptions {
    /// Storefront-wide price in minor currency units.
    pub price_minor: u64,
    /// Category label stamped on every live-indexed record.
    pub category: String,
    /// Maximum description length in characters.
    pub excerpt_chars: usize,
}
impl Default for HydrateOptions {
    fn default() -> Self {
        Self {
            price_minor: 499,
            category: "General".to_string(),
            excerpt_chars: bookstall_extract::DEFAULT_EXCERPT_CHARS,
        }
    }
}

/// The storefront's view of the store: one injected backend handle and one
/// explicit TTL cache of index snapshots.
///
/// The handle is constructed once at startup and injected here; nothing in
/// this crate memoizes clients globally. Within a cache interval every
/// caller sees the same read-only `Arc`d snapshot.
pub struct Catalog {
    store: StoreHandle,
    root: EntryId,
    options: IndexOptions,
    cache: MemoCache<String, Arc<Index>>,
}

impl Catalog {
    pub fn new(store: StoreHandle, root: EntryId, options: IndexOptions, ttl: Duration) -> Self {
        Self {
            store,
            root,
            options,
            cache: MemoCache::new(ttl),
        }
    }

    fn cache_key(&self) -> String {
        format!("index:{}", self.root)
    }

    /// The current index snapshot, served from cache within the TTL.
    pub async fn index(&self) -> Result<Arc<Index>> {
        if let Some(snapshot) = self.cache.get(&self.cache_key()).await {
            return Ok(snapshot);
        }
        self.rebuild().await
    }

    /// The explicit cache-clear signal: drop the snapshot and re-index now.
    pub async fn refresh(&self) -> Result<Arc<Index>> {
        self.cache.invalidate(&self.cache_key()).await;
        self.rebuild().await
    }

    async fn rebuild(&self) -> Result<Arc<Index>> {
        let snapshot = Arc::new(index(self.store.as_ref(), &self.root, &self.options).await?);
        self.cache.insert(self.cache_key(), Arc::clone(&snapshot)).await;
        Ok(snapshot)
    }

    /// Turn an index snapshot into title-sorted storefront records.
    /// See [`hydrate`].
    pub async fn hydrate(&self, index: &Index, options: &HydrateOptions) -> Vec<BookRecord> {
        hydrate(self.store.as_ref(), index, options).await
    }

    /// Cover bytes for a title, if its cover can be fetched. Failures are
    /// recoverable: the storefront renders a placeholder instead.
    pub async fn cover_bytes(&self, index: &Index, title: &str) -> Option<Vec<u8>> {
        let cover = index.covers.get(title)?;
        match self.store.read(cover).await {
            Ok(bytes) => Some(bytes),
            Err(error) => {
                tracing::warn!(title = %title, error = %&*error, "cover read failed");
                None
            },
        }
    }
}

/// Turn an index snapshot into title-sorted storefront records.
///
/// Per-book failures degrade instead of aborting the listing: a book whose
/// document can't be read or excerpted gets the fallback sentence, and a
/// book without a cover mapping stays cover-less.
pub async fn hydrate(store: &dyn FolderStore, index: &Index, options: &HydrateOptions) -> Vec<BookRecord> {
    let mut records = Vec::with_capacity(index.documents.len());
    for (title, document) in &index.documents {
        let description = match store.read(document).await {
            Ok(bytes) => match bookstall_extract::excerpt(&bytes, options.excerpt_chars) {
                Ok(text) => text,
                Err(error) => {
                    tracing::debug!(title = %title, error = %&*error, "excerpt failed, using fallback");
                    FALLBACK_DESCRIPTION.to_string()
                },
            },
            Err(error) => {
                tracing::warn!(title = %title, error = %&*error, "document read failed, using fallback");
                FALLBACK_DESCRIPTION.to_string()
            },
        };
        records.push(BookRecord {
            title: title.clone(),
            description,
            price_minor: options.price_minor,
            cover: index.covers.get(title).map(|id| id.to_string()),
            category: options.category.clone(),
            product_id: document.to_string(),
        });
    }
    records.sort_by_key(|record| record.title.to_lowercase());
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bookstall_storage::backend::MockBackend;
    use bookstall_storage::{FolderPage, FolderStore, error::Result as StoreResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts listing calls so the cache's behaviour is observable.
    struct CountingStore {
        inner: MockBackend,
        listings: AtomicUsize,
    }
    impl CountingStore {
        fn new(inner: MockBackend) -> Self {
            Self {
                inner,
                listings: AtomicUsize::new(0),
            }
        }
    }
    #[async_trait]
    impl FolderStore for CountingStore {
        fn name(&self) -> &str {
            self.inner.name()
        }
        async fn list_folder(&self, folder: &EntryId, page_token: Option<&str>) -> StoreResult<FolderPage> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            self.inner.list_folder(folder, page_token).await
        }
        async fn read(&self, file: &EntryId) -> StoreResult<Vec<u8>> {
            self.inner.read(file).await
        }
        async fn read_head(&self, file: &EntryId, bytes: usize) -> StoreResult<Vec<u8>> {
            self.inner.read_head(file, bytes).await
        }
    }

    fn seeded_store() -> MockBackend {
        let mut store = MockBackend::new();
        let shelf = store.add_folder(&EntryId::root(), "Shadow Run", "f1");
        store.add_file(
            &shelf,
            "Shadow Run Ebook.docx",
            "d1",
            b"<html><body><p>A heist gone sideways.</p></body></html>".to_vec(),
        );
        store.add_file(&shelf, "Shadow Run - A Thriller.jpg", "i1", b"img-bytes".to_vec());
        let bare = store.add_folder(&EntryId::root(), "Moonlight", "f2");
        // A real docx is a ZIP container; excerpting it fails and the
        // record falls back to the generic sentence.
        store.add_file(&bare, "Moonlight.docx", "d2", b"PK\x03\x04docx-bytes".to_vec());
        store
    }

    fn catalog_over(store: MockBackend, ttl: Duration) -> Catalog {
        Catalog::new(Arc::new(store), EntryId::root(), IndexOptions::default(), ttl)
    }

    #[tokio::test]
    async fn serves_snapshots_from_cache_within_ttl() {
        let store = Arc::new(CountingStore::new(seeded_store()));
        let catalog = Catalog::new(store.clone(), EntryId::root(), IndexOptions::default(), Duration::from_secs(3600));

        let first = catalog.index().await.unwrap();
        let listings = store.listings.load(Ordering::SeqCst);
        assert!(listings > 0);

        let second = catalog.index().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second), "second call must reuse the cached snapshot");
        assert_eq!(store.listings.load(Ordering::SeqCst), listings, "cached call must not touch the store");
    }

    #[tokio::test]
    async fn refresh_rebuilds_even_within_ttl() {
        let store = Arc::new(CountingStore::new(seeded_store()));
        let catalog = Catalog::new(store.clone(), EntryId::root(), IndexOptions::default(), Duration::from_secs(3600));

        let first = catalog.index().await.unwrap();
        let listings = store.listings.load(Ordering::SeqCst);
        let refreshed = catalog.refresh().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &refreshed), "refresh must rebuild the snapshot");
        assert!(store.listings.load(Ordering::SeqCst) > listings);
        assert_eq!(first.documents, refreshed.documents);
    }

    #[tokio::test]
    async fn expired_snapshots_are_rebuilt() {
        let catalog = catalog_over(seeded_store(), Duration::ZERO);

        let first = catalog.index().await.unwrap();
        let second = catalog.index().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second), "zero TTL must re-index every call");
    }

    #[tokio::test]
    async fn hydrates_sorted_records_with_degradation() {
        let catalog = catalog_over(seeded_store(), Duration::from_secs(3600));
        let index = catalog.index().await.unwrap();

        let records = catalog
            .hydrate(
                &index,
                &HydrateOptions {
                    price_minor: 499,
                    category: "Fiction".to_string(),
                    excerpt_chars: 120,
                },
            )
            .await;

        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Moonlight", "Shadow Run Ebook"]);

        let moonlight = &records[0];
        assert_eq!(moonlight.description, FALLBACK_DESCRIPTION);
        assert!(moonlight.cover.is_none());
        assert_eq!(moonlight.product_id, "d2");

        let shadow = &records[1];
        assert_eq!(shadow.description, "A heist gone sideways.");
        assert_eq!(shadow.cover.as_deref(), Some("i1"));
        assert_eq!(shadow.price_minor, 499);
        assert_eq!(shadow.category, "Fiction");
    }

    #[tokio::test]
    async fn cover_bytes_fetches_or_degrades() {
        let catalog = catalog_over(seeded_store(), Duration::from_secs(3600));
        let index = catalog.index().await.unwrap();

        let bytes = catalog.cover_bytes(&index, "Shadow Run Ebook").await;
        assert_eq!(bytes.as_deref(), Some(&b"img-bytes"[..]));
        assert!(catalog.cover_bytes(&index, "Moonlight").await.is_none());
        assert!(catalog.cover_bytes(&index, "Unknown Title").await.is_none());
    }
}
