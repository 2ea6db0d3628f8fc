//! Live catalog indexing: breadth-first store traversal and cover matching.

use crate::error::{ErrorKind, Result};
use crate::models::Index;
use crate::normalize::{document_title, image_base, keys_match, normalize};
use async_stream::stream;
use bookstall_storage::{ChildEntry, EntryId, FolderStore};
use exn::ResultExt;
use futures::{Stream, TryStreamExt};
use std::collections::VecDeque;

/// Options for one indexing pass.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Case-insensitive trailing marker identifying sellable documents.
    pub document_suffix: String,
}
impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            document_suffix: ".docx".to_string(),
        }
    }
}

/// Progress events yielded by [`index_stream`].
pub enum IndexEvent {
    Started,
    /// A folder's listing has been processed; `books` documents were found
    /// in it.
    FolderVisited { folder: EntryId, books: usize },
    Complete(Index),
}

/// Walk the folder tree under `root` and build the catalog index.
///
/// See [`index_stream`] for the traversal semantics; this is the collecting
/// convenience over it.
pub async fn index(store: &dyn FolderStore, root: &EntryId, options: &IndexOptions) -> Result<Index> {
    let events = index_stream(store, root.clone(), options);
    futures::pin_mut!(events);
    while let Some(event) = events.try_next().await? {
        if let IndexEvent::Complete(index) = event {
            tracing::info!(store = store.name(), books = index.len(), covers = index.covers.len(), "indexing pass complete");
            return Ok(index);
        }
    }
    // The stream always ends with Complete unless it yielded an error,
    // which `?` above already propagated.
    exn::bail!(ErrorKind::Store)
}

/// Streaming variant of [`index`], yielding progress events as folders are
/// visited. Identical semantics: any listing failure ends the stream with
/// an error and no partial index is produced.
pub fn index_stream<'a>(
    store: &'a dyn FolderStore,
    root: EntryId,
    options: &'a IndexOptions,
) -> impl Stream<Item = Result<IndexEvent>> + 'a {
    stream! {
        yield Ok(IndexEvent::Started);
        let mut index = Index::default();
        // Breadth-first; order doesn't matter for correctness since results
        // are deduplicated by title, but it keeps progress events shallow
        // before deep.
        let mut queue = VecDeque::from([root]);
        while let Some(folder) = queue.pop_front() {
            let children = match store.list_children(&folder).await.or_raise(|| ErrorKind::Store) {
                Ok(children) => children,
                Err(error) => {
                    yield Err(error);
                    return;
                },
            };
            let books = visit_folder(&mut index, &mut queue, children, options);
            yield Ok(IndexEvent::FolderVisited { folder, books });
        }
        yield Ok(IndexEvent::Complete(index));
    }
}

/// Process one folder's children: queue sub-folders, register documents,
/// and match covers folder-scoped. Returns how many documents were found.
fn visit_folder(index: &mut Index, queue: &mut VecDeque<EntryId>, children: Vec<ChildEntry>, options: &IndexOptions) -> usize {
    let mut documents: Vec<(String, EntryId)> = Vec::new();
    // (normalized base name, id) in listing order
    let mut images: Vec<(String, EntryId)> = Vec::new();
    for child in children {
        if child.is_folder() {
            queue.push_back(child.id);
        } else if let Some(title) = document_title(&child.name, &options.document_suffix) {
            documents.push((title.to_string(), child.id));
        } else if let Some(base) = image_base(&child.name) {
            images.push((normalize(base), child.id));
        }
    }
    let found = documents.len();
    for (title, document) in documents {
        let key = normalize(&title);
        // Last writer wins on duplicate titles across folders...
        index.documents.insert(title.clone(), document);
        // ...but an established cover is not re-evaluated within a pass.
        if index.covers.contains_key(&title) {
            continue;
        }
        // First match in listing order, not best match, no scoring. A
        // folder with images but no match still yields a cover: any image
        // beats none for the storefront grid.
        let matched = images.iter().find(|(base, _)| keys_match(&key, base)).or_else(|| images.first());
        if let Some((_, cover)) = matched {
            index.covers.insert(title, cover.clone());
        }
    }
    found
}
