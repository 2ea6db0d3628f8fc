//! In-memory store backend for testing.

use crate::backend::FolderStore;
use crate::error::{ErrorKind, Result};
use crate::models::{ChildEntry, EntryId, FolderPage};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// In-memory store backend for testing.
///
/// The folder tree is assembled up front with `&mut self` builder calls and
/// then only read through the trait, so no interior locking is needed.
/// Children keep their insertion order, which is what "whatever order the
/// underlying listing returns" means for a test double.
///
/// # Examples
///
/// ```
/// use bookstall_storage::backend::{FolderStore, MockBackend};
/// use bookstall_storage::EntryId;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = MockBackend::new();
/// let shelf = store.add_folder(&EntryId::root(), "Shadow Run", "f1");
/// store.add_file(&shelf, "Shadow Run Ebook.docx", "d1", b"text".to_vec());
///
/// assert_eq!(store.list_children(&shelf).await?.len(), 1);
/// assert_eq!(store.read(&EntryId::from("d1")).await?, b"text");
/// # Ok(())
/// # }
/// ```
pub struct MockBackend {
    name: String,
    folders: HashMap<EntryId, Vec<ChildEntry>>,
    files: HashMap<EntryId, Vec<u8>>,
    failing: HashSet<EntryId>,
    page_size: Option<usize>,
}

impl MockBackend {
    /// Create an empty store containing only the root folder.
    pub fn new() -> Self {
        let mut folders = HashMap::new();
        folders.insert(EntryId::root(), Vec::new());
        Self {
            name: "mock".to_string(),
            folders,
            files: HashMap::new(),
            failing: HashSet::new(),
            page_size: None,
        }
    }

    /// Change the name of the mock store.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Serve listings in fixed-size pages with numeric continuation tokens.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    /// Register a child folder under `parent` and return its id.
    ///
    /// Panics if the parent is unknown. The panic is DELIBERATE: this is a
    /// test double, and broken test setup should not pass.
    pub fn add_folder(&mut self, parent: &EntryId, name: &str, id: impl Into<EntryId>) -> EntryId {
        let id = id.into();
        self.folders.insert(id.clone(), Vec::new());
        self.child(parent, ChildEntry::folder(name, id.clone()));
        id
    }

    /// Register a file with contents under `parent` and return its id.
    ///
    /// Panics if the parent is unknown, same as [`add_folder`](Self::add_folder).
    pub fn add_file(&mut self, parent: &EntryId, name: &str, id: impl Into<EntryId>, data: impl Into<Vec<u8>>) -> EntryId {
        let id = id.into();
        let data = data.into();
        let size = data.len() as u64;
        self.files.insert(id.clone(), data);
        self.child(parent, ChildEntry::file(name, id.clone()).with_size(size));
        id
    }

    /// Make every listing of `folder` fail with a backend error, to test
    /// that callers propagate listing failures instead of swallowing them.
    pub fn fail_listing(&mut self, folder: impl Into<EntryId>) {
        self.failing.insert(folder.into());
    }

    fn child(&mut self, parent: &EntryId, entry: ChildEntry) {
        self.folders
            .get_mut(parent)
            .unwrap_or_else(|| panic!("MockBackend: unknown parent folder `{parent}`"))
            .push(entry);
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FolderStore for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_folder(&self, folder: &EntryId, page_token: Option<&str>) -> Result<FolderPage> {
        if self.failing.contains(folder) {
            exn::bail!(ErrorKind::Backend(format!("injected listing failure for `{folder}`")));
        }
        let children = self.folders.get(folder).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(folder.clone())))?;
        let start = match page_token {
            Some(token) => token.parse::<usize>().map_err(|_| ErrorKind::InvalidToken(token.to_string()))?,
            None => 0,
        };
        let start = start.min(children.len());
        let taken = match self.page_size {
            Some(size) => size.min(children.len() - start),
            None => children.len() - start,
        };
        let entries = children[start..start + taken].to_vec();
        let next_token = (start + taken < children.len()).then(|| (start + taken).to_string());
        Ok(FolderPage { entries, next_token })
    }

    async fn read(&self, file: &EntryId) -> Result<Vec<u8>> {
        self.files.get(file).cloned().ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(file.clone())))
    }

    async fn read_head(&self, file: &EntryId, bytes: usize) -> Result<Vec<u8>> {
        let data = self.files.get(file).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(file.clone())))?;
        Ok(data[..bytes.min(data.len())].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shelf() -> (MockBackend, EntryId) {
        let mut store = MockBackend::new();
        let folder = store.add_folder(&EntryId::root(), "Moonlight", "f1");
        store.add_file(&folder, "Moonlight.docx", "d1", b"doc".to_vec());
        store.add_file(&folder, "random_art.png", "i1", b"img".to_vec());
        (store, folder)
    }

    #[tokio::test]
    async fn lists_in_insertion_order() {
        let (store, folder) = shelf();
        let children = store.list_children(&folder).await.unwrap();
        let names: Vec<_> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Moonlight.docx", "random_art.png"]);
    }

    #[tokio::test]
    async fn paginates_with_numeric_tokens() {
        let (store, folder) = shelf();
        let store = store.with_page_size(1);
        let first = store.list_folder(&folder, None).await.unwrap();
        assert_eq!(first.entries.len(), 1);
        assert_eq!(first.next_token.as_deref(), Some("1"));
        let second = store.list_folder(&folder, first.next_token.as_deref()).await.unwrap();
        assert_eq!(second.entries[0].name, "random_art.png");
        assert!(second.next_token.is_none());
    }

    #[tokio::test]
    async fn rejects_garbage_tokens() {
        let (store, folder) = shelf();
        let err = store.list_folder(&folder, Some("not-a-number")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidToken(_)));
    }

    #[tokio::test]
    async fn injected_failures_surface() {
        let (mut store, folder) = shelf();
        store.fail_listing(folder.clone());
        let err = store.list_folder(&folder, None).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Backend(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn reads_and_heads() {
        let (store, _) = shelf();
        assert_eq!(store.read(&EntryId::from("d1")).await.unwrap(), b"doc");
        assert_eq!(store.read_head(&EntryId::from("d1"), 2).await.unwrap(), b"do");
        let err = store.read(&EntryId::from("nope")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    #[should_panic(expected = "unknown parent folder")]
    fn unknown_parent_panics() {
        let mut store = MockBackend::new();
        store.add_file(&EntryId::from("ghost"), "x.docx", "d9", b"".to_vec());
    }
}
