//! Store access trait and implementations.
//!
//! This module defines the `FolderStore` trait, which provides a unified
//! interface to a hierarchical file store across different backends (local
//! filesystem, S3-compatible services, etc.).

mod local;
#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "s3")]
mod s3;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
#[cfg(feature = "s3")]
pub use self::s3::S3Backend;
use crate::error::Result;
use crate::models::{ChildEntry, EntryId, FolderPage};
use async_trait::async_trait;

/// Unified interface to a hierarchical file store.
///
/// The store is a tree of folders containing files; both are addressed by
/// opaque [`EntryId`]s. Listings are paginated: every backend hands out a
/// continuation token when a folder has more children than it is willing to
/// return in one call, and callers keep re-issuing the call until the store
/// reports no further continuation.
///
/// # Examples
///
/// ```no_run
/// use bookstall_storage::{EntryId, FolderStore, error::Result};
///
/// async fn count_children(store: &dyn FolderStore) -> Result<usize> {
///     let children = store.list_children(&EntryId::root()).await?;
///     Ok(children.len())
/// }
/// ```
#[async_trait]
pub trait FolderStore: Send + Sync {
    /// Name of the configured store (name taken from the configuration
    /// object key). Used for logging only.
    fn name(&self) -> &str;

    /// List one page of a folder's immediate children.
    ///
    /// Pass the previous page's [`next_token`](FolderPage::next_token) as
    /// `page_token` to continue; `None` starts from the beginning. A page
    /// with `next_token: None` is the last one.
    ///
    /// Tokens are backend-specific and only meaningful for the folder they
    /// were issued for.
    async fn list_folder(&self, folder: &EntryId, page_token: Option<&str>) -> Result<FolderPage>;

    /// List all of a folder's immediate children, draining every
    /// continuation page.
    ///
    /// Default implementation re-issues [`list_folder`](Self::list_folder)
    /// until the store reports no further continuation. Any page failure
    /// fails the whole call; there is no partial result.
    async fn list_children(&self, folder: &EntryId) -> Result<Vec<ChildEntry>> {
        let mut children = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self.list_folder(folder, token.as_deref()).await?;
            children.extend(page.entries);
            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        tracing::debug!(store = self.name(), folder = %folder, count = children.len(), "listed folder");
        Ok(children)
    }

    /// Read a file's full contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn read(&self, file: &EntryId) -> Result<Vec<u8>>;

    /// Read only the first N bytes (for format sniffing).
    ///
    /// If the file is smaller than `bytes`, returns the entire file. This
    /// should **not** be used where the full contents matter; it exists so
    /// callers can cheaply reject documents they won't be able to process.
    async fn read_head(&self, file: &EntryId, bytes: usize) -> Result<Vec<u8>>;
}
