//! Store listing models.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Opaque identifier for an entry (folder or file) in a store.
///
/// What the identifier means is backend-specific: the local backend uses
/// relative paths, the S3 backend uses object keys. Callers must treat ids
/// as opaque and only hand them back to the backend that produced them.
#[derive(Debug, Clone, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// The root folder of a store.
    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Type indicator for a listed child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    File,
}

/// A single child returned by a folder listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    /// Display name within the parent folder
    pub name: String,
    /// Backend identifier for the entry
    pub id: EntryId,
    pub kind: EntryKind,
    /// File size in bytes, when the backend reports one
    pub size: Option<u64>,
    /// Last modified timestamp, when the backend reports one
    pub modified: Option<OffsetDateTime>,
}

impl ChildEntry {
    pub fn folder(name: impl Into<String>, id: impl Into<EntryId>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            kind: EntryKind::Folder,
            size: None,
            modified: None,
        }
    }

    pub fn file(name: impl Into<String>, id: impl Into<EntryId>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            kind: EntryKind::File,
            size: None,
            modified: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_modified(mut self, modified: OffsetDateTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// One page of a folder listing.
///
/// `next_token` is present when the store has more results for this folder;
/// callers pass it back to [`list_folder`](crate::FolderStore::list_folder)
/// to continue.
#[derive(Debug, Clone, Default)]
pub struct FolderPage {
    pub entries: Vec<ChildEntry>,
    pub next_token: Option<String>,
}
