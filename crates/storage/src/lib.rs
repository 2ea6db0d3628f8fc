pub mod backend;
pub mod error;
mod models;
mod path;

pub use crate::backend::FolderStore;
pub use crate::models::{ChildEntry, EntryId, EntryKind, FolderPage};
pub use crate::path::validate as validate_entry_path;
use std::sync::Arc;

/// Shared handle to a configured store, constructed once and injected into
/// every component that needs it.
pub type StoreHandle = Arc<dyn FolderStore + Send + Sync>;
