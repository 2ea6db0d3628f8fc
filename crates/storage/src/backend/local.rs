//! Local filesystem store backend.
//!
//! Entry ids are relative paths under a configured root directory; the empty
//! id addresses the root folder itself. Children are listed in name order so
//! that the optional page size produces deterministic continuation tokens
//! (the token is the name of the last entry served).

use crate::backend::FolderStore;
use crate::error::{ErrorKind, Result};
use crate::models::{ChildEntry, EntryId, FolderPage};
use crate::path::validate;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tokio::fs;
use tokio::io::AsyncReadExt;

/// Local filesystem store.
///
/// Useful both for development against a synced copy of the drive folder and
/// for filesystem-backed deployments.
///
/// # Examples
///
/// ```no_run
/// use bookstall_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = LocalBackend::new("published", "/srv/bookstall/published")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalBackend {
    name: String,
    /// Root directory holding the published folder tree
    root: PathBuf,
    /// When set, listings are served in pages of this many entries.
    page_size: Option<usize>,
}

impl LocalBackend {
    /// Create a new local filesystem store.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute or does not point at an
    /// existing directory. A storefront with a missing root is misconfigured;
    /// creating it silently would only mask that.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() || !root.is_dir() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        Ok(Self {
            name: name.into(),
            root,
            page_size: None,
        })
    }

    /// Serve listings in fixed-size pages instead of all at once.
    ///
    /// Real deployments can leave this unset; a single local `read_dir` pass
    /// is cheap. Callers that need to exercise continuation-token handling
    /// set it to something small.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    /// Absolute directory path for a folder id.
    fn dir_path(&self, folder: &EntryId) -> Result<PathBuf> {
        if folder.is_root() {
            return Ok(self.root.clone());
        }
        Ok(self.root.join(validate(folder.as_str())?))
    }

    /// Absolute file path for a file id. The root id is not a file.
    fn file_path(&self, file: &EntryId) -> Result<PathBuf> {
        if file.is_root() {
            exn::bail!(ErrorKind::InvalidPath(PathBuf::new()));
        }
        Ok(self.root.join(validate(file.as_str())?))
    }

    /// Entry id of a named child: the parent's normalized id plus the name.
    fn child_id(&self, folder: &EntryId, name: &str) -> Result<EntryId> {
        let relative = if folder.is_root() {
            PathBuf::from(name)
        } else {
            validate(folder.as_str())?.join(name)
        };
        Ok(EntryId::from(relative.to_string_lossy().into_owned()))
    }

    fn map_io_error(err: std::io::Error, id: &EntryId) -> ErrorKind {
        match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(id.clone()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(id.clone()),
            std::io::ErrorKind::NotADirectory => ErrorKind::NotAFolder(id.clone()),
            _ => ErrorKind::Io(err),
        }
    }

    /// Cut one page out of a full, name-sorted listing. The continuation
    /// token is the last name served; names are unique within a directory,
    /// so resuming strictly after the token never duplicates or skips an
    /// entry even if the directory changed between calls.
    fn page_of(children: Vec<ChildEntry>, page_size: Option<usize>, token: Option<&str>) -> FolderPage {
        let start = match token {
            Some(last) => children.iter().position(|c| c.name.as_str() > last).unwrap_or(children.len()),
            None => 0,
        };
        let rest = &children[start..];
        match page_size {
            Some(size) if rest.len() > size => {
                let entries: Vec<ChildEntry> = rest[..size].to_vec();
                let next_token = entries.last().map(|c| c.name.clone());
                FolderPage { entries, next_token }
            },
            _ => FolderPage {
                entries: rest.to_vec(),
                next_token: None,
            },
        }
    }
}

#[async_trait]
impl FolderStore for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_folder(&self, folder: &EntryId, page_token: Option<&str>) -> Result<FolderPage> {
        let dir = self.dir_path(folder)?;
        let mut read_dir = fs::read_dir(&dir).await.map_err(|e| Self::map_io_error(e, folder))?;
        let mut children = Vec::new();
        loop {
            let entry = match read_dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => return Err(exn::Exn::from(Self::map_io_error(e, folder))),
            };
            // Non-UTF8 names can't round-trip through entry ids; skip them.
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            let metadata = entry.metadata().await.map_err(|e| Self::map_io_error(e, folder))?;
            let id = self.child_id(folder, &name)?;
            if metadata.is_dir() {
                children.push(ChildEntry::folder(name, id));
            } else if metadata.is_file() {
                let mut child = ChildEntry::file(name, id).with_size(metadata.len());
                if let Ok(modified) = metadata.modified() {
                    child = child.with_modified(OffsetDateTime::from(modified));
                }
                children.push(child);
            }
            // Note: anything else is most likely a broken symlink; drop it.
        }
        children.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!(store = %self.name, folder = %folder, total = children.len(), "read local directory");
        Ok(Self::page_of(children, self.page_size, page_token))
    }

    async fn read(&self, file: &EntryId) -> Result<Vec<u8>> {
        let path = self.file_path(file)?;
        Ok(fs::read(&path).await.map_err(|e| Self::map_io_error(e, file))?)
    }

    async fn read_head(&self, file: &EntryId, bytes: usize) -> Result<Vec<u8>> {
        let path = self.file_path(file)?;
        let handle = fs::File::open(&path).await.map_err(|e| Self::map_io_error(e, file))?;
        let mut buffer = Vec::with_capacity(bytes);
        handle.take(bytes as u64).read_to_end(&mut buffer).await.map_err(ErrorKind::Io)?;
        Ok(buffer)
    }
}
