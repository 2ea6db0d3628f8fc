//! Entry-id validation for filesystem-backed stores.
//!
//! The local backend's entry ids are relative paths. Before one touches the
//! filesystem it is normalized and checked so that a hostile id can never
//! address anything outside the store root.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a path-shaped entry id for security and correctness.
/// Ensures that ids don't escape the store root (no `..` traversal).
///
/// > **Note:** Null bytes are explicitly rejected; they survive
/// >           `Path::components()` on Unix but truncate in C-based syscalls.
///
/// # Returns
/// Returns the normalized relative path if valid, or
/// [`InvalidPath`](crate::error::ErrorKind::InvalidPath) if invalid.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use bookstall_storage::validate_entry_path;
/// // Valid ids
/// assert!(validate_entry_path("Shadow Run/Shadow Run Ebook.docx").is_ok());
/// assert!(validate_entry_path("a/b/../c.jpg").is_ok()); // (never leaves the root)
/// // Invalid ids
/// assert!(validate_entry_path("../etc/passwd").is_err());
/// assert!(validate_entry_path("a/../../b").is_err()); // (leaves the root)
/// assert!(validate_entry_path("a\0b").is_err());
/// // Ids get resolved
/// assert_eq!(
///     validate_entry_path("wrong/../right/.//cover.png/").unwrap(),
///     Path::new("right/cover.png")
/// );
/// ```
pub fn validate(id: impl AsRef<Path>) -> Result<PathBuf> {
    let path = id.as_ref();
    let invalid = || ErrorKind::InvalidPath(path.to_path_buf());
    // Lean on the standard component parser rather than splitting on
    // separators by hand; it already copes with repeated slashes and
    // platform weirdness.
    let mut kept: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                if part.as_encoded_bytes().contains(&0) {
                    exn::bail!(invalid());
                }
                kept.push(part);
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(invalid()),
            Component::ParentDir => {
                if kept.pop().is_none() {
                    exn::bail!(invalid());
                }
            },
        }
    }
    if kept.is_empty() {
        exn::bail!(invalid());
    }
    Ok(kept.into_iter().collect())
}
