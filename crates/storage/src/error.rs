//! Storage Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use crate::models::EntryId;
use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Entry does not exist in the store
    #[display("entry not found: {_0}")]
    NotFound(#[error(not(source))] EntryId),
    /// Access denied (permissions or credentials)
    #[display("permission denied: {_0}")]
    PermissionDenied(#[error(not(source))] EntryId),
    /// A listing was requested for an entry that is not a folder
    #[display("not a folder: {_0}")]
    NotAFolder(#[error(not(source))] EntryId),
    /// Entry id contains invalid characters or escapes the store root
    #[display("invalid entry id: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// A continuation token the backend does not recognise
    #[display("invalid continuation token: {_0}")]
    InvalidToken(#[error(not(source))] String),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Network-related error (S3 connections, etc.)
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// Backend-specific error
    #[display("backend error: {_0}")]
    Backend(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Network(_) | Self::Backend(_))
    }
}
