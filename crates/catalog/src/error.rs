//! Catalog Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The store could not be listed; the indexing pass is aborted rather
    /// than producing a partial or empty catalog.
    #[display("store listing failed")]
    Store,
    /// The catalog directory has no readable manifest.
    #[display("catalog manifest missing: {}", _0.display())]
    ManifestMissing(#[error(not(source))] PathBuf),
    /// The manifest exists but does not parse or violates its invariants.
    #[display("catalog manifest malformed: {}", _0.display())]
    ManifestInvalid(#[error(not(source))] PathBuf),
    /// A page file the manifest promises is not readable.
    #[display("catalog page {_0} missing")]
    PageMissing(#[error(not(source))] u32),
    /// A page file exists but does not parse.
    #[display("catalog page {_0} malformed")]
    PageInvalid(#[error(not(source))] u32),
    /// A page number outside `1..=total_pages` was requested.
    #[display("page {_0} out of range 1..={_1}")]
    PageOutOfRange(#[error(not(source))] u32, u32),
    /// Catalog files could not be written.
    #[display("failed to write catalog files")]
    Write,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A store listing can fail transiently; broken catalog files on
        // disk stay broken until someone regenerates them.
        matches!(self, Self::Store)
    }
}
