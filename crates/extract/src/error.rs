//! Extraction Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Extraction failures are recoverable by design: the caller picks the
/// fallback text, this crate only says why it couldn't produce one.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document is a binary format (ZIP container, embedded nulls)
    /// that plain-text excerpting cannot process.
    #[display("binary document, no extractable text")]
    Binary,
    /// The document parsed but contained no visible text.
    #[display("document has no visible text")]
    Empty,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The document either has extractable text or it doesn't.
        false
    }
}
