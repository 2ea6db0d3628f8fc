//! Checkout Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use crate::models::SessionId;
use derive_more::{Display, Error};

/// A checkout error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for checkout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Checkout failures are surfaced at the UI boundary as a user-visible
/// message; there is no automatic retry.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The provider rejected or could not complete the request.
    #[display("checkout provider error: {_0}")]
    Provider(#[error(not(source))] String),
    /// No session with this id is known to the provider.
    #[display("checkout session not found: {_0}")]
    SessionNotFound(#[error(not(source))] SessionId),
    /// The request itself is unusable (empty title, zero price, ...).
    #[display("invalid checkout request: {_0}")]
    InvalidRequest(#[error(not(source))] String),
    /// The provider could not be reached.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
