pub mod error;
mod excerpt;
mod truncate;

use tracing::instrument;

use crate::error::Result;
pub use crate::truncate::safe_truncate;

/// Default excerpt length used for storefront descriptions.
pub const DEFAULT_EXCERPT_CHARS: usize = 280;

/// Easy, top-level entrypoint: extract a short plain-text excerpt from raw
/// document bytes.
///
/// - HTML documents are reduced to their visible text (large documents are
///   truncated at a safe boundary first).
/// - Plain-text documents are whitespace-collapsed directly.
/// - Binary documents (ZIP containers such as `.docx`, embedded nulls) are
///   rejected with [`ErrorKind::Binary`](crate::error::ErrorKind::Binary).
///
/// Accepts raw bytes instead of requiring valid UTF-8; invalid byte
/// sequences are replaced with U+FFFD during decoding. The result is never
/// longer than `max_chars` characters (plus a trailing ellipsis when
/// clipped).
///
/// Failures here are recoverable by design: the caller decides what
/// fallback text, if any, stands in for the excerpt.
#[instrument(skip(bytes), fields(size = bytes.as_ref().len()))]
pub fn excerpt(bytes: impl AsRef<[u8]>, max_chars: usize) -> Result<String> {
    crate::excerpt::extract_excerpt(bytes.as_ref(), max_chars)
}
