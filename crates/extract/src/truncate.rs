//! Byte-level truncation that never cuts mid-tag or mid-entity.

use memchr::memrchr;

/// Truncates raw document bytes to at most `max_bytes`, backing the cut up
/// to a safe boundary when it would land inside an HTML tag or entity.
/// Excerpts only ever need the head of a document, so large files are
/// clipped before parsing rather than parsed whole.
///
/// The boundary markers (`<`, `>`, `&`, `;`) are all ASCII-range bytes, so
/// scanning raw bytes is safe even for non-UTF8 input.
///
/// # Examples
///
/// ```rust
/// use bookstall_extract::safe_truncate;
/// let html = b"<div>Hello World</div>";
/// // Cuts in text, fine as-is
/// assert_eq!(safe_truncate(html, 10).len(), 10);
/// // Would cut inside `</div>`, backs up to before the `<`
/// assert_eq!(safe_truncate(html, 18).len(), 16);
/// ```
pub fn safe_truncate(bytes: &[u8], max_bytes: usize) -> &[u8] {
    if bytes.len() <= max_bytes {
        return bytes;
    }
    let candidate = &bytes[..max_bytes];
    if let Some(cut) = unclosed_marker(candidate, b'<', b'>') {
        // Inside a tag, cut before the '<'
        return &candidate[..cut];
    }
    if let Some(cut) = unclosed_marker(candidate, b'&', b';') {
        // Inside an entity, cut before the '&'
        return &candidate[..cut];
    }
    // Plain text; anywhere is fine.
    candidate
}

/// Position of the last `open` byte that has no matching `close` after it.
fn unclosed_marker(candidate: &[u8], open: u8, close: u8) -> Option<usize> {
    let open_at = memrchr(open, candidate)?;
    match memrchr(close, candidate) {
        Some(close_at) if close_at > open_at => None,
        _ => Some(open_at),
    }
}
