//! Plain-text excerpt extraction.

use crate::error::{ErrorKind, Result};
use crate::truncate::safe_truncate;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// How much of a document is scanned for an excerpt. Descriptions come from
/// the opening of a book, never its tail.
const SCAN_LIMIT_BYTES: usize = 32 * 1024;

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

/// Magic bytes of ZIP containers (`.docx`, `.epub` and friends).
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

pub(crate) fn looks_binary(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC) || bytes.iter().take(512).any(|&b| b == 0)
}

fn looks_like_html(text: &str) -> bool {
    text.trim_start().starts_with('<') || text.contains("<html") || text.contains("<body") || text.contains("<p")
}

/// Visible text of an HTML fragment, whitespace-collapsed. Prefers the
/// `<body>` subtree so `<head>` noise never leaks into a description.
fn html_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let text: String = match document.select(&BODY_SELECTOR).next() {
        Some(body) => body.text().collect::<Vec<_>>().join(" "),
        None => document.root_element().text().collect::<Vec<_>>().join(" "),
    };
    collapse(&text)
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clip to at most `max_chars` characters, appending an ellipsis when
/// anything was dropped.
fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{}…", kept.trim_end())
}

pub(crate) fn extract_excerpt(bytes: &[u8], max_chars: usize) -> Result<String> {
    if looks_binary(bytes) {
        exn::bail!(ErrorKind::Binary);
    }
    let window = safe_truncate(bytes, SCAN_LIMIT_BYTES);
    let text = String::from_utf8_lossy(window);
    let visible = if looks_like_html(&text) { html_text(&text) } else { collapse(&text) };
    if visible.is_empty() {
        exn::bail!(ErrorKind::Empty);
    }
    Ok(clip(&visible, max_chars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn html_reduces_to_visible_text() {
        let html = b"<html><head><title>ignored</title></head>\
                     <body><h1>Shadow Run</h1><p>A thriller in two parts.</p></body></html>";
        let text = extract_excerpt(html, 200).unwrap();
        assert_eq!(text, "Shadow Run A thriller in two parts.");
        assert!(!text.contains("ignored"));
    }

    #[test]
    fn plain_text_is_collapsed() {
        let text = extract_excerpt(b"First  line.\n\nSecond   line.", 200).unwrap();
        assert_eq!(text, "First line. Second line.");
    }

    #[test]
    fn long_text_is_clipped_with_ellipsis() {
        let text = extract_excerpt(b"one two three four five", 7).unwrap();
        assert_eq!(text, "one two…");
    }

    #[test]
    fn clip_is_a_character_count_not_bytes() {
        let text = extract_excerpt("ééééé".as_bytes(), 3).unwrap();
        assert_eq!(text, "ééé…");
    }

    #[rstest]
    #[case(&b"PK\x03\x04rest-of-a-docx"[..])]
    #[case(&b"plain\x00with nulls"[..])]
    fn binary_documents_are_rejected(#[case] bytes: &[u8]) {
        let err = extract_excerpt(bytes, 200).unwrap_err();
        assert_eq!(*err, ErrorKind::Binary);
    }

    #[rstest]
    #[case(&b""[..])]
    #[case(&b"   \n\t  "[..])]
    #[case(&b"<html><body></body></html>"[..])]
    fn textless_documents_are_rejected(#[case] bytes: &[u8]) {
        let err = extract_excerpt(bytes, 200).unwrap_err();
        assert_eq!(*err, ErrorKind::Empty);
    }
}
