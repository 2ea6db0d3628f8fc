//! Filename normalization for title derivation and cover matching.
//!
//! Normalized names are lossy matching keys, never titles of record: the
//! storefront displays the case-preserved title, and only the matcher sees
//! the normalized form.

use regex::Regex;
use std::sync::LazyLock;

/// Marketing words stripped (repeatedly) from the end of a normalized name.
const MARKETING_SUFFIXES: [&str; 3] = ["ebook", "paper", "new"];

/// Image extensions recognised as cover candidates.
const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_]+").unwrap());

/// Normalized matching key for a filename: lower-cased, `-`/`_` runs
/// collapsed to spaces, whitespace runs collapsed, trailing marketing words
/// stripped.
///
/// Pure and idempotent: normalizing an already-normalized name returns it
/// unchanged.
///
/// # Examples
///
/// ```
/// use bookstall_catalog::normalize;
/// assert_eq!(normalize("My-Book_New"), "my book");
/// assert_eq!(normalize("Great Title Ebook"), "great title");
/// ```
pub fn normalize(name: &str) -> String {
    let lowered = name.to_lowercase();
    let spaced = SEPARATORS.replace_all(&lowered, " ");
    let mut words: Vec<&str> = spaced.split_whitespace().collect();
    while let Some(last) = words.last() {
        if !MARKETING_SUFFIXES.contains(last) {
            break;
        }
        words.pop();
    }
    words.join(" ")
}

/// The title a document file represents: the file name with the trailing
/// marker `suffix` removed. The suffix comparison is case-insensitive, the
/// returned title keeps the original casing. Returns `None` for files that
/// are not book documents.
pub fn document_title<'a>(file_name: &'a str, suffix: &str) -> Option<&'a str> {
    let stem_len = file_name.len().checked_sub(suffix.len())?;
    if !file_name.is_char_boundary(stem_len) {
        return None;
    }
    let (stem, marker) = file_name.split_at(stem_len);
    marker.eq_ignore_ascii_case(suffix).then_some(stem)
}

/// Base name of a cover-candidate image file, or `None` if the file is not
/// a recognised image type.
pub fn image_base(file_name: &str) -> Option<&str> {
    let (base, extension) = file_name.rsplit_once('.')?;
    IMAGE_EXTENSIONS.iter().any(|x| extension.eq_ignore_ascii_case(x)).then_some(base)
}

/// Whether two normalized keys refer to the same book: substring
/// containment in either direction, so `"shadow run"` matches
/// `"shadow run a thriller"` and vice versa.
pub fn keys_match(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
