//! Pure filtering and paging over record sequences.
//!
//! Nothing here touches a store or the filesystem; these are the functions
//! the list view calls on whatever full record sequence it has.

use crate::models::BookRecord;

/// Category filtering: exact label match, or `"all"` meaning everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Exact(String),
}

impl CategoryFilter {
    /// Parse a user-facing label. The literal `"all"` (case-insensitive)
    /// disables category filtering; anything else is an exact match.
    pub fn parse(label: &str) -> Self {
        if label.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Exact(label.to_string())
        }
    }

    fn matches(&self, record: &BookRecord) -> bool {
        match self {
            Self::All => true,
            Self::Exact(want) => record.category == *want,
        }
    }
}

/// Records matching the category AND containing `search` case-insensitively
/// in title or description. An empty search matches everything.
pub fn filter<'a>(records: &'a [BookRecord], category: &CategoryFilter, search: &str) -> Vec<&'a BookRecord> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| category.matches(record))
        .filter(|record| {
            needle.is_empty()
                || record.title.to_lowercase().contains(&needle)
                || record.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Number of pages `len` records occupy at `page_size` per page; never less
/// than 1, so an empty result set still renders as a single empty page.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a 1-based page number into `[1, page_count]`.
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(len, page_size))
}

/// The records of a clamped, 1-based page.
pub fn page_slice<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let page = clamp_page(page, records.len(), page_size);
    let start = ((page - 1) * page_size).min(records.len());
    let end = (start + page_size).min(records.len());
    &records[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(title: &str, description: &str, category: &str) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            description: description.to_string(),
            price_minor: 499,
            cover: None,
            category: category.to_string(),
            product_id: title.to_string(),
        }
    }

    fn many(count: usize) -> Vec<BookRecord> {
        (0..count).map(|n| record(&format!("Book {n:03}"), "", "General")).collect()
    }

    #[test]
    fn category_and_search_intersect() {
        let records = vec![
            record("Moonlight", "a quiet story", "Fiction"),
            record("Harvest Moon", "farming", "Fiction"),
            record("Moon Atlas", "photography of the moon", "Reference"),
            record("Shadow Run", "a thriller", "Fiction"),
        ];
        let hits = filter(&records, &CategoryFilter::parse("Fiction"), "moon");
        let titles: Vec<_> = hits.iter().map(|r| r.title.as_str()).collect();
        // "Moon Atlas" matches the search but not the category;
        // "Shadow Run" matches the category but not the search.
        assert_eq!(titles, ["Moonlight", "Harvest Moon"]);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let records = vec![
            record("MOONLIGHT", "", "Fiction"),
            record("Shadow Run", "the MOON hangs low", "Fiction"),
            record("Unrelated", "", "Fiction"),
        ];
        assert_eq!(filter(&records, &CategoryFilter::All, "moon").len(), 2);
    }

    #[rstest]
    #[case("all")]
    #[case("All")]
    #[case("ALL")]
    fn all_label_disables_category_filtering(#[case] label: &str) {
        let records = vec![record("A", "", "Fiction"), record("B", "", "Reference")];
        assert_eq!(filter(&records, &CategoryFilter::parse(label), "").len(), 2);
    }

    #[test]
    fn category_match_is_exact() {
        let records = vec![record("A", "", "Fiction")];
        assert!(filter(&records, &CategoryFilter::parse("fiction"), "").is_empty());
        assert_eq!(filter(&records, &CategoryFilter::parse("Fiction"), "").len(), 1);
    }

    #[test]
    fn ninety_seven_records_make_three_pages_of_forty() {
        let records = many(97);
        assert_eq!(page_count(records.len(), 40), 3);
        assert_eq!(page_slice(&records, 1, 40).len(), 40);
        assert_eq!(page_slice(&records, 2, 40).len(), 40);
        let last = page_slice(&records, 3, 40);
        assert_eq!(last.len(), 17);
        assert_eq!(last.first().unwrap().title, "Book 080");
        assert_eq!(last.last().unwrap().title, "Book 096");
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(3, 3)]
    #[case(99, 3)]
    fn page_numbers_clamp_into_range(#[case] requested: usize, #[case] expected: usize) {
        assert_eq!(clamp_page(requested, 97, 40), expected);
    }

    #[test]
    fn empty_sequences_have_one_empty_page() {
        let records: Vec<BookRecord> = Vec::new();
        assert_eq!(page_count(records.len(), 40), 1);
        assert!(page_slice(&records, 1, 40).is_empty());
        assert!(page_slice(&records, 7, 40).is_empty());
    }
}
