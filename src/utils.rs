//! Small text helpers shared by the search modules

use unicode_normalization::UnicodeNormalization;

/// Largest char boundary at or below `index`, clamped to the text length
pub fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary at or above `index`, clamped to the text length
pub fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Canonical form for comparing whole queries: NFC, trimmed, lowercased
pub fn normalize_query(query: &str) -> String {
    query.nfc().collect::<String>().trim().to_lowercase()
}
