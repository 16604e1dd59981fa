//! Line classification: drop lines that never carry a product.

use super::patterns::{
    BARE_NUMBER, EXCLUDE_BANK_INFO, EXCLUDE_DOCUMENT, EXCLUDE_GREETING, EXCLUDE_TABLE_HEADER,
    EXCLUDE_TAX_SUMMARY,
};

/// Returns true if the line should be skipped by the product matcher.
///
/// This is a lossy filter: an item line that happens to contain one of the
/// excluded keywords is dropped as well.
pub fn should_exclude(line: &str) -> bool {
    let trimmed = line.trim();

    if trimmed.chars().count() < 2 {
        return true;
    }

    let excluded = [
        &*EXCLUDE_TAX_SUMMARY,
        &*EXCLUDE_BANK_INFO,
        &*EXCLUDE_GREETING,
        &*EXCLUDE_DOCUMENT,
        &*EXCLUDE_TABLE_HEADER,
    ]
    .iter()
    .any(|pattern| pattern.is_match(trimmed));

    excluded || BARE_NUMBER.is_match(trimmed)
}
