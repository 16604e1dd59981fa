//! Text normalization and fuzzy similarity for product names.

use std::collections::HashSet;

use super::patterns::{BRAND_TOKENS, PARENTHESIZED};

/// Fold full-width ASCII (digits, letters, punctuation), the full-width yen
/// sign and Roman numeral characters to their plain forms.
///
/// The ideographic space is left alone so names keep their spacing.
pub fn fold_width(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\u{FF01}'..='\u{FF5E}' => {
                folded.push(char::from_u32(c as u32 - 0xFEE0).unwrap_or(c));
            }
            '\u{FFE5}' => folded.push('¥'),
            'Ⅰ' => folded.push('I'),
            'Ⅱ' => folded.push_str("II"),
            'Ⅲ' => folded.push_str("III"),
            'ⅰ' => folded.push('i'),
            'ⅱ' => folded.push_str("ii"),
            'ⅲ' => folded.push_str("iii"),
            _ => folded.push(c),
        }
    }

    folded
}

/// Width-folded, whitespace-free, lowercase form used for keyword lookup.
pub fn compact(text: &str) -> String {
    fold_width(text)
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalize a product name (or slip line) for matching: drop parenthesized
/// segments, whitespace and brand tokens, then lowercase.
pub fn normalize_product_name(name: &str) -> String {
    let folded = fold_width(name);
    let without_parens = PARENTHESIZED.replace_all(&folded, "");
    let without_spaces: String = without_parens.chars().filter(|c| !c.is_whitespace()).collect();
    BRAND_TOKENS.replace_all(&without_spaces, "").to_lowercase()
}

/// First `n` characters of `text`, or `None` if it is shorter.
pub fn prefix(text: &str, n: usize) -> Option<String> {
    if n == 0 || text.chars().count() < n {
        return None;
    }
    Some(text.chars().take(n).collect())
}

/// Blended similarity: 0.7 x Jaccard over character sets plus
/// 0.3 x (shorter length / longer length). Zero when either side is empty.
pub fn string_similarity(a: &str, b: &str) -> f32 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let set_a: HashSet<char> = a.chars().collect();
    let set_b: HashSet<char> = b.chars().collect();
    let common = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    let jaccard = common as f32 / union as f32;

    let length_similarity = len_a.min(len_b) as f32 / len_a.max(len_b) as f32;

    (jaccard * 0.7 + length_similarity * 0.3).clamp(0.0, 1.0)
}

/// How much of a product name shows up in a normalized line: the summed
/// length of the name's whitespace-separated tokens found in the line.
pub fn name_overlap(product_name: &str, normalized_line: &str) -> usize {
    product_name
        .split_whitespace()
        .map(normalize_product_name)
        .filter(|token| !token.is_empty() && normalized_line.contains(token.as_str()))
        .map(|token| token.chars().count())
        .sum()
}
