//! Customer name extraction.
//!
//! Names are read from the raw OCR text: whitespace between surname and
//! given name is kept as written.

use regex::Regex;

use super::patterns::{HONORIFIC_SUFFIX, NAME_LABELED, NAME_SINGLE_TOKEN, NAME_TWO_TOKEN};
use super::{ExtractionMatch, FieldExtractor};

const MIN_NAME_CHARS: usize = 2;
const MAX_NAME_CHARS: usize = 12;

/// Metadata fields that sometimes precede an honorific in OCR noise.
const METADATA_TOKENS: [&str; 2] = ["住所", "電話"];

/// Generic addressees that are not a customer.
const GENERIC_ADDRESSEES: [&str; 3] = ["お客", "皆", "各位"];

/// Customer name extractor.
///
/// `extract_all` walks the text line by line (two-token then single-token
/// honorific pattern per line), then tries labeled names.
pub struct CustomerNameExtractor;

impl CustomerNameExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CustomerNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CustomerNameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = text.lines().flat_map(honorific_candidates).collect();
        results.extend(text.lines().flat_map(labeled_candidates));
        results
    }
}

/// Extract the customer name from the slip, or an empty string.
///
/// Order: honorific patterns per line, honorific patterns on the full text,
/// then labeled names (`お名前: ...`) per line.
pub fn extract_customer_name(lines: &[String], full_text: &str) -> String {
    lines
        .iter()
        .flat_map(|line| honorific_candidates(line))
        .chain(honorific_candidates(full_text))
        .chain(lines.iter().flat_map(|line| labeled_candidates(line)))
        .map(|m| m.value)
        .next()
        .unwrap_or_default()
}

/// Two-token candidates first, then single-token ones.
fn honorific_candidates(text: &str) -> Vec<ExtractionMatch<String>> {
    let mut results = capture_names(&NAME_TWO_TOKEN, text, 0.9);
    results.extend(capture_names(&NAME_SINGLE_TOKEN, text, 0.8));
    results
}

fn labeled_candidates(text: &str) -> Vec<ExtractionMatch<String>> {
    let mut results = Vec::new();

    for caps in NAME_LABELED.captures_iter(text) {
        let Some(group) = caps.get(1) else {
            continue;
        };
        let stripped = HONORIFIC_SUFFIX.replace(group.as_str().trim(), "");
        if let Some(name) = validate_name(&stripped) {
            results.push(
                ExtractionMatch::new(name, 0.85, &caps[0]).with_position(group.start(), group.end()),
            );
        }
    }

    results
}

fn capture_names(pattern: &Regex, text: &str, confidence: f32) -> Vec<ExtractionMatch<String>> {
    let mut results = Vec::new();

    for caps in pattern.captures_iter(text) {
        let Some(group) = caps.get(1) else {
            continue;
        };
        if let Some(name) = validate_name(group.as_str()) {
            results.push(
                ExtractionMatch::new(name, confidence, &caps[0])
                    .with_position(group.start(), group.end()),
            );
        }
    }

    results
}

fn validate_name(candidate: &str) -> Option<String> {
    let name = candidate.trim();
    let length = name.chars().count();

    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&length) {
        return None;
    }
    if METADATA_TOKENS.iter().any(|token| name.contains(token)) {
        return None;
    }
    if GENERIC_ADDRESSEES.contains(&name) {
        return None;
    }

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_two_token_name_keeps_spacing() {
        let text = "山田 花子　様";
        assert_eq!(extract_customer_name(&lines(text), text), "山田 花子");
    }

    #[test]
    fn test_single_token_name() {
        let text = "納品書\n佐藤様\nR7年7月31日";
        assert_eq!(extract_customer_name(&lines(text), text), "佐藤");
    }

    #[test]
    fn test_alternate_honorifics() {
        let text = "鈴木 一郎 さま";
        assert_eq!(extract_customer_name(&lines(text), text), "鈴木 一郎");

        let text = "高橋商店 殿";
        assert_eq!(extract_customer_name(&lines(text), text), "高橋商店");
    }

    #[test]
    fn test_generic_addressee_is_skipped() {
        let text = "お客様各位\n田中 真理 様";
        assert_eq!(extract_customer_name(&lines(text), text), "田中 真理");
    }

    #[test]
    fn test_metadata_is_rejected() {
        let text = "電話番号様";
        assert_eq!(extract_customer_name(&lines(text), text), "");
    }

    #[test]
    fn test_name_length_bounds() {
        // 6 + space + 5 = 12 characters
        let text = "長谷川左衛門 佐藤太郎兵 様";
        assert_eq!(extract_customer_name(&lines(text), text), "長谷川左衛門 佐藤太郎兵");

        // 6 + space + 6 = 13 characters
        let text = "長谷川左衛門 佐藤太郎兵衛 様";
        assert_eq!(extract_customer_name(&lines(text), text), "");
        assert_eq!(validate_name("長谷川左衛門 佐藤太郎兵衛"), None);

        assert_eq!(validate_name("様"), None);
        assert_eq!(validate_name("林"), None);
    }

    #[test]
    fn test_labeled_name() {
        let text = "お名前：伊藤 美咲 様";
        // The honorific pattern already finds the name on this line
        assert_eq!(extract_customer_name(&lines(text), text), "伊藤 美咲");

        let text = "氏名: ito misaki";
        assert_eq!(extract_customer_name(&lines(text), text), "ito misaki");
    }

    #[test]
    fn test_full_text_fallback() {
        assert_eq!(extract_customer_name(&[], "山本 恵 様\n"), "山本 恵");
    }

    #[test]
    fn test_no_name() {
        let text = "クイーン シルバー 4,000\nローションII ×2";
        assert_eq!(extract_customer_name(&lines(text), text), "");
    }

    #[test]
    fn test_extractor_trait() {
        let extractor = CustomerNameExtractor::new();
        let found = extractor.extract("山田 花子 様").unwrap();
        assert_eq!(found.value, "山田 花子");
        assert_eq!(found.position, Some((0, "山田 花子".len())));
    }
}
