//! Confidence scoring of a parsed slip.

use chrono::NaiveDate;

use crate::models::slip::ParsedSlip;

const NAME_WEIGHT: f32 = 0.3;
const DATE_WEIGHT: f32 = 0.2;
const ITEMS_WEIGHT: f32 = 0.5;

/// Weighted average of name presence, date extraction and item match quality.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceScorer {
    today: NaiveDate,
}

impl ConfidenceScorer {
    /// `today` is the date a failed date extraction falls back to.
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Score in `[0, 1]`.
    ///
    /// A date equal to `today` is treated as not extracted, even when the
    /// slip really is dated today.
    pub fn score(&self, parsed: &ParsedSlip) -> f32 {
        let mut earned = 0.0;
        let mut total = 0.0;

        total += NAME_WEIGHT;
        if parsed.customer_name.chars().count() >= 2 {
            earned += NAME_WEIGHT;
        }

        total += DATE_WEIGHT;
        if parsed.date != self.today {
            earned += DATE_WEIGHT;
        }

        total += ITEMS_WEIGHT;
        if !parsed.items.is_empty() {
            let average = parsed.items.iter().map(|i| i.match_score).sum::<f32>()
                / parsed.items.len() as f32;
            earned += ITEMS_WEIGHT * average;
        }

        (earned / total).clamp(0.0, 1.0)
    }
}

/// Score a parse against `today`.
pub fn score(parsed: &ParsedSlip, today: NaiveDate) -> f32 {
    ConfidenceScorer::new(today).score(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::slip::MatchedItem;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn item(score: f32) -> MatchedItem {
        MatchedItem {
            code: "421628".to_string(),
            name: "アルソアクイーンシルバー(135g)".to_string(),
            price: 4000,
            category: "QS".to_string(),
            quantity: 1,
            match_score: score,
        }
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-6, "{} != {}", actual, expected);
    }

    #[test]
    fn test_items_only() {
        let mut parsed = ParsedSlip::empty(today());
        parsed.items.push(item(0.8));
        assert_close(score(&parsed, today()), 0.4);
    }

    #[test]
    fn test_empty_parse_scores_zero() {
        assert_close(score(&ParsedSlip::empty(today()), today()), 0.0);
    }

    #[test]
    fn test_full_credit() {
        let mut parsed = ParsedSlip::empty(NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
        parsed.customer_name = "山田 花子".to_string();
        parsed.items.push(item(1.0));
        assert_close(score(&parsed, today()), 1.0);
    }

    #[test]
    fn test_average_of_item_scores() {
        let mut parsed = ParsedSlip::empty(NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
        parsed.customer_name = "佐藤".to_string();
        parsed.items.push(item(0.95));
        parsed.items.push(item(0.65));
        // 0.3 + 0.2 + 0.5 * 0.8
        assert_close(score(&parsed, today()), 0.9);
    }

    #[test]
    fn test_single_char_name_earns_nothing() {
        let mut parsed = ParsedSlip::empty(today());
        parsed.customer_name = "山".to_string();
        assert_close(score(&parsed, today()), 0.0);
    }
}
