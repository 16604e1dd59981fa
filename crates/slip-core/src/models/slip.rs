//! Parsed sales slip models.
//!
//! Field names serialize in camelCase because the result is consumed by the
//! browser form-prefill step of the sales ledger.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structured record recovered from one photographed sales slip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSlip {
    /// Customer name without honorific (empty if unresolved).
    pub customer_name: String,

    /// Transaction date. Falls back to the parse date when nothing was found.
    pub date: NaiveDate,

    /// Whether a date pattern actually matched on the slip.
    pub date_extracted: bool,

    /// Matched line items, unique by product code, in slip order.
    pub items: Vec<MatchedItem>,

    /// Overall confidence (0.0 - 1.0).
    pub confidence: f32,

    /// Echo of the OCR full text.
    pub raw_text: String,

    /// One diagnostic record per line that produced an accepted match.
    #[serde(default)]
    pub match_details: Vec<MatchDetail>,
}

/// A catalog product recognized on the slip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedItem {
    /// Product code.
    pub code: String,

    /// Catalog product name.
    pub name: String,

    /// Tax-exclusive unit price (JPY).
    pub price: u32,

    /// Category tag.
    pub category: String,

    /// Unit count (1 - 99).
    pub quantity: u32,

    /// Match score (0.0 - 1.0).
    pub match_score: f32,
}

impl MatchedItem {
    /// Line amount (price x quantity).
    pub fn amount(&self) -> u64 {
        u64::from(self.price) * u64::from(self.quantity)
    }
}

/// Diagnostic record describing how a slip line was matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetail {
    /// Original OCR line.
    pub original_text: String,

    /// Name of the matched catalog product.
    pub matched_product: String,

    /// Code of the matched catalog product.
    pub code: String,

    /// Match score.
    pub score: f32,

    /// Extracted quantity.
    pub quantity: u32,

    /// Strategy that produced the match.
    pub method: MatchMethod,
}

/// Strategy that produced a product match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMethod {
    /// Keyword rule fired and the slip price confirmed it.
    #[serde(rename = "price+keyword")]
    PriceKeyword,
    /// Keyword rule fired without price confirmation.
    #[serde(rename = "keyword")]
    Keyword,
    /// Price index lookup only.
    #[serde(rename = "price")]
    Price,
    /// Code literal or fuzzy name similarity against the whole catalog.
    #[serde(rename = "similarity")]
    Similarity,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::PriceKeyword => "price+keyword",
            MatchMethod::Keyword => "keyword",
            MatchMethod::Price => "price",
            MatchMethod::Similarity => "similarity",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ParsedSlip {
    /// Create an empty parse result dated `date`.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            customer_name: String::new(),
            date,
            date_extracted: false,
            items: Vec::new(),
            confidence: 0.0,
            raw_text: String::new(),
            match_details: Vec::new(),
        }
    }

    /// Total tax-exclusive amount of all matched items.
    pub fn total_amount(&self) -> u64 {
        self.items.iter().map(MatchedItem::amount).sum()
    }

    /// Total number of units across all matched items.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Whether the caller should ask for manual correction.
    pub fn needs_review(&self, threshold: f32) -> bool {
        self.confidence < threshold
    }

    /// List the parts of the slip that could not be recovered.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.customer_name.is_empty() {
            issues.push("Missing customer name".to_string());
        }

        if !self.date_extracted {
            issues.push(format!("No date found on slip, defaulted to {}", self.date));
        }

        if self.items.is_empty() {
            issues.push("No products matched".to_string());
        }

        let weak = self.items.iter().filter(|i| i.match_score < 0.7).count();
        if weak > 0 {
            issues.push(format!("{} item(s) matched with a low score", weak));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(code: &str, price: u32, quantity: u32, score: f32) -> MatchedItem {
        MatchedItem {
            code: code.to_string(),
            name: format!("product {}", code),
            price,
            category: "other".to_string(),
            quantity,
            match_score: score,
        }
    }

    #[test]
    fn test_totals() {
        let mut slip = ParsedSlip::empty(NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
        slip.items.push(item("421628", 4000, 2, 0.95));
        slip.items.push(item("421652", 3500, 1, 0.95));

        assert_eq!(slip.total_amount(), 11500);
        assert_eq!(slip.total_quantity(), 3);
    }

    #[test]
    fn test_issues_for_empty_slip() {
        let slip = ParsedSlip::empty(NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
        let issues = slip.issues();

        assert_eq!(issues.len(), 3);
        assert!(issues[1].contains("2025-07-31"));
    }

    #[test]
    fn test_serialized_field_names() {
        let mut slip = ParsedSlip::empty(NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
        slip.customer_name = "山田 花子".to_string();
        slip.match_details.push(MatchDetail {
            original_text: "クイーン シルバー 4,000".to_string(),
            matched_product: "アルソアクイーンシルバー(135g)".to_string(),
            code: "421628".to_string(),
            score: 0.95,
            quantity: 1,
            method: MatchMethod::PriceKeyword,
        });

        let json = serde_json::to_value(&slip).unwrap();
        assert_eq!(json["customerName"], "山田 花子");
        assert_eq!(json["date"], "2025-07-31");
        assert_eq!(json["matchDetails"][0]["method"], "price+keyword");
    }

    #[test]
    fn test_needs_review() {
        let mut slip = ParsedSlip::empty(NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
        slip.confidence = 0.65;
        assert!(slip.needs_review(0.7));
        assert!(!slip.needs_review(0.6));
    }
}
