//! Slip parser combining field extractors, product matching and scoring.

use std::time::Instant;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::catalog::Catalog;
use crate::models::config::SlipConfig;
use crate::models::slip::ParsedSlip;
use crate::ocr::OcrResult;

use super::confidence::ConfidenceScorer;
use super::matcher::ProductMatcher;
use super::rules::{extract_customer_name, extract_date, PriceIndex};
use super::{Result, SlipExtractor};

/// Rule-based slip parser.
#[derive(Debug, Clone, Default)]
pub struct SlipParser {
    matcher: ProductMatcher,
    /// Date treated as "today"; the local date when unset.
    reference_date: Option<NaiveDate>,
}

impl SlipParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a parser from the matching section of a config.
    pub fn from_config(config: &SlipConfig) -> Self {
        Self::new()
            .with_min_score(config.matching.min_match_score)
            .with_price_tolerance(config.matching.price_tolerance)
            .with_prefix_chars(config.matching.prefix_chars)
    }

    /// Set the minimum score for accepting a product match.
    pub fn with_min_score(mut self, score: f32) -> Self {
        self.matcher = self.matcher.with_min_score(score);
        self
    }

    /// Set the keyword price confirmation window.
    pub fn with_price_tolerance(mut self, tolerance: u32) -> Self {
        self.matcher = self.matcher.with_price_tolerance(tolerance);
        self
    }

    /// Set the name prefix length used by prefix checks.
    pub fn with_prefix_chars(mut self, chars: usize) -> Self {
        self.matcher = self.matcher.with_prefix_chars(chars);
        self
    }

    /// Fix the date used as "today" for date fallback and scoring.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Replace the price index (built-in flagship products by default).
    pub fn with_price_index(mut self, index: PriceIndex) -> Self {
        self.matcher = self.matcher.with_price_index(index);
        self
    }

    pub fn min_score(&self) -> f32 {
        self.matcher.min_score()
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Parse one OCR result against a catalog.
    ///
    /// Blank OCR text is not an error: it yields an empty parse with
    /// confidence 0.
    pub fn parse(&self, ocr_result: &OcrResult, catalog: &Catalog) -> Result<ParsedSlip> {
        if catalog.is_empty() {
            return Err(ExtractionError::InvalidInput(
                "product catalog is empty".to_string(),
            ));
        }

        let start = Instant::now();
        let today = self.today();
        let lines = ocr_result.effective_lines();

        info!("Parsing slip from {} lines", lines.len());

        let customer_name = extract_customer_name(&lines, &ocr_result.full_text);
        let slip_date = extract_date(&lines, &ocr_result.full_text, today);
        if !slip_date.extracted {
            debug!("No date found, using {}", today);
        }

        let outcome = self.matcher.match_products(&lines, catalog);

        let mut parsed = ParsedSlip {
            customer_name,
            date: slip_date.date,
            date_extracted: slip_date.extracted,
            items: outcome.items,
            confidence: 0.0,
            raw_text: ocr_result.full_text.clone(),
            match_details: outcome.match_details,
        };
        parsed.confidence = ConfidenceScorer::new(today).score(&parsed);

        info!(
            "Parsed slip: {} items, confidence {:.2} in {}ms",
            parsed.items.len(),
            parsed.confidence,
            start.elapsed().as_millis()
        );

        Ok(parsed)
    }
}

impl SlipExtractor for SlipParser {
    fn extract(&self, ocr_result: &OcrResult, catalog: &Catalog) -> Result<ParsedSlip> {
        self.parse(ocr_result, catalog)
    }

    fn extract_from_text(&self, text: &str, catalog: &Catalog) -> Result<ParsedSlip> {
        self.parse(&OcrResult::from_text(text), catalog)
    }
}

/// Parse with default settings.
pub fn parse_slip(ocr_result: &OcrResult, catalog: &Catalog) -> Result<ParsedSlip> {
    SlipParser::new().parse(ocr_result, catalog)
}
