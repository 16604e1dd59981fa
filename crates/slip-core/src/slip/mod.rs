//! Sales slip field extraction module.

pub mod confidence;
pub mod matcher;
mod parser;
pub mod rules;

pub use confidence::ConfidenceScorer;
pub use matcher::{LineMatch, MatchOutcome, ProductMatcher};
pub use parser::{parse_slip, SlipParser};

use crate::error::ExtractionError;
use crate::models::catalog::Catalog;
use crate::models::slip::ParsedSlip;
use crate::ocr::OcrResult;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for slip extractors.
pub trait SlipExtractor {
    /// Extract slip data from an OCR result.
    fn extract(&self, ocr_result: &OcrResult, catalog: &Catalog) -> Result<ParsedSlip>;

    /// Extract slip data from plain text.
    fn extract_from_text(&self, text: &str, catalog: &Catalog) -> Result<ParsedSlip>;
}
