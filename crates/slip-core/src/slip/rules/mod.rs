//! Rule-based extractors for sales slips.

pub mod dates;
pub mod exclusion;
pub mod keywords;
pub mod names;
pub mod patterns;
pub mod prices;
pub mod quantity;
pub mod similarity;

pub use dates::{extract_date, DateExtractor, SlipDate};
pub use exclusion::should_exclude;
pub use keywords::{KeywordRule, PriceCandidate, PriceIndex, KEYWORD_RULES};
pub use names::{extract_customer_name, CustomerNameExtractor};
pub use prices::{extract_price, PriceExtractor};
pub use quantity::{extract_quantity, QuantityExtractor, DEFAULT_QUANTITY};
pub use similarity::{compact, fold_width, normalize_product_name, string_similarity};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
