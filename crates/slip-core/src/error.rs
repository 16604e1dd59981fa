//! Error types for the slip-core library.

use thiserror::Error;

/// Main error type for the slip library.
#[derive(Error, Debug)]
pub enum SlipError {
    /// Slip field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Product catalog error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// OCR input error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to slip parsing.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The parser was handed input it cannot work with (empty catalog, no text).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors related to the product catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A user-added entry reuses a code that is already in the catalog.
    #[error("duplicate product code: {0}")]
    DuplicateCode(String),

    /// An entry has a blank code or name.
    #[error("invalid catalog entry: {0}")]
    InvalidEntry(String),

    /// Failed to read or decode a catalog file.
    #[error("failed to load catalog: {0}")]
    Load(String),
}

/// Errors related to OCR input conversion.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The vision response does not have the expected shape.
    #[error("malformed OCR response: {0}")]
    MalformedResponse(String),

    /// The vision API reported an error inside its response body.
    #[error("OCR API error {code}: {message}")]
    Api { code: i64, message: String },
}

/// Result type for the slip library.
pub type Result<T> = std::result::Result<T, SlipError>;
