//! Core library for sales slip OCR parsing.
//!
//! This crate provides:
//! - Product catalog (built-in product master plus user-added entries)
//! - OCR input types and Google Vision response conversion
//! - Slip field extraction (customer name, date, line items, quantities)
//! - Keyword, price and similarity based product matching
//! - Confidence scoring of the parsed result

pub mod error;
pub mod models;
pub mod ocr;
pub mod slip;

pub use error::{SlipError, Result};
pub use models::catalog::{Catalog, CatalogSection, ProductCatalogEntry};
pub use models::config::SlipConfig;
pub use models::slip::{MatchDetail, MatchMethod, MatchedItem, ParsedSlip};
pub use ocr::{OcrResult, TextBlock, Vertex};
pub use slip::{parse_slip, ConfidenceScorer, ProductMatcher, SlipExtractor, SlipParser};
