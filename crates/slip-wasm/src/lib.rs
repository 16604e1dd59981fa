//! WASM bindings for sales slip OCR parsing.
//!
//! The browser side runs text detection, then hands the OCR result to these
//! bindings and uses the returned record to prefill the sales ledger form.

use chrono::NaiveDate;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use slip_core::ocr::from_vision_response;
use slip_core::slip::rules;
use slip_core::{Catalog, OcrResult, ParsedSlip, ProductCatalogEntry, SlipParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_today(today: Option<String>) -> Result<Option<NaiveDate>, JsValue> {
    today
        .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(to_js_error))
        .transpose()
}

/// Custom products from JS: `undefined`/`null`, a flat array, or an object keyed by section.
fn custom_products(value: JsValue) -> Result<Vec<ProductCatalogEntry>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(Vec::new());
    }

    let json: Value = serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
    Catalog::custom_from_json(&json.to_string()).map_err(to_js_error)
}

fn build_parser(today: Option<NaiveDate>) -> SlipParser {
    match today {
        Some(date) => SlipParser::new().with_reference_date(date),
        None => SlipParser::new(),
    }
}

fn to_js(parsed: &ParsedSlip) -> Result<JsValue, JsValue> {
    if parsed.items.is_empty() && !parsed.raw_text.trim().is_empty() {
        web_sys::console::warn_1(&JsValue::from_str("slip: no products matched"));
    }
    serde_wasm_bindgen::to_value(parsed).map_err(to_js_error)
}

/// Parse an OCR result (`{ fullText, lines, blocks? }`) against the built-in
/// catalog plus optional custom products.
///
/// `today` (`YYYY-MM-DD`) overrides the browser's local date.
#[wasm_bindgen]
pub fn parse_slip(
    ocr_result: JsValue,
    custom: JsValue,
    today: Option<String>,
) -> Result<JsValue, JsValue> {
    let ocr: OcrResult = serde_wasm_bindgen::from_value(ocr_result)
        .map_err(|e| to_js_error(format!("invalid OCR result: {}", e)))?;
    let catalog = Catalog::merged(custom_products(custom)?).map_err(to_js_error)?;

    let parsed = build_parser(parse_today(today)?)
        .parse(&ocr, &catalog)
        .map_err(to_js_error)?;

    to_js(&parsed)
}

/// Parse a raw Google Vision `images:annotate` response.
#[wasm_bindgen]
pub fn parse_vision_response(
    response: JsValue,
    custom: JsValue,
    today: Option<String>,
) -> Result<JsValue, JsValue> {
    let response: Value = serde_wasm_bindgen::from_value(response).map_err(to_js_error)?;
    let ocr = from_vision_response(&response).map_err(to_js_error)?;
    let catalog = Catalog::merged(custom_products(custom)?).map_err(to_js_error)?;

    let parsed = build_parser(parse_today(today)?)
        .parse(&ocr, &catalog)
        .map_err(to_js_error)?;

    to_js(&parsed)
}

/// Extract the transaction date from slip text as `YYYY-MM-DD`.
///
/// Returns `undefined` when no date pattern matched.
#[wasm_bindgen]
pub fn extract_date(text: &str, today: Option<String>) -> Result<Option<String>, JsValue> {
    let reference = parse_today(today)?.unwrap_or_else(|| chrono::Local::now().date_naive());
    let lines: Vec<String> = text.lines().map(str::to_string).collect();

    let slip_date = rules::extract_date(&lines, text, reference);
    Ok(slip_date.extracted.then(|| slip_date.date.to_string()))
}

/// Quantity written on one slip line (1 when none is given).
#[wasm_bindgen]
pub fn extract_quantity(line: &str) -> u32 {
    rules::extract_quantity(line)
}

/// Whether a slip line is boilerplate that never names a product.
#[wasm_bindgen]
pub fn should_exclude(line: &str) -> bool {
    rules::should_exclude(line)
}

/// Reusable parser holding a catalog, for pages that parse many slips.
#[wasm_bindgen]
pub struct SlipParserJs {
    parser: SlipParser,
    catalog: Catalog,
}

#[wasm_bindgen]
impl SlipParserJs {
    /// Create a parser over the built-in catalog.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: SlipParser::new(),
            catalog: Catalog::builtin(),
        }
    }

    #[wasm_bindgen]
    pub fn set_min_score(&mut self, score: f32) {
        self.parser = self.parser.clone().with_min_score(score);
    }

    #[wasm_bindgen]
    pub fn set_today(&mut self, today: &str) -> Result<(), JsValue> {
        let date = NaiveDate::parse_from_str(today, "%Y-%m-%d").map_err(to_js_error)?;
        self.parser = self.parser.clone().with_reference_date(date);
        Ok(())
    }

    /// Add user-registered products to the catalog.
    #[wasm_bindgen]
    pub fn add_products(&mut self, custom: JsValue) -> Result<(), JsValue> {
        let entries = custom_products(custom)?;
        self.catalog.extend(entries).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn product_count(&self) -> usize {
        self.catalog.len()
    }

    /// Parse an OCR result object.
    #[wasm_bindgen]
    pub fn parse(&self, ocr_result: JsValue) -> Result<JsValue, JsValue> {
        let ocr: OcrResult = serde_wasm_bindgen::from_value(ocr_result)
            .map_err(|e| to_js_error(format!("invalid OCR result: {}", e)))?;
        let parsed = self.parser.parse(&ocr, &self.catalog).map_err(to_js_error)?;
        to_js(&parsed)
    }

    /// Parse plain OCR text.
    #[wasm_bindgen]
    pub fn parse_text(&self, text: &str) -> Result<JsValue, JsValue> {
        let parsed = self
            .parser
            .parse(&OcrResult::from_text(text), &self.catalog)
            .map_err(to_js_error)?;
        to_js(&parsed)
    }
}

impl Default for SlipParserJs {
    fn default() -> Self {
        Self::new()
    }
}
