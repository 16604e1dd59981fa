//! CLI subcommands and the input/config plumbing they share.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod parse;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use slip_core::error::ExtractionError;
use slip_core::ocr::from_vision_response;
use slip_core::{Catalog, OcrResult, SlipConfig};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slip")
        .join("config.json")
}

/// Load the config given with `-c`, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SlipConfig> {
    if let Some(path) = config_path {
        return Ok(SlipConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config at {}", default_path.display());
        Ok(SlipConfig::from_file(&default_path)?)
    } else {
        Ok(SlipConfig::default())
    }
}

/// Build the catalog: built-in products (unless disabled) plus custom ones.
pub fn load_catalog(config: &SlipConfig, custom_override: Option<&Path>) -> anyhow::Result<Catalog> {
    Ok(Catalog::from_config(&config.catalog, custom_override)?)
}

/// Read one OCR input file.
///
/// `.txt` files are plain OCR text. JSON files hold an OCR result with a
/// `lines` array, or a raw vision API response when `vision` is set.
pub fn read_ocr_input(path: &Path, vision: bool) -> anyhow::Result<OcrResult> {
    let content = fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension == "txt" {
        return Ok(OcrResult::from_text(&content));
    }

    let value: Value = serde_json::from_str(&content)?;

    if vision {
        return Ok(from_vision_response(&value)?);
    }

    if !value.get("lines").is_some_and(Value::is_array) {
        return Err(ExtractionError::InvalidInput(format!(
            "{}: OCR result has no `lines` array",
            path.display()
        ))
        .into());
    }

    Ok(serde_json::from_value(value)?)
}
