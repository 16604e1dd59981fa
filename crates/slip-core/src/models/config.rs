//! Configuration structures for the slip parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SlipError};

/// Main configuration for the slip pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlipConfig {
    /// Product matching configuration.
    pub matching: MatchingConfig,

    /// Catalog configuration.
    pub catalog: CatalogConfig,

    /// Review policy applied by callers.
    pub review: ReviewConfig,
}

/// Product matching configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum score for accepting a product match (0.0 - 1.0).
    pub min_match_score: f32,

    /// Maximum distance (JPY) between slip price and keyword rule price
    /// that still counts as a price confirmation.
    pub price_tolerance: u32,

    /// Number of leading normalized name characters used for prefix checks.
    pub prefix_chars: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_match_score: 0.4,
            price_tolerance: 100,
            prefix_chars: 4,
        }
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Include the built-in product master.
    pub include_builtin: bool,

    /// JSON file with user-added products.
    pub custom_products: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            custom_products: None,
        }
    }
}

/// Review policy. Not used by the parser itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Parses with a confidence below this are flagged for manual review.
    pub review_threshold: f32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            review_threshold: 0.7,
        }
    }
}

impl SlipConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that scores and thresholds are in range.
    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.matching.min_match_score) {
            return Err(SlipError::Config(format!(
                "matching.min_match_score must be within 0.0 - 1.0, got {}",
                self.matching.min_match_score
            )));
        }
        if !unit.contains(&self.review.review_threshold) {
            return Err(SlipError::Config(format!(
                "review.review_threshold must be within 0.0 - 1.0, got {}",
                self.review.review_threshold
            )));
        }
        if self.matching.prefix_chars == 0 {
            return Err(SlipError::Config(
                "matching.prefix_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
