//! OCR input types.
//!
//! The image-to-text step runs in an external vision service; this module
//! only models its output and converts the raw API response.

pub mod vision;

pub use vision::from_vision_response;

use serde::{Deserialize, Serialize};

/// A corner of a text block's bounding polygon.
///
/// The vision API omits zero coordinates, hence the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

/// A positional text fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    /// Recognized text content.
    pub text: String,

    /// Bounding polygon.
    #[serde(default)]
    pub bounding_box: Vec<Vertex>,
}

/// Result of OCR on one slip image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResult {
    /// Full recognized text.
    #[serde(default)]
    pub full_text: String,

    /// Text split into visual/logical lines. Required in serialized input.
    pub lines: Vec<String>,

    /// Positional fragments (not used for matching).
    #[serde(default)]
    pub blocks: Vec<TextBlock>,

    /// Paragraph texts (not used for matching).
    #[serde(default)]
    pub paragraphs: Vec<String>,
}

impl OcrResult {
    /// Build a result from plain text, one line per non-blank text line.
    pub fn from_text(text: &str) -> Self {
        Self {
            full_text: text.to_string(),
            lines: split_lines(text),
            blocks: Vec::new(),
            paragraphs: Vec::new(),
        }
    }

    /// Lines to parse: the segmented lines, or the full text split on
    /// newlines when the OCR step did not segment.
    pub fn effective_lines(&self) -> Vec<String> {
        if self.lines.is_empty() {
            split_lines(&self.full_text)
        } else {
            self.lines.clone()
        }
    }

    /// Whether there is any text at all.
    pub fn is_blank(&self) -> bool {
        self.full_text.trim().is_empty() && self.lines.iter().all(|l| l.trim().is_empty())
    }
}

/// Split text on newlines, dropping blank lines.
pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
