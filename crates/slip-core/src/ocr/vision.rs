//! Conversion of Google Cloud Vision `images:annotate` responses.

use serde_json::Value;
use tracing::debug;

use super::{split_lines, OcrResult, TextBlock, Vertex};
use crate::error::OcrError;

/// Convert a raw vision response into an [`OcrResult`].
///
/// Only the first entry of `responses` is read.
pub fn from_vision_response(response: &Value) -> Result<OcrResult, OcrError> {
    let first = response
        .get("responses")
        .and_then(Value::as_array)
        .ok_or_else(|| OcrError::MalformedResponse("missing `responses` array".to_string()))?
        .first()
        .cloned()
        .unwrap_or(Value::Null);

    if let Some(error) = first.get("error") {
        return Err(OcrError::Api {
            code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    let annotations = first
        .get("textAnnotations")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let full_text = annotations
        .first()
        .and_then(|a| a.get("description"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let blocks = annotations
        .iter()
        .skip(1)
        .map(|a| TextBlock {
            text: a
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            bounding_box: a
                .pointer("/boundingPoly/vertices")
                .and_then(Value::as_array)
                .map(|vs| vs.iter().map(parse_vertex).collect())
                .unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    let paragraphs = first
        .pointer("/fullTextAnnotation/pages")
        .map(collect_paragraphs)
        .unwrap_or_default();

    debug!(
        "Vision response: {} chars, {} blocks, {} paragraphs",
        full_text.len(),
        blocks.len(),
        paragraphs.len()
    );

    Ok(OcrResult {
        lines: split_lines(&full_text),
        full_text,
        blocks,
        paragraphs,
    })
}

fn parse_vertex(v: &Value) -> Vertex {
    let coord = |key: &str| {
        v.get(key)
            .and_then(Value::as_i64)
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(0)
    };
    Vertex {
        x: coord("x"),
        y: coord("y"),
    }
}

fn children<'a>(v: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    v.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Words joined by spaces, each word the concatenation of its symbols.
fn collect_paragraphs(pages: &Value) -> Vec<String> {
    let mut paragraphs = Vec::new();

    for page in pages.as_array().into_iter().flatten() {
        for block in children(page, "blocks") {
            for paragraph in children(block, "paragraphs") {
                let text = children(paragraph, "words")
                    .map(|word| {
                        children(word, "symbols")
                            .filter_map(|s| s.get("text").and_then(Value::as_str))
                            .collect::<String>()
                    })
                    .collect::<Vec<_>>()
                    .join(" ");

                if !text.trim().is_empty() {
                    paragraphs.push(text);
                }
            }
        }
    }

    paragraphs
}
