//! Quantity extraction from a slip line.

use regex::Regex;

use super::patterns::{
    PACK_SIZE, QUANTITY_COUNTER, QUANTITY_DELIMITED, QUANTITY_LABELED, QUANTITY_MULTIPLIER,
};
use super::similarity::fold_width;
use super::{ExtractionMatch, FieldExtractor};

/// Quantity assumed when a line shows none.
pub const DEFAULT_QUANTITY: u32 = 1;

/// Valid quantity range on a handwritten slip.
const QUANTITY_RANGE: std::ops::RangeInclusive<u32> = 1..=99;

/// Quantity field extractor.
pub struct QuantityExtractor;

impl QuantityExtractor {
    pub fn new() -> Self {
        Self
    }

    fn patterns() -> [(&'static Regex, f32); 4] {
        [
            (&*QUANTITY_MULTIPLIER, 0.95),
            (&*QUANTITY_COUNTER, 0.9),
            (&*QUANTITY_LABELED, 0.9),
            (&*QUANTITY_DELIMITED, 0.6),
        ]
    }
}

impl Default for QuantityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for QuantityExtractor {
    type Output = ExtractionMatch<u32>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// One candidate per pattern family, from the family's first match only.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let folded = fold_width(text);
        // "30本入" is a pack size, not a count
        let cleaned = PACK_SIZE.replace_all(&folded, " ");

        Self::patterns()
            .into_iter()
            .filter_map(|(pattern, confidence)| {
                let caps = pattern.captures(&cleaned)?;
                let digits = caps.get(1)?;
                let quantity: u32 = digits.as_str().parse().ok()?;
                QUANTITY_RANGE.contains(&quantity).then(|| {
                    ExtractionMatch::new(quantity, confidence, &caps[0])
                        .with_position(digits.start(), digits.end())
                })
            })
            .collect()
    }
}

/// Extract the unit count of a slip line; defaults to 1.
pub fn extract_quantity(line: &str) -> u32 {
    QuantityExtractor::new()
        .extract(line)
        .map(|m| m.value)
        .unwrap_or(DEFAULT_QUANTITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier() {
        assert_eq!(extract_quantity("ローションII 3,500 ×2"), 2);
        assert_eq!(extract_quantity("クイーンシルバー x3"), 3);
        assert_eq!(extract_quantity("パック Ｘ２"), 2);
    }

    #[test]
    fn test_trailing_x_of_a_name_is_not_a_multiplier() {
        assert_eq!(extract_quantity("アルソア ビエッセEX 20,000"), 1);
        assert_eq!(extract_quantity("ビエッセEX 20000"), 1);
        assert_eq!(extract_quantity("ビエッセEX 20,000 x2"), 2);
        assert_eq!(extract_quantity("ビエッセEX 20,000 ×2"), 2);
    }

    #[test]
    fn test_counter_suffix() {
        assert_eq!(extract_quantity("クレイパック 2個"), 2);
        assert_eq!(extract_quantity("エッセンスI ３本"), 3);
        assert_eq!(extract_quantity("シェードオン 4,000 2 点"), 2);
    }

    #[test]
    fn test_labeled() {
        assert_eq!(extract_quantity("セルローション 数量：4"), 4);
    }

    #[test]
    fn test_delimited_column() {
        assert_eq!(extract_quantity("メイクオフ | 3,000 | 2 |"), 2);
        assert_eq!(extract_quantity("メイクオフ / 3000 / 5"), 5);
    }

    #[test]
    fn test_pack_size_is_not_a_quantity() {
        assert_eq!(extract_quantity("酵素 30本入"), 1);
        assert_eq!(extract_quantity("酵素 30本入り ×2"), 2);
    }

    #[test]
    fn test_out_of_range_falls_through() {
        assert_eq!(extract_quantity("クイーンシルバー ×120"), 1);
        assert_eq!(extract_quantity("クイーンシルバー ×0 2個"), 2);
    }

    #[test]
    fn test_default() {
        assert_eq!(extract_quantity("クイーン シルバー 4,000"), 1);
        assert_eq!(extract_quantity(""), 1);
    }
}
