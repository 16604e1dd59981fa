//! Unit price extraction from a slip line.

use super::patterns::{PRICE_BARE, PRICE_GROUPED, PRICE_WITH_CURRENCY, PRICE_WITH_YEN};
use super::similarity::fold_width;
use super::{ExtractionMatch, FieldExtractor};

/// Price field extractor.
///
/// Candidates are reported in priority order: currency-prefixed, comma-grouped,
/// yen-suffixed, then bare 3-5 digit runs.
pub struct PriceExtractor;

impl PriceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PriceExtractor {
    type Output = ExtractionMatch<u32>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let folded = fold_width(text);
        let mut results = Vec::new();

        let families = [
            (&*PRICE_WITH_CURRENCY, 0.95),
            (&*PRICE_GROUPED, 0.9),
            (&*PRICE_WITH_YEN, 0.9),
            (&*PRICE_BARE, 0.6),
        ];

        for (pattern, confidence) in families {
            for caps in pattern.captures_iter(&folded) {
                let Some(digits) = caps.get(1) else {
                    continue;
                };
                if let Some(price) = parse_price(digits.as_str()) {
                    results.push(
                        ExtractionMatch::new(price, confidence, digits.as_str())
                            .with_position(digits.start(), digits.end()),
                    );
                }
            }
        }

        results
    }
}

/// Extract the unit price of a slip line, if it shows one.
pub fn extract_price(line: &str) -> Option<u32> {
    PriceExtractor::new().extract(line).map(|m| m.value)
}

fn parse_price(digits: &str) -> Option<u32> {
    digits.replace(',', "").parse().ok().filter(|&p| p > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_price() {
        assert_eq!(extract_price("クイーン シルバー 4,000"), Some(4000));
        assert_eq!(extract_price("セルエッセンス 13,000 ×1"), Some(13000));
    }

    #[test]
    fn test_currency_prefixed_wins() {
        assert_eq!(extract_price("クイーンシルバー 135g ¥4000"), Some(4000));
        assert_eq!(extract_price("ローションI ￥３，５００"), Some(3500));
    }

    #[test]
    fn test_yen_suffixed() {
        assert_eq!(extract_price("パック 3500円"), Some(3500));
    }

    #[test]
    fn test_bare_price() {
        assert_eq!(extract_price("エッセンスII 8000 1"), Some(8000));
        assert_eq!(extract_price("ローションⅡ ３５００"), Some(3500));
    }

    #[test]
    fn test_product_code_is_not_a_price() {
        assert_eq!(extract_price("421628"), None);
        assert_eq!(extract_price("421628 1,400"), Some(1400));
    }

    #[test]
    fn test_no_price() {
        assert_eq!(extract_price("クレイパック ×2"), None);
        assert_eq!(extract_price(""), None);
    }

    #[test]
    fn test_extract_all_order() {
        let all = PriceExtractor::new().extract_all("¥2,200 4000");
        let values: Vec<u32> = all.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![2200, 2200, 4000]);
    }
}
