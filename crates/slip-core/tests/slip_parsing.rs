//! End-to-end parsing behavior through `SlipParser`.

use std::collections::HashSet;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use slip_core::slip::rules::should_exclude;
use slip_core::slip::ConfidenceScorer;
use slip_core::{
    Catalog, MatchMethod, MatchedItem, OcrResult, ParsedSlip, ProductCatalogEntry, ProductMatcher,
    SlipExtractor, SlipParser,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
}

fn parser() -> SlipParser {
    SlipParser::new().with_reference_date(today())
}

fn parse(text: &str) -> ParsedSlip {
    parser().extract_from_text(text, &Catalog::builtin()).unwrap()
}

const SAMPLE_SLIP: &str = "売上伝票\n\
    山田 花子　様\n\
    R7年7月31日\n\
    品名 数量 金額\n\
    クイーン シルバー 4,000 ×2\n\
    ローションII 3,500 1本\n\
    セルエッセンス 13,000\n\
    クイーンシルバー 4000\n\
    酵素 30本入 10,000\n\
    小計 32,500\n\
    消費税 3,250\n\
    振込先：○○銀行 普通 1234567\n\
    いつもありがとうございます";

#[test]
fn parsing_is_idempotent() {
    let ocr = OcrResult::from_text(SAMPLE_SLIP);
    let catalog = Catalog::builtin();
    let parser = parser();

    let first = parser.extract(&ocr, &catalog).unwrap();
    let second = parser.extract(&ocr, &catalog).unwrap();
    assert_eq!(first, second);
}

#[test]
fn items_are_unique_by_code() {
    let parsed = parse(SAMPLE_SLIP);

    let codes: Vec<_> = parsed.items.iter().map(|i| i.code.as_str()).collect();
    let unique: HashSet<_> = codes.iter().collect();
    assert_eq!(codes.len(), unique.len());
    assert_eq!(codes, vec!["421628", "421678", "430273", "447731"]);
}

#[test]
fn scores_stay_in_unit_interval() {
    let inputs = [
        "",
        "\n\n",
        SAMPLE_SLIP,
        "??\n!!",
        "八ーブティ\nゴールドカード",
    ];

    for text in inputs {
        let parsed = parse(text);
        assert!((0.0..=1.0).contains(&parsed.confidence), "{:?}", text);
        for item in &parsed.items {
            assert!((0.0..=1.0).contains(&item.match_score), "{:?}", item);
        }
    }

    // Matching and scoring stay total on an empty catalog
    let lines: Vec<String> = SAMPLE_SLIP.lines().map(str::to_string).collect();
    let outcome = ProductMatcher::new().match_products(&lines, &Catalog::default());
    assert!(outcome.items.is_empty());
    assert_eq!(ConfidenceScorer::new(today()).score(&ParsedSlip::empty(today())), 0.0);
}

#[test]
fn quantities_are_between_one_and_ninety_nine() {
    let parsed = parse("クイーン シルバー 4,000 ×120\nクレイパック 3,500 ×3\n酵素 30本入 10,000");

    for item in &parsed.items {
        assert!((1..=99).contains(&item.quantity), "{:?}", item);
    }
    let quantities: Vec<_> = parsed.items.iter().map(|i| (i.code.as_str(), i.quantity)).collect();
    assert_eq!(quantities, vec![("421628", 1), ("421652", 3), ("447731", 1)]);
}

#[test]
fn product_name_ending_in_x_keeps_default_quantity() {
    let parsed = parse("アルソア ビエッセEX 20,000");

    assert_eq!(parsed.items.len(), 1);
    assert_eq!(parsed.items[0].code, "447913");
    assert_eq!(parsed.items[0].quantity, 1);
    assert_eq!(parsed.total_amount(), 20000);
}

#[test]
fn bank_line_is_excluded() {
    let line = "振込先：○○銀行 普通 1234567";
    assert!(should_exclude(line));

    let parsed = parse(line);
    assert!(parsed.items.is_empty());
    assert!(parsed.match_details.is_empty());
}

#[test]
fn customer_name_keeps_inner_whitespace() {
    let parsed = parse("山田 花子　様");
    assert_eq!(parsed.customer_name, "山田 花子");
}

#[test]
fn reiwa_date_is_converted() {
    let parsed = parse("お買上げ日 R7年7月31日");
    assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
    assert!(parsed.date_extracted);

    let json = serde_json::to_value(&parsed).unwrap();
    assert_eq!(json["date"], "2025-07-31");
}

#[test]
fn keyword_and_price_identify_queen_silver() {
    let parsed = parse("クイーン シルバー 4,000");

    assert_eq!(parsed.items.len(), 1);
    let item = &parsed.items[0];
    assert_eq!(item.code, "421628");
    assert_eq!(item.category, "QS");
    assert!(item.match_score >= 0.9);
    assert_eq!(parsed.match_details[0].method, MatchMethod::PriceKeyword);

    let json = serde_json::to_value(&parsed.match_details[0]).unwrap();
    assert_eq!(json["method"], "price+keyword");
}

#[test]
fn garbled_name_falls_back_to_similarity() {
    let catalog = Catalog::new(vec![
        ProductCatalogEntry::new("900010", "ハーブティー", 1200, "other"),
        ProductCatalogEntry::new("900011", "ボディミルク", 2800, "other"),
    ])
    .unwrap();

    let parsed = parser().extract_from_text("八ーブティ", &catalog).unwrap();
    assert_eq!(parsed.items.len(), 1);
    assert_eq!(parsed.items[0].code, "900010");
    assert_eq!(parsed.match_details[0].method, MatchMethod::Similarity);

    // 4 of 6 distinct characters shared, lengths 5 and 6
    let expected: f32 = 0.7 * (4.0 / 6.0) + 0.3 * (5.0 / 6.0);
    assert!((parsed.items[0].match_score - expected).abs() < 1e-5);

    let parsed = parser().extract_from_text("ゴールドカード", &catalog).unwrap();
    assert!(parsed.items.is_empty());
}

#[test]
fn confidence_is_a_weighted_average() {
    let mut parsed = ParsedSlip::empty(today());
    parsed.items.push(MatchedItem {
        code: "421628".to_string(),
        name: "アルソアクイーンシルバー(135g)".to_string(),
        price: 4000,
        category: "QS".to_string(),
        quantity: 1,
        match_score: 0.8,
    });

    let confidence = ConfidenceScorer::new(today()).score(&parsed);
    assert!((confidence - 0.4).abs() < 1e-6);
}

#[test]
fn missing_lines_field_is_invalid_input() {
    assert!(serde_json::from_str::<OcrResult>(r#"{"fullText": "クイーン シルバー 4,000"}"#).is_err());
    assert!(serde_json::from_str::<OcrResult>(r#"{"fullText": "", "lines": "x"}"#).is_err());
}

#[test]
fn empty_lines_fall_back_to_full_text() {
    let ocr: OcrResult =
        serde_json::from_str(r#"{"fullText": "山田 花子 様\nクイーン シルバー 4,000", "lines": []}"#)
            .unwrap();
    let parsed = parser().extract(&ocr, &Catalog::builtin()).unwrap();

    assert_eq!(parsed.customer_name, "山田 花子");
    assert_eq!(parsed.items.len(), 1);
}

#[test]
fn custom_products_are_matched() {
    let custom = vec![ProductCatalogEntry::new("900001", "限定ギフトセット", 9800, "other")];
    let catalog = Catalog::merged(custom).unwrap();

    let parsed = parser().extract_from_text("限定ギフトセット 9,800", &catalog).unwrap();
    assert_eq!(parsed.items[0].code, "900001");
    assert_eq!(parsed.items[0].match_score, 0.95);
}
