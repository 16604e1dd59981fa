//! Keyword dictionary and price index for the flagship products.
//!
//! Keywords are stored in compact form (see [`compact`](super::similarity::compact)):
//! no whitespace, lowercase, half-width.

use std::collections::BTreeMap;

use lazy_static::lazy_static;

use crate::models::catalog::{Catalog, ProductCatalogEntry};

/// A keyword rule that maps slip wording to a product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    /// Rule identifier, used in diagnostics.
    pub label: &'static str,
    /// Literal substrings of a compact slip line.
    pub keywords: &'static [&'static str],
    /// Declared unit price, if the family has a single price.
    pub price: Option<u32>,
    /// Category tag of the family.
    pub category: &'static str,
}

impl KeywordRule {
    /// Longest keyword of this rule contained in `compact_line`.
    pub fn matched_keyword(&self, compact_line: &str) -> Option<&'static str> {
        self.keywords
            .iter()
            .copied()
            .filter(|keyword| compact_line.contains(keyword))
            .max_by_key(|keyword| keyword.chars().count())
    }

    /// Whether `price` is within `tolerance` of the declared price.
    pub fn confirms_price(&self, price: u32, tolerance: u32) -> bool {
        self.price
            .is_some_and(|declared| declared.abs_diff(price) <= tolerance)
    }
}

/// Keyword rules in table order.
pub static KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        label: "queen_silver_135",
        keywords: &["クイーンシルバー", "クィーンシルバー", "qs135", "クイーンシルバー(135"],
        price: Some(4000),
        category: "QS",
    },
    KeywordRule {
        label: "queen_silver_70",
        keywords: &["クイーンシルバー70", "クイーンシルバー(70", "qs70"],
        price: Some(2200),
        category: "QS",
    },
    KeywordRule {
        label: "queen_silver_pf",
        keywords: &["クイーンシルバーpf"],
        price: Some(2200),
        category: "QS",
    },
    KeywordRule {
        label: "clay_pack",
        keywords: &["クレイパック", "パック"],
        price: Some(3500),
        category: "P",
    },
    KeywordRule {
        label: "lotion_1",
        keywords: &["ローションi"],
        price: Some(3500),
        category: "L",
    },
    KeywordRule {
        label: "lotion_2",
        keywords: &["ローションii"],
        price: Some(3500),
        category: "L",
    },
    KeywordRule {
        label: "cell_lotion",
        keywords: &["セルローション"],
        price: Some(4800),
        category: "L",
    },
    KeywordRule {
        label: "essence_1",
        keywords: &["エッセンスi"],
        price: Some(5000),
        category: "ES",
    },
    KeywordRule {
        label: "essence_2",
        keywords: &["エッセンスii"],
        price: Some(8000),
        category: "ES",
    },
    KeywordRule {
        label: "cell_essence",
        keywords: &["セルエッセンス"],
        price: Some(13000),
        category: "ES",
    },
    KeywordRule {
        label: "sp_prepare",
        keywords: &["spプレペア", "spプレ"],
        price: Some(4200),
        category: "SP",
    },
    KeywordRule {
        label: "make_off",
        keywords: &["メイクオフ"],
        price: Some(3000),
        category: "MO",
    },
    KeywordRule {
        label: "enzyme",
        keywords: &["酵素"],
        price: None,
        category: "酵素",
    },
    KeywordRule {
        label: "shade_on",
        keywords: &["シェードオン"],
        price: None,
        category: "色",
    },
    KeywordRule {
        label: "blush_on",
        keywords: &["ブラッシュオン"],
        price: None,
        category: "色",
    },
    KeywordRule {
        label: "lip_color",
        keywords: &["リップカラー"],
        price: None,
        category: "色",
    },
];

/// A product reachable from a price index bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCandidate {
    pub code: String,
    pub name: String,
    pub category: String,
}

impl From<&ProductCatalogEntry> for PriceCandidate {
    fn from(entry: &ProductCatalogEntry) -> Self {
        Self {
            code: entry.code.clone(),
            name: entry.name.clone(),
            category: entry.category.clone(),
        }
    }
}

/// Exact price to candidate products. Each bucket is sorted by code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceIndex {
    buckets: BTreeMap<u32, Vec<PriceCandidate>>,
}

lazy_static! {
    static ref BUILTIN_PRICE_INDEX: PriceIndex = PriceIndex::new(
        [
            (2200, "421636", "アルソアクイーンシルバー(70g)", "QS"),
            (2200, "421644", "アルソアクイーンシルバーPF(70g)", "QS"),
            (3000, "441759", "リベストメイクオフ", "MO"),
            (3500, "421652", "アルソア クレイパック", "P"),
            (3500, "421660", "アルソア ローションI", "L"),
            (3500, "421678", "アルソア ローションII", "L"),
            (4000, "421628", "アルソアクイーンシルバー(135g)", "QS"),
            (4200, "441519", "リベストSPプレペア", "SP"),
            (4800, "421686", "アルソア セルローション", "L"),
            (5000, "430265", "アルソア エッセンスI", "ES"),
            (8000, "421701", "アルソア エッセンスII", "ES"),
            (13000, "430273", "アルソア セルエッセンス", "ES"),
        ]
        .into_iter()
        .map(|(price, code, name, category)| (price, ProductCatalogEntry::new(code, name, price, category)))
    );
}

impl PriceIndex {
    /// Build an index from `(price, entry)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (u32, ProductCatalogEntry)>) -> Self {
        let mut buckets: BTreeMap<u32, Vec<PriceCandidate>> = BTreeMap::new();
        for (price, entry) in entries {
            buckets.entry(price).or_default().push(PriceCandidate::from(&entry));
        }
        for bucket in buckets.values_mut() {
            bucket.sort_by(|a, b| a.code.cmp(&b.code));
            bucket.dedup_by(|a, b| a.code == b.code);
        }
        Self { buckets }
    }

    /// Index of the flagship skincare products.
    pub fn builtin() -> Self {
        BUILTIN_PRICE_INDEX.clone()
    }

    /// Index every entry of a catalog by its price.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(catalog.iter().map(|entry| (entry.price, entry.clone())))
    }

    /// Candidates listed at exactly `price`.
    pub fn get(&self, price: u32) -> &[PriceCandidate] {
        self.buckets.get(&price).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn prices(&self) -> impl Iterator<Item = u32> + '_ {
        self.buckets.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
