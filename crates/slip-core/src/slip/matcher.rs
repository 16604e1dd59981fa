//! Product matching: keyword rules, price index, then fuzzy similarity.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::models::catalog::{Catalog, ProductCatalogEntry};
use crate::models::slip::{MatchDetail, MatchMethod, MatchedItem};

use super::rules::keywords::{KeywordRule, PriceCandidate, PriceIndex, KEYWORD_RULES};
use super::rules::similarity::{compact, name_overlap, prefix, string_similarity};
use super::rules::{extract_price, extract_quantity, normalize_product_name, should_exclude};

/// Score of a keyword rule confirmed by the slip price.
const SCORE_PRICE_KEYWORD: f32 = 0.95;
/// Score of a keyword rule without price confirmation.
const SCORE_KEYWORD: f32 = 0.7;
/// Price index candidate whose name prefix also appears on the line.
const SCORE_PRICE_WITH_PREFIX: f32 = 0.85;
/// Price index candidate matched on price alone.
const SCORE_PRICE_ONLY: f32 = 0.6;
/// Catalog code written on the line.
const SCORE_CODE_LITERAL: f32 = 1.0;
/// Whole normalized product name contained in the line.
const SCORE_NAME_CONTAINED: f32 = 0.95;
/// Product name prefix contained in the line.
const SCORE_NAME_PREFIX: f32 = 0.7;

/// Items and diagnostics produced from a list of slip lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    pub items: Vec<MatchedItem>,
    pub match_details: Vec<MatchDetail>,
}

/// Best catalog product for a single line, before thresholding and de-duplication.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatch<'c> {
    pub entry: &'c ProductCatalogEntry,
    pub score: f32,
    pub method: MatchMethod,
}

#[derive(Debug)]
enum CandidateSource<'i> {
    Rule(&'static KeywordRule),
    Price(&'i PriceCandidate),
}

#[derive(Debug)]
struct Candidate<'i> {
    source: CandidateSource<'i>,
    score: f32,
    method: MatchMethod,
    /// Length of the matched keyword; zero for price index candidates.
    keyword_len: usize,
}

/// Line-by-line product matcher.
#[derive(Debug, Clone)]
pub struct ProductMatcher {
    /// Minimum score for accepting a match.
    min_score: f32,
    /// Keyword price confirmation window (JPY).
    price_tolerance: u32,
    /// Name prefix length for prefix checks.
    prefix_chars: usize,
    price_index: PriceIndex,
}

impl ProductMatcher {
    /// Create a matcher with default thresholds and the built-in price index.
    pub fn new() -> Self {
        Self {
            min_score: 0.4,
            price_tolerance: 100,
            prefix_chars: 4,
            price_index: PriceIndex::builtin(),
        }
    }

    pub fn with_min_score(mut self, score: f32) -> Self {
        self.min_score = score.clamp(0.0, 1.0);
        self
    }

    pub fn with_price_tolerance(mut self, tolerance: u32) -> Self {
        self.price_tolerance = tolerance;
        self
    }

    pub fn with_prefix_chars(mut self, chars: usize) -> Self {
        self.prefix_chars = chars.max(1);
        self
    }

    pub fn with_price_index(mut self, index: PriceIndex) -> Self {
        self.price_index = index;
        self
    }

    pub fn min_score(&self) -> f32 {
        self.min_score
    }

    /// Match every line against the catalog.
    ///
    /// Excluded lines are skipped. A product code is used at most once per
    /// call: a later line resolving to the same code is dropped.
    pub fn match_products(&self, lines: &[String], catalog: &Catalog) -> MatchOutcome {
        let mut outcome = MatchOutcome::default();
        let mut used_codes: HashSet<&str> = HashSet::new();

        for line in lines {
            if should_exclude(line) {
                trace!("Excluded line: {:?}", line);
                continue;
            }

            let Some(found) = self.match_line(line, catalog) else {
                trace!("No candidate for line: {:?}", line);
                continue;
            };

            if found.score < self.min_score {
                debug!(
                    "Rejected {} for {:?}: score {:.2} below {:.2}",
                    found.entry.code, line, found.score, self.min_score
                );
                continue;
            }

            if !used_codes.insert(found.entry.code.as_str()) {
                debug!("Dropped duplicate {} for {:?}", found.entry.code, line);
                continue;
            }

            let quantity = extract_quantity(line);
            debug!(
                "Matched {:?} -> {} {} ({}, {:.2}) x{}",
                line, found.entry.code, found.entry.name, found.method, found.score, quantity
            );

            outcome.items.push(MatchedItem {
                code: found.entry.code.clone(),
                name: found.entry.name.clone(),
                price: found.entry.price,
                category: found.entry.category.clone(),
                quantity,
                match_score: found.score,
            });
            outcome.match_details.push(MatchDetail {
                original_text: line.clone(),
                matched_product: found.entry.name.clone(),
                code: found.entry.code.clone(),
                score: found.score,
                quantity,
                method: found.method,
            });
        }

        outcome
    }

    /// Find the best catalog product for one line.
    ///
    /// Keyword and price index candidates are tried in score order; the
    /// similarity fallback runs only when none of them resolves to a
    /// catalog entry.
    pub fn match_line<'c>(&self, line: &str, catalog: &'c Catalog) -> Option<LineMatch<'c>> {
        let price = extract_price(line);
        let compact_line = compact(line);
        let normalized_line = normalize_product_name(line);

        let mut candidates = self.keyword_candidates(&compact_line, price);
        if let Some(price) = price {
            candidates.extend(self.price_candidates(price, &normalized_line));
        }

        // Stable: keyword candidates stay ahead of price candidates on equal keys
        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.keyword_len.cmp(&a.keyword_len))
        });

        for candidate in &candidates {
            let resolved = match candidate.source {
                CandidateSource::Rule(rule) => resolve_rule(rule, price, &normalized_line, catalog),
                CandidateSource::Price(found) => catalog.find_by_code(&found.code),
            };

            if let Some(entry) = resolved {
                return Some(LineMatch {
                    entry,
                    score: candidate.score,
                    method: candidate.method,
                });
            }
        }

        self.similarity_match(line, &normalized_line, catalog)
    }

    fn keyword_candidates(&self, compact_line: &str, price: Option<u32>) -> Vec<Candidate<'_>> {
        KEYWORD_RULES
            .iter()
            .filter_map(|rule| {
                let keyword = rule.matched_keyword(compact_line)?;
                let confirmed = price.is_some_and(|p| rule.confirms_price(p, self.price_tolerance));
                let (score, method) = if confirmed {
                    (SCORE_PRICE_KEYWORD, MatchMethod::PriceKeyword)
                } else {
                    (SCORE_KEYWORD, MatchMethod::Keyword)
                };
                trace!("Keyword rule {} fired on {:?} ({:.2})", rule.label, keyword, score);

                Some(Candidate {
                    source: CandidateSource::Rule(rule),
                    score,
                    method,
                    keyword_len: keyword.chars().count(),
                })
            })
            .collect()
    }

    fn price_candidates<'i>(&'i self, price: u32, normalized_line: &str) -> Vec<Candidate<'i>> {
        self.price_index
            .get(price)
            .iter()
            .map(|found| {
                let name = normalize_product_name(&found.name);
                let prefix_seen = prefix(&name, self.prefix_chars)
                    .is_some_and(|p| normalized_line.contains(p.as_str()));

                Candidate {
                    source: CandidateSource::Price(found),
                    score: if prefix_seen { SCORE_PRICE_WITH_PREFIX } else { SCORE_PRICE_ONLY },
                    method: MatchMethod::Price,
                    keyword_len: 0,
                }
            })
            .collect()
    }

    /// Fallback against the whole catalog. The highest score wins; on equal
    /// scores the earlier catalog entry is kept.
    fn similarity_match<'c>(
        &self,
        line: &str,
        normalized_line: &str,
        catalog: &'c Catalog,
    ) -> Option<LineMatch<'c>> {
        if let Some(entry) = catalog.iter().find(|entry| line.contains(entry.code.as_str())) {
            return Some(LineMatch {
                entry,
                score: SCORE_CODE_LITERAL,
                method: MatchMethod::Similarity,
            });
        }

        if normalized_line.chars().count() < 2 {
            return None;
        }

        let mut best: Option<(&ProductCatalogEntry, f32)> = None;

        for entry in catalog {
            let name = normalize_product_name(&entry.name);
            if name.is_empty() {
                continue;
            }

            let score = if normalized_line.contains(name.as_str()) {
                SCORE_NAME_CONTAINED
            } else if prefix(&name, self.prefix_chars)
                .is_some_and(|p| normalized_line.contains(p.as_str()))
            {
                SCORE_NAME_PREFIX
            } else {
                string_similarity(&name, normalized_line)
            };

            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((entry, score));
            }
        }

        best.map(|(entry, score)| LineMatch {
            entry,
            score,
            method: MatchMethod::Similarity,
        })
    }
}

impl Default for ProductMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a fired keyword rule to a concrete catalog entry.
fn resolve_rule<'c>(
    rule: &KeywordRule,
    price: Option<u32>,
    normalized_line: &str,
    catalog: &'c Catalog,
) -> Option<&'c ProductCatalogEntry> {
    let pool: Vec<&ProductCatalogEntry> = match rule.price {
        Some(declared) => {
            let by_price: Vec<_> = catalog.by_price(declared).collect();
            if by_price.is_empty() {
                catalog.by_category(rule.category).collect()
            } else {
                let narrowed: Vec<_> = by_price
                    .iter()
                    .copied()
                    .filter(|entry| entry.category == rule.category)
                    .collect();
                if narrowed.is_empty() { by_price } else { narrowed }
            }
        }
        None => {
            let members: Vec<_> = catalog.by_category(rule.category).collect();
            match price {
                Some(price) => {
                    let closest = members.iter().map(|e| e.price.abs_diff(price)).min();
                    members
                        .into_iter()
                        .filter(|e| Some(e.price.abs_diff(price)) == closest)
                        .collect()
                }
                None => members,
            }
        }
    };

    pick_by_name(pool, normalized_line)
}

/// Entry whose name overlaps the line most; ties go to the lowest code.
fn pick_by_name<'c>(
    pool: Vec<&'c ProductCatalogEntry>,
    normalized_line: &str,
) -> Option<&'c ProductCatalogEntry> {
    pool.into_iter()
        .map(|entry| (name_overlap(&entry.name, normalized_line), entry))
        .min_by(|(overlap_a, a), (overlap_b, b)| {
            overlap_b.cmp(overlap_a).then_with(|| a.code.cmp(&b.code))
        })
        .map(|(_, entry)| entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn best<'c>(line: &str, catalog: &'c Catalog) -> Option<LineMatch<'c>> {
        ProductMatcher::new().match_line(line, catalog)
    }

    #[test]
    fn test_keyword_with_price() {
        let catalog = Catalog::builtin();
        let found = best("クイーン シルバー 4,000", &catalog).unwrap();
        assert_eq!(found.entry.code, "421628");
        assert_eq!(found.method, MatchMethod::PriceKeyword);
        assert_eq!(found.score, 0.95);
    }

    #[test]
    fn test_keyword_without_price() {
        let catalog = Catalog::builtin();
        let found = best("クレイパック ×2", &catalog).unwrap();
        assert_eq!(found.entry.code, "421652");
        assert_eq!(found.method, MatchMethod::Keyword);
        assert_eq!(found.score, 0.7);
    }

    #[test]
    fn test_price_within_tolerance() {
        let catalog = Catalog::builtin();
        let found = best("セルローション 4,850", &catalog).unwrap();
        assert_eq!(found.entry.code, "421686");
        assert_eq!(found.method, MatchMethod::PriceKeyword);
    }

    #[test]
    fn test_longer_keyword_wins_tie() {
        let catalog = Catalog::builtin();
        let found = best("ローションII 3,500", &catalog).unwrap();
        assert_eq!(found.entry.code, "421678");

        let found = best("ローションI 3,500", &catalog).unwrap();
        assert_eq!(found.entry.code, "421660");
    }

    #[test]
    fn test_queen_silver_70_narrowed_by_name() {
        let catalog = Catalog::builtin();
        let found = best("クイーンシルバー(70g) 2,200", &catalog).unwrap();
        assert_eq!(found.entry.code, "421636");
        assert_eq!(found.method, MatchMethod::PriceKeyword);
    }

    #[test]
    fn test_rule_without_price_uses_category_and_name() {
        let catalog = Catalog::builtin();
        let found = best("酵素プラス ラージ", &catalog).unwrap();
        assert_eq!(found.entry.code, "447765");

        let found = best("シェードオン マザーシェル 1,400", &catalog).unwrap();
        assert_eq!(found.entry.code, "441816");
        assert_eq!(found.method, MatchMethod::Keyword);
    }

    #[test]
    fn test_rule_without_price_prefers_closest_price() {
        let catalog = Catalog::builtin();
        let found = best("酵素 20,000", &catalog).unwrap();
        assert_eq!(found.entry.code, "447781");
    }

    #[test]
    fn test_price_index_with_prefix() {
        let catalog = Catalog::builtin();
        // No keyword rule covers "セルエッセン" but the price and prefix do
        let found = best("セルエッセン 13,000", &catalog).unwrap();
        assert_eq!(found.entry.code, "430273");
        assert_eq!(found.method, MatchMethod::Price);
        assert_eq!(found.score, 0.85);
    }

    #[test]
    fn test_price_index_only() {
        let catalog = Catalog::builtin();
        let found = best("??? 4,200", &catalog).unwrap();
        assert_eq!(found.entry.code, "441519");
        assert_eq!(found.score, 0.6);
    }

    #[test]
    fn test_code_literal() {
        let catalog = Catalog::builtin();
        let found = best("447731", &catalog).unwrap();
        assert_eq!(found.entry.code, "447731");
        assert_eq!(found.score, 1.0);
        assert_eq!(found.method, MatchMethod::Similarity);
    }

    #[test]
    fn test_name_containment() {
        let catalog = Catalog::builtin();
        let found = best("アルソア セルセラム", &catalog).unwrap();
        assert_eq!(found.entry.code, "430281");
        assert_eq!(found.score, 0.95);
    }

    #[test]
    fn test_match_products_dedup_and_exclusion() {
        let catalog = Catalog::builtin();
        let text = "振込先：○○銀行 普通 1234567\n\
                    クイーン シルバー 4,000 ×2\n\
                    クイーンシルバー 4000\n\
                    小計 8,000";
        let outcome = ProductMatcher::new().match_products(&lines(text), &catalog);

        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].code, "421628");
        assert_eq!(outcome.items[0].quantity, 2);
        assert_eq!(outcome.match_details.len(), 1);
        assert_eq!(outcome.match_details[0].original_text, "クイーン シルバー 4,000 ×2");
    }

    #[test]
    fn test_min_score_threshold() {
        let catalog = Catalog::builtin();
        let strict = ProductMatcher::new().with_min_score(0.9);
        let outcome = strict.match_products(&lines("クレイパック ×2"), &catalog);
        assert!(outcome.items.is_empty());
        assert!(outcome.match_details.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        let matcher = ProductMatcher::new();
        assert_eq!(matcher.match_products(&[], &Catalog::builtin()), MatchOutcome::default());
        assert_eq!(
            matcher.match_products(&lines("クイーン シルバー 4,000"), &Catalog::default()),
            MatchOutcome::default()
        );
    }

    #[test]
    fn test_custom_catalog_without_index_products() {
        let catalog = Catalog::new(vec![
            ProductCatalogEntry::new("900001", "限定パック", 3500, "P"),
            ProductCatalogEntry::new("900002", "限定ローション", 3000, "L"),
        ])
        .unwrap();
        let found = best("パック 3,500", &catalog).unwrap();
        assert_eq!(found.entry.code, "900001");
        assert_eq!(found.method, MatchMethod::PriceKeyword);
    }
}
