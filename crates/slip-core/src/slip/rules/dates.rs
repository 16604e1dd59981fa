//! Transaction date extraction.
//!
//! Slips carry Reiwa era dates (`R7年7月31日`, `令和7年7月31日`, `R7.7.31`),
//! Western dates (`2025/07/31`) or a bare month and day.

use chrono::{Datelike, NaiveDate};
use regex::Captures;

use super::patterns::{
    DATE_ERA_ABBREVIATED, DATE_ERA_FULL, DATE_ERA_NUMERIC, DATE_MONTH_DAY, DATE_WESTERN,
};
use super::similarity::fold_width;
use super::{ExtractionMatch, FieldExtractor};

/// Gregorian year preceding Reiwa 1 (2019).
const REIWA_EPOCH: i32 = 2018;

/// Years accepted for dates that spell out a year.
const PLAUSIBLE_YEARS: std::ops::RangeInclusive<i32> = 2020..=2030;

/// Result of date extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlipDate {
    /// The extracted date, or the reference date when nothing matched.
    pub date: NaiveDate,
    /// Whether a pattern actually matched.
    pub extracted: bool,
}

/// Date field extractor.
///
/// Pattern families are tried in priority order; only the first match of
/// each family is considered.
pub struct DateExtractor {
    reference_date: NaiveDate,
}

impl DateExtractor {
    /// `reference_date` supplies the year for month/day-only dates.
    pub fn new(reference_date: NaiveDate) -> Self {
        Self { reference_date }
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let folded = fold_width(text);
        let mut results = Vec::new();

        // R7年7月31日
        if let Some(caps) = DATE_ERA_ABBREVIATED.captures(&folded) {
            if let Some(date) = era_date(&caps[1], &caps[2], &caps[3]) {
                results.push(to_match(date, 0.95, &caps));
            }
        }

        // 令和7年7月31日, 令和元年5月1日
        if let Some(caps) = DATE_ERA_FULL.captures(&folded) {
            if let Some(date) = era_date(&caps[1], &caps[2], &caps[3]) {
                results.push(to_match(date, 0.95, &caps));
            }
        }

        // R7.7.31, R7/7/31
        if let Some(caps) = DATE_ERA_NUMERIC.captures(&folded) {
            if let Some(date) = era_date(&caps[1], &caps[2], &caps[3]) {
                results.push(to_match(date, 0.9, &caps));
            }
        }

        // 2025/07/31, 2025-7-31, 2025年7月31日
        if let Some(caps) = DATE_WESTERN.captures(&folded) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            if let Some(date) = checked_date(year, &caps[2], &caps[3]) {
                results.push(to_match(date, 0.9, &caps));
            }
        }

        // 7月31日
        if let Some(caps) = DATE_MONTH_DAY.captures(&folded) {
            let month: u32 = caps[1].parse().unwrap_or(0);
            let day: u32 = caps[2].parse().unwrap_or(0);
            if let Some(date) = NaiveDate::from_ymd_opt(self.reference_date.year(), month, day) {
                results.push(to_match(date, 0.7, &caps));
            }
        }

        results
    }
}

/// Extract the transaction date from the slip lines and full text.
///
/// Falls back to `reference_date` (normally today) with `extracted == false`.
pub fn extract_date(lines: &[String], full_text: &str, reference_date: NaiveDate) -> SlipDate {
    let mut buffer = lines.join("\n");
    buffer.push('\n');
    buffer.push_str(full_text);

    match DateExtractor::new(reference_date).extract(&buffer) {
        Some(found) => SlipDate {
            date: found.value,
            extracted: true,
        },
        None => SlipDate {
            date: reference_date,
            extracted: false,
        },
    }
}

fn era_date(era_year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let era_year: i32 = if era_year == "元" {
        1
    } else {
        era_year.parse().ok()?
    };
    checked_date(REIWA_EPOCH + era_year, month, day)
}

fn checked_date(year: i32, month: &str, day: &str) -> Option<NaiveDate> {
    if !PLAUSIBLE_YEARS.contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

fn to_match(date: NaiveDate, confidence: f32, caps: &Captures<'_>) -> ExtractionMatch<NaiveDate> {
    match caps.get(0) {
        Some(full) => ExtractionMatch::new(date, confidence, full.as_str())
            .with_position(full.start(), full.end()),
        None => ExtractionMatch::new(date, confidence, ""),
    }
}
