//! Shared utilities for coercing raw cell values.
//!
//! This module contains the parsing helpers used by ingest to turn text
//! cells into numbers and dates, plus small polars dtype predicates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// How a column's dtype is coerced during ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    Numeric,
    /// `Date` or `Datetime`
    Datetime,
    /// Text, including categoricals
    String,
    Other,
}

/// Integer or float, excluding decimals.
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric()
}

/// Check if a DataType is a calendar type that carries a date.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Stripped from text before a numeric parse.
pub const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Cell contents that mean "no value", compared case-insensitively.
pub const ERROR_MARKERS: [&str; 9] = [
    "error", "unknown", "n/a", "na", "nan", "null", "missing", "none", "#n/a",
];

/// Remove currency, percent and grouping characters.
///
/// # Example
///
/// ```rust,ignore
/// use sales_insight::utils::clean_numeric_string;
///
/// assert_eq!(clean_numeric_string("$1,234.56"), "1234.56");
/// assert_eq!(clean_numeric_string("  42%  "), "42");
/// ```
pub fn clean_numeric_string(s: &str) -> String {
    let mut result = s.trim().to_string();
    for c in NUMERIC_FORMAT_CHARS {
        result = result.replace(c, "");
    }
    result
}

/// Whether a cell holds one of [`ERROR_MARKERS`].
pub fn is_error_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    ERROR_MARKERS.iter().any(|&marker| lower == marker)
}

/// Try to parse a string as a finite numeric value.
///
/// Handles currency symbols, percentages, and thousands separators. Blank
/// cells, error markers and anything that is not a finite number yield `None`.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || is_error_marker(trimmed) {
        return None;
    }
    let cleaned = clean_numeric_string(trimmed);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Try to parse a string as a calendar date.
///
/// Each format is tried first as a plain date and then as a date-time (the
/// time part is discarded). RFC 3339 timestamps are accepted as a last resort.
pub fn parse_date_string<S: AsRef<str>>(s: &str, formats: &[S]) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() || is_error_marker(trimmed) {
        return None;
    }

    for format in formats {
        let format = format.as_ref();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Convert a polars `Date` physical value (days since the Unix epoch).
pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::Duration::days(days.into()))
}

// =============================================================================
// Tests
// =============================================================================
