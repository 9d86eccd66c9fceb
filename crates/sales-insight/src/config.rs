//! Configuration types for the sales analysis.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic analysis setup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date formats tried, in order, when a `Date` column arrives as text.
///
/// Month-first wins over day-first for ambiguous slash dates.
pub const DEFAULT_DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%Y-%m-%d %H:%M:%S",
];

/// Number of bins used for the customer age histogram.
pub const DEFAULT_AGE_HISTOGRAM_BINS: usize = 20;

/// Upper bound on histogram bins; bins are allocated up front.
pub const MAX_AGE_HISTOGRAM_BINS: usize = 1_000;

fn default_trend_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

fn default_trend_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default()
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
}

/// Configuration for a sales analysis run.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use sales_insight::config::AnalysisConfig;
/// use chrono::NaiveDate;
///
/// let config = AnalysisConfig::builder()
///     .trend_range(
///         NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2022, 6, 30).unwrap(),
///     )
///     .age_histogram_bins(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// First day (inclusive) of the monthly revenue/profit trend.
    /// Default: 2023-01-01
    pub trend_start: NaiveDate,

    /// Last day (inclusive) of the monthly revenue/profit trend.
    /// Default: 2023-12-31
    pub trend_end: NaiveDate,

    /// Number of equal-width bins for the age distribution.
    /// Default: 20
    pub age_histogram_bins: usize,

    /// chrono format strings used to coerce text dates, tried in order.
    /// RFC 3339 timestamps are always accepted in addition to these.
    pub date_formats: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trend_start: default_trend_start(),
            trend_end: default_trend_end(),
            age_histogram_bins: DEFAULT_AGE_HISTOGRAM_BINS,
            date_formats: default_date_formats(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.trend_start > self.trend_end {
            return Err(ConfigValidationError::InvalidDateRange {
                start: self.trend_start,
                end: self.trend_end,
            });
        }

        if !(1..=MAX_AGE_HISTOGRAM_BINS).contains(&self.age_histogram_bins) {
            return Err(ConfigValidationError::InvalidHistogramBins(
                self.age_histogram_bins,
            ));
        }

        if self.date_formats.is_empty() {
            return Err(ConfigValidationError::NoDateFormats);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid trend range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error(
        "Invalid histogram bins: {0} (must be between 1 and {max})",
        max = MAX_AGE_HISTOGRAM_BINS
    )]
    InvalidHistogramBins(usize),

    #[error("At least one date format is required")]
    NoDateFormats,
}

impl From<ConfigValidationError> for crate::error::AnalysisError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::AnalysisError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    trend_start: Option<NaiveDate>,
    trend_end: Option<NaiveDate>,
    age_histogram_bins: Option<usize>,
    date_formats: Option<Vec<String>>,
}

impl AnalysisConfigBuilder {
    /// Set the inclusive date range of the monthly trend.
    pub fn trend_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.trend_start = Some(start);
        self.trend_end = Some(end);
        self
    }

    /// Set the number of bins for the age histogram.
    pub fn age_histogram_bins(mut self, bins: usize) -> Self {
        self.age_histogram_bins = Some(bins);
        self
    }

    /// Replace the list of accepted text date formats.
    pub fn date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let config = AnalysisConfig {
            trend_start: self.trend_start.unwrap_or_else(default_trend_start),
            trend_end: self.trend_end.unwrap_or_else(default_trend_end),
            age_histogram_bins: self
                .age_histogram_bins
                .unwrap_or(DEFAULT_AGE_HISTOGRAM_BINS),
            date_formats: self.date_formats.unwrap_or_else(default_date_formats),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.trend_start, date(2023, 1, 1));
        assert_eq!(config.trend_end, date(2023, 12, 31));
        assert_eq!(config.age_histogram_bins, 20);
        assert_eq!(config.date_formats.len(), DEFAULT_DATE_FORMATS.len());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalysisConfig::builder()
            .trend_range(date(2022, 3, 1), date(2022, 5, 31))
            .age_histogram_bins(8)
            .date_formats(["%d.%m.%Y"])
            .build()
            .unwrap();

        assert_eq!(config.trend_start, date(2022, 3, 1));
        assert_eq!(config.trend_end, date(2022, 5, 31));
        assert_eq!(config.age_histogram_bins, 8);
        assert_eq!(config.date_formats, vec!["%d.%m.%Y".to_string()]);
    }

    #[test]
    fn test_validation_inverted_range() {
        let result = AnalysisConfig::builder()
            .trend_range(date(2023, 6, 1), date(2023, 1, 1))
            .build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidDateRange { .. }
        ));
    }

    #[test]
    fn test_validation_zero_bins() {
        let result = AnalysisConfig::builder().age_histogram_bins(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidHistogramBins(0)
        ));
    }

    #[test]
    fn test_validation_rejects_oversized_bins() {
        let result = AnalysisConfig::builder()
            .age_histogram_bins(MAX_AGE_HISTOGRAM_BINS + 1)
            .build();
        match result {
            Err(ConfigValidationError::InvalidHistogramBins(n)) => {
                assert_eq!(n, MAX_AGE_HISTOGRAM_BINS + 1)
            }
            other => panic!("expected InvalidHistogramBins, got {other:?}"),
        }

        let cli_max = AnalysisConfig::builder().age_histogram_bins(usize::MAX).build();
        assert!(cli_max.is_err());

        let at_cap = AnalysisConfig::builder()
            .age_histogram_bins(MAX_AGE_HISTOGRAM_BINS)
            .build();
        assert!(at_cap.is_ok());
    }

    #[test]
    fn test_validation_no_formats() {
        let result = AnalysisConfig::builder()
            .date_formats(Vec::<String>::new())
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::NoDateFormats
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "trend_start": "2021-01-01",
            "trend_end": "2021-03-31",
            "age_histogram_bins": 5,
            "date_formats": ["%Y-%m-%d"]
        }"#;

        let config: AnalysisConfig = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(config.trend_start, date(2021, 1, 1));
        assert_eq!(config.trend_end, date(2021, 3, 31));
        assert_eq!(config.age_histogram_bins, 5);
        assert!(config.validate().is_ok());
    }
}
