//! Sales Insight Library
//!
//! Descriptive statistics and chart-ready aggregates for a tabular sales
//! dataset, built with Rust and Polars.
//!
//! # Overview
//!
//! The library takes a sales table with a fixed schema (`Customer_Age`,
//! `Customer_Gender`, `Product_Category`, `Sub_Category`, `Product`, `Date`,
//! `Revenue`, `Profit`) and produces:
//!
//! - **Quality audit**: missing counts, mean/median/mode, distinct counts,
//!   value counts and an age histogram
//! - **Aggregates**: sums by group, age-group totals, monthly trends,
//!   per-product profit margins and category × sub-category pivots
//! - **Derived columns**: age group and profit margin per row, kept beside
//!   the table instead of mutating it
//!
//! Missing values never abort a computation. Unparseable numbers and dates
//! become missing during ingest and are excluded from every aggregate.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sales_insight::{AnalysisConfig, SalesAnalyzer, SalesTable, load_csv};
//!
//! let config = AnalysisConfig::default();
//! let df = load_csv("data/sales.csv")?;
//! let table = SalesTable::from_dataframe_with(&df, &config)?;
//!
//! let report = SalesAnalyzer::new(config)?.analyze(&table)?;
//! for (group, revenue) in &report.revenue_by_age_group {
//!     println!("{group}: {revenue:.2}");
//! }
//! ```
//!
//! Individual aggregates are plain functions over a borrowed table:
//!
//! ```rust,ignore
//! use sales_insight::aggregate::{category_key, min_max_group, sum_by_group};
//! use sales_insight::types::NumericColumn;
//!
//! let profit = sum_by_group(&table, category_key, NumericColumn::Profit);
//! if let Some(extremes) = min_max_group(&profit) {
//!     println!("Most profitable: {}", extremes.max.0);
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod ingest;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use aggregate::{
    AgeGroup, CategoryTotals, DerivedColumns, DerivedRow, GroupTotals, MinMaxGroup, MonthlyBucket,
    PivotTable, ProductMarginPoint, YearMonth, bucket_age, monthly_resample,
    pivot_category_subcategory, profit_margin, sum_by_age_group, sum_by_group,
};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use ingest::load_csv;
pub use quality::{HistogramBin, QualityAuditor, SummaryStatistics};
pub use reporting::{SalesAnalyzer, SalesReport, write_report_to_file};
pub use types::{CategoricalColumn, NumericColumn, SalesColumn, SalesRecord, SalesTable};
pub use utils::{
    DtypeCategory, clean_numeric_string, get_dtype_category, is_error_marker, is_numeric_dtype,
    parse_date_string, parse_numeric_string,
};
