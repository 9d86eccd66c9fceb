use crate::aggregate::{
    AgeGroup, CategoryTotals, DerivedColumns, GroupTotals, MinMaxGroup, MonthlyBucket,
    PivotTable, ProductMarginPoint, category_key, category_rollup, margin_with_profit_size,
    mean_profit_margin_by_product, min_max_group, monthly_resample, pivot_category_subcategory,
    sum_by_age_group, sum_by_group,
};
use crate::config::AnalysisConfig;
use crate::error::{Result, ResultExt};
use crate::quality::{HistogramBin, QualityAuditor, SummaryStatistics};
use crate::types::{CategoricalColumn, NumericColumn, SalesColumn, SalesTable};
use chrono::{Local, NaiveDate};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

// ============================================================================
// Report Types
// ============================================================================

/// Every aggregate of one analysis run, ready for a rendering layer.
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Wall-clock time spent computing the aggregates
    pub duration_ms: u64,
    /// Number of rows in the analysed table
    pub row_count: usize,

    // Quality audit
    pub missing_values: BTreeMap<SalesColumn, usize>,
    pub summary_statistics: SummaryStatistics,
    pub unique_counts: BTreeMap<CategoricalColumn, usize>,
    /// Customer_Gender value counts, most frequent first
    pub gender_distribution: Vec<(String, usize)>,
    pub age_histogram: Vec<HistogramBin>,

    // Age buckets
    /// Total revenue per age group; every bucket is present
    pub revenue_by_age_group: GroupTotals<AgeGroup>,
    /// Rows left out of the age-group totals
    pub rows_without_age_group: usize,

    // Category rollups
    pub profit_by_category: GroupTotals<String>,
    pub category_totals: BTreeMap<String, CategoryTotals>,
    /// Most and least profitable categories; absent for an empty table
    pub profitable_categories: Option<MinMaxGroup<String>>,

    // Trends
    pub trend_start: NaiveDate,
    pub trend_end: NaiveDate,
    pub monthly_trend: Vec<MonthlyBucket>,

    // Margins
    pub mean_margin_by_product: GroupTotals<String>,
    pub margin_points: Vec<ProductMarginPoint>,
    /// Rows whose margin is undefined (zero or missing revenue, missing profit)
    pub rows_without_margin: usize,

    // Pivots
    pub revenue_pivot: PivotTable,
    pub profit_pivot: PivotTable,
}

// ============================================================================
// Analyzer
// ============================================================================

/// Runs every aggregate over a table with one configuration.
#[derive(Debug, Clone, Default)]
pub struct SalesAnalyzer {
    config: AnalysisConfig,
}

impl SalesAnalyzer {
    /// Create an analyzer, validating the configuration.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Ingest a `DataFrame` with the configured date formats, then analyse it.
    pub fn analyze_dataframe(&self, df: &DataFrame) -> Result<SalesReport> {
        let table = SalesTable::from_dataframe_with(df, &self.config).context("Ingest failed")?;
        self.analyze(&table)
    }

    /// Compute the full report.
    pub fn analyze(&self, table: &SalesTable) -> Result<SalesReport> {
        let start = Instant::now();
        info!("Analysing {} sales records", table.len());

        info!("Auditing data quality...");
        let missing_values = QualityAuditor::count_missing(table);
        let summary_statistics = QualityAuditor::summary_statistics(table);
        let unique_counts = QualityAuditor::unique_counts_default(table);
        let gender_distribution =
            QualityAuditor::value_counts(table, CategoricalColumn::CustomerGender);
        let age_histogram = QualityAuditor::age_histogram(table, self.config.age_histogram_bins)?;

        info!("Deriving age groups and margins...");
        let derived = DerivedColumns::compute(table);
        let rows_without_age_group = derived.rows_without_age_group();
        let rows_without_margin = derived.rows_without_margin();
        debug!(
            "{} rows without age group, {} rows without margin",
            rows_without_age_group, rows_without_margin
        );

        info!("Aggregating by age group and category...");
        let revenue_by_age_group = sum_by_age_group(table, NumericColumn::Revenue);
        let profit_by_category = sum_by_group(table, category_key, NumericColumn::Profit);
        let category_totals = category_rollup(table);
        let profitable_categories = min_max_group(&profit_by_category);
        if let Some(ref extremes) = profitable_categories {
            debug!(
                "Most profitable: {} ({:.2}), least profitable: {} ({:.2})",
                extremes.max.0, extremes.max.1, extremes.min.0, extremes.min.1
            );
        }

        info!(
            "Resampling monthly trend from {} to {}...",
            self.config.trend_start, self.config.trend_end
        );
        let monthly_trend = monthly_resample(
            table,
            self.config.trend_start,
            self.config.trend_end,
            &[NumericColumn::Revenue, NumericColumn::Profit],
        )?;

        info!("Computing profit margins and pivots...");
        let mean_margin_by_product = mean_profit_margin_by_product(table);
        let margin_points = margin_with_profit_size(table);
        let revenue_pivot = pivot_category_subcategory(table, NumericColumn::Revenue);
        let profit_pivot = pivot_category_subcategory(table, NumericColumn::Profit);

        let duration_ms = start.elapsed().as_millis() as u64;
        info!("Analysis complete in {}ms", duration_ms);

        Ok(SalesReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            duration_ms,
            row_count: table.len(),
            missing_values,
            summary_statistics,
            unique_counts,
            gender_distribution,
            age_histogram,
            revenue_by_age_group,
            rows_without_age_group,
            profit_by_category,
            category_totals,
            profitable_categories,
            trend_start: self.config.trend_start,
            trend_end: self.config.trend_end,
            monthly_trend,
            mean_margin_by_product,
            margin_points,
            rows_without_margin,
            revenue_pivot,
            profit_pivot,
        })
    }
}

/// Write a report as pretty JSON to `<output_dir>/<base_name>_report.json`.
pub fn write_report_to_file(
    report: &SalesReport,
    output_dir: &Path,
    base_name: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let report_path = output_dir.join(format!("{}_report.json", base_name));
    let mut file = File::create(&report_path)?;
    file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

    info!("Report saved: {}", report_path.display());

    Ok(report_path)
}
