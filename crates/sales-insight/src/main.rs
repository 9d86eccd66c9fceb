//! CLI entry point for the sales analysis.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use clap::Parser;
use dotenv::dotenv;
use sales_insight::types::NumericColumn;
use sales_insight::{
    AnalysisConfig, SalesAnalyzer, SalesReport, SalesTable, load_csv, write_report_to_file,
};
use std::path::Path;
use tracing::info;

/// Sales data analysis: quality audit and chart-ready aggregates
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Descriptive analysis of tabular sales data",
    long_about = "Audits a sales CSV for missing values and distributions, then computes\n\
                  age-group, category, monthly, margin and pivot aggregates.\n\n\
                  EXAMPLES:\n  \
                  # Human-readable summary\n  \
                  sales-insight -i sales.csv\n\n  \
                  # Trend over a custom range, JSON to stdout\n  \
                  sales-insight -i sales.csv --start 2022-01-01 --end 2022-06-30 --json\n\n  \
                  # Save the full report next to other outputs\n  \
                  sales-insight -i sales.csv -r -o results/"
)]
struct Args {
    /// Path to the sales CSV file
    #[arg(short, long)]
    input: String,

    /// Output directory for the JSON report (used with --emit-report)
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// First day of the monthly trend (YYYY-MM-DD)
    #[arg(long, default_value = "2023-01-01")]
    start: NaiveDate,

    /// Last day of the monthly trend (YYYY-MM-DD)
    #[arg(long, default_value = "2023-12-31")]
    end: NaiveDate,

    /// Number of bins for the customer age histogram
    #[arg(long, default_value = "20")]
    age_bins: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = AnalysisConfig::builder()
        .trend_range(args.start, args.end)
        .age_histogram_bins(args.age_bins)
        .build()?;

    info!("Loading dataset from: {}", args.input);
    let data = load_csv(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let table = SalesTable::from_dataframe_with(&data, &config)?;
    let report = SalesAnalyzer::new(config)?.analyze(&table)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let input_stem = extract_file_stem(&args.input);
        let report_path = write_report_to_file(&report, Path::new(&args.output), &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report, &args.input);

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

/// Print a human-readable summary of the report.
///
/// Uses `println!` on purpose: this is the primary output, independent of
/// the log level.
fn print_human_readable_summary(report: &SalesReport, input: &str) {
    println!();
    println!("{}", "=".repeat(80));
    println!("SALES ANALYSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!();
    println!("Input: {} ({} rows)", input, report.row_count);
    println!("Duration: {}ms", report.duration_ms);
    println!();

    println!("Missing Values:");
    for (column, count) in &report.missing_values {
        println!("  {:<18} {}", column.name(), count);
    }
    println!();

    println!("Summary Statistics:");
    println!("  {:<14} {:>12} {:>12}  Mode", "Column", "Mean", "Median");
    for column in NumericColumn::ALL {
        let mean = report.summary_statistics.mean.get(&column).copied().flatten();
        let median = report.summary_statistics.median.get(&column).copied().flatten();
        let modes = report
            .summary_statistics
            .mode
            .get(&column)
            .map(|m| {
                m.iter()
                    .map(|v| format!("{}", v))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!(
            "  {:<14} {:>12} {:>12}  {}",
            column.column().name(),
            format_optional(mean),
            format_optional(median),
            modes
        );
    }
    println!();

    println!("Distinct Values:");
    for (column, count) in &report.unique_counts {
        println!("  {:<18} {}", column.column().name(), count);
    }
    println!();

    if !report.gender_distribution.is_empty() {
        println!("Customer Gender:");
        for (gender, count) in &report.gender_distribution {
            println!("  {:<18} {}", gender, count);
        }
        println!();
    }

    println!("Revenue by Age Group:");
    for (group, revenue) in &report.revenue_by_age_group {
        println!("  {:<22} {:>14.2}", group.label(), revenue);
    }
    if report.rows_without_age_group > 0 {
        println!("  ({} rows without a usable age)", report.rows_without_age_group);
    }
    println!();

    println!("Profit by Category:");
    for (category, profit) in &report.profit_by_category {
        println!("  {:<22} {:>14.2}", category, profit);
    }
    if let Some(ref extremes) = report.profitable_categories {
        println!("  Most profitable:  {} ({:.2})", extremes.max.0, extremes.max.1);
        println!("  Least profitable: {} ({:.2})", extremes.min.0, extremes.min.1);
    }
    println!();

    println!(
        "Monthly Trend ({} to {}):",
        report.trend_start, report.trend_end
    );
    println!("  {:<10} {:>14} {:>14}", "Month", "Revenue", "Profit");
    for bucket in &report.monthly_trend {
        println!(
            "  {:<10} {:>14.2} {:>14.2}",
            bucket.month.label(),
            bucket.total(NumericColumn::Revenue),
            bucket.total(NumericColumn::Profit)
        );
    }
    println!();

    if !report.margin_points.is_empty() {
        let mut points = report.margin_points.clone();
        points.sort_by(|a, b| b.total_profit.total_cmp(&a.total_profit));

        println!("Top Products by Profit:");
        for point in points.iter().take(10) {
            println!(
                "  {:<30} margin {:>8.2}%  profit {:>14.2}",
                point.product, point.mean_margin, point.total_profit
            );
        }
        if report.rows_without_margin > 0 {
            println!("  ({} rows without a defined margin)", report.rows_without_margin);
        }
        println!();
    }

    println!("{}", "=".repeat(80));
}
