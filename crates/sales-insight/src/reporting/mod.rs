//! Report generation module.
//!
//! [`SalesAnalyzer`] runs the quality audit and every aggregate in one pass
//! and returns a [`SalesReport`], suitable for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use sales_insight::reporting::{SalesAnalyzer, write_report_to_file};
//! use sales_insight::{AnalysisConfig, SalesTable, load_csv};
//!
//! let config = AnalysisConfig::default();
//! let df = load_csv("data/sales.csv")?;
//! let table = SalesTable::from_dataframe_with(&df, &config)?;
//!
//! let report = SalesAnalyzer::new(config)?.analyze(&table)?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! write_report_to_file(&report, Path::new("output"), "sales")?;
//! ```

mod analyzer;

pub use analyzer::{SalesAnalyzer, SalesReport, write_report_to_file};
