//! Data quality audit module.
//!
//! This module provides the descriptive side of the analysis: missing-value
//! counts, summary statistics, distinct counts and distributions.

mod auditor;

pub use auditor::{HistogramBin, QualityAuditor, SummaryStatistics};
