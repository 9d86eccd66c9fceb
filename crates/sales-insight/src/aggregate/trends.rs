//! Monthly resampling of numeric columns.

use super::buckets::YearMonth;
use crate::error::{AnalysisError, Result};
use crate::types::{NumericColumn, SalesTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-column sums for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month: YearMonth,
    pub totals: BTreeMap<NumericColumn, f64>,
}

impl MonthlyBucket {
    /// Sum for `column`, zero if the column was not requested.
    pub fn total(&self, column: NumericColumn) -> f64 {
        self.totals.get(&column).copied().unwrap_or(0.0)
    }
}

/// Sum `value_columns` per calendar month over rows dated within
/// `[start, end]`.
///
/// Every month touched by the range is emitted in ascending order, zero-filled
/// when no row falls in it. Rows with a missing date are ignored.
pub fn monthly_resample(
    table: &SalesTable,
    start: NaiveDate,
    end: NaiveDate,
    value_columns: &[NumericColumn],
) -> Result<Vec<MonthlyBucket>> {
    if start > end {
        return Err(AnalysisError::InvalidDateRange { start, end });
    }

    let first = YearMonth::from_date(start);
    let last = YearMonth::from_date(end);

    let zeroed: BTreeMap<NumericColumn, f64> = value_columns.iter().map(|c| (*c, 0.0)).collect();
    let mut buckets = Vec::new();
    let mut month = first;
    while month <= last {
        buckets.push(MonthlyBucket {
            month,
            totals: zeroed.clone(),
        });
        month = month.succ();
    }

    let mut matched = 0usize;
    for record in table {
        let Some(date) = record.date else {
            continue;
        };
        if date < start || date > end {
            continue;
        }
        matched += 1;

        let idx = YearMonth::from_date(date).months_since(&first) as usize;
        let bucket = &mut buckets[idx];
        for column in value_columns {
            if let Some(value) = column.value(record)
                && let Some(total) = bucket.totals.get_mut(column)
            {
                *total += value;
            }
        }
    }

    debug!(
        "Resampled {} rows into {} months ({} to {})",
        matched,
        buckets.len(),
        first,
        last
    );
    Ok(buckets)
}
