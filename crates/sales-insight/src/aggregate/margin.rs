//! Profit-margin derivation and the derived-column side table.

use super::buckets::{AgeGroup, bucket_age};
use super::grouping::{GroupTotals, mean_by_group, product_key, sum_by_group};
use crate::types::{NumericColumn, SalesRecord, SalesTable};
use serde::{Deserialize, Serialize};

/// `Profit / Revenue * 100`, undefined when revenue is zero, either side is
/// missing, or the quotient overflows (subnormal revenue).
pub fn profit_margin(record: &SalesRecord) -> Option<f64> {
    match (record.profit, record.revenue) {
        (Some(profit), Some(revenue)) if revenue != 0.0 => {
            Some(profit / revenue * 100.0).filter(|m| m.is_finite())
        }
        _ => None,
    }
}

/// Average margin per product over rows where the margin is defined.
pub fn mean_profit_margin_by_product(table: &SalesTable) -> GroupTotals<String> {
    mean_by_group(table, product_key, profit_margin)
}

/// One point of the margin-versus-profit chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMarginPoint {
    pub product: String,
    pub mean_margin: f64,
    pub total_profit: f64,
}

/// Mean margin joined with total profit, for products with a defined margin.
pub fn margin_with_profit_size(table: &SalesTable) -> Vec<ProductMarginPoint> {
    let margins = mean_profit_margin_by_product(table);
    let profits = sum_by_group(table, product_key, NumericColumn::Profit);

    margins
        .iter()
        .map(|(product, mean_margin)| ProductMarginPoint {
            product: product.clone(),
            mean_margin: *mean_margin,
            total_profit: profits.get(product).unwrap_or(0.0),
        })
        .collect()
}

/// Fields derived from one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub age_group: Option<AgeGroup>,
    pub profit_margin: Option<f64>,
}

impl DerivedRow {
    pub fn from_record(record: &SalesRecord) -> Self {
        Self {
            age_group: bucket_age(record.customer_age),
            profit_margin: profit_margin(record),
        }
    }
}

/// Derived columns kept beside the table, index-aligned with its records.
///
/// The table itself is never mutated; computing this twice gives the same rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedColumns {
    rows: Vec<DerivedRow>,
}

impl DerivedColumns {
    pub fn compute(table: &SalesTable) -> Self {
        Self {
            rows: table.iter().map(DerivedRow::from_record).collect(),
        }
    }

    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&DerivedRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that fall outside every age bucket.
    pub fn rows_without_age_group(&self) -> usize {
        self.rows.iter().filter(|r| r.age_group.is_none()).count()
    }

    /// Rows whose margin is undefined.
    pub fn rows_without_margin(&self) -> usize {
        self.rows.iter().filter(|r| r.profit_margin.is_none()).count()
    }
}
