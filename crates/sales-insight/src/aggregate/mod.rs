//! Aggregation module.
//!
//! Turns a [`SalesTable`](crate::types::SalesTable) into grouped summaries:
//! - Group-by sums and means with min/max group lookup
//! - Fixed age buckets and calendar-month buckets
//! - Monthly resampling with zero-filled gaps
//! - Profit-margin derivation and per-product averages
//! - Category × sub-category pivots
//!
//! All functions are pure over a borrowed table.

mod buckets;
mod grouping;
mod margin;
mod pivot;
mod trends;

pub use buckets::{AgeGroup, YearMonth, bucket_age};
pub use grouping::{
    CategoryTotals, GroupTotals, MinMaxGroup, age_group_key, category_key, category_pair_key,
    category_rollup, mean_by_group, min_max_by_group, min_max_group, product_key,
    sub_category_key, sum_by_age_group, sum_by_group,
};
pub use margin::{
    DerivedColumns, DerivedRow, ProductMarginPoint, margin_with_profit_size,
    mean_profit_margin_by_product, profit_margin,
};
pub use pivot::{PivotTable, pivot_category_subcategory};
pub use trends::{MonthlyBucket, monthly_resample};
