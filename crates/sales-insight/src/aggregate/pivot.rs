//! Category × sub-category pivot.

use crate::types::{NumericColumn, SalesTable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Two-dimensional sums keyed by `Product_Category` then `Sub_Category`.
///
/// Every observed category has a cell for every observed sub-category;
/// combinations with no rows hold zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    pub value_column: NumericColumn,
    pub categories: Vec<String>,
    pub sub_categories: Vec<String>,
    pub cells: BTreeMap<String, BTreeMap<String, f64>>,
}

impl PivotTable {
    /// Cell value, `None` only for a category or sub-category never observed.
    pub fn get(&self, category: &str, sub_category: &str) -> Option<f64> {
        self.cells.get(category)?.get(sub_category).copied()
    }

    /// Sum across all sub-categories of one category.
    pub fn row_total(&self, category: &str) -> Option<f64> {
        self.cells.get(category).map(|row| row.values().sum())
    }

    /// Sum across all categories of one sub-category.
    pub fn column_total(&self, sub_category: &str) -> f64 {
        self.cells
            .values()
            .filter_map(|row| row.get(sub_category))
            .sum()
    }
}

/// Sum `value_column` over the full observed cross product of categories and
/// sub-categories.
///
/// Rows missing either level are not part of any pair and are skipped, so a
/// row total equals the category's `sum_by_group` total over rows that have
/// both keys.
pub fn pivot_category_subcategory(table: &SalesTable, value_column: NumericColumn) -> PivotTable {
    let mut categories = BTreeSet::new();
    let mut sub_categories = BTreeSet::new();
    for record in table {
        if let (Some(category), Some(sub)) = (&record.product_category, &record.sub_category) {
            categories.insert(category.clone());
            sub_categories.insert(sub.clone());
        }
    }

    let mut cells: BTreeMap<String, BTreeMap<String, f64>> = categories
        .iter()
        .map(|category| {
            let row = sub_categories.iter().map(|sub| (sub.clone(), 0.0)).collect();
            (category.clone(), row)
        })
        .collect();

    for record in table {
        if let (Some(category), Some(sub), Some(value)) = (
            &record.product_category,
            &record.sub_category,
            value_column.value(record),
        ) && let Some(cell) = cells.get_mut(category).and_then(|row| row.get_mut(sub))
        {
            *cell += value;
        }
    }

    PivotTable {
        value_column,
        categories: categories.into_iter().collect(),
        sub_categories: sub_categories.into_iter().collect(),
        cells,
    }
}
