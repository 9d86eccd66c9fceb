//! Group-by reductions over a [`SalesTable`].
//!
//! A group exists once a row produces its key. Rows whose value is missing
//! still make their group appear (with nothing added); rows whose key is
//! missing are skipped. Fixed bucket sets are seeded up front so that empty
//! buckets report zero.

use super::buckets::{AgeGroup, bucket_age};
use crate::types::{NumericColumn, SalesRecord, SalesTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Reduced value per group key, iterated in ascending key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: Deserialize<'de> + Ord"
))]
pub struct GroupTotals<K> {
    totals: BTreeMap<K, f64>,
}

impl<K: Ord> Default for GroupTotals<K> {
    fn default() -> Self {
        Self {
            totals: BTreeMap::new(),
        }
    }
}

impl<K: Ord> GroupTotals<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with every key present at zero.
    pub fn seeded(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            totals: keys.into_iter().map(|k| (k, 0.0)).collect(),
        }
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.totals.get(key).copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, f64> {
        self.totals.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, K, f64> {
        self.totals.keys()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum of every group's value.
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }

    pub fn into_map(self) -> BTreeMap<K, f64> {
        self.totals
    }

    /// Add `value` (if any) to `key`, creating the group at zero when new.
    pub(crate) fn add(&mut self, key: K, value: Option<f64>) {
        let slot = self.totals.entry(key).or_insert(0.0);
        if let Some(v) = value {
            *slot += v;
        }
    }

    pub(crate) fn insert(&mut self, key: K, value: f64) {
        self.totals.insert(key, value);
    }
}

impl<'a, K> IntoIterator for &'a GroupTotals<K> {
    type Item = (&'a K, &'a f64);
    type IntoIter = btree_map::Iter<'a, K, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.totals.iter()
    }
}

/// The groups with the largest and smallest reduced value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxGroup<K> {
    pub max: (K, f64),
    pub min: (K, f64),
}

/// Revenue and profit totals for one product category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub revenue: f64,
    pub profit: f64,
}

// =============================================================================
// Key functions
// =============================================================================

pub fn category_key(record: &SalesRecord) -> Option<String> {
    record.product_category.clone()
}

pub fn sub_category_key(record: &SalesRecord) -> Option<String> {
    record.sub_category.clone()
}

pub fn product_key(record: &SalesRecord) -> Option<String> {
    record.product.clone()
}

/// `(Product_Category, Sub_Category)`; missing if either level is missing.
pub fn category_pair_key(record: &SalesRecord) -> Option<(String, String)> {
    Some((
        record.product_category.clone()?,
        record.sub_category.clone()?,
    ))
}

pub fn age_group_key(record: &SalesRecord) -> Option<AgeGroup> {
    bucket_age(record.customer_age)
}

// =============================================================================
// Reductions
// =============================================================================

/// Sum `value_column` per key produced by `key_fn`.
pub fn sum_by_group<K, F>(
    table: &SalesTable,
    key_fn: F,
    value_column: NumericColumn,
) -> GroupTotals<K>
where
    K: Ord,
    F: Fn(&SalesRecord) -> Option<K>,
{
    let mut totals = GroupTotals::new();
    accumulate(&mut totals, table, key_fn, |r| value_column.value(r));
    totals
}

/// Sum `value_column` per age group, reporting every bucket.
///
/// Rows whose age failed coercion have no bucket and are excluded.
pub fn sum_by_age_group(table: &SalesTable, value_column: NumericColumn) -> GroupTotals<AgeGroup> {
    let mut totals = GroupTotals::seeded(AgeGroup::ALL);
    accumulate(&mut totals, table, age_group_key, |r| value_column.value(r));
    totals
}

/// Mean of the defined values of `value_fn` per key.
///
/// Groups without a single defined value are omitted, not reported as zero.
pub fn mean_by_group<K, F, V>(table: &SalesTable, key_fn: F, value_fn: V) -> GroupTotals<K>
where
    K: Ord,
    F: Fn(&SalesRecord) -> Option<K>,
    V: Fn(&SalesRecord) -> Option<f64>,
{
    let mut sums: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for record in table {
        if let Some(key) = key_fn(record)
            && let Some(value) = value_fn(record)
        {
            let entry = sums.entry(key).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    let mut means = GroupTotals::new();
    for (key, (sum, count)) in sums {
        means.insert(key, sum / count as f64);
    }
    means
}

/// Find the max and min groups. Ties go to the first key in iteration order.
pub fn min_max_group<K: Ord + Clone>(totals: &GroupTotals<K>) -> Option<MinMaxGroup<K>> {
    let mut iter = totals.iter();
    let (first_key, first_value) = iter.next()?;
    let mut max = (first_key, *first_value);
    let mut min = (first_key, *first_value);

    for (key, value) in iter {
        if *value > max.1 {
            max = (key, *value);
        }
        if *value < min.1 {
            min = (key, *value);
        }
    }

    Some(MinMaxGroup {
        max: (max.0.clone(), max.1),
        min: (min.0.clone(), min.1),
    })
}

/// Group, sum, then pick the max and min groups.
pub fn min_max_by_group<K, F>(
    table: &SalesTable,
    key_fn: F,
    value_column: NumericColumn,
) -> Option<MinMaxGroup<K>>
where
    K: Ord + Clone,
    F: Fn(&SalesRecord) -> Option<K>,
{
    min_max_group(&sum_by_group(table, key_fn, value_column))
}

/// Revenue and profit per product category in one pass.
pub fn category_rollup(table: &SalesTable) -> BTreeMap<String, CategoryTotals> {
    let mut rollup: BTreeMap<String, CategoryTotals> = BTreeMap::new();
    for record in table {
        let Some(category) = record.product_category.as_ref() else {
            continue;
        };
        let totals = rollup.entry(category.clone()).or_default();
        if let Some(revenue) = record.revenue {
            totals.revenue += revenue;
        }
        if let Some(profit) = record.profit {
            totals.profit += profit;
        }
    }
    rollup
}

fn accumulate<K, F, V>(totals: &mut GroupTotals<K>, table: &SalesTable, key_fn: F, value_fn: V)
where
    K: Ord,
    F: Fn(&SalesRecord) -> Option<K>,
    V: Fn(&SalesRecord) -> Option<f64>,
{
    for record in table {
        if let Some(key) = key_fn(record) {
            totals.add(key, value_fn(record));
        }
    }
}
