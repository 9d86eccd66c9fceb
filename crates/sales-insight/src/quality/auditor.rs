use crate::config::MAX_AGE_HISTOGRAM_BINS;
use crate::error::{AnalysisError, Result};
use crate::types::{CategoricalColumn, NumericColumn, SalesColumn, SalesTable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Mean, median and mode for every numeric column.
///
/// An all-missing column has `None` for mean and median and an empty mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub mean: BTreeMap<NumericColumn, Option<f64>>,
    pub median: BTreeMap<NumericColumn, Option<f64>>,
    /// Every most-frequent value, ascending.
    pub mode: BTreeMap<NumericColumn, Vec<f64>>,
}

/// One equal-width histogram bin. `upper` is exclusive except for the last bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

pub struct QualityAuditor;

impl QualityAuditor {
    /// Count missing values for every input column.
    pub fn count_missing(table: &SalesTable) -> BTreeMap<SalesColumn, usize> {
        let mut counts: BTreeMap<SalesColumn, usize> =
            SalesColumn::ALL.iter().map(|c| (*c, 0)).collect();

        for record in table {
            for column in SalesColumn::ALL {
                if column.is_missing(record)
                    && let Some(count) = counts.get_mut(&column)
                {
                    *count += 1;
                }
            }
        }

        debug!("Missing value counts: {:?}", counts);
        counts
    }

    /// Compute mean, median and mode over each numeric column.
    pub fn summary_statistics(table: &SalesTable) -> SummaryStatistics {
        let mut stats = SummaryStatistics {
            mean: BTreeMap::new(),
            median: BTreeMap::new(),
            mode: BTreeMap::new(),
        };

        for column in NumericColumn::ALL {
            let values: Vec<f64> = table.iter().filter_map(|r| column.value(r)).collect();
            stats.mean.insert(column, mean(&values));
            stats.median.insert(column, median(&values));
            stats.mode.insert(column, modes(&values));
        }

        stats
    }

    /// Distinct non-missing values for each named categorical column.
    pub fn unique_counts(
        table: &SalesTable,
        columns: &[CategoricalColumn],
    ) -> BTreeMap<CategoricalColumn, usize> {
        columns
            .iter()
            .map(|column| {
                let distinct: HashSet<&str> =
                    table.iter().filter_map(|r| column.value(r)).collect();
                (*column, distinct.len())
            })
            .collect()
    }

    /// Distinct counts over the product hierarchy columns.
    pub fn unique_counts_default(table: &SalesTable) -> BTreeMap<CategoricalColumn, usize> {
        Self::unique_counts(table, &CategoricalColumn::PRODUCT_HIERARCHY)
    }

    /// Occurrences per distinct label, most frequent first.
    ///
    /// Equal counts are ordered by label so the output is deterministic.
    pub fn value_counts(table: &SalesTable, column: CategoricalColumn) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for label in table.iter().filter_map(|r| column.value(r)) {
            *counts.entry(label).or_insert(0) += 1;
        }

        let mut sorted: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(label, count)| (label.to_string(), count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sorted
    }

    /// Equal-width histogram of customer ages.
    ///
    /// Bins span the observed age range; a constant age is widened to
    /// `[age - 0.5, age + 0.5]`. No ages yields no bins.
    pub fn age_histogram(table: &SalesTable, bins: usize) -> Result<Vec<HistogramBin>> {
        if !(1..=MAX_AGE_HISTOGRAM_BINS).contains(&bins) {
            return Err(AnalysisError::InvalidConfig(format!(
                "histogram needs between 1 and {} bins, got {}",
                MAX_AGE_HISTOGRAM_BINS, bins
            )));
        }

        let ages: Vec<f64> = table.iter().filter_map(|r| r.customer_age).collect();
        let Some(mut lo) = ages.iter().copied().reduce(f64::min) else {
            return Ok(Vec::new());
        };
        let mut hi = ages.iter().copied().fold(lo, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut histogram: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: lo + width * i as f64,
                upper: if i + 1 == bins {
                    hi
                } else {
                    lo + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for age in ages {
            let idx = (((age - lo) / width) as usize).min(bins - 1);
            histogram[idx].count += 1;
        }

        Ok(histogram)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

fn modes(values: &[f64]) -> Vec<f64> {
    // -0.0 and 0.0 count as the same value.
    let mut counts: HashMap<u64, (f64, usize)> = HashMap::new();
    for &v in values {
        let v = if v == 0.0 { 0.0 } else { v };
        counts.entry(v.to_bits()).or_insert((v, 0)).1 += 1;
    }

    let Some(best) = counts.values().map(|(_, c)| *c).max() else {
        return Vec::new();
    };
    let mut tied: Vec<f64> = counts
        .into_values()
        .filter(|(_, c)| *c == best)
        .map(|(v, _)| v)
        .collect();
    tied.sort_by(f64::total_cmp);
    tied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SalesRecord;
    use pretty_assertions::assert_eq;

    fn table() -> SalesTable {
        SalesTable::from_records(vec![
            SalesRecord::new("Bikes", "Mountain", "Mountain-200")
                .with_age(20.0)
                .with_gender("M")
                .with_revenue(100.0)
                .with_profit(20.0),
            SalesRecord::new("Bikes", "Road", "Road-650")
                .with_age(40.0)
                .with_gender("F")
                .with_revenue(50.0)
                .with_profit(-10.0),
            SalesRecord {
                customer_gender: Some("F".to_string()),
                revenue: Some(50.0),
                ..SalesRecord::new("Accessories", "Helmets", "Sport-100")
            },
        ])
    }

    // ==================== count_missing tests ====================

    #[test]
    fn test_count_missing_per_column() {
        let counts = QualityAuditor::count_missing(&table());
        assert_eq!(counts[&SalesColumn::CustomerAge], 1);
        assert_eq!(counts[&SalesColumn::Profit], 1);
        assert_eq!(counts[&SalesColumn::Revenue], 0);
        assert_eq!(counts[&SalesColumn::Date], 3);
        assert_eq!(counts[&SalesColumn::Product], 0);
        assert_eq!(counts.len(), SalesColumn::ALL.len());
    }

    #[test]
    fn test_count_missing_empty_table() {
        let counts = QualityAuditor::count_missing(&SalesTable::default());
        assert!(counts.values().all(|&c| c == 0));
        assert_eq!(counts.len(), 8);
    }

    // ==================== summary_statistics tests ====================

    #[test]
    fn test_summary_statistics() {
        let stats = QualityAuditor::summary_statistics(&table());

        assert_eq!(stats.mean[&NumericColumn::Revenue], Some(200.0 / 3.0));
        assert_eq!(stats.median[&NumericColumn::Revenue], Some(50.0));
        assert_eq!(stats.mode[&NumericColumn::Revenue], vec![50.0]);

        assert_eq!(stats.mean[&NumericColumn::Profit], Some(5.0));
        assert_eq!(stats.median[&NumericColumn::Profit], Some(5.0));
        // Every profit occurs once, so all of them tie.
        assert_eq!(stats.mode[&NumericColumn::Profit], vec![-10.0, 20.0]);

        assert_eq!(stats.median[&NumericColumn::CustomerAge], Some(30.0));
    }

    #[test]
    fn test_summary_statistics_undefined_for_empty() {
        let stats = QualityAuditor::summary_statistics(&SalesTable::default());
        for column in NumericColumn::ALL {
            assert_eq!(stats.mean[&column], None);
            assert_eq!(stats.median[&column], None);
            assert!(stats.mode[&column].is_empty());
        }
    }

    #[test]
    fn test_mode_multiple_ties() {
        assert_eq!(modes(&[3.0, 1.0, 3.0, 1.0, 2.0]), vec![1.0, 3.0]);
        assert_eq!(modes(&[0.0, -0.0, 5.0]), vec![0.0]);
    }

    // ==================== unique / value counts tests ====================

    #[test]
    fn test_unique_counts_default() {
        let counts = QualityAuditor::unique_counts_default(&table());
        assert_eq!(counts[&CategoricalColumn::ProductCategory], 2);
        assert_eq!(counts[&CategoricalColumn::SubCategory], 3);
        assert_eq!(counts[&CategoricalColumn::Product], 3);
        assert!(!counts.contains_key(&CategoricalColumn::CustomerGender));
    }

    #[test]
    fn test_value_counts_orders_by_frequency() {
        let counts = QualityAuditor::value_counts(&table(), CategoricalColumn::CustomerGender);
        assert_eq!(counts, vec![("F".to_string(), 2), ("M".to_string(), 1)]);
    }

    // ==================== age_histogram tests ====================

    #[test]
    fn test_age_histogram_bins() {
        let hist = QualityAuditor::age_histogram(&table(), 4).unwrap();
        assert_eq!(hist.len(), 4);
        assert_eq!(hist[0].lower, 20.0);
        assert_eq!(hist[3].upper, 40.0);
        assert_eq!(hist[0].count, 1);
        // The maximum lands in the closed final bin.
        assert_eq!(hist[3].count, 1);
        assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn test_age_histogram_constant_age() {
        let table = SalesTable::from_records(vec![
            SalesRecord::default().with_age(30.0),
            SalesRecord::default().with_age(30.0),
        ]);
        let hist = QualityAuditor::age_histogram(&table, 2).unwrap();
        assert_eq!(hist[0].lower, 29.5);
        assert_eq!(hist[1].upper, 30.5);
        assert_eq!(hist[1].count, 2);
    }

    #[test]
    fn test_age_histogram_edge_cases() {
        assert!(QualityAuditor::age_histogram(&table(), 0).is_err());
        let huge = QualityAuditor::age_histogram(&table(), usize::MAX).unwrap_err();
        assert_eq!(huge.error_code(), "INVALID_CONFIG");
        let empty = QualityAuditor::age_histogram(&SalesTable::default(), 5).unwrap();
        assert!(empty.is_empty());
    }
}
