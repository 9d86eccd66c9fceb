//! Derived categorical buckets: customer age groups and calendar months.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed customer age buckets.
///
/// Boundaries are left-inclusive and right-exclusive; `Seniors` is unbounded
/// above. Variant order is bucket order, so `Ord` sorts youngest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "Youth (<25)")]
    Youth,
    #[serde(rename = "Young Adults (25-34)")]
    YoungAdults,
    #[serde(rename = "Adults (35-64)")]
    Adults,
    #[serde(rename = "Seniors (64+)")]
    Seniors,
}

impl AgeGroup {
    /// Every bucket, youngest first.
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Youth,
        AgeGroup::YoungAdults,
        AgeGroup::Adults,
        AgeGroup::Seniors,
    ];

    /// Bucket a valid age. Negative or non-finite ages have no bucket.
    pub fn from_age(age: f64) -> Option<Self> {
        if !age.is_finite() || age < 0.0 {
            return None;
        }
        Some(if age < 25.0 {
            Self::Youth
        } else if age < 35.0 {
            Self::YoungAdults
        } else if age < 64.0 {
            Self::Adults
        } else {
            Self::Seniors
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Youth => "Youth (<25)",
            Self::YoungAdults => "Young Adults (25-34)",
            Self::Adults => "Adults (35-64)",
            Self::Seniors => "Seniors (64+)",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket a possibly-missing age.
pub fn bucket_age(age: Option<f64>) -> Option<AgeGroup> {
    age.and_then(AgeGroup::from_age)
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month after this one.
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Months elapsed from `origin` to `self` (negative if `self` is earlier).
    pub(crate) fn months_since(&self, origin: &YearMonth) -> i64 {
        (i64::from(self.year) - i64::from(origin.year)) * 12
            + (i64::from(self.month) - i64::from(origin.month))
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Chart axis label such as `Jan-2023`.
    pub fn label(&self) -> String {
        match self.first_day() {
            Some(day) => day.format("%b-%Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_group_boundaries() {
        assert_eq!(AgeGroup::from_age(0.0), Some(AgeGroup::Youth));
        assert_eq!(AgeGroup::from_age(24.9), Some(AgeGroup::Youth));
        assert_eq!(AgeGroup::from_age(25.0), Some(AgeGroup::YoungAdults));
        assert_eq!(AgeGroup::from_age(34.0), Some(AgeGroup::YoungAdults));
        assert_eq!(AgeGroup::from_age(35.0), Some(AgeGroup::Adults));
        assert_eq!(AgeGroup::from_age(63.9), Some(AgeGroup::Adults));
        assert_eq!(AgeGroup::from_age(64.0), Some(AgeGroup::Seniors));
        assert_eq!(AgeGroup::from_age(120.0), Some(AgeGroup::Seniors));
    }

    #[test]
    fn test_bucket_age_missing_and_invalid() {
        assert_eq!(bucket_age(None), None);
        assert_eq!(bucket_age(Some(-1.0)), None);
        assert_eq!(bucket_age(Some(f64::NAN)), None);
        assert_eq!(bucket_age(Some(30.0)), Some(AgeGroup::YoungAdults));
    }

    #[test]
    fn test_age_group_order_and_labels() {
        let mut groups = vec![AgeGroup::Seniors, AgeGroup::Youth, AgeGroup::Adults];
        groups.sort();
        assert_eq!(groups, vec![AgeGroup::Youth, AgeGroup::Adults, AgeGroup::Seniors]);
        assert_eq!(
            serde_json::to_string(&AgeGroup::YoungAdults).unwrap(),
            "\"Young Adults (25-34)\""
        );
    }

    #[test]
    fn test_year_month_succ_wraps_year() {
        let dec = YearMonth { year: 2022, month: 12 };
        assert_eq!(dec.succ(), YearMonth { year: 2023, month: 1 });
        assert_eq!(dec.succ().months_since(&dec), 1);
        assert_eq!(dec.months_since(&dec.succ()), -1);
    }

    #[test]
    fn test_year_month_label() {
        let date = NaiveDate::from_ymd_opt(2023, 3, 17).unwrap();
        let month = YearMonth::from_date(date);
        assert_eq!(month.label(), "Mar-2023");
        assert_eq!(month.to_string(), "2023-03");
    }
}
