//! Fixed-schema sales records and column identifiers.
//!
//! Every field of [`SalesRecord`] is an `Option`: `None` is the explicit
//! *missing* sentinel (absent in the source or failed coercion) and is never
//! conflated with a valid zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight input columns a sales dataset must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SalesColumn {
    #[serde(rename = "Customer_Age")]
    CustomerAge,
    #[serde(rename = "Customer_Gender")]
    CustomerGender,
    #[serde(rename = "Product_Category")]
    ProductCategory,
    #[serde(rename = "Sub_Category")]
    SubCategory,
    #[serde(rename = "Product")]
    Product,
    #[serde(rename = "Date")]
    Date,
    #[serde(rename = "Revenue")]
    Revenue,
    #[serde(rename = "Profit")]
    Profit,
}

impl SalesColumn {
    /// All required columns, in source order.
    pub const ALL: [SalesColumn; 8] = [
        SalesColumn::CustomerAge,
        SalesColumn::CustomerGender,
        SalesColumn::ProductCategory,
        SalesColumn::SubCategory,
        SalesColumn::Product,
        SalesColumn::Date,
        SalesColumn::Revenue,
        SalesColumn::Profit,
    ];

    /// Exact column name in the input dataset.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CustomerAge => "Customer_Age",
            Self::CustomerGender => "Customer_Gender",
            Self::ProductCategory => "Product_Category",
            Self::SubCategory => "Sub_Category",
            Self::Product => "Product",
            Self::Date => "Date",
            Self::Revenue => "Revenue",
            Self::Profit => "Profit",
        }
    }

    /// Whether `record` has no usable value for this column.
    pub fn is_missing(&self, record: &SalesRecord) -> bool {
        match self {
            Self::CustomerAge => record.customer_age.is_none(),
            Self::CustomerGender => record.customer_gender.is_none(),
            Self::ProductCategory => record.product_category.is_none(),
            Self::SubCategory => record.sub_category.is_none(),
            Self::Product => record.product.is_none(),
            Self::Date => record.date.is_none(),
            Self::Revenue => record.revenue.is_none(),
            Self::Profit => record.profit.is_none(),
        }
    }
}

impl fmt::Display for SalesColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Columns holding numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    #[serde(rename = "Customer_Age")]
    CustomerAge,
    #[serde(rename = "Revenue")]
    Revenue,
    #[serde(rename = "Profit")]
    Profit,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 3] = [
        NumericColumn::CustomerAge,
        NumericColumn::Revenue,
        NumericColumn::Profit,
    ];

    pub fn column(&self) -> SalesColumn {
        match self {
            Self::CustomerAge => SalesColumn::CustomerAge,
            Self::Revenue => SalesColumn::Revenue,
            Self::Profit => SalesColumn::Profit,
        }
    }

    /// Read this column's value from a record.
    #[inline]
    pub fn value(&self, record: &SalesRecord) -> Option<f64> {
        match self {
            Self::CustomerAge => record.customer_age,
            Self::Revenue => record.revenue,
            Self::Profit => record.profit,
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column().name())
    }
}

/// Columns holding categorical labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoricalColumn {
    #[serde(rename = "Customer_Gender")]
    CustomerGender,
    #[serde(rename = "Product_Category")]
    ProductCategory,
    #[serde(rename = "Sub_Category")]
    SubCategory,
    #[serde(rename = "Product")]
    Product,
}

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 4] = [
        CategoricalColumn::CustomerGender,
        CategoricalColumn::ProductCategory,
        CategoricalColumn::SubCategory,
        CategoricalColumn::Product,
    ];

    /// The product hierarchy, outermost level first.
    pub const PRODUCT_HIERARCHY: [CategoricalColumn; 3] = [
        CategoricalColumn::ProductCategory,
        CategoricalColumn::SubCategory,
        CategoricalColumn::Product,
    ];

    pub fn column(&self) -> SalesColumn {
        match self {
            Self::CustomerGender => SalesColumn::CustomerGender,
            Self::ProductCategory => SalesColumn::ProductCategory,
            Self::SubCategory => SalesColumn::SubCategory,
            Self::Product => SalesColumn::Product,
        }
    }

    /// Read this column's label from a record.
    #[inline]
    pub fn value<'a>(&self, record: &'a SalesRecord) -> Option<&'a str> {
        match self {
            Self::CustomerGender => record.customer_gender.as_deref(),
            Self::ProductCategory => record.product_category.as_deref(),
            Self::SubCategory => record.sub_category.as_deref(),
            Self::Product => record.product.as_deref(),
        }
    }
}

impl fmt::Display for CategoricalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column().name())
    }
}

/// One sales row after coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub customer_age: Option<f64>,
    pub customer_gender: Option<String>,
    pub product_category: Option<String>,
    pub sub_category: Option<String>,
    pub product: Option<String>,
    pub date: Option<NaiveDate>,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
}

impl SalesRecord {
    /// Start a record with the product hierarchy filled in.
    pub fn new(
        category: impl Into<String>,
        sub_category: impl Into<String>,
        product: impl Into<String>,
    ) -> Self {
        Self {
            product_category: Some(category.into()),
            sub_category: Some(sub_category.into()),
            product: Some(product.into()),
            ..Self::default()
        }
    }

    pub fn with_age(mut self, age: f64) -> Self {
        self.customer_age = Some(age);
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.customer_gender = Some(gender.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = Some(revenue);
        self
    }

    pub fn with_profit(mut self, profit: f64) -> Self {
        self.profit = Some(profit);
        self
    }
}

/// An ordered, immutable sequence of [`SalesRecord`]s.
///
/// Built once by ingest; computations filter locally and never remove rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a SalesTable {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
