//! Ingest: turn a raw `DataFrame` into a fixed-schema [`SalesTable`].
//!
//! This module provides:
//! - Required-column checks that fail fast with the missing column's name
//! - Per-column coercion where bad cells become missing instead of erroring
//! - A CSV loader with fallback strategies for the CLI

mod converters;
mod loader;

pub use loader::load_csv;

use crate::config::{AnalysisConfig, DEFAULT_DATE_FORMATS};
use crate::error::{AnalysisError, Result, ResultExt};
use crate::types::{SalesColumn, SalesRecord, SalesTable};
use converters::{coerce_categorical, coerce_date, coerce_numeric};
use polars::prelude::*;
use tracing::{debug, info, warn};

impl SalesTable {
    /// Build a table from a `DataFrame` using the default date formats.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        Self::ingest(df, &DEFAULT_DATE_FORMATS)
    }

    /// Build a table from a `DataFrame` using the configured date formats.
    pub fn from_dataframe_with(df: &DataFrame, config: &AnalysisConfig) -> Result<Self> {
        Self::ingest(df, &config.date_formats)
    }

    fn ingest<S: AsRef<str>>(df: &DataFrame, date_formats: &[S]) -> Result<Self> {
        info!("Ingesting dataset with shape {:?}", df.shape());

        // Schema check comes first so nothing is coerced for an unusable frame.
        for column in SalesColumn::ALL {
            if df.column(column.name()).is_err() {
                return Err(AnalysisError::MissingColumn(column.name().to_string()));
            }
        }

        let ages = coerce_numeric(required(df, SalesColumn::CustomerAge)?)
            .context("Coercing Customer_Age")?;
        let genders = coerce_categorical(required(df, SalesColumn::CustomerGender)?)
            .context("Coercing Customer_Gender")?;
        let categories = coerce_categorical(required(df, SalesColumn::ProductCategory)?)
            .context("Coercing Product_Category")?;
        let sub_categories = coerce_categorical(required(df, SalesColumn::SubCategory)?)
            .context("Coercing Sub_Category")?;
        let products = coerce_categorical(required(df, SalesColumn::Product)?)
            .context("Coercing Product")?;
        let dates = coerce_date(required(df, SalesColumn::Date)?, date_formats)
            .context("Coercing Date")?;
        let revenues = coerce_numeric(required(df, SalesColumn::Revenue)?)
            .context("Coercing Revenue")?;
        let profits =
            coerce_numeric(required(df, SalesColumn::Profit)?).context("Coercing Profit")?;

        report_coercion(df, SalesColumn::CustomerAge, &ages);
        report_coercion(df, SalesColumn::Date, &dates);
        report_coercion(df, SalesColumn::Revenue, &revenues);
        report_coercion(df, SalesColumn::Profit, &profits);

        // Every coerced column has the frame's height.
        let mut genders = genders.into_iter();
        let mut categories = categories.into_iter();
        let mut sub_categories = sub_categories.into_iter();
        let mut products = products.into_iter();
        let mut dates = dates.into_iter();
        let mut revenues = revenues.into_iter();
        let mut profits = profits.into_iter();

        let records: Vec<SalesRecord> = ages
            .into_iter()
            .map(|customer_age| SalesRecord {
                customer_age,
                customer_gender: genders.next().flatten(),
                product_category: categories.next().flatten(),
                sub_category: sub_categories.next().flatten(),
                product: products.next().flatten(),
                date: dates.next().flatten(),
                revenue: revenues.next().flatten(),
                profit: profits.next().flatten(),
            })
            .collect();

        debug!("Ingested {} records", records.len());
        Ok(SalesTable::from_records(records))
    }
}

fn required(df: &DataFrame, column: SalesColumn) -> Result<&Series> {
    df.column(column.name())
        .map(|c| c.as_materialized_series())
        .map_err(|_| AnalysisError::MissingColumn(column.name().to_string()))
}

/// Log how many present cells were turned into missing values.
fn report_coercion<T>(df: &DataFrame, column: SalesColumn, coerced: &[Option<T>]) {
    let Ok(raw) = df.column(column.name()) else {
        return;
    };
    let present = raw.len() - raw.null_count();
    let kept = coerced.iter().filter(|v| v.is_some()).count();
    let failed = present.saturating_sub(kept);
    if failed > 0 {
        warn!(
            "{} value(s) in '{}' failed coercion and are treated as missing",
            failed, column
        );
    } else {
        debug!("All present values in '{}' coerced", column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_frame() -> DataFrame {
        df![
            "Customer_Age" => ["19", "unknown", "45"],
            "Customer_Gender" => ["M", "F", "F"],
            "Product_Category" => ["Bikes", "Accessories", "Bikes"],
            "Sub_Category" => ["Mountain", "Helmets", "Road"],
            "Product" => ["Mountain-200", "Sport-100", "Road-650"],
            "Date" => ["2023-01-05", "not-a-date", "2023-02-10"],
            "Revenue" => ["100", "40", "0"],
            "Profit" => ["20", "oops", "-5"],
        ]
        .unwrap()
    }

    #[test]
    fn test_from_dataframe_coerces_each_column_independently() {
        let table = SalesTable::from_dataframe(&sample_frame()).unwrap();
        assert_eq!(table.len(), 3);

        let second = &table.records()[1];
        assert_eq!(second.customer_age, None);
        assert_eq!(second.date, None);
        assert_eq!(second.revenue, Some(40.0));
        assert_eq!(second.profit, None);
        assert_eq!(second.product_category.as_deref(), Some("Accessories"));

        let third = &table.records()[2];
        assert_eq!(third.revenue, Some(0.0));
        assert_eq!(third.date, NaiveDate::from_ymd_opt(2023, 2, 10));
    }

    #[test]
    fn test_missing_column_fails_fast() {
        let df = sample_frame().drop("Sub_Category").unwrap();
        let err = SalesTable::from_dataframe(&df).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn(ref name) if name == "Sub_Category"));
    }

    #[test]
    fn test_numeric_dtypes_are_accepted() {
        let df = df![
            "Customer_Age" => [30i64, 70],
            "Customer_Gender" => ["M", "F"],
            "Product_Category" => ["Bikes", "Bikes"],
            "Sub_Category" => ["Road", "Road"],
            "Product" => ["Road-150", "Road-150"],
            "Date" => ["2023-03-01", "2023-03-02"],
            "Revenue" => [120.5f64, 80.0],
            "Profit" => [30i64, 10],
        ]
        .unwrap();

        let table = SalesTable::from_dataframe(&df).unwrap();
        assert_eq!(table.records()[1].customer_age, Some(70.0));
        assert_eq!(table.records()[0].revenue, Some(120.5));
        assert_eq!(table.records()[1].profit, Some(10.0));
    }

    #[test]
    fn test_configured_date_formats() {
        let mut df = sample_frame();
        df.with_column(Series::new("Date".into(), &["05.01.2023", "x", "10.02.2023"]))
            .unwrap();
        let config = AnalysisConfig::builder()
            .date_formats(["%d.%m.%Y"])
            .build()
            .unwrap();

        let table = SalesTable::from_dataframe_with(&df, &config).unwrap();
        assert_eq!(table.records()[0].date, NaiveDate::from_ymd_opt(2023, 1, 5));
        assert_eq!(table.records()[1].date, None);
    }
}
