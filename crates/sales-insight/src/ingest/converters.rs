//! Column coercion from raw polars series into typed vectors.
//!
//! Coercion never fails on a bad cell: the cell becomes `None`. Only
//! polars-level failures (a column that cannot even be viewed as text)
//! propagate as errors.

use crate::error::Result;
use crate::utils::{
    DtypeCategory, date_from_epoch_days, get_dtype_category, parse_date_string,
    parse_numeric_string,
};
use chrono::NaiveDate;
use polars::prelude::*;

/// Coerce a series to finite `f64` values.
pub(crate) fn coerce_numeric(series: &Series) -> Result<Vec<Option<f64>>> {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => {
            let float_series = series.cast(&DataType::Float64)?;
            Ok(float_series
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()))
                .collect())
        }
        DtypeCategory::String => {
            let str_series = series.cast(&DataType::String)?;
            Ok(str_series
                .str()?
                .into_iter()
                .map(|v| v.and_then(parse_numeric_string))
                .collect())
        }
        DtypeCategory::Datetime | DtypeCategory::Other => {
            // Booleans and all-null columns cast cleanly; anything else is missing.
            match series.cast(&DataType::Float64) {
                Ok(float_series) => Ok(float_series
                    .f64()?
                    .into_iter()
                    .map(|v| v.filter(|x| x.is_finite()))
                    .collect()),
                Err(_) => Ok(vec![None; series.len()]),
            }
        }
    }
}

/// Coerce a series to calendar dates.
pub(crate) fn coerce_date<S: AsRef<str>>(
    series: &Series,
    formats: &[S],
) -> Result<Vec<Option<NaiveDate>>> {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Datetime => {
            let days = series.cast(&DataType::Date)?.cast(&DataType::Int32)?;
            Ok(days
                .i32()?
                .into_iter()
                .map(|v| v.and_then(date_from_epoch_days))
                .collect())
        }
        _ => {
            let str_series = series.cast(&DataType::String)?;
            Ok(str_series
                .str()?
                .into_iter()
                .map(|v| v.and_then(|s| parse_date_string(s, formats)))
                .collect())
        }
    }
}

/// Coerce a series to trimmed, non-blank labels.
pub(crate) fn coerce_categorical(series: &Series) -> Result<Vec<Option<String>>> {
    let str_series = series.cast(&DataType::String)?;
    Ok(str_series
        .str()?
        .into_iter()
        .map(|v| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DATE_FORMATS;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_coerce_numeric_from_text() {
        let series = Series::new("Revenue".into(), &["100", "$1,250.50", "unknown", "", "abc"]);
        let values = coerce_numeric(&series).unwrap();
        assert_eq!(values, vec![Some(100.0), Some(1250.5), None, None, None]);
    }

    #[test]
    fn test_coerce_numeric_from_integers() {
        let series = Series::new("Customer_Age".into(), &[Some(19i64), None, Some(64)]);
        let values = coerce_numeric(&series).unwrap();
        assert_eq!(values, vec![Some(19.0), None, Some(64.0)]);
    }

    #[test]
    fn test_coerce_numeric_keeps_valid_zero() {
        let series = Series::new("Revenue".into(), &[0.0f64, -5.0]);
        let values = coerce_numeric(&series).unwrap();
        assert_eq!(values, vec![Some(0.0), Some(-5.0)]);
    }

    #[test]
    fn test_coerce_date_from_text() {
        let series = Series::new(
            "Date".into(),
            &[Some("2023-01-15"), Some("garbage"), None, Some("02/28/2023")],
        );
        let values = coerce_date(&series, &DEFAULT_DATE_FORMATS).unwrap();
        assert_eq!(
            values,
            vec![Some(date(2023, 1, 15)), None, None, Some(date(2023, 2, 28))]
        );
    }

    #[test]
    fn test_coerce_date_from_date_dtype() {
        let series = Series::new("Date".into(), &[19358i32, 19359])
            .cast(&DataType::Date)
            .unwrap();
        let values = coerce_date(&series, &DEFAULT_DATE_FORMATS).unwrap();
        assert_eq!(values, vec![Some(date(2023, 1, 1)), Some(date(2023, 1, 2))]);
    }

    #[test]
    fn test_coerce_categorical_trims_and_drops_blank() {
        let series = Series::new("Product".into(), &[Some(" Helmet "), Some("  "), None]);
        let values = coerce_categorical(&series).unwrap();
        assert_eq!(values, vec![Some("Helmet".to_string()), None, None]);
    }
}
