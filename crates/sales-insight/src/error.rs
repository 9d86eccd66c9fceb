//! Custom error types for the sales analysis core.
//!
//! Row-level problems (a value that fails coercion, a zero revenue) never
//! surface here; they are absorbed as missing values. This hierarchy covers the
//! schema- and configuration-level failures that stop a computation outright.
//!
//! Errors are serializable so a reporting layer can display them as
//! `{ code, message }` pairs.

use chrono::NaiveDate;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the analysis core.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A required input column is absent from the dataset.
    #[error("Required column '{0}' not found in dataset")]
    MissingColumn(String),

    /// A configuration value outside its allowed domain.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A date range whose start lies after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Reading input or writing a report failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Report (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Another error annotated with what was being attempted.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code, looking through any context layers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error comes from the shape of the input rather than
    /// from the environment (IO, parser failures).
    pub fn is_schema_error(&self) -> bool {
        match self {
            Self::MissingColumn(_) => true,
            Self::WithContext { source, .. } => source.is_schema_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}
