//! Error types for data operations.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while building or loading input tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// A required column is absent from the input
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// The same date appears more than once in a price table
    #[error("Duplicate date in price table: {0}")]
    DuplicateDate(NaiveDate),

    /// The same asset appears more than once in a price table
    #[error("Duplicate asset column: {0}")]
    DuplicateAsset(String),

    /// A price column does not have one value per date
    #[error("Column {asset} has {actual} values, expected {expected}")]
    RaggedColumn {
        /// Asset identifier of the offending column
        asset: String,
        /// Number of dates in the table
        expected: usize,
        /// Number of values supplied for the column
        actual: usize,
    },
}
