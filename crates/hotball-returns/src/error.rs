//! Error types for return computation.

use thiserror::Error;

/// Result type for return computation.
pub type Result<T> = std::result::Result<T, ReturnsError>;

/// Errors that can occur while computing returns.
#[derive(Debug, Error)]
pub enum ReturnsError {
    /// The price table has no rows, so there is no as-of date
    #[error("Price table is empty: cannot derive an as-of date")]
    EmptyPriceTable,

    /// A return column does not hold one value per asset
    #[error("{window} column has {actual} values for {expected} assets")]
    ColumnLength {
        /// Window name of the offending column.
        window: String,
        /// Number of assets in the table.
        expected: usize,
        /// Number of values in the column.
        actual: usize,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
