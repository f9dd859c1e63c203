//! Error types for chart composition and rendering.

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Errors that can occur while building or drawing the monitor figure.
#[derive(Debug, Error)]
pub enum ChartError {
    /// An asset in the return table has no sector.
    #[error("Asset {0} is missing from the sector mapping")]
    UnmappedAsset(String),

    /// The return table has no window columns to plot.
    #[error("Return table has no window columns")]
    NoWindows,

    /// A panel was placed outside the figure grid.
    #[error("Cell ({row}, {col}) is outside a {rows}x{cols} grid")]
    CellOutOfBounds {
        /// Panel row
        row: usize,
        /// Panel column
        col: usize,
        /// Grid rows
        rows: usize,
        /// Grid columns
        cols: usize,
    },

    /// Two panels were placed in the same cell.
    #[error("Cell ({row}, {col}) already holds a panel")]
    CellOccupied {
        /// Panel row
        row: usize,
        /// Panel column
        col: usize,
    },

    /// An average column does not hold one value per sector.
    #[error("{window} column has {actual} values for {expected} sectors")]
    ColumnLength {
        /// Window name of the offending column.
        window: String,
        /// Number of sectors.
        expected: usize,
        /// Number of values in the column.
        actual: usize,
    },

    /// Drawing backend error.
    #[error("Drawing error: {0}")]
    Drawing(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl<E> From<DrawingAreaErrorKind<E>> for ChartError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Drawing(err.to_string())
    }
}
