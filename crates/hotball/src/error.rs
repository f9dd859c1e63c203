//! Error type covering the whole pipeline.

use hotball_data::DataError;
use hotball_output::{ChartError, ExportError};
use hotball_returns::ReturnsError;
use thiserror::Error;

/// Errors that can occur anywhere between loading inputs and writing output.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Loading or validating input data failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Return computation failed.
    #[error(transparent)]
    Returns(#[from] ReturnsError),

    /// Composing or drawing the chart failed.
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Exporting a table failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
