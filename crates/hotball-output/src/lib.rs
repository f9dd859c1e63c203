#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hotball/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod averages;
pub mod error;
pub mod export;
pub mod figure;
pub mod palette;
pub mod render;
pub mod summary;

pub use averages::{AverageColumn, BarColor, SectorAverages, asset_sectors};
pub use error::ChartError;
pub use export::{ExportError, ExportFormat, Exporter};
pub use figure::{
    Bar, FIGURE_TITLE, Figure, FigureBuilder, GridCell, GridShape, LabelOrientation, LegendEntry,
    Panel, Y_LABEL, compose,
};
pub use palette::{Rgb, SectorPalette, spectral};
pub use render::{ChartConfig, OUTPUT_FILE, draw_figure, render, render_with_config};
pub use summary::AsciiTable;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
