//! Figure model for the monitor.
//!
//! A [`Figure`] is a plain value: a titled grid of bar panels plus a legend.
//! It is assembled step by step through [`FigureBuilder`] and handed to the
//! renderer, so composition can be tested without touching a drawing backend.

use crate::averages::{SectorAverages, asset_sectors};
use crate::error::ChartError;
use crate::palette::{Rgb, SectorPalette};
use hotball_data::SectorMapping;
use hotball_returns::ReturnTable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Y-axis label shared by every panel.
pub const Y_LABEL: &str = "Total Return (%)";

/// Title of the monitor figure.
pub const FIGURE_TITLE: &str = "Hot Ball of Money Monitor";

/// Rows and columns of the subplot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl GridShape {
    /// Create a grid shape.
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Whether `cell` lies inside the grid.
    pub const fn contains(&self, cell: GridCell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Row-major position of `cell`.
    pub const fn index(&self, cell: GridCell) -> usize {
        cell.row * self.cols + cell.col
    }
}

/// Position of a panel in the grid, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    /// Row
    pub row: usize,
    /// Column
    pub col: usize,
}

impl GridCell {
    /// Create a cell.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A single bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Category label; `\n` separates lines.
    pub label: String,
    /// Bar height in percent; `None` draws nothing.
    pub value: Option<f64>,
    /// Fill color.
    pub color: Rgb,
}

/// Orientation of category labels under a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelOrientation {
    /// Rotated a quarter turn, one per bar
    Vertical,
    /// Upright, possibly multi-line
    Horizontal,
}

/// One bar chart in the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Grid position.
    pub cell: GridCell,
    /// Panel title.
    pub title: String,
    /// Y-axis label.
    pub y_label: String,
    /// Label orientation.
    pub labels: LabelOrientation,
    /// Bars, left to right.
    pub bars: Vec<Bar>,
}

/// A legend swatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Text next to the swatch.
    pub label: String,
    /// Swatch color.
    pub color: Rgb,
}

/// A complete figure, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Figure title.
    pub title: String,
    /// Grid shape.
    pub grid: GridShape,
    /// Panels, in insertion order.
    pub panels: Vec<Panel>,
    /// Legend entries drawn below the grid.
    pub legend: Vec<LegendEntry>,
}

impl Figure {
    /// Panel at a cell.
    pub fn panel(&self, cell: GridCell) -> Option<&Panel> {
        self.panels.iter().find(|p| p.cell == cell)
    }
}

/// Builder for [`Figure`].
#[derive(Debug)]
pub struct FigureBuilder {
    title: String,
    grid: GridShape,
    panels: Vec<Panel>,
    legend: Vec<LegendEntry>,
}

impl FigureBuilder {
    /// Start a figure with a title and a 1x1 grid.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            grid: GridShape::new(1, 1),
            panels: Vec::new(),
            legend: Vec::new(),
        }
    }

    /// Set the grid shape.
    pub const fn grid(mut self, rows: usize, cols: usize) -> Self {
        self.grid = GridShape::new(rows, cols);
        self
    }

    /// Add a panel.
    pub fn panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }

    /// Add a legend entry.
    pub fn legend_entry(mut self, label: impl Into<String>, color: Rgb) -> Self {
        self.legend.push(LegendEntry {
            label: label.into(),
            color,
        });
        self
    }

    /// Build the figure.
    ///
    /// # Errors
    ///
    /// Returns an error if a panel lies outside the grid or two panels share a
    /// cell.
    pub fn build(self) -> Result<Figure, ChartError> {
        let mut used = HashSet::new();
        for panel in &self.panels {
            let GridCell { row, col } = panel.cell;
            if !self.grid.contains(panel.cell) {
                return Err(ChartError::CellOutOfBounds {
                    row,
                    col,
                    rows: self.grid.rows,
                    cols: self.grid.cols,
                });
            }
            if !used.insert(panel.cell) {
                return Err(ChartError::CellOccupied { row, col });
            }
        }

        Ok(Figure {
            title: self.title,
            grid: self.grid,
            panels: self.panels,
            legend: self.legend,
        })
    }
}

/// Compose the monitor figure.
///
/// Row 0 holds one per-asset panel per window, colored by sector. Row 1 holds
/// the matching sector-average panels, colored by [`SectorAverages::bar_colors`].
/// The legend lists every sector of `mapping`.
///
/// # Errors
///
/// Returns [`ChartError::UnmappedAsset`] if an asset has no sector and
/// [`ChartError::NoWindows`] if the table has no columns.
pub fn compose(returns: &ReturnTable, mapping: &SectorMapping) -> Result<Figure, ChartError> {
    compose_titled(returns, mapping, FIGURE_TITLE)
}

pub(crate) fn compose_titled(
    returns: &ReturnTable,
    mapping: &SectorMapping,
    title: &str,
) -> Result<Figure, ChartError> {
    if returns.columns().is_empty() {
        return Err(ChartError::NoWindows);
    }

    let palette = SectorPalette::from_mapping(mapping);
    let sectors = asset_sectors(returns, mapping)?;
    let asset_colors: Vec<Rgb> = sectors
        .iter()
        .map(|s| palette.color(s).unwrap_or(Rgb::BLACK))
        .collect();

    let mut builder = FigureBuilder::new(title).grid(2, returns.columns().len());

    for (col, column) in returns.columns().iter().enumerate() {
        let bars = returns
            .assets()
            .iter()
            .zip(&column.values)
            .zip(&asset_colors)
            .map(|((asset, value), color)| Bar {
                label: asset.clone(),
                value: *value,
                color: *color,
            })
            .collect();

        builder = builder.panel(Panel {
            cell: GridCell::new(0, col),
            title: column.label(),
            y_label: Y_LABEL.to_string(),
            labels: LabelOrientation::Vertical,
            bars,
        });
    }

    let averages = SectorAverages::compute(returns, mapping)?;
    let labels = averages.labels();
    for (col, column) in averages.columns().iter().enumerate() {
        let colors = averages.bar_colors(column.window);
        debug!(
            window = column.window.name(),
            best = averages.best(column.window).unwrap_or("none"),
            "sector averages"
        );
        let bars = labels
            .iter()
            .zip(&column.values)
            .zip(colors)
            .map(|((label, value), color)| Bar {
                label: label.clone(),
                value: *value,
                color: color.rgb(),
            })
            .collect();

        builder = builder.panel(Panel {
            cell: GridCell::new(1, col),
            title: column.window.average_title(),
            y_label: Y_LABEL.to_string(),
            labels: LabelOrientation::Horizontal,
            bars,
        });
    }

    for (sector, color) in palette.iter() {
        builder = builder.legend_entry(sector, color);
    }

    builder.build()
}
