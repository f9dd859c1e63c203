//! Per-sector average returns and the bar color policy.

use crate::error::ChartError;
use crate::palette::Rgb;
use hotball_data::SectorMapping;
use hotball_returns::{LookbackWindow, ReturnTable};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Sector of every asset in `returns`, in row order.
///
/// # Errors
///
/// Returns [`ChartError::UnmappedAsset`] for the first asset without a sector.
pub fn asset_sectors<'a>(
    returns: &ReturnTable,
    mapping: &'a SectorMapping,
) -> Result<Vec<&'a str>, ChartError> {
    returns
        .assets()
        .iter()
        .map(|asset| {
            mapping.sector(asset).ok_or_else(|| {
                warn!(asset = %asset, "asset has no sector");
                ChartError::UnmappedAsset(asset.clone())
            })
        })
        .collect()
}

/// How a sector-average bar is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarColor {
    /// Average above zero
    Positive,

    /// Average at or below zero, or undefined
    Negative,

    /// Highest average of the window
    Best,
}

impl BarColor {
    /// Fill color of the bar.
    pub const fn rgb(&self) -> Rgb {
        match self {
            Self::Positive => Rgb::GREEN,
            Self::Negative => Rgb::RED,
            Self::Best => Rgb::GOLD,
        }
    }
}

/// Sector averages for one window, aligned with [`SectorAverages::sectors`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageColumn {
    /// Window the averages cover.
    pub window: LookbackWindow,

    /// Mean return per sector, `None` when no asset in the sector has one.
    pub values: Vec<Option<f64>>,
}

/// Mean return per sector and window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorAverages {
    sectors: Vec<String>,
    columns: Vec<AverageColumn>,
}

#[derive(Deserialize)]
struct SectorAveragesParts {
    sectors: Vec<String>,
    columns: Vec<AverageColumn>,
}

impl<'de> Deserialize<'de> for SectorAverages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = SectorAveragesParts::deserialize(deserializer)?;
        Self::from_parts(parts.sectors, parts.columns).map_err(serde::de::Error::custom)
    }
}

impl SectorAverages {
    /// Group `returns` by sector and average each window, skipping missing
    /// values per window. Sectors appear in the order their first asset
    /// appears in `returns`.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::UnmappedAsset`] if an asset has no sector.
    pub fn compute(returns: &ReturnTable, mapping: &SectorMapping) -> Result<Self, ChartError> {
        let row_sectors = asset_sectors(returns, mapping)?;

        let mut sectors: Vec<String> = Vec::new();
        for sector in &row_sectors {
            if !sectors.iter().any(|s| s == sector) {
                sectors.push((*sector).to_string());
            }
        }

        let columns = returns
            .columns()
            .iter()
            .map(|column| {
                let values = sectors
                    .iter()
                    .map(|sector| {
                        let members: Vec<f64> = row_sectors
                            .iter()
                            .zip(&column.values)
                            .filter(|(s, _)| **s == sector.as_str())
                            .filter_map(|(_, v)| *v)
                            .collect();
                        mean(&members)
                    })
                    .collect();
                AverageColumn {
                    window: column.window,
                    values,
                }
            })
            .collect();

        Ok(Self { sectors, columns })
    }

    /// Build directly from sector names and per-window averages.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::ColumnLength`] if a column does not hold one
    /// value per sector.
    pub fn from_parts(
        sectors: Vec<String>,
        columns: Vec<AverageColumn>,
    ) -> Result<Self, ChartError> {
        if let Some(column) = columns.iter().find(|c| c.values.len() != sectors.len()) {
            return Err(ChartError::ColumnLength {
                window: column.window.name().to_string(),
                expected: sectors.len(),
                actual: column.values.len(),
            });
        }
        Ok(Self { sectors, columns })
    }

    /// Sector names (row index).
    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    /// Per-window columns.
    pub fn columns(&self) -> &[AverageColumn] {
        &self.columns
    }

    /// Column for a window.
    pub fn column(&self, window: LookbackWindow) -> Option<&AverageColumn> {
        self.columns.iter().find(|c| c.window == window)
    }

    /// Average of one sector over one window.
    pub fn get(&self, sector: &str, window: LookbackWindow) -> Option<f64> {
        let row = self.sectors.iter().position(|s| s == sector)?;
        self.column(window)
            .and_then(|c| c.values.get(row).copied().flatten())
    }

    /// Axis labels: sector names with spaces turned into line breaks.
    pub fn labels(&self) -> Vec<String> {
        self.sectors.iter().map(|s| s.replace(' ', "\n")).collect()
    }

    /// Best sector of a window: the highest defined average, ties going to the
    /// alphabetically first name.
    pub fn best(&self, window: LookbackWindow) -> Option<&str> {
        let column = self.column(window)?;
        self.sectors
            .iter()
            .zip(&column.values)
            .filter_map(|(sector, value)| value.map(|v| (sector.as_str(), v)))
            .reduce(|best, candidate| {
                if candidate.1 > best.1 || (candidate.1 == best.1 && candidate.0 < best.0) {
                    candidate
                } else {
                    best
                }
            })
            .map(|(sector, _)| sector)
    }

    /// Bar color of every sector for a window.
    pub fn bar_colors(&self, window: LookbackWindow) -> Vec<BarColor> {
        let Some(column) = self.column(window) else {
            return Vec::new();
        };
        let best = self.best(window);

        self.sectors
            .iter()
            .zip(&column.values)
            .map(|(sector, value)| {
                if best == Some(sector.as_str()) {
                    BarColor::Best
                } else if value.is_some_and(|v| v > 0.0) {
                    BarColor::Positive
                } else {
                    BarColor::Negative
                }
            })
            .collect()
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
