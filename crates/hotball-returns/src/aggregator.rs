//! Multi-window return table.
//!
//! Anchors every [`LookbackWindow`] on the last date of a price table, runs
//! [`compute_return`] over each window and joins the results by asset.

use crate::calculator::{ReturnSeries, compute_return};
use crate::error::{Result, ReturnsError};
use crate::window::LookbackWindow;
use chrono::NaiveDate;
use hotball_data::PriceTable;
use polars::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Name of the asset column in [`ReturnTable::to_dataframe`].
pub const ASSET_COLUMN: &str = "asset";

/// Returns for one look-back window, aligned with [`ReturnTable::assets`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnColumn {
    /// Window this column covers.
    pub window: LookbackWindow,

    /// Requested window start (calendar subtraction from `end`).
    pub start: NaiveDate,

    /// As-of date.
    pub end: NaiveDate,

    /// Percentage return per asset.
    pub values: Vec<Option<f64>>,
}

impl ReturnColumn {
    /// Column label embedding the window name and both boundary dates.
    pub fn label(&self) -> String {
        self.window.label(self.start, self.end)
    }
}

/// Cumulative returns: one row per asset, one column per window.
///
/// Every column holds exactly one value per asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnTable {
    as_of: NaiveDate,
    assets: Vec<String>,
    columns: Vec<ReturnColumn>,
}

#[derive(Deserialize)]
struct ReturnTableParts {
    as_of: NaiveDate,
    assets: Vec<String>,
    columns: Vec<ReturnColumn>,
}

impl<'de> Deserialize<'de> for ReturnTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let parts = ReturnTableParts::deserialize(deserializer)?;
        Self::from_parts(parts.as_of, parts.assets, parts.columns).map_err(serde::de::Error::custom)
    }
}

impl ReturnTable {
    /// Assemble a table from precomputed columns.
    ///
    /// # Errors
    ///
    /// Returns [`ReturnsError::ColumnLength`] if a column does not hold one
    /// value per asset.
    pub fn from_parts(
        as_of: NaiveDate,
        assets: Vec<String>,
        columns: Vec<ReturnColumn>,
    ) -> Result<Self> {
        if let Some(column) = columns.iter().find(|c| c.values.len() != assets.len()) {
            return Err(ReturnsError::ColumnLength {
                window: column.window.name().to_string(),
                expected: assets.len(),
                actual: column.values.len(),
            });
        }
        Ok(Self {
            as_of,
            assets,
            columns,
        })
    }

    /// As-of date shared by every column.
    pub const fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Asset identifiers (row index).
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Window columns, shortest window first.
    pub fn columns(&self) -> &[ReturnColumn] {
        &self.columns
    }

    /// Column for a window.
    pub fn column(&self, window: LookbackWindow) -> Option<&ReturnColumn> {
        self.columns.iter().find(|c| c.window == window)
    }

    /// Return of one asset over one window.
    pub fn get(&self, asset: &str, window: LookbackWindow) -> Option<f64> {
        let row = self.assets.iter().position(|a| a == asset)?;
        self.column(window)
            .and_then(|c| c.values.get(row).copied().flatten())
    }

    /// Convert to a DataFrame with an `asset` column followed by one column per
    /// window label.
    ///
    /// # Errors
    ///
    /// Returns an error if the DataFrame cannot be assembled.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new(ASSET_COLUMN.into(), self.assets.clone()));
        for column in &self.columns {
            columns.push(Column::new(column.label().into(), column.values.clone()));
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Outer-join per-window series by asset, in order of first appearance.
    fn join(as_of: NaiveDate, windows: Vec<(LookbackWindow, NaiveDate, ReturnSeries)>) -> Self {
        let mut assets: Vec<String> = Vec::new();
        for (_, _, series) in &windows {
            for asset in &series.assets {
                if !assets.contains(asset) {
                    assets.push(asset.clone());
                }
            }
        }

        let columns = windows
            .into_iter()
            .map(|(window, start, series)| ReturnColumn {
                window,
                start,
                end: as_of,
                values: assets.iter().map(|a| series.get(a)).collect(),
            })
            .collect();

        Self {
            as_of,
            assets,
            columns,
        }
    }
}

/// Compute the four trailing-window returns for every asset in `prices`.
///
/// The as-of date is the table's last date; each window starts that many
/// calendar days earlier.
///
/// # Errors
///
/// Returns [`ReturnsError::EmptyPriceTable`] when `prices` has no rows.
pub fn compute_all_returns(prices: &PriceTable) -> Result<ReturnTable> {
    let as_of = prices.as_of().ok_or(ReturnsError::EmptyPriceTable)?;

    let windows = LookbackWindow::ALL
        .iter()
        .map(|&window| {
            let start = window.start(as_of);
            let slice = prices.slice(start, as_of);
            debug!(
                window = window.name(),
                %start,
                %as_of,
                rows = slice.height(),
                "computing window returns"
            );
            let series = compute_return(&slice, window.label(start, as_of));
            (window, start, series)
        })
        .collect();

    Ok(ReturnTable::join(as_of, windows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Daily prices from 2023-09-01 to 2024-03-01, growing 1 per day.
    fn daily_prices() -> PriceTable {
        let start = date(2023, 9, 1);
        let end = date(2024, 3, 1);
        let dates: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
        let linear = (0..dates.len()).map(|i| Some(100.0 + i as f64)).collect();
        let flat = vec![Some(50.0); dates.len()];
        PriceTable::new(dates, vec![("UP", linear), ("FLAT", flat)]).unwrap()
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let prices = PriceTable::new(Vec::new(), vec![("A", Vec::new())]).unwrap();
        assert!(matches!(
            compute_all_returns(&prices),
            Err(ReturnsError::EmptyPriceTable)
        ));
    }

    #[test]
    fn test_four_columns_with_labels() {
        let returns = compute_all_returns(&daily_prices()).unwrap();

        assert_eq!(returns.as_of(), date(2024, 3, 1));
        assert_eq!(returns.columns().len(), 4);
        let seven = returns.column(LookbackWindow::SevenDay).unwrap();
        assert!(seven.label().contains("2024-02-23"));
        assert!(seven.label().contains("2024-03-01"));
        assert_eq!(
            returns.columns()[3].label(),
            "6-month Return 2023-09-03 - 2024-03-01"
        );
    }

    #[test]
    fn test_window_values() {
        let prices = daily_prices();
        let returns = compute_all_returns(&prices).unwrap();
        let last = 100.0 + (prices.height() - 1) as f64;

        // 2024-02-23 is 7 rows before the as-of row.
        assert_relative_eq!(
            returns.get("UP", LookbackWindow::SevenDay).unwrap(),
            (last / (last - 7.0) - 1.0) * 100.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            returns.get("FLAT", LookbackWindow::SixMonth).unwrap(),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_single_row_yields_undefined_returns() {
        let prices = PriceTable::new(vec![date(2024, 3, 1)], vec![("A", vec![Some(1.0)])]).unwrap();
        let returns = compute_all_returns(&prices).unwrap();

        assert_eq!(returns.columns().len(), 4);
        assert_eq!(returns.assets(), &["A".to_string()]);
        for window in LookbackWindow::ALL {
            assert_eq!(returns.get("A", window), None);
        }
    }

    #[test]
    fn test_short_history_only_defines_covered_windows() {
        // Observations every ten days, the last on 2024-03-01.
        let dates: Vec<NaiveDate> = (0..7)
            .map(|i| date(2024, 1, 1) + chrono::Duration::days(10 * i))
            .collect();
        let prices: Vec<Option<f64>> = (0..7).map(|i| Some(10.0 + i as f64)).collect();
        let table = PriceTable::new(dates, vec![("A", prices)]).unwrap();

        let returns = compute_all_returns(&table).unwrap();
        // Only the as-of row falls inside the 7-day window.
        assert_eq!(returns.get("A", LookbackWindow::SevenDay), None);
        assert!(returns.get("A", LookbackWindow::OneMonth).is_some());
        assert_relative_eq!(
            returns.get("A", LookbackWindow::SixMonth).unwrap(),
            60.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_idempotent() {
        let prices = daily_prices();
        assert_eq!(
            compute_all_returns(&prices).unwrap(),
            compute_all_returns(&prices).unwrap()
        );
    }

    #[test]
    fn test_from_parts_rejects_short_column() {
        let column = ReturnColumn {
            window: LookbackWindow::SevenDay,
            start: date(2024, 2, 23),
            end: date(2024, 3, 1),
            values: vec![Some(1.0)],
        };
        let err = ReturnTable::from_parts(
            date(2024, 3, 1),
            vec!["A".to_string(), "B".to_string()],
            vec![column],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ReturnsError::ColumnLength {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_deserialize_validates_column_length() {
        let returns = compute_all_returns(&daily_prices()).unwrap();
        let json = serde_json::to_string(&returns).unwrap();
        assert_eq!(serde_json::from_str::<ReturnTable>(&json).unwrap(), returns);

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["assets"] = serde_json::json!(["UP", "FLAT", "EXTRA"]);
        let err = serde_json::from_value::<ReturnTable>(value).unwrap_err();
        assert!(err.to_string().contains("7-day"));
    }

    #[test]
    fn test_to_dataframe() {
        let returns = compute_all_returns(&daily_prices()).unwrap();
        let df = returns.to_dataframe().unwrap();

        assert_eq!(df.shape(), (2, 5));
        assert_eq!(df.get_column_names()[0].as_str(), ASSET_COLUMN);
        assert_eq!(
            df.get_column_names()[1].as_str(),
            "7-day Return 2024-02-23 - 2024-03-01"
        );
    }
}
