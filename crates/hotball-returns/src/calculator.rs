//! Cumulative return over a price slice.
//!
//! For each asset: forward-fill gaps, take period-over-period changes,
//! compound them across the slice and report the final value as a
//! percentage. A slice with fewer than two usable rows yields `None`.

use hotball_data::PriceTable;
use serde::{Deserialize, Serialize};

/// One labelled column of returns, indexed by asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    /// Column label.
    pub label: String,

    /// Asset identifiers.
    pub assets: Vec<String>,

    /// Percentage return per asset, `None` where undefined.
    pub values: Vec<Option<f64>>,
}

impl ReturnSeries {
    /// Return for a single asset.
    pub fn get(&self, asset: &str) -> Option<f64> {
        self.assets
            .iter()
            .position(|a| a == asset)
            .and_then(|i| self.values[i])
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the series has no assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Compute total compounded percentage return for every asset in `prices`.
///
/// `prices` should already be restricted to the window of interest; `label`
/// names the resulting column.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use hotball_data::PriceTable;
/// use hotball_returns::compute_return;
///
/// let dates = vec![
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
/// ];
/// let prices = PriceTable::new(dates, vec![("XLE", vec![Some(100.0), Some(110.0)])]).unwrap();
///
/// let returns = compute_return(&prices, "1-day");
/// assert!((returns.get("XLE").unwrap() - 10.0).abs() < 1e-9);
/// ```
pub fn compute_return(prices: &PriceTable, label: impl Into<String>) -> ReturnSeries {
    let (assets, values) = prices
        .columns()
        .map(|(asset, column)| (asset.to_string(), cumulative_return(column)))
        .unzip();

    ReturnSeries {
        label: label.into(),
        assets,
        values,
    }
}

/// Carry the last observed price over gaps. Leading gaps stay empty.
fn forward_fill(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    prices
        .iter()
        .map(|p| {
            if p.is_some() {
                last = *p;
            }
            last
        })
        .collect()
}

fn cumulative_return(prices: &[Option<f64>]) -> Option<f64> {
    let filled = forward_fill(prices);

    let mut growth: Option<f64> = None;
    let mut last_change = None;
    for pair in filled.windows(2) {
        last_change = match (pair[0], pair[1]) {
            (Some(prev), Some(curr)) => Some(curr / prev),
            _ => None,
        };
        if let Some(ratio) = last_change {
            growth = Some(growth.unwrap_or(1.0) * ratio);
        }
    }

    // The final row must carry a defined change for the result to exist.
    last_change
        .and(growth)
        .map(|g| (g - 1.0) * 100.0)
        .filter(|r| r.is_finite())
}
