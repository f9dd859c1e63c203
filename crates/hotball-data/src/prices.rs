//! Date-indexed price table.
//!
//! A [`PriceTable`] holds one price column per asset over an ascending date
//! index. Gaps are stored as `None`; `NaN` inputs are normalized to `None`.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashSet;

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Prices indexed by date, one column per asset.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    assets: Vec<String>,
    /// `columns[asset][row]`
    columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    /// Build a price table from a date index and per-asset columns.
    ///
    /// Rows are sorted ascending by date. Every column must have one value per
    /// date.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::RaggedColumn`] when a column length differs from the
    /// number of dates, [`DataError::DuplicateAsset`] for a repeated asset and
    /// [`DataError::DuplicateDate`] for a repeated date.
    pub fn new<S>(dates: Vec<NaiveDate>, columns: Vec<(S, Vec<Option<f64>>)>) -> Result<Self>
    where
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut assets = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());

        for (asset, column) in columns {
            let asset = asset.into();
            if column.len() != dates.len() {
                return Err(DataError::RaggedColumn {
                    asset,
                    expected: dates.len(),
                    actual: column.len(),
                });
            }
            if !seen.insert(asset.clone()) {
                return Err(DataError::DuplicateAsset(asset));
            }
            assets.push(asset);
            values.push(column);
        }

        let mut order: Vec<usize> = (0..dates.len()).collect();
        order.sort_by_key(|&i| dates[i]);

        if let Some(pair) = order.windows(2).find(|w| dates[w[0]] == dates[w[1]]) {
            return Err(DataError::DuplicateDate(dates[pair[0]]));
        }

        let sorted_dates = order.iter().map(|&i| dates[i]).collect();
        let sorted_columns = values
            .into_iter()
            .map(|column| {
                order
                    .iter()
                    .map(|&i| column[i].filter(|p| !p.is_nan()))
                    .collect()
            })
            .collect();

        Ok(Self {
            dates: sorted_dates,
            assets,
            columns: sorted_columns,
        })
    }

    /// Build a price table from a Polars DataFrame.
    ///
    /// `date_column` must have the `Date` dtype; every other column is cast to
    /// `Float64` and treated as an asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the date column is missing or not a `Date`, if a
    /// price column cannot be cast to `Float64`, or if [`PriceTable::new`]
    /// rejects the result.
    pub fn from_dataframe(df: &DataFrame, date_column: &str) -> Result<Self> {
        let date_col = df
            .column(date_column)
            .map_err(|_| DataError::MissingColumn(date_column.to_string()))?;

        if date_col.dtype() != &DataType::Date {
            return Err(DataError::Parse(format!(
                "column '{}' has dtype {}, expected date",
                date_column,
                date_col.dtype()
            )));
        }

        let days = date_col.as_materialized_series().cast(&DataType::Int32)?;
        let dates = days
            .i32()?
            .into_iter()
            .map(|d| {
                d.and_then(|d| d.checked_add(UNIX_EPOCH_DAYS_FROM_CE))
                    .and_then(NaiveDate::from_num_days_from_ce_opt)
                    .ok_or_else(|| DataError::Parse(format!("null or invalid date in '{date_column}'")))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut columns = Vec::new();
        for column in df.get_columns() {
            let name = column.name().as_str();
            if name == date_column {
                continue;
            }
            let series = column.as_materialized_series().cast(&DataType::Float64)?;
            let values: Vec<Option<f64>> = series.f64()?.into_iter().collect();
            columns.push((name.to_string(), values));
        }

        Self::new(dates, columns)
    }

    /// Date index, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Asset identifiers in column order.
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Number of rows (dates).
    pub const fn height(&self) -> usize {
        self.dates.len()
    }

    /// Whether the table has no rows.
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The last date in the index, which defines the as-of date.
    pub fn as_of(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Price column for an asset.
    pub fn prices(&self, asset: &str) -> Option<&[Option<f64>]> {
        self.assets
            .iter()
            .position(|a| a == asset)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterate over `(asset, prices)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> + '_ {
        self.assets
            .iter()
            .zip(&self.columns)
            .map(|(asset, column)| (asset.as_str(), column.as_slice()))
    }

    /// Rows with `start <= date <= end`, keeping every asset column.
    ///
    /// Dates need not exist in the index: the slice starts at the first date
    /// on or after `start` and stops at the last date on or before `end`.
    pub fn slice(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d <= end).max(lo);

        Self {
            dates: self.dates[lo..hi].to_vec(),
            assets: self.assets.clone(),
            columns: self.columns.iter().map(|c| c[lo..hi].to_vec()).collect(),
        }
    }
}
