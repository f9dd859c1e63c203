//! CSV loading for price tables and sector mappings.
//!
//! Price files are wide: a date column followed by one column per asset.
//! Sector files are long: one `asset,sector` row per asset.
//!
//! ```text
//! date,XLE,XLK
//! 2024-01-02,88.1,190.3
//! 2024-01-03,,191.0
//! ```

use crate::error::{DataError, Result};
use crate::prices::PriceTable;
use crate::sectors::SectorMapping;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Cell values read as a missing price.
const MISSING_MARKERS: [&str; 5] = ["", "nan", "na", "null", "none"];

/// Options for reading CSV inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Name of the date column in the price file (default: "date")
    pub date_column: String,
    /// `chrono` format of the date column (default: "%Y-%m-%d")
    pub date_format: String,
    /// Name of the asset column in the sector file (default: "asset")
    pub asset_column: String,
    /// Name of the sector column in the sector file (default: "sector")
    pub sector_column: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            asset_column: "asset".to_string(),
            sector_column: "sector".to_string(),
        }
    }
}

/// Load a price table from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or [`read_prices`] fails.
pub fn load_prices(path: impl AsRef<Path>, options: &LoadOptions) -> Result<PriceTable> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading prices");
    read_prices(File::open(path)?, options)
}

/// Read a wide price table from CSV.
///
/// # Errors
///
/// Returns an error if the date column is missing, a date or price cannot be
/// parsed, or the resulting table is invalid.
pub fn read_prices<R: Read>(reader: R, options: &LoadOptions) -> Result<PriceTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let date_idx = headers
        .iter()
        .position(|h| h.trim() == options.date_column)
        .ok_or_else(|| DataError::MissingColumn(options.date_column.clone()))?;

    let asset_idx: Vec<usize> = (0..headers.len()).filter(|&i| i != date_idx).collect();
    let mut dates = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); asset_idx.len()];

    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        let raw_date = record.get(date_idx).unwrap_or_default().trim();
        let date = NaiveDate::parse_from_str(raw_date, &options.date_format).map_err(|e| {
            DataError::Parse(format!("row {}: invalid date '{}': {}", line + 1, raw_date, e))
        })?;
        dates.push(date);

        for (column, &i) in columns.iter_mut().zip(&asset_idx) {
            let cell = record.get(i).unwrap_or_default();
            column.push(parse_price(cell).map_err(|msg| {
                DataError::Parse(format!("row {}, column '{}': {}", line + 1, &headers[i], msg))
            })?);
        }
    }

    let named: Vec<(String, Vec<Option<f64>>)> = asset_idx
        .iter()
        .map(|&i| headers[i].trim().to_string())
        .zip(columns)
        .collect();

    let table = PriceTable::new(dates, named)?;
    debug!(
        rows = table.height(),
        assets = table.assets().len(),
        "price table loaded"
    );
    Ok(table)
}

/// Load a sector mapping from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or [`read_sectors`] fails.
pub fn load_sectors(path: impl AsRef<Path>, options: &LoadOptions) -> Result<SectorMapping> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading sector mapping");
    read_sectors(File::open(path)?, options)
}

/// Read an `asset,sector` mapping from CSV.
///
/// # Errors
///
/// Returns an error if either column is missing or a row is malformed.
pub fn read_sectors<R: Read>(reader: R, options: &LoadOptions) -> Result<SectorMapping> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    };
    let asset_idx = find(&options.asset_column)?;
    let sector_idx = find(&options.sector_column)?;

    let mut mapping = SectorMapping::new();
    for record in rdr.records() {
        let record = record?;
        let asset = record.get(asset_idx).unwrap_or_default().trim();
        let sector = record.get(sector_idx).unwrap_or_default().trim();
        if asset.is_empty() {
            continue;
        }
        mapping.insert(asset, sector);
    }

    debug!(
        assets = mapping.len(),
        sectors = mapping.sectors().len(),
        "sector mapping loaded"
    );
    Ok(mapping)
}

fn parse_price(cell: &str) -> std::result::Result<Option<f64>, String> {
    let cell = cell.trim();
    if MISSING_MARKERS.contains(&cell.to_ascii_lowercase().as_str()) {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|e| format!("invalid price '{}': {}", cell, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", None)]
    #[case("NaN", None)]
    #[case(" NA ", None)]
    #[case("null", None)]
    #[case("101.5", Some(101.5))]
    #[case(" 7 ", Some(7.0))]
    fn test_parse_price(#[case] cell: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_price(cell).unwrap(), expected);
    }

    #[test]
    fn test_parse_price_rejects_text() {
        assert!(parse_price("abc").is_err());
    }

    #[test]
    fn test_read_prices() {
        let csv = "date,XLE,XLK\n2024-01-03,,191.0\n2024-01-02,88.1,190.3\n";
        let table = read_prices(csv.as_bytes(), &LoadOptions::default()).unwrap();

        assert_eq!(table.height(), 2);
        assert_eq!(table.assets(), &["XLE".to_string(), "XLK".to_string()]);
        assert_eq!(table.prices("XLE").unwrap(), &[Some(88.1), None]);
        assert_eq!(
            table.as_of(),
            Some(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap())
        );
    }

    #[test]
    fn test_read_prices_date_column_anywhere() {
        let csv = "XLE,day\n1.0,02/01/2024\n";
        let options = LoadOptions {
            date_column: "day".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            ..LoadOptions::default()
        };
        let table = read_prices(csv.as_bytes(), &options).unwrap();
        assert_eq!(
            table.dates(),
            &[NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()]
        );
    }

    #[test]
    fn test_read_prices_errors() {
        let options = LoadOptions::default();
        assert!(matches!(
            read_prices("day,XLE\n2024-01-01,1\n".as_bytes(), &options),
            Err(DataError::MissingColumn(_))
        ));
        assert!(matches!(
            read_prices("date,XLE\nyesterday,1\n".as_bytes(), &options),
            Err(DataError::Parse(_))
        ));
        assert!(matches!(
            read_prices("date,XLE\n2024-01-01,cheap\n".as_bytes(), &options),
            Err(DataError::Parse(_))
        ));
    }

    #[test]
    fn test_read_sectors() {
        let csv = "asset,sector\nXLE,Energy\nXLK,Technology\n,Ignored\nXOM,Energy\n";
        let mapping = read_sectors(csv.as_bytes(), &LoadOptions::default()).unwrap();

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.sector("XOM"), Some("Energy"));
        assert_eq!(mapping.sectors(), vec!["Energy", "Technology"]);
    }

    #[test]
    fn test_read_sectors_missing_column() {
        let result = read_sectors("ticker,sector\nXLE,Energy\n".as_bytes(), &LoadOptions::default());
        assert!(matches!(result, Err(DataError::MissingColumn(ref c)) if c == "asset"));
    }
}
