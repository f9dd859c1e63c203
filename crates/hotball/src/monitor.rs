//! One-call pipeline: returns, sector averages, chart.

use crate::error::Result;
use hotball_data::{PriceTable, SectorMapping};
use hotball_output::{ChartConfig, SectorAverages, render_with_config};
use hotball_returns::{ReturnTable, compute_all_returns};
use tracing::info;

/// Tables produced by a monitor run.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorReport {
    /// Per-asset cumulative returns.
    pub returns: ReturnTable,
    /// Per-sector averages of `returns`.
    pub averages: SectorAverages,
}

/// Compute returns and write `hotballofmoney.png` to the working directory.
///
/// # Errors
///
/// Fails on an empty price table, an asset missing from `sectors`, or a
/// drawing error.
pub fn run_monitor(prices: &PriceTable, sectors: &SectorMapping) -> Result<MonitorReport> {
    run_monitor_with_config(prices, sectors, &ChartConfig::default())
}

/// [`run_monitor`] with explicit chart settings.
///
/// # Errors
///
/// See [`run_monitor`].
pub fn run_monitor_with_config(
    prices: &PriceTable,
    sectors: &SectorMapping,
    config: &ChartConfig,
) -> Result<MonitorReport> {
    let returns = compute_all_returns(prices)?;
    info!(
        as_of = %returns.as_of(),
        assets = returns.assets().len(),
        "computed trailing returns"
    );

    let averages = SectorAverages::compute(&returns, sectors)?;
    render_with_config(&returns, sectors, config)?;

    Ok(MonitorReport { returns, averages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;
    use chrono::NaiveDate;
    use hotball_output::ChartError;
    use hotball_returns::ReturnsError;

    fn config(dir: &tempfile::TempDir) -> ChartConfig {
        ChartConfig {
            output: dir.path().join("monitor.png"),
            ..ChartConfig::default()
        }
    }

    #[test]
    fn test_empty_prices() {
        let dir = tempfile::tempdir().unwrap();
        let prices = PriceTable::new(Vec::new(), vec![("XLE", Vec::new())]).unwrap();
        let sectors: SectorMapping = [("XLE", "Energy")].into_iter().collect();

        let err = run_monitor_with_config(&prices, &sectors, &config(&dir)).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::Returns(ReturnsError::EmptyPriceTable)
        ));
    }

    #[test]
    fn test_unmapped_asset_stops_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let prices = PriceTable::new(
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ],
            vec![
                ("XLE", vec![Some(1.0), Some(2.0)]),
                ("XLK", vec![Some(1.0), Some(2.0)]),
            ],
        )
        .unwrap();
        let sectors: SectorMapping = [("XLE", "Energy")].into_iter().collect();
        let config = config(&dir);

        let err = run_monitor_with_config(&prices, &sectors, &config).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::Chart(ChartError::UnmappedAsset(ref a)) if a == "XLK"
        ));
        assert!(!config.output.exists());
    }

    #[test]
    #[ignore = "draws text, needs a system sans-serif font"]
    fn test_writes_png_of_configured_size() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChartConfig {
            dpi: 20,
            ..config(&dir)
        };
        let prices = PriceTable::new(
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ],
            vec![
                ("XLE", vec![Some(80.0), Some(84.0)]),
                ("XLU", vec![Some(60.0), Some(57.0)]),
            ],
        )
        .unwrap();
        let sectors: SectorMapping = [("XLE", "Energy"), ("XLU", "Utilities")]
            .into_iter()
            .collect();

        let report = run_monitor_with_config(&prices, &sectors, &config).unwrap();
        assert_eq!(report.averages.sectors().len(), 2);

        let bytes = std::fs::read(&config.output).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
        let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
        assert_eq!((width, height), (600, 300));
    }
}
