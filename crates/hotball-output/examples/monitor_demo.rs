//! Render the monitor from synthetic prices and print the summary tables.

use chrono::{Duration, NaiveDate};
use hotball_data::{PriceTable, SectorMapping};
use hotball_output::{AsciiTable, ExportFormat, Exporter, SectorAverages, render};
use hotball_returns::compute_all_returns;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Hot Ball of Money Demo ===\n");

    let start = NaiveDate::from_ymd_opt(2023, 9, 1).ok_or("invalid start date")?;
    let dates: Vec<NaiveDate> = (0..183).map(|i| start + Duration::days(i)).collect();

    // Each asset drifts at its own daily rate.
    let drifts = [
        ("XOM", 0.0008),
        ("CVX", 0.0004),
        ("AAPL", -0.0002),
        ("MSFT", 0.0011),
        ("JPM", 0.0006),
        ("NEE", -0.0005),
    ];
    let columns = drifts
        .iter()
        .map(|(asset, drift)| {
            let prices = (0..dates.len())
                .map(|i| Some(100.0 * (1.0_f64 + drift).powi(i as i32)))
                .collect();
            (*asset, prices)
        })
        .collect();
    let prices = PriceTable::new(dates, columns)?;

    let sectors: SectorMapping = [
        ("XOM", "Energy"),
        ("CVX", "Energy"),
        ("AAPL", "Information Technology"),
        ("MSFT", "Information Technology"),
        ("JPM", "Financials"),
        ("NEE", "Utilities"),
    ]
    .into_iter()
    .collect();

    let returns = compute_all_returns(&prices)?;
    println!("{}", returns.to_ascii_table());

    let averages = SectorAverages::compute(&returns, &sectors)?;
    println!("{}", averages.to_ascii_table());

    println!("CSV Format:");
    println!("{}", averages.export_to_string(ExportFormat::Csv)?);

    render(&returns, &sectors)?;
    println!("Wrote hotballofmoney.png");

    Ok(())
}
