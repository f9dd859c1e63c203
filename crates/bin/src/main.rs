//! Hot Ball of Money CLI binary.
//!
//! Loads a wide price CSV and an asset-to-sector CSV, computes trailing
//! returns and draws the monitor chart.

use clap::{Parser, Subcommand};
use hotball::MonitorReport;
use hotball_data::{LoadOptions, load_prices, load_sectors};
use hotball_output::{
    AsciiTable, ExportError, ExportFormat, Exporter, OUTPUT_FILE, SectorPalette,
};
use hotball_returns::compute_all_returns;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hotball")]
#[command(about = "Hot Ball of Money: trailing sector return monitor", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute returns and write the monitor chart
    Render {
        /// Wide price CSV (date column plus one column per asset)
        #[arg(long)]
        prices: PathBuf,

        /// Asset-to-sector CSV
        #[arg(long)]
        sectors: PathBuf,

        /// Also export the return table to this path
        #[arg(long)]
        export: Option<PathBuf>,

        /// Export format (csv or json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Date format of the price file
        #[arg(long, default_value = "%Y-%m-%d")]
        date_format: String,
    },

    /// Print the return table without drawing
    Returns {
        /// Wide price CSV
        #[arg(long)]
        prices: PathBuf,

        /// Output format (csv, json or text)
        #[arg(long, default_value = "text")]
        format: String,

        /// Date format of the price file
        #[arg(long, default_value = "%Y-%m-%d")]
        date_format: String,
    },

    /// List sectors and their chart colors
    Sectors {
        /// Asset-to-sector CSV
        #[arg(long)]
        sectors: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render {
            prices,
            sectors,
            export,
            format,
            date_format,
        } => {
            let export = export_target(export, &format)?;
            let options = LoadOptions {
                date_format,
                ..LoadOptions::default()
            };
            let report = render_monitor(&prices, &sectors, &options)?;
            print_report(&report);

            if let Some((path, format)) = export {
                report.returns.export_to_file(&path, format)?;
                println!("Exported returns to {}", path.display());
            }
        }
        Commands::Returns {
            prices,
            format,
            date_format,
        } => {
            let options = LoadOptions {
                date_format,
                ..LoadOptions::default()
            };
            let returns = compute_all_returns(&load_prices(&prices, &options)?)?;
            match format.as_str() {
                "text" => print!("{}", returns.to_ascii_table()),
                other => {
                    let format: ExportFormat = other.parse()?;
                    println!("{}", returns.export_to_string(format)?);
                }
            }
        }
        Commands::Sectors { sectors } => {
            list_sectors(&sectors)?;
        }
    }

    Ok(())
}

/// `--verbose` wins over `RUST_LOG`; otherwise `RUST_LOG` or `hotball=info`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hotball=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hotball=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Validate `--format` before anything is read or drawn.
fn export_target(
    export: Option<PathBuf>,
    format: &str,
) -> Result<Option<(PathBuf, ExportFormat)>, ExportError> {
    export
        .map(|path| format.parse().map(|format| (path, format)))
        .transpose()
}

fn render_monitor(
    prices: &Path,
    sectors: &Path,
    options: &LoadOptions,
) -> Result<MonitorReport, Box<dyn std::error::Error>> {
    let prices = load_prices(prices, options)?;
    let sectors = load_sectors(sectors, options)?;
    info!(
        rows = prices.height(),
        assets = prices.assets().len(),
        sectors = sectors.sectors().len(),
        "inputs loaded"
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Rendering {}...", OUTPUT_FILE));

    match hotball::run_monitor(&prices, &sectors) {
        Ok(report) => {
            pb.finish_with_message(format!("Wrote {}", OUTPUT_FILE));
            Ok(report)
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            Err(e.into())
        }
    }
}

fn print_report(report: &MonitorReport) {
    print!("{}", report.returns.to_ascii_table());
    print!("{}", report.averages.to_ascii_table());
}

fn list_sectors(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mapping = load_sectors(path, &LoadOptions::default())?;
    let palette = SectorPalette::from_mapping(&mapping);

    println!("Sectors:");
    println!("========\n");

    for (sector, color) in palette.iter() {
        let assets = mapping.assets_in(sector);
        println!("{} {:<28} {:>3} assets", color, sector, assets.len());
    }

    Ok(())
}
