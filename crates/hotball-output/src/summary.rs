//! Plain-text tables for terminal display.

use crate::averages::SectorAverages;
use hotball_returns::ReturnTable;

const NAME_WIDTH: usize = 24;
const VALUE_WIDTH: usize = 12;

/// Format a value as an ASCII table.
pub trait AsciiTable {
    /// Render the table, percentages with two decimals and `n/a` where a
    /// value is missing.
    fn to_ascii_table(&self) -> String;
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}%"))
}

fn table(
    title: &str,
    index_name: &str,
    index: &[String],
    headers: &[&str],
    columns: &[&[Option<f64>]],
) -> String {
    let width = NAME_WIDTH + (VALUE_WIDTH + 1) * headers.len();
    let mut output = String::new();

    output.push_str(&format!("\n{title}\n"));
    output.push_str(&"=".repeat(width));
    output.push('\n');

    output.push_str(&format!("{index_name:<NAME_WIDTH$}"));
    for header in headers {
        output.push_str(&format!(" {header:>VALUE_WIDTH$}"));
    }
    output.push('\n');
    output.push_str(&"-".repeat(width));
    output.push('\n');

    for (row, name) in index.iter().enumerate() {
        output.push_str(&format!("{name:<NAME_WIDTH$}"));
        for column in columns {
            let value = column.get(row).copied().flatten();
            output.push_str(&format!(" {:>VALUE_WIDTH$}", cell(value)));
        }
        output.push('\n');
    }

    output.push_str(&"=".repeat(width));
    output.push('\n');
    output
}

impl AsciiTable for ReturnTable {
    fn to_ascii_table(&self) -> String {
        let mut title = format!("Cumulative Returns as of {}", self.as_of());
        for column in self.columns() {
            title.push_str(&format!("\n  {}", column.label()));
        }
        let headers: Vec<&str> = self.columns().iter().map(|c| c.window.name()).collect();
        let columns: Vec<&[Option<f64>]> =
            self.columns().iter().map(|c| c.values.as_slice()).collect();
        table(&title, "Asset", self.assets(), &headers, &columns)
    }
}

impl AsciiTable for SectorAverages {
    fn to_ascii_table(&self) -> String {
        let headers: Vec<&str> = self.columns().iter().map(|c| c.window.name()).collect();
        let columns: Vec<&[Option<f64>]> =
            self.columns().iter().map(|c| c.values.as_slice()).collect();
        let mut output = table(
            "Average Sector Returns",
            "Sector",
            self.sectors(),
            &headers,
            &columns,
        );

        for column in self.columns() {
            if let Some(best) = self.best(column.window) {
                output.push_str(&format!("Best {}: {best}\n", column.window.name()));
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::averages::AverageColumn;
    use hotball_returns::LookbackWindow;

    fn averages() -> SectorAverages {
        SectorAverages::from_parts(
            vec!["Energy".to_string(), "Utilities".to_string()],
            vec![
                AverageColumn {
                    window: LookbackWindow::SevenDay,
                    values: vec![Some(1.234), None],
                },
                AverageColumn {
                    window: LookbackWindow::OneMonth,
                    values: vec![Some(-3.0), Some(2.0)],
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_cell_formatting() {
        assert_eq!(cell(Some(12.345)), "12.35%");
        assert_eq!(cell(Some(-0.5)), "-0.50%");
        assert_eq!(cell(None), "n/a");
    }

    #[test]
    fn test_sector_table() {
        let text = averages().to_ascii_table();

        assert!(text.contains("Average Sector Returns"));
        assert!(text.contains("7-day"));
        assert!(text.contains("1-month"));
        assert!(text.contains("1.23%"));
        assert!(text.contains("n/a"));
        assert!(text.contains("Best 7-day: Energy"));
        assert!(text.contains("Best 1-month: Utilities"));
    }

    #[test]
    fn test_rows_are_aligned() {
        let text = averages().to_ascii_table();
        let rows: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("Energy") || l.starts_with("Utilities"))
            .collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), rows[1].len());
        assert_eq!(rows[0].len(), NAME_WIDTH + 2 * (VALUE_WIDTH + 1));
    }
}
