//! PNG rendering of the monitor figure.
//!
//! [`render`] composes the figure from a return table and sector mapping and
//! draws it with the plotters bitmap backend. Sizes in [`ChartConfig`] are
//! given in inches and points and converted to pixels through the DPI, which
//! is also recorded in the PNG `pHYs` chunk.

use crate::error::ChartError;
use crate::figure::{FIGURE_TITLE, Figure, LabelOrientation, Panel, compose_titled};
use crate::palette::Rgb;
use hotball_data::SectorMapping;
use hotball_returns::ReturnTable;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default output file name.
pub const OUTPUT_FILE: &str = "hotballofmoney.png";

/// Bar width as a fraction of its slot.
const BAR_WIDTH: f64 = 0.8;

/// Headroom added above and below the bars, as a fraction of the data range.
const RANGE_PADDING: f64 = 0.1;

const METERS_PER_INCH: f64 = 0.0254;

/// Rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Figure title.
    pub title: String,

    /// Output PNG path.
    pub output: PathBuf,

    /// Figure width in inches.
    pub width_in: f64,

    /// Figure height in inches.
    pub height_in: f64,

    /// Pixels per inch.
    pub dpi: u32,

    /// Number of legend columns.
    pub legend_columns: usize,

    /// Font family for all text.
    pub font_family: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: FIGURE_TITLE.to_string(),
            output: PathBuf::from(OUTPUT_FILE),
            width_in: 30.0,
            height_in: 15.0,
            dpi: 300,
            legend_columns: 3,
            font_family: "sans-serif".to_string(),
        }
    }
}

impl ChartConfig {
    /// Image size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }

    /// Convert a length in points to pixels.
    pub fn px(&self, points: f64) -> u32 {
        (points * f64::from(self.dpi) / 72.0).round() as u32
    }

    /// Font of the given point size.
    pub fn font(&self, points: f64) -> FontDesc<'_> {
        (self.font_family.as_str(), f64::from(self.px(points))).into_font()
    }
}

/// Render the monitor to [`OUTPUT_FILE`] in the working directory.
///
/// # Errors
///
/// Returns [`ChartError::UnmappedAsset`] before anything is written if an
/// asset has no sector, or a drawing error if the PNG cannot be produced.
pub fn render(returns: &ReturnTable, sectors: &SectorMapping) -> Result<(), ChartError> {
    render_with_config(returns, sectors, &ChartConfig::default())
}

/// Render the monitor with explicit settings.
///
/// # Errors
///
/// See [`render`].
pub fn render_with_config(
    returns: &ReturnTable,
    sectors: &SectorMapping,
    config: &ChartConfig,
) -> Result<(), ChartError> {
    let figure = compose_titled(returns, sectors, &config.title)?;
    draw_figure(&figure, config)?;

    info!(
        path = %config.output.display(),
        assets = returns.assets().len(),
        sectors = sectors.sectors().len(),
        "wrote monitor chart"
    );
    Ok(())
}

/// Draw a composed figure to `config.output`.
///
/// # Errors
///
/// Returns an error if the backend fails to draw or write the image.
pub fn draw_figure(figure: &Figure, config: &ChartConfig) -> Result<(), ChartError> {
    let size = config.pixel_size();
    debug!(width = size.0, height = size.1, "drawing figure");

    let mut pixels = vec![0u8; size.0 as usize * size.1 as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, size).into_drawing_area();
        root.fill(&WHITE)?;

        let legend_rows = figure.legend.len().div_ceil(config.legend_columns.max(1)) as u32;
        let title_height = config.px(40.0);
        let legend_height = config.px(12.0) + legend_rows * config.px(22.0);

        let (title_area, rest) = root.split_vertically(title_height);
        let grid_height = size.1.saturating_sub(title_height + legend_height);
        let (grid_area, legend_area) = rest.split_vertically(grid_height);

        let (width, height) = title_area.dim_in_pixel();
        let title_style =
            TextStyle::from(config.font(28.0)).pos(Pos::new(HPos::Center, VPos::Center));
        title_area.draw_text(
            &figure.title,
            &title_style,
            ((width / 2) as i32, (height / 2) as i32),
        )?;

        let cells = grid_area.split_evenly((figure.grid.rows, figure.grid.cols));
        for panel in &figure.panels {
            let area = &cells[figure.grid.index(panel.cell)];
            draw_panel(area, panel, config)?;
        }

        draw_legend(&legend_area, figure, config)?;
        root.present()?;
    }

    write_png(&config.output, &pixels, size, config.dpi)
}

/// Encode an RGB buffer as PNG with its resolution in the `pHYs` chunk.
fn write_png(
    path: &Path,
    pixels: &[u8],
    (width, height): (u32, u32),
    dpi: u32,
) -> Result<(), ChartError> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(file, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let ppm = pixels_per_meter(dpi);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels)?;
    writer.finish()?;
    Ok(())
}

fn pixels_per_meter(dpi: u32) -> u32 {
    (f64::from(dpi) / METERS_PER_INCH).round() as u32
}

/// Rotation and anchor of a category label.
///
/// Vertical labels read bottom to top and end just under the axis.
fn label_layout(orientation: LabelOrientation) -> (FontTransform, Pos) {
    match orientation {
        LabelOrientation::Vertical => (
            FontTransform::Rotate270,
            Pos::new(HPos::Right, VPos::Center),
        ),
        LabelOrientation::Horizontal => {
            (FontTransform::None, Pos::new(HPos::Center, VPos::Top))
        }
    }
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    config: &ChartConfig,
) -> Result<(), ChartError> {
    let slots = panel.bars.len().max(1) as f64;
    let (y_min, y_max) = value_range(panel.bars.iter().filter_map(|b| b.value));

    let label_area = match panel.labels {
        LabelOrientation::Vertical => config.px(60.0),
        LabelOrientation::Horizontal => config.px(40.0),
    };

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, config.font(18.0))
        .margin(config.px(8.0))
        .x_label_area_size(label_area)
        .y_label_area_size(config.px(50.0))
        .build_cartesian_2d(0f64..slots, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .y_desc(panel.y_label.as_str())
        .y_label_formatter(&|v| format_percent(*v))
        .label_style(config.font(12.0))
        .axis_desc_style(config.font(14.0))
        .draw()?;

    let inset = (1.0 - BAR_WIDTH) / 2.0;
    chart.draw_series(panel.bars.iter().enumerate().filter_map(|(i, bar)| {
        let value = bar.value?;
        let x = i as f64;
        Some(Rectangle::new(
            [(x + inset, 0.0), (x + 1.0 - inset, value)],
            to_color(bar.color).filled(),
        ))
    }))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (slots, 0.0)],
        BLACK.stroke_width(1),
    )))?;

    // Category labels sit under the plotting area, one per slot.
    let (base_x, base_y) = area.get_base_pixel();
    let gap = config.px(4.0) as i32;
    let line_height = config.px(14.0) as i32;
    let (transform, pos) = label_layout(panel.labels);
    let style = TextStyle::from(config.font(11.0).transform(transform)).pos(pos);
    for (i, bar) in panel.bars.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(i as f64 + 0.5, y_min));
        let (x, y) = (x - base_x, y - base_y + gap);
        match panel.labels {
            LabelOrientation::Vertical => {
                area.draw_text(&bar.label, &style, (x, y))?;
            }
            LabelOrientation::Horizontal => {
                for (line_no, line) in bar.label.split('\n').enumerate() {
                    area.draw_text(line, &style, (x, y + line_no as i32 * line_height))?;
                }
            }
        }
    }

    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
    config: &ChartConfig,
) -> Result<(), ChartError> {
    if figure.legend.is_empty() {
        return Ok(());
    }

    let columns = config.legend_columns.max(1);
    let rows = figure.legend.len().div_ceil(columns);
    let (width, _) = area.dim_in_pixel();
    let column_width = (width / columns as u32) as i32;
    let row_height = config.px(22.0) as i32;
    let swatch = config.px(14.0) as i32;
    let top = config.px(6.0) as i32;
    let style = TextStyle::from(config.font(16.0)).pos(Pos::new(HPos::Left, VPos::Center));

    // Column-major fill, like a matplotlib legend.
    for (k, entry) in figure.legend.iter().enumerate() {
        let (col, row) = ((k / rows) as i32, (k % rows) as i32);
        let x = col * column_width + column_width / 4;
        let y = top + row * row_height;
        area.draw(&Rectangle::new(
            [(x, y), (x + swatch, y + swatch)],
            to_color(entry.color).filled(),
        ))?;
        area.draw_text(&entry.label, &style, (x + swatch * 3 / 2, y + swatch / 2))?;
    }

    Ok(())
}

const fn to_color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

/// Tick label for a percentage value.
fn format_percent(value: f64) -> String {
    if value.abs() >= 10.0 || value.fract() == 0.0 {
        format!("{value:.0}%")
    } else {
        format!("{value:.1}%")
    }
}

/// Y range covering every value and zero, padded on both sides.
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if hi - lo <= f64::EPSILON {
        return (-1.0, 1.0);
    }
    let pad = (hi - lo) * RANGE_PADDING;
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = ChartConfig::default();
        assert_eq!(config.title, "Hot Ball of Money Monitor");
        assert_eq!(config.output, PathBuf::from("hotballofmoney.png"));
        assert_eq!(config.pixel_size(), (9000, 4500));
        assert_eq!(config.legend_columns, 3);
    }

    #[test]
    fn test_points_to_pixels() {
        let config = ChartConfig::default();
        assert_eq!(config.px(72.0), 300);
        assert_eq!(config.px(18.0), 75);

        let low = ChartConfig {
            dpi: 72,
            ..ChartConfig::default()
        };
        assert_eq!(low.px(18.0), 18);
        assert_eq!(low.pixel_size(), (2160, 1080));
    }

    #[rstest]
    #[case(25.0, "25%")]
    #[case(-12.4, "-12%")]
    #[case(2.5, "2.5%")]
    #[case(0.0, "0%")]
    #[case(-4.0, "-4%")]
    fn test_format_percent(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_percent(value), expected);
    }

    #[test]
    fn test_value_range_includes_zero() {
        let (lo, hi) = value_range([5.0, 15.0].into_iter());
        assert_relative_eq!(lo, -1.5);
        assert_relative_eq!(hi, 16.5);

        let (lo, hi) = value_range([-10.0, f64::NAN].into_iter());
        assert_relative_eq!(lo, -11.0);
        assert_relative_eq!(hi, 1.0);
    }

    #[test]
    fn test_value_range_degenerate() {
        assert_eq!(value_range(std::iter::empty()), (-1.0, 1.0));
        assert_eq!(value_range([0.0, 0.0].into_iter()), (-1.0, 1.0));
    }

    /// Width and height from the IHDR chunk.
    fn png_size(bytes: &[u8]) -> (u32, u32) {
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(&bytes[12..16], b"IHDR");
        let word = |at: usize| u32::from_be_bytes(bytes[at..at + 4].try_into().unwrap());
        (word(16), word(20))
    }

    /// Pixels per unit on each axis and the unit byte of the pHYs chunk.
    fn png_resolution(bytes: &[u8]) -> (u32, u32, u8) {
        let at = bytes.windows(4).position(|w| w == b"pHYs").unwrap() + 4;
        let word = |at: usize| u32::from_be_bytes(bytes[at..at + 4].try_into().unwrap());
        (word(at), word(at + 4), bytes[at + 8])
    }

    fn sample_returns() -> (ReturnTable, SectorMapping) {
        use chrono::NaiveDate;
        use hotball_data::PriceTable;
        use hotball_returns::compute_all_returns;

        let prices = PriceTable::new(
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ],
            vec![
                ("XOM", vec![Some(100.0), Some(104.0)]),
                ("AAPL", vec![Some(100.0), Some(97.0)]),
            ],
        )
        .unwrap();
        let mapping: SectorMapping = [("XOM", "Energy"), ("AAPL", "Information Technology")]
            .into_iter()
            .collect();
        (compute_all_returns(&prices).unwrap(), mapping)
    }

    #[test]
    fn test_pixels_per_meter() {
        assert_eq!(pixels_per_meter(300), 11811);
        assert_eq!(pixels_per_meter(72), 2835);
    }

    #[test]
    fn test_write_png_records_dpi() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        write_png(&path, &[255u8; 4 * 2 * 3], (4, 2), 300).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(png_size(&bytes), (4, 2));
        assert_eq!(png_resolution(&bytes), (11811, 11811, 1));
    }

    #[test]
    fn test_write_png_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("tiny.png");

        let err = write_png(&path, &[0u8; 3], (1, 1), 300).unwrap_err();
        assert!(matches!(err, ChartError::Io(_)));
    }

    #[test]
    fn test_vertical_labels_read_upward() {
        let (transform, pos) = label_layout(LabelOrientation::Vertical);
        assert!(matches!(transform, FontTransform::Rotate270));
        assert!(matches!(pos.h_pos, HPos::Right));
        assert!(matches!(pos.v_pos, VPos::Center));

        let (transform, pos) = label_layout(LabelOrientation::Horizontal);
        assert!(matches!(transform, FontTransform::None));
        assert!(matches!(pos.h_pos, HPos::Center));
        assert!(matches!(pos.v_pos, VPos::Top));
    }

    #[test]
    #[ignore = "draws text, needs a system sans-serif font"]
    fn test_render_low_dpi_png() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChartConfig {
            output: dir.path().join("monitor.png"),
            dpi: 30,
            ..ChartConfig::default()
        };
        let (returns, mapping) = sample_returns();

        render_with_config(&returns, &mapping, &config).unwrap();

        let bytes = std::fs::read(&config.output).unwrap();
        assert_eq!(png_size(&bytes), config.pixel_size());
        assert_eq!(png_size(&bytes), (900, 450));
        assert_eq!(png_resolution(&bytes), (1181, 1181, 1));
    }

    #[test]
    fn test_unmapped_asset_writes_nothing() {
        use chrono::NaiveDate;
        use hotball_data::PriceTable;
        use hotball_returns::compute_all_returns;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("monitor.png");
        let config = ChartConfig {
            output: output.clone(),
            ..ChartConfig::default()
        };
        let prices = PriceTable::new(
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ],
            vec![("TSLA", vec![Some(1.0), Some(2.0)])],
        )
        .unwrap();
        let returns = compute_all_returns(&prices).unwrap();
        let mapping: SectorMapping = [("XOM", "Energy")].into_iter().collect();

        let err = render_with_config(&returns, &mapping, &config).unwrap_err();
        assert!(matches!(err, ChartError::UnmappedAsset(_)));
        assert!(!output.exists());
    }
}
