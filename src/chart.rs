use plotters::coord::{
    cartesian::Cartesian2d,
    combinators::{LogCoord, LogRange},
    types::RangedCoordf64,
    Shift,
};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters_backend::{DrawingBackend, DrawingErrorKind};
use std::{
    io,
    ops::Range,
    path::{Path, PathBuf},
    process::Command,
};
use thiserror::Error;

use crate::{
    elements::{LineStyle, Marker, SeriesPath, StrokeMetrics},
    sorts::Algorithm,
    table::{MeasurementTable, SERIES_COUNT},
};

pub const DEFAULT_OUTPUT: &str = "time_graphics.png";

pub const TITLE: &str = "Execution time versus input size";
pub const X_DESC: &str = "Input size";
pub const Y_DESC: &str = "Execution time, ms";

// Sizes in points.
const TITLE_PT: f64 = 12.0;
const TEXT_PT: f64 = 10.0;
const LINE_WIDTH_PT: f64 = 1.5;
const MARKER_SIZE_PT: f64 = 6.0;
const LEGEND_SAMPLE_PT: f64 = 28.0;

// Fraction of the data span added on both sides of each axis.
const MARGIN: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub algorithm: Algorithm,
    pub marker: Marker,
    pub line: LineStyle,
    pub color: RGBColor,
}

impl SeriesStyle {
    pub fn label(&self) -> &'static str {
        self.algorithm.label()
    }
}

/// How each timing column is drawn, `Y1` first.
pub const SERIES: [SeriesStyle; SERIES_COUNT] = [
    SeriesStyle {
        algorithm: Algorithm::StdSort,
        marker: Marker::Circle,
        line: LineStyle::Solid,
        color: RGBColor(31, 119, 180),
    },
    SeriesStyle {
        algorithm: Algorithm::Bubble,
        marker: Marker::Square,
        line: LineStyle::Dashed,
        color: RGBColor(255, 127, 14),
    },
    SeriesStyle {
        algorithm: Algorithm::Selection,
        marker: Marker::Triangle,
        line: LineStyle::DashDot,
        color: RGBColor(44, 160, 44),
    },
    SeriesStyle {
        algorithm: Algorithm::Heap,
        marker: Marker::Cross,
        line: LineStyle::Dotted,
        color: RGBColor(214, 39, 40),
    },
];

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("no positive measurements to plot")]
    Empty,
    #[error("font unavailable: {0}")]
    Font(String),
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        match err {
            DrawingAreaErrorKind::BackendError(DrawingErrorKind::FontError(e)) => {
                PlotError::Font(e.to_string())
            }
            other => PlotError::Draw(other.to_string()),
        }
    }
}

/// Figure size in inches and output resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            width_in: 10.0,
            height_in: 6.0,
            dpi: 300,
        }
    }
}

impl ChartConfig {
    pub fn with_dpi(dpi: u32) -> Self {
        ChartConfig {
            dpi,
            ..ChartConfig::default()
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f64).round() as u32,
            (self.height_in * self.dpi as f64).round() as u32,
        )
    }

    pub fn px_per_pt(&self) -> f64 {
        self.dpi as f64 / 72.0
    }

    fn px(&self, pt: f64) -> i32 {
        (pt * self.px_per_pt()).round() as i32
    }

    fn stroke(&self, pt: f64) -> u32 {
        self.px(pt).max(1) as u32
    }

    fn font(&self, pt: f64) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, pt * self.px_per_pt(), FontStyle::Normal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisRanges {
    pub x: Range<f64>,
    pub y: Range<f64>,
}

/// Points of timing column `index` that can be placed on a log axis.
pub fn series_points(table: &MeasurementTable, index: usize) -> Vec<(f64, f64)> {
    table
        .series(index)
        .filter(|&(x, y)| x.is_finite() && y.is_finite() && y > 0.0)
        .collect()
}

/// X is padded linearly, Y is padded in log space.
pub fn axis_ranges(table: &MeasurementTable) -> Result<AxisRanges, PlotError> {
    let points: Vec<(f64, f64)> = (0..SERIES_COUNT)
        .flat_map(|i| series_points(table, i))
        .collect();
    if points.is_empty() {
        return Err(PlotError::Empty);
    }

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in &points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let x_pad = if x_max > x_min {
        (x_max - x_min) * MARGIN
    } else if x_min != 0.0 {
        x_min.abs() * MARGIN
    } else {
        1.0
    };

    let (ln_min, ln_max) = (y_min.ln(), y_max.ln());
    let ln_pad = if ln_max > ln_min {
        (ln_max - ln_min) * MARGIN
    } else {
        std::f64::consts::LN_2
    };

    // Padding must not push the log axis past the representable positive range.
    let y_lo = (ln_min - ln_pad).exp();
    let y_hi = (ln_max + ln_pad).exp();
    let y_lo = if y_lo.is_normal() { y_lo } else { y_min.max(f64::MIN_POSITIVE) };
    let y_hi = if y_hi.is_finite() { y_hi } else { y_max };
    let y_hi = if y_hi > y_lo { y_hi } else { y_lo * 2.0 };

    Ok(AxisRanges {
        x: (x_min - x_pad)..(x_max + x_pad),
        y: y_lo..y_hi,
    })
}

/// Coordinate ranges for the chart: linear X, logarithmic Y.
pub fn axis_coords(ranges: &AxisRanges) -> (Range<f64>, LogRange<f64>) {
    (ranges.x.clone(), LogRange(ranges.y.clone()))
}

/// Short tick text: integers without decimals, small values without trailing zeros.
pub fn tick_label(value: f64) -> String {
    if value != 0.0 && value.abs() < 1e-4 {
        return format!("{:e}", value);
    }
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" => "0".to_string(),
        _ => text.to_string(),
    }
}

type TimingChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, LogCoord<f64>>>;

fn build<'a, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    ranges: &AxisRanges,
    config: &ChartConfig,
) -> Result<TimingChart<'a, DB>, PlotError> {
    let (x_coord, y_coord) = axis_coords(ranges);
    let mut chart = ChartBuilder::on(root)
        .caption(TITLE, config.font(TITLE_PT))
        .margin(config.px(12.0))
        .x_label_area_size(config.px(36.0))
        .y_label_area_size(config.px(56.0))
        .build_cartesian_2d(x_coord, y_coord)?;

    chart
        .configure_mesh()
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .axis_desc_style(config.font(TEXT_PT))
        .label_style(config.font(TEXT_PT))
        .x_label_formatter(&|v| tick_label(*v))
        .y_label_formatter(&|v| tick_label(*v))
        .axis_style(BLACK.stroke_width(config.stroke(0.8)))
        .bold_line_style(BLACK.mix(0.15).stroke_width(config.stroke(0.8)))
        .light_line_style(WHITE.stroke_width(1))
        .draw()?;

    Ok(chart)
}

/// Draws the whole figure onto `root`: grid, four series, legend and decorations.
pub fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    table: &MeasurementTable,
    config: &ChartConfig,
) -> Result<(), PlotError> {
    let ranges = axis_ranges(table)?;
    root.fill(&WHITE)?;

    let mut chart = build(root, &ranges, config)?;
    let metrics = StrokeMetrics::new(config.px_per_pt(), LINE_WIDTH_PT, MARKER_SIZE_PT);
    let sample_len = config.px(LEGEND_SAMPLE_PT);

    for (index, style) in SERIES.into_iter().enumerate() {
        let points = series_points(table, index);
        if points.len() < table.len() {
            tracing::warn!(
                series = style.label(),
                dropped = table.len() - points.len(),
                "non-positive values left out of log scale"
            );
        }

        chart
            .draw_series(std::iter::once(SeriesPath::new(
                points,
                style.color,
                style.marker,
                style.line,
                metrics,
            )))?
            .label(style.label())
            .legend(move |(x, y)| {
                SeriesPath::legend_sample(
                    (x, y),
                    (x + sample_len, y),
                    style.color,
                    style.marker,
                    style.line,
                    metrics,
                )
            });
    }

    chart
        .configure_series_labels()
        .label_font(config.font(TEXT_PT))
        .legend_area_size(config.px(LEGEND_SAMPLE_PT + 6.0))
        .margin(config.px(8.0))
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}

/// Renders the chart into a PNG file at the configured resolution.
pub fn render_png<P: AsRef<Path>>(
    table: &MeasurementTable,
    config: &ChartConfig,
    path: P,
) -> Result<(), PlotError> {
    let path = path.as_ref();
    flame::span_of("render", || -> Result<(), PlotError> {
        let root = BitMapBackend::new(path, config.pixel_size()).into_drawing_area();
        draw(&root, table, config)?;
        root.present()?;
        Ok(())
    })?;
    tracing::info!(path = %path.display(), dpi = config.dpi, "chart saved");
    Ok(())
}

/// Renders the chart into an RGB pixel buffer.
pub fn render_to_buffer(table: &MeasurementTable, config: &ChartConfig) -> Result<Vec<u8>, PlotError> {
    let (width, height) = config.pixel_size();
    let mut buf = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        draw(&root, table, config)?;
        root.present()?;
    }
    Ok(buf)
}

/// A fresh `time_graphics-*.png` path in the temp directory for charts that are only shown.
/// The file is kept so the viewer can still open it after this process exits.
pub fn preview_path() -> io::Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("time_graphics-")
        .suffix(".png")
        .tempfile()?;
    Ok(file.into_temp_path().keep()?)
}

/// Opens an image in the platform's default viewer.
pub fn show(path: &Path) -> io::Result<()> {
    let status = viewer_command(path).status()?;
    if !status.success() {
        tracing::warn!(path = %path.display(), %status, "image viewer exited with an error");
    }
    Ok(())
}

fn viewer_command(path: &Path) -> Command {
    let mut cmd;
    if cfg!(target_os = "macos") {
        cmd = Command::new("open");
    } else if cfg!(target_os = "windows") {
        cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
    } else {
        cmd = Command::new("xdg-open");
    }
    cmd.arg(path);
    cmd
}

#[cfg(test)]
fn example_table() -> MeasurementTable {
    crate::parse::parse_str("100 0.5 1.2 0.8 0.6\n200 1.1 4.9 3.0 1.3\n").unwrap()
}

#[test]
fn series_styles_are_distinct() {
    for (i, a) in SERIES.iter().enumerate() {
        for b in &SERIES[i + 1..] {
            assert_ne!(a.marker, b.marker);
            assert_ne!(a.line, b.line);
            assert_ne!(a.label(), b.label());
        }
    }
    let lines: Vec<LineStyle> = SERIES.iter().map(|s| s.line).collect();
    assert_eq!(
        lines,
        vec![LineStyle::Solid, LineStyle::Dashed, LineStyle::DashDot, LineStyle::Dotted]
    );
    assert_eq!(SERIES[0].label(), "std::sort()");
}

#[test]
fn two_points_per_series() {
    let table = example_table();
    for index in 0..SERIES_COUNT {
        let xs: Vec<f64> = series_points(&table, index).iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![100.0, 200.0]);
    }
}

#[test]
fn ranges_cover_data_with_margin() {
    let ranges = axis_ranges(&example_table()).unwrap();
    assert!((ranges.x.start - 95.0).abs() < 1e-9);
    assert!((ranges.x.end - 205.0).abs() < 1e-9);
    assert!(ranges.y.start < 0.5 && ranges.y.start > 0.4);
    assert!(ranges.y.end > 4.9 && ranges.y.end < 6.0);
}

#[test]
fn non_positive_times_are_masked() {
    let table = crate::parse::parse_str("100 0 1 -1 2\n200 0.5 2 3 4\n").unwrap();
    assert_eq!(series_points(&table, 0), vec![(200.0, 0.5)]);
    assert_eq!(series_points(&table, 2), vec![(200.0, 3.0)]);
    assert_eq!(series_points(&table, 3).len(), 2);

    let all_zero = crate::parse::parse_str("100 0 0 0 0\n").unwrap();
    assert!(matches!(axis_ranges(&all_zero), Err(PlotError::Empty)));
    assert!(matches!(
        render_to_buffer(&MeasurementTable::new(), &ChartConfig::with_dpi(20)),
        Err(PlotError::Empty)
    ));
}

#[test]
fn single_value_ranges_are_not_empty() {
    let ranges = axis_ranges(&crate::parse::parse_str("100 1 1 1 1\n").unwrap()).unwrap();
    assert!(ranges.x.start < 100.0 && ranges.x.end > 100.0);
    assert!((ranges.y.start - 0.5).abs() < 1e-9);
    assert!((ranges.y.end - 2.0).abs() < 1e-9);
}

#[test]
fn y_axis_is_logarithmic() {
    let ranges = AxisRanges {
        x: 0.0..10.0,
        y: 1.0..1000.0,
    };
    let mut buf = vec![0u8; 300 * 300 * 3];
    let root = BitMapBackend::with_buffer(&mut buf, (300, 300)).into_drawing_area();
    let (x_coord, y_coord) = axis_coords(&ranges);
    let chart = ChartBuilder::on(&root)
        .build_cartesian_2d(x_coord, y_coord)
        .unwrap();

    let y1 = chart.backend_coord(&(5.0, 1.0)).1;
    let y10 = chart.backend_coord(&(5.0, 10.0)).1;
    let y100 = chart.backend_coord(&(5.0, 100.0)).1;
    let y1000 = chart.backend_coord(&(5.0, 1000.0)).1;
    assert!(y1 > y10 && y10 > y100 && y100 > y1000);
    assert!(((y1 - y10) - (y10 - y100)).abs() <= 1);
    assert!(((y10 - y100) - (y100 - y1000)).abs() <= 1);
}

#[test]
fn tick_labels_are_short() {
    assert_eq!(tick_label(100.0), "100");
    assert_eq!(tick_label(2500.0), "2500");
    assert_eq!(tick_label(0.5), "0.5");
    assert_eq!(tick_label(0.001), "0.001");
    assert_eq!(tick_label(0.0), "0");
    assert_eq!(tick_label(0.00001), "1e-5");
}

#[test]
fn default_figure_is_ten_by_six_inches_at_300_dpi() {
    let config = ChartConfig::default();
    assert_eq!(config.pixel_size(), (3000, 1800));
    assert_eq!(ChartConfig::with_dpi(100).pixel_size(), (1000, 600));
}

#[test]
fn saves_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_OUTPUT);
    match render_png(&example_table(), &ChartConfig::with_dpi(60), &path) {
        // headless machines without any system font cannot lay out text
        Err(PlotError::Font(err)) => {
            eprintln!("saves_png skipped, no usable font: {}", err);
            return;
        }
        other => other.unwrap(),
    }
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.len() > 8);
    assert_eq!(&bytes[1..4], b"PNG");
}

#[test]
fn extreme_times_give_finite_log_range() {
    for input in [
        "100 1e300 1 1 1\n",
        "100 1e-300 1 1 1\n",
        "100 1.7e308 4e-308 1 1\n",
        "100 1e-310 1e-310 1e-310 1e-310\n",
    ] {
        let ranges = axis_ranges(&crate::parse::parse_str(input).unwrap()).unwrap();
        assert!(ranges.y.start.is_normal() && ranges.y.start > 0.0, "{}: {:?}", input, ranges.y);
        assert!(ranges.y.end.is_finite() && ranges.y.end > ranges.y.start, "{}: {:?}", input, ranges.y);
    }
}

#[test]
fn preview_paths_are_unique() {
    let first = preview_path().unwrap();
    let second = preview_path().unwrap();
    assert_ne!(first, second);
    assert!(first.exists() && second.exists());
    assert_eq!(first.extension().and_then(|e| e.to_str()), Some("png"));
    std::fs::remove_file(first).unwrap();
    std::fs::remove_file(second).unwrap();
}
