use plotters::element::{Drawable, PointCollection};
use plotters::style::{Color, RGBColor, ShapeStyle};
use plotters_backend::{BackendCoord, DrawingBackend, DrawingErrorKind};

/// Point marker glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
    Cross,
}

/// Stroke patterns for series lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

impl LineStyle {
    /// Alternating on/off lengths in multiples of the line width. Empty means solid.
    pub fn pattern(&self) -> &'static [f64] {
        match self {
            LineStyle::Solid => &[],
            LineStyle::Dashed => &[3.7, 1.6],
            LineStyle::DashDot => &[6.4, 1.6, 1.0, 1.6],
            LineStyle::Dotted => &[1.0, 1.65],
        }
    }
}

/// Pixel sizes of strokes and markers, derived from point sizes and the output resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeMetrics {
    pub line_width: u32,
    pub marker_radius: u32,
}

impl StrokeMetrics {
    /// `line_pt` and `marker_pt` are in points (1/72 inch); `marker_pt` is the marker diameter.
    pub fn new(px_per_pt: f64, line_pt: f64, marker_pt: f64) -> Self {
        StrokeMetrics {
            line_width: ((line_pt * px_per_pt).round() as u32).max(1),
            marker_radius: ((marker_pt * px_per_pt / 2.0).round() as u32).max(1),
        }
    }

    pub fn dash_pattern(&self, style: LineStyle) -> Vec<f64> {
        style
            .pattern()
            .iter()
            .map(|len| len * self.line_width as f64)
            .collect()
    }
}

/// Cuts a polyline into the visible pieces of a dash pattern, measured along the path.
pub fn dash_path(path: &[BackendCoord], pattern: &[f64]) -> Vec<Vec<BackendCoord>> {
    if path.len() < 2 {
        return Vec::new();
    }
    if pattern.is_empty() || pattern.iter().all(|len| *len <= 0.0) {
        return vec![path.to_vec()];
    }

    let mut pieces = Vec::new();
    let mut current: Vec<BackendCoord> = Vec::new();
    let mut idx = 0;
    let mut left = pattern[0];
    let mut on = true;

    for pair in path.windows(2) {
        let (x0, y0) = (pair[0].0 as f64, pair[0].1 as f64);
        let (x1, y1) = (pair[1].0 as f64, pair[1].1 as f64);
        let length = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        if length == 0.0 {
            continue;
        }
        let at = |t: f64| -> BackendCoord {
            let f = t / length;
            ((x0 + (x1 - x0) * f).round() as i32, (y0 + (y1 - y0) * f).round() as i32)
        };

        if on && current.is_empty() {
            current.push(pair[0]);
        }
        let mut pos = 0.0;
        while length - pos > left {
            pos += left;
            if on {
                current.push(at(pos));
                pieces.push(std::mem::take(&mut current));
            } else {
                current.push(at(pos));
            }
            on = !on;
            idx = (idx + 1) % pattern.len();
            left = pattern[idx];
        }
        left -= length - pos;
        if on {
            current.push(pair[1]);
        }
    }
    if on && current.len() > 1 {
        pieces.push(current);
    }
    pieces
}

/// A series drawn as a styled polyline with a marker on every vertex.
///
/// Dashes are laid out after the points are mapped to pixels, so a pattern looks the same on
/// linear and logarithmic axes. With `legend` set only one marker is drawn, halfway along.
pub struct SeriesPath<Coord> {
    points: Vec<Coord>,
    color: RGBColor,
    marker: Marker,
    line: LineStyle,
    metrics: StrokeMetrics,
    legend: bool,
}

impl<Coord> SeriesPath<Coord> {
    pub fn new(
        points: Vec<Coord>,
        color: RGBColor,
        marker: Marker,
        line: LineStyle,
        metrics: StrokeMetrics,
    ) -> Self {
        SeriesPath {
            points,
            color,
            marker,
            line,
            metrics,
            legend: false,
        }
    }

    pub fn legend_sample(
        from: Coord,
        to: Coord,
        color: RGBColor,
        marker: Marker,
        line: LineStyle,
        metrics: StrokeMetrics,
    ) -> Self {
        SeriesPath {
            points: vec![from, to],
            color,
            marker,
            line,
            metrics,
            legend: true,
        }
    }
}

impl<'a, Coord: 'a> PointCollection<'a, Coord> for &'a SeriesPath<Coord> {
    type Point = &'a Coord;
    type IntoIter = &'a [Coord];
    fn point_iter(self) -> &'a [Coord] {
        &self.points
    }
}

impl<Coord, DB: DrawingBackend> Drawable<DB> for SeriesPath<Coord> {
    fn draw<I: Iterator<Item = BackendCoord>>(
        &self,
        points: I,
        backend: &mut DB,
        _: (u32, u32),
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        let points: Vec<BackendCoord> = points.collect();
        let stroke = self.color.stroke_width(self.metrics.line_width);

        for piece in dash_path(&points, &self.metrics.dash_pattern(self.line)) {
            backend.draw_path(piece, &stroke)?;
        }

        if self.legend {
            if let [(x0, y0), (x1, y1)] = points.as_slice() {
                draw_marker(backend, ((*x0 + *x1) / 2, (*y0 + *y1) / 2), self, &stroke)?;
            }
        } else {
            for &at in &points {
                draw_marker(backend, at, self, &stroke)?;
            }
        }
        Ok(())
    }
}

fn draw_marker<DB: DrawingBackend, Coord>(
    backend: &mut DB,
    (x, y): BackendCoord,
    series: &SeriesPath<Coord>,
    stroke: &ShapeStyle,
) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
    let r = series.metrics.marker_radius as i32;
    let fill = series.color.filled();
    match series.marker {
        Marker::Circle => backend.draw_circle((x, y), r as u32, &fill, true),
        Marker::Square => backend.draw_rect((x - r, y - r), (x + r, y + r), &fill, true),
        Marker::Triangle => {
            let half = (r as f64 * 1.1).round() as i32;
            backend.fill_polygon(vec![(x, y - half), (x - half, y + r), (x + half, y + r)], &fill)
        }
        Marker::Cross => {
            backend.draw_line((x - r, y - r), (x + r, y + r), stroke)?;
            backend.draw_line((x - r, y + r), (x + r, y - r), stroke)
        }
    }
}

#[test]
fn solid_line_is_one_piece() {
    let path = vec![(0, 0), (10, 0), (10, 10)];
    assert_eq!(dash_path(&path, &[]), vec![path.clone()]);
}

#[test]
fn dashes_split_straight_line() {
    let pieces = dash_path(&[(0, 0), (100, 0)], &[10.0, 5.0]);
    let starts: Vec<i32> = pieces.iter().map(|p| p[0].0).collect();
    assert_eq!(starts, vec![0, 15, 30, 45, 60, 75, 90]);
    assert_eq!(pieces[0], vec![(0, 0), (10, 0)]);
    assert_eq!(pieces[6], vec![(90, 0), (100, 0)]);
}

#[test]
fn dash_continues_around_corner() {
    let pieces = dash_path(&[(0, 0), (6, 0), (6, 20)], &[10.0, 5.0]);
    assert_eq!(pieces[0], vec![(0, 0), (6, 0), (6, 4)]);
    assert_eq!(pieces[1][0], (6, 9));
}

#[test]
fn degenerate_paths() {
    assert!(dash_path(&[(3, 3)], &[1.0, 1.0]).is_empty());
    assert!(dash_path(&[(3, 3), (3, 3)], &[1.0, 1.0]).is_empty());
}

#[test]
fn line_styles_have_distinct_patterns() {
    let styles = [
        LineStyle::Solid,
        LineStyle::Dashed,
        LineStyle::DashDot,
        LineStyle::Dotted,
    ];
    for (i, a) in styles.iter().enumerate() {
        for b in &styles[i + 1..] {
            assert_ne!(a.pattern(), b.pattern());
        }
    }
}

#[test]
fn metrics_scale_with_resolution() {
    let screen = StrokeMetrics::new(1.0, 1.5, 6.0);
    let print = StrokeMetrics::new(2.0, 1.5, 6.0);
    assert_eq!((screen.line_width, screen.marker_radius), (2, 3));
    assert_eq!((print.line_width, print.marker_radius), (3, 6));

    let dashed = print.dash_pattern(LineStyle::Dashed);
    assert_eq!(dashed.len(), 2);
    assert!((dashed[0] - 11.1).abs() < 1e-9);
    assert!(print.dash_pattern(LineStyle::Solid).is_empty());
}
