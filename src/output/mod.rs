//! Module rendering reports as charts.
//!
//! SVG is always available. PNG needs the `png` feature, since rasterizing text needs the system fonts.

use std::path::Path;

use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use tracing::debug;

use crate::{
    domain::{Marker, Rgb},
    error::{Error, file_access, insufficient_data, render_error},
    report::{QueryDelta, ReportSet},
};

mod export;
mod staging;

pub use export::{export_points, export_query_deltas};
pub use staging::StagedOutput;


/// 16:9
pub const CHART_SIZE: (u32, u32) = (1600, 900);

const FONT: &str = "sans-serif";
const MARKER_SIZE: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Vector output
    #[default]
    Svg,
    /// Raster output, needs the `png` feature
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

/// Static description of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub size: (u32, u32),
    pub format: OutputFormat,
    pub legend: bool,
}

impl ChartSpec {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        format: OutputFormat,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            size: CHART_SIZE,
            format,
            legend: true,
        }
    }
}

/// Colours of the bars of a query comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarColors {
    pub slower: Rgb,
    pub faster: Rgb,
}

/// Draws every plotted series of `report` into the file at `path`.
///
/// With a trend curve, the raw points are drawn as translucent markers under the curve, otherwise as
/// a connected line.
pub fn render_line_chart(report: &ReportSet, spec: &ChartSpec, path: &Path) -> Result<(), Error> {
    ensure_parent_dir(path)?;
    match spec.format {
        OutputFormat::Svg => {
            draw_line_chart(SVGBackend::new(path, spec.size).into_drawing_area(), report, spec)?
        }
        #[cfg(feature = "png")]
        OutputFormat::Png => {
            draw_line_chart(BitMapBackend::new(path, spec.size).into_drawing_area(), report, spec)?
        }
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => return Err(png_unavailable()),
    }
    debug!(path = %path.display(), "drew line chart");
    Ok(())
}

/// Draws one horizontal bar per query type with its latency change printed at the end of the bar.
pub fn render_bar_chart(
    deltas: &[QueryDelta],
    spec: &ChartSpec,
    colors: BarColors,
    path: &Path,
) -> Result<(), Error> {
    if deltas.is_empty() {
        return Err(insufficient_data("bar chart", "no query type to compare"));
    }
    ensure_parent_dir(path)?;
    match spec.format {
        OutputFormat::Svg => draw_bar_chart(
            SVGBackend::new(path, spec.size).into_drawing_area(),
            deltas,
            spec,
            colors,
        )?,
        #[cfg(feature = "png")]
        OutputFormat::Png => draw_bar_chart(
            BitMapBackend::new(path, spec.size).into_drawing_area(),
            deltas,
            spec,
            colors,
        )?,
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => return Err(png_unavailable()),
    }
    debug!(path = %path.display(), "drew bar chart");
    Ok(())
}

#[cfg(not(feature = "png"))]
fn png_unavailable() -> Error {
    Error::Usage("PNG output needs the `png` feature, use SVG instead".to_string())
}

fn ensure_parent_dir(path: &Path) -> Result<(), Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|e| file_access(parent, e))
        }
        _ => Ok(()),
    }
}

fn draw_line_chart<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    report: &ReportSet,
    spec: &ChartSpec,
) -> Result<(), Error> {
    root.fill(&WHITE).map_err(render_error)?;

    let (x_max, y_max) = report
        .plotted()
        .flat_map(|entry| {
            let trend_max = entry
                .trend()
                .map(|t| t.fitted().iter().fold(0.0_f64, |acc, y| acc.max(*y)));
            entry.series().max().map(|(x, y)| (x, y.max(trend_max.unwrap_or(0.0))))
        })
        .fold((0.0_f64, 0.0_f64), |(mx, my), (x, y)| (mx.max(x), my.max(y)));
    let x_max = if x_max > 0.0 { x_max * 1.02 } else { 1.0 };
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(&spec.title, (FONT, 28).into_font())
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .x_label_formatter(&|x| format_millions(*x))
        .y_label_formatter(&|y| format_thousands(*y))
        .label_style((FONT, 16).into_font())
        .draw()
        .map_err(render_error)?;

    for entry in report.plotted() {
        let style = entry.style();
        let color = to_color(style.color);
        let line = color.stroke_width(style.line_width);
        let points: Vec<(f64, f64)> = entry.series().points().collect();

        let curve = match entry.trend() {
            Some(trend) => {
                draw_markers(&mut chart, &points, style.marker, color.mix(style.alpha).filled())?;
                entry
                    .series()
                    .x()
                    .iter()
                    .copied()
                    .zip(trend.fitted().iter().copied())
                    .collect()
            }
            None => {
                draw_markers(&mut chart, &points, style.marker, color.filled())?;
                points
            }
        };

        chart
            .draw_series(LineSeries::new(curve, line))
            .map_err(render_error)?
            .label(entry.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));
    }

    if spec.legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(TRANSPARENT)
            .label_font((FONT, 18).into_font())
            .draw()
            .map_err(render_error)?;
    }

    root.present().map_err(render_error)
}

fn draw_markers<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    points: &[(f64, f64)],
    marker: Marker,
    style: ShapeStyle,
) -> Result<(), Error> {
    // line markers need a stroke, the filled styles have none
    let stroke = ShapeStyle {
        filled: false,
        stroke_width: 2,
        ..style
    };
    let drawn = match marker {
        Marker::Circle => {
            chart.draw_series(points.iter().map(|&p| Circle::new(p, MARKER_SIZE, style)))
        }
        Marker::Cross => {
            chart.draw_series(points.iter().map(|&p| Cross::new(p, MARKER_SIZE, stroke)))
        }
        Marker::Triangle => chart.draw_series(
            points
                .iter()
                .map(|&p| TriangleMarker::new(p, MARKER_SIZE, style)),
        ),
        Marker::Star => {
            let outline = star_outline(MARKER_SIZE + 2);
            chart.draw_series(
                points
                    .iter()
                    .map(|&p| EmptyElement::at(p) + Polygon::new(outline.clone(), style)),
            )
        }
        Marker::Plus => chart.draw_series(points.iter().map(|&p| {
            EmptyElement::at(p)
                + PathElement::new(vec![(-MARKER_SIZE, 0), (MARKER_SIZE, 0)], stroke)
                + PathElement::new(vec![(0, -MARKER_SIZE), (0, MARKER_SIZE)], stroke)
        })),
    };
    drawn.map_err(render_error)?;
    Ok(())
}

/// Pixel offsets of a five-pointed star with outer radius `size`, top point first
fn star_outline(size: i32) -> Vec<(i32, i32)> {
    (0..10)
        .map(|k| {
            let radius = if k % 2 == 0 { size as f64 } else { size as f64 * 0.4 };
            let angle = -std::f64::consts::FRAC_PI_2 + k as f64 * std::f64::consts::PI / 5.0;
            (
                (radius * angle.cos()).round() as i32,
                (radius * angle.sin()).round() as i32,
            )
        })
        .collect()
}

fn draw_bar_chart<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    deltas: &[QueryDelta],
    spec: &ChartSpec,
    colors: BarColors,
) -> Result<(), Error> {
    root.fill(&WHITE).map_err(render_error)?;

    // bar i is centred on y = i, so the integer key points of the axis carry the names
    let rows = deltas.len() as f64;
    let (lo, hi) = deltas
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), d| (lo.min(d.percent), hi.max(d.percent)));
    // room for the value labels at the bar ends
    let pad = ((hi - lo) * 0.15).max(1.0);
    let x_min = if lo < 0.0 { lo - pad } else { 0.0 };
    let x_max = hi + pad;
    let longest_name = deltas.iter().map(|d| d.name.len()).max().unwrap_or(0);
    let name_area = (longest_name as u32 * 8 + 20).min(spec.size.0 / 3);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(&spec.title, (FONT, 28).into_font())
        .x_label_area_size(60)
        .y_label_area_size(name_area)
        .build_cartesian_2d(x_min..x_max, -0.5..rows - 0.5)
        .map_err(render_error)?;

    let category = |y: &f64| category_label(deltas, *y);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(deltas.len())
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .x_label_formatter(&|x| format!("{x:.0}%"))
        .y_label_formatter(&category)
        .label_style((FONT, 16).into_font())
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(deltas.iter().enumerate().map(|(i, d)| {
            let color = if d.percent > 0.0 {
                colors.slower
            } else {
                colors.faster
            };
            let y = i as f64;
            Rectangle::new([(0.0, y - 0.3), (d.percent, y + 0.3)], to_color(color).filled())
        }))
        .map_err(render_error)?;

    chart
        .draw_series(deltas.iter().enumerate().map(|(i, d)| {
            Text::new(
                format_percent(d.percent),
                (d.percent, i as f64),
                (FONT, 16).into_font(),
            )
        }))
        .map_err(render_error)?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, -0.5), (0.0, rows - 0.5)],
            BLACK.stroke_width(1),
        )))
        .map_err(render_error)?;

    root.present().map_err(render_error)
}

/// Query name of the bar centred on `y`, empty between bars
pub(crate) fn category_label(deltas: &[QueryDelta], y: f64) -> String {
    let index = y.round();
    if (y - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    deltas
        .get(index as usize)
        .map(|d| d.name.clone())
        .unwrap_or_default()
}

fn to_color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

/// Axis label for a row count, in millions and without trailing zeros
pub(crate) fn format_millions(value: f64) -> String {
    let text = format!("{:.6}", value / 1e6);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Axis label for a rate, with thousands separators
pub(crate) fn format_thousands(value: f64) -> String {
    if value.abs() < 10.0 && value.fract() != 0.0 {
        let text = format!("{value:.2}");
        return text.trim_end_matches('0').trim_end_matches('.').to_string();
    }

    let digits = (value.abs().round() as u64).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 && digits != "0" {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

pub(crate) fn format_percent(value: f64) -> String {
    format!("{value:+.1}%")
}
