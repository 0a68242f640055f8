//! SVG tide chart renderer
//!
//! Draws a [`TideChart`] with plotters onto an SVG file: the predicted tide
//! line, red high tide markers labelled above, green low tide markers
//! labelled below, rotated time ticks and a legend.

use crate::renderer::{
    ChartPoint, ChartSink, RenderError, TideChart, HIGH_LEGEND, LINE_LEGEND, LOW_LEGEND,
};
use chrono::{DateTime, NaiveDateTime};
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::ops::Range;
use std::path::{Path, PathBuf};

const ROYAL_BLUE: RGBColor = RGBColor(65, 105, 225);
const HIGH_COLOR: RGBColor = RGBColor(220, 20, 60);
const LOW_COLOR: RGBColor = RGBColor(34, 139, 34);

/// Writes the chart to an SVG file.
pub struct SvgChart {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl SvgChart {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartSink for SvgChart {
    fn draw(&mut self, chart: &TideChart) -> Result<(), RenderError> {
        draw_svg(&self.path, (self.width, self.height), chart)
            .map_err(|e| RenderError::Draw(e.to_string()))?;
        tracing::info!("chart written to {}", self.path.display());
        Ok(())
    }
}

/// Seconds since the epoch, treating local time as UTC so ticks format back
/// to the same wall-clock value.
fn to_x(time: NaiveDateTime) -> f64 {
    time.and_utc().timestamp() as f64
}

fn format_tick(x: f64) -> String {
    DateTime::from_timestamp(x.round() as i64, 0)
        .map(|t| t.naive_utc().format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Data range with a margin; a single value is widened so the axis is never empty.
fn padded(min: f64, max: f64, fraction: f64, fallback: f64) -> Range<f64> {
    if max > min {
        let pad = (max - min) * fraction;
        (min - pad)..(max + pad)
    } else {
        (min - fallback)..(max + fallback)
    }
}

fn draw_svg(
    path: &Path,
    size: (u32, u32),
    chart: &TideChart,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let first = chart.line.first().map(|p| to_x(p.time)).unwrap_or(0.0);
    let last = chart.line.last().map(|p| to_x(p.time)).unwrap_or(0.0);
    let (x_min, x_max) = (first.min(last), first.max(last));
    let (y_min, y_max) = chart.height_bounds().unwrap_or((0.0, 1.0));

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(110)
        .y_label_area_size(70)
        .build_cartesian_2d(
            padded(x_min, x_max, 0.01, 3600.0),
            padded(y_min, y_max, 0.15, 1.0),
        )?;

    ctx.configure_mesh()
        .x_desc(chart.x_label)
        .y_desc(chart.y_label)
        .x_labels(16)
        .y_labels(10)
        .x_label_formatter(&|x| format_tick(*x))
        .y_label_formatter(&|y| format!("{y:.1}"))
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .axis_desc_style(("sans-serif", 16))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .draw()?;

    ctx.draw_series(LineSeries::new(
        finite(&chart.line),
        ROYAL_BLUE.stroke_width(3),
    ))?
    .label(LINE_LEGEND)
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ROYAL_BLUE.stroke_width(3)));

    // Heights are printed above high markers and below low markers
    ctx.draw_series(finite(&chart.highs).map(|(x, y)| {
        EmptyElement::at((x, y))
            + Circle::new((0, 0), 6, HIGH_COLOR.filled())
            + Text::new(format!("{y:.2} ft"), (-18, -22), ("sans-serif", 12).into_font())
    }))?
    .label(HIGH_LEGEND)
    .legend(|(x, y)| Circle::new((x + 10, y), 5, HIGH_COLOR.filled()));

    ctx.draw_series(finite(&chart.lows).map(|(x, y)| {
        EmptyElement::at((x, y))
            + Circle::new((0, 0), 6, LOW_COLOR.filled())
            + Text::new(format!("{y:.2} ft"), (-18, 10), ("sans-serif", 12).into_font())
    }))?
    .label(LOW_LEGEND)
    .legend(|(x, y)| Circle::new((x + 10, y), 5, LOW_COLOR.filled()));

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font(("sans-serif", 14))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Plot coordinates of the points that have a drawable height.
fn finite(points: &[ChartPoint]) -> impl Iterator<Item = (f64, f64)> + '_ {
    points
        .iter()
        .filter(|p| p.height_ft.is_finite())
        .map(|p| (to_x(p.time), p.height_ft))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Prediction, TidePrediction};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn chart(heights: &[f64]) -> TideChart {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let series = TidePrediction::new(
            heights
                .iter()
                .enumerate()
                .map(|(i, &h)| Prediction {
                    time: start + chrono::Duration::hours(6 * i as i64),
                    height_ft: h,
                })
                .collect(),
        );
        TideChart::from_series(&series, "Montauk, NY")
    }

    #[test]
    fn test_tick_format_round_trips_local_time() {
        let time = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert_eq!(format_tick(to_x(time)), "03-10 02:30");
    }

    #[test]
    fn test_padded_widens_single_value() {
        assert_eq!(padded(2.0, 2.0, 0.1, 1.0), 1.0..3.0);
        let r = padded(0.0, 10.0, 0.1, 1.0);
        assert!((r.start + 1.0).abs() < 1e-9 && (r.end - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_svg_contains_title_and_annotations() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        let mut sink = SvgChart::new(&path, 1000, 600);

        sink.draw(&chart(&[2.1, 4.5, 0.3, 4.0])).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Tide Predictions for Montauk, NY"));
        assert!(svg.contains("4.50 ft"));
        assert!(svg.contains("0.30 ft"));
        assert!(svg.contains(LINE_LEGEND));
        assert!(svg.contains(HIGH_LEGEND));
        assert!(svg.contains(LOW_LEGEND));
    }

    #[test]
    fn test_svg_single_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.svg");
        let mut sink = SvgChart::new(&path, 800, 500);
        sink.draw(&chart(&[1.5])).unwrap();
        assert_eq!(sink.path(), path.as_path());
        assert!(sink.path().exists());
    }
}
