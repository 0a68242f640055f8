//! # Tide Chart Rendering
//!
//! This module turns a [`TidePrediction`] into a [`TideChart`] (line points,
//! annotated highs and lows, title and axis labels) and hands it to a
//! [`ChartSink`]. Two sinks exist: the SVG file writer in
//! [`crate::svg_renderer`] and the terminal renderer [`AsciiChart`] used in
//! development mode.

use crate::extrema::{rolling_extrema, EXTREMA_WINDOW};
use crate::TidePrediction;
use chrono::NaiveDateTime;
use std::io::{self, Write};
use thiserror::Error;

pub const X_AXIS_LABEL: &str = "Date and Time (Local)";
pub const Y_AXIS_LABEL: &str = "Tide Height (feet)";

pub const LINE_LEGEND: &str = "Predicted Tide Height";
pub const HIGH_LEGEND: &str = "High Tide";
pub const LOW_LEGEND: &str = "Low Tide";

/// Errors raised while drawing a chart.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Backend failed to draw or write the chart
    #[error("chart drawing failed: {0}")]
    Draw(String),

    /// Terminal output failed
    #[error("chart output: {0}")]
    Io(#[from] io::Error),
}

/// One annotated point on the chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartPoint {
    pub time: NaiveDateTime,
    pub height_ft: f64,
}

impl ChartPoint {
    /// Annotation text, e.g. `4.50 ft`.
    pub fn label(&self) -> String {
        format!("{:.2} ft", self.height_ft)
    }
}

/// Everything a backend needs to draw the tide chart.
#[derive(Clone, Debug, PartialEq)]
pub struct TideChart {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// Every record, in sequence order, joined by one line
    pub line: Vec<ChartPoint>,
    pub highs: Vec<ChartPoint>,
    pub lows: Vec<ChartPoint>,
}

impl TideChart {
    /// Build the chart model for a non-empty series.
    pub fn from_series(series: &TidePrediction, label: &str) -> Self {
        let line: Vec<ChartPoint> = series
            .records
            .iter()
            .map(|p| ChartPoint {
                time: p.time,
                height_ft: p.height_ft,
            })
            .collect();

        let extrema = rolling_extrema(&series.heights(), EXTREMA_WINDOW);
        let pick = |indices: &[usize]| -> Vec<ChartPoint> {
            indices.iter().map(|&i| line[i].clone()).collect()
        };
        let highs = pick(&extrema.highs);
        let lows = pick(&extrema.lows);

        TideChart {
            title: format!("Tide Predictions for {label}"),
            x_label: X_AXIS_LABEL,
            y_label: Y_AXIS_LABEL,
            line,
            highs,
            lows,
        }
    }

    /// (min, max) of the finite heights, `None` if there are none.
    pub fn height_bounds(&self) -> Option<(f64, f64)> {
        self.line
            .iter()
            .map(|p| p.height_ft)
            .filter(|h| h.is_finite())
            .fold(None, |bounds, h| match bounds {
                None => Some((h, h)),
                Some((min, max)) => Some((min.min(h), max.max(h))),
            })
    }
}

/// A drawing backend for [`TideChart`].
pub trait ChartSink {
    fn draw(&mut self, chart: &TideChart) -> Result<(), RenderError>;
}

/// What [`render`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rendered {
    /// The chart was handed to the sink
    Drawn,
    /// Series was empty, nothing was drawn
    Skipped,
}

/// Render `series` as one chart titled after `label`.
///
/// An empty series is the expected "no data" path: a notice is printed and
/// the sink is never called.
pub fn render<S: ChartSink + ?Sized>(
    series: &TidePrediction,
    label: &str,
    sink: &mut S,
) -> Result<Rendered, RenderError> {
    if series.is_empty() {
        println!("Cannot plot an empty tide prediction series.");
        return Ok(Rendered::Skipped);
    }

    let chart = TideChart::from_series(series, label);
    tracing::info!(
        records = chart.line.len(),
        highs = chart.highs.len(),
        lows = chart.lows.len(),
        "generating chart"
    );
    sink.draw(&chart)?;
    Ok(Rendered::Drawn)
}

/// Terminal renderer: `•` for the tide line, `H` and `L` for the annotated
/// extrema. Long series share columns so the plot stays `max_columns` wide.
pub struct AsciiChart<W: Write> {
    out: W,
    rows: usize,
    max_columns: usize,
}

const Y_AXIS_WIDTH: usize = 7;

/// 24 hours of 10-minute samples, the width of the e-ink tide chart.
const DEFAULT_COLUMNS: usize = 145;

impl AsciiChart<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> AsciiChart<W> {
    pub fn new(out: W) -> Self {
        AsciiChart {
            out,
            rows: 24,
            max_columns: DEFAULT_COLUMNS,
        }
    }

    /// Cap the plot width at `max_columns` (at least one).
    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = max_columns.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartSink for AsciiChart<W> {
    fn draw(&mut self, chart: &TideChart) -> Result<(), RenderError> {
        let rows = self.rows;
        let records = chart.line.len();
        let columns = records.min(self.max_columns);
        let (min_ft, max_ft) = chart.height_bounds().unwrap_or((0.0, 1.0));
        let span = if max_ft > min_ft { max_ft - min_ft } else { 1.0 };

        let height_to_row = |h: f64| -> Option<usize> {
            if !h.is_finite() {
                return None;
            }
            let normalized = ((h - min_ft) / span).clamp(0.0, 1.0);
            let row = ((1.0 - normalized) * (rows as f64 - 1.0)).round() as usize;
            Some(row.min(rows - 1))
        };
        // Record index to plot column; several records may share one
        let column_of = |index: usize| index * columns / records.max(1) + Y_AXIS_WIDTH;

        let mut grid = vec![vec![' '; columns + Y_AXIS_WIDTH]; rows];

        // Y-axis labels at whole or half feet, coarser until they fit the rows
        let mut tide_step = if span > 4.0 { 1.0 } else { 0.5 };
        while span / tide_step > rows as f64 {
            tide_step *= 2.0;
        }
        let first_label = (min_ft / tide_step).ceil() * tide_step;
        for k in 0..=rows {
            let current = first_label + k as f64 * tide_step;
            if current.is_nan() || current > max_ft {
                break;
            }
            if let Some(row) = height_to_row(current) {
                let label = format!("{:>w$.1}", current, w = Y_AXIS_WIDTH - 1);
                for (i, ch) in label.chars().take(Y_AXIS_WIDTH - 1).enumerate() {
                    grid[row][i] = ch;
                }
            }
        }
        for row in grid.iter_mut() {
            row[Y_AXIS_WIDTH - 1] = '│';
        }

        for (index, point) in chart.line.iter().enumerate() {
            if let Some(row) = height_to_row(point.height_ft) {
                grid[row][column_of(index)] = '•';
            }
        }
        // Extrema overwrite the line; a flat window gets both, last one wins
        let mut mark = |points: &[ChartPoint], marker: char| {
            for point in points {
                let Some(index) = chart.line.iter().position(|p| p == point) else {
                    continue;
                };
                if let Some(row) = height_to_row(point.height_ft) {
                    grid[row][column_of(index)] = marker;
                }
            }
        };
        mark(&chart.highs, 'H');
        mark(&chart.lows, 'L');

        writeln!(self.out, "{}", chart.title)?;
        writeln!(self.out, "{}", chart.y_label)?;
        for row in grid {
            writeln!(self.out, "{}", row.into_iter().collect::<String>())?;
        }

        let padding = " ".repeat(Y_AXIS_WIDTH);
        writeln!(self.out, "{}{}", padding, "─".repeat(columns))?;
        if let (Some(first), Some(last)) = (chart.line.first(), chart.line.last()) {
            writeln!(
                self.out,
                "{}{}  →  {}",
                padding,
                first.time.format("%Y-%m-%d %H:%M"),
                last.time.format("%Y-%m-%d %H:%M")
            )?;
        }
        writeln!(self.out, "{}{}", padding, chart.x_label)?;
        writeln!(
            self.out,
            "• {}   H {}   L {}",
            LINE_LEGEND, HIGH_LEGEND, LOW_LEGEND
        )?;

        for point in &chart.highs {
            writeln!(
                self.out,
                "  H {}  {}",
                point.time.format("%a %m-%d %H:%M"),
                point.label()
            )?;
        }
        for point in &chart.lows {
            writeln!(
                self.out,
                "  L {}  {}",
                point.time.format("%a %m-%d %H:%M"),
                point.label()
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}
