//! # Tide Chart Core Library
//!
//! This library holds the data types and pipeline stages for the tide chart
//! utility: fetch NOAA tide predictions for one station, find the local highs
//! and lows, and draw one annotated chart.
//!
//! ## Data Flow
//! 1. **Fetch**: one HTTP GET against the NOAA CO-OPS data getter ([`tide_data`])
//! 2. **Empty check**: any failure collapses to an empty [`TidePrediction`]
//! 3. **Extrema**: centered rolling window min/max ([`extrema`])
//! 4. **Render**: one chart through a [`renderer::ChartSink`] (SVG file or terminal)
//!
//! ## Core Types
//! - [`Prediction`]: a single (local time, height) pair forecast by NOAA
//! - [`TidePrediction`]: the ordered sequence handed from fetcher to renderer

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod extrema;
pub mod renderer;
pub mod svg_renderer;
pub mod tide_data;

/// A single tide prediction.
///
/// `time` is the station's local time as reported by NOAA (`lst_ldt`, so it
/// already carries any daylight saving shift). `height_ft` is feet above
/// Mean Lower Low Water.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tide_chart_lib::Prediction;
///
/// let time = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .unwrap()
///     .and_hms_opt(6, 0, 0)
///     .unwrap();
/// let high = Prediction { time, height_ft: 4.5 };
/// assert_eq!(high.height_ft, 4.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Local date-time of the prediction
    pub time: NaiveDateTime,
    /// Tide height in feet above MLLW
    pub height_ft: f64,
}

/// Ordered tide predictions for one station and date range.
///
/// Records keep the order NOAA delivered them in. An empty series means
/// "no data": the fetcher returns one for every failure as well as for a
/// station that simply had nothing to report.
///
/// # Example
/// ```
/// use tide_chart_lib::TidePrediction;
///
/// let series = TidePrediction::default();
/// assert!(series.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TidePrediction {
    /// Predictions in delivery order
    pub records: Vec<Prediction>,
}

impl TidePrediction {
    pub fn new(records: Vec<Prediction>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Height column, in record order.
    pub fn heights(&self) -> Vec<f64> {
        self.records.iter().map(|p| p.height_ft).collect()
    }
}
