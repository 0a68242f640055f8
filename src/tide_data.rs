//! # NOAA Tide Prediction Fetching
//!
//! This module handles the single network operation of the program: ask the
//! NOAA CO-OPS data getter for tide predictions at one station over a date
//! range and turn the JSON reply into a [`TidePrediction`].
//!
//! ## Data Source
//!
//! ### NOAA CO-OPS API
//! - **URL**: https://api.tidesandcurrents.noaa.gov/api/prod/datagetter
//! - **Product**: `predictions` relative to MLLW, in feet (`units=english`)
//! - **Time zone**: `lst_ldt`, station local time including daylight saving
//! - **Format**: JSON, `{"predictions": [{"t": "2024-01-01 00:00", "v": "2.104"}, ...]}`
//!
//! ## Error Handling
//!
//! Every failure mode is a [`FetchError`] variant:
//! - **Transport**: connection failures and the 15 second timeout
//! - **Status**: non-success HTTP responses
//! - **Decode**: a body that is not the expected JSON object
//! - **Missing predictions**: valid JSON without a `predictions` key (NOAA's
//!   answer for an unknown station or a bad date range)
//! - **Coercion**: a `t` or `v` field that does not parse; one bad record
//!   fails the whole fetch
//!
//! [`NoaaClient::fetch`] is fail-soft: it prints the reason as a diagnostic and
//! returns an empty series, so callers only branch on "data or no data".
//! [`NoaaClient::try_fetch`] keeps the error for callers that want it.

use crate::{Prediction, TidePrediction};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

/// Production endpoint for tide and current predictions.
pub const NOAA_ENDPOINT: &str = "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter";

/// Ceiling for the whole request, connect through body.
pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);

/// Client tag NOAA asks callers to send with every request.
const APPLICATION: &str = "tide-chart";

/// Date format of `begin_date`/`end_date`.
const QUERY_DATE_FORMAT: &str = "%Y%m%d";

/// Errors that can occur while fetching and decoding predictions.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request never produced a response (DNS, connect, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Body is not the JSON object we expect
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Well-formed response with nothing to plot
    #[error("no prediction data in response{}", service_note(.message.as_deref()))]
    MissingPredictions { message: Option<String> },

    /// A record's `t` field is not a local date-time
    #[error("record {index}: cannot parse time {raw:?}")]
    Timestamp { index: usize, raw: String },

    /// A record's `v` field is not a number
    #[error("record {index}: cannot parse height {raw:?}")]
    Height { index: usize, raw: String },
}

fn service_note(message: Option<&str>) -> String {
    match message {
        Some(m) => format!(": {m}"),
        None => String::new(),
    }
}

impl FetchError {
    /// True when the request was abandoned at the timeout ceiling.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Http(e) if e.is_timeout())
    }
}

/// Inclusive calendar range sent as `begin_date`/`end_date`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestWindow {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl RequestWindow {
    /// `today` through `today + days`, `None` if the end date is out of range.
    pub fn starting(today: NaiveDate, days: i64) -> Option<Self> {
        let end = Duration::try_days(days).and_then(|d| today.checked_add_signed(d))?;
        Some(RequestWindow { begin: today, end })
    }

    /// `YYYYMMDD` strings for the query.
    pub fn query_dates(&self) -> (String, String) {
        (
            self.begin.format(QUERY_DATE_FORMAT).to_string(),
            self.end.format(QUERY_DATE_FORMAT).to_string(),
        )
    }
}

/// Raw NOAA response. Both keys are optional: NOAA reports problems as
/// `{"error": {"message": "..."}}` with a 200 status.
#[derive(Deserialize)]
struct ApiResponse {
    predictions: Option<Vec<RawPrediction>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct RawPrediction {
    t: String,
    v: String,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// HTTP client for the NOAA data getter.
pub struct NoaaClient {
    http: reqwest::Client,
    endpoint: String,
}

impl NoaaClient {
    /// Client for the production endpoint with the 15 second timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_endpoint(NOAA_ENDPOINT, REQUEST_TIMEOUT)
    }

    /// Client for an arbitrary endpoint and timeout.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(NoaaClient {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Fetch predictions, collapsing every failure into an empty series.
    ///
    /// Dates are `YYYYMMDD` and are passed through unchecked; NOAA decides
    /// whether they are valid. Whenever nothing comes back to plot, failure
    /// or an empty `predictions` array, one diagnostic line is printed and the
    /// cause is logged.
    ///
    /// # Example
    /// ```no_run
    /// use tide_chart_lib::tide_data::NoaaClient;
    ///
    /// # async fn run() -> Result<(), tide_chart_lib::tide_data::FetchError> {
    /// let client = NoaaClient::new()?;
    /// let series = client.fetch("8510560", "20240101", "20240108").await;
    /// if series.is_empty() {
    ///     println!("nothing to chart");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch(&self, station_id: &str, begin_date: &str, end_date: &str) -> TidePrediction {
        let outcome = self.try_fetch(station_id, begin_date, end_date).await;
        if let Some(notice) = empty_notice(&outcome) {
            let kind = match &outcome {
                Err(FetchError::Http(e)) if e.is_timeout() => "timeout",
                Err(FetchError::Http(_)) => "transport",
                Err(FetchError::Status { .. }) => "status",
                Err(FetchError::Decode(_)) => "decode",
                Err(FetchError::MissingPredictions { .. }) => "missing-predictions",
                Err(FetchError::Timestamp { .. } | FetchError::Height { .. }) => "coercion",
                Ok(_) => "no-records",
            };
            tracing::warn!(station = station_id, kind, "tide fetch returned no data: {notice}");
            println!("{notice}");
        }
        outcome.unwrap_or_default()
    }

    /// Fetch predictions, keeping the reason for any failure.
    pub async fn try_fetch(
        &self,
        station_id: &str,
        begin_date: &str,
        end_date: &str,
    ) -> Result<TidePrediction, FetchError> {
        tracing::info!(
            station = station_id,
            "fetching predictions from {begin_date} to {end_date}"
        );

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("product", "predictions"),
                ("station", station_id),
                ("begin_date", begin_date),
                ("end_date", end_date),
                ("datum", "MLLW"),
                ("units", "english"),
                ("time_zone", "lst_ldt"),
                ("format", "json"),
                ("application", APPLICATION),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: response.url().to_string(),
            });
        }

        let body = response.bytes().await?;
        let series = parse_predictions(&body)?;

        tracing::info!(
            station = station_id,
            records = series.len(),
            "predictions fetched and prepared"
        );
        Ok(series)
    }
}

/// Decode a NOAA JSON body into a [`TidePrediction`].
///
/// Strict: the first record whose `t` or `v` does not parse fails the
/// whole decode.
///
/// # Example
/// ```
/// use tide_chart_lib::tide_data::parse_predictions;
///
/// let body = br#"{"predictions":[{"t":"2024-01-01 06:00","v":"4.5"}]}"#;
/// let series = parse_predictions(body).unwrap();
/// assert_eq!(series.records[0].height_ft, 4.5);
/// ```
pub fn parse_predictions(body: &[u8]) -> Result<TidePrediction, FetchError> {
    let response: ApiResponse = serde_json::from_slice(body)?;

    let raw = response
        .predictions
        .ok_or_else(|| FetchError::MissingPredictions {
            message: response.error.map(|e| e.message),
        })?;

    let records = raw
        .into_iter()
        .enumerate()
        .map(|(index, p)| {
            let time = parse_time(&p.t).ok_or_else(|| FetchError::Timestamp {
                index,
                raw: p.t.clone(),
            })?;
            let height_ft = p.v.trim().parse::<f64>().map_err(|_| FetchError::Height {
                index,
                raw: p.v.clone(),
            })?;
            Ok(Prediction { time, height_ft })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    Ok(TidePrediction::new(records))
}

/// Diagnostic line for a fetch that leaves nothing to plot, `None` if there is data.
fn empty_notice(outcome: &Result<TidePrediction, FetchError>) -> Option<String> {
    match outcome {
        Ok(series) if series.is_empty() => Some(
            "No prediction records in the API response. Check your station ID and date range."
                .to_string(),
        ),
        Ok(_) => None,
        Err(error @ FetchError::MissingPredictions { .. }) => {
            Some(format!("{error}. Check your station ID and date range."))
        }
        Err(error) => Some(format!("Error fetching data from NOAA API: {error}")),
    }
}

/// NOAA sends `2024-01-01 06:00`; accept a seconds field too.
fn parse_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}
