//! Fetch → render, end to end.

use super::stub;
use chrono::NaiveDate;
use tempfile::tempdir;
use tide_chart_lib::{
    renderer::{render, ChartSink, RenderError, Rendered, TideChart},
    svg_renderer::SvgChart,
    tide_data::{parse_predictions, NoaaClient, REQUEST_TIMEOUT},
    TidePrediction,
};

const SCENARIO: &str = r#"{"predictions":[{"t":"2024-01-01 00:00","v":"2.1"},{"t":"2024-01-01 06:00","v":"4.5"},{"t":"2024-01-01 12:00","v":"0.3"},{"t":"2024-01-01 18:00","v":"4.0"}]}"#;

#[derive(Default)]
struct RecordingSink {
    charts: Vec<TideChart>,
}

impl ChartSink for RecordingSink {
    fn draw(&mut self, chart: &TideChart) -> Result<(), RenderError> {
        self.charts.push(chart.clone());
        Ok(())
    }
}

#[tokio::test]
async fn scenario_fetches_four_records_and_draws_one_line() {
    let server = stub::respond_with("200 OK", SCENARIO).await;
    let client = NoaaClient::with_endpoint(&server.url, REQUEST_TIMEOUT).unwrap();
    let series = client.fetch("8510560", "20240101", "20240101").await;

    assert_eq!(series.heights(), vec![2.1, 4.5, 0.3, 4.0]);
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let times: Vec<_> = series.records.iter().map(|p| p.time).collect();
    assert_eq!(
        times,
        vec![
            day.and_hms_opt(0, 0, 0).unwrap(),
            day.and_hms_opt(6, 0, 0).unwrap(),
            day.and_hms_opt(12, 0, 0).unwrap(),
            day.and_hms_opt(18, 0, 0).unwrap(),
        ]
    );

    let mut sink = RecordingSink::default();
    assert_eq!(
        render(&series, "Montauk, NY", &mut sink).unwrap(),
        Rendered::Drawn
    );
    assert_eq!(sink.charts.len(), 1);
    let chart = &sink.charts[0];
    assert_eq!(chart.line.len(), 4);
    assert_eq!(chart.highs.len(), 1);
    assert_eq!(chart.highs[0].height_ft, 4.5);
    assert_eq!(chart.lows.len(), 1);
    assert_eq!(chart.lows[0].height_ft, 0.3);
}

#[test]
fn scenario_renders_to_svg() {
    let series = parse_predictions(SCENARIO.as_bytes()).unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("tide-chart.svg");
    let mut sink = SvgChart::new(&path, 1400, 800);

    assert_eq!(
        render(&series, "Montauk, NY", &mut sink).unwrap(),
        Rendered::Drawn
    );
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("Tide Predictions for Montauk, NY"));
    assert!(svg.contains("Date and Time (Local)"));
    assert!(svg.contains("Tide Height (feet)"));
}

#[test]
fn empty_series_writes_no_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("never.svg");
    let mut sink = SvgChart::new(&path, 1400, 800);

    assert_eq!(
        render(&TidePrediction::default(), "Montauk, NY", &mut sink).unwrap(),
        Rendered::Skipped
    );
    assert!(!path.exists());
}
