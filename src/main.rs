//! # Tide Chart Application Entry Point
//!
//! Fetches one week of NOAA tide predictions for the configured station and
//! draws a chart of them with the highs and lows marked. Production mode
//! writes an SVG file; `--stdout` draws the chart in the terminal instead.

// Test modules
#[cfg(test)]
mod tests;

use chrono::Local;
use std::env;
use tide_chart_lib::{
    config::Config,
    renderer::{self, AsciiChart, Rendered},
    svg_renderer::SvgChart,
    tide_data::{NoaaClient, RequestWindow},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout only carries operator diagnostics
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tide_chart=info,tide_chart_lib=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Development mode: render to stdout for testing without a viewer
    let development_mode = env::args().any(|arg| arg == "--stdout");

    let config = Config::load();
    let today = Local::now().date_naive();
    let window = RequestWindow::starting(today, config.window.days).ok_or_else(|| {
        anyhow::anyhow!(
            "window of {} days from {today} is past the last representable date",
            config.window.days
        )
    })?;
    let (begin_date, end_date) = window.query_dates();

    // Create Tokio runtime for the single async request
    let rt = tokio::runtime::Runtime::new()?;
    let client = NoaaClient::new()?;
    let predictions = rt.block_on(client.fetch(&config.station.id, &begin_date, &end_date));

    if predictions.is_empty() {
        println!("Data could not be retrieved. Please check your station ID and date range.");
        return Ok(());
    }

    if development_mode {
        renderer::render(&predictions, &config.station.name, &mut AsciiChart::stdout())?;
        return Ok(());
    }

    let mut chart = SvgChart::new(
        &config.chart.output,
        config.chart.width,
        config.chart.height,
    );
    if renderer::render(&predictions, &config.station.name, &mut chart)? == Rendered::Drawn {
        println!("Tide chart saved to {}", chart.path().display());
    }

    Ok(())
}
