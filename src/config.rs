//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the tide-config.toml file.
//! It replaces hardcoded station and date choices with one explicit value that the
//! entry point passes down: which NOAA station to chart, how many days ahead to ask
//! for, and where the chart goes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration loaded from tide-config.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// NOAA station configuration
    pub station: StationConfig,
    /// Date range requested from NOAA
    #[serde(default)]
    pub window: WindowConfig,
    /// Chart output configuration
    #[serde(default)]
    pub chart: ChartConfig,
}

/// NOAA tide station configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct StationConfig {
    /// NOAA station ID (e.g., "8510560" for Montauk, NY)
    pub id: String,
    /// Human-readable station name, used in the chart title
    pub name: String,
}

/// Prediction window configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct WindowConfig {
    /// Days after today to request (range is inclusive: today..=today + days)
    pub days: i64,
}

/// Chart output configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct ChartConfig {
    /// SVG file the chart is written to
    pub output: PathBuf,
    /// Chart width in pixels
    pub width: u32,
    /// Chart height in pixels
    pub height: u32,
}

/// Longest window NOAA serves 6-minute predictions for in one request.
pub const MAX_WINDOW_DAYS: i64 = 365;

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig { days: 7 }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            output: PathBuf::from("tide-chart.svg"),
            width: 1400,
            height: 800,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            station: StationConfig {
                id: "8510560".to_string(),
                name: "Montauk, NY".to_string(),
            },
            window: WindowConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from tide-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path("tide-config.toml")
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) if !(0..=MAX_WINDOW_DAYS).contains(&config.window.days) => {
                    tracing::warn!(
                        "window.days = {} in {} is outside 0..={}",
                        config.window.days,
                        path.display(),
                        MAX_WINDOW_DAYS
                    );
                    tracing::warn!("using default configuration (Montauk, NY)");
                    Self::default()
                }
                Ok(config) => {
                    tracing::info!(
                        station = %config.station.id,
                        "loaded configuration for {}",
                        config.station.name
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!("invalid config file {}: {}", path.display(), e);
                    tracing::warn!("using default configuration (Montauk, NY)");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!(
                    "no config file at {}, using default configuration (Montauk, NY)",
                    path.display()
                );
                Self::default()
            }
        }
    }
}
