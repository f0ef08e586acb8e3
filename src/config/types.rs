//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, ValueEnum};
use thiserror::Error;

use crate::config::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// A configuration value that failed validation.
#[derive(Debug, Error)]
#[error("invalid {field}: {message}")]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong with it and what is accepted
    pub message: String,
}

impl ConfigValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Library configuration.
///
/// Usable programmatically through `Default`, and flattened into the CLI
/// options by the binary.
///
/// # Examples
///
/// ```
/// use poi_guide::Config;
///
/// let config = Config {
///     bbox_epsilon: 0.005,
///     guide_displacement_m: 3.0,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Map-data endpoint queried with a `bbox` parameter
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,

    /// Half-width of the query window around the camera position, in degrees
    #[arg(long, default_value_t = DEFAULT_BBOX_EPSILON)]
    pub bbox_epsilon: f64,

    /// Distance from the user to the guide entity, in meters
    #[arg(long, default_value_t = DEFAULT_GUIDE_DISPLACEMENT_M)]
    pub guide_displacement_m: f64,

    /// How long the guide entity stays placed, in milliseconds
    #[arg(long, default_value_t = DEFAULT_GUIDE_LIFETIME_MS)]
    pub guide_lifetime_ms: u64,

    /// Delay before the name overlay is cleared, in milliseconds
    #[arg(long, default_value_t = DEFAULT_OVERLAY_NAME_CLEAR_MS)]
    pub overlay_name_clear_ms: u64,

    /// Delay before the information overlay is shown, in milliseconds
    #[arg(long, default_value_t = DEFAULT_OVERLAY_INFO_DELAY_MS)]
    pub overlay_info_delay_ms: u64,

    /// Delay before the information overlay is cleared, in milliseconds
    #[arg(long, default_value_t = DEFAULT_OVERLAY_INFO_CLEAR_MS)]
    pub overlay_info_clear_ms: u64,

    /// Place N/E/S/W markers around the first camera position
    #[arg(long)]
    pub cardinal_markers: bool,

    /// Distance of the cardinal markers from the camera, in meters
    #[arg(long, default_value_t = DEFAULT_CARDINAL_MARKER_DISTANCE_M)]
    pub cardinal_marker_distance_m: f64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            bbox_epsilon: DEFAULT_BBOX_EPSILON,
            guide_displacement_m: DEFAULT_GUIDE_DISPLACEMENT_M,
            guide_lifetime_ms: DEFAULT_GUIDE_LIFETIME_MS,
            overlay_name_clear_ms: DEFAULT_OVERLAY_NAME_CLEAR_MS,
            overlay_info_delay_ms: DEFAULT_OVERLAY_INFO_DELAY_MS,
            overlay_info_clear_ms: DEFAULT_OVERLAY_INFO_CLEAR_MS,
            cardinal_markers: false,
            cardinal_marker_distance_m: DEFAULT_CARDINAL_MARKER_DISTANCE_M,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Checks that every value is usable before a session is built.
    ///
    /// # Errors
    ///
    /// Returns the first offending field with a description of the accepted range.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if url::Url::parse(&self.feed_url).is_err() {
            return Err(ConfigValidationError::new(
                "feed_url",
                format!("'{}' is not an absolute URL", self.feed_url),
            ));
        }
        if !self.bbox_epsilon.is_finite()
            || self.bbox_epsilon <= 0.0
            || self.bbox_epsilon > MAX_BBOX_EPSILON
        {
            return Err(ConfigValidationError::new(
                "bbox_epsilon",
                format!("must be greater than 0 and at most {MAX_BBOX_EPSILON} degrees"),
            ));
        }
        if !self.guide_displacement_m.is_finite() || self.guide_displacement_m <= 0.0 {
            return Err(ConfigValidationError::new(
                "guide_displacement_m",
                "must be a finite distance greater than 0",
            ));
        }
        if !self.cardinal_marker_distance_m.is_finite() || self.cardinal_marker_distance_m <= 0.0 {
            return Err(ConfigValidationError::new(
                "cardinal_marker_distance_m",
                "must be a finite distance greater than 0",
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigValidationError::new(
                "timeout_seconds",
                "must be greater than 0",
            ));
        }
        if self.overlay_name_clear_ms >= self.overlay_info_delay_ms {
            return Err(ConfigValidationError::new(
                "overlay_name_clear_ms",
                "must be earlier than overlay_info_delay_ms",
            ));
        }
        if self.overlay_info_delay_ms >= self.overlay_info_clear_ms {
            return Err(ConfigValidationError::new(
                "overlay_info_clear_ms",
                "must be later than overlay_info_delay_ms",
            ));
        }
        Ok(())
    }

    /// Guide lifetime as a `Duration`.
    pub fn guide_lifetime(&self) -> Duration {
        Duration::from_millis(self.guide_lifetime_ms)
    }
}

/// Command-line options for the `poi_guide` binary.
#[derive(Debug, Parser)]
#[command(
    name = "poi_guide",
    about = "Fetches named points of interest around a position and places a guide toward one."
)]
pub struct Opt {
    /// Latitude of the simulated camera position
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    /// Longitude of the simulated camera position
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,

    /// Index of the POI to click after ingestion
    #[arg(long)]
    pub select: Option<usize>,

    /// JSON route payload to log alongside the session
    #[arg(long, value_parser)]
    pub route_file: Option<PathBuf>,

    #[command(flatten)]
    pub config: Config,
}
