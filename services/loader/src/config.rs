//! Loader configuration.
//!
//! Every setting can be passed as a flag or through the environment (a `.env`
//! file is honoured). The environment variable names are the ones existing
//! deployments already use. Everything is validated before any connection is
//! opened; a bad value aborts the run.

use clap::Parser;
use reqwest::Url;
use std::time::Duration;

use forecast_common::{Coordinate, GridParameters, LoaderError, LoaderResult};
use ingestion::{OpenWeatherConfig, PipelineOptions};
use storage::{redis_url, IdentityStrategy};

#[derive(Parser, Debug, Clone)]
#[command(name = "loader")]
#[command(about = "Populate a geo store with hourly forecasts over a coordinate grid")]
pub struct Args {
    /// Distance between neighbouring grid cells, in km
    #[arg(long, env = "loader_stepdistance", allow_negative_numbers = true)]
    pub step_distance: f64,

    /// Traversal time budget, in minutes (one coordinate per second)
    #[arg(long, env = "loader_duration")]
    pub duration: u64,

    /// Latitude of the grid's north-west corner
    #[arg(long, env = "loader_start_lat", allow_negative_numbers = true)]
    pub start_lat: f64,

    /// Longitude of the grid's north-west corner
    #[arg(long, env = "loader_start_lon", allow_negative_numbers = true)]
    pub start_lon: f64,

    /// OpenWeather API key
    #[arg(long, env = "openweather_apikey", hide_env_values = true)]
    pub api_key: String,

    /// OpenWeather One Call endpoint
    #[arg(long, env = "openweather_baseurl")]
    pub base_url: String,

    /// Redis address (`host:port` or `redis://...`)
    #[arg(long, env = "redis_address")]
    pub redis_address: String,

    /// Delay between coordinates, in milliseconds
    #[arg(long, env = "LOADER_PACE_MS", default_value = "1000")]
    pub pace_ms: u64,

    /// Maximum number of concurrent store writes
    #[arg(long, env = "LOADER_MAX_CONCURRENT_WRITES", default_value = "16")]
    pub max_concurrent_writes: usize,

    /// Forecast request timeout, in seconds
    #[arg(long, default_value = "30")]
    pub request_timeout_secs: u64,

    /// Stored member identity: `coordinate` or `random`
    #[arg(long, env = "LOADER_IDENTITY", default_value = "coordinate")]
    pub identity: IdentityStrategy,

    /// Write to an in-memory store instead of Redis
    #[arg(long)]
    pub dry_run: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub grid: GridParameters,
    pub provider: OpenWeatherConfig,
    pub redis_url: String,
    pub pipeline: PipelineOptions,
    pub identity: IdentityStrategy,
    pub dry_run: bool,
}

fn invalid(message: impl Into<String>) -> LoaderError {
    LoaderError::Config(message.into())
}

impl TryFrom<Args> for LoaderConfig {
    type Error = LoaderError;

    fn try_from(args: Args) -> LoaderResult<Self> {
        if !args.step_distance.is_finite() || args.step_distance <= 0.0 {
            return Err(invalid(format!(
                "step distance must be a positive number of km, got {}",
                args.step_distance
            )));
        }
        if args.duration == 0 {
            return Err(invalid("duration must be at least one minute"));
        }
        let Some(duration_secs) = args.duration.checked_mul(60) else {
            return Err(invalid(format!(
                "duration of {} minutes is too large",
                args.duration
            )));
        };
        let start = Coordinate::new(args.start_lat, args.start_lon);
        if !start.is_valid() {
            return Err(invalid(format!(
                "start coordinate {} outside latitude [-90, 90] / longitude [-180, 180)",
                start
            )));
        }
        if args.api_key.trim().is_empty() {
            return Err(invalid("missing OpenWeather API key"));
        }
        if let Err(e) = Url::parse(&args.base_url) {
            return Err(invalid(format!(
                "invalid OpenWeather base URL '{}': {}",
                args.base_url, e
            )));
        }
        if args.redis_address.trim().is_empty() && !args.dry_run {
            return Err(invalid("missing Redis address"));
        }
        if args.max_concurrent_writes == 0 {
            return Err(invalid("max concurrent writes must be at least 1"));
        }
        if args.request_timeout_secs == 0 {
            return Err(invalid("request timeout must be at least one second"));
        }

        Ok(Self {
            grid: GridParameters::new(args.step_distance, duration_secs as f64, start),
            provider: OpenWeatherConfig {
                api_key: args.api_key,
                base_url: args.base_url,
                request_timeout: Duration::from_secs(args.request_timeout_secs),
            },
            redis_url: redis_url(&args.redis_address),
            pipeline: PipelineOptions {
                pace: Duration::from_millis(args.pace_ms),
                max_concurrent_writes: args.max_concurrent_writes,
            },
            identity: args.identity,
            dry_run: args.dry_run,
        })
    }
}
