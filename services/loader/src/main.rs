//! Forecast grid loader.
//!
//! Walks a square grid of coordinates once, fetches the hourly forecast for
//! each cell from OpenWeather and stores every valid hour in a geo-indexed
//! store keyed by the forecast timestamp:
//! - One request per coordinate, paced to stay inside provider rate limits
//! - Hourly entries validated and written in the background
//! - Fetch and write failures are logged and skipped
//! - Exits once the grid is covered and every write has settled

mod config;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::{Args, LoaderConfig};
use ingestion::{IngestionPipeline, OpenWeatherClient};
use storage::{GeoRecordWriter, GeoStore, MemoryGeoStore, RedisGeoStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting forecast grid loader");

    let config = LoaderConfig::try_from(args)?;
    info!(
        start = %config.grid.start,
        step_distance_km = config.grid.step_distance_km,
        duration_secs = config.grid.duration_secs,
        pace_ms = config.pipeline.pace.as_millis() as u64,
        max_concurrent_writes = config.pipeline.max_concurrent_writes,
        identity = %config.identity,
        dry_run = config.dry_run,
        "Configuration loaded"
    );

    let provider = Arc::new(OpenWeatherClient::new(&config.provider)?);

    let store: Arc<dyn GeoStore> = if config.dry_run {
        info!("Dry run: records are kept in memory only");
        Arc::new(MemoryGeoStore::new())
    } else {
        let store = RedisGeoStore::connect(&config.redis_url).await?;
        info!(url = %config.redis_url, "Connected to Redis");
        Arc::new(store)
    };

    let writer = GeoRecordWriter::new(store, config.identity);
    let pipeline = IngestionPipeline::new(provider, writer, config.pipeline.clone());

    let summary = pipeline.run(config.grid).await;

    if summary.coordinates > 0 && summary.fetch_failures == summary.coordinates {
        warn!(
            coordinates = summary.coordinates,
            "No forecast could be retrieved; check the API key and base URL"
        );
    }

    info!(
        coordinates = summary.coordinates,
        records_stored = summary.records_stored,
        "Loader finished"
    );

    Ok(())
}
