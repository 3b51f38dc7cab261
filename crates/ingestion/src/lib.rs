//! Forecast grid ingestion library.
//!
//! Walks a square grid of coordinates, fetches an hourly forecast for each
//! one and stores every valid hour in a geo-indexed store.
//!
//! # Architecture
//!
//! - [`ForecastProvider`]: where forecasts come from (OpenWeather One Call)
//! - [`IngestionPipeline`]: the coordinate loop and per-entry fan-out
//! - [`RunStats`]: counters reported at the end of a run
//!
//! Geometry, the data model and validation live in `forecast-common`;
//! persistence lives in `storage`.

pub mod pipeline;
pub mod provider;
pub mod stats;

// Re-exports
pub use pipeline::{BatchTasks, IngestionPipeline, PipelineOptions};
pub use provider::{ForecastProvider, OpenWeatherClient, OpenWeatherConfig};
pub use stats::{RunStats, RunSummary};
