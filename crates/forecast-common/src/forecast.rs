//! Hourly forecast data model.
//!
//! Field names follow the OpenWeather One Call response so batches can be
//! decoded directly. Every field defaults when absent: rejecting incomplete
//! entries is the validator's job, not the decoder's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// Forecast response for a single coordinate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastBatch {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub hourly: Vec<ForecastEntry>,
}

impl ForecastBatch {
    /// Coordinate the provider reports for this batch.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// One hour of forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Forecast time, unix seconds.
    #[serde(rename = "dt", default)]
    pub timestamp_epoch: i64,
    #[serde(rename = "weather", default)]
    pub conditions: Vec<Condition>,
    /// Probability of precipitation, 0.0 to 1.0.
    #[serde(rename = "pop", default)]
    pub precipitation_probability: f64,
}

impl ForecastEntry {
    pub fn forecast_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp_epoch, 0)
    }
}

/// Weather condition code with its human-readable labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}
