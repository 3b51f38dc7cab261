//! Common test fixtures for forecast loader tests.
//!
//! Pre-built forecast entries and batches that represent the usual shapes of
//! provider responses, plus a raw One Call JSON body for decoder tests.

use forecast_common::{Condition, ForecastBatch, ForecastEntry};

/// Common starting coordinates for grid tests, as `(lat, lon)`.
pub mod coords {
    pub const EQUATOR: (f64, f64) = (0.0, 0.0);

    /// Just west of the antimeridian.
    pub const DATELINE: (f64, f64) = (0.0, 179.5);

    /// Seattle, WA
    pub const SEATTLE: (f64, f64) = (47.6062, -122.3321);
}

/// First hour used by the fixtures (2023-11-14T22:00:00Z).
pub const BASE_EPOCH: i64 = 1_699_999_200;

/// A complete, valid condition.
pub fn clear_sky() -> Condition {
    Condition {
        id: 800,
        main: "Clear".to_string(),
        description: "clear sky".to_string(),
        icon: "01d".to_string(),
    }
}

/// A second valid condition, for telling entries apart.
pub fn light_rain() -> Condition {
    Condition {
        id: 500,
        main: "Rain".to_string(),
        description: "light rain".to_string(),
        icon: "10d".to_string(),
    }
}

/// A valid entry at `timestamp_epoch`.
pub fn sample_entry(timestamp_epoch: i64) -> ForecastEntry {
    ForecastEntry {
        timestamp_epoch,
        conditions: vec![clear_sky()],
        precipitation_probability: 0.0,
    }
}

/// An entry the validator rejects with "missing hourly weather".
pub fn entry_without_weather(timestamp_epoch: i64) -> ForecastEntry {
    ForecastEntry {
        timestamp_epoch,
        conditions: Vec::new(),
        precipitation_probability: 0.3,
    }
}

/// An entry the validator rejects with "missing hourly weather id".
pub fn entry_without_weather_id(timestamp_epoch: i64) -> ForecastEntry {
    ForecastEntry {
        timestamp_epoch,
        conditions: vec![Condition {
            id: 0,
            ..light_rain()
        }],
        precipitation_probability: 0.8,
    }
}

/// A batch of `hours` consecutive valid entries starting at [`BASE_EPOCH`].
pub fn sample_batch(lat: f64, lon: f64, hours: usize) -> ForecastBatch {
    ForecastBatch {
        lat,
        lon,
        hourly: (0..hours)
            .map(|h| sample_entry(BASE_EPOCH + h as i64 * 3600))
            .collect(),
    }
}

/// Raw One Call response body with two hourly entries, the second one
/// lacking weather conditions.
pub fn one_call_json(lat: f64, lon: f64) -> String {
    serde_json::json!({
        "lat": lat,
        "lon": lon,
        "timezone": "UTC",
        "timezone_offset": 0,
        "hourly": [
            {
                "dt": BASE_EPOCH,
                "temp": 11.3,
                "humidity": 71,
                "weather": [
                    {"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}
                ],
                "pop": 0
            },
            {
                "dt": BASE_EPOCH + 3600,
                "temp": 10.9,
                "humidity": 74,
                "weather": [],
                "pop": 0.12
            }
        ]
    })
    .to_string()
}
