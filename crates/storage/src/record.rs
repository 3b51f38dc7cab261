//! Persisting forecast entries as geo members.
//!
//! Every entry is stored under its forecast hour (`dt` as a decimal string).
//! The member name is a JSON document carrying an identity plus the entry
//! itself, positioned at the coordinate the forecast was requested for.
//!
//! The identity keeps entries from different coordinates apart when their
//! serialized forecasts happen to be identical: without it, a second
//! coordinate would only move the first one's member instead of adding its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use forecast_common::{Coordinate, ForecastEntry, LoaderResult};

use crate::geo_store::{GeoMember, GeoStore};

/// How the identity part of a stored member is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityStrategy {
    /// `"{lat},{lon}@{dt}"`: deterministic, rewrites are idempotent.
    #[default]
    Coordinate,
    /// A fresh UUID per write: nothing is ever overwritten.
    Random,
}

impl FromStr for IdentityStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coordinate" => Ok(IdentityStrategy::Coordinate),
            "random" => Ok(IdentityStrategy::Random),
            other => Err(format!(
                "unknown identity strategy '{}' (expected 'coordinate' or 'random')",
                other
            )),
        }
    }
}

impl fmt::Display for IdentityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityStrategy::Coordinate => write!(f, "coordinate"),
            IdentityStrategy::Random => write!(f, "random"),
        }
    }
}

/// Serialized form of a member name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub hourly: ForecastEntry,
}

/// Store key for an entry: its forecast hour as a decimal string.
pub fn record_key(entry: &ForecastEntry) -> String {
    entry.timestamp_epoch.to_string()
}

/// Writes forecast entries into a [`GeoStore`].
#[derive(Clone)]
pub struct GeoRecordWriter {
    store: Arc<dyn GeoStore>,
    strategy: IdentityStrategy,
}

impl GeoRecordWriter {
    pub fn new(store: Arc<dyn GeoStore>, strategy: IdentityStrategy) -> Self {
        Self { store, strategy }
    }

    /// Identity token for an entry fetched at `coordinate`.
    pub fn identity(&self, entry: &ForecastEntry, coordinate: Coordinate) -> String {
        match self.strategy {
            IdentityStrategy::Coordinate => {
                format!("{}@{}", coordinate, entry.timestamp_epoch)
            }
            IdentityStrategy::Random => Uuid::new_v4().to_string(),
        }
    }

    /// Build the positioned member for an entry.
    pub fn member(&self, entry: &ForecastEntry, coordinate: Coordinate) -> LoaderResult<GeoMember> {
        let record = StoredRecord {
            id: self.identity(entry, coordinate),
            hourly: entry.clone(),
        };

        Ok(GeoMember {
            name: serde_json::to_string(&record)?,
            lat: coordinate.lat,
            lon: coordinate.lon,
        })
    }

    /// Persist one entry. Returns the store's added-member count.
    pub async fn write(&self, entry: &ForecastEntry, coordinate: Coordinate) -> LoaderResult<u64> {
        let key = record_key(entry);
        let member = self.member(entry, coordinate)?;
        self.store.put(&key, &member).await
    }
}
