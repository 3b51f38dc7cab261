//! Stand-ins for the forecast provider and the geo store.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use forecast_common::{Coordinate, ForecastBatch, LoaderError, LoaderResult};
use ingestion::ForecastProvider;
use storage::{GeoMember, GeoStore, MemoryGeoStore};
use test_utils::sample_batch;

type Script = Box<dyn Fn(Coordinate, usize) -> LoaderResult<ForecastBatch> + Send + Sync>;

/// Provider answering from a closure of `(coordinate, call_index)`.
pub struct ScriptedProvider {
    script: Script,
    calls: Mutex<Vec<Coordinate>>,
}

impl ScriptedProvider {
    pub fn new(
        script: impl Fn(Coordinate, usize) -> LoaderResult<ForecastBatch> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every coordinate gets `hours` valid entries echoing its position.
    pub fn uniform(hours: usize) -> Self {
        Self::new(move |c, _| Ok(sample_batch(c.lat, c.lon, hours)))
    }

    pub fn calls(&self) -> Vec<Coordinate> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ForecastProvider for ScriptedProvider {
    async fn fetch_forecast(&self, coordinate: Coordinate) -> LoaderResult<ForecastBatch> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(coordinate);
            calls.len() - 1
        };
        (self.script)(coordinate, index)
    }
}

/// Memory store with optional latency, failure keys and concurrency tracking.
#[derive(Default)]
pub struct InstrumentedStore {
    pub inner: MemoryGeoStore,
    delay: Option<Duration>,
    fail_keys: HashSet<String>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InstrumentedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_on(mut self, key: impl Into<String>) -> Self {
        self.fail_keys.insert(key.into());
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoStore for InstrumentedStore {
    async fn put(&self, key: &str, member: &GeoMember) -> LoaderResult<u64> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = if self.fail_keys.contains(key) {
            Err(LoaderError::Store(format!("refusing key {}", key)))
        } else {
            self.inner.put(key, member).await
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
