//! Grid ingestion pipeline.
//!
//! The coordinate loop runs sequentially: fetch one forecast, hand its hourly
//! entries to background tasks, pause, move to the next cell. Each batch's
//! tasks form their own [`BatchTasks`] group and share one bounded pool of
//! write permits. The loop never waits on writes; outstanding groups are
//! awaited once, after the last coordinate.
//!
//! Errors never leave the iteration or task that produced them: failed
//! fetches skip the coordinate, invalid or unwritable entries are dropped.
//! Nothing is retried.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use forecast_common::{
    validate, Coordinate, ForecastBatch, ForecastEntry, GridParameters, GridWalker,
};
use storage::GeoRecordWriter;

use crate::provider::ForecastProvider;
use crate::stats::{RunStats, RunSummary};

/// Tuning knobs for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Delay after each coordinate, to stay inside provider rate limits.
    pub pace: Duration,
    /// Maximum number of entries validated/written at the same time.
    pub max_concurrent_writes: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            pace: Duration::from_secs(1),
            max_concurrent_writes: 16,
        }
    }
}

/// Background tasks spawned for one forecast batch.
///
/// Dropping a group aborts whatever it still has running.
#[must_use = "dropping BatchTasks aborts its writes"]
pub struct BatchTasks {
    origin: Coordinate,
    tasks: JoinSet<()>,
}

impl BatchTasks {
    /// Coordinate reported by the provider for this batch.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Tasks not yet reaped.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Collect tasks that already finished, without waiting.
    pub fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            log_join_result(self.origin, result);
        }
    }

    /// Wait for every task in the group.
    pub async fn wait(mut self) {
        while let Some(result) = self.tasks.join_next().await {
            log_join_result(self.origin, result);
        }
    }
}

fn log_join_result(origin: Coordinate, result: Result<(), JoinError>) {
    if let Err(e) = result {
        error!(coordinate = %origin, error = %e, "Entry task did not complete");
    }
}

/// Main ingestion pipeline.
pub struct IngestionPipeline {
    provider: Arc<dyn ForecastProvider>,
    writer: GeoRecordWriter,
    options: PipelineOptions,
    permits: Arc<Semaphore>,
    stats: Arc<RunStats>,
}

impl IngestionPipeline {
    pub fn new(
        provider: Arc<dyn ForecastProvider>,
        writer: GeoRecordWriter,
        options: PipelineOptions,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(options.max_concurrent_writes.max(1)));
        Self {
            provider,
            writer,
            options,
            permits,
            stats: Arc::new(RunStats::default()),
        }
    }

    /// Current counters.
    pub fn summary(&self) -> RunSummary {
        self.stats.snapshot()
    }

    /// Walk the whole grid once, then wait for outstanding writes.
    ///
    /// Counters restart at zero, so the summary covers this run only.
    pub async fn run(&self, params: GridParameters) -> RunSummary {
        self.stats.reset();
        info!(
            start = %params.start,
            step_distance_km = params.step_distance_km,
            duration_secs = params.duration_secs,
            cells = params.cell_count(),
            "Starting loading process"
        );

        let mut walker = GridWalker::new(params);
        let mut pending: Vec<BatchTasks> = Vec::new();

        while let Some(coordinate) = walker.next() {
            if let Some(tasks) = self.ingest_coordinate(coordinate).await {
                pending.push(tasks);
            }

            for tasks in pending.iter_mut() {
                tasks.reap();
            }
            pending.retain(|tasks| !tasks.is_empty());

            if walker.is_finished() {
                break;
            }
            tokio::time::sleep(self.options.pace).await;
        }

        let outstanding: usize = pending.iter().map(BatchTasks::len).sum();
        info!(outstanding, "Traversal complete, waiting for in-flight writes");

        for tasks in pending {
            tasks.wait().await;
        }

        let summary = self.summary();
        info!(
            coordinates = summary.coordinates,
            fetch_failures = summary.fetch_failures,
            entries = summary.entries_dispatched,
            invalid = summary.entries_invalid,
            stored = summary.records_stored,
            store_failures = summary.store_failures,
            "Loading process complete"
        );
        summary
    }

    /// Fetch one coordinate and dispatch its entries.
    ///
    /// Returns `None` when the fetch failed; the error is logged.
    pub async fn ingest_coordinate(&self, coordinate: Coordinate) -> Option<BatchTasks> {
        RunStats::incr(&self.stats.coordinates);
        info!(lat = coordinate.lat, lon = coordinate.lon, "Retrieving hourly weather");

        match self.provider.fetch_forecast(coordinate).await {
            Ok(batch) => Some(self.dispatch_batch(batch)),
            Err(e) => {
                RunStats::incr(&self.stats.fetch_failures);
                error!(
                    lat = coordinate.lat,
                    lon = coordinate.lon,
                    error = %e,
                    "Forecast fetch failed"
                );
                None
            }
        }
    }

    /// Spawn one validate-and-store task per hourly entry.
    ///
    /// Returns immediately; tasks wait for a write permit on their own.
    pub fn dispatch_batch(&self, batch: ForecastBatch) -> BatchTasks {
        let origin = batch.coordinate();
        let mut tasks = JoinSet::new();

        for entry in batch.hourly {
            RunStats::incr(&self.stats.entries_dispatched);

            let writer = self.writer.clone();
            let permits = self.permits.clone();
            let stats = self.stats.clone();

            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                process_entry(&writer, &stats, &entry, origin).await;
            });
        }

        debug!(coordinate = %origin, tasks = tasks.len(), "Dispatched hourly entries");
        BatchTasks { origin, tasks }
    }
}

async fn process_entry(
    writer: &GeoRecordWriter,
    stats: &RunStats,
    entry: &ForecastEntry,
    origin: Coordinate,
) {
    let forecast_time = entry
        .forecast_time()
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();

    if let Err(e) = validate(entry) {
        RunStats::incr(&stats.entries_invalid);
        warn!(
            coordinate = %origin,
            epoch = entry.timestamp_epoch,
            forecast_time = %forecast_time,
            error = %e,
            "Invalid hourly data"
        );
        return;
    }

    match writer.write(entry, origin).await {
        Ok(_) => RunStats::incr(&stats.records_stored),
        Err(e) => {
            RunStats::incr(&stats.store_failures);
            warn!(
                coordinate = %origin,
                epoch = entry.timestamp_epoch,
                forecast_time = %forecast_time,
                error = %e,
                "Error inserting weather data"
            );
        }
    }
}
