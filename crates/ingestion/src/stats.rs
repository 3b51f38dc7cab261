//! Counters for a single loader run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, shared between the coordinate loop and the write tasks.
#[derive(Debug, Default)]
pub struct RunStats {
    pub coordinates: AtomicU64,
    pub fetch_failures: AtomicU64,
    pub entries_dispatched: AtomicU64,
    pub entries_invalid: AtomicU64,
    pub records_stored: AtomicU64,
    pub store_failures: AtomicU64,
}

impl RunStats {
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Zero every counter.
    pub fn reset(&self) {
        for counter in [
            &self.coordinates,
            &self.fetch_failures,
            &self.entries_dispatched,
            &self.entries_invalid,
            &self.records_stored,
            &self.store_failures,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> RunSummary {
        RunSummary {
            coordinates: self.coordinates.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            entries_dispatched: self.entries_dispatched.load(Ordering::Relaxed),
            entries_invalid: self.entries_invalid.load(Ordering::Relaxed),
            records_stored: self.records_stored.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`RunStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub coordinates: u64,
    pub fetch_failures: u64,
    pub entries_dispatched: u64,
    pub entries_invalid: u64,
    pub records_stored: u64,
    pub store_failures: u64,
}

impl RunSummary {
    /// Entries whose task has not reached a final outcome yet.
    pub fn entries_in_flight(&self) -> u64 {
        self.entries_dispatched
            .saturating_sub(self.entries_invalid + self.records_stored + self.store_failures)
    }
}
