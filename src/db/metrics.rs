//! Store-level operation counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Live counters owned by the store. Atomic because queries run under the
/// shared read lock and still record themselves.
#[derive(Debug, Default)]
pub struct StoreMetrics {
    batches_committed: AtomicU64,
    batches_rolled_back: AtomicU64,
    events_applied: AtomicU64,
    queries_served: AtomicU64,
}

impl StoreMetrics {
    pub(crate) fn record_commit(&self, events: u64) {
        self.batches_committed.fetch_add(1, Ordering::Relaxed);
        self.events_applied.fetch_add(events, Ordering::Relaxed);
    }

    pub(crate) fn record_rollback(&self) {
        self.batches_rolled_back.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_query(&self) {
        self.queries_served.fetch_add(1, Ordering::Relaxed);
    }

    /// A point-in-time copy of the counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_committed: self.batches_committed.load(Ordering::Relaxed),
            batches_rolled_back: self.batches_rolled_back.load(Ordering::Relaxed),
            events_applied: self.events_applied.load(Ordering::Relaxed),
            queries_served: self.queries_served.load(Ordering::Relaxed),
        }
    }

    /// Zeroes all counters.
    pub fn reset(&self) {
        self.batches_committed.store(0, Ordering::Relaxed);
        self.batches_rolled_back.store(0, Ordering::Relaxed);
        self.events_applied.store(0, Ordering::Relaxed);
        self.queries_served.store(0, Ordering::Relaxed);
    }
}

/// Plain copy of [`StoreMetrics`] counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Ingestion batches fully applied.
    pub batches_committed: u64,
    /// Ingestion batches rejected with no state change.
    pub batches_rolled_back: u64,
    /// Events inside committed batches.
    pub events_applied: u64,
    /// Query-engine operations answered.
    pub queries_served: u64,
}
