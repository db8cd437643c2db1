use serde::Serialize;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    sync_requests: AtomicU64,
    batches_loaded: AtomicU64,
    records_inserted: AtomicU64,
    validation_rejections: AtomicU64,
    storage_failures: AtomicU64,
}

/// Process-wide counters, cheap to clone and share between handlers.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub sync_requests: u64,
    pub batches_loaded: u64,
    pub records_inserted: u64,
    pub validation_rejections: u64,
    pub storage_failures: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_requests(&self) {
        self.inner.sync_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load(&self, records: u64) {
        self.inner.batches_loaded.fetch_add(1, Ordering::Relaxed);
        self.inner
            .records_inserted
            .fetch_add(records, Ordering::Relaxed);
    }

    pub fn increment_rejections(&self) {
        self.inner
            .validation_rejections
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_storage_failures(&self) {
        self.inner.storage_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sync_requests: self.inner.sync_requests.load(Ordering::Relaxed),
            batches_loaded: self.inner.batches_loaded.load(Ordering::Relaxed),
            records_inserted: self.inner.records_inserted.load(Ordering::Relaxed),
            validation_rejections: self.inner.validation_rejections.load(Ordering::Relaxed),
            storage_failures: self.inner.storage_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
