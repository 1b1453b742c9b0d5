use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing registry activity since startup.
#[derive(Default)]
pub struct RegistryMetrics {
    students_created: AtomicU64,
    students_updated: AtomicU64,
    students_deleted: AtomicU64,
    summaries_generated: AtomicU64,
    summary_failures: AtomicU64,
}

impl RegistryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful create.
    pub fn record_created(&self) {
        self.students_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful update.
    pub fn record_updated(&self) {
        self.students_updated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful delete.
    pub fn record_deleted(&self) {
        self.students_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of a summary request that reached the provider.
    pub fn record_summary(&self, succeeded: bool) {
        let counter = if succeeded {
            &self.summaries_generated
        } else {
            &self.summary_failures
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters alongside the live record count.
    pub fn snapshot(&self, students_stored: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            students_stored: students_stored as u64,
            students_created: self.students_created.load(Ordering::Relaxed),
            students_updated: self.students_updated.load(Ordering::Relaxed),
            students_deleted: self.students_deleted.load(Ordering::Relaxed),
            summaries_generated: self.summaries_generated.load(Ordering::Relaxed),
            summary_failures: self.summary_failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of registry counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Records currently held by the store.
    pub students_stored: u64,
    /// Successful creates since startup.
    pub students_created: u64,
    /// Successful updates since startup.
    pub students_updated: u64,
    /// Successful deletes since startup.
    pub students_deleted: u64,
    /// Summaries relayed from the provider.
    pub summaries_generated: u64,
    /// Summary requests the provider failed.
    pub summary_failures: u64,
}
