//! Metrics registry for the form engine
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only when the registry is created

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one controller.
///
/// Counters use Relaxed ordering; exact cross-counter consistency is not needed.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    schemas_loaded: AtomicU64,
    schemas_rejected: AtomicU64,
    value_changes: AtomicU64,
    submits_attempted: AtomicU64,
    submits_rejected: AtomicU64,
    submits_ignored: AtomicU64,
    submits_succeeded: AtomicU64,
    submits_failed: AtomicU64,
    stale_completions: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_schemas_loaded(&self) {
        self.schemas_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_schemas_rejected(&self) {
        self.schemas_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_value_changes(&self) {
        self.value_changes.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts every `on_submit` call, whatever its outcome
    pub fn increment_submits_attempted(&self) {
        self.submits_attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_submits_rejected(&self) {
        self.submits_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_submits_ignored(&self) {
        self.submits_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_submits_succeeded(&self) {
        self.submits_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_submits_failed(&self) {
        self.submits_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_stale_completions(&self) {
        self.stale_completions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            schemas_loaded: self.schemas_loaded.load(Ordering::Relaxed),
            schemas_rejected: self.schemas_rejected.load(Ordering::Relaxed),
            value_changes: self.value_changes.load(Ordering::Relaxed),
            submits_attempted: self.submits_attempted.load(Ordering::Relaxed),
            submits_rejected: self.submits_rejected.load(Ordering::Relaxed),
            submits_ignored: self.submits_ignored.load(Ordering::Relaxed),
            submits_succeeded: self.submits_succeeded.load(Ordering::Relaxed),
            submits_failed: self.submits_failed.load(Ordering::Relaxed),
            stale_completions: self.stale_completions.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub schemas_loaded: u64,
    pub schemas_rejected: u64,
    pub value_changes: u64,
    pub submits_attempted: u64,
    pub submits_rejected: u64,
    pub submits_ignored: u64,
    pub submits_succeeded: u64,
    pub submits_failed: u64,
    pub stale_completions: u64,
}
