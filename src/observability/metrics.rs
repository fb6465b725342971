//! Adapter counters and service runtime accounting
//!
//! - Counters only, monotonic
//! - Runtime accumulates time spent waiting on the remote service and is
//!   drained with `reset_runtime`, once per unit of caller work

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters for one adapter instance
#[derive(Debug, Default)]
pub struct AdapterMetrics {
    requests_sent: AtomicU64,
    responses_ok: AtomicU64,
    responses_rejected: AtomicU64,
    responses_failed: AtomicU64,
    timeouts: AtomicU64,
    batch_runs: AtomicU64,
    runtime_micros: AtomicU64,
}

impl AdapterMetrics {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_requests_sent(&self, count: u64) {
        self.requests_sent.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_ok(&self) {
        self.responses_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.responses_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed(&self) {
        self.responses_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_timeouts(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_batch_runs(&self) {
        self.batch_runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Add time spent waiting on the service
    pub fn add_runtime(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.runtime_micros.fetch_add(micros, Ordering::Relaxed);
    }

    /// Return the accumulated runtime and reset it to zero
    pub fn reset_runtime(&self) -> Duration {
        Duration::from_micros(self.runtime_micros.swap(0, Ordering::Relaxed))
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_sent: self.requests_sent.load(Ordering::Relaxed),
            responses_ok: self.responses_ok.load(Ordering::Relaxed),
            responses_rejected: self.responses_rejected.load(Ordering::Relaxed),
            responses_failed: self.responses_failed.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            batch_runs: self.batch_runs.load(Ordering::Relaxed),
            runtime: Duration::from_micros(self.runtime_micros.load(Ordering::Relaxed)),
        }
    }
}

/// Immutable view of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub requests_sent: u64,
    pub responses_ok: u64,
    pub responses_rejected: u64,
    /// Includes timeouts
    pub responses_failed: u64,
    pub timeouts: u64,
    pub batch_runs: u64,
    pub runtime: Duration,
}
