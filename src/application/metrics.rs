//! Observability metrics for the submission pipeline.
//!
//! Counts what happened to each submission attempt, stage by stage.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking submission outcomes.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Permits consumed by submission attempts
    admissions: AtomicU64,
    /// Submissions the transport delivered
    delivered: AtomicU64,
    /// Attempts that waited too long or hit a closed gate
    gate_rejections: AtomicU64,
    /// Attempts with no registered encoder
    unsupported_formats: AtomicU64,
    /// Attempts whose document could not be encoded
    encoding_failures: AtomicU64,
    /// Attempts the transport failed to deliver
    transport_failures: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    pub(crate) fn record_admission(&self) {
        self.inner.admissions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(&self) {
        self.inner.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_gate_rejection(&self) {
        self.inner.gate_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unsupported_format(&self) {
        self.inner
            .unsupported_formats
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_encoding_failure(&self) {
        self.inner.encoding_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transport_failure(&self) {
        self.inner.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Permits consumed so far.
    pub fn admissions(&self) -> u64 {
        self.inner.admissions.load(Ordering::Relaxed)
    }

    /// Submissions delivered so far.
    pub fn delivered(&self) -> u64 {
        self.inner.delivered.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            admissions: self.admissions(),
            delivered: self.delivered(),
            gate_rejections: self.inner.gate_rejections.load(Ordering::Relaxed),
            unsupported_formats: self.inner.unsupported_formats.load(Ordering::Relaxed),
            encoding_failures: self.inner.encoding_failures.load(Ordering::Relaxed),
            transport_failures: self.inner.transport_failures.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        let inner = &self.inner;
        for counter in [
            &inner.admissions,
            &inner.delivered,
            &inner.gate_rejections,
            &inner.unsupported_formats,
            &inner.encoding_failures,
            &inner.transport_failures,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Permits consumed by submission attempts
    pub admissions: u64,
    /// Submissions the transport delivered
    pub delivered: u64,
    /// Attempts that waited too long or hit a closed gate
    pub gate_rejections: u64,
    /// Attempts with no registered encoder
    pub unsupported_formats: u64,
    /// Attempts whose document could not be encoded
    pub encoding_failures: u64,
    /// Attempts the transport failed to deliver
    pub transport_failures: u64,
}

impl MetricsSnapshot {
    /// Fraction of admitted attempts that were not delivered (0.0 to 1.0).
    ///
    /// Returns 0.0 if nothing has been admitted.
    pub fn failure_rate(&self) -> f64 {
        if self.admissions == 0 {
            0.0
        } else {
            let failed = self.admissions.saturating_sub(self.delivered);
            failed as f64 / self.admissions as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = Metrics::new();

        metrics.record_admission();
        metrics.record_admission();
        metrics.record_admission();
        metrics.record_delivered();
        metrics.record_unsupported_format();
        metrics.record_transport_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.admissions, 3);
        assert_eq!(snapshot.delivered, 1);
        assert_eq!(snapshot.unsupported_formats, 1);
        assert_eq!(snapshot.transport_failures, 1);
        assert_eq!(snapshot.encoding_failures, 0);
    }

    #[test]
    fn test_failure_rate() {
        let snapshot = MetricsSnapshot {
            admissions: 4,
            delivered: 3,
            ..MetricsSnapshot::default()
        };
        assert_eq!(snapshot.failure_rate(), 0.25);
        assert_eq!(MetricsSnapshot::default().failure_rate(), 0.0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = Metrics::new();
        let clone = metrics.clone();

        clone.record_admission();
        clone.record_gate_rejection();

        assert_eq!(metrics.admissions(), 1);
        assert_eq!(metrics.snapshot().gate_rejections, 1);
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();
        metrics.record_admission();
        metrics.record_encoding_failure();

        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
