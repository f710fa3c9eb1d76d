//! Logger metrics for observability
//!
//! Relaxed counters covering one logger session: what producers emitted or
//! had rejected, and what consumers managed to write.

use std::sync::atomic::{AtomicU64, Ordering};

/// Session counters for monitoring logger health.
///
/// # Example
///
/// ```
/// use quick_logger_system::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_emitted();
/// metrics.record_rejected();
/// assert_eq!(metrics.records_emitted(), 1);
/// assert_eq!(metrics.records_rejected(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records accepted onto a shard queue
    records_emitted: AtomicU64,

    /// Emit calls refused (bad shard index or inactive logger)
    records_rejected: AtomicU64,

    /// Records whose line reached a sink
    records_written: AtomicU64,

    /// Sink write failures (record discarded)
    write_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_emitted: AtomicU64::new(0),
            records_rejected: AtomicU64::new(0),
            records_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_emitted(&self) -> u64 {
        self.records_emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_rejected(&self) -> u64 {
        self.records_rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    /// Records emitted but not yet written (or discarded on write failure)
    pub fn in_flight(&self) -> u64 {
        self.records_emitted()
            .saturating_sub(self.records_written() + self.write_failures())
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.records_emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.records_rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.records_emitted.store(0, Ordering::Relaxed);
        self.records_rejected.store(0, Ordering::Relaxed);
        self.records_written.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            records_emitted: AtomicU64::new(self.records_emitted()),
            records_rejected: AtomicU64::new(self.records_rejected()),
            records_written: AtomicU64::new(self.records_written()),
            write_failures: AtomicU64::new(self.write_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.records_emitted(), 0);
        assert_eq!(metrics.records_rejected(), 0);
        assert_eq!(metrics.records_written(), 0);
        assert_eq!(metrics.write_failures(), 0);
    }

    #[test]
    fn test_in_flight() {
        let metrics = LoggerMetrics::new();
        for _ in 0..5 {
            metrics.record_emitted();
        }
        metrics.record_written();
        metrics.record_written();
        metrics.record_write_failure();
        assert_eq!(metrics.in_flight(), 2);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let metrics = LoggerMetrics::new();
        metrics.record_emitted();

        let snapshot = metrics.clone();
        metrics.record_emitted();

        assert_eq!(metrics.records_emitted(), 2);
        assert_eq!(snapshot.records_emitted(), 1);
    }

    #[test]
    fn test_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_emitted();
        metrics.record_rejected();
        metrics.reset();
        assert_eq!(metrics.records_emitted(), 0);
        assert_eq!(metrics.records_rejected(), 0);
    }
}
