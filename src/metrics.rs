//! Store metrics
//!
//! Every read and write through the record store is emitted through the
//! `metrics` facade and also tallied locally, so tests and the CLI can
//! inspect counts without installing a recorder.

use metrics::{counter, histogram};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counter of collection reads
pub const READS_TOTAL: &str = "habbit_store_reads_total";
/// Counter of collection writes
pub const WRITES_TOTAL: &str = "habbit_store_writes_total";
/// Counter of payloads that failed to decode and fell back to defaults
pub const DECODE_FAILURES_TOTAL: &str = "habbit_store_decode_failures_total";
/// Counter of failed backend writes
pub const WRITE_ERRORS_TOTAL: &str = "habbit_store_write_errors_total";
/// Histogram of encoded payload sizes
pub const PAYLOAD_BYTES: &str = "habbit_store_payload_bytes";
/// Histogram of write durations
pub const WRITE_DURATION: &str = "habbit_store_write_duration_seconds";

/// Point-in-time copy of the local tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Collection reads
    pub reads: u64,
    /// Collection writes
    pub writes: u64,
    /// Payloads replaced by defaults
    pub decode_failures: u64,
    /// Failed backend writes
    pub write_errors: u64,
}

/// Metrics for a single record store
#[derive(Debug, Default)]
pub struct StoreMetrics {
    reads: AtomicU64,
    writes: AtomicU64,
    decode_failures: AtomicU64,
    write_errors: AtomicU64,
}

impl StoreMetrics {
    /// Record a read of `key`
    pub fn record_read(&self, key: &str) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        counter!(READS_TOTAL, "key" => key.to_string()).increment(1);
    }

    /// Record a write to `key` of `bytes` that took `duration`
    pub fn record_write(&self, key: &str, bytes: usize, duration: Duration, success: bool) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        let status = if success { "success" } else { "error" };
        counter!(WRITES_TOTAL, "key" => key.to_string(), "status" => status).increment(1);
        histogram!(PAYLOAD_BYTES, "key" => key.to_string()).record(bytes as f64);
        histogram!(WRITE_DURATION).record(duration.as_secs_f64());

        if !success {
            self.write_errors.fetch_add(1, Ordering::Relaxed);
            counter!(WRITE_ERRORS_TOTAL, "key" => key.to_string()).increment(1);
        }
    }

    /// Record that the payload under `key` could not be decoded
    pub fn record_decode_failure(&self, key: &str) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
        counter!(DECODE_FAILURES_TOTAL, "key" => key.to_string()).increment(1);
    }

    /// Copy the current tallies
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_start_at_zero() {
        let metrics = StoreMetrics::default();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_failed_write_counts_as_error() {
        let metrics = StoreMetrics::default();
        metrics.record_write("habits", 10, Duration::from_millis(1), true);
        metrics.record_write("habits", 10, Duration::from_millis(1), false);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.writes, 2);
        assert_eq!(snapshot.write_errors, 1);
    }
}
