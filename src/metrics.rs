//! Metrics for observability.
//!
//! Exports Prometheus-compatible metrics for:
//! - Checkpoint reads and saves
//! - Flush buffer estimates and overflow signals
//! - Write failures reported by the batched writer
//!
//! # Metric Naming Convention
//!
//! All metrics are prefixed with `replicator_` and follow Prometheus conventions:
//! - Counters end in `_total`
//! - Gauges represent current state
//! - Histograms track distributions (sizes)
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, gauge, histogram};

fn status(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// Record a checkpoint read.
pub fn record_checkpoint_read(success: bool) {
    counter!("replicator_checkpoint_reads_total", "status" => status(success)).increment(1);
}

/// Record a checkpoint save.
pub fn record_checkpoint_save(success: bool) {
    counter!("replicator_checkpoint_saves_total", "status" => status(success)).increment(1);
}

/// Record the current checkpoint value (last replicated identifier).
pub fn set_checkpoint_value(value: u64) {
    gauge!("replicator_checkpoint_value").set(value as f64);
}

/// Record a computed flush buffer size.
pub fn record_buffer_estimate(bytes: u64, rows: usize) {
    histogram!("replicator_buffer_estimate_bytes").record(bytes as f64);
    histogram!("replicator_buffer_estimate_rows").record(rows as f64);
}

/// Record an estimate that exceeded the configured maximum before clamping.
pub fn record_buffer_overflow() {
    counter!("replicator_buffer_overflow_total").increment(1);
}

/// Record mutations the writer failed to apply.
pub fn record_write_failures(table: &str, failed: usize) {
    counter!("replicator_write_failures_total", "table" => table.to_string())
        .increment(failed as u64);
}


#[cfg(test)]
mod tests {
    use super::*;

    // Without a recorder installed these are no-ops; they must not panic.

    #[test]
    fn test_checkpoint_metrics_no_panic() {
        record_checkpoint_read(true);
        record_checkpoint_read(false);
        record_checkpoint_save(true);
        set_checkpoint_value(42);
    }

    #[test]
    fn test_buffer_metrics_no_panic() {
        record_buffer_estimate(2 * 1024 * 1024, 10);
        record_buffer_overflow();
    }

    #[test]
    fn test_checkpoint_counters_labelled_by_status() {
        let counters = testing::capture(|| {
            record_checkpoint_read(true);
            record_checkpoint_read(false);
            record_checkpoint_read(false);
        });
        let name = "replicator_checkpoint_reads_total";
        assert_eq!(testing::counter(&counters, name, Some(("status", "success"))), 1);
        assert_eq!(testing::counter(&counters, name, Some(("status", "failure"))), 2);
    }

    #[test]
    fn test_write_failure_metrics_no_panic() {
        record_write_failures("events", 3);
        record_write_failures("events", 0);
    }
}
