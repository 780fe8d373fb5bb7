//! Writer parameters for the target store's batched writer.
//!
//! For each batch the builder sizes the flush buffer from the pending rows
//! (see [`crate::estimator`]) and pairs it with a failure listener:
//!
//! ```text
//! rows ──▶ estimate ──┐
//!                     ├──▶ WriterParams { table, flush_buffer_bytes, on_failure }
//! table ──────────────┘
//! ```
//!
//! The listener runs on threads owned by the external writer. It only
//! reports: no retries, no panics, no shared state.

use crate::error::{ReplicatorError, Result};
use crate::estimator::{EstimatorConfig, SizedRow};
use crate::metrics;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Observer for mutations the writer failed to apply.
pub trait FailureListener: Send + Sync {
    /// Called by the writer when `failed` mutations of `table` were rejected.
    fn on_failure(&self, table: &str, error: &(dyn StdError + 'static), failed: usize);
}

/// Default listener: normalise the failure, log it, count it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingFailureListener;

impl FailureListener for LoggingFailureListener {
    fn on_failure(&self, table: &str, err: &(dyn StdError + 'static), failed: usize) {
        let err = ReplicatorError::write_failure(err, failed);
        error!(table, failed, error = %err, "Batched write failed");
        metrics::record_write_failures(table, failed);
    }
}

/// Configuration handed to the external batched writer.
#[derive(Clone)]
pub struct WriterParams {
    table: String,
    flush_buffer_bytes: u64,
    on_failure: Arc<dyn FailureListener>,
}

impl WriterParams {
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Byte threshold at which the writer flushes accumulated mutations.
    pub fn flush_buffer_bytes(&self) -> u64 {
        self.flush_buffer_bytes
    }

    pub fn listener(&self) -> &Arc<dyn FailureListener> {
        &self.on_failure
    }

    /// Forward a writer failure to the listener, bound to this table.
    pub fn report_failure(&self, err: &(dyn StdError + 'static), failed: usize) {
        self.on_failure.on_failure(&self.table, err, failed);
    }
}

impl fmt::Debug for WriterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterParams")
            .field("table", &self.table)
            .field("flush_buffer_bytes", &self.flush_buffer_bytes)
            .finish_non_exhaustive()
    }
}

/// Builds [`WriterParams`] per batch.
#[derive(Clone)]
pub struct MutationParamsBuilder {
    estimator: EstimatorConfig,
    listener: Arc<dyn FailureListener>,
}

impl MutationParamsBuilder {
    /// Create a builder with the logging listener. Fails on invalid estimator settings.
    pub fn new(estimator: EstimatorConfig) -> Result<Self> {
        estimator.validate()?;
        Ok(Self {
            estimator,
            listener: Arc::new(LoggingFailureListener),
        })
    }

    /// Replace the failure listener.
    pub fn with_listener(mut self, listener: Arc<dyn FailureListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn estimator(&self) -> &EstimatorConfig {
        &self.estimator
    }

    /// Size the flush buffer for `rows` and package it for `table`.
    pub fn build<R: SizedRow>(&self, table: impl Into<String>, rows: &[R]) -> WriterParams {
        let table = table.into();
        let flush_buffer_bytes = self.estimator.estimate(rows);
        debug!(table = %table, rows = rows.len(), flush_buffer_bytes, "Built writer params");
        WriterParams {
            table,
            flush_buffer_bytes,
            on_failure: Arc::clone(&self.listener),
        }
    }
}

impl Default for MutationParamsBuilder {
    fn default() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            listener: Arc::new(LoggingFailureListener),
        }
    }
}

/// Build writer params with the default estimator and logging listener.
pub fn build<R: SizedRow>(table: impl Into<String>, rows: &[R]) -> WriterParams {
    MutationParamsBuilder::default().build(table, rows)
}
