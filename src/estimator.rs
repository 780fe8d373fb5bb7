//! Adaptive flush-buffer sizing.
//!
//! Batch content size varies from run to run, so a static buffer threshold
//! either forces extra flush round-trips or risks memory pressure. The
//! estimate sizes the buffer from the batch actually pending:
//!
//! ```text
//! raw = round(rows × mean(row.size()) × multiplier)
//! estimate = clamp(raw, min_size, max_size)
//! ```
//!
//! `round` is [`f64::round`] (half away from zero), which for the
//! non-negative values seen here is round-half-up.

use crate::error::{ReplicatorError, Result};
use crate::metrics;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const MIB: u64 = 1024 * 1024;

/// Anything that can report its payload size in bytes.
pub trait SizedRow {
    fn size(&self) -> u64;
}

impl<T: SizedRow + ?Sized> SizedRow for &T {
    fn size(&self) -> u64 {
        (**self).size()
    }
}

impl SizedRow for [u8] {
    fn size(&self) -> u64 {
        self.len() as u64
    }
}

impl SizedRow for Vec<u8> {
    fn size(&self) -> u64 {
        self.len() as u64
    }
}

impl SizedRow for str {
    fn size(&self) -> u64 {
        self.len() as u64
    }
}

impl SizedRow for String {
    fn size(&self) -> u64 {
        self.len() as u64
    }
}

/// Estimator policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Factor absorbing per-row overhead not captured by payload size.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Lower bound on the flush buffer (bytes).
    #[serde(default = "default_min_size")]
    pub min_size: u64,

    /// Upper bound on the flush buffer (bytes).
    #[serde(default = "default_max_size")]
    pub max_size: u64,
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_min_size() -> u64 {
    2 * MIB // 2 MiB
}

fn default_max_size() -> u64 {
    64 * MIB // 64 MiB
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            multiplier: default_multiplier(),
            min_size: default_min_size(),
            max_size: default_max_size(),
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.multiplier.is_finite() || self.multiplier <= 0.0 {
            return Err(ReplicatorError::Config(format!(
                "multiplier must be finite and positive, got {}",
                self.multiplier
            )));
        }
        if self.min_size > self.max_size {
            return Err(ReplicatorError::Config(format!(
                "min_size ({}) exceeds max_size ({})",
                self.min_size, self.max_size
            )));
        }
        Ok(())
    }

    /// Estimate the flush buffer for `rows` under this policy.
    pub fn estimate<R: SizedRow>(&self, rows: &[R]) -> u64 {
        estimate_with(rows, self)
    }
}

/// Estimate with the default policy (×2.0, clamped to [2 MiB, 64 MiB]).
pub fn estimate<R: SizedRow>(rows: &[R]) -> u64 {
    estimate_with(rows, &EstimatorConfig::default())
}

/// Estimate the flush buffer size for a pending batch.
///
/// An empty batch yields `min_size`. Exceeding `max_size` is logged and
/// counted, then clamped.
pub fn estimate_with<R: SizedRow>(rows: &[R], config: &EstimatorConfig) -> u64 {
    let count = rows.len();
    let avg = average_size(rows);
    let raw = (count as f64 * avg * config.multiplier).round();
    // Saturating cast: NaN -> 0, negatives -> 0, +inf -> u64::MAX.
    let raw = raw as u64;

    if raw > config.max_size {
        warn!(
            raw,
            max_size = config.max_size,
            rows = count,
            avg_row_size = avg,
            multiplier = config.multiplier,
            "Estimated flush buffer exceeds maximum, clamping"
        );
        metrics::record_buffer_overflow();
    }

    // Not `u64::clamp`: that panics if a caller skipped validate() and min > max.
    let size = raw.max(config.min_size).min(config.max_size);
    debug!(rows = count, avg_row_size = avg, raw, size, "Estimated flush buffer");
    metrics::record_buffer_estimate(size, count);
    size
}

fn average_size<R: SizedRow>(rows: &[R]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let total: u128 = rows.iter().map(|r| r.size() as u128).sum();
    total as f64 / rows.len() as f64
}
