//! Configuration for the batch replicator.
//!
//! Configuration can be constructed programmatically or deserialized from
//! JSON (any serde format works).
//!
//! # Quick Start
//!
//! ```rust
//! use batch_replicator::config::ReplicatorConfig;
//!
//! let config = ReplicatorConfig {
//!     table: "events".into(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```
//!
//! # Configuration Structure
//!
//! ```text
//! ReplicatorConfig
//! ├── table: String                 # Target table identifier
//! ├── checkpoint: CheckpointConfig  # Progress file location
//! ├── planner: PlannerConfig        # Block width per cycle
//! └── estimator: EstimatorConfig    # Flush buffer sizing policy
//! ```
//!
//! # JSON Example
//!
//! ```json
//! {
//!   "table": "events",
//!   "checkpoint": { "path": "/var/lib/replicator/events.ckpt" },
//!   "planner": { "batch_width": 5000 },
//!   "estimator": { "multiplier": 2.0, "min_size": 2097152, "max_size": 67108864 }
//! }
//! ```

use crate::checkpoint::CheckpointStore;
use crate::error::{Cause, ReplicatorError, Result};
use crate::estimator::EstimatorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level replicator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicatorConfig {
    /// Target table identifier passed to the batched writer.
    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default)]
    pub checkpoint: CheckpointConfig,

    #[serde(default)]
    pub planner: PlannerConfig,

    #[serde(default)]
    pub estimator: EstimatorConfig,
}

fn default_table() -> String {
    "replicated".to_string()
}

impl Default for ReplicatorConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            checkpoint: CheckpointConfig::default(),
            planner: PlannerConfig::default(),
            estimator: EstimatorConfig::default(),
        }
    }
}

impl ReplicatorConfig {
    /// Config with the checkpoint placed under `dir`.
    pub fn for_testing(dir: impl AsRef<Path>) -> Self {
        Self {
            checkpoint: CheckpointConfig {
                path: dir.as_ref().join("checkpoint"),
            },
            planner: PlannerConfig { batch_width: 100 },
            ..Default::default()
        }
    }

    /// Parse from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ReplicatorError::Parse {
            cause: Cause::new("JsonError", e.to_string()),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.table.trim().is_empty() {
            return Err(ReplicatorError::Config("table must not be empty".into()));
        }
        if self.checkpoint.path.as_os_str().is_empty() {
            return Err(ReplicatorError::Config("checkpoint.path must not be empty".into()));
        }
        if self.planner.batch_width == 0 {
            return Err(ReplicatorError::Config("planner.batch_width must be positive".into()));
        }
        self.estimator.validate()
    }

    /// Checkpoint store for the configured path.
    pub fn checkpoint_store(&self) -> CheckpointStore {
        CheckpointStore::new(&self.checkpoint.path)
    }
}

/// Checkpoint file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// File holding the last replicated identifier.
    #[serde(default = "default_checkpoint_path")]
    pub path: PathBuf,
}

fn default_checkpoint_path() -> PathBuf {
    PathBuf::from("replicator.checkpoint")
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            path: default_checkpoint_path(),
        }
    }
}

/// Block planning settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Maximum identifiers per block.
    #[serde(default = "default_batch_width")]
    pub batch_width: u64,
}

fn default_batch_width() -> u64 {
    1000
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            batch_width: default_batch_width(),
        }
    }
}
