//! # Batch Replicator
//!
//! Control surface for replicating identifier-ordered records from a
//! relational source into a wide-column target store in resumable batches.
//!
//! ## Architecture
//!
//! The driver loop (row fetching, network writes) lives outside this crate.
//! This crate supplies the pieces it steers by:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                              driver (external)                           │
//! │                                                                          │
//! │  ┌────────────┐   ┌───────────┐   ┌──────────┐   ┌────────────────────┐  │
//! │  │ Checkpoint │──►│ plan_next │──►│ Encoded  │──►│ MutationParams     │  │
//! │  │ read       │   │ Block     │   │ values   │   │ (estimate+listener)│  │
//! │  └────────────┘   └───────────┘   └──────────┘   └─────────┬──────────┘  │
//! │        ▲                                                   │ flush ok    │
//! │        └──────────────── checkpoint save ◄─────────────────┘             │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use batch_replicator::{plan_next, Block, ReplicatorConfig, MutationParamsBuilder};
//!
//! # fn main() -> batch_replicator::Result<()> {
//! let config = ReplicatorConfig::default();
//! let store = config.checkpoint_store();
//! let last = store.read_or(0)?;
//!
//! let block = plan_next(last, config.planner.batch_width, Some(10_000)).checked();
//! if !block.is_stub() {
//!     let (_start, end) = block.bounds()?;
//!     let rows: Vec<Vec<u8>> = Vec::new(); // fetched from the source
//!     let params = MutationParamsBuilder::new(config.estimator.clone())?
//!         .build(config.table.clone(), &rows);
//!     // hand `params` to the batched writer, flush, then:
//!     let _ = params;
//!     store.save(end)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod block;
pub mod checkpoint;
pub mod config;
pub mod encoding;
pub mod error;
pub mod estimator;
pub mod metrics;
pub mod mutation;

// Re-exports for convenience
pub use block::{plan_next, Block, CheckedBlock, RawBlock, SignedRange};
pub use checkpoint::CheckpointStore;
pub use config::{CheckpointConfig, PlannerConfig, ReplicatorConfig};
pub use encoding::{Encode, Encoded, StringEncoder, U64Encoder};
pub use error::{Cause, ReplicatorError, Result};
pub use estimator::{EstimatorConfig, SizedRow};
pub use mutation::{FailureListener, LoggingFailureListener, MutationParamsBuilder, WriterParams};
