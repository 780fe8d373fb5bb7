// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error types for the batch replicator.
//!
//! Every low-level failure caught at the core boundary (I/O, integer parsing,
//! writer errors) is normalised into a single [`ReplicatorError`] whose
//! `Display` output always has the shape:
//!
//! ```text
//! <Category>: (caused by: <OriginalKind>: <OriginalMessage>)
//! ```
//!
//! The original failure is kept as a [`Cause`] (kind + message) rather than a
//! boxed source, so errors stay `Clone` and comparable in tests.
//!
//! # Error Categories
//!
//! | Variant | Category | Fatal | Raised by |
//! |---------|----------|-------|-----------|
//! | `FileNotFound` | `FileNotFound` | Yes | checkpoint read |
//! | `Parse` | `ParseError` | Yes | checkpoint read, integer decoding |
//! | `NegativeValue` | `NegativeValue` | Yes | block accessors |
//! | `Io` | `IoError` | Yes | checkpoint read/save |
//! | `Config` | `ConfigError` | Yes | settings validation |
//! | `WriteFailure` | `WriteFailure` | No | failure listener (logged only) |
//!
//! Fatal errors propagate synchronously to the caller; nothing in the core
//! retries. `WriteFailure` is only ever constructed to be logged.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for replicator operations.
pub type Result<T> = std::result::Result<T, ReplicatorError>;

/// The original failure behind a normalised error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// Short name of the original failure kind (e.g. `NotFound`, `ParseIntError`).
    pub kind: String,
    /// The original failure's message.
    pub message: String,
}

impl Cause {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Build a cause from a typed error, naming it after its type.
    pub fn of<E: StdError>(err: &E) -> Self {
        Self::new(short_type_name::<E>(), err.to_string())
    }

    /// Build a cause from an I/O error, naming it after its `ErrorKind`.
    pub fn from_io(err: &io::Error) -> Self {
        Self::new(format!("{:?}", err.kind()), err.to_string())
    }

    /// Build a cause from a type-erased error handed over by an external client.
    pub fn from_dyn(err: &(dyn StdError + 'static)) -> Self {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return Self::from_io(io_err);
        }
        Self::new("WriterError", err.to_string())
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Errors produced by the replication control surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplicatorError {
    /// The checkpoint file does not exist.
    #[error("FileNotFound: (caused by: {cause})")]
    FileNotFound { path: PathBuf, cause: Cause },

    /// Content could not be parsed as the expected value.
    #[error("ParseError: (caused by: {cause})")]
    Parse { cause: Cause },

    /// A block bound read from the signed source is negative.
    #[error("NegativeValue: (caused by: InvalidBound: {field} = {value})")]
    NegativeValue { field: &'static str, value: i64 },

    /// Any other I/O failure on the checkpoint path.
    #[error("IoError: (caused by: {cause})")]
    Io { path: PathBuf, cause: Cause },

    /// Invalid settings.
    #[error("ConfigError: (caused by: InvalidSetting: {0})")]
    Config(String),

    /// The external batched writer reported failed mutations.
    ///
    /// Only constructed by failure listeners for reporting; never returned
    /// from a core operation.
    #[error("WriteFailure: (caused by: {cause})")]
    WriteFailure { failed: usize, cause: Cause },
}

impl ReplicatorError {
    /// Normalise an I/O error raised while touching `path`.
    pub fn from_io(path: impl AsRef<Path>, err: &io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        let cause = Cause::from_io(err);
        if err.kind() == io::ErrorKind::NotFound {
            Self::FileNotFound { path, cause }
        } else {
            Self::Io { path, cause }
        }
    }

    /// Normalise a parse failure.
    pub fn from_parse<E: StdError>(err: &E) -> Self {
        Self::Parse {
            cause: Cause::of(err),
        }
    }

    /// Parse failure without an underlying error value.
    pub fn parse_msg(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            cause: Cause::new(kind, message),
        }
    }

    /// Normalise a writer error reported through a failure listener.
    pub fn write_failure(err: &(dyn StdError + 'static), failed: usize) -> Self {
        Self::WriteFailure {
            failed,
            cause: Cause::from_dyn(err),
        }
    }

    /// Stable category name, as printed before the colon.
    pub fn category(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "FileNotFound",
            Self::Parse { .. } => "ParseError",
            Self::NegativeValue { .. } => "NegativeValue",
            Self::Io { .. } => "IoError",
            Self::Config(_) => "ConfigError",
            Self::WriteFailure { .. } => "WriteFailure",
        }
    }

    /// Whether this error aborts the current operation.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::WriteFailure { .. })
    }
}

/// Last path segment of a type name (`core::num::error::ParseIntError` -> `ParseIntError`).
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
