// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Checkpoint persistence for replication progress.
//!
//! The checkpoint is a single decimal integer in a text file: the last
//! identifier that was successfully replicated. Surrounding whitespace is
//! tolerated on read.
//!
//! ## Checkpoint Semantics
//!
//! The checkpoint stores the **last successfully applied** identifier.
//! On restart, replication resumes from `checkpoint + 1`.
//!
//! ```text
//! fetch block [101, 200] → write batch → flush ok → save 200
//!                                         (crash here = re-apply 101..200, idempotent)
//! ```
//!
//! ## Atomic Saves
//!
//! `save()` writes to `<name>.tmp` in the same directory, syncs it, and
//! renames it over the checkpoint. A reader sees either the previous value or
//! the new one, never a partial write.
//!
//! ## Concurrency
//!
//! No locking is done here. At most one process may read-then-write a given
//! checkpoint path at a time.

use crate::error::{ReplicatorError, Result};
use crate::metrics;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Read the checkpoint stored at `path`.
///
/// Fails with `FileNotFound` if the file is missing and `ParseError` if its
/// trimmed content is not a non-negative base-10 integer (including content
/// that is not valid UTF-8).
pub fn read(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let result = fs::read(path)
        .map_err(|e| ReplicatorError::from_io(path, &e))
        .and_then(|bytes| String::from_utf8(bytes).map_err(|e| ReplicatorError::from_parse(&e)))
        .and_then(|content| parse(&content));

    match &result {
        Ok(value) => {
            debug!(path = %path.display(), value, "Checkpoint read");
            metrics::set_checkpoint_value(*value);
        }
        Err(e) => warn!(path = %path.display(), error = %e, "Checkpoint read failed"),
    }
    metrics::record_checkpoint_read(result.is_ok());
    result
}

/// Persist `value` at `path`, replacing any previous content.
pub fn save(value: u64, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let result = write_atomic(path, value.to_string().as_bytes());

    match &result {
        Ok(()) => {
            debug!(path = %path.display(), value, "Checkpoint saved");
            metrics::set_checkpoint_value(value);
        }
        Err(e) => warn!(path = %path.display(), value, error = %e, "Checkpoint save failed"),
    }
    metrics::record_checkpoint_save(result.is_ok());
    result
}

/// Parse checkpoint file content.
pub fn parse(content: &str) -> Result<u64> {
    content
        .trim()
        .parse::<u64>()
        .map_err(|e| ReplicatorError::from_parse(&e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("checkpoint"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = temp_path(path);

    let written = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        })
        .map_err(|e| ReplicatorError::from_io(&tmp, &e));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(ReplicatorError::from_io(path, &e));
    }

    // Make the rename itself durable.
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

/// A checkpoint bound to one file.
///
/// Loaded once at start, advanced once per completed batch, always persisted
/// to the path it was loaded from.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the stored checkpoint.
    pub fn read(&self) -> Result<u64> {
        read(&self.path)
    }

    /// Read the stored checkpoint, or `default` when no file exists yet.
    ///
    /// Parse and other I/O errors still propagate.
    pub fn read_or(&self, default: u64) -> Result<u64> {
        match self.read() {
            Err(ReplicatorError::FileNotFound { .. }) => {
                info!(path = %self.path.display(), default, "No checkpoint found, starting fresh");
                Ok(default)
            }
            other => other,
        }
    }

    /// Persist a new checkpoint value.
    pub fn save(&self, value: u64) -> Result<()> {
        save(value, &self.path)
    }

    /// Path of the checkpoint file (for diagnostics).
    pub fn path(&self) -> &Path {
        &self.path
    }
}
