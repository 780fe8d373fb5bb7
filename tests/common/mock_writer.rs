//! Mock batched writer for testing.
//!
//! Buffers mutations and applies them to an in-memory table on flush.
//! Configurable to reject a flush, in which case the failure is reported to
//! the params' listener from a writer-owned thread, like a real client would.

use batch_replicator::WriterParams;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A single put: row key and column value bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

pub struct MockWriter {
    /// Applied mutations: key bytes -> value bytes.
    table: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
    /// Buffer sizes requested by each flush, in order.
    flush_sizes: Mutex<Vec<u64>>,
    fail_next: AtomicBool,
    failures_reported: AtomicUsize,
}

impl MockWriter {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(HashMap::new()),
            flush_sizes: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
            failures_reported: AtomicUsize::new(0),
        }
    }

    /// Make the next flush fail.
    pub fn fail_next_flush(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Apply `mutations` under `params`. Returns whether the batch was applied.
    pub fn flush(&self, params: &WriterParams, mutations: Vec<Mutation>) -> bool {
        self.flush_sizes
            .lock()
            .unwrap()
            .push(params.flush_buffer_bytes());

        if self.fail_next.swap(false, Ordering::SeqCst) {
            let failed = mutations.len();
            let params = params.clone();
            std::thread::spawn(move || {
                let err = io::Error::new(io::ErrorKind::TimedOut, "region server timed out");
                params.report_failure(&err, failed);
            })
            .join()
            .unwrap();
            self.failures_reported.fetch_add(1, Ordering::SeqCst);
            return false;
        }

        let mut table = self.table.lock().unwrap();
        for m in mutations {
            table.insert(m.key, m.value);
        }
        true
    }

    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.table.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.table.lock().unwrap().len()
    }

    pub fn flush_sizes(&self) -> Vec<u64> {
        self.flush_sizes.lock().unwrap().clone()
    }

    pub fn failures_reported(&self) -> usize {
        self.failures_reported.load(Ordering::SeqCst)
    }
}

impl Default for MockWriter {
    fn default() -> Self {
        Self::new()
    }
}
