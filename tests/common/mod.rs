//! Shared test utilities for integration tests.
//!
//! This module provides:
//! - An in-memory source table with a `size()` capability per row
//! - A mock batched writer that reports failures through the listener

pub mod mock_source;
pub mod mock_writer;

pub use mock_source::*;
pub use mock_writer::*;
