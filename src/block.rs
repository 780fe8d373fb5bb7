// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Identifier ranges ("blocks") describing what to replicate next.
//!
//! The range-selection query on the source store yields signed bounds, so a
//! block is modelled in two layers:
//!
//! ```text
//! RawBlock (i64 bounds, stub flag)  ──▶  CheckedBlock<R>  ──▶  Block (u64 bounds)
//!        SignedRange                       decorator            validated contract
//! ```
//!
//! Validation happens when a bound is *read*, not when the block is built.
//! Callers that never touch a bad bound are unaffected, and further policy
//! decorators can wrap a [`CheckedBlock`] because it is itself a
//! [`SignedRange`].
//!
//! # Stub blocks
//!
//! A stub means "no range available" and is an explicit flag, never inferred
//! from the bounds. A real `[0, 0]` block is not a stub. `is_stub()` passes
//! straight through every decorator without validation; `start()` and `end()`
//! on a stub still run the bound checks against whatever the stub carries
//! (zeros for [`RawBlock::stub`]).

use crate::error::{ReplicatorError, Result};
use std::fmt;
use tracing::warn;

/// Raw, unvalidated range as produced by the source store.
pub trait SignedRange {
    fn raw_start(&self) -> i64;
    fn raw_end(&self) -> i64;
    fn raw_is_stub(&self) -> bool;
}

/// Validated identifier range.
pub trait Block {
    /// First identifier in the block (inclusive).
    fn start(&self) -> Result<u64>;

    /// Last identifier in the block (inclusive).
    fn end(&self) -> Result<u64>;

    /// `true` when the block carries no data.
    fn is_stub(&self) -> bool;

    /// Both bounds at once.
    fn bounds(&self) -> Result<(u64, u64)> {
        Ok((self.start()?, self.end()?))
    }

    /// Number of identifiers covered. Stubs and inverted ranges are empty.
    fn len(&self) -> Result<u64> {
        if self.is_stub() {
            return Ok(0);
        }
        let (start, end) = self.bounds()?;
        Ok(if end < start {
            0
        } else {
            (end - start).saturating_add(1)
        })
    }

    /// `true` when [`len`](Self::len) is zero.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Whether `id` falls inside the block.
    fn contains(&self, id: u64) -> Result<bool> {
        if self.is_stub() {
            return Ok(false);
        }
        let (start, end) = self.bounds()?;
        Ok(start <= id && id <= end)
    }
}

/// Plain block value, as returned by the range-selection query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawBlock {
    start: i64,
    end: i64,
    stub: bool,
}

impl RawBlock {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            stub: false,
        }
    }

    /// A block meaning "nothing to replicate".
    pub fn stub() -> Self {
        Self {
            start: 0,
            end: 0,
            stub: true,
        }
    }

    /// A stub that still carries bounds (e.g. the last range the source reported).
    pub fn stub_with_bounds(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            stub: true,
        }
    }

    pub fn is_stub(&self) -> bool {
        self.stub
    }

    /// Wrap in the validating decorator.
    pub fn checked(self) -> CheckedBlock<Self> {
        CheckedBlock::new(self)
    }
}

impl SignedRange for RawBlock {
    fn raw_start(&self) -> i64 {
        self.start
    }

    fn raw_end(&self) -> i64 {
        self.end
    }

    fn raw_is_stub(&self) -> bool {
        self.stub
    }
}

impl fmt::Display for RawBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stub {
            write!(f, "stub")
        } else {
            write!(f, "[{}, {}]", self.start, self.end)
        }
    }
}

/// Decorator that rejects negative bounds on every access.
///
/// Both bounds are checked on either accessor, `start` first, so
/// `start()` on `[1, -1]` fails citing `end = -1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckedBlock<R> {
    inner: R,
}

impl<R: SignedRange> CheckedBlock<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn validate(&self) -> Result<()> {
        let start = self.inner.raw_start();
        if start < 0 {
            return Err(ReplicatorError::NegativeValue {
                field: "start",
                value: start,
            });
        }
        let end = self.inner.raw_end();
        if end < 0 {
            return Err(ReplicatorError::NegativeValue {
                field: "end",
                value: end,
            });
        }
        Ok(())
    }
}

impl<R: SignedRange> SignedRange for CheckedBlock<R> {
    fn raw_start(&self) -> i64 {
        self.inner.raw_start()
    }

    fn raw_end(&self) -> i64 {
        self.inner.raw_end()
    }

    fn raw_is_stub(&self) -> bool {
        self.inner.raw_is_stub()
    }
}

impl<R: SignedRange> Block for CheckedBlock<R> {
    fn start(&self) -> Result<u64> {
        self.validate()?;
        Ok(self.inner.raw_start() as u64)
    }

    fn end(&self) -> Result<u64> {
        self.validate()?;
        Ok(self.inner.raw_end() as u64)
    }

    fn is_stub(&self) -> bool {
        self.inner.raw_is_stub()
    }
}

/// Choose the next block after `last_processed`.
///
/// Returns a stub when the source is empty (`source_max == None`) or already
/// fully replicated. Otherwise the block is
/// `[last_processed + 1, min(last_processed + batch_width, source_max)]`.
/// A `batch_width` of zero is treated as one.
pub fn plan_next(last_processed: u64, batch_width: u64, source_max: Option<u64>) -> RawBlock {
    let Some(source_max) = source_max else {
        return RawBlock::stub();
    };
    if last_processed >= source_max {
        return RawBlock::stub();
    }

    let start = last_processed.saturating_add(1);
    let end = last_processed
        .saturating_add(batch_width.max(1))
        .min(source_max);

    match (i64::try_from(start), i64::try_from(end)) {
        (Ok(start), Ok(end)) => RawBlock::new(start, end),
        _ => {
            warn!(start, end, "Planned block exceeds the signed identifier range");
            RawBlock::stub()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_bounds() {
        let block = RawBlock::new(5, 9).checked();
        assert_eq!(block.start().unwrap(), 5);
        assert_eq!(block.end().unwrap(), 9);
        assert!(!block.is_stub());
        assert_eq!(block.len().unwrap(), 5);
    }

    #[test]
    fn test_negative_start() {
        let block = RawBlock::new(-1, 9).checked();
        assert_eq!(
            block.start().unwrap_err(),
            ReplicatorError::NegativeValue {
                field: "start",
                value: -1
            }
        );
        assert!(block.end().is_err());
    }

    #[test]
    fn test_negative_end_fails_start_query() {
        let block = RawBlock::new(1, -1).checked();
        assert_eq!(
            block.start().unwrap_err(),
            ReplicatorError::NegativeValue {
                field: "end",
                value: -1
            }
        );
    }

    #[test]
    fn test_construction_does_not_validate() {
        let block = RawBlock::new(-5, -5).checked();
        // Only the stub flag is read; nothing fails.
        assert!(!block.is_stub());
    }

    #[test]
    fn test_zero_block_is_not_stub() {
        let block = RawBlock::new(0, 0).checked();
        assert_eq!(block.bounds().unwrap(), (0, 0));
        assert!(!block.is_stub());
        assert_eq!(block.len().unwrap(), 1);
    }

    #[test]
    fn test_stub_block() {
        let block = RawBlock::stub().checked();
        assert!(block.is_stub());
        assert_eq!(block.len().unwrap(), 0);
        assert!(!block.contains(0).unwrap());
    }

    #[test]
    fn test_stub_ignores_bounds_for_flag() {
        let block = RawBlock::stub_with_bounds(10, 20).checked();
        assert!(block.is_stub());
        assert_eq!(block.bounds().unwrap(), (10, 20));
    }

    #[test]
    fn test_stub_bounds_still_validated() {
        let block = RawBlock::stub_with_bounds(-3, 4).checked();
        assert!(block.is_stub());
        assert!(block.start().is_err());
    }

    #[test]
    fn test_decorators_compose() {
        let block = CheckedBlock::new(RawBlock::new(3, -7).checked());
        assert!(!block.is_stub());
        assert_eq!(
            block.end().unwrap_err(),
            ReplicatorError::NegativeValue {
                field: "end",
                value: -7
            }
        );
    }

    struct FullRange;

    impl Block for FullRange {
        fn start(&self) -> Result<u64> {
            Ok(0)
        }

        fn end(&self) -> Result<u64> {
            Ok(u64::MAX)
        }

        fn is_stub(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_len_saturates_on_full_range() {
        assert_eq!(FullRange.len().unwrap(), u64::MAX);
        assert!(!FullRange.is_empty().unwrap());
    }

    #[test]
    fn test_contains() {
        let block = RawBlock::new(10, 20).checked();
        assert!(block.contains(10).unwrap());
        assert!(block.contains(20).unwrap());
        assert!(!block.contains(21).unwrap());
        assert!(!block.contains(9).unwrap());
    }

    #[test]
    fn test_inverted_block_is_empty() {
        let block = RawBlock::new(9, 3).checked();
        assert!(block.is_empty().unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(RawBlock::new(1, 2).to_string(), "[1, 2]");
        assert_eq!(RawBlock::stub().to_string(), "stub");
    }

    #[test]
    fn test_plan_next() {
        assert_eq!(plan_next(0, 100, Some(1000)), RawBlock::new(1, 100));
        assert_eq!(plan_next(950, 100, Some(1000)), RawBlock::new(951, 1000));
        assert_eq!(plan_next(1000, 100, Some(1000)), RawBlock::stub());
        assert_eq!(plan_next(0, 100, None), RawBlock::stub());
    }

    #[test]
    fn test_plan_next_zero_width() {
        assert_eq!(plan_next(4, 0, Some(10)), RawBlock::new(5, 5));
    }

    #[test]
    fn test_plan_next_beyond_signed_range() {
        let last = i64::MAX as u64;
        assert!(plan_next(last, 10, Some(u64::MAX)).is_stub());
    }
}
