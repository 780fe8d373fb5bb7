//! Fuzz target for checkpoint parsing.
//!
//! `checkpoint::parse` must never panic, and any value it accepts must
//! survive a format/parse round trip.

#![no_main]

use batch_replicator::checkpoint;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(value) = checkpoint::parse(data) {
        assert_eq!(checkpoint::parse(&value.to_string()).ok(), Some(value));
    }
});
