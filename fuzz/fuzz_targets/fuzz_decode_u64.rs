//! Fuzz target for integer column decoding.
//!
//! Tests that `decode_u64` never panics on arbitrary bytes.

#![no_main]

use batch_replicator::encoding::decode_u64;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = decode_u64(data);
});
