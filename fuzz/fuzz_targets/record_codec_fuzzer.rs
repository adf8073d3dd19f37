//! Fuzz target for persisted record decoding
//!
//! Store files may be truncated or tampered with on disk.
//!
//! # Invariants
//!
//! - NEVER panic on arbitrary bytes
//! - A decoded record belongs to the key it was read under
//! - A decoded record re-encodes and decodes to the same record

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use roster_core::codec::{decode_record, encode_record};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    key: String,
    bytes: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(record) = decode_record(&input.key, &input.bytes) else {
        return;
    };
    assert_eq!(record.recipient_id().as_str(), input.key);

    let encoded = match encode_record(&record) {
        Ok(encoded) => encoded,
        Err(err) => panic!("decoded record failed to encode: {err}"),
    };
    let Ok(again) = decode_record(&input.key, &encoded) else {
        panic!("re-encoded record failed to decode");
    };
    assert_eq!(again.recipient_id(), record.recipient_id());
    assert_eq!(again.devices(), record.devices());
});
