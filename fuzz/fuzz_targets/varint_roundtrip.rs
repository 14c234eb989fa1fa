#![no_main]

use libfuzzer_sys::fuzz_target;
use jfr_wire::varint::{decode_varint, put_varint};

// Fuzz target: varint encode->decode roundtrip over every u64.
fuzz_target!(|value: u64| {
    let mut buf = Vec::new();
    let written = put_varint(&mut buf, value);
    assert_eq!(buf.len(), written);
    assert_eq!(decode_varint(&buf), Ok((value, written)));
});
