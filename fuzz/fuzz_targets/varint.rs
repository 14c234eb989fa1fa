#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: LEB128 decoding of arbitrary bytes.
//
// Catches bugs in:
// - Continuation runs longer than ten bytes
// - Tenth-byte overflow past 64 bits
// - Truncation mid-varint
fuzz_target!(|data: &[u8]| {
    if let Ok((_, consumed)) = jfr_wire::varint::decode_varint(data) {
        assert!(consumed >= 1 && consumed <= data.len());
    }
});
