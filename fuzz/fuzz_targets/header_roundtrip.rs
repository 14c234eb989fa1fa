#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use jfr_wire::{ByteCursor, ChunkFlags, ChunkHeader, HEADER_SIZE};

#[derive(Debug, Arbitrary)]
struct Input {
    version_major: u16,
    version_minor: u16,
    body_len: u16,
    constant_pool_at: u16,
    metadata_at: u16,
    start_time_nanos: u64,
    duration_nanos: u64,
    start_ticks: u64,
    ticks_per_second: u64,
    flags: u32,
}

// Fuzz target: ChunkHeader write->read roundtrip.
//
// Offsets are folded into the body so the written header is always
// valid; the parsed header must equal the one written.
fuzz_target!(|input: Input| {
    let body_len = u64::from(input.body_len) + 1;
    let header = ChunkHeader {
        version_major: input.version_major,
        version_minor: input.version_minor,
        chunk_size: HEADER_SIZE as u64 + body_len,
        constant_pool_offset: HEADER_SIZE as u64 + u64::from(input.constant_pool_at) % body_len,
        metadata_offset: HEADER_SIZE as u64 + u64::from(input.metadata_at) % body_len,
        start_time_nanos: input.start_time_nanos,
        duration_nanos: input.duration_nanos,
        start_ticks: input.start_ticks,
        ticks_per_second: input.ticks_per_second,
        flags: ChunkFlags::from_raw(input.flags),
    };

    let mut wire = Vec::new();
    header.write_to(&mut wire);
    assert_eq!(wire.len(), HEADER_SIZE);
    wire.resize(header.chunk_size as usize, 0);

    let parsed = ChunkHeader::read_from(&mut ByteCursor::new(&wire)).unwrap();
    assert_eq!(parsed, header);
});
