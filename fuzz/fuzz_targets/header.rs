#![no_main]

use libfuzzer_sys::fuzz_target;
use jfr_wire::{ByteCursor, ChunkHeader, HEADER_SIZE};

// Fuzz target: ChunkHeader::read_from on arbitrary bytes.
//
// Any header that parses must satisfy the offset invariants.
fuzz_target!(|data: &[u8]| {
    let mut cursor = ByteCursor::new(data);
    if let Ok(header) = ChunkHeader::read_from(&mut cursor) {
        assert_eq!(cursor.position(), HEADER_SIZE);
        assert!(header.chunk_size <= data.len() as u64);
        assert!(header.metadata_offset >= HEADER_SIZE as u64);
        assert!(header.metadata_offset < header.chunk_size);
        assert!(header.constant_pool_offset >= HEADER_SIZE as u64);
        assert!(header.constant_pool_offset < header.chunk_size);
    }
});
