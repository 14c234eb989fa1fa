#![no_main]

use libfuzzer_sys::fuzz_target;
use jfr_decoder::{ChunkDecoder, DecoderConfig};

// Fuzz target: full chunk decode (header, string pool, element tree,
// record scan).
//
// Small limits keep hostile counts from turning into slow inputs.
fuzz_target!(|data: &[u8]| {
    let config = DecoderConfig {
        max_pool_entries: 4096,
        max_string_len: 1 << 16,
        collect_records: true,
    };
    if let Ok(chunk) = ChunkDecoder::decode_with_config(data, &config) {
        assert_eq!(chunk.summary.end_offset as u64, chunk.header.chunk_size);
        assert_eq!(chunk.records.len(), chunk.summary.record_count);
        let _ = chunk.metadata.root.to_string();
    }
});
