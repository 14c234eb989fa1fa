/// Errors raised while reading the primitive layer of a chunk.
///
/// Every variant carries the byte offset (from the start of the chunk
/// buffer) where the read went wrong. Binary formats are miserable to
/// debug without it.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WireError {
    /// A read would run past the end of the buffer.
    #[error("unexpected end of input at offset {offset} (needed {needed} more bytes)")]
    UnexpectedEof { offset: usize, needed: usize },

    /// Varint encoding exceeded 10 bytes without terminating.
    #[error("varint at offset {offset} exceeded the 10-byte limit")]
    VarintTooLong { offset: usize },

    /// Varint terminated but its value does not fit in a `u64`.
    #[error("varint at offset {offset} overflows u64")]
    VarintOverflow { offset: usize },

    /// Magic number did not match "FLR\0".
    #[error("not a recognized chunk: expected magic 0x464C5200, got {found:#010X}")]
    InvalidMagic { found: u32 },

    /// A header offset points outside the chunk it belongs to.
    #[error("{field} offset {offset} is outside the chunk (size {chunk_size})")]
    InvalidOffset {
        field: &'static str,
        offset: u64,
        chunk_size: u64,
    },

    /// The header declares a chunk larger than the bytes available.
    #[error("chunk declares {chunk_size} bytes but only {available} are available")]
    ChunkTooLarge { chunk_size: u64, available: usize },

    /// A record's declared size does not even cover its own size and type fields.
    #[error("record at offset {offset} declares size {size}, smaller than its {header_len}-byte header")]
    RecordTooSmall {
        offset: usize,
        size: u64,
        header_len: usize,
    },
}
