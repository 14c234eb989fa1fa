use jfr_wire::WireError;

/// Errors that abort decoding of a chunk.
///
/// Every variant is fatal: the decoder never attempts partial recovery,
/// because the input is a static buffer and retrying gains nothing.
///
/// ```text
///   DecodeError
///   ├── Wire(WireError)      ← truncation, bad varint, bad magic, bad offsets
///   ├── UnresolvedString     ← string-pool index out of range
///   ├── InvalidUtf8          ← character-array entry is not UTF-8
///   ├── LimitExceeded        ← a count or length is over the configured limit
///   ├── MetadataOverrun      ← metadata decode ran past its declared size
///   ├── ScanDrift            ← event scan stopped short of the chunk end
///   └── ScanOvershoot        ← a record's size carried the scan past the end
/// ```
///
/// An unsupported string encoding is deliberately *not* an error; see
/// [`PoolEntry::Unsupported`](crate::string_pool::PoolEntry::Unsupported).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A primitive-level failure from `jfr-wire`.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// An element or attribute referenced a string-pool slot that does
    /// not exist.
    #[error("unresolved string reference: index {index} but pool has {pool_len} entries")]
    UnresolvedString { index: u64, pool_len: usize },

    /// A character-array string-pool entry contained invalid UTF-8.
    #[error("invalid UTF-8 in string-pool entry at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// A declared count or length exceeds the decoder's configured limit.
    #[error("{what} of {value} exceeds limit {limit}")]
    LimitExceeded {
        what: &'static str,
        value: u64,
        limit: u64,
    },

    /// Decoding the string pool and element tree consumed more bytes than
    /// the metadata record declared.
    #[error("metadata decode ended at offset {actual_end}, past its declared end {declared_end}")]
    MetadataOverrun {
        declared_end: usize,
        actual_end: usize,
    },

    /// The event scan could not reach the chunk end exactly: the bytes
    /// left over are too few to hold another record.
    #[error("event scan drifted: stopped at offset {offset}, chunk ends at {end}")]
    ScanDrift { offset: usize, end: usize },

    /// A record's declared size extends past the chunk end.
    #[error("event scan overshot: record at offset {offset} ends at {record_end}, chunk ends at {end}")]
    ScanOvershoot {
        offset: usize,
        record_end: u64,
        end: usize,
    },
}
