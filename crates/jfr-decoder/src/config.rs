/// Configuration for [`ChunkDecoder`](crate::ChunkDecoder).
///
/// The limits guard against hostile or corrupt counts. A varint can
/// declare four billion string-pool entries in five bytes, and the
/// decoder must refuse that before allocating for it.
///
/// ```text
/// ┌──────────────────┬──────────────────────────────────────────────────┐
/// │ Field            │ Purpose                                          │
/// ├──────────────────┼──────────────────────────────────────────────────┤
/// │ max_pool_entries │ Upper bound on the string-pool entry count       │
/// │ max_string_len   │ Upper bound on one character-array entry (bytes) │
/// │ collect_records  │ Keep (offset, size, type) for every record       │
/// └──────────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    pub max_pool_entries: u32,
    pub max_string_len: u32,

    /// When `false`, the scan only counts records and the decoded chunk's
    /// `records` vector stays empty.
    pub collect_records: bool,
}

impl Default for DecoderConfig {
    /// 1 Mi pool entries, 16 MiB per string, records collected.
    fn default() -> Self {
        Self {
            max_pool_entries: 1 << 20,
            max_string_len: 16 << 20,
            collect_records: true,
        }
    }
}
