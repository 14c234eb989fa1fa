use crate::cursor::ByteCursor;
use crate::encoding::IntEncoding;
use crate::error::WireError;

/// Size-and-type prefix of every record in a chunk body.
///
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │ size     (int: varint or 4-byte BE)              │
/// │ type_id  (long: varint or 8-byte BE)             │
/// │ payload  [size - header_len bytes], opaque       │
/// └──────────────────────────────────────────────────┘
/// ```
///
/// `size` counts the whole record, prefix included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventRecordHeader {
    /// Declared total record size in bytes.
    pub size: u64,

    /// Event type identifier.
    pub type_id: u64,

    /// Bytes consumed by the size and type fields together.
    pub header_len: usize,
}

impl EventRecordHeader {
    /// Read a record prefix at the cursor.
    ///
    /// The cursor is left on the first payload byte.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] or a varint error if the prefix is
    ///   malformed.
    /// - [`WireError::RecordTooSmall`] if `size` is smaller than the prefix
    ///   itself (this includes `size == 0`), which would stall or rewind
    ///   a scan.
    pub fn read_from(
        cursor: &mut ByteCursor<'_>,
        encoding: IntEncoding,
    ) -> Result<Self, WireError> {
        let offset = cursor.position();
        let (size, size_len) = encoding.read_int(cursor)?;
        let (type_id, type_len) = encoding.read_long(cursor)?;
        let header_len = size_len + type_len;
        let size = u64::from(size);

        if size < header_len as u64 {
            return Err(WireError::RecordTooSmall {
                offset,
                size,
                header_len,
            });
        }

        Ok(Self {
            size,
            type_id,
            header_len,
        })
    }

    /// Number of opaque payload bytes following the prefix.
    #[must_use]
    pub fn payload_len(&self) -> u64 {
        self.size - self.header_len as u64
    }
}
