use jfr_wire::encoding::IntEncoding;
use jfr_wire::{ByteCursor, EventRecordHeader, WireError};

/// Cursor plus the chunk's integer encoding.
///
/// `ChunkReader` is the decoding context for one chunk: it is created
/// after the header has been parsed (which fixes the encoding) and is
/// passed by `&mut` to every stage that reads the body. Nothing about
/// it outlives the chunk, so two chunks decoded side by side never see
/// each other's mode.
///
/// # Usage pattern
///
/// ```text
///   let mut reader = ChunkReader::new(cursor, header.body_encoding());
///   let (size, _) = reader.read_int()?;
///   let (type_id, _) = reader.read_long()?;
/// ```
pub struct ChunkReader<'a> {
    cursor: ByteCursor<'a>,
    encoding: IntEncoding,
}

impl<'a> ChunkReader<'a> {
    #[must_use]
    pub fn new(cursor: ByteCursor<'a>, encoding: IntEncoding) -> Self {
        Self { cursor, encoding }
    }

    #[must_use]
    pub fn encoding(&self) -> IntEncoding {
        self.encoding
    }

    /// Read a 32-bit body integer in the chunk's encoding.
    ///
    /// # Errors
    ///
    /// Truncation or a malformed varint.
    pub fn read_int(&mut self) -> Result<(u32, usize), WireError> {
        self.encoding.read_int(&mut self.cursor)
    }

    /// Read a 64-bit body integer in the chunk's encoding.
    ///
    /// # Errors
    ///
    /// Truncation or a malformed varint.
    pub fn read_long(&mut self) -> Result<(u64, usize), WireError> {
        self.encoding.read_long(&mut self.cursor)
    }

    /// Read a record's size-and-type prefix in the chunk's encoding.
    ///
    /// # Errors
    ///
    /// Truncation, a malformed varint, or [`WireError::RecordTooSmall`].
    pub fn read_record_header(&mut self) -> Result<EventRecordHeader, WireError> {
        EventRecordHeader::read_from(&mut self.cursor, self.encoding)
    }

    /// Read one raw byte. Never affected by the encoding.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] at end of buffer.
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        self.cursor.read_u8()
    }

    /// Consume `n` raw bytes.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `n` bytes remain.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        self.cursor.take(n)
    }

    /// Move to an absolute chunk offset.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if `pos` is past the buffer.
    pub fn seek(&mut self, pos: usize) -> Result<(), WireError> {
        self.cursor.seek(pos)
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining_len(&self) -> usize {
        self.cursor.remaining().len()
    }
}
