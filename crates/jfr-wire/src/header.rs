use crate::cursor::ByteCursor;
use crate::encoding::{IntEncoding, read_u16_be, read_u32_be, read_u64_be};
use crate::error::WireError;

/// Magic number: ASCII "FLR\0".
/// Compared as raw bytes so byte order never enters into it.
pub const CHUNK_MAGIC: [u8; 4] = [b'F', b'L', b'R', 0x00];

/// Total header size in bytes (fixed).
pub const HEADER_SIZE: usize = 68;

/// Major versions this decoder has been checked against.
pub const KNOWN_MAJOR_VERSIONS: [u16; 2] = [1, 2];

/// Chunk flag word.
///
/// Only the low byte is meaningful to this decoder: zero means body
/// integers are fixed-width big-endian, anything else means they are
/// varints. The remaining bits are carried through untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkFlags(u32);

impl ChunkFlags {
    /// Body integers are varint-compressed.
    pub const COMPRESSED_INTS: Self = Self(0x0000_0001);

    pub const NONE: Self = Self(0);

    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// True when the low byte is non-zero.
    #[must_use]
    pub fn has_compressed_ints(self) -> bool {
        self.0 & 0xFF != 0
    }

    /// The integer encoding every body read in this chunk must use.
    #[must_use]
    pub fn body_encoding(self) -> IntEncoding {
        if self.has_compressed_ints() {
            IntEncoding::Compressed
        } else {
            IntEncoding::Fixed
        }
    }
}

/// Chunk header — the first 68 bytes of every chunk.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────┐
/// │ Offset │ Size    │ Description                      │
/// ├────────┼─────────┼──────────────────────────────────┤
/// │ 0x00   │ 4 bytes │ Magic: "FLR\0"                   │
/// │ 0x04   │ 2 bytes │ Version major                    │
/// │ 0x06   │ 2 bytes │ Version minor                    │
/// │ 0x08   │ 8 bytes │ Chunk size                       │
/// │ 0x10   │ 8 bytes │ Constant pool offset             │
/// │ 0x18   │ 8 bytes │ Metadata offset                  │
/// │ 0x20   │ 8 bytes │ Start time (ns)                  │
/// │ 0x28   │ 8 bytes │ Duration (ns)                    │
/// │ 0x30   │ 8 bytes │ Start ticks                      │
/// │ 0x38   │ 8 bytes │ Ticks per second                 │
/// │ 0x40   │ 4 bytes │ Flags                            │
/// └────────┴─────────┴──────────────────────────────────┘
/// ```
///
/// All fields are big-endian. Offsets are relative to the chunk start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkHeader {
    pub version_major: u16,
    pub version_minor: u16,
    pub chunk_size: u64,
    pub constant_pool_offset: u64,
    pub metadata_offset: u64,
    pub start_time_nanos: u64,
    pub duration_nanos: u64,
    pub start_ticks: u64,
    pub ticks_per_second: u64,
    pub flags: ChunkFlags,
}

impl ChunkHeader {
    /// Append the 68-byte header to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.reserve(HEADER_SIZE);
        out.extend_from_slice(&CHUNK_MAGIC);
        out.extend_from_slice(&self.version_major.to_be_bytes());
        out.extend_from_slice(&self.version_minor.to_be_bytes());
        for field in [
            self.chunk_size,
            self.constant_pool_offset,
            self.metadata_offset,
            self.start_time_nanos,
            self.duration_nanos,
            self.start_ticks,
            self.ticks_per_second,
        ] {
            out.extend_from_slice(&field.to_be_bytes());
        }
        out.extend_from_slice(&self.flags.raw().to_be_bytes());
    }

    /// Parse a header at the cursor, which must sit on byte 0 of a chunk.
    ///
    /// Every field is read fixed-width regardless of the flags. On
    /// success the cursor is left at the first byte after the header.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if the buffer is shorter than the header.
    /// - [`WireError::InvalidMagic`] if the magic number doesn't match.
    /// - [`WireError::ChunkTooLarge`] if the declared size exceeds the buffer.
    /// - [`WireError::InvalidOffset`] if the metadata or constant pool
    ///   offset falls inside the header or at/after the chunk end.
    pub fn read_from(cursor: &mut ByteCursor<'_>) -> Result<Self, WireError> {
        let start = cursor.position();

        let magic: [u8; 4] = cursor.take_array()?;
        if magic != CHUNK_MAGIC {
            return Err(WireError::InvalidMagic {
                found: u32::from_be_bytes(magic),
            });
        }

        let header = Self {
            version_major: read_u16_be(cursor)?,
            version_minor: read_u16_be(cursor)?,
            chunk_size: read_u64_be(cursor)?,
            constant_pool_offset: read_u64_be(cursor)?,
            metadata_offset: read_u64_be(cursor)?,
            start_time_nanos: read_u64_be(cursor)?,
            duration_nanos: read_u64_be(cursor)?,
            start_ticks: read_u64_be(cursor)?,
            ticks_per_second: read_u64_be(cursor)?,
            flags: ChunkFlags::from_raw(read_u32_be(cursor)?),
        };

        header.validate(cursor.len() - start)?;
        Ok(header)
    }

    /// Check the size and offset invariants against the bytes available
    /// from the chunk start.
    fn validate(&self, available: usize) -> Result<(), WireError> {
        if usize::try_from(self.chunk_size).map_or(true, |size| size > available) {
            return Err(WireError::ChunkTooLarge {
                chunk_size: self.chunk_size,
                available,
            });
        }

        for (field, offset) in [
            ("metadata", self.metadata_offset),
            ("constant pool", self.constant_pool_offset),
        ] {
            if offset < HEADER_SIZE as u64 || offset >= self.chunk_size {
                return Err(WireError::InvalidOffset {
                    field,
                    offset,
                    chunk_size: self.chunk_size,
                });
            }
        }

        Ok(())
    }

    /// The integer encoding of this chunk's body.
    #[must_use]
    pub fn body_encoding(&self) -> IntEncoding {
        self.flags.body_encoding()
    }

    #[must_use]
    pub fn is_known_version(&self) -> bool {
        KNOWN_MAJOR_VERSIONS.contains(&self.version_major)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header(flags: ChunkFlags) -> ChunkHeader {
        ChunkHeader {
            version_major: 2,
            version_minor: 1,
            chunk_size: 200,
            constant_pool_offset: 100,
            metadata_offset: 120,
            start_time_nanos: 1_700_000_000_000_000_000,
            duration_nanos: 5_000_000_000,
            start_ticks: 123_456,
            ticks_per_second: 1_000_000_000,
            flags,
        }
    }

    fn chunk_bytes(header: &ChunkHeader) -> Vec<u8> {
        let mut buf = Vec::new();
        header.write_to(&mut buf);
        let total = usize::try_from(header.chunk_size).unwrap();
        buf.resize(total.max(HEADER_SIZE), 0);
        buf
    }

    #[test]
    fn roundtrip_header() {
        let header = sample_header(ChunkFlags::COMPRESSED_INTS);
        let buf = chunk_bytes(&header);
        let mut cursor = ByteCursor::new(&buf);
        let parsed = ChunkHeader::read_from(&mut cursor).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(cursor.position(), HEADER_SIZE);
    }

    #[test]
    fn written_header_is_68_bytes() {
        let mut buf = Vec::new();
        sample_header(ChunkFlags::NONE).write_to(&mut buf);
        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(&buf[0..4], b"FLR\0");
    }

    #[test]
    fn low_byte_selects_encoding() {
        assert_eq!(ChunkFlags::NONE.body_encoding(), IntEncoding::Fixed);
        assert_eq!(
            ChunkFlags::from_raw(0x0000_0100).body_encoding(),
            IntEncoding::Fixed
        );
        assert_eq!(
            ChunkFlags::from_raw(0x0000_0003).body_encoding(),
            IntEncoding::Compressed
        );
    }

    #[test]
    fn reject_bad_magic() {
        let mut buf = chunk_bytes(&sample_header(ChunkFlags::NONE));
        buf[0..4].copy_from_slice(b"NOPE");
        let result = ChunkHeader::read_from(&mut ByteCursor::new(&buf));
        assert_eq!(result, Err(WireError::InvalidMagic { found: 0x4E4F_5045 }));
    }

    #[test]
    fn reject_truncated_header() {
        let buf = chunk_bytes(&sample_header(ChunkFlags::NONE));
        let result = ChunkHeader::read_from(&mut ByteCursor::new(&buf[..40]));
        assert!(matches!(result, Err(WireError::UnexpectedEof { .. })));
    }

    #[test]
    fn reject_chunk_larger_than_buffer() {
        let buf = chunk_bytes(&sample_header(ChunkFlags::NONE));
        let result = ChunkHeader::read_from(&mut ByteCursor::new(&buf[..150]));
        assert_eq!(
            result,
            Err(WireError::ChunkTooLarge {
                chunk_size: 200,
                available: 150
            })
        );
    }

    #[test]
    fn reject_metadata_offset_past_end() {
        let mut header = sample_header(ChunkFlags::NONE);
        header.metadata_offset = 200;
        let buf = chunk_bytes(&header);
        let result = ChunkHeader::read_from(&mut ByteCursor::new(&buf));
        assert!(matches!(
            result,
            Err(WireError::InvalidOffset {
                field: "metadata",
                offset: 200,
                ..
            })
        ));
    }

    #[test]
    fn reject_constant_pool_offset_inside_header() {
        let mut header = sample_header(ChunkFlags::NONE);
        header.constant_pool_offset = 10;
        let buf = chunk_bytes(&header);
        let result = ChunkHeader::read_from(&mut ByteCursor::new(&buf));
        assert!(matches!(
            result,
            Err(WireError::InvalidOffset {
                field: "constant pool",
                ..
            })
        ));
    }

    #[test]
    fn unknown_major_version_still_parses() {
        let mut header = sample_header(ChunkFlags::NONE);
        header.version_major = 9;
        let buf = chunk_bytes(&header);
        let parsed = ChunkHeader::read_from(&mut ByteCursor::new(&buf)).unwrap();
        assert!(!parsed.is_known_version());
    }
}
