use crate::cursor::ByteCursor;
use crate::error::WireError;
use crate::varint::read_varint;

/// How the integers in a chunk body are laid out on the wire.
///
/// Chosen once per chunk from the header's flag word and then carried
/// alongside the cursor for every body read. The header itself is
/// always [`IntEncoding::Fixed`], since the mode is not known until the
/// flag word has been read.
///
/// ```text
/// ┌────────────┬───────────────────────┬──────────────────────────────┐
/// │ Mode       │ read_int (32-bit)     │ read_long (64-bit)           │
/// ├────────────┼───────────────────────┼──────────────────────────────┤
/// │ Fixed      │ 4 bytes, big-endian   │ 8 bytes, big-endian          │
/// │ Compressed │ varint, low 32 bits   │ varint (1-10 bytes)          │
/// └────────────┴───────────────────────┴──────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntEncoding {
    Fixed,
    Compressed,
}

impl IntEncoding {
    /// Read a 32-bit body integer. Returns `(value, bytes_consumed)`.
    ///
    /// In compressed mode this is the 64-bit varint read truncated to
    /// its low 32 bits.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] on truncation, or a varint error in
    /// compressed mode.
    pub fn read_int(self, cursor: &mut ByteCursor<'_>) -> Result<(u32, usize), WireError> {
        match self {
            Self::Fixed => Ok((read_u32_be(cursor)?, 4)),
            Self::Compressed => {
                let (value, n) = read_varint(cursor)?;
                #[allow(clippy::cast_possible_truncation)]
                let low = value as u32;
                Ok((low, n))
            }
        }
    }

    /// Read a 64-bit body integer. Returns `(value, bytes_consumed)`.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] on truncation, or a varint error in
    /// compressed mode.
    pub fn read_long(self, cursor: &mut ByteCursor<'_>) -> Result<(u64, usize), WireError> {
        match self {
            Self::Fixed => Ok((read_u64_be(cursor)?, 8)),
            Self::Compressed => read_varint(cursor),
        }
    }

    #[must_use]
    pub fn is_compressed(self) -> bool {
        self == Self::Compressed
    }
}

/// Read a big-endian `u16`.
///
/// # Errors
///
/// [`WireError::UnexpectedEof`] if fewer than 2 bytes remain.
pub fn read_u16_be(cursor: &mut ByteCursor<'_>) -> Result<u16, WireError> {
    cursor.take_array().map(u16::from_be_bytes)
}

/// Read a big-endian `u32`.
///
/// # Errors
///
/// [`WireError::UnexpectedEof`] if fewer than 4 bytes remain.
pub fn read_u32_be(cursor: &mut ByteCursor<'_>) -> Result<u32, WireError> {
    cursor.take_array().map(u32::from_be_bytes)
}

/// Read a big-endian `u64`.
///
/// # Errors
///
/// [`WireError::UnexpectedEof`] if fewer than 8 bytes remain.
pub fn read_u64_be(cursor: &mut ByteCursor<'_>) -> Result<u64, WireError> {
    cursor.take_array().map(u64::from_be_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fixed_reads_are_big_endian() {
        let buf = [0x01, 0x02, 0x00, 0x00, 0x00, 0x2A];
        let mut cursor = ByteCursor::new(&buf);
        assert_eq!(read_u16_be(&mut cursor).unwrap(), 0x0102);
        assert_eq!(read_u32_be(&mut cursor).unwrap(), 42);
    }

    #[test]
    fn fixed_mode_ignores_continuation_bits() {
        // 0x80 bytes would be an unterminated varint; fixed mode must not care.
        let buf = [0x80, 0x80, 0x80, 0x80];
        let mut cursor = ByteCursor::new(&buf);
        let (value, n) = IntEncoding::Fixed.read_int(&mut cursor).unwrap();
        assert_eq!(value, 0x8080_8080);
        assert_eq!(n, 4);
    }

    #[test]
    fn compressed_int_truncates_to_low_32_bits() {
        let mut buf = Vec::new();
        crate::varint::put_varint(&mut buf, 0x1_0000_0005);
        let mut cursor = ByteCursor::new(&buf);
        let (value, n) = IntEncoding::Compressed.read_int(&mut cursor).unwrap();
        assert_eq!(value, 5);
        assert_eq!(n, buf.len());
    }

    #[test]
    fn fixed_long_truncated() {
        let buf = [0u8; 7];
        let mut cursor = ByteCursor::new(&buf);
        assert!(matches!(
            IntEncoding::Fixed.read_long(&mut cursor),
            Err(WireError::UnexpectedEof { offset: 0, needed: 1 })
        ));
    }

    proptest! {
        #[test]
        fn fixed_u16_roundtrip(n in any::<u16>()) {
            let buf = n.to_be_bytes();
            prop_assert_eq!(read_u16_be(&mut ByteCursor::new(&buf)).unwrap(), n);
        }

        #[test]
        fn fixed_u32_roundtrip(n in any::<u32>()) {
            let buf = n.to_be_bytes();
            let (value, consumed) = IntEncoding::Fixed
                .read_int(&mut ByteCursor::new(&buf))
                .unwrap();
            prop_assert_eq!(value, n);
            prop_assert_eq!(consumed, 4);
        }

        #[test]
        fn fixed_u64_roundtrip(n in any::<u64>()) {
            let buf = n.to_be_bytes();
            let (value, consumed) = IntEncoding::Fixed
                .read_long(&mut ByteCursor::new(&buf))
                .unwrap();
            prop_assert_eq!(value, n);
            prop_assert_eq!(consumed, 8);
        }
    }
}
