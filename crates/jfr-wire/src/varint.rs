use crate::cursor::ByteCursor;
use crate::error::WireError;

/// Longest LEB128 form of a `u64`: 64 bits in 7-bit groups.
pub const MAX_VARINT_BYTES: usize = 10;

/// Write `value` as unsigned LEB128 into the front of `buf` and return the
/// length used (1 to [`MAX_VARINT_BYTES`]).
///
/// The low seven bits go first; every byte but the last has bit 7 set.
///
/// | Value   | Bytes                |
/// |---------|----------------------|
/// | 0       | `[0x00]`             |
/// | 127     | `[0x7F]`             |
/// | 128     | `[0x80, 0x01]`       |
/// | 300     | `[0xAC, 0x02]`       |
/// | 16384   | `[0x80, 0x80, 0x01]` |
///
/// # Panics
///
/// If `buf` is too short for the encoding. [`MAX_VARINT_BYTES`] always
/// suffices.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_varint(mut value: u64, buf: &mut [u8]) -> usize {
    let mut len = 0;
    while value >= 0x80 {
        buf[len] = (value as u8) | 0x80;
        value >>= 7;
        len += 1;
    }
    buf[len] = value as u8;
    len + 1
}

/// Append the LEB128 form of `value` to `out`, returning its length.
pub fn put_varint(out: &mut Vec<u8>, value: u64) -> usize {
    let mut scratch = [0u8; MAX_VARINT_BYTES];
    let len = encode_varint(value, &mut scratch);
    out.extend_from_slice(&scratch[..len]);
    len
}

/// Decode one unsigned LEB128 value from the front of `buf`.
///
/// Returns `(value, bytes_consumed)`. Error offsets are relative to
/// `buf`.
///
/// # Errors
///
/// - [`WireError::VarintTooLong`] if the tenth byte still carries the
///   continuation bit.
/// - [`WireError::VarintOverflow`] if the tenth byte sets bits above
///   bit 63.
/// - [`WireError::UnexpectedEof`] if `buf` ends before the last byte.
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), WireError> {
    let mut value = 0u64;
    for (i, &byte) in buf.iter().take(MAX_VARINT_BYTES).enumerate() {
        let group = u64::from(byte & 0x7F);
        if i == MAX_VARINT_BYTES - 1 {
            if byte & 0x80 != 0 {
                return Err(WireError::VarintTooLong { offset: 0 });
            }
            // Only one bit of a u64 is left for the tenth group.
            if group > 1 {
                return Err(WireError::VarintOverflow { offset: 0 });
            }
        }
        value |= group << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(WireError::UnexpectedEof {
        offset: buf.len(),
        needed: 1,
    })
}

/// Decode a varint at the cursor and advance past it.
///
/// Errors carry absolute offsets (relative to the cursor's buffer).
/// The cursor does not move on failure.
///
/// # Errors
///
/// Same as [`decode_varint`].
pub fn read_varint(cursor: &mut ByteCursor<'_>) -> Result<(u64, usize), WireError> {
    let start = cursor.position();
    let (value, n) = decode_varint(cursor.remaining()).map_err(|e| match e {
        WireError::VarintTooLong { .. } => WireError::VarintTooLong { offset: start },
        WireError::VarintOverflow { .. } => WireError::VarintOverflow { offset: start },
        WireError::UnexpectedEof { offset, needed } => WireError::UnexpectedEof {
            offset: start + offset,
            needed,
        },
        other => other,
    })?;
    cursor.skip(n)?;
    Ok((value, n))
}
