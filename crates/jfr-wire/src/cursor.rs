use crate::error::WireError;

/// Read position over an immutable byte buffer.
///
/// `ByteCursor` never copies the buffer: every read hands back a
/// sub-slice of the original bytes and advances `pos`. All decoding in
/// a chunk goes through one of these, so the position is always the
/// byte offset from the start of the chunk.
///
/// ```text
///   buf: [ .. consumed .. | .. remaining .. ]
///                         ^ pos
/// ```
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at position 0.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current byte offset into the buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The unread bytes.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Move the cursor to an absolute offset.
    ///
    /// Seeking to exactly `len()` is allowed (it is the end-of-buffer
    /// position); anything beyond is an error.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if `pos > len()`.
    pub fn seek(&mut self, pos: usize) -> Result<(), WireError> {
        if pos > self.buf.len() {
            return Err(WireError::UnexpectedEof {
                offset: self.buf.len(),
                needed: pos - self.buf.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Consume exactly `n` bytes and return them.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `n` bytes remain. The
    /// cursor does not move on failure.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let available = self.buf.len() - self.pos;
        if n > available {
            return Err(WireError::UnexpectedEof {
                offset: self.pos,
                needed: n - available,
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Consume `N` bytes into a fixed-size array.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `N` bytes remain.
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Consume a single byte.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] at end of buffer.
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        let [b] = self.take_array::<1>()?;
        Ok(b)
    }

    /// Advance by `n` bytes without looking at them.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `n` bytes remain.
    pub fn skip(&mut self, n: usize) -> Result<(), WireError> {
        self.take(n).map(|_| ())
    }
}
