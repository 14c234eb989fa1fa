use log::warn;

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::reader::ChunkReader;

/// Encoding tag of a character-array entry: a length followed by that
/// many UTF-8 bytes. It is the only tag this decoder reads.
pub const CHAR_ARRAY_ENCODING: u8 = 4;

/// One slot of the string pool.
///
/// Only [`CHAR_ARRAY_ENCODING`] entries carry text. Any other tag is
/// kept as `Unsupported` and consumes nothing past the tag byte. It
/// resolves to `""` when referenced, but stays distinguishable from a
/// genuinely empty string for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolEntry {
    Text(String),
    Unsupported { encoding: u8 },
}

impl PoolEntry {
    /// The text this entry resolves to. Unsupported entries resolve to `""`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Unsupported { .. } => "",
        }
    }

    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// Per-chunk ordered table of strings referenced by index from the
/// metadata element tree.
///
/// Built once, in wire order, before the tree is decoded; read-only
/// afterwards. A new chunk gets a new pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringPool {
    entries: Vec<PoolEntry>,
}

impl StringPool {
    /// Decode `count` pool entries at the reader's position.
    ///
    /// Entry layout:
    ///
    /// ```text
    ///   encoding  (1 raw byte)
    ///   if encoding == 4:
    ///     length  (int)
    ///     bytes   [length], UTF-8
    /// ```
    ///
    /// # Errors
    ///
    /// - [`DecodeError::LimitExceeded`] if `count` or an entry length is
    ///   over the configured limit.
    /// - [`DecodeError::InvalidUtf8`] if a character array is not UTF-8.
    /// - [`DecodeError::Wire`] on truncation or a bad varint.
    pub fn read_from(
        reader: &mut ChunkReader<'_>,
        count: u32,
        config: &DecoderConfig,
    ) -> Result<Self, DecodeError> {
        if count > config.max_pool_entries {
            return Err(DecodeError::LimitExceeded {
                what: "string pool entry count",
                value: u64::from(count),
                limit: u64::from(config.max_pool_entries),
            });
        }

        // Every entry is at least its tag byte.
        let capacity = (count as usize).min(reader.remaining_len());
        let mut entries = Vec::with_capacity(capacity);
        for _ in 0..count {
            entries.push(Self::read_entry(reader, config)?);
        }

        let pool = Self { entries };
        let unsupported = pool.unsupported_count();
        if unsupported > 0 {
            warn!(
                "string pool: {unsupported} of {} entries use an unsupported encoding and resolve to empty strings",
                pool.len()
            );
        }
        Ok(pool)
    }

    fn read_entry(
        reader: &mut ChunkReader<'_>,
        config: &DecoderConfig,
    ) -> Result<PoolEntry, DecodeError> {
        let encoding = reader.read_u8()?;
        if encoding != CHAR_ARRAY_ENCODING {
            return Ok(PoolEntry::Unsupported { encoding });
        }

        let (len, _) = reader.read_int()?;
        if len > config.max_string_len {
            return Err(DecodeError::LimitExceeded {
                what: "string length",
                value: u64::from(len),
                limit: u64::from(config.max_string_len),
            });
        }

        let offset = reader.position();
        let bytes = reader.take(len as usize)?;
        let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { offset })?;
        Ok(PoolEntry::Text(text.to_owned()))
    }

    /// Resolve a pool index to its text.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnresolvedString`] if `index >= len()`.
    pub fn resolve(&self, index: u64) -> Result<&str, DecodeError> {
        self.entry(index)
            .map(PoolEntry::as_str)
            .ok_or(DecodeError::UnresolvedString {
                index,
                pool_len: self.entries.len(),
            })
    }

    /// The raw slot at `index`, if any.
    #[must_use]
    pub fn entry(&self, index: u64) -> Option<&PoolEntry> {
        usize::try_from(index).ok().and_then(|i| self.entries.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PoolEntry> {
        self.entries.iter()
    }

    /// How many slots fell back to [`PoolEntry::Unsupported`].
    #[must_use]
    pub fn unsupported_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_unsupported()).count()
    }
}

impl<'a> IntoIterator for &'a StringPool {
    type Item = &'a PoolEntry;
    type IntoIter = std::slice::Iter<'a, PoolEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
