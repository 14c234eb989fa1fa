use jfr_wire::{ByteCursor, ChunkHeader, HEADER_SIZE};
use log::{debug, warn};

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::metadata::MetadataSection;
use crate::reader::ChunkReader;
use crate::scanner::{EventScanner, RecordInfo, ScanSummary};

/// The result of decoding one chunk.
///
/// ```text
/// ┌──────────────────────────────────────────────────────┐
/// │ DecodedChunk                                         │
/// │   header:   ChunkHeader      ← sizes, offsets, time  │
/// │   metadata: MetadataSection  ← string pool + tree    │
/// │   summary:  ScanSummary      ← record / event counts │
/// │   records:  Vec<RecordInfo>  ← empty unless collected│
/// └──────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedChunk {
    pub header: ChunkHeader,
    pub metadata: MetadataSection,
    pub summary: ScanSummary,

    /// Every record in body order, when
    /// [`DecoderConfig::collect_records`] is set.
    pub records: Vec<RecordInfo>,

    /// Bytes in the input after `chunk_size`. Further chunks would live
    /// there; they are not decoded.
    pub trailing_len: usize,
}

/// Decoder for one in-memory chunk.
///
/// Decoding proceeds in three steps:
///
///   1. **Header**: parse the 68-byte fixed-width header at byte 0,
///      check magic and offsets, and fix the body integer encoding from
///      the flag word.
///   2. **Metadata**: at the metadata offset, read the record header,
///      the string pool, and the element tree.
///   3. **Scan**: walk every record from the end of the header to
///      `chunk_size` by declared size, requiring an exact landing.
///
/// Every piece of per-chunk state (cursor, encoding, string pool) is
/// created inside the call, so concurrent decodes of different buffers
/// share nothing.
///
/// # Example
///
/// ```rust,no_run
/// use jfr_decoder::ChunkDecoder;
///
/// let bytes = std::fs::read("recording.jfr").unwrap();
/// let chunk = ChunkDecoder::decode(&bytes).unwrap();
/// println!("{} events", chunk.summary.event_count);
/// print!("{}", chunk.metadata.root);
/// ```
pub struct ChunkDecoder;

impl ChunkDecoder {
    /// Decode the chunk at the start of `buf` with the default config.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Wire`] for a truncated buffer, bad magic, bad
    ///   header offsets, or a malformed varint.
    /// - [`DecodeError::UnresolvedString`] / [`DecodeError::InvalidUtf8`]
    ///   from the metadata section.
    /// - [`DecodeError::MetadataOverrun`] if the metadata outgrows its record.
    /// - [`DecodeError::ScanDrift`] / [`DecodeError::ScanOvershoot`] if the
    ///   record walk misses the chunk end.
    pub fn decode(buf: &[u8]) -> Result<DecodedChunk, DecodeError> {
        Self::decode_with_config(buf, &DecoderConfig::default())
    }

    /// Same as [`decode`](Self::decode) with explicit limits.
    ///
    /// # Errors
    ///
    /// All errors from [`decode`](Self::decode), plus
    /// [`DecodeError::LimitExceeded`].
    pub fn decode_with_config(
        buf: &[u8],
        config: &DecoderConfig,
    ) -> Result<DecodedChunk, DecodeError> {
        let (header, chunk) = Self::read_header(buf)?;

        // 2. Metadata, read through a reader that cannot see past the chunk.
        let mut reader = ChunkReader::new(ByteCursor::new(chunk), header.body_encoding());
        let metadata =
            MetadataSection::read_from(&mut reader, to_offset(header.metadata_offset), config)?;

        // 3. Record walk over [header_end, chunk_size).
        let (summary, records) =
            Self::scanner(&header, chunk)?.run(config.collect_records)?;
        debug!(
            "scan complete: {} records ({} events) ending at {}",
            summary.record_count, summary.event_count, summary.end_offset
        );

        let trailing_len = buf.len() - chunk.len();
        if trailing_len > 0 {
            debug!("{trailing_len} bytes follow the chunk and were not decoded");
        }

        Ok(DecodedChunk {
            header,
            metadata,
            summary,
            records,
            trailing_len,
        })
    }

    /// Parse only the header and return a lazy scanner over the chunk's
    /// records. The metadata section is not decoded.
    ///
    /// # Errors
    ///
    /// Header errors as for [`decode`](Self::decode).
    pub fn records(buf: &[u8]) -> Result<EventScanner<'_>, DecodeError> {
        let (header, chunk) = Self::read_header(buf)?;
        Self::scanner(&header, chunk)
    }

    fn scanner<'a>(header: &ChunkHeader, chunk: &'a [u8]) -> Result<EventScanner<'a>, DecodeError> {
        EventScanner::new(
            chunk,
            HEADER_SIZE,
            header.body_encoding(),
            to_offset(header.metadata_offset),
            to_offset(header.constant_pool_offset),
        )
    }

    /// Parse and validate the header. Returns it with the chunk's bytes,
    /// `buf[..chunk_size]`.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Wire`] for any header failure.
    pub fn read_header(buf: &[u8]) -> Result<(ChunkHeader, &[u8]), DecodeError> {
        let mut cursor = ByteCursor::new(buf);
        let header = ChunkHeader::read_from(&mut cursor)?;
        debug!(
            "chunk v{}.{}: size={} metadata@{} constant_pool@{} encoding={:?}",
            header.version_major,
            header.version_minor,
            header.chunk_size,
            header.metadata_offset,
            header.constant_pool_offset,
            header.body_encoding()
        );
        if !header.is_known_version() {
            warn!(
                "unrecognized chunk version {}.{}, decoding anyway",
                header.version_major, header.version_minor
            );
        }

        let chunk_size = to_offset(header.chunk_size);
        Ok((header, &buf[..chunk_size]))
    }
}

/// Header sizes and offsets have already been checked against the
/// buffer length, so they fit in `usize`.
#[allow(clippy::cast_possible_truncation)]
fn to_offset(value: u64) -> usize {
    value as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use jfr_wire::header::ChunkFlags;
    use jfr_wire::varint::put_varint;
    use jfr_wire::WireError;

    use crate::string_pool::CHAR_ARRAY_ENCODING;

    /// Header, one event record, then a metadata record naming a lone
    /// root element. Compressed integers throughout.
    fn small_chunk() -> Vec<u8> {
        let mut event = Vec::new();
        put_varint(&mut event, 6);
        put_varint(&mut event, 200);
        event.extend_from_slice(&[1, 2, 3, 4]);

        let mut body = Vec::new();
        put_varint(&mut body, 0); // type
        put_varint(&mut body, 0); // start
        put_varint(&mut body, 0); // duration
        put_varint(&mut body, 1); // metadata id
        put_varint(&mut body, 1); // string count
        body.push(CHAR_ARRAY_ENCODING);
        put_varint(&mut body, 4);
        body.extend_from_slice(b"root");
        body.extend_from_slice(&[0, 0, 0]);
        let mut metadata = Vec::new();
        put_varint(&mut metadata, (body.len() + 1) as u64);
        metadata.extend_from_slice(&body);

        let metadata_offset = HEADER_SIZE + event.len();
        let chunk_size = metadata_offset + metadata.len();
        let header = ChunkHeader {
            version_major: 2,
            version_minor: 0,
            chunk_size: chunk_size as u64,
            constant_pool_offset: HEADER_SIZE as u64,
            metadata_offset: metadata_offset as u64,
            start_time_nanos: 0,
            duration_nanos: 0,
            start_ticks: 0,
            ticks_per_second: 1_000_000_000,
            flags: ChunkFlags::COMPRESSED_INTS,
        };

        let mut buf = Vec::new();
        header.write_to(&mut buf);
        buf.extend_from_slice(&event);
        buf.extend_from_slice(&metadata);
        buf
    }

    #[test]
    fn decodes_small_chunk() {
        let buf = small_chunk();
        let chunk = ChunkDecoder::decode(&buf).unwrap();
        assert_eq!(chunk.header.chunk_size, buf.len() as u64);
        assert_eq!(chunk.metadata.root.name, "root");
        assert_eq!(chunk.metadata.strings.len(), 1);
        assert_eq!(chunk.summary.record_count, 2);
        assert_eq!(chunk.summary.metadata_count, 1);
        assert_eq!(chunk.summary.end_offset, buf.len());
        assert_eq!(chunk.records[0].type_id, 200);
        assert_eq!(chunk.trailing_len, 0);
    }

    #[test]
    fn trailing_bytes_are_reported_not_parsed() {
        let mut buf = small_chunk();
        buf.extend_from_slice(b"FLR\0next chunk");
        let chunk = ChunkDecoder::decode(&buf).unwrap();
        assert_eq!(chunk.trailing_len, 14);
    }

    #[test]
    fn records_without_metadata() {
        let buf = small_chunk();
        let kinds: Vec<_> = ChunkDecoder::records(&buf)
            .unwrap()
            .map(|r| r.unwrap().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![crate::RecordKind::ConstantPool, crate::RecordKind::Metadata]
        );
    }

    #[test]
    fn collect_records_off() {
        let buf = small_chunk();
        let config = DecoderConfig {
            collect_records: false,
            ..DecoderConfig::default()
        };
        let chunk = ChunkDecoder::decode_with_config(&buf, &config).unwrap();
        assert!(chunk.records.is_empty());
        assert_eq!(chunk.summary.record_count, 2);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = small_chunk();
        buf[0] = b'X';
        assert!(matches!(
            ChunkDecoder::decode(&buf),
            Err(DecodeError::Wire(WireError::InvalidMagic { .. }))
        ));
    }

    #[test]
    fn rejects_truncated_chunk() {
        let buf = small_chunk();
        let truncated = &buf[..buf.len() - 3];
        assert!(matches!(
            ChunkDecoder::decode(truncated),
            Err(DecodeError::Wire(WireError::ChunkTooLarge { .. }))
        ));
    }
}
