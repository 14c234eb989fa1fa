use jfr_wire::{ByteCursor, IntEncoding, WireError};
use log::trace;

use crate::error::DecodeError;
use crate::reader::ChunkReader;

/// What a scanned record is, judged by where it sits.
///
/// The metadata section and the constant pool are ordinary
/// size-prefixed records in the body; the header's offsets are what
/// single them out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Metadata,
    ConstantPool,
    Event,
}

/// Location, declared size and type of one record. The payload is
/// never looked at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordInfo {
    pub offset: usize,
    pub size: u64,
    pub type_id: u64,
    pub kind: RecordKind,
}

/// Totals for a completed scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Every record walked, metadata and constant pool included.
    pub record_count: usize,
    /// Records of kind [`RecordKind::Event`] only.
    pub event_count: usize,
    pub metadata_count: usize,
    pub constant_pool_count: usize,
    /// Offset the scan finished on; equals the chunk size on success.
    pub end_offset: usize,
}

impl ScanSummary {
    fn add(&mut self, record: &RecordInfo) {
        self.record_count += 1;
        match record.kind {
            RecordKind::Metadata => self.metadata_count += 1,
            RecordKind::ConstantPool => self.constant_pool_count += 1,
            RecordKind::Event => self.event_count += 1,
        }
        self.end_offset = record.offset + usize::try_from(record.size).unwrap_or(usize::MAX);
    }
}

/// Lazy walk over the records of a chunk body.
///
/// Reads each record's size and type, then skips the rest of the record
/// by its declared size. The walk must land exactly on the chunk end:
///
/// ```text
///   header_end                                        chunk_size
///   │ size type payload... │ size type payload... │ ... │
///   ^ record 0             ^ record 1                    ^ stop
/// ```
///
/// Landing short ([`DecodeError::ScanDrift`]) or jumping past the end
/// ([`DecodeError::ScanOvershoot`]) ends the iteration with an error;
/// no later records are produced after one.
pub struct EventScanner<'a> {
    reader: ChunkReader<'a>,
    end: usize,
    metadata_offset: usize,
    constant_pool_offset: usize,
    failed: bool,
}

impl<'a> EventScanner<'a> {
    /// Scan `chunk[start..]`. `chunk` must be exactly the chunk's bytes,
    /// so its length is the end boundary.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if `start` is past the chunk.
    pub fn new(
        chunk: &'a [u8],
        start: usize,
        encoding: IntEncoding,
        metadata_offset: usize,
        constant_pool_offset: usize,
    ) -> Result<Self, DecodeError> {
        let mut reader = ChunkReader::new(ByteCursor::new(chunk), encoding);
        reader.seek(start)?;
        Ok(Self {
            reader,
            end: chunk.len(),
            metadata_offset,
            constant_pool_offset,
            failed: false,
        })
    }

    /// Offset of the next record to be read.
    #[must_use]
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    /// Drain the scanner, returning totals and (when `collect` is set)
    /// every record.
    ///
    /// # Errors
    ///
    /// The first error the walk hits.
    pub fn run(self, collect: bool) -> Result<(ScanSummary, Vec<RecordInfo>), DecodeError> {
        let mut summary = ScanSummary {
            end_offset: self.position(),
            ..ScanSummary::default()
        };
        let mut records = Vec::new();
        for record in self {
            let record = record?;
            summary.add(&record);
            if collect {
                records.push(record);
            }
        }
        Ok((summary, records))
    }

    fn kind_at(&self, offset: usize) -> RecordKind {
        if offset == self.metadata_offset {
            RecordKind::Metadata
        } else if offset == self.constant_pool_offset {
            RecordKind::ConstantPool
        } else {
            RecordKind::Event
        }
    }

    fn read_record(&mut self) -> Result<RecordInfo, DecodeError> {
        let offset = self.reader.position();

        let header = match self.reader.read_record_header() {
            Ok(header) => header,
            // The chunk slice ends at the boundary, so running out of
            // bytes mid-prefix means the leftover tail is not a record.
            Err(WireError::UnexpectedEof { .. }) => {
                return Err(DecodeError::ScanDrift {
                    offset,
                    end: self.end,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let record_end = offset as u64 + header.size;
        if record_end > self.end as u64 {
            return Err(DecodeError::ScanOvershoot {
                offset,
                record_end,
                end: self.end,
            });
        }

        // record_end <= end, so the payload length fits in usize
        self.reader.take(usize::try_from(header.payload_len()).unwrap_or(usize::MAX))?;

        let kind = self.kind_at(offset);
        trace!(
            "record at {offset}: size={} type={} kind={kind:?}",
            header.size, header.type_id
        );
        Ok(RecordInfo {
            offset,
            size: header.size,
            type_id: header.type_id,
            kind,
        })
    }
}

impl Iterator for EventScanner<'_> {
    type Item = Result<RecordInfo, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.position() >= self.end {
            return None;
        }
        let result = self.read_record();
        self.failed = result.is_err();
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jfr_wire::varint::put_varint;

    /// A compressed-mode record of exactly `size` bytes.
    fn record(out: &mut Vec<u8>, size: usize, type_id: u64) {
        let start = out.len();
        put_varint(out, size as u64);
        put_varint(out, type_id);
        let used = out.len() - start;
        out.resize(start + size, 0xEE);
        assert!(used <= size);
    }

    fn scan(body: &[u8]) -> Result<(ScanSummary, Vec<RecordInfo>), DecodeError> {
        EventScanner::new(body, 0, IntEncoding::Compressed, usize::MAX, usize::MAX)?.run(true)
    }

    #[test]
    fn empty_region_yields_nothing() {
        let (summary, records) = scan(&[]).unwrap();
        assert_eq!(summary.record_count, 0);
        assert!(records.is_empty());
    }

    #[test]
    fn skips_by_declared_size() {
        let mut body = Vec::new();
        record(&mut body, 20, 7);
        record(&mut body, 5, 300);
        record(&mut body, 200, 1);

        let (summary, records) = scan(&body).unwrap();
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.end_offset, body.len());
        assert_eq!(
            records.iter().map(|r| (r.offset, r.type_id)).collect::<Vec<_>>(),
            vec![(0, 7), (20, 300), (25, 1)]
        );
    }

    #[test]
    fn one_record_advances_past_payload() {
        // size=20 and type=7 take one byte each when compressed; pad the
        // prefix to four bytes with redundant varint groups.
        let mut body = vec![0x94, 0x80, 0x00, 0x07];
        body.resize(20, 0);

        let mut scanner =
            EventScanner::new(&body, 0, IntEncoding::Compressed, usize::MAX, usize::MAX).unwrap();
        let info = scanner.next().unwrap().unwrap();
        assert_eq!(info.size, 20);
        assert_eq!(info.type_id, 7);
        assert_eq!(scanner.position(), 4 + 16);
        assert!(scanner.next().is_none());
    }

    #[test]
    fn overshoot_is_an_error() {
        let mut body = Vec::new();
        record(&mut body, 10, 2);
        body.truncate(8);

        let result = scan(&body);
        assert_eq!(
            result,
            Err(DecodeError::ScanOvershoot {
                offset: 0,
                record_end: 10,
                end: 8
            })
        );
    }

    #[test]
    fn short_tail_is_drift() {
        let mut body = Vec::new();
        record(&mut body, 10, 2);
        body.push(0x80); // half a varint left over

        assert_eq!(
            scan(&body),
            Err(DecodeError::ScanDrift { offset: 10, end: 11 })
        );
    }

    #[test]
    fn zero_size_record_stops_the_scan() {
        let body = [0x00, 0x01, 0x00, 0x00];
        assert!(matches!(
            scan(&body),
            Err(DecodeError::Wire(WireError::RecordTooSmall { size: 0, .. }))
        ));
    }

    #[test]
    fn scanner_is_fused_after_error() {
        let body = [0x00, 0x01];
        let mut scanner =
            EventScanner::new(&body, 0, IntEncoding::Compressed, usize::MAX, usize::MAX).unwrap();
        assert!(scanner.next().unwrap().is_err());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn fixed_mode_prefix() {
        let mut body = Vec::new();
        body.extend_from_slice(&16u32.to_be_bytes());
        body.extend_from_slice(&42u64.to_be_bytes());
        body.extend_from_slice(&[0; 4]);

        let (summary, records) =
            EventScanner::new(&body, 0, IntEncoding::Fixed, usize::MAX, usize::MAX)
                .unwrap()
                .run(true)
                .unwrap();
        assert_eq!(summary.record_count, 1);
        assert_eq!(records[0].type_id, 42);
    }

    #[test]
    fn kinds_follow_header_offsets() {
        let mut body = Vec::new();
        record(&mut body, 8, 1);
        record(&mut body, 8, 0);
        record(&mut body, 8, 99);

        let (summary, records) = EventScanner::new(&body, 0, IntEncoding::Compressed, 8, 0)
            .unwrap()
            .run(false)
            .unwrap();
        assert!(records.is_empty());
        assert_eq!(summary.constant_pool_count, 1);
        assert_eq!(summary.metadata_count, 1);
        assert_eq!(summary.event_count, 1);
    }
}
