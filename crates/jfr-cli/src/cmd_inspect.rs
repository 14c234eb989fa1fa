/// Implementation of `jfr inspect`.
///
/// Decodes the first chunk and prints its header, the metadata record
/// header, and what the record scan found.
///
/// # Output format
///
/// ```text
/// Chunk:     v2.0, 18234 bytes, compressed integers (flags=0x00000001)
/// Offsets:   constant pool @17890, metadata @17952
/// Time:      start=1700000000000000000ns duration=1000000000ns
/// Ticks:     start=42 rate=1000000000/s
/// Metadata:  id=1 size=282 strings=24 (1 unsupported) elements=31
/// Records:   203 total, 201 events, 1 constant pool, 1 metadata
/// ```
use anyhow::Result;
use jfr_decoder::{DecodedChunk, DecoderConfig};
use jfr_wire::IntEncoding;
use serde::Serialize;

use crate::InspectArgs;

/// Flattened view of a decoded chunk for `--json`.
#[derive(Serialize)]
struct InspectReport<'a> {
    version: String,
    chunk_size: u64,
    encoding: &'static str,
    flags: u32,
    constant_pool_offset: u64,
    metadata_offset: u64,
    start_time_nanos: u64,
    duration_nanos: u64,
    start_ticks: u64,
    ticks_per_second: u64,
    metadata: MetadataReport<'a>,
    records: RecordsReport,
    trailing_bytes: usize,
}

#[derive(Serialize)]
struct MetadataReport<'a> {
    id: u64,
    size: u32,
    start_time: u64,
    duration: u64,
    string_count: usize,
    unsupported_strings: usize,
    elements: usize,
    root: &'a str,
}

#[derive(Serialize)]
struct RecordsReport {
    total: usize,
    events: usize,
    constant_pools: usize,
    metadata: usize,
}

impl<'a> InspectReport<'a> {
    fn new(chunk: &'a DecodedChunk) -> Self {
        let header = &chunk.header;
        let metadata = &chunk.metadata;
        Self {
            version: format!("{}.{}", header.version_major, header.version_minor),
            chunk_size: header.chunk_size,
            encoding: encoding_label(header.body_encoding()),
            flags: header.flags.raw(),
            constant_pool_offset: header.constant_pool_offset,
            metadata_offset: header.metadata_offset,
            start_time_nanos: header.start_time_nanos,
            duration_nanos: header.duration_nanos,
            start_ticks: header.start_ticks,
            ticks_per_second: header.ticks_per_second,
            metadata: MetadataReport {
                id: metadata.header.metadata_id,
                size: metadata.header.size,
                start_time: metadata.header.start_time,
                duration: metadata.header.duration,
                string_count: metadata.strings.len(),
                unsupported_strings: metadata.strings.unsupported_count(),
                elements: metadata.root.count(),
                root: &metadata.root.name,
            },
            records: RecordsReport {
                total: chunk.summary.record_count,
                events: chunk.summary.event_count,
                constant_pools: chunk.summary.constant_pool_count,
                metadata: chunk.summary.metadata_count,
            },
            trailing_bytes: chunk.trailing_len,
        }
    }
}

/// Run the `jfr inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the chunk fails to
/// decode.
pub fn run(args: &InspectArgs, config: &DecoderConfig) -> Result<()> {
    // Counts are all this command needs from the scan.
    let config = DecoderConfig {
        collect_records: false,
        ..config.clone()
    };
    let chunk = crate::decode_file(&args.file, &config)?;
    let report = InspectReport::new(&chunk);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Chunk:     v{}, {} bytes, {} integers (flags=0x{:08X})",
        report.version, report.chunk_size, report.encoding, report.flags
    );
    println!(
        "Offsets:   constant pool @{}, metadata @{}",
        report.constant_pool_offset, report.metadata_offset
    );
    println!(
        "Time:      start={}ns duration={}ns",
        report.start_time_nanos, report.duration_nanos
    );
    println!(
        "Ticks:     start={} rate={}/s",
        report.start_ticks, report.ticks_per_second
    );

    let metadata = &report.metadata;
    let unsupported = if metadata.unsupported_strings > 0 {
        format!(" ({} unsupported)", metadata.unsupported_strings)
    } else {
        String::new()
    };
    println!(
        "Metadata:  id={} size={} strings={}{unsupported} elements={}",
        metadata.id, metadata.size, metadata.string_count, metadata.elements
    );

    let records = &report.records;
    println!(
        "Records:   {} total, {} event{}, {} constant pool, {} metadata",
        records.total,
        records.events,
        if records.events == 1 { "" } else { "s" },
        records.constant_pools,
        records.metadata
    );

    if report.trailing_bytes > 0 {
        println!(
            "Trailing:  {} bytes after this chunk (not decoded)",
            report.trailing_bytes
        );
    }

    Ok(())
}

fn encoding_label(encoding: IntEncoding) -> &'static str {
    match encoding {
        IntEncoding::Fixed => "fixed-width",
        IntEncoding::Compressed => "compressed",
    }
}
