/// Implementation of `jfr events`.
///
/// Walks the chunk body lazily, without decoding the metadata section,
/// and prints one row per record.
///
/// ```text
///   OFFSET      SIZE      TYPE  KIND
///       68        24       101  event
///       92        31       102  event
///    17890        62         1  constant-pool
///    17952       282         0  metadata
/// ---
/// 4 records
/// ```
///
/// With `--json`, each record is one JSON object per line. A scan error is
/// reported after the rows that precede it.
use anyhow::{Context, Result};
use jfr_decoder::{ChunkDecoder, RecordInfo, RecordKind};
use serde::Serialize;

use crate::EventsArgs;

#[derive(Serialize)]
struct RecordRow {
    offset: usize,
    size: u64,
    type_id: u64,
    kind: &'static str,
}

impl From<&RecordInfo> for RecordRow {
    fn from(record: &RecordInfo) -> Self {
        Self {
            offset: record.offset,
            size: record.size,
            type_id: record.type_id,
            kind: kind_label(record.kind),
        }
    }
}

/// Run the `jfr events` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the header is invalid, or
/// the scan fails before reaching `--limit` records.
pub fn run(args: &EventsArgs) -> Result<()> {
    let bytes = crate::read_file(&args.file)?;
    let scanner = ChunkDecoder::records(&bytes)
        .with_context(|| format!("failed to read header of {}", args.file.display()))?;

    if !args.json {
        println!("{:>8}  {:>8}  {:>8}  KIND", "OFFSET", "SIZE", "TYPE");
    }

    let mut printed = 0usize;
    for record in scanner.take(args.limit.unwrap_or(usize::MAX)) {
        let record =
            record.with_context(|| format!("record scan of {} failed", args.file.display()))?;
        let row = RecordRow::from(&record);
        if args.json {
            println!("{}", serde_json::to_string(&row)?);
        } else {
            println!(
                "{:>8}  {:>8}  {:>8}  {}",
                row.offset, row.size, row.type_id, row.kind
            );
        }
        printed += 1;
    }

    if !args.json {
        println!("---");
        println!("{printed} record{}", if printed == 1 { "" } else { "s" });
    }
    Ok(())
}

fn kind_label(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Event => "event",
        RecordKind::ConstantPool => "constant-pool",
        RecordKind::Metadata => "metadata",
    }
}
