/// Implementation of `jfr validate`.
///
/// Runs a full decode of the first chunk and reports either a series of
/// success checkmarks (`✓`) or a diagnostic failure line (`✗`). A failure
/// is returned as `Err`, which `main` turns into exit code 1.
///
/// # Success output
///
/// ```text
/// ✓ Header: valid (v2.0, 18234 bytes, compressed integers)
/// ✓ Metadata: 24 strings, 31 elements
/// ✓ Records: 203 records end exactly at offset 18234
/// ```
///
/// Unsupported string-pool encodings and unknown versions do not fail
/// validation; they are reported with `!` lines.
///
/// # Failure output
///
/// ```text
/// ✗ Error: record scan overshot the chunk: record at offset 90 ends at 1114, chunk ends at 120
/// ```
use anyhow::{Result, anyhow};
use jfr_decoder::{ChunkDecoder, DecodeError, DecoderConfig};
use jfr_wire::{IntEncoding, WireError};

use crate::ValidateArgs;

/// Run the `jfr validate` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the chunk fails any
/// structural check.
pub fn run(args: &ValidateArgs, config: &DecoderConfig) -> Result<()> {
    let bytes = crate::read_file(&args.file)?;
    let config = DecoderConfig {
        collect_records: false,
        ..config.clone()
    };

    match ChunkDecoder::decode_with_config(&bytes, &config) {
        Ok(chunk) => {
            let header = &chunk.header;
            let encoding = match header.body_encoding() {
                IntEncoding::Fixed => "fixed-width",
                IntEncoding::Compressed => "compressed",
            };
            println!(
                "✓ Header: valid (v{}.{}, {} bytes, {encoding} integers)",
                header.version_major, header.version_minor, header.chunk_size
            );
            if !header.is_known_version() {
                println!("! Version: major version {} is not recognised", header.version_major);
            }

            let strings = &chunk.metadata.strings;
            println!(
                "✓ Metadata: {} string{}, {} elements",
                strings.len(),
                if strings.len() == 1 { "" } else { "s" },
                chunk.metadata.root.count()
            );
            let unsupported = strings.unsupported_count();
            if unsupported > 0 {
                println!("! Strings: {unsupported} entries use an unsupported encoding");
            }

            println!(
                "✓ Records: {} record{} end exactly at offset {}",
                chunk.summary.record_count,
                if chunk.summary.record_count == 1 { "" } else { "s" },
                chunk.summary.end_offset
            );
            if chunk.trailing_len > 0 {
                println!(
                    "! Trailing: {} bytes after the first chunk were not checked",
                    chunk.trailing_len
                );
            }
            Ok(())
        }

        Err(e) => {
            println!("✗ Error: {}", diagnostic(&e));
            Err(anyhow!("validation failed"))
        }
    }
}

// ── Error formatting ──────────────────────────────────────────────────────────

/// Turn a `DecodeError` into a one-line diagnostic naming the part of the
/// chunk that failed.
///
/// ```text
/// ┌──────────────────────────┬──────────────────────────────────────────┐
/// │ DecodeError variant      │ Diagnostic prefix                        │
/// ├──────────────────────────┼──────────────────────────────────────────┤
/// │ Wire(InvalidMagic)       │ "not a chunk: ..."                       │
/// │ Wire(ChunkTooLarge)      │ "truncated chunk: ..."                   │
/// │ Wire(InvalidOffset)      │ "invalid header: ..."                    │
/// │ MetadataOverrun          │ "metadata section: ..."                  │
/// │ ScanDrift / ScanOvershoot│ "record scan ...: ..."                   │
/// │ anything else            │ "<error Display>"                        │
/// └──────────────────────────┴──────────────────────────────────────────┘
/// ```
fn diagnostic(e: &DecodeError) -> String {
    match e {
        DecodeError::Wire(inner @ WireError::InvalidMagic { .. }) => {
            format!("not a chunk: {inner}")
        }
        DecodeError::Wire(inner @ WireError::ChunkTooLarge { .. }) => {
            format!("truncated chunk: {inner}")
        }
        DecodeError::Wire(inner @ WireError::InvalidOffset { .. }) => {
            format!("invalid header: {inner}")
        }
        DecodeError::MetadataOverrun {
            declared_end,
            actual_end,
        } => format!(
            "metadata section: tree ends at offset {actual_end}, record ends at {declared_end}"
        ),
        DecodeError::ScanDrift { offset, end } => format!(
            "record scan stopped short: {} leftover bytes at offset {offset}",
            end - offset
        ),
        DecodeError::ScanOvershoot {
            offset,
            record_end,
            end,
        } => format!(
            "record scan overshot the chunk: record at offset {offset} ends at {record_end}, chunk ends at {end}"
        ),
        other => other.to_string(),
    }
}
