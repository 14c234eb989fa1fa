/// JFR chunk command-line tool: inspect, validate, and dump the metadata
/// and record layout of a recording's first chunk.
///
/// # Command overview
///
/// ```text
/// jfr <COMMAND> [OPTIONS] <FILE>
///
/// Commands:
///   inspect    Print header, metadata header and record counts
///   validate   Check a chunk for structural correctness
///   metadata   Print the metadata element tree (and string pool)
///   events     List every record's offset, size, type and kind
///   help       Print help information
///
/// Global options:
///   -v, --verbose               Debug-level logging (RUST_LOG overrides)
///   --max-strings <N>           String pool entry limit
///   --max-string-len <BYTES>    Per-string byte limit
///   -h, --help                  Print help
///   -V, --version               Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                 |
/// |------|-----------------------------------------|
/// | 0    | Success                                 |
/// | 1    | Error (I/O failure, invalid chunk, etc.)|
///
/// Only the first chunk of a file is decoded. Diagnostics go to stderr
/// so stdout can be piped cleanly.
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jfr_decoder::{ChunkDecoder, DecodedChunk, DecoderConfig};
use log::debug;

mod cmd_events;
mod cmd_inspect;
mod cmd_metadata;
mod cmd_validate;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Inspect JFR recording chunks.
#[derive(Parser)]
#[command(name = "jfr", version, about = "JFR chunk inspection tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decode progress at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Refuse string pools declaring more entries than this.
    #[arg(long, global = true, value_name = "N")]
    max_strings: Option<u32>,

    /// Refuse string-pool entries longer than this many bytes.
    #[arg(long, global = true, value_name = "BYTES")]
    max_string_len: Option<u32>,
}

impl Cli {
    /// Decoder limits from the defaults, overridden by any flags given.
    fn decoder_config(&self) -> DecoderConfig {
        let defaults = DecoderConfig::default();
        DecoderConfig {
            max_pool_entries: self.max_strings.unwrap_or(defaults.max_pool_entries),
            max_string_len: self.max_string_len.unwrap_or(defaults.max_string_len),
            ..defaults
        }
    }
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print header fields, the metadata header and record counts.
    Inspect(InspectArgs),
    /// Check a chunk for structural correctness.
    Validate(ValidateArgs),
    /// Print the metadata element tree.
    Metadata(MetadataArgs),
    /// List the records in the chunk body.
    Events(EventsArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `jfr inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the recording.
    pub file: PathBuf,

    /// Emit a JSON object instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `jfr validate`.
///
/// Runs a full decode and reports `✓` lines on success or a `✗`
/// diagnostic on the first fatal error.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the recording.
    pub file: PathBuf,
}

/// Arguments for `jfr metadata`.
#[derive(clap::Args)]
pub struct MetadataArgs {
    /// Path to the recording.
    pub file: PathBuf,

    /// Also list the string pool, marking entries with an unsupported
    /// encoding.
    #[arg(long)]
    pub strings: bool,
}

/// Arguments for `jfr events`.
///
/// ```text
/// ┌─────────────┬───────────────────────────────────────────────┐
/// │ Flag        │ Effect                                        │
/// ├─────────────┼───────────────────────────────────────────────┤
/// │ --limit N   │ Stop after N records (the scan still checks   │
/// │             │ only the records it reaches)                  │
/// │ --json      │ One JSON object per line                      │
/// └─────────────┴───────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct EventsArgs {
    /// Path to the recording.
    pub file: PathBuf,

    /// Print at most this many records.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Emit JSON lines instead of a table.
    #[arg(long)]
    pub json: bool,
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Read a whole file into memory.
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Read and fully decode the first chunk of `path`.
pub(crate) fn decode_file(path: &Path, config: &DecoderConfig) -> Result<DecodedChunk> {
    let bytes = read_file(path)?;
    ChunkDecoder::decode_with_config(&bytes, config)
        .with_context(|| format!("failed to decode {}", path.display()))
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = cli.decoder_config();
    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args, &config),
        Commands::Validate(args) => cmd_validate::run(&args, &config),
        Commands::Metadata(args) => cmd_metadata::run(&args, &config),
        Commands::Events(args) => cmd_events::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
