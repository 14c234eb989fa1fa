#![warn(clippy::pedantic)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod metadata;
pub mod reader;
pub mod scanner;
pub mod string_pool;

pub use config::DecoderConfig;
pub use decoder::{ChunkDecoder, DecodedChunk};
pub use error::DecodeError;
pub use metadata::{Attribute, Element, MetadataHeader, MetadataSection};
pub use scanner::{EventScanner, RecordInfo, RecordKind, ScanSummary};
pub use string_pool::{PoolEntry, StringPool};
