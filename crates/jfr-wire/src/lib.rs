#![warn(clippy::pedantic)]

pub mod cursor;
pub mod encoding;
pub mod error;
pub mod header;
pub mod record;
pub mod varint;

pub use cursor::ByteCursor;
pub use encoding::IntEncoding;
pub use error::WireError;
pub use header::{CHUNK_MAGIC, ChunkFlags, ChunkHeader, HEADER_SIZE};
pub use record::EventRecordHeader;
