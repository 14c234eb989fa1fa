//! Fixture writer for chunk decoder tests and benches.
//!
//! [`ChunkBuilder`] lays out a complete chunk the way a recorder would:
//!
//! ```text
//!   header (68 bytes)
//!   event records ...
//!   constant pool record
//!   metadata record (string pool + element tree)
//! ```
//!
//! Every size field is computed from what was actually written, so a
//! built chunk always decodes cleanly unless a test deliberately breaks
//! it (raw records, out-of-range string indices, unsupported encodings).

use jfr_wire::header::ChunkFlags;
use jfr_wire::varint::put_varint;
use jfr_wire::{ChunkHeader, HEADER_SIZE, IntEncoding};

/// Encoding tag for character-array string-pool entries.
pub const CHAR_ARRAY: u8 = 4;

/// Event type id the builder gives the metadata record.
pub const METADATA_TYPE_ID: u64 = 0;

/// Event type id the builder gives the constant pool record.
pub const CONSTANT_POOL_TYPE_ID: u64 = 1;

/// A string reference inside an [`ElementDef`]: either text, interned
/// into the pool at build time, or a raw pool index written as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrRef {
    Text(String),
    Index(u32),
}

impl From<&str> for StrRef {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<u32> for StrRef {
    fn from(i: u32) -> Self {
        Self::Index(i)
    }
}

/// Element tree description for the metadata section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementDef {
    pub name: StrRef,
    pub attributes: Vec<(StrRef, StrRef)>,
    pub children: Vec<ElementDef>,
}

impl ElementDef {
    pub fn new(name: impl Into<StrRef>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<StrRef>, value: impl Into<StrRef>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn child(mut self, child: ElementDef) -> Self {
        self.children.push(child);
        self
    }

    /// Number of elements in this subtree.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ElementDef::count).sum::<usize>()
    }
}

#[derive(Clone, Debug)]
enum PoolSlot {
    Text(String),
    Unsupported(u8),
}

#[derive(Clone, Debug)]
enum BodyRecord {
    Event { type_id: u64, payload: Vec<u8> },
    Raw(Vec<u8>),
}

/// A built chunk plus the offsets the builder chose.
#[derive(Clone, Debug)]
pub struct BuiltChunk {
    pub bytes: Vec<u8>,
    pub metadata_offset: usize,
    pub constant_pool_offset: usize,
    pub event_offsets: Vec<usize>,
    /// Final pool contents in index order (`None` for unsupported slots).
    pub strings: Vec<Option<String>>,
}

/// Builder for a single chunk.
///
/// ```rust
/// use jfr_tests::{ChunkBuilder, ElementDef};
///
/// let chunk = ChunkBuilder::new()
///     .root(ElementDef::new("root").child(ElementDef::new("metadata")))
///     .event(101, vec![0; 12])
///     .build();
/// assert_eq!(chunk.event_offsets.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct ChunkBuilder {
    encoding: IntEncoding,
    flags: Option<u32>,
    version: (u16, u16),
    start_time_nanos: u64,
    duration_nanos: u64,
    start_ticks: u64,
    ticks_per_second: u64,
    metadata_id: u64,
    strings: Vec<PoolSlot>,
    root: ElementDef,
    records: Vec<BodyRecord>,
}

impl Default for ChunkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkBuilder {
    /// Compressed integers, version 2.0, a lone `root` element, no events.
    pub fn new() -> Self {
        Self {
            encoding: IntEncoding::Compressed,
            flags: None,
            version: (2, 0),
            start_time_nanos: 1_700_000_000_000_000_000,
            duration_nanos: 1_000_000_000,
            start_ticks: 42,
            ticks_per_second: 1_000_000_000,
            metadata_id: 1,
            strings: Vec::new(),
            root: ElementDef::new("root"),
            records: Vec::new(),
        }
    }

    /// Switch the body to fixed-width big-endian integers.
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.encoding = IntEncoding::Fixed;
        self
    }

    /// Override the raw flag word. The body is still written in the
    /// encoding chosen with [`fixed`](Self::fixed).
    #[must_use]
    pub fn flags(mut self, raw: u32) -> Self {
        self.flags = Some(raw);
        self
    }

    #[must_use]
    pub fn version(mut self, major: u16, minor: u16) -> Self {
        self.version = (major, minor);
        self
    }

    /// Append a character-array pool entry ahead of any interned names.
    #[must_use]
    pub fn string(mut self, s: &str) -> Self {
        self.strings.push(PoolSlot::Text(s.to_owned()));
        self
    }

    /// Append a pool entry with a tag other than [`CHAR_ARRAY`].
    #[must_use]
    pub fn unsupported_string(mut self, tag: u8) -> Self {
        self.strings.push(PoolSlot::Unsupported(tag));
        self
    }

    #[must_use]
    pub fn root(mut self, root: ElementDef) -> Self {
        self.root = root;
        self
    }

    /// Append an event record with an opaque payload.
    #[must_use]
    pub fn event(mut self, type_id: u64, payload: Vec<u8>) -> Self {
        self.records.push(BodyRecord::Event { type_id, payload });
        self
    }

    /// Append bytes to the event region verbatim, for malformed records.
    #[must_use]
    pub fn raw_record(mut self, bytes: Vec<u8>) -> Self {
        self.records.push(BodyRecord::Raw(bytes));
        self
    }

    pub fn build(&self) -> BuiltChunk {
        let enc = self.encoding;

        let mut body = Vec::new();
        let mut event_offsets = Vec::new();
        for record in &self.records {
            event_offsets.push(HEADER_SIZE + body.len());
            match record {
                BodyRecord::Event { type_id, payload } => {
                    write_record(&mut body, enc, *type_id, payload);
                }
                BodyRecord::Raw(bytes) => body.extend_from_slice(bytes),
            }
        }

        let constant_pool_offset = HEADER_SIZE + body.len();
        let mut pool_payload = Vec::new();
        for _ in 0..5 {
            put_long(&mut pool_payload, enc, 0);
        }
        write_record(&mut body, enc, CONSTANT_POOL_TYPE_ID, &pool_payload);

        let metadata_offset = HEADER_SIZE + body.len();
        let (metadata_payload, strings) = self.metadata_payload();
        write_record(&mut body, enc, METADATA_TYPE_ID, &metadata_payload);

        let flags = self.flags.unwrap_or(match enc {
            IntEncoding::Fixed => ChunkFlags::NONE.raw(),
            IntEncoding::Compressed => ChunkFlags::COMPRESSED_INTS.raw(),
        });
        let header = ChunkHeader {
            version_major: self.version.0,
            version_minor: self.version.1,
            chunk_size: (HEADER_SIZE + body.len()) as u64,
            constant_pool_offset: constant_pool_offset as u64,
            metadata_offset: metadata_offset as u64,
            start_time_nanos: self.start_time_nanos,
            duration_nanos: self.duration_nanos,
            start_ticks: self.start_ticks,
            ticks_per_second: self.ticks_per_second,
            flags: ChunkFlags::from_raw(flags),
        };

        let mut bytes = Vec::with_capacity(HEADER_SIZE + body.len());
        header.write_to(&mut bytes);
        bytes.extend_from_slice(&body);

        BuiltChunk {
            bytes,
            metadata_offset,
            constant_pool_offset,
            event_offsets,
            strings,
        }
    }

    /// Everything in the metadata record after its type id.
    fn metadata_payload(&self) -> (Vec<u8>, Vec<Option<String>>) {
        let mut slots = self.strings.clone();
        intern_tree(&self.root, &mut slots);

        let enc = self.encoding;
        let mut out = Vec::new();
        put_long(&mut out, enc, self.start_time_nanos);
        put_long(&mut out, enc, self.duration_nanos);
        put_long(&mut out, enc, self.metadata_id);
        put_int(&mut out, enc, slots.len() as u32);
        for slot in &slots {
            match slot {
                PoolSlot::Text(s) => {
                    out.push(CHAR_ARRAY);
                    put_int(&mut out, enc, s.len() as u32);
                    out.extend_from_slice(s.as_bytes());
                }
                PoolSlot::Unsupported(tag) => out.push(*tag),
            }
        }
        write_element(&mut out, enc, &self.root, &slots);

        let strings = slots
            .into_iter()
            .map(|slot| match slot {
                PoolSlot::Text(s) => Some(s),
                PoolSlot::Unsupported(_) => None,
            })
            .collect();
        (out, strings)
    }
}

fn intern(slots: &mut Vec<PoolSlot>, r: &StrRef) {
    if let StrRef::Text(s) = r
        && !slots.iter().any(|slot| matches!(slot, PoolSlot::Text(t) if t == s))
    {
        slots.push(PoolSlot::Text(s.clone()));
    }
}

fn intern_tree(root: &ElementDef, slots: &mut Vec<PoolSlot>) {
    let mut stack = vec![root];
    while let Some(def) = stack.pop() {
        intern(slots, &def.name);
        for (name, value) in &def.attributes {
            intern(slots, name);
            intern(slots, value);
        }
        stack.extend(def.children.iter().rev());
    }
}

fn index_of(slots: &[PoolSlot], r: &StrRef) -> u32 {
    match r {
        StrRef::Index(i) => *i,
        StrRef::Text(s) => slots
            .iter()
            .position(|slot| matches!(slot, PoolSlot::Text(t) if t == s))
            .map_or(u32::MAX, |i| i as u32),
    }
}

fn write_element(out: &mut Vec<u8>, enc: IntEncoding, root: &ElementDef, slots: &[PoolSlot]) {
    let mut stack = vec![root];
    while let Some(def) = stack.pop() {
        put_int(out, enc, index_of(slots, &def.name));
        put_int(out, enc, def.attributes.len() as u32);
        for (name, value) in &def.attributes {
            put_int(out, enc, index_of(slots, name));
            put_int(out, enc, index_of(slots, value));
        }
        put_int(out, enc, def.children.len() as u32);
        stack.extend(def.children.iter().rev());
    }
}

/// Write a whole record whose size field covers the prefix and payload.
pub fn write_record(out: &mut Vec<u8>, enc: IntEncoding, type_id: u64, payload: &[u8]) {
    let mut type_field = Vec::new();
    put_long(&mut type_field, enc, type_id);

    let body_len = type_field.len() + payload.len();
    let size = match enc {
        IntEncoding::Fixed => body_len + 4,
        IntEncoding::Compressed => {
            // The size counts its own varint bytes; settle on a fixed point.
            let mut size = body_len + 1;
            while varint_len(size as u64) + body_len != size {
                size = varint_len(size as u64) + body_len;
            }
            size
        }
    };

    put_int(out, enc, size as u32);
    out.extend_from_slice(&type_field);
    out.extend_from_slice(payload);
}

pub fn put_int(out: &mut Vec<u8>, enc: IntEncoding, value: u32) {
    match enc {
        IntEncoding::Fixed => out.extend_from_slice(&value.to_be_bytes()),
        IntEncoding::Compressed => {
            put_varint(out, u64::from(value));
        }
    }
}

pub fn put_long(out: &mut Vec<u8>, enc: IntEncoding, value: u64) {
    match enc {
        IntEncoding::Fixed => out.extend_from_slice(&value.to_be_bytes()),
        IntEncoding::Compressed => {
            put_varint(out, value);
        }
    }
}

pub fn varint_len(value: u64) -> usize {
    let mut buf = [0u8; jfr_wire::varint::MAX_VARINT_BYTES];
    jfr_wire::varint::encode_varint(value, &mut buf)
}
