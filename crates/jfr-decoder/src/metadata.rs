use std::fmt;

use log::debug;

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::reader::ChunkReader;
use crate::string_pool::StringPool;

/// The fixed fields at the start of the metadata record.
///
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │ size          (int)   whole metadata record      │
/// │ type_id       (long)                             │
/// │ start_time    (long)                             │
/// │ duration      (long)                             │
/// │ metadata_id   (long)                             │
/// │ string_count  (int)                              │
/// └──────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataHeader {
    pub size: u32,
    pub type_id: u64,
    pub start_time: u64,
    pub duration: u64,
    pub metadata_id: u64,
    pub string_count: u32,
}

/// A name/value pair on an [`Element`], both resolved from the string pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// One node of the metadata descriptor tree.
///
/// Each element owns its attributes and children outright; the tree
/// has a single root and no sharing. Traversal, rendering and drop are
/// all iterative, so nesting depth is limited only by memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Element>,
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Value of the first attribute called `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// First direct child called `name`.
    #[must_use]
    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Depth-first, pre-order walk over this element and all descendants,
    /// yielding `(depth, element)` with the receiver at depth 0.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Number of elements in this subtree, the receiver included.
    #[must_use]
    pub fn count(&self) -> usize {
        self.walk().count()
    }

    /// Deepest nesting level below the receiver (a leaf has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.walk().map(|(depth, _)| depth).max().unwrap_or(0)
    }

    /// Read one element's name, attributes and child count. The children
    /// themselves are left on the wire for the caller.
    fn read_head(
        reader: &mut ChunkReader<'_>,
        strings: &StringPool,
    ) -> Result<(Self, u32), DecodeError> {
        let name = read_string_ref(reader, strings)?;

        let (attr_count, _) = reader.read_int()?;
        let mut attributes = Vec::with_capacity(reserve_hint(
            attr_count,
            reader.remaining_len(),
            MIN_ATTRIBUTE_LEN,
        ));
        for _ in 0..attr_count {
            let name = read_string_ref(reader, strings)?;
            let value = read_string_ref(reader, strings)?;
            attributes.push(Attribute { name, value });
        }

        // Children are pushed only once complete, so the list grows with
        // decoded input rather than with the declared count.
        let (child_count, _) = reader.read_int()?;

        Ok((
            Self {
                name,
                attributes,
                children: Vec::new(),
            },
            child_count,
        ))
    }

    /// Decode a whole element tree at the reader's position.
    ///
    /// Wire layout per element, children nested depth-first in order:
    ///
    /// ```text
    ///   name_index    (int)
    ///   attr_count    (int)
    ///   attr_count × { name_index (int), value_index (int) }
    ///   child_count   (int)
    ///   child_count × element
    /// ```
    ///
    /// Uses an explicit stack of partially built ancestors instead of
    /// recursion.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UnresolvedString`] for an index outside the pool.
    /// - [`DecodeError::Wire`] on truncation or a bad varint.
    pub fn read_tree(
        reader: &mut ChunkReader<'_>,
        strings: &StringPool,
    ) -> Result<Self, DecodeError> {
        let mut ancestors: Vec<Pending> = Vec::new();
        let mut current = Pending::read(reader, strings)?;

        loop {
            if current.remaining > 0 {
                current.remaining -= 1;
                let child = Pending::read(reader, strings)?;
                ancestors.push(std::mem::replace(&mut current, child));
                continue;
            }

            match ancestors.pop() {
                Some(mut parent) => {
                    parent.element.children.push(current.element);
                    current = parent;
                }
                None => return Ok(current.element),
            }
        }
    }
}

impl Drop for Element {
    // Flatten the subtree so dropping a deep chain never recurses.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

impl fmt::Display for Element {
    /// Indented outline, four spaces per level:
    ///
    /// ```text
    /// E: root
    ///   A: name=value
    ///     E: child
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, element) in self.walk() {
            let pad = depth * 4;
            writeln!(f, "{:pad$}E: {}", "", element.name)?;
            for attr in &element.attributes {
                writeln!(f, "{:pad$}  A: {}={}", "", attr.name, attr.value)?;
            }
        }
        Ok(())
    }
}

/// Pre-order iterator returned by [`Element::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Element)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Element);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, element) = self.stack.pop()?;
        self.stack
            .extend(element.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, element))
    }
}

/// Counts come off the wire unchecked; grow past this instead of
/// trusting them up front.
const PREALLOC_LIMIT: usize = 64;

/// Smallest encoding of one attribute: two one-byte varint indices.
const MIN_ATTRIBUTE_LEN: usize = 2;

/// Capacity to reserve for `declared` items of at least `min_len` bytes
/// each when only `remaining` bytes are left to read.
fn reserve_hint(declared: u32, remaining: usize, min_len: usize) -> usize {
    (declared as usize)
        .min(remaining / min_len)
        .min(PREALLOC_LIMIT)
}

/// An element whose children are still being read.
struct Pending {
    element: Element,
    remaining: u32,
}

impl Pending {
    fn read(reader: &mut ChunkReader<'_>, strings: &StringPool) -> Result<Self, DecodeError> {
        let (element, remaining) = Element::read_head(reader, strings)?;
        Ok(Self { element, remaining })
    }
}

fn read_string_ref(
    reader: &mut ChunkReader<'_>,
    strings: &StringPool,
) -> Result<String, DecodeError> {
    let (index, _) = reader.read_int()?;
    strings.resolve(u64::from(index)).map(str::to_owned)
}

/// The decoded metadata record: its header, the string pool and the
/// element tree built from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataSection {
    pub header: MetadataHeader,
    pub strings: StringPool,
    pub root: Element,
}

impl MetadataSection {
    /// Decode the metadata record starting at chunk offset `offset`.
    ///
    /// Reads the record header, then the string pool, then the root
    /// element, which follows the pool immediately. On success the
    /// reader sits just past the element tree.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::MetadataOverrun`] if the tree ends past
    ///   `offset + size`.
    /// - Anything [`StringPool::read_from`] or [`Element::read_tree`]
    ///   returns.
    pub fn read_from(
        reader: &mut ChunkReader<'_>,
        offset: usize,
        config: &DecoderConfig,
    ) -> Result<Self, DecodeError> {
        reader.seek(offset)?;

        let header = MetadataHeader {
            size: reader.read_int()?.0,
            type_id: reader.read_long()?.0,
            start_time: reader.read_long()?.0,
            duration: reader.read_long()?.0,
            metadata_id: reader.read_long()?.0,
            string_count: reader.read_int()?.0,
        };
        debug!(
            "metadata at offset {offset}: size={} id={} strings={}",
            header.size, header.metadata_id, header.string_count
        );

        let strings = StringPool::read_from(reader, header.string_count, config)?;
        let root = Element::read_tree(reader, &strings)?;

        let declared_end = offset + header.size as usize;
        let actual_end = reader.position();
        if actual_end > declared_end {
            return Err(DecodeError::MetadataOverrun {
                declared_end,
                actual_end,
            });
        }
        debug!(
            "metadata tree: {} elements, root {:?}, ends at {actual_end}",
            root.count(),
            root.name
        );

        Ok(Self {
            header,
            strings,
            root,
        })
    }
}
