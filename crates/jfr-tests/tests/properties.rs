//! Property tests over generated chunks.

use jfr_decoder::{ChunkDecoder, Element, RecordKind};
use jfr_tests::{ChunkBuilder, ElementDef};
use jfr_wire::ByteCursor;
use jfr_wire::varint::{decode_varint, put_varint, read_varint};
use proptest::prelude::*;

fn arb_events() -> impl Strategy<Value = Vec<(u64, Vec<u8>)>> {
    prop::collection::vec(
        (any::<u64>(), prop::collection::vec(any::<u8>(), 0..300)),
        0..24,
    )
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9.]{0,12}"
}

fn arb_element() -> impl Strategy<Value = ElementDef> {
    let leaf = (arb_name(), prop::collection::vec((arb_name(), arb_name()), 0..4)).prop_map(
        |(name, attrs)| {
            attrs
                .into_iter()
                .fold(ElementDef::new(name.as_str()), |e, (k, v)| {
                    e.attr(k.as_str(), v.as_str())
                })
        },
    );
    leaf.prop_recursive(5, 48, 6, |inner| {
        (
            arb_name(),
            prop::collection::vec((arb_name(), arb_name()), 0..3),
            prop::collection::vec(inner, 0..6),
        )
            .prop_map(|(name, attrs, children)| {
                let e = attrs
                    .into_iter()
                    .fold(ElementDef::new(name.as_str()), |e, (k, v)| {
                        e.attr(k.as_str(), v.as_str())
                    });
                children.into_iter().fold(e, ElementDef::child)
            })
    })
}

/// Compare a decoded tree against the description it was built from.
fn assert_same_shape(decoded: &Element, def: &ElementDef) {
    let mut stack = vec![(decoded, def)];
    while let Some((element, def)) = stack.pop() {
        assert_eq!(element.name, text(&def.name));
        assert_eq!(element.attributes.len(), def.attributes.len());
        for (attr, (name, value)) in element.attributes.iter().zip(&def.attributes) {
            assert_eq!(attr.name, text(name));
            assert_eq!(attr.value, text(value));
        }
        assert_eq!(element.children.len(), def.children.len());
        stack.extend(element.children.iter().zip(&def.children));
    }
}

fn text(r: &jfr_tests::StrRef) -> &str {
    match r {
        jfr_tests::StrRef::Text(s) => s,
        jfr_tests::StrRef::Index(_) => panic!("generated trees only use text"),
    }
}

proptest! {
    #[test]
    fn varint_roundtrip(value in any::<u64>()) {
        let mut buf = Vec::new();
        let written = put_varint(&mut buf, value);
        prop_assert_eq!(decode_varint(&buf), Ok((value, written)));

        let mut cursor = ByteCursor::new(&buf);
        prop_assert_eq!(read_varint(&mut cursor), Ok((value, written)));
        prop_assert_eq!(cursor.position(), written);
    }

    #[test]
    fn scan_visits_every_record(events in arb_events(), fixed in any::<bool>()) {
        let mut builder = ChunkBuilder::new();
        if fixed {
            builder = builder.fixed();
        }
        for (type_id, payload) in &events {
            builder = builder.event(*type_id, payload.clone());
        }
        let built = builder.build();

        let chunk = ChunkDecoder::decode(&built.bytes).unwrap();
        prop_assert_eq!(chunk.summary.event_count, events.len());
        prop_assert_eq!(chunk.summary.record_count, events.len() + 2);
        prop_assert_eq!(chunk.summary.end_offset, built.bytes.len());

        let scanned: Vec<_> = chunk
            .records
            .iter()
            .filter(|r| r.kind == RecordKind::Event)
            .map(|r| (r.offset, r.type_id))
            .collect();
        let expected: Vec<_> = built
            .event_offsets
            .iter()
            .copied()
            .zip(events.iter().map(|(t, _)| *t))
            .collect();
        prop_assert_eq!(scanned, expected);
    }

    #[test]
    fn element_tree_shape_is_preserved(root in arb_element(), fixed in any::<bool>()) {
        let mut builder = ChunkBuilder::new().root(root.clone());
        if fixed {
            builder = builder.fixed();
        }
        let built = builder.build();

        let chunk = ChunkDecoder::decode(&built.bytes).unwrap();
        prop_assert_eq!(chunk.metadata.root.count(), root.count());
        assert_same_shape(&chunk.metadata.root, &root);
    }

    #[test]
    fn decoded_header_offsets_are_in_bounds(events in arb_events()) {
        let built = events
            .into_iter()
            .fold(ChunkBuilder::new(), |b, (t, p)| b.event(t, p))
            .build();

        let chunk = ChunkDecoder::decode(&built.bytes).unwrap();
        let header = &chunk.header;
        prop_assert!(header.metadata_offset < header.chunk_size);
        prop_assert!(header.constant_pool_offset < header.chunk_size);
        prop_assert_eq!(header.chunk_size, built.bytes.len() as u64);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = ChunkDecoder::decode(&bytes);
    }

    #[test]
    fn corrupted_chunk_never_panics(
        events in arb_events(),
        flips in prop::collection::vec((any::<prop::sample::Index>(), any::<u8>()), 1..8),
    ) {
        let mut bytes = events
            .into_iter()
            .fold(ChunkBuilder::new(), |b, (t, p)| b.event(t, p))
            .build()
            .bytes;
        for (at, value) in flips {
            let i = at.index(bytes.len());
            bytes[i] = value;
        }
        let _ = ChunkDecoder::decode(&bytes);
    }
}
