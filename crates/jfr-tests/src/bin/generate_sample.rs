//! Sample chunk generator for trying out the `jfr` CLI.
//!
//! Writes a handful of well-formed and deliberately broken chunks into a
//! directory (default: `samples/` next to this crate's manifest).
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_sample -p jfr-tests -- [OUT_DIR]
//! ```
//!
//! # Generated files
//!
//! | File                 | Contents                                      |
//! |----------------------|-----------------------------------------------|
//! | minimal.jfr          | Bare root element, no events                  |
//! | typical.jfr          | Class/field tree plus 200 events (compressed) |
//! | fixed.jfr            | Same shape, fixed-width integers              |
//! | unsupported_pool.jfr | One pool slot with an unknown encoding tag    |
//! | truncated.jfr        | `typical.jfr` with its last 32 bytes removed  |

#![allow(clippy::pedantic)]

use std::path::{Path, PathBuf};

use jfr_tests::{ChunkBuilder, ElementDef};

fn main() {
    let out_dir = std::env::args_os().nth(1).map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples"),
        PathBuf::from,
    );
    std::fs::create_dir_all(&out_dir).unwrap();

    write(&out_dir, "minimal.jfr", &ChunkBuilder::new().build().bytes);

    let typical = with_events(ChunkBuilder::new().root(type_tree())).build().bytes;
    write(&out_dir, "typical.jfr", &typical);

    let fixed = with_events(ChunkBuilder::new().fixed().root(type_tree())).build().bytes;
    write(&out_dir, "fixed.jfr", &fixed);

    let unsupported = ChunkBuilder::new()
        .unsupported_string(5)
        .root(ElementDef::new("root").attr(0u32, "placeholder"))
        .build()
        .bytes;
    write(&out_dir, "unsupported_pool.jfr", &unsupported);

    write(&out_dir, "truncated.jfr", &typical[..typical.len() - 32]);

    println!("Sample chunks written to {}", out_dir.display());
}

fn type_tree() -> ElementDef {
    let classes = [
        ("jdk.ExecutionSample", &["startTime", "sampledThread", "stackTrace"][..]),
        ("jdk.GarbageCollection", &["startTime", "duration", "gcId", "name"][..]),
        ("jdk.ThreadPark", &["startTime", "duration", "parkedClass", "timeout"][..]),
    ];
    let metadata = classes
        .iter()
        .enumerate()
        .fold(ElementDef::new("metadata"), |metadata, (i, (name, fields))| {
            let id = format!("{}", 101 + i);
            let class = fields.iter().fold(
                ElementDef::new("class")
                    .attr("name", *name)
                    .attr("id", id.as_str())
                    .attr("superType", "jdk.jfr.Event"),
                |class, field| class.child(ElementDef::new("field").attr("name", *field)),
            );
            metadata.child(class)
        });
    ElementDef::new("root")
        .child(metadata)
        .child(ElementDef::new("region").attr("locale", "en_US"))
}

fn with_events(mut builder: ChunkBuilder) -> ChunkBuilder {
    for i in 0..200u64 {
        let payload: Vec<u8> = (0..(8 + i % 24)).map(|b| b as u8).collect();
        builder = builder.event(101 + i % 3, payload);
    }
    builder
}

fn write(dir: &Path, name: &str, bytes: &[u8]) {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    println!("  {} ({} bytes)", path.display(), bytes.len());
}
