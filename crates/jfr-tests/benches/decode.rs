use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jfr_decoder::{ChunkDecoder, DecoderConfig};
use jfr_tests::{ChunkBuilder, ElementDef};

fn type_tree(classes: usize) -> ElementDef {
    (0..classes).fold(ElementDef::new("root"), |root, i| {
        let name = format!("jdk.Event{i}");
        let class = (0..6).fold(
            ElementDef::new("class")
                .attr("name", name.as_str())
                .attr("id", format!("{}", 100 + i).as_str()),
            |class, f| {
                class.child(
                    ElementDef::new("field")
                        .attr("name", format!("field{f}").as_str())
                        .attr("class", "long"),
                )
            },
        );
        root.child(class)
    })
}

fn chunk_with_events(events: usize, fixed: bool) -> Vec<u8> {
    let mut builder = ChunkBuilder::new().root(type_tree(20));
    if fixed {
        builder = builder.fixed();
    }
    for i in 0..events {
        builder = builder.event(100 + (i % 20) as u64, vec![0x42; 24 + i % 40]);
    }
    builder.build().bytes
}

fn bench_decode_small(c: &mut Criterion) {
    let chunk = ChunkBuilder::new().event(100, vec![0; 16]).build().bytes;

    c.bench_function("decode_small", |b| {
        b.iter(|| ChunkDecoder::decode(&chunk).unwrap());
    });
}

fn bench_decode_metadata(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_metadata");

    for classes in [10, 100, 1000] {
        let chunk = ChunkBuilder::new().root(type_tree(classes)).build().bytes;
        group.throughput(Throughput::Bytes(chunk.len() as u64));
        group.bench_with_input(BenchmarkId::new("classes", classes), &chunk, |b, c| {
            b.iter(|| ChunkDecoder::decode(c).unwrap());
        });
    }

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    let counting = DecoderConfig {
        collect_records: false,
        ..DecoderConfig::default()
    };

    for (label, fixed) in [("compressed", false), ("fixed", true)] {
        let chunk = chunk_with_events(10_000, fixed);
        group.throughput(Throughput::Bytes(chunk.len() as u64));
        group.bench_with_input(BenchmarkId::new("collect", label), &chunk, |b, c| {
            b.iter(|| ChunkDecoder::decode(c).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("count_only", label), &chunk, |b, c| {
            b.iter(|| ChunkDecoder::decode_with_config(c, &counting).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode_small, bench_decode_metadata, bench_scan);
criterion_main!(benches);
