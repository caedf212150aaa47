use criterion::{Criterion, criterion_group, criterion_main};
use ragline::chunker::{ChunkingConfig, chunk_records};
use ragline::loader::{Record, RecordMetadata};
use std::hint::black_box;

fn corpus() -> Vec<Record> {
    let paragraph = "Retrieval-augmented generation grounds a language model's answer in \
                     text retrieved from a knowledge base. The corpus is chunked, embedded \
                     and indexed ahead of time; at question time the closest chunks are \
                     assembled into a context block. ";

    (0..50)
        .map(|i| Record {
            text: paragraph.repeat(20),
            metadata: RecordMetadata {
                title: format!("Record {i}"),
                ..RecordMetadata::default()
            },
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let records = corpus();
    let config = ChunkingConfig::default();
    c.bench_function("chunking", |b| {
        b.iter(|| chunk_records(black_box(&records), black_box(&config)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
