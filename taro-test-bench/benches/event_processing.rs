extern crate taro_core;

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use taro_core::{Composer, Parser};
use taro_rs::dump_all;

const IN1: &str = r#"
&seq
[[name        , hr, avg  ],
[Mark McGwire, 65, 0.278],
[Sammy Sosa  , 63, 0.288]]
"#;

const IN2: &str = r"
&seq
- [name        , hr, avg  ]
- [Mark McGwire, 65, 0.278]
- [Sammy Sosa  , 63, 0.288]
";

fn count_events(input: &str) -> usize {
    Parser::new(input.as_bytes())
        .map(|event| event.expect("benchmark input parses"))
        .count()
}

fn bench_flow_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group
        .significance_level(0.05)
        .sample_size(100)
        .measurement_time(Duration::from_secs(10));
    group.throughput(Throughput::Bytes(IN1.len() as u64));
    group.bench_function("flow-events", |b| {
        b.iter(|| {
            black_box(count_events(IN1));
        });
    });
    group.finish();
}

fn bench_block_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group
        .significance_level(0.05)
        .sample_size(100)
        .measurement_time(Duration::from_secs(10));
    group.throughput(Throughput::Bytes(IN2.len() as u64));
    group.bench_function("block-events", |b| {
        b.iter(|| {
            black_box(count_events(IN2));
        });
    });
    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("round-trip");
    group.throughput(Throughput::Bytes(IN2.len() as u64));
    group.bench_function("compose-dump", |b| {
        b.iter(|| {
            let mut composer = Composer::new(IN2.as_bytes());
            let mut documents = Vec::new();
            while let Some(document) = composer.compose().expect("benchmark input composes") {
                documents.push(document);
            }
            black_box(dump_all(&documents).expect("benchmark documents dump"));
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_flow_events,
    bench_block_events,
    bench_round_trip
);
criterion_main!(benches);
