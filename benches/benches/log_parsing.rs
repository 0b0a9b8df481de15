//! Benchmarks for legacy log line parsing.

#![allow(missing_docs)]

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use taskwatch_core::task::LogEntry;

fn bench_from_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_line");

    group.bench_function("full", |b| {
        b.iter(|| LogEntry::from_line(black_box("[12:00:01] [Profile] Ana => 1234567 => great post => 200")));
    });
    group.bench_function("comment_with_separator", |b| {
        b.iter(|| LogEntry::from_line(black_box("[12:00:01] Ana => 1 => a => b => c => 500")));
    });
    group.bench_function("unstructured", |b| {
        b.iter(|| LogEntry::from_line(black_box("token expired, skipping")));
    });
    group.bench_function("placeholder", |b| {
        b.iter(|| LogEntry::from_line(black_box("Waiting...")));
    });

    group.finish();
}

criterion_group!(benches, bench_from_line);
criterion_main!(benches);
