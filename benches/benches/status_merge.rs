//! Benchmarks for the status path.
//!
//! Performance-critical paths:
//! - `interpret_status`: decode and normalise one response body
//! - `TaskSnapshot::merge`: fold an update into the tracked state
//! - `project`: build the render model after every update

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::json;
use taskwatch_core::protocol::interpret_status;
use taskwatch_core::task::{Counts, LogEntry, LogUpdate, StatusUpdate, TaskSnapshot};
use taskwatch_core::view::project;

fn entry(i: usize) -> LogEntry {
    LogEntry {
        post_id: Some(format!("post-{i}")),
        comment_text: Some(format!("comment number {i}")),
        timestamp: Some(format!("12:{:02}:{:02}", (i / 60) % 60, i % 60)),
        token: Some("EAAB1234567890abcdef".into()),
        profile_name: Some("Ana".into()),
        sequence_number: Some(i as u64),
        status_code: Some(200),
    }
}

fn status_body(entries: usize) -> String {
    let logs: Vec<_> = (0..entries)
        .map(|i| {
            json!({
                "post_id": format!("post-{i}"),
                "full_comment": format!("comment number {i}"),
                "timestamp": "12:00:00",
                "status_code": 200
            })
        })
        .collect();
    json!({
        "running": true,
        "summary": { "success": entries, "failed": 0 },
        "logs": logs
    })
    .to_string()
}

fn bench_interpret_status(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpret_status");

    for size in [1, 100, 1000] {
        let body = status_body(size);
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &body, |b, body| {
            b.iter(|| interpret_status(200, black_box(body)));
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_merge");

    group.bench_function("latest_append", |b| {
        b.iter_batched(
            TaskSnapshot::started,
            |mut snapshot| {
                for i in 0..100 {
                    snapshot.merge(StatusUpdate {
                        running: true,
                        counts: Some(Counts::new(i as u64, 0)),
                        log: LogUpdate::Latest(entry(i)),
                    });
                }
                snapshot
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.bench_function("latest_duplicate", |b| {
        let mut snapshot = TaskSnapshot::started();
        snapshot.merge(StatusUpdate {
            running: true,
            counts: None,
            log: LogUpdate::Latest(entry(0)),
        });
        b.iter(|| {
            snapshot.merge(black_box(StatusUpdate {
                running: true,
                counts: None,
                log: LogUpdate::Latest(entry(0)),
            }))
        });
    });

    for size in [100, 1000] {
        let full: Vec<_> = (0..size).map(entry).collect();
        group.bench_with_input(BenchmarkId::new("full_replace", size), &full, |b, full| {
            let mut snapshot = TaskSnapshot::started();
            b.iter(|| {
                snapshot.merge(StatusUpdate {
                    running: true,
                    counts: Some(Counts::new(size as u64, 0)),
                    log: LogUpdate::Full(full.clone()),
                })
            });
        });
    }

    group.finish();
}

fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");

    for size in [0, 100, 1000] {
        let mut snapshot = TaskSnapshot::started();
        snapshot.merge(StatusUpdate {
            running: true,
            counts: Some(Counts::new(size as u64, 0)),
            log: LogUpdate::Full((0..size).map(entry).collect()),
        });
        group.bench_with_input(BenchmarkId::from_parameter(size), &snapshot, |b, snapshot| {
            b.iter(|| project(black_box(snapshot)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_interpret_status, bench_merge, bench_project);
criterion_main!(benches);
