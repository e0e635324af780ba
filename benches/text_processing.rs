//! Benchmarks for text processing utilities.
//!
//! These benchmarks measure the regex-backed helpers used when matching names
//! and rendering table cells.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use noty::utils::text_processing::{fuzzy_contains, normalize_key, sprint_number, truncate};

fn bench_normalize_key(c: &mut Criterion) {
    c.bench_function("normalize_status_key", |b| {
        b.iter(|| normalize_key(black_box("To Be Tested")))
    });
}

fn bench_sprint_number(c: &mut Criterion) {
    let names: Vec<String> = (1..=100).map(|n| format!("Sprint {}", n)).collect();
    c.bench_function("sprint_number_100", |b| {
        b.iter(|| {
            names
                .iter()
                .filter_map(|name| sprint_number(black_box(name)))
                .count()
        })
    });
}

fn bench_fuzzy_contains(c: &mut Criterion) {
    c.bench_function("fuzzy_contains_name", |b| {
        b.iter(|| fuzzy_contains(black_box("Ada Lovelace"), black_box("LOVE")))
    });
}

fn bench_truncate(c: &mut Criterion) {
    let text = "Refactor the hours aggregation so that grouping works per commission";
    c.bench_function("truncate_long_name", |b| {
        b.iter(|| truncate(black_box(text), black_box(40)))
    });
}

criterion_group!(
    benches,
    bench_normalize_key,
    bench_sprint_number,
    bench_fuzzy_contains,
    bench_truncate
);
criterion_main!(benches);
