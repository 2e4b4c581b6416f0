//! Benchmarks for series alignment and render adapters
//!
//! Run with: cargo bench

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use disasterwatch::fetch::Coordinate;
use disasterwatch::*;

fn create_series(days: usize, offset: usize) -> Vec<PostCount> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..days)
        // Stagger categories so their label sets only partly overlap
        .filter(|i| (i + offset) % 3 != 0)
        .map(|i| {
            let day = base + Duration::days(i as i64);
            PostCount::new(day.format("%Y-%m-%d").to_string().as_str(), (i * 7 + offset) as u64)
        })
        .collect()
}

fn create_raw(days: usize) -> Vec<(DisasterCategory, Option<Vec<PostCount>>)> {
    DisasterCategory::all()
        .iter()
        .enumerate()
        .map(|(i, &category)| (category, Some(create_series(days, i))))
        .collect()
}

fn bench_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("align_series");

    for days in [30, 365, 3650] {
        let raw = create_raw(days);
        group.throughput(Throughput::Elements((days * raw.len()) as u64));

        group.bench_function(format!("align_{}_days", days), |b| {
            b.iter(|| align_series(black_box(raw.clone())))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let theme = Theme::default();

    let aligned = align_series(create_raw(365));
    group.bench_function("line_chart_365_days", |b| {
        b.iter(|| line_chart(black_box(&aligned), &theme))
    });

    let coordinates: Vec<Coordinate> = (0..10_000)
        .map(|i| Coordinate {
            lat: (i % 180) as f64 - 90.0,
            lng: (i % 360) as f64 - 180.0,
            sentiment: ((i % 200) as f64 / 100.0) - 1.0,
        })
        .collect();
    group.throughput(Throughput::Elements(coordinates.len() as u64));
    group.bench_function("heat_layer_10000", |b| {
        b.iter(|| heat_layer(black_box(&coordinates), &theme))
    });

    group.finish();
}

criterion_group!(benches, bench_align, bench_render);
criterion_main!(benches);
