// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Particle engine benchmarks
//!
//! Run with: cargo bench --bench animation_bench

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use folio::animation::Engine;
use folio::config::AnimationSettings;

fn engine(ambient_count: usize) -> Engine {
    let settings = AnimationSettings {
        ambient_count,
        ..AnimationSettings::default()
    };
    let mut engine = Engine::with_seed(1920.0, 1080.0, settings, 0xF011);
    engine.pointer_move(960.0, 540.0);
    engine
}

fn bench_ambient_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("ambient_tick");

    for count in [80, 500, 2000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut engine = engine(count);
            b.iter(|| {
                engine.tick();
                black_box(engine.frame_index());
            });
        });
    }

    group.finish();
}

fn bench_burst_lifecycle(c: &mut Criterion) {
    c.bench_function("burst_lifecycle_10_clicks", |b| {
        b.iter_batched(
            || engine(80),
            |mut engine| {
                for i in 0..10 {
                    engine.click(100.0 * f64::from(i), 300.0);
                }
                while !engine.bursts().is_empty() {
                    engine.tick();
                }
                black_box(engine)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_frame_snapshot(c: &mut Criterion) {
    let mut engine = engine(500);
    engine.click(960.0, 540.0);

    c.bench_function("frame_snapshot", |b| b.iter(|| black_box(engine.frame())));
}

criterion_group!(benches, bench_ambient_tick, bench_burst_lifecycle, bench_frame_snapshot);
criterion_main!(benches);
