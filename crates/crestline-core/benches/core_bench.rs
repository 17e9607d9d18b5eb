//! Criterion benchmarks for crestline-core primitives
//!
//! Run with: cargo bench -p crestline-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use crestline_core::{CrossfadeDelay, PeakHoldCascade, SmoothedParam, SmootherCascade};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.9
        })
        .collect()
}

fn bench_smoother_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("SmootherCascade");
    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(BenchmarkId::new("4 stages", block_size), &block_size, |b, _| {
            let mut cascade: SmootherCascade<4> = SmootherCascade::new(SAMPLE_RATE);
            cascade.set_times(0.01, 0.15);
            b.iter(|| {
                for &sample in &input {
                    black_box(cascade.process(black_box(sample.abs())));
                }
            });
        });
    }

    // coefficient recompute when a time constant moves every sample
    group.bench_function("set_times_changing", |b| {
        let mut cascade: SmootherCascade<4> = SmootherCascade::new(SAMPLE_RATE);
        let mut t = 0.01_f32;
        b.iter(|| {
            t = if t > 0.05 { 0.01 } else { t + 1e-5 };
            cascade.set_times(black_box(t), 0.15);
        });
    });
    group.finish();
}

fn bench_peak_hold(c: &mut Criterion) {
    let mut group = c.benchmark_group("PeakHoldCascade");
    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(BenchmarkId::new("8 stages", block_size), &block_size, |b, _| {
            let mut detector: PeakHoldCascade<8> = PeakHoldCascade::new(SAMPLE_RATE);
            detector.set_window(0.06);
            b.iter(|| {
                for &sample in &input {
                    black_box(detector.process(black_box(sample)));
                }
            });
        });
    }
    group.finish();
}

fn bench_crossfade_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("CrossfadeDelay");
    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(BenchmarkId::new("steady", block_size), &block_size, |b, _| {
            let mut delay = CrossfadeDelay::new(4801, 1024, 480);
            b.iter(|| {
                for &sample in &input {
                    black_box(delay.process(black_box(sample), 480));
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("ramping", block_size), &block_size, |b, _| {
            let mut delay = CrossfadeDelay::new(4801, 1024, 480);
            let mut request = 480;
            b.iter(|| {
                request = if request == 480 { 240 } else { 480 };
                for &sample in &input {
                    black_box(delay.process(black_box(sample), request));
                }
            });
        });
    }
    group.finish();
}

fn bench_smoothed_param(c: &mut Criterion) {
    c.bench_function("SmoothedParam/advance_1024", |b| {
        let mut param = SmoothedParam::standard(0.0, SAMPLE_RATE);
        param.set_target(-6.0);
        b.iter(|| {
            for _ in 0..1024 {
                black_box(param.advance());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_smoother_cascade,
    bench_peak_hold,
    bench_crossfade_delay,
    bench_smoothed_param,
);
criterion_main!(benches);
