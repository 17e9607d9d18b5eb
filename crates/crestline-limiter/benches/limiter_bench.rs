//! Criterion benchmarks for the crestline limiter
//!
//! Run with: cargo bench -p crestline-limiter
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use crestline_core::{Effect, StereoFrame};
use crestline_limiter::{Limiter, LimiterControls, LimiterParams, StereoLimiter};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn generate_test_signal(size: usize) -> (Vec<f32>, Vec<f32>) {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            let l = libm::sinf(core::f32::consts::TAU * 440.0 * t) * 1.5;
            let r = libm::sinf(core::f32::consts::TAU * 330.0 * t) * 0.8;
            (l, r)
        })
        .unzip()
}

fn bench_core_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("StereoLimiter");
    let params = LimiterParams::default().with_threshold_db(-6.0);

    for &block_size in BLOCK_SIZES {
        let (left, right) = generate_test_signal(block_size);
        let mut limiter = StereoLimiter::new(SAMPLE_RATE);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                b.iter(|| {
                    let mut acc = 0.0;
                    for (&l, &r) in left.iter().zip(&right) {
                        let out = limiter.step(black_box(StereoFrame::new(l, r)), &params);
                        acc += out.audio.left;
                    }
                    black_box(acc)
                })
            },
        );
    }

    group.finish();
}

fn bench_with_controls(c: &mut Criterion) {
    let mut group = c.benchmark_group("StereoLimiter+controls");

    for &block_size in BLOCK_SIZES {
        let (left, right) = generate_test_signal(block_size);
        let mut limiter = StereoLimiter::new(SAMPLE_RATE);
        let mut controls = LimiterControls::new(SAMPLE_RATE);
        controls.set_threshold_db(-6.0);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                b.iter(|| {
                    let mut acc = 0.0;
                    for (&l, &r) in left.iter().zip(&right) {
                        let out = limiter.process_with(&mut controls, StereoFrame::new(l, r));
                        acc += out.audio.left;
                    }
                    black_box(acc)
                })
            },
        );
    }

    group.finish();
}

fn bench_effect_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("Limiter::process_block");

    for &block_size in BLOCK_SIZES {
        let (left, right) = generate_test_signal(block_size);
        let mut limiter = Limiter::new(SAMPLE_RATE);
        limiter.controls_mut().set_threshold_db(-6.0);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut l = left.clone();
                let mut r = right.clone();
                b.iter(|| {
                    l.copy_from_slice(&left);
                    r.copy_from_slice(&right);
                    limiter.process_block(black_box(&mut l), black_box(&mut r));
                    black_box(l[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_attack_sweep(c: &mut Criterion) {
    // alternating attack times keep the delay crossfade permanently active
    let (left, right) = generate_test_signal(1024);
    let short = LimiterParams::default().with_times_ms(5.0, 20.0, 150.0);
    let long = LimiterParams::default().with_times_ms(20.0, 20.0, 150.0);
    let mut limiter = StereoLimiter::new(SAMPLE_RATE);

    c.bench_function("StereoLimiter/attack_sweep", |b| {
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let params = if flip { &short } else { &long };
            let mut acc = 0.0;
            for (&l, &r) in left.iter().zip(&right) {
                acc += limiter.step(StereoFrame::new(l, r), params).audio.right;
            }
            black_box(acc)
        })
    });
}

criterion_group!(
    benches,
    bench_core_step,
    bench_with_controls,
    bench_effect_block,
    bench_attack_sweep
);
criterion_main!(benches);
