//! Spindle detection benchmarks
//!
//! Run with: cargo bench --package spindle-detect

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spindle_detect::{
    moving_transform, stft_power, DetectorConfig, MovingMethod, SpindleDetector, StftConfig,
    WindowSpec,
};
use std::f64::consts::PI;
use std::time::Duration;

/// Synthetic recording with a 13 Hz waxing-waning burst every 10 s
fn recording(sf: f64, seconds: f64) -> Vec<f64> {
    let n = (sf * seconds) as usize;
    (0..n)
        .map(|i| {
            let t = i as f64 / sf;
            let background = 2.0 * (2.0 * PI * 1.3 * t).sin() + 0.5 * ((i * 7919 % 101) as f64 / 50.0 - 1.0);
            let phase = (t % 10.0 - 4.5).clamp(0.0, 1.0);
            let envelope = (PI * phase).sin().powi(2);
            background + 40.0 * envelope * (2.0 * PI * 13.0 * t).sin()
        })
        .collect()
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("Spindle Detection");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    let detector = SpindleDetector::new(DetectorConfig::default()).unwrap();
    for &sf in &[100.0, 256.0] {
        let data = recording(sf, 60.0);
        group.throughput(Throughput::Elements(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("detect_60s", sf), &data, |b, data| {
            b.iter(|| detector.detect(black_box(data), sf).unwrap())
        });
    }

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("Detection Stages");
    let sf = 100.0;
    let data = recording(sf, 60.0);

    let stft = StftConfig {
        window: 2.0,
        step: 0.05,
        ..Default::default()
    };
    group.bench_function("stft_power", |b| {
        b.iter(|| stft_power(black_box(&data), sf, &stft).unwrap())
    });

    let spec = WindowSpec::new(0.3, 0.1).interpolated();
    group.bench_function("moving_corr", |b| {
        b.iter(|| moving_transform(black_box(&data), Some(&data), sf, &spec, MovingMethod::Corr).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_detect, bench_stages);
criterion_main!(benches);
