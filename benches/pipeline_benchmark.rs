//! Benchmark for zonebt pipeline stages.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use zonebt::backtest::{run_grid, BacktestConfig, BacktestEngine};
use zonebt::core::series::PriceSeries;
use zonebt::signals::{SignalConfig, SignalGenerator, SignalPolicy};
use zonebt::zones::{ZoneConfig, ZoneDetector};

/// Generate an oscillating minute-bar series that revisits the same levels.
fn generate_sample_data(n: usize) -> PriceSeries {
    let mut close = vec![100.0; n];
    for (i, c) in close.iter_mut().enumerate() {
        let t = i as f64;
        *c = 100.0 + 8.0 * (t * 0.05).sin() + 2.0 * (t * 0.31).sin();
    }
    let open: Vec<f64> = std::iter::once(close[0]).chain(close.iter().copied()).take(n).collect();
    let high: Vec<f64> = close.iter().zip(&open).map(|(c, o)| c.max(*o) + 0.3).collect();
    let low: Vec<f64> = close.iter().zip(&open).map(|(c, o)| c.min(*o) - 0.3).collect();

    PriceSeries::new(
        (0..n as i64).map(|i| i * 60_000_000_000).collect(),
        open,
        high,
        low,
        close,
        Some(vec![1000.0; n]),
    )
    .unwrap()
}

fn bench_detect_zones(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_zones");

    for size in [1000, 5000, 10000, 50000].iter() {
        group.bench_with_input(BenchmarkId::new("bars", size), size, |b, &size| {
            let series = generate_sample_data(size);
            let detector = ZoneDetector::new(ZoneConfig::new(10, 2, 0.002));

            b.iter(|| black_box(detector.detect(black_box(&series))));
        });
    }

    group.finish();
}

fn bench_generate_signals(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_signals");

    for size in [1000, 5000, 10000, 50000].iter() {
        group.bench_with_input(BenchmarkId::new("bars", size), size, |b, &size| {
            let series = generate_sample_data(size);
            let zones = ZoneDetector::new(ZoneConfig::new(10, 2, 0.002))
                .detect(&series)
                .unwrap();
            let generator =
                SignalGenerator::new(SignalConfig::default().with_policy(SignalPolicy::TouchBounce));

            b.iter(|| black_box(generator.generate(black_box(&series), black_box(&zones))));
        });
    }

    group.finish();
}

fn bench_backtest(c: &mut Criterion) {
    let mut group = c.benchmark_group("backtest");

    for size in [1000, 5000, 10000, 50000].iter() {
        group.bench_with_input(BenchmarkId::new("bars", size), size, |b, &size| {
            let series = generate_sample_data(size);
            let zones = ZoneDetector::new(ZoneConfig::new(10, 2, 0.002))
                .detect(&series)
                .unwrap();
            let signals = SignalGenerator::new(
                SignalConfig::default().with_policy(SignalPolicy::TouchBounce),
            )
            .generate(&series, &zones)
            .unwrap();
            let engine = BacktestEngine::new(BacktestConfig::default());

            b.iter(|| black_box(engine.run(black_box(&series), black_box(&signals))));
        });
    }

    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let series = generate_sample_data(10000);
    let zones = ZoneDetector::new(ZoneConfig::new(10, 2, 0.002))
        .detect(&series)
        .unwrap();
    let signals = SignalGenerator::new(SignalConfig::default().with_policy(SignalPolicy::TouchBounce))
        .generate(&series, &zones)
        .unwrap();
    let stops = [0.5, 1.0, 1.5, 2.0, 3.0];
    let targets = [1.0, 2.0, 3.0, 5.0, 8.0];

    c.bench_function("sweep_5x5_10000_bars", |b| {
        b.iter(|| {
            black_box(run_grid(
                &series,
                &signals,
                &BacktestConfig::default(),
                black_box(&stops),
                black_box(&targets),
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_detect_zones,
    bench_generate_signals,
    bench_backtest,
    bench_sweep
);
criterion_main!(benches);
