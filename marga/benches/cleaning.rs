//! Trajectory Cleaning Benchmarks
//!
//! - Default detection per tier
//! - Nearest-neighbour index build and query
//! - Each correction method on a lap with scattered spikes
//!
//! Run with: `cargo bench`
//! View HTML reports in: `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::f64::consts::TAU;

use chrono::DateTime;
use marga::detection::PointIndex;
use marga::{
    CorrectionMethod, DetectionMethod, Detector, DetectorConfig, DetectorKind, Trajectory,
    TrajectoryPoint, create_detector,
};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Circular lap of `n` samples every 10 s at ~3 m/s, every 97th row thrown 3 km off.
fn create_benchmark_lap(n: usize) -> Trajectory {
    let m_lat = 111_320.0;
    let m_lon = m_lat * 48.0_f64.to_radians().cos();
    let radius = 30.0 * n as f64 / TAU;

    (0..n)
        .map(|i| {
            let theta = i as f64 * TAU / n as f64;
            let mut north = radius * theta.sin();
            let east = radius * theta.cos();
            if i % 97 == 50 {
                north += 3000.0;
            }
            let ts = DateTime::from_timestamp(1_700_000_000 + 10 * i as i64, 0).unwrap_or_default();
            TrajectoryPoint::at(ts, 48.0 + north / m_lat, 11.0 + east / m_lon)
        })
        .collect()
}

// ============================================================================
// Detection
// ============================================================================

fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detection");

    for size in [1_000, 10_000] {
        let lap = create_benchmark_lap(size);
        group.throughput(Throughput::Elements(size as u64));

        for kind in [DetectorKind::Standard, DetectorKind::Gps] {
            let detector = create_detector(kind, DetectorConfig::default());
            group.bench_with_input(BenchmarkId::new(kind.to_string(), size), &lap, |b, lap| {
                b.iter(|| detector.detect(black_box(lap), None))
            });
        }

        let detector = create_detector(DetectorKind::Gps, DetectorConfig::default());
        group.bench_with_input(BenchmarkId::new("distance", size), &lap, |b, lap| {
            b.iter(|| detector.detect(black_box(lap), Some(&[DetectionMethod::Distance])))
        });
    }

    group.finish();
}

// ============================================================================
// Spatial Index
// ============================================================================

fn bench_point_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_index");

    for size in [1_000, 10_000] {
        let lap = create_benchmark_lap(size);
        let rows: Vec<usize> = (0..size).collect();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("build", size), &lap, |b, lap| {
            b.iter(|| PointIndex::new(black_box(lap), &rows))
        });

        let index = PointIndex::new(&lap, &rows);
        group.bench_with_input(BenchmarkId::new("nearest_other_all", size), &lap, |b, lap| {
            b.iter(|| {
                lap.iter()
                    .enumerate()
                    .filter_map(|(i, p)| index.nearest_other(p.latitude, p.longitude, i))
                    .count()
            })
        });
    }

    group.finish();
}

// ============================================================================
// Correction
// ============================================================================

fn bench_correction(c: &mut Criterion) {
    let mut group = c.benchmark_group("correction");
    let detector = create_detector(DetectorKind::Advanced, DetectorConfig::default());
    let flagged = detector
        .detect(&create_benchmark_lap(2_000), Some(&[DetectionMethod::Distance]))
        .map(|outcome| outcome.trajectory)
        .unwrap_or_default();

    group.throughput(Throughput::Elements(flagged.len() as u64));
    for method in CorrectionMethod::ALL {
        group.bench_with_input(
            BenchmarkId::new(method.to_string(), flagged.len()),
            &flagged,
            |b, flagged| b.iter(|| detector.fix(black_box(flagged), Some(method))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_detection, bench_point_index, bench_correction);
criterion_main!(benches);
