//! Synthetic trajectory generation for integration tests.
//!
//! Tracks are built in a local north/east frame (meters) around a fixed
//! origin and converted to latitude/longitude:
//! - Straight runs at constant speed
//! - Straight runs with a single position hop or time gap
//! - Smooth closed laps with varying speed (clean data)

#![allow(dead_code)]

use std::f64::consts::TAU;

use chrono::{DateTime, Utc};
use marga::core::geo::meters_per_degree_lat;
use marga::{Trajectory, TrajectoryPoint};
use rand::prelude::*;

/// Origin latitude (degrees).
pub const ORIGIN_LAT: f64 = 48.137;
/// Origin longitude (degrees).
pub const ORIGIN_LON: f64 = 11.575;
/// Epoch second of the first sample.
pub const T0: i64 = 1_700_000_000;

/// Timestamp `secs` after [`T0`].
pub fn timestamp(secs: f64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(T0 * 1000 + (secs * 1000.0).round() as i64).unwrap()
}

/// Latitude/longitude of a local north/east offset.
pub fn offset(north_m: f64, east_m: f64) -> (f64, f64) {
    let m_lat = meters_per_degree_lat();
    let m_lon = m_lat * ORIGIN_LAT.to_radians().cos();
    (ORIGIN_LAT + north_m / m_lat, ORIGIN_LON + east_m / m_lon)
}

/// Timestamped point at a local offset.
pub fn point(secs: f64, north_m: f64, east_m: f64) -> TrajectoryPoint {
    let (lat, lon) = offset(north_m, east_m);
    TrajectoryPoint::at(timestamp(secs), lat, lon)
}

/// Northbound run of `n` samples, `step_m` apart every `dt_s` seconds.
pub fn straight(n: usize, step_m: f64, dt_s: f64) -> Vec<TrajectoryPoint> {
    (0..n)
        .map(|i| point(i as f64 * dt_s, i as f64 * step_m, 0.0))
        .collect()
}

/// 5 m/s northbound run (50 m every 10 s) where the segment ending at
/// `hop_at` covers 200 m; all later samples stay shifted.
pub fn straight_with_hop(n: usize, hop_at: usize) -> Trajectory {
    let mut north = 0.0;
    (0..n)
        .map(|i| {
            if i > 0 {
                north += if i == hop_at { 200.0 } else { 50.0 };
            }
            point(i as f64 * 10.0, north, 0.0)
        })
        .collect()
}

/// 10 s sampling, 50 m apart, except a `gap_s` pause before `gap_at`.
pub fn straight_with_gap(n: usize, gap_at: usize, gap_s: f64) -> Trajectory {
    let mut secs = 0.0;
    (0..n)
        .map(|i| {
            if i > 0 {
                secs += if i == gap_at { gap_s } else { 10.0 };
            }
            point(secs, i as f64 * 50.0, 0.0)
        })
        .collect()
}

/// Displace row `row` by `north_m`/`east_m`.
pub fn displace(trajectory: Trajectory, row: usize, north_m: f64, east_m: f64) -> Trajectory {
    let mut points = trajectory.into_points();
    let m_lat = meters_per_degree_lat();
    let m_lon = m_lat * ORIGIN_LAT.to_radians().cos();
    points[row].latitude += north_m / m_lat;
    points[row].longitude += east_m / m_lon;
    points.into()
}

/// One smooth lap of `n` samples every 10 s.
///
/// Speed swings sinusoidally between roughly 1.5 and 3.5 m/s with
/// sub-meter position noise; every detector should leave it untouched.
pub fn smooth_lap(seed: u64, n: usize) -> Trajectory {
    let mut rng = StdRng::seed_from_u64(seed);
    let base: f64 = rng.random_range(2.0..3.0);
    let swing: f64 = rng.random_range(0.2..0.5);
    let phase: f64 = rng.random_range(0.0..TAU);
    let dt = 10.0;
    let radius = base * dt * n as f64 / TAU;

    let mut theta: f64 = 0.0;
    (0..n)
        .map(|i| {
            let secs = i as f64 * dt;
            if i > 0 {
                let speed = base + swing * (secs / 300.0 + phase).sin();
                theta += speed * dt / radius;
            }
            let north = radius * theta.sin() + rng.random_range(-0.1..0.1);
            let east = radius * theta.cos() + rng.random_range(-0.1..0.1);
            point(secs, north, east)
        })
        .collect()
}

/// A smooth lap with `spikes` rows thrown 2-5 km off course.
pub fn spiky_lap(seed: u64, n: usize, spikes: usize) -> Trajectory {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut trajectory = smooth_lap(seed, n);
    for _ in 0..spikes {
        let row = rng.random_range(0..n);
        let distance = rng.random_range(2000.0..5000.0);
        let bearing: f64 = rng.random_range(0.0..TAU);
        trajectory = displace(trajectory, row, distance * bearing.cos(), distance * bearing.sin());
    }
    trajectory
}
