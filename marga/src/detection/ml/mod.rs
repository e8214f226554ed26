//! Machine-learning outlier detectors (`ml` feature).
//!
//! Both detectors score rows of a standardised feature matrix built from the
//! candidate rows:
//!
//! | Column | Present when |
//! |--------|--------------|
//! | latitude, longitude | always |
//! | epoch seconds, Δt to previous sample | every candidate has a timestamp |
//! | speed, acceleration | every candidate has a reported speed |
//!
//! The earliest sample has no predecessor, so its Δt and acceleration take
//! the median of the other rows.
//!
//! A row is flagged when its raw score is above the `(1 − contamination)`
//! quantile of all scores *and* above the method's absolute threshold, so a
//! clean track does not lose its top 5% to the quantile alone. Reported
//! scores are min-max normalised over the flagged rows.

#[cfg(feature = "ml")]
mod isolation_forest;
#[cfg(feature = "ml")]
mod lof;

#[cfg(feature = "ml")]
pub use isolation_forest::IsolationForest;
#[cfg(feature = "ml")]
pub use lof::LocalOutlierFactor;

use super::Flag;
use crate::core::geo::{MIN_TIME_DELTA_S, to_epoch_seconds};
use crate::core::stats::{median, min_max_normalize, quantile, standardize};
use crate::core::types::Trajectory;

/// Minimum candidates for an ML detector to run.
pub const MIN_POINTS: usize = 3;

/// Standardised feature matrix, one row per candidate (in candidate order).
pub fn feature_matrix(trajectory: &Trajectory, candidates: &[usize]) -> Vec<Vec<f64>> {
    let points = trajectory.points();
    let n = candidates.len();
    let mut columns: Vec<Vec<f64>> = vec![
        candidates.iter().map(|&i| points[i].latitude).collect(),
        candidates.iter().map(|&i| points[i].longitude).collect(),
    ];

    let stamps: Option<Vec<_>> = candidates.iter().map(|&i| points[i].timestamp).collect();
    // time-sorted positions within `candidates`
    let mut slot_of = vec![usize::MAX; points.len()];
    for (k, &row) in candidates.iter().enumerate() {
        slot_of[row] = k;
    }
    let order: Vec<usize> = trajectory
        .time_order(candidates)
        .into_iter()
        .map(|row| slot_of[row])
        .collect();

    let mut dt = vec![1.0; n];
    if let Some(stamps) = &stamps {
        let mut delta = vec![0.0; n];
        for pair in order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            // exact integer microseconds, so equal intervals stay equal
            delta[b] = (stamps[b] - stamps[a])
                .num_microseconds()
                .map_or(f64::MAX, |us| us as f64 / 1_000_000.0);
            dt[b] = delta[b].max(MIN_TIME_DELTA_S);
        }
        fill_leading(&mut delta, &order);
        columns.push(stamps.iter().map(to_epoch_seconds).collect());
        columns.push(delta);
    }

    let speeds: Option<Vec<f64>> = candidates.iter().map(|&i| points[i].speed).collect();
    if let Some(speeds) = speeds {
        let mut accel = vec![0.0; n];
        for pair in order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            accel[b] = (speeds[b] - speeds[a]) / dt[b];
        }
        fill_leading(&mut accel, &order);
        columns.push(speeds);
        columns.push(accel);
    }

    for column in &mut columns {
        standardize(column);
    }

    (0..n)
        .map(|r| columns.iter().map(|c| c[r]).collect())
        .collect()
}

/// Give the first entry of `order` the median of the rest.
fn fill_leading(column: &mut [f64], order: &[usize]) {
    if let Some((&first, rest)) = order.split_first()
        && !rest.is_empty()
    {
        let others: Vec<f64> = rest.iter().map(|&k| column[k]).collect();
        column[first] = median(&others);
    }
}

/// Turn raw outlier scores into flags.
///
/// `raw[k]` belongs to `candidates[k]`; higher is more anomalous.
pub fn select_outliers(
    candidates: &[usize],
    raw: &[f64],
    contamination: f64,
    min_score: f64,
) -> Vec<Flag> {
    let cutoff = quantile(raw, 1.0 - contamination.clamp(0.0, 0.5));
    let picked: Vec<(usize, f64)> = candidates
        .iter()
        .zip(raw)
        .filter(|&(_, &s)| s > cutoff && s > min_score)
        .map(|(&i, &s)| (i, s))
        .collect();

    let raw_picked: Vec<f64> = picked.iter().map(|&(_, s)| s).collect();
    picked
        .iter()
        .zip(min_max_normalize(&raw_picked))
        .map(|(&(i, _), score)| Flag::new(i, score))
        .collect()
}

/// Squared Euclidean distance between feature rows.
#[cfg(feature = "ml")]
#[inline]
pub(crate) fn distance_2(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
