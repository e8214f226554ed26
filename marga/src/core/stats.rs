//! Summary statistics used by the detectors.
//!
//! All spread estimates are clamped to [`EPSILON`] so callers can divide by
//! them without checking for degenerate (constant) inputs.

use std::cmp::Ordering;

/// Floor applied to zero spreads (std, MAD) before division.
pub const EPSILON: f64 = 1e-10;

/// Basic statistics of a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    /// Number of samples
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl Stats {
    /// Compute statistics from a slice of values.
    pub fn from_slice(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let count = values.len();
        let mean = mean(values);
        let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        }
    }

    /// Standard deviation floored at [`EPSILON`].
    #[inline]
    pub fn safe_std(&self) -> f64 {
        self.std_dev.max(EPSILON)
    }
}

/// Arithmetic mean (0.0 for an empty slice).
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median (0.0 for an empty slice). Averages the middle pair for even lengths.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Median and median absolute deviation (MAD floored at [`EPSILON`]).
pub fn median_mad(values: &[f64]) -> (f64, f64) {
    let med = median(values);
    let deviations: Vec<f64> = values.iter().map(|&x| (x - med).abs()).collect();
    (med, median(&deviations).max(EPSILON))
}

/// Linear-interpolated quantile, `q` in [0, 1] (numpy's default method).
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Standardise a column in place to zero mean / unit variance.
pub fn standardize(values: &mut [f64]) {
    let stats = Stats::from_slice(values);
    let std = stats.safe_std();
    for v in values.iter_mut() {
        *v = (*v - stats.mean) / std;
    }
}

/// Min-max normalise scores to [0, 1].
///
/// A constant (or single-element) input maps to all ones.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().cloned().fold(f64::MAX, f64::min);
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    let range = max - min;

    if range <= EPSILON {
        return vec![1.0; values.len()];
    }
    values.iter().map(|&v| (v - min) / range).collect()
}
