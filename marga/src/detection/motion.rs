//! Kinematic detectors: implied speed, acceleration and time gaps.
//!
//! All three work on the candidates sorted by timestamp and map results
//! back to the original row indices. Elapsed times are floored at
//! [`MIN_TIME_DELTA_S`](crate::core::geo::MIN_TIME_DELTA_S) wherever they
//! are divided by.

use log::debug;

use super::{AnomalyDetector, Flag, safe_threshold};
use crate::core::geo::{consecutive_distances, floored_delta};
use crate::core::stats::{Stats, median};
use crate::core::types::{DetectionMethod, Trajectory};

/// Candidates in time order with their epoch seconds.
///
/// Rows without a timestamp are dropped; callers validate beforehand.
struct TimedPath {
    rows: Vec<usize>,
    times: Vec<f64>,
}

impl TimedPath {
    fn new(trajectory: &Trajectory, candidates: &[usize]) -> Self {
        let points = trajectory.points();
        let (rows, times) = trajectory
            .time_order(candidates)
            .into_iter()
            .filter_map(|i| points[i].epoch_seconds().map(|t| (i, t)))
            .unzip();
        Self { rows, times }
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    /// Implied speed (m/s) of each consecutive pair; entry `k - 1` belongs
    /// to the pair ending at sorted position `k`.
    fn speeds(&self, trajectory: &Trajectory) -> Vec<f64> {
        let points = trajectory.points();
        let lats: Vec<f64> = self.rows.iter().map(|&i| points[i].latitude).collect();
        let lons: Vec<f64> = self.rows.iter().map(|&i| points[i].longitude).collect();
        consecutive_distances(&lats, &lons)
            .into_iter()
            .zip(self.times.windows(2))
            .map(|(d, t)| d / floored_delta(t[0], t[1]))
            .collect()
    }
}

/// Flags the later point of any pair moving faster than
/// `mean + multiplier × std` of the positive pair speeds.
#[derive(Debug, Clone, Copy)]
pub struct SpeedDetector {
    multiplier: f64,
}

impl SpeedDetector {
    /// Spread below this fraction of the mean speed is rounding noise.
    const MIN_RELATIVE_SPREAD: f64 = 1e-6;

    /// Create a detector with a standard-deviation multiplier.
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }
}

impl AnomalyDetector for SpeedDetector {
    fn detect(&self, trajectory: &Trajectory, candidates: &[usize]) -> Vec<Flag> {
        let path = TimedPath::new(trajectory, candidates);
        if path.len() < 2 {
            return Vec::new();
        }

        let speeds = path.speeds(trajectory);
        let positive: Vec<f64> = speeds.iter().copied().filter(|&v| v > 0.0).collect();
        if positive.is_empty() {
            return Vec::new();
        }

        let stats = Stats::from_slice(&positive);
        let spread = stats
            .safe_std()
            .max(stats.mean * Self::MIN_RELATIVE_SPREAD);
        let threshold = safe_threshold(stats.mean + self.multiplier * spread);

        let flags: Vec<Flag> = speeds
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > threshold)
            .map(|(k, &v)| Flag::new(path.rows[k + 1], v / threshold))
            .collect();

        debug!(
            "speed: threshold {:.2} m/s (mean {:.2}, std {:.2}), {} flagged",
            threshold,
            stats.mean,
            stats.std_dev,
            flags.len()
        );
        flags
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::Speed
    }
}

/// Flags points where the implied speed changes faster than a limit.
///
/// Needs at least three candidates (two speeds).
#[derive(Debug, Clone, Copy)]
pub struct AccelerationDetector {
    threshold: f64,
}

impl AccelerationDetector {
    /// Create a detector with an absolute limit in m/s².
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl AnomalyDetector for AccelerationDetector {
    fn detect(&self, trajectory: &Trajectory, candidates: &[usize]) -> Vec<Flag> {
        let path = TimedPath::new(trajectory, candidates);
        if path.len() < 3 {
            return Vec::new();
        }

        let threshold = safe_threshold(self.threshold);
        let speeds = path.speeds(trajectory);

        // speeds[k - 1] ends at sorted position k; acceleration at k >= 2
        let flags: Vec<Flag> = (2..path.len())
            .filter_map(|k| {
                let dt = floored_delta(path.times[k - 1], path.times[k]);
                let accel = ((speeds[k - 1] - speeds[k - 2]) / dt).abs();
                (accel > threshold).then(|| Flag::new(path.rows[k], accel / threshold))
            })
            .collect();

        debug!(
            "acceleration: {} of {} candidates above {:.2} m/s²",
            flags.len(),
            path.len(),
            threshold
        );
        flags
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::Acceleration
    }
}

/// Flags the point after any gap longer than
/// `max(min_gap, 3 × median gap)`.
#[derive(Debug, Clone, Copy)]
pub struct TimeGapDetector {
    min_gap_s: f64,
}

impl TimeGapDetector {
    /// Multiple of the median sampling interval that counts as a gap.
    pub const MEDIAN_MULTIPLIER: f64 = 3.0;

    /// Create a detector with a minimum gap in seconds.
    pub fn new(min_gap_s: f64) -> Self {
        Self { min_gap_s }
    }
}

impl AnomalyDetector for TimeGapDetector {
    fn detect(&self, trajectory: &Trajectory, candidates: &[usize]) -> Vec<Flag> {
        let path = TimedPath::new(trajectory, candidates);
        if path.len() < 2 {
            return Vec::new();
        }

        let gaps: Vec<f64> = path.times.windows(2).map(|t| t[1] - t[0]).collect();
        let threshold =
            safe_threshold(self.min_gap_s.max(Self::MEDIAN_MULTIPLIER * median(&gaps)));

        let flags: Vec<Flag> = gaps
            .iter()
            .enumerate()
            .filter(|&(_, &g)| g > threshold)
            .map(|(k, &g)| Flag::new(path.rows[k + 1], g / threshold))
            .collect();

        debug!("time_gap: threshold {:.1} s, {} flagged", threshold, flags.len());
        flags
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::TimeGap
    }
}
