//! Position-distribution detectors: z-score and median absolute deviation.
//!
//! Both standardise latitude and longitude independently over the
//! candidate rows and combine the two axes as `sqrt(z_lat² + z_lon²)`.

use log::debug;

use super::{AnomalyDetector, Flag, safe_threshold};
use crate::core::stats::{Stats, median_mad};
use crate::core::types::{DetectionMethod, Trajectory};

/// Scale that makes MAD consistent with σ for normal data (Iglewicz-Hoaglin).
const MAD_SCALE: f64 = 0.6745;

/// Flags points far from the mean position in standard deviations.
#[derive(Debug, Clone, Copy)]
pub struct ZScoreDetector {
    threshold: f64,
}

impl ZScoreDetector {
    /// Create a detector flagging combined z-scores above `threshold`.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl AnomalyDetector for ZScoreDetector {
    fn detect(&self, trajectory: &Trajectory, candidates: &[usize]) -> Vec<Flag> {
        let (lats, lons) = columns(trajectory, candidates);
        let lat = Stats::from_slice(&lats);
        let lon = Stats::from_slice(&lons);
        let (lat_std, lon_std) = (lat.safe_std(), lon.safe_std());

        let scores = candidates.iter().enumerate().map(|(k, &idx)| {
            let z_lat = (lats[k] - lat.mean) / lat_std;
            let z_lon = (lons[k] - lon.mean) / lon_std;
            (idx, z_lat.hypot(z_lon))
        });
        let flags = above(scores, self.threshold);

        debug!(
            "z_score: {} of {} candidates above {:.2}",
            flags.len(),
            candidates.len(),
            self.threshold
        );
        flags
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::ZScore
    }
}

/// Flags points far from the median position in scaled MAD units.
///
/// Uses the modified z-score `0.6745·(x − median)/MAD` per axis, which is
/// robust against the very outliers being searched for.
#[derive(Debug, Clone, Copy)]
pub struct MadDetector {
    threshold: f64,
}

impl MadDetector {
    /// Create a detector flagging combined modified z-scores above `threshold`.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl AnomalyDetector for MadDetector {
    fn detect(&self, trajectory: &Trajectory, candidates: &[usize]) -> Vec<Flag> {
        let (lats, lons) = columns(trajectory, candidates);
        let (lat_med, lat_mad) = median_mad(&lats);
        let (lon_med, lon_mad) = median_mad(&lons);

        let scores = candidates.iter().enumerate().map(|(k, &idx)| {
            let m_lat = MAD_SCALE * (lats[k] - lat_med) / lat_mad;
            let m_lon = MAD_SCALE * (lons[k] - lon_med) / lon_mad;
            (idx, m_lat.hypot(m_lon))
        });
        let flags = above(scores, self.threshold);

        debug!(
            "mad: {} of {} candidates above {:.2}",
            flags.len(),
            candidates.len(),
            self.threshold
        );
        flags
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::Mad
    }
}

fn columns(trajectory: &Trajectory, candidates: &[usize]) -> (Vec<f64>, Vec<f64>) {
    let points = trajectory.points();
    candidates
        .iter()
        .map(|&i| (points[i].latitude, points[i].longitude))
        .unzip()
}

/// Keep `(index, value)` pairs strictly above `threshold`; the reported
/// score is the combined value itself.
fn above(scores: impl Iterator<Item = (usize, f64)>, threshold: f64) -> Vec<Flag> {
    let threshold = safe_threshold(threshold);
    scores
        .filter(|&(_, s)| s > threshold)
        .map(|(idx, s)| Flag::new(idx, s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TrajectoryPoint;

    /// Points on a small ellipse with one far-away point at `outlier`.
    fn cloud_with_outlier(n: usize, outlier: usize) -> Trajectory {
        (0..n)
            .map(|i| {
                if i == outlier {
                    TrajectoryPoint::new(48.05, 11.05)
                } else {
                    let a = i as f64 * 0.7;
                    TrajectoryPoint::new(48.0 + 0.001 * a.sin(), 11.0 + 0.001 * a.cos())
                }
            })
            .collect()
    }

    #[test]
    fn test_zscore_flags_outlier() {
        let t = cloud_with_outlier(50, 17);
        let all: Vec<usize> = (0..t.len()).collect();
        let flags = ZScoreDetector::new(3.0).detect(&t, &all);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].index, 17);
        assert!(flags[0].score > 3.0);
    }

    #[test]
    fn test_mad_flags_outlier() {
        let t = cloud_with_outlier(50, 3);
        let all: Vec<usize> = (0..t.len()).collect();
        let flags = MadDetector::new(3.5).detect(&t, &all);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].index, 3);
    }

    #[test]
    fn test_candidates_restrict_evaluation() {
        let t = cloud_with_outlier(50, 17);
        let without: Vec<usize> = (0..t.len()).filter(|&i| i != 17).collect();
        assert!(ZScoreDetector::new(3.0).detect(&t, &without).is_empty());
    }

    #[test]
    fn test_constant_positions_are_not_flagged() {
        let t: Trajectory = (0..10).map(|_| TrajectoryPoint::new(1.0, 2.0)).collect();
        let all: Vec<usize> = (0..t.len()).collect();
        assert!(ZScoreDetector::new(3.0).detect(&t, &all).is_empty());
        assert!(MadDetector::new(3.5).detect(&t, &all).is_empty());
    }

    #[test]
    fn test_empty_candidates() {
        let t = cloud_with_outlier(5, 0);
        assert!(ZScoreDetector::new(3.0).detect(&t, &[]).is_empty());
        assert!(MadDetector::new(3.5).detect(&t, &[]).is_empty());
    }
}
