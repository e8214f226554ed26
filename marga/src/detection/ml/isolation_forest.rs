//! Isolation forest outlier detector.
//!
//! Outliers are isolated by fewer random axis-aligned splits than inliers.
//! Each tree is grown on a random subsample of `ψ = min(max_samples, n)`
//! rows up to depth `ceil(log2 ψ)`; the anomaly score of a row is
//! `2^(−E[h] / c(ψ))` where `h` is its path length and `c` the average path
//! length of an unsuccessful binary-search-tree lookup.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use super::{MIN_POINTS, feature_matrix, select_outliers};
use crate::config::MlParams;
use crate::detection::{AnomalyDetector, Flag};
use crate::core::types::{DetectionMethod, Trajectory};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Isolation tree node.
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Average path length of an unsuccessful search in a BST of `n` nodes.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

fn grow(
    features: &[Vec<f64>],
    rows: Vec<usize>,
    depth: usize,
    limit: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= limit || rows.len() <= 1 {
        return Node::Leaf { size: rows.len() };
    }

    let dims = features[rows[0]].len();
    let splittable: Vec<(usize, f64, f64)> = (0..dims)
        .filter_map(|f| {
            let (lo, hi) = rows.iter().fold((f64::MAX, f64::MIN), |(lo, hi), &r| {
                (lo.min(features[r][f]), hi.max(features[r][f]))
            });
            (hi > lo).then_some((f, lo, hi))
        })
        .collect();

    // All rows identical: nothing left to isolate
    if splittable.is_empty() {
        return Node::Leaf { size: rows.len() };
    }

    let (feature, lo, hi) = splittable[rng.random_range(0..splittable.len())];
    let value = rng.random_range(lo..hi);
    let (left, right): (Vec<usize>, Vec<usize>) =
        rows.into_iter().partition(|&r| features[r][feature] < value);

    Node::Split {
        feature,
        value,
        left: Box::new(grow(features, left, depth + 1, limit, rng)),
        right: Box::new(grow(features, right, depth + 1, limit, rng)),
    }
}

fn path_length(node: &Node, x: &[f64], depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length(*size),
        Node::Split {
            feature,
            value,
            left,
            right,
        } => {
            if x[*feature] < *value {
                path_length(left, x, depth + 1)
            } else {
                path_length(right, x, depth + 1)
            }
        }
    }
}

/// Isolation forest detector.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    contamination: f64,
    threshold: f64,
    params: MlParams,
}

impl IsolationForest {
    /// Create a detector.
    ///
    /// `threshold` is the minimum raw score (0.5 ≈ normal, → 1.0 anomalous).
    pub fn new(contamination: f64, threshold: f64, params: MlParams) -> Self {
        Self {
            contamination,
            threshold,
            params,
        }
    }

    /// Raw anomaly score in (0, 1] for each feature row.
    pub fn score_samples(&self, features: &[Vec<f64>]) -> Vec<f64> {
        let n = features.len();
        if n == 0 {
            return Vec::new();
        }

        let psi = self.params.max_samples.max(2).min(n);
        let limit = (psi as f64).log2().ceil() as usize;
        let trees = self.params.n_estimators.max(1);
        let mut rng = StdRng::seed_from_u64(self.params.seed);

        let forest: Vec<Node> = (0..trees)
            .map(|_| {
                let rows = index::sample(&mut rng, n, psi).into_vec();
                grow(features, rows, 0, limit, &mut rng)
            })
            .collect();

        let norm = average_path_length(psi).max(f64::EPSILON);
        features
            .iter()
            .map(|x| {
                let mean_h =
                    forest.iter().map(|t| path_length(t, x, 0)).sum::<f64>() / trees as f64;
                2f64.powf(-mean_h / norm)
            })
            .collect()
    }
}

impl AnomalyDetector for IsolationForest {
    fn detect(&self, trajectory: &Trajectory, candidates: &[usize]) -> Vec<Flag> {
        if candidates.len() < MIN_POINTS {
            return Vec::new();
        }

        let features = feature_matrix(trajectory, candidates);
        let raw = self.score_samples(&features);
        let flags = select_outliers(candidates, &raw, self.contamination, self.threshold);

        debug!(
            "isolation_forest: {} trees, {} of {} candidates flagged",
            self.params.n_estimators,
            flags.len(),
            candidates.len()
        );
        flags
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::IsolationForest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TrajectoryPoint;
    use approx::assert_relative_eq;

    /// 8×8 grid of points ~10 m apart plus one point ~5 km away (row 64).
    fn grid_with_outlier() -> Trajectory {
        let mut points: Vec<TrajectoryPoint> = (0..64)
            .map(|i| TrajectoryPoint::new(48.0 + (i / 8) as f64 * 1e-4, 11.0 + (i % 8) as f64 * 1e-4))
            .collect();
        points.push(TrajectoryPoint::new(48.045, 11.045));
        points.into()
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        assert_relative_eq!(average_path_length(256), 10.244, epsilon = 1e-3);
    }

    #[test]
    fn test_outlier_scores_highest() {
        let t = grid_with_outlier();
        let all: Vec<usize> = (0..t.len()).collect();
        let forest = IsolationForest::new(0.05, 0.65, MlParams::default());
        let raw = forest.score_samples(&feature_matrix(&t, &all));

        let (best, _) = raw
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &s)| if s > acc.1 { (i, s) } else { acc });
        assert_eq!(best, 64);
        assert!(raw[64] > 0.65);
        assert!(raw[..64].iter().all(|&s| s < raw[64]));
    }

    #[test]
    fn test_detect_flags_outlier_with_top_score() {
        let t = grid_with_outlier();
        let all: Vec<usize> = (0..t.len()).collect();
        let flags = IsolationForest::new(0.05, 0.65, MlParams::default()).detect(&t, &all);
        let outlier = flags.iter().find(|f| f.index == 64).unwrap();
        assert_eq!(outlier.score, 1.0);
        assert!(flags.len() <= 3);
    }

    #[test]
    fn test_seed_makes_scores_reproducible() {
        let t = grid_with_outlier();
        let all: Vec<usize> = (0..t.len()).collect();
        let features = feature_matrix(&t, &all);
        let forest = IsolationForest::new(0.05, 0.65, MlParams::default());
        assert_eq!(forest.score_samples(&features), forest.score_samples(&features));
    }

    #[test]
    fn test_identical_points() {
        let t: Trajectory = (0..10).map(|_| TrajectoryPoint::new(1.0, 1.0)).collect();
        let all: Vec<usize> = (0..t.len()).collect();
        assert!(IsolationForest::new(0.05, 0.65, MlParams::default()).detect(&t, &all).is_empty());
    }
}
