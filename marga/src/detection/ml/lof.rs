//! Local outlier factor detector.
//!
//! Compares each row's local reachability density with that of its `k`
//! nearest neighbours in feature space. Inliers score ≈ 1.0; isolated rows
//! score well above.
//!
//! Neighbours come from an R-tree over the feature rows, zero-padded to
//! [`MAX_DIMS`] so one tree type serves every column layout.

use log::debug;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use super::{MIN_POINTS, distance_2, feature_matrix, select_outliers};
use crate::core::stats::EPSILON;
use crate::core::types::{DetectionMethod, Trajectory};
use crate::detection::{AnomalyDetector, Flag};

/// Widest feature row; padding with zeros leaves distances unchanged.
const MAX_DIMS: usize = 6;

type FeaturePoint = GeomWithData<[f64; MAX_DIMS], usize>;

fn padded(row: &[f64]) -> [f64; MAX_DIMS] {
    let mut p = [0.0; MAX_DIMS];
    for (slot, v) in p.iter_mut().zip(row) {
        *slot = *v;
    }
    p
}

/// Local outlier factor detector.
#[derive(Debug, Clone, Copy)]
pub struct LocalOutlierFactor {
    contamination: f64,
    threshold: f64,
    n_neighbors: usize,
}

impl LocalOutlierFactor {
    /// Create a detector.
    ///
    /// `threshold` is the minimum factor for a row to be flagged.
    pub fn new(contamination: f64, threshold: f64, n_neighbors: usize) -> Self {
        Self {
            contamination,
            threshold,
            n_neighbors,
        }
    }

    /// Local outlier factor for each feature row.
    pub fn score_samples(&self, features: &[Vec<f64>]) -> Vec<f64> {
        let n = features.len();
        if n < 2 {
            return vec![1.0; n];
        }
        let k = self.n_neighbors.clamp(1, n - 1);

        let tree = RTree::bulk_load(
            features
                .iter()
                .enumerate()
                .map(|(i, row)| FeaturePoint::new(padded(row), i))
                .collect(),
        );

        // k nearest neighbours (index, distance) of every row, closest first
        let neighbors: Vec<Vec<(usize, f64)>> = features
            .iter()
            .enumerate()
            .map(|(i, row)| {
                tree.nearest_neighbor_iter(&padded(row))
                    .filter(|p| p.data != i)
                    .take(k)
                    .map(|p| (p.data, distance_2(row, &features[p.data]).sqrt()))
                    .collect()
            })
            .collect();

        let k_distance: Vec<f64> = neighbors
            .iter()
            .map(|nb| nb.last().map_or(0.0, |&(_, d)| d))
            .collect();

        // Local reachability density
        let lrd: Vec<f64> = neighbors
            .iter()
            .map(|nb| {
                let reach: f64 = nb.iter().map(|&(j, d)| d.max(k_distance[j])).sum();
                1.0 / (reach / nb.len() as f64 + EPSILON)
            })
            .collect();

        neighbors
            .iter()
            .enumerate()
            .map(|(i, nb)| {
                let mean_lrd: f64 = nb.iter().map(|&(j, _)| lrd[j]).sum::<f64>() / nb.len() as f64;
                mean_lrd / lrd[i]
            })
            .collect()
    }
}

impl AnomalyDetector for LocalOutlierFactor {
    fn detect(&self, trajectory: &Trajectory, candidates: &[usize]) -> Vec<Flag> {
        if candidates.len() < MIN_POINTS {
            return Vec::new();
        }

        let features = feature_matrix(trajectory, candidates);
        let raw = self.score_samples(&features);
        let flags = select_outliers(candidates, &raw, self.contamination, self.threshold);

        debug!(
            "lof: k={}, {} of {} candidates flagged",
            self.n_neighbors.min(candidates.len() - 1),
            flags.len(),
            candidates.len()
        );
        flags
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::LocalOutlierFactor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TrajectoryPoint;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// k-distance of every row by exhaustive search.
    fn brute_force_k_distance(features: &[Vec<f64>], k: usize) -> Vec<f64> {
        features
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let mut d: Vec<f64> = features
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, b)| distance_2(a, b).sqrt())
                    .collect();
                d.sort_by(|x, y| x.total_cmp(y));
                d[k - 1]
            })
            .collect()
    }

    #[test]
    fn test_uniform_grid_scores_near_one() {
        let features: Vec<Vec<f64>> = (0..25)
            .map(|i| vec![(i / 5) as f64, (i % 5) as f64])
            .collect();
        let scores = LocalOutlierFactor::new(0.05, 1.5, 4).score_samples(&features);
        // centre of the grid
        assert_relative_eq!(scores[12], 1.0, epsilon = 0.15);
        assert!(scores.iter().all(|&s| s < 1.5));
    }

    #[test]
    fn test_isolated_point_flagged() {
        let mut points: Vec<TrajectoryPoint> = (0..40)
            .map(|i| {
                let a = i as f64 * 0.3;
                TrajectoryPoint::new(48.0 + 1e-4 * a.cos(), 11.0 + 1e-4 * a.sin())
            })
            .collect();
        points.push(TrajectoryPoint::new(48.01, 11.01));
        let t: Trajectory = points.into();
        let all: Vec<usize> = (0..t.len()).collect();

        let flags = LocalOutlierFactor::new(0.05, 1.5, 20).detect(&t, &all);
        let outlier = flags.iter().find(|f| f.index == 40).unwrap();
        assert_eq!(outlier.score, 1.0);
    }

    #[test]
    fn test_tree_neighbours_match_exhaustive_search() {
        let mut rng = StdRng::seed_from_u64(3);
        let features: Vec<Vec<f64>> = (0..150)
            .map(|_| (0..4).map(|_| rng.random_range(-2.0..2.0)).collect())
            .collect();
        let lof = LocalOutlierFactor::new(0.05, 1.5, 10);

        // Same k-distances give the same reachability densities
        let expected = brute_force_k_distance(&features, 10);
        let tree = RTree::bulk_load(
            features
                .iter()
                .enumerate()
                .map(|(i, row)| FeaturePoint::new(padded(row), i))
                .collect(),
        );
        for (i, row) in features.iter().enumerate() {
            let kth = tree
                .nearest_neighbor_iter(&padded(row))
                .filter(|p| p.data != i)
                .nth(9)
                .map(|p| distance_2(row, &features[p.data]).sqrt())
                .unwrap();
            assert_relative_eq!(kth, expected[i], epsilon = 1e-12);
        }
        assert!(lof.score_samples(&features).iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_duplicate_rows_stay_finite() {
        let mut features = vec![vec![0.0, 0.0]; 30];
        features.push(vec![5.0, 5.0]);
        let scores = LocalOutlierFactor::new(0.05, 1.5, 5).score_samples(&features);
        assert!(scores.iter().all(|s| s.is_finite()));
        assert!(scores[30] > 1.5);
    }

    #[test]
    fn test_neighbourhood_clamped_to_sample() {
        let features = vec![vec![0.0], vec![1.0], vec![2.0]];
        let scores = LocalOutlierFactor::new(0.05, 1.5, 20).score_samples(&features);
        assert_eq!(scores.len(), 3);
        assert!(scores.iter().all(|s| s.is_finite()));
    }
}
