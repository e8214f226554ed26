//! Spatial index over trajectory positions and the nearest-neighbour
//! distance detector.
//!
//! The R-tree works in planar degree space, which is only used to pick the
//! nearest candidate; distances that matter are recomputed with Haversine.

use log::debug;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::{AnomalyDetector, Flag, safe_threshold};
use crate::core::geo::haversine;
use crate::core::types::{DetectionMethod, Trajectory};

/// A trajectory position for R-tree storage.
#[derive(Clone, Copy, Debug)]
pub struct IndexedPoint {
    /// `[latitude, longitude]` in degrees.
    pub position: [f64; 2],
    /// Row index in the trajectory.
    pub index: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Nearest-neighbour index over a subset of trajectory rows.
#[derive(Clone)]
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Index the rows `indices` of `trajectory`.
    pub fn new(trajectory: &Trajectory, indices: &[usize]) -> Self {
        let points = trajectory.points();
        let indexed: Vec<IndexedPoint> = indices
            .iter()
            .map(|&i| IndexedPoint {
                position: [points[i].latitude, points[i].longitude],
                index: i,
            })
            .collect();

        Self {
            tree: RTree::bulk_load(indexed),
        }
    }

    /// Number of indexed rows.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Row nearest to a position.
    pub fn nearest(&self, latitude: f64, longitude: f64) -> Option<usize> {
        self.tree
            .nearest_neighbor(&[latitude, longitude])
            .map(|p| p.index)
    }

    /// Row nearest to a position, ignoring row `exclude`.
    pub fn nearest_other(&self, latitude: f64, longitude: f64, exclude: usize) -> Option<usize> {
        self.tree
            .nearest_neighbor_iter(&[latitude, longitude])
            .find(|p| p.index != exclude)
            .map(|p| p.index)
    }
}

/// Flags points whose nearest other point is farther than a distance.
///
/// Score is `distance / threshold`. Needs at least three candidates.
#[derive(Debug, Clone, Copy)]
pub struct DistanceDetector {
    threshold_m: f64,
}

impl DistanceDetector {
    /// Minimum number of candidates to evaluate.
    pub const MIN_POINTS: usize = 3;

    /// Create a detector with a threshold in meters.
    pub fn new(threshold_m: f64) -> Self {
        Self { threshold_m }
    }
}

impl AnomalyDetector for DistanceDetector {
    fn detect(&self, trajectory: &Trajectory, candidates: &[usize]) -> Vec<Flag> {
        if candidates.len() < Self::MIN_POINTS {
            return Vec::new();
        }

        let threshold = safe_threshold(self.threshold_m);
        let index = PointIndex::new(trajectory, candidates);
        let points = trajectory.points();

        let flags: Vec<Flag> = candidates
            .iter()
            .filter_map(|&i| {
                let p = &points[i];
                let j = index.nearest_other(p.latitude, p.longitude, i)?;
                let q = &points[j];
                let d = haversine(p.latitude, p.longitude, q.latitude, q.longitude);
                (d > threshold).then(|| Flag::new(i, d / threshold))
            })
            .collect();

        debug!(
            "distance: {} of {} candidates isolated beyond {:.1} m",
            flags.len(),
            candidates.len(),
            threshold
        );
        flags
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::Distance
    }
}
