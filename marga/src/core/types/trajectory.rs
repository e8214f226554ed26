//! The trajectory table.
//!
//! A [`Trajectory`] owns its rows; the vector index is the row identity.
//! Algorithms that need time order work on index permutations
//! ([`Trajectory::time_order`]) and write results back by index, so the
//! caller's row order is never disturbed.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{DetectionMethod, TrajectoryPoint};
use crate::error::{Error, Result};

/// Ordered sequence of trajectory points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    /// Wrap a vector of points.
    pub fn new(points: Vec<TrajectoryPoint>) -> Self {
        Self { points }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All rows.
    #[inline]
    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    /// Iterate over rows.
    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryPoint> {
        self.points.iter()
    }

    /// Consume into the row vector.
    pub fn into_points(self) -> Vec<TrajectoryPoint> {
        self.points
    }

    /// Whether the timestamp column is usable: non-empty and no row lacks one.
    pub fn has_timestamps(&self) -> bool {
        !self.points.is_empty() && self.points.iter().all(|p| p.timestamp.is_some())
    }

    /// Sort `indices` by timestamp (stable; untimed rows sort last).
    pub fn time_order(&self, indices: &[usize]) -> Vec<usize> {
        let mut keyed: Vec<(usize, Option<f64>)> = indices
            .iter()
            .map(|&i| (i, self.points[i].epoch_seconds()))
            .collect();

        keyed.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        keyed.into_iter().map(|(i, _)| i).collect()
    }

    /// All row indices in time order, or row order when untimed.
    pub fn processing_order(&self) -> Vec<usize> {
        let all: Vec<usize> = (0..self.len()).collect();
        if self.has_timestamps() {
            self.time_order(&all)
        } else {
            all
        }
    }

    /// Indices of rows not yet flagged.
    pub fn unflagged_indices(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| !self.points[i].is_anomaly)
            .collect()
    }

    /// Indices of flagged rows.
    pub fn anomaly_indices(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| self.points[i].is_anomaly)
            .collect()
    }

    /// Number of flagged rows.
    pub fn anomaly_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_anomaly).count()
    }

    /// Number of rows processed by a correction.
    pub fn fixed_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_anomaly_fixed).count()
    }

    /// Check that every coordinate is a finite number.
    pub fn validate_coordinates(&self) -> Result<()> {
        match self.points.iter().position(|p| !p.has_valid_coordinates()) {
            Some(row) => Err(Error::InvalidCoordinate {
                row,
                latitude: self.points[row].latitude,
                longitude: self.points[row].longitude,
            }),
            None => Ok(()),
        }
    }

    /// Flag a row. Already-flagged rows keep their first method and score.
    ///
    /// Returns `true` if the row was newly flagged.
    pub(crate) fn flag(&mut self, index: usize, method: DetectionMethod, score: f64) -> bool {
        let Some(point) = self.points.get_mut(index) else {
            return false;
        };
        if point.is_anomaly {
            return false;
        }
        point.is_anomaly = true;
        point.anomaly_method = Some(method);
        point.anomaly_score = if score.is_finite() { score.max(0.0) } else { 0.0 };
        true
    }

    /// Replace a flagged row's coordinates and mark it processed.
    pub(crate) fn set_corrected(&mut self, index: usize, latitude: f64, longitude: f64) {
        if let Some(point) = self.points.get_mut(index) {
            point.latitude = latitude;
            point.longitude = longitude;
            point.is_anomaly_fixed = true;
        }
    }
}

impl From<Vec<TrajectoryPoint>> for Trajectory {
    fn from(points: Vec<TrajectoryPoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<TrajectoryPoint> for Trajectory {
    fn from_iter<I: IntoIterator<Item = TrajectoryPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectoryPoint;
    type IntoIter = std::slice::Iter<'a, TrajectoryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn ts(secs: i64) -> chrono::DateTime<chrono::Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_time_order_preserves_identity() {
        let t = Trajectory::new(vec![
            TrajectoryPoint::at(ts(30), 0.0, 0.0),
            TrajectoryPoint::at(ts(10), 1.0, 1.0),
            TrajectoryPoint::at(ts(20), 2.0, 2.0),
        ]);
        assert_eq!(t.time_order(&[0, 1, 2]), vec![1, 2, 0]);
        assert_eq!(t.time_order(&[0, 2]), vec![2, 0]);
        assert_eq!(t.processing_order(), vec![1, 2, 0]);
    }

    #[test]
    fn test_untimed_processing_order_is_row_order() {
        let t: Trajectory = (0..4).map(|i| TrajectoryPoint::new(i as f64, 0.0)).collect();
        assert!(!t.has_timestamps());
        assert_eq!(t.processing_order(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_partial_timestamps_are_not_a_column() {
        let t = Trajectory::new(vec![
            TrajectoryPoint::at(ts(0), 0.0, 0.0),
            TrajectoryPoint::new(1.0, 1.0),
        ]);
        assert!(!t.has_timestamps());
    }

    #[test]
    fn test_flag_keeps_first_method() {
        let mut t: Trajectory = (0..3).map(|i| TrajectoryPoint::new(i as f64, 0.0)).collect();
        assert!(t.flag(1, DetectionMethod::ZScore, 4.0));
        assert!(!t.flag(1, DetectionMethod::Speed, 9.0));
        assert_eq!(t.points()[1].anomaly_method, Some(DetectionMethod::ZScore));
        assert_eq!(t.points()[1].anomaly_score, 4.0);
        assert_eq!(t.anomaly_indices(), vec![1]);
        assert_eq!(t.unflagged_indices(), vec![0, 2]);
    }

    #[test]
    fn test_flag_never_negative_score() {
        let mut t: Trajectory = (0..2).map(|i| TrajectoryPoint::new(i as f64, 0.0)).collect();
        t.flag(0, DetectionMethod::Mad, -1.0);
        t.flag(1, DetectionMethod::Mad, f64::NAN);
        assert_eq!(t.points()[0].anomaly_score, 0.0);
        assert_eq!(t.points()[1].anomaly_score, 0.0);
    }

    #[test]
    fn test_validate_coordinates() {
        let t = Trajectory::new(vec![
            TrajectoryPoint::new(0.0, 0.0),
            TrajectoryPoint::new(0.0, f64::INFINITY),
        ]);
        assert!(matches!(
            t.validate_coordinates(),
            Err(Error::InvalidCoordinate { row: 1, .. })
        ));
    }

    #[test]
    fn test_json_is_plain_array() {
        let t = Trajectory::new(vec![TrajectoryPoint::new(1.0, 2.0)]);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.starts_with('['));
        let back: Trajectory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
