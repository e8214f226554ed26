//! Nearest-reference replacement.

use super::{Correction, CorrectionError, CorrectionResult, Corrector};
use crate::core::types::{CorrectionMethod, Trajectory};
use crate::detection::PointIndex;

/// Copies the coordinates of the spatially nearest reference row.
///
/// Not time-aware: the lookup uses the flagged row's own (possibly wrong)
/// position.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl Corrector for NearestNeighbor {
    fn corrections(&self, trajectory: &Trajectory) -> CorrectionResult<Vec<Correction>> {
        let references = trajectory.unflagged_indices();
        if references.is_empty() {
            return Err(CorrectionError::NoReferencePoints);
        }

        let index = PointIndex::new(trajectory, &references);
        let points = trajectory.points();

        Ok(trajectory
            .anomaly_indices()
            .into_iter()
            .filter_map(|i| {
                let j = index.nearest(points[i].latitude, points[i].longitude)?;
                Some(Correction::new(i, points[j].latitude, points[j].longitude))
            })
            .collect())
    }

    fn method(&self) -> CorrectionMethod {
        CorrectionMethod::Nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DetectionMethod, TrajectoryPoint};

    #[test]
    fn test_copies_nearest_reference() {
        let mut t: Trajectory = vec![
            TrajectoryPoint::new(0.0, 0.0),
            TrajectoryPoint::new(1.0, 1.0),
            TrajectoryPoint::new(0.9, 1.2),
            TrajectoryPoint::new(5.0, 5.0),
        ]
        .into();
        t.flag(2, DetectionMethod::Distance, 2.0);

        let c = NearestNeighbor.corrections(&t).unwrap();
        assert_eq!(c, vec![Correction::new(2, 1.0, 1.0)]);
    }

    #[test]
    fn test_never_copies_flagged_rows() {
        let mut t: Trajectory = vec![
            TrajectoryPoint::new(0.0, 0.0),
            TrajectoryPoint::new(3.0, 3.0),
            TrajectoryPoint::new(3.0, 3.1),
        ]
        .into();
        t.flag(1, DetectionMethod::Distance, 2.0);
        t.flag(2, DetectionMethod::Distance, 2.0);

        let c = NearestNeighbor.corrections(&t).unwrap();
        assert!(c.iter().all(|c| c.latitude == 0.0 && c.longitude == 0.0));
    }
}
