//! Linear interpolation, the fallback for every other filter.

use super::{Correction, CorrectionError, CorrectionResult, Corrector};
use crate::core::math::interp;
use crate::core::types::{CorrectionMethod, Extrapolation, Trajectory};

/// Linear interpolation from reference rows.
///
/// With timestamps, each axis is interpolated over epoch seconds from the
/// time-sorted reference rows. Without, a flagged row takes the mean of the
/// closest reference rows before and after it in row order, or copies the
/// only one that exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator {
    extrapolation: Extrapolation,
}

impl LinearInterpolator {
    pub fn new(extrapolation: Extrapolation) -> Self {
        Self { extrapolation }
    }

    fn over_time(&self, trajectory: &Trajectory, references: &[usize]) -> Vec<Correction> {
        let points = trajectory.points();
        let sorted = trajectory.time_order(references);

        let mut xp = Vec::with_capacity(sorted.len());
        let mut lat = Vec::with_capacity(sorted.len());
        let mut lon = Vec::with_capacity(sorted.len());
        for &i in &sorted {
            if let Some(t) = points[i].epoch_seconds() {
                xp.push(t);
                lat.push(points[i].latitude);
                lon.push(points[i].longitude);
            }
        }

        trajectory
            .anomaly_indices()
            .into_iter()
            .filter_map(|i| {
                let t = points[i].epoch_seconds()?;
                Some(Correction::new(
                    i,
                    interp(t, &xp, &lat, self.extrapolation)?,
                    interp(t, &xp, &lon, self.extrapolation)?,
                ))
            })
            .collect()
    }

    fn by_row(&self, trajectory: &Trajectory) -> Vec<Correction> {
        let points = trajectory.points();
        let n = points.len();

        // Closest reference row at or before / after each position
        let mut before = vec![None; n];
        let mut last = None;
        for i in 0..n {
            if !points[i].is_anomaly {
                last = Some(i);
            }
            before[i] = last;
        }
        let mut after = vec![None; n];
        let mut next = None;
        for i in (0..n).rev() {
            if !points[i].is_anomaly {
                next = Some(i);
            }
            after[i] = next;
        }

        trajectory
            .anomaly_indices()
            .into_iter()
            .filter_map(|i| {
                let (lat, lon) = match (before[i], after[i]) {
                    (Some(a), Some(b)) => (
                        0.5 * (points[a].latitude + points[b].latitude),
                        0.5 * (points[a].longitude + points[b].longitude),
                    ),
                    (Some(r), None) | (None, Some(r)) => (points[r].latitude, points[r].longitude),
                    (None, None) => return None,
                };
                Some(Correction::new(i, lat, lon))
            })
            .collect()
    }
}

impl Corrector for LinearInterpolator {
    fn corrections(&self, trajectory: &Trajectory) -> CorrectionResult<Vec<Correction>> {
        let references = trajectory.unflagged_indices();
        if references.is_empty() {
            return Err(CorrectionError::NoReferencePoints);
        }

        Ok(if trajectory.has_timestamps() {
            self.over_time(trajectory, &references)
        } else {
            self.by_row(trajectory)
        })
    }

    fn method(&self) -> CorrectionMethod {
        CorrectionMethod::Linear
    }
}
