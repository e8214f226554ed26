//! Windowed mean of reference rows.

use super::{Correction, CorrectionError, CorrectionResult, Corrector, OrderedSeries};
use crate::core::types::{CorrectionMethod, Trajectory};

/// Replaces a flagged row with the mean of the reference rows within
/// `±window` positions in processing order.
///
/// A window without reference rows leaves the row unprocessed.
#[derive(Debug, Clone, Copy)]
pub struct MovingAverage {
    window: usize,
}

impl MovingAverage {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Corrector for MovingAverage {
    fn corrections(&self, trajectory: &Trajectory) -> CorrectionResult<Vec<Correction>> {
        if trajectory.unflagged_indices().is_empty() {
            return Err(CorrectionError::NoReferencePoints);
        }

        let series = OrderedSeries::new(trajectory);
        let points = trajectory.points();
        let n = series.len();

        let corrections = (0..n)
            .filter(|&p| points[series.order[p]].is_anomaly)
            .filter_map(|p| {
                let lo = p.saturating_sub(self.window);
                let hi = (p + self.window + 1).min(n);
                let (mut lat, mut lon, mut count) = (0.0, 0.0, 0usize);
                for &row in &series.order[lo..hi] {
                    if !points[row].is_anomaly {
                        lat += points[row].latitude;
                        lon += points[row].longitude;
                        count += 1;
                    }
                }
                (count > 0).then(|| {
                    Correction::new(series.order[p], lat / count as f64, lon / count as f64)
                })
            })
            .collect();

        Ok(corrections)
    }

    fn method(&self) -> CorrectionMethod {
        CorrectionMethod::MovingAverage
    }
}
