//! Savitzky-Golay smoothing.

use super::{Correction, CorrectionError, CorrectionResult, Corrector, OrderedSeries};
use crate::core::math::polyfit;
use crate::core::types::{CorrectionMethod, Trajectory};

/// Savitzky-Golay filter over the full series in processing order.
///
/// Window length is `2·half_window + 1`, clipped to the series length and
/// forced odd; polynomial order is `min(3, length − 1)`. Each flagged row is
/// replaced by the local polynomial evaluated at its position. Near the ends
/// the window is shifted to stay inside the series and the polynomial is
/// evaluated off-centre.
#[derive(Debug, Clone, Copy)]
pub struct SavitzkyGolay {
    half_window: usize,
}

impl SavitzkyGolay {
    /// Smallest usable window.
    pub const MIN_WINDOW: usize = 3;
    /// Highest polynomial order.
    pub const MAX_ORDER: usize = 3;

    pub fn new(half_window: usize) -> Self {
        Self { half_window }
    }

    /// Effective window length for a series of `n` samples.
    pub fn window_length(&self, n: usize) -> usize {
        let mut length = (2 * self.half_window + 1).min(n);
        if length % 2 == 0 {
            length = length.saturating_sub(1);
        }
        length
    }
}

impl Corrector for SavitzkyGolay {
    fn corrections(&self, trajectory: &Trajectory) -> CorrectionResult<Vec<Correction>> {
        let series = OrderedSeries::new(trajectory);
        let n = series.len();
        let length = self.window_length(n);
        if length < Self::MIN_WINDOW {
            return Err(CorrectionError::InsufficientData {
                required: Self::MIN_WINDOW,
                available: length,
            });
        }
        let order = Self::MAX_ORDER.min(length - 1);
        let half = length / 2;

        let (lat, lon) = series.columns(trajectory);
        let points = trajectory.points();

        let mut corrections = Vec::new();
        for p in (0..n).filter(|&p| points[series.order[p]].is_anomaly) {
            let start = p.saturating_sub(half).min(n - length);
            let xs: Vec<f64> = (start..start + length)
                .map(|q| q as f64 - p as f64)
                .collect();

            // Coefficients are centred on p, so c[0] is the value there
            let fit = |y: &[f64]| {
                polyfit(&xs, &y[start..start + length], order)
                    .map(|c| c[0])
                    .ok_or_else(|| CorrectionError::Numerical("singular Savitzky-Golay fit".into()))
            };
            corrections.push(Correction::new(series.order[p], fit(&lat)?, fit(&lon)?));
        }
        Ok(corrections)
    }

    fn method(&self) -> CorrectionMethod {
        CorrectionMethod::Savgol
    }
}
