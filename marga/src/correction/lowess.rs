//! Locally-weighted scatterplot smoothing (`lowess` feature).
//!
//! Cleveland's robust LOWESS from the `lowess` crate: tricube-weighted local
//! linear fits over a `frac` share of the rows, then `iterations` bisquare
//! robustness passes. Latitude and longitude are smoothed independently.

use ::lowess::prelude::{Batch, Lowess as LowessModel};
use log::debug;

use super::{Correction, CorrectionError, CorrectionResult, Corrector, OrderedSeries};
use crate::config::LowessConfig;
use crate::core::types::{CorrectionMethod, Trajectory};

/// LOWESS correction: smooths each axis over time (or position) and
/// substitutes the fitted values at flagged rows.
#[derive(Debug, Clone)]
pub struct Lowess {
    config: LowessConfig,
}

impl Lowess {
    pub fn new(config: LowessConfig) -> Self {
        Self { config }
    }

    /// Fitted values of `y` against sorted `x`.
    fn smooth(&self, x: &[f64], y: &[f64]) -> CorrectionResult<Vec<f64>> {
        let model = LowessModel::new()
            .fraction(self.config.frac)
            .iterations(self.config.iterations)
            .adapter(Batch)
            .build()
            .map_err(|e| CorrectionError::Numerical(e.to_string()))?;
        let result = model
            .fit(x, y)
            .map_err(|e| CorrectionError::Numerical(e.to_string()))?;
        Ok(result.y)
    }
}

impl Corrector for Lowess {
    fn corrections(&self, trajectory: &Trajectory) -> CorrectionResult<Vec<Correction>> {
        let series = OrderedSeries::new(trajectory);
        if series.len() < 2 {
            return Err(CorrectionError::InsufficientData {
                required: 2,
                available: series.len(),
            });
        }

        let (lat, lon) = series.columns(trajectory);
        let frac = self.config.frac;
        let lat_fit = self.smooth(&series.x, &lat)?;
        let lon_fit = self.smooth(&series.x, &lon)?;
        if lat_fit.len() != series.len() || lon_fit.len() != series.len() {
            return Err(CorrectionError::Numerical("LOWESS fit length mismatch".into()));
        }
        if lat_fit.iter().chain(&lon_fit).any(|v| !v.is_finite()) {
            return Err(CorrectionError::Numerical("non-finite LOWESS fit".into()));
        }

        let points = trajectory.points();
        let corrections: Vec<Correction> = series
            .order
            .iter()
            .enumerate()
            .filter(|&(_, &row)| points[row].is_anomaly)
            .map(|(p, &row)| Correction::new(row, lat_fit[p], lon_fit[p]))
            .collect();

        debug!(
            "lowess: frac {:.2}, {} iterations, {} rows replaced",
            frac,
            self.config.iterations,
            corrections.len()
        );
        Ok(corrections)
    }

    fn method(&self) -> CorrectionMethod {
        CorrectionMethod::Lowess
    }
}
