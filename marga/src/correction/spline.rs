//! Smoothing and interpolating cubic splines over time.
//!
//! [`SmoothingSpline`] is the Reinsch smoothing spline: the natural cubic
//! spline `g` minimising
//!
//! ```text
//! Σ (yᵢ − g(xᵢ))² + λ ∫ g''(x)² dx
//! ```
//!
//! With `λ = 0` it interpolates the data. The fit solves the pentadiagonal
//! system `(R + λ QᵀQ) γ = Qᵀ y` for the interior second derivatives `γ` and
//! sets the knot values to `g = y − λ Q γ` (Green & Silverman, ch. 2).
//! Time is rescaled to unit mean knot spacing so `λ` is independent of the
//! sampling rate.

use super::{Correction, CorrectionError, CorrectionResult, Corrector};
use crate::core::math::solve_pentadiagonal;
use crate::core::types::{CorrectionMethod, Extrapolation, Trajectory};

/// Fitted natural cubic spline.
#[derive(Debug, Clone)]
pub struct SmoothingSpline {
    /// Knots (strictly increasing)
    x: Vec<f64>,
    /// Spline values at the knots
    g: Vec<f64>,
    /// Second derivatives at the knots (zero at both ends)
    gamma: Vec<f64>,
}

impl SmoothingSpline {
    /// Minimum number of knots.
    pub const MIN_POINTS: usize = 3;

    /// Fit a spline with smoothing parameter `lambda` (≥ 0).
    ///
    /// `x` must be strictly increasing; returns `None` otherwise or when the
    /// system is singular.
    pub fn fit(x: &[f64], y: &[f64], lambda: f64) -> Option<Self> {
        let n = x.len();
        if n < Self::MIN_POINTS || y.len() != n {
            return None;
        }
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        if h.iter().any(|&hi| !(hi > 0.0)) {
            return None;
        }
        let lambda = lambda.max(0.0);

        // Interior knot k corresponds to point k + 1; Q column k has entries
        // a_k, b_k, c_k at rows k, k + 1, k + 2.
        let m = n - 2;
        let a: Vec<f64> = (0..m).map(|k| 1.0 / h[k]).collect();
        let c: Vec<f64> = (0..m).map(|k| 1.0 / h[k + 1]).collect();
        let b: Vec<f64> = (0..m).map(|k| -a[k] - c[k]).collect();

        let mut diag = vec![0.0; m];
        let mut off1 = vec![0.0; m.saturating_sub(1)];
        let mut off2 = vec![0.0; m.saturating_sub(2)];
        let mut rhs = vec![0.0; m];

        for k in 0..m {
            diag[k] = (h[k] + h[k + 1]) / 3.0 + lambda * (a[k] * a[k] + b[k] * b[k] + c[k] * c[k]);
            rhs[k] = (y[k + 2] - y[k + 1]) / h[k + 1] - (y[k + 1] - y[k]) / h[k];
            if k + 1 < m {
                off1[k] = h[k + 1] / 6.0 + lambda * (b[k] * a[k + 1] + c[k] * b[k + 1]);
            }
            if k + 2 < m {
                off2[k] = lambda * c[k] * a[k + 2];
            }
        }

        let interior = solve_pentadiagonal(&diag, &off1, &off2, &rhs)?;

        // g = y − λ Q γ
        let mut g = y.to_vec();
        if lambda > 0.0 {
            for (k, &gk) in interior.iter().enumerate() {
                g[k] -= lambda * a[k] * gk;
                g[k + 1] -= lambda * b[k] * gk;
                g[k + 2] -= lambda * c[k] * gk;
            }
        }

        let mut gamma = vec![0.0; n];
        gamma[1..n - 1].copy_from_slice(&interior);

        Some(Self {
            x: x.to_vec(),
            g,
            gamma,
        })
    }

    /// Evaluate at `t`. Outside the knots the value is held (`Nearest`) or
    /// continued along the end tangent (`Linear`, the natural extension).
    pub fn evaluate(&self, t: f64, extrapolation: Extrapolation) -> f64 {
        let n = self.x.len();
        let (x, g, gamma) = (&self.x, &self.g, &self.gamma);

        if t <= x[0] {
            return match extrapolation {
                Extrapolation::Nearest => g[0],
                Extrapolation::Linear => {
                    let h = x[1] - x[0];
                    let slope = (g[1] - g[0]) / h - h * gamma[1] / 6.0;
                    g[0] + slope * (t - x[0])
                }
            };
        }
        if t >= x[n - 1] {
            return match extrapolation {
                Extrapolation::Nearest => g[n - 1],
                Extrapolation::Linear => {
                    let h = x[n - 1] - x[n - 2];
                    let slope = (g[n - 1] - g[n - 2]) / h + h * gamma[n - 2] / 6.0;
                    g[n - 1] + slope * (t - x[n - 1])
                }
            };
        }

        let i = x.partition_point(|&v| v <= t) - 1;
        let h = x[i + 1] - x[i];
        let (dl, dr) = (t - x[i], x[i + 1] - t);
        (dl * g[i + 1] + dr * g[i]) / h
            - dl * dr / 6.0 * ((1.0 + dl / h) * gamma[i + 1] + (1.0 + dr / h) * gamma[i])
    }
}

/// Spline interpolation of flagged rows over time.
///
/// `smoothing(λ)` fits a smoothing spline, `cubic()` an interpolating one.
#[derive(Debug, Clone, Copy)]
pub struct SplineInterpolator {
    method: CorrectionMethod,
    lambda: f64,
    extrapolation: Extrapolation,
}

impl SplineInterpolator {
    /// Minimum reference rows.
    pub const MIN_REFERENCES: usize = 4;

    pub fn smoothing(lambda: f64, extrapolation: Extrapolation) -> Self {
        Self {
            method: CorrectionMethod::Spline,
            lambda,
            extrapolation,
        }
    }

    pub fn cubic(extrapolation: Extrapolation) -> Self {
        Self {
            method: CorrectionMethod::Cubic,
            lambda: 0.0,
            extrapolation,
        }
    }
}

impl Corrector for SplineInterpolator {
    fn corrections(&self, trajectory: &Trajectory) -> CorrectionResult<Vec<Correction>> {
        if !trajectory.has_timestamps() {
            return Err(CorrectionError::MissingTimestamps);
        }
        let references = trajectory.time_order(&trajectory.unflagged_indices());
        if references.len() < Self::MIN_REFERENCES {
            return Err(CorrectionError::InsufficientData {
                required: Self::MIN_REFERENCES,
                available: references.len(),
            });
        }

        let points = trajectory.points();
        let times: Vec<f64> = references
            .iter()
            .filter_map(|&i| points[i].epoch_seconds())
            .collect();
        let t0 = times[0];
        let spacing = (times[times.len() - 1] - t0) / (times.len() - 1) as f64;
        if !(spacing > 0.0) {
            return Err(CorrectionError::Numerical("zero time span".into()));
        }
        let scale = |t: f64| (t - t0) / spacing;

        let x: Vec<f64> = times.iter().map(|&t| scale(t)).collect();
        let lat: Vec<f64> = references.iter().map(|&i| points[i].latitude).collect();
        let lon: Vec<f64> = references.iter().map(|&i| points[i].longitude).collect();

        let fit = |y: &[f64]| {
            SmoothingSpline::fit(&x, y, self.lambda).ok_or_else(|| {
                CorrectionError::Numerical("spline fit failed (duplicate timestamps?)".into())
            })
        };
        let lat_spline = fit(&lat)?;
        let lon_spline = fit(&lon)?;

        Ok(trajectory
            .anomaly_indices()
            .into_iter()
            .filter_map(|i| {
                let t = scale(points[i].epoch_seconds()?);
                Some(Correction::new(
                    i,
                    lat_spline.evaluate(t, self.extrapolation),
                    lon_spline.evaluate(t, self.extrapolation),
                ))
            })
            .collect())
    }

    fn method(&self) -> CorrectionMethod {
        self.method
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DetectionMethod, TrajectoryPoint};
    use approx::assert_relative_eq;
    use chrono::DateTime;

    #[test]
    fn test_interpolating_spline_hits_knots() {
        let x = [0.0, 1.0, 2.5, 3.0, 4.0];
        let y = [1.0, 3.0, -1.0, 0.5, 2.0];
        let s = SmoothingSpline::fit(&x, &y, 0.0).unwrap();
        for (&xi, &yi) in x.iter().zip(&y) {
            assert_relative_eq!(s.evaluate(xi, Extrapolation::Nearest), yi, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_cubic_reproduces_sine_between_knots() {
        let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.25).collect();
        let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
        let s = SmoothingSpline::fit(&x, &y, 0.0).unwrap();
        assert_relative_eq!(s.evaluate(2.125, Extrapolation::Nearest), 2.125f64.sin(), epsilon = 1e-3);
    }

    #[test]
    fn test_linear_data_is_unchanged_by_smoothing() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let s = SmoothingSpline::fit(&x, &y, 10.0).unwrap();
        assert_relative_eq!(s.evaluate(2.5, Extrapolation::Nearest), 6.0, epsilon = 1e-10);
        assert_relative_eq!(s.evaluate(7.0, Extrapolation::Linear), 15.0, epsilon = 1e-10);
        assert_relative_eq!(s.evaluate(7.0, Extrapolation::Nearest), 11.0, epsilon = 1e-10);
    }

    #[test]
    fn test_smoothing_pulls_toward_trend() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [0.0, 0.0, 1.0, 0.0, 0.0];
        let rough = SmoothingSpline::fit(&x, &y, 0.0).unwrap();
        let smooth = SmoothingSpline::fit(&x, &y, 5.0).unwrap();
        assert!(smooth.evaluate(2.0, Extrapolation::Nearest) < rough.evaluate(2.0, Extrapolation::Nearest));
    }

    #[test]
    fn test_duplicate_knots_rejected() {
        assert!(SmoothingSpline::fit(&[0.0, 1.0, 1.0, 2.0], &[0.0; 4], 0.0).is_none());
    }

    fn track(n: i64) -> Trajectory {
        (0..n)
            .map(|i| {
                let lat = 48.0 + 1e-4 * i as f64;
                TrajectoryPoint::at(DateTime::from_timestamp(i * 10, 0).unwrap(), lat, 11.0)
            })
            .collect()
    }

    #[test]
    fn test_spline_corrects_flagged_row() {
        let mut points = track(10).into_points();
        points[5].latitude = 49.0;
        let mut t: Trajectory = points.into();
        t.flag(5, DetectionMethod::ZScore, 4.0);

        for corrector in [
            SplineInterpolator::cubic(Extrapolation::Nearest),
            SplineInterpolator::smoothing(0.5, Extrapolation::Nearest),
        ] {
            let c = corrector.corrections(&t).unwrap();
            assert_eq!(c.len(), 1);
            assert_relative_eq!(c[0].latitude, 48.0005, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_spline_preconditions() {
        let untimed: Trajectory = (0..10).map(|i| TrajectoryPoint::new(i as f64, 0.0)).collect();
        let cubic = SplineInterpolator::cubic(Extrapolation::Nearest);
        assert_eq!(cubic.corrections(&untimed), Err(CorrectionError::MissingTimestamps));

        let mut t = track(5);
        t.flag(1, DetectionMethod::ZScore, 4.0);
        t.flag(2, DetectionMethod::ZScore, 4.0);
        assert_eq!(
            cubic.corrections(&t),
            Err(CorrectionError::InsufficientData {
                required: 4,
                available: 3
            })
        );
    }
}
