//! Correction filters for flagged trajectory rows.
//!
//! A filter reads an annotated [`Trajectory`] and proposes new coordinates
//! for flagged rows. *Reference rows* are the unflagged ones. Filters never
//! write to the trajectory themselves; [`apply_corrections`] does, so a
//! failing filter leaves nothing half-applied and the caller can fall back
//! to [`LinearInterpolator`].
//!
//! # Filters
//!
//! | Filter | Method | Needs |
//! |--------|--------|-------|
//! | [`LinearInterpolator`] | `linear` | ≥ 1 reference row |
//! | [`SplineInterpolator`] | `spline`, `cubic` | timestamps, ≥ 4 reference rows |
//! | [`NearestNeighbor`] | `nearest` | ≥ 1 reference row |
//! | [`MovingAverage`] | `moving_average` | ≥ 1 reference row |
//! | [`SavitzkyGolay`] | `savgol` | window length ≥ 3 |
//! | [`KalmanFilter`] | `kalman` | `kalman` feature |
//! | [`Lowess`] | `lowess` | `lowess` feature |

mod linear;
mod moving_average;
mod nearest;
mod savgol;
mod spline;

#[cfg(feature = "kalman")]
mod kalman;
#[cfg(feature = "lowess")]
mod lowess;

pub use linear::LinearInterpolator;
pub use moving_average::MovingAverage;
pub use nearest::NearestNeighbor;
pub use savgol::SavitzkyGolay;
pub use spline::{SmoothingSpline, SplineInterpolator};

#[cfg(feature = "kalman")]
pub use kalman::KalmanFilter;
#[cfg(feature = "lowess")]
pub use self::lowess::Lowess;

use crate::config::{AdvancedConfig, InterpolationConfig};
use crate::core::types::{Backend, CorrectionMethod, Trajectory};

/// Why a filter could not produce corrections.
///
/// Never escapes the fix pipeline; it becomes a warning plus a fallback.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CorrectionError {
    /// Optional backend not compiled in or disabled
    #[error("backend '{0}' unavailable")]
    BackendUnavailable(Backend),

    /// Time-based filter on a trajectory without a timestamp column
    #[error("timestamps required")]
    MissingTimestamps,

    /// Too few rows for the filter
    #[error("insufficient data: need {required}, have {available}")]
    InsufficientData { required: usize, available: usize },

    /// No unflagged rows to interpolate from
    #[error("no reference points")]
    NoReferencePoints,

    /// Numerical failure (singular system, duplicate knots)
    #[error("numerical failure: {0}")]
    Numerical(String),
}

/// Result type for correction filters
pub type CorrectionResult<T> = std::result::Result<T, CorrectionError>;

/// New coordinates for one flagged row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    /// Row index in the trajectory
    pub index: usize,
    pub latitude: f64,
    pub longitude: f64,
}

impl Correction {
    #[inline]
    pub fn new(index: usize, latitude: f64, longitude: f64) -> Self {
        Self {
            index,
            latitude,
            longitude,
        }
    }
}

/// Trait for correction filters.
///
/// Returns one [`Correction`] per flagged row the filter processed. Rows it
/// could not process are simply absent.
pub trait Corrector: Send + Sync {
    /// Compute corrections for the flagged rows of `trajectory`.
    fn corrections(&self, trajectory: &Trajectory) -> CorrectionResult<Vec<Correction>>;

    /// The method this filter implements.
    fn method(&self) -> CorrectionMethod;
}

/// Build the filter for `method`.
///
/// Returns `None` when the method's backend is not compiled in.
pub fn corrector_for(
    method: CorrectionMethod,
    interpolation: &InterpolationConfig,
    advanced: &AdvancedConfig,
) -> Option<Box<dyn Corrector>> {
    let extrapolation = interpolation.extrapolation;
    let corrector: Box<dyn Corrector> = match method {
        CorrectionMethod::Linear => Box::new(LinearInterpolator::new(extrapolation)),
        CorrectionMethod::Spline => Box::new(SplineInterpolator::smoothing(
            interpolation.smooth_factor,
            extrapolation,
        )),
        CorrectionMethod::Cubic => Box::new(SplineInterpolator::cubic(extrapolation)),
        CorrectionMethod::Nearest => Box::new(NearestNeighbor),
        CorrectionMethod::MovingAverage => Box::new(MovingAverage::new(interpolation.window_size)),
        CorrectionMethod::Savgol => Box::new(SavitzkyGolay::new(interpolation.window_size)),
        CorrectionMethod::Kalman => return kalman_corrector(advanced),
        CorrectionMethod::Lowess => return lowess_corrector(advanced),
    };
    Some(corrector)
}

#[cfg(feature = "kalman")]
fn kalman_corrector(advanced: &AdvancedConfig) -> Option<Box<dyn Corrector>> {
    Some(Box::new(KalmanFilter::new(advanced.kalman.clone())))
}

#[cfg(not(feature = "kalman"))]
fn kalman_corrector(_advanced: &AdvancedConfig) -> Option<Box<dyn Corrector>> {
    None
}

#[cfg(feature = "lowess")]
fn lowess_corrector(advanced: &AdvancedConfig) -> Option<Box<dyn Corrector>> {
    Some(Box::new(Lowess::new(advanced.lowess.clone())))
}

#[cfg(not(feature = "lowess"))]
fn lowess_corrector(_advanced: &AdvancedConfig) -> Option<Box<dyn Corrector>> {
    None
}

/// Write corrections into `trajectory`, marking each row processed.
///
/// Returns the number of rows written.
pub fn apply_corrections(trajectory: &mut Trajectory, corrections: &[Correction]) -> usize {
    for c in corrections {
        trajectory.set_corrected(c.index, c.latitude, c.longitude);
    }
    corrections.len()
}

/// All rows in processing order with a numeric axis: epoch seconds when the
/// timestamp column is usable, sorted position otherwise.
pub(crate) struct OrderedSeries {
    /// Row indices in processing order
    pub order: Vec<usize>,
    /// Axis value per entry of `order`
    pub x: Vec<f64>,
    /// Whether `x` is time
    pub timed: bool,
}

impl OrderedSeries {
    pub fn new(trajectory: &Trajectory) -> Self {
        let order = trajectory.processing_order();
        let points = trajectory.points();
        let timed = trajectory.has_timestamps();
        let x = if timed {
            order.iter().filter_map(|&i| points[i].epoch_seconds()).collect()
        } else {
            (0..order.len()).map(|p| p as f64).collect()
        };
        Self { order, x, timed }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Latitude and longitude columns in processing order.
    pub fn columns(&self, trajectory: &Trajectory) -> (Vec<f64>, Vec<f64>) {
        let points = trajectory.points();
        self.order
            .iter()
            .map(|&i| (points[i].latitude, points[i].longitude))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DetectionMethod, TrajectoryPoint};

    #[test]
    fn test_corrector_for_reports_method() {
        let interp = InterpolationConfig::default();
        let adv = AdvancedConfig::default();
        for method in CorrectionMethod::ALL {
            match corrector_for(method, &interp, &adv) {
                Some(c) => assert_eq!(c.method(), method),
                None => assert!(matches!(
                    method,
                    CorrectionMethod::Kalman | CorrectionMethod::Lowess
                )),
            }
        }
    }

    #[test]
    fn test_apply_marks_fixed() {
        let mut t: Trajectory = (0..3).map(|i| TrajectoryPoint::new(i as f64, 0.0)).collect();
        t.flag(1, DetectionMethod::ZScore, 5.0);
        let n = apply_corrections(&mut t, &[Correction::new(1, 1.0, 0.0)]);
        assert_eq!(n, 1);
        assert!(t.points()[1].is_anomaly_fixed);
        assert!(!t.points()[0].is_anomaly_fixed);
    }

    #[test]
    fn test_error_messages() {
        let e = CorrectionError::InsufficientData {
            required: 4,
            available: 2,
        };
        assert_eq!(e.to_string(), "insufficient data: need 4, have 2");
    }
}
