//! Anomaly detection algorithms.
//!
//! Each algorithm evaluates a *candidate set* of rows (indices into a
//! [`Trajectory`]) and returns the rows it flags together with a
//! non-negative score, the ratio against its threshold. Candidates never
//! include rows that are already flagged, so detectors only ever see the
//! remaining unflagged rows.
//!
//! # Families
//!
//! | Module | Methods | Needs |
//! |--------|---------|-------|
//! | [`statistical`] | `z_score`, `mad` | latitude / longitude |
//! | [`spatial`] | `distance` | latitude / longitude, ≥ 3 points |
//! | [`motion`] | `speed`, `acceleration`, `time_gap` | timestamps |
//! | [`ml`] | `isolation_forest`, `lof` | `ml` feature |
//!
//! # Example
//!
//! ```ignore
//! use marga::detection::{AnomalyDetector, SpeedDetector};
//!
//! let detector = SpeedDetector::new(3.0);
//! let candidates = trajectory.unflagged_indices();
//! for flag in detector.detect(&trajectory, &candidates) {
//!     println!("row {} flagged by {} (score {:.2})", flag.index, detector.method(), flag.score);
//! }
//! ```

pub mod ml;
pub mod motion;
pub mod spatial;
pub mod statistical;

pub use motion::{AccelerationDetector, SpeedDetector, TimeGapDetector};
pub use spatial::{DistanceDetector, PointIndex};
pub use statistical::{MadDetector, ZScoreDetector};

#[cfg(feature = "ml")]
pub use ml::{IsolationForest, LocalOutlierFactor};

use crate::config::{DetectionConfig, MlParams};
use crate::core::types::{DetectionMethod, Trajectory};

/// A row flagged by a detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flag {
    /// Row index in the trajectory
    pub index: usize,
    /// Ratio against the detector threshold (≥ 0)
    pub score: f64,
}

impl Flag {
    /// Create a flag.
    #[inline]
    pub fn new(index: usize, score: f64) -> Self {
        Self { index, score }
    }
}

/// Trait for anomaly detection algorithms.
///
/// Implementations are pure functions of the trajectory and their own
/// thresholds; they never write to the trajectory.
pub trait AnomalyDetector: Send + Sync {
    /// Evaluate `candidates` and return the flagged rows.
    fn detect(&self, trajectory: &Trajectory, candidates: &[usize]) -> Vec<Flag>;

    /// The method this detector implements.
    fn method(&self) -> DetectionMethod;
}

/// Build the detector for `method` from configuration.
///
/// Returns `None` for ML methods when the `ml` feature is not compiled in.
pub fn detector_for(
    method: DetectionMethod,
    config: &DetectionConfig,
    ml_params: &MlParams,
) -> Option<Box<dyn AnomalyDetector>> {
    let detector: Box<dyn AnomalyDetector> = match method {
        DetectionMethod::ZScore => Box::new(ZScoreDetector::new(config.z_score_threshold)),
        DetectionMethod::Mad => Box::new(MadDetector::new(config.mad_threshold)),
        DetectionMethod::Distance => Box::new(DistanceDetector::new(config.distance_threshold)),
        DetectionMethod::Speed => Box::new(SpeedDetector::new(config.speed_multiplier)),
        DetectionMethod::Acceleration => {
            Box::new(AccelerationDetector::new(config.acceleration_threshold))
        }
        DetectionMethod::TimeGap => Box::new(TimeGapDetector::new(config.time_gap_threshold)),
        DetectionMethod::IsolationForest | DetectionMethod::LocalOutlierFactor => {
            return ml_detector(method, config, ml_params);
        }
    };
    Some(detector)
}

#[cfg(feature = "ml")]
fn ml_detector(
    method: DetectionMethod,
    config: &DetectionConfig,
    ml_params: &MlParams,
) -> Option<Box<dyn AnomalyDetector>> {
    match method {
        DetectionMethod::IsolationForest => Some(Box::new(IsolationForest::new(
            config.contamination,
            config.isolation_threshold,
            ml_params.clone(),
        ))),
        DetectionMethod::LocalOutlierFactor => Some(Box::new(LocalOutlierFactor::new(
            config.contamination,
            config.lof_threshold,
            ml_params.n_neighbors,
        ))),
        _ => None,
    }
}

#[cfg(not(feature = "ml"))]
fn ml_detector(
    _method: DetectionMethod,
    _config: &DetectionConfig,
    _ml_params: &MlParams,
) -> Option<Box<dyn AnomalyDetector>> {
    None
}

/// Threshold floored at the statistics epsilon so scores stay finite.
#[inline]
pub(crate) fn safe_threshold(threshold: f64) -> f64 {
    threshold.max(crate::core::stats::EPSILON)
}
