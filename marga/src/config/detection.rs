//! Detection threshold configuration.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Thresholds used by the detectors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Combined z-score above which a point is flagged
    #[serde(default = "defaults::z_score_threshold")]
    pub z_score_threshold: f64,

    /// Combined modified z-score (median / MAD) above which a point is flagged
    #[serde(default = "defaults::mad_threshold")]
    pub mad_threshold: f64,

    /// Speed threshold = mean + `speed_multiplier` × std of positive speeds
    #[serde(default = "defaults::speed_multiplier")]
    pub speed_multiplier: f64,

    /// Absolute acceleration threshold (m/s²)
    #[serde(default = "defaults::acceleration_threshold")]
    pub acceleration_threshold: f64,

    /// Nearest-neighbour distance threshold (m)
    #[serde(default = "defaults::distance_threshold")]
    pub distance_threshold: f64,

    /// Minimum time gap (s); the effective threshold is max(this, 3 × median gap)
    #[serde(default = "defaults::time_gap_threshold")]
    pub time_gap_threshold: f64,

    /// Assumed outlier fraction for the ML detectors
    #[serde(default = "defaults::contamination")]
    pub contamination: f64,

    /// Minimum isolation-forest score (0.5 ≈ normal, → 1.0 anomalous)
    #[serde(default = "defaults::isolation_threshold")]
    pub isolation_threshold: f64,

    /// Minimum local outlier factor (≈ 1.0 for inliers)
    #[serde(default = "defaults::lof_threshold")]
    pub lof_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            z_score_threshold: defaults::z_score_threshold(),
            mad_threshold: defaults::mad_threshold(),
            speed_multiplier: defaults::speed_multiplier(),
            acceleration_threshold: defaults::acceleration_threshold(),
            distance_threshold: defaults::distance_threshold(),
            time_gap_threshold: defaults::time_gap_threshold(),
            contamination: defaults::contamination(),
            isolation_threshold: defaults::isolation_threshold(),
            lof_threshold: defaults::lof_threshold(),
        }
    }
}

/// Partial update for [`DetectionConfig`]; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    pub z_score_threshold: Option<f64>,
    pub mad_threshold: Option<f64>,
    pub speed_multiplier: Option<f64>,
    pub acceleration_threshold: Option<f64>,
    pub distance_threshold: Option<f64>,
    pub time_gap_threshold: Option<f64>,
    pub contamination: Option<f64>,
    pub isolation_threshold: Option<f64>,
    pub lof_threshold: Option<f64>,
}

impl DetectionConfig {
    /// Overwrite every field that is set in `params`.
    pub fn merge(&mut self, params: &DetectionParams) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(v) = params.$field { self.$field = v; })*
            };
        }
        take!(
            z_score_threshold,
            mad_threshold,
            speed_multiplier,
            acceleration_threshold,
            distance_threshold,
            time_gap_threshold,
            contamination,
            isolation_threshold,
            lof_threshold
        );
    }
}
