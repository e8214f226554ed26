//! Closed sets of detection methods, correction methods and detector tiers.
//!
//! Each enum has a stable snake_case wire name shared by serde, the CLI
//! (`clap::ValueEnum`) and [`std::str::FromStr`].

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Anomaly detection methods.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Combined z-score of latitude and longitude.
    ZScore,
    /// Combined modified z-score using median / MAD.
    Mad,
    /// Geodesic distance to the nearest other point.
    Distance,
    /// Isolation-forest outlier score on kinematic features.
    IsolationForest,
    /// Local outlier factor on kinematic features.
    #[serde(rename = "lof")]
    #[value(name = "lof")]
    LocalOutlierFactor,
    /// Implied speed between consecutive samples.
    Speed,
    /// Change of implied speed between consecutive samples.
    Acceleration,
    /// Unusually long gap since the previous sample.
    TimeGap,
}

impl DetectionMethod {
    /// All methods, in declaration order.
    pub const ALL: [DetectionMethod; 8] = [
        DetectionMethod::ZScore,
        DetectionMethod::Mad,
        DetectionMethod::Distance,
        DetectionMethod::IsolationForest,
        DetectionMethod::LocalOutlierFactor,
        DetectionMethod::Speed,
        DetectionMethod::Acceleration,
        DetectionMethod::TimeGap,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::ZScore => "z_score",
            DetectionMethod::Mad => "mad",
            DetectionMethod::Distance => "distance",
            DetectionMethod::IsolationForest => "isolation_forest",
            DetectionMethod::LocalOutlierFactor => "lof",
            DetectionMethod::Speed => "speed",
            DetectionMethod::Acceleration => "acceleration",
            DetectionMethod::TimeGap => "time_gap",
        }
    }

    /// Whether the method needs a timestamp on every row.
    pub fn requires_timestamps(&self) -> bool {
        matches!(
            self,
            DetectionMethod::Speed | DetectionMethod::Acceleration | DetectionMethod::TimeGap
        )
    }

    /// Whether the method is backed by the optional ML backend.
    pub fn is_machine_learning(&self) -> bool {
        matches!(
            self,
            DetectionMethod::IsolationForest | DetectionMethod::LocalOutlierFactor
        )
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetectionMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::UnknownDetectionMethod(s.to_string()))
    }
}

/// Correction (interpolation / filtering) methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum CorrectionMethod {
    /// Linear interpolation over time (or neighbour average without timestamps).
    #[default]
    Linear,
    /// Smoothing spline over time.
    Spline,
    /// Interpolating natural cubic spline over time.
    Cubic,
    /// Copy the spatially nearest reference point.
    Nearest,
    /// Mean of reference points in an index window.
    MovingAverage,
    /// Savitzky-Golay polynomial filter.
    Savgol,
    /// Constant-velocity Kalman filter.
    Kalman,
    /// Locally-weighted scatterplot smoothing.
    Lowess,
}

impl CorrectionMethod {
    /// All methods, in declaration order.
    pub const ALL: [CorrectionMethod; 8] = [
        CorrectionMethod::Linear,
        CorrectionMethod::Spline,
        CorrectionMethod::Cubic,
        CorrectionMethod::Nearest,
        CorrectionMethod::MovingAverage,
        CorrectionMethod::Savgol,
        CorrectionMethod::Kalman,
        CorrectionMethod::Lowess,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionMethod::Linear => "linear",
            CorrectionMethod::Spline => "spline",
            CorrectionMethod::Cubic => "cubic",
            CorrectionMethod::Nearest => "nearest",
            CorrectionMethod::MovingAverage => "moving_average",
            CorrectionMethod::Savgol => "savgol",
            CorrectionMethod::Kalman => "kalman",
            CorrectionMethod::Lowess => "lowess",
        }
    }

    /// Optional backend the method depends on.
    pub fn backend(&self) -> Option<Backend> {
        match self {
            CorrectionMethod::Kalman => Some(Backend::Kalman),
            CorrectionMethod::Lowess => Some(Backend::Lowess),
            _ => None,
        }
    }
}

impl fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectionMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CorrectionMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::UnknownCorrectionMethod(s.to_string()))
    }
}

/// Capability tier of a detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum DetectorKind {
    /// Statistical, spatial and ML detectors; six correction filters.
    Standard,
    /// Standard plus speed / acceleration / time-gap detectors.
    Gps,
    /// GPS plus Kalman and LOWESS correction and tunable ML hyperparameters.
    Advanced,
}

impl DetectorKind {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::Standard => "standard",
            DetectorKind::Gps => "gps",
            DetectorKind::Advanced => "advanced",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(DetectorKind::Standard),
            "gps" => Ok(DetectorKind::Gps),
            "advanced" => Ok(DetectorKind::Advanced),
            other => Err(Error::UnknownDetector(other.to_string())),
        }
    }
}

/// Optional numerical backends, each behind a cargo feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Kalman filter matrices (`kalman` feature).
    Kalman,
    /// Locally-weighted regression (`lowess` feature).
    Lowess,
    /// Isolation forest / LOF (`ml` feature).
    MachineLearning,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Kalman => write!(f, "kalman"),
            Backend::Lowess => write!(f, "lowess"),
            Backend::MachineLearning => write!(f, "ml"),
        }
    }
}

/// How interpolators evaluate outside the range of their reference points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Extrapolation {
    /// Hold the closest end value.
    #[default]
    Nearest,
    /// Extend the end segment linearly.
    Linear,
}
