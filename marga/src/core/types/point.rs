//! A single trajectory sample and its anomaly annotations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DetectionMethod;
use crate::core::geo::to_epoch_seconds;

/// One row of a trajectory.
///
/// The first five fields are raw input. The annotation fields are written by
/// detection (`is_anomaly`, `anomaly_method`, `anomaly_score`) and correction
/// (`is_anomaly_fixed`, plus overwritten coordinates) and default to "clean".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Sample time (required by time-based methods)
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Reported ground speed (m/s), if the source provides it
    #[serde(default)]
    pub speed: Option<f64>,
    /// Reported course over ground (degrees), if the source provides it
    #[serde(default)]
    pub course: Option<f64>,

    /// Flagged by a detector
    #[serde(default)]
    pub is_anomaly: bool,
    /// First detector that flagged this row
    #[serde(default)]
    pub anomaly_method: Option<DetectionMethod>,
    /// Ratio against the detector threshold; never negative
    #[serde(default)]
    pub anomaly_score: f64,
    /// Processed by a correction filter
    #[serde(default)]
    pub is_anomaly_fixed: bool,
}

impl TrajectoryPoint {
    /// Create an untimed point.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp: None,
            latitude,
            longitude,
            speed: None,
            course: None,
            is_anomaly: false,
            anomaly_method: None,
            anomaly_score: 0.0,
            is_anomaly_fixed: false,
        }
    }

    /// Create a timestamped point.
    #[inline]
    pub fn at(timestamp: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..Self::new(latitude, longitude)
        }
    }

    /// Attach a reported speed.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Attach a reported course.
    pub fn with_course(mut self, course: f64) -> Self {
        self.course = Some(course);
        self
    }

    /// Timestamp as epoch seconds.
    #[inline]
    pub fn epoch_seconds(&self) -> Option<f64> {
        self.timestamp.as_ref().map(to_epoch_seconds)
    }

    /// Whether both coordinates are finite numbers.
    #[inline]
    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_point_is_clean() {
        let p = TrajectoryPoint::new(1.0, 2.0);
        assert!(!p.is_anomaly);
        assert!(!p.is_anomaly_fixed);
        assert_eq!(p.anomaly_method, None);
        assert_eq!(p.anomaly_score, 0.0);
        assert_eq!(p.epoch_seconds(), None);
    }

    #[test]
    fn test_deserialize_raw_row() {
        let json = r#"{"timestamp":"2024-05-01T12:00:00Z","latitude":48.1,"longitude":11.5,"speed":4.2}"#;
        let p: TrajectoryPoint = serde_json::from_str(json).unwrap();
        assert_eq!(p.latitude, 48.1);
        assert_eq!(p.speed, Some(4.2));
        assert_eq!(p.course, None);
        assert!(!p.is_anomaly);
        assert_eq!(p.epoch_seconds(), Some(1_714_564_800.0));
    }

    #[test]
    fn test_annotations_serialize() {
        let mut p = TrajectoryPoint::new(0.0, 0.0);
        p.is_anomaly = true;
        p.anomaly_method = Some(DetectionMethod::Speed);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"anomaly_method\":\"speed\""));
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(!TrajectoryPoint::new(f64::NAN, 0.0).has_valid_coordinates());
        assert!(TrajectoryPoint::new(0.0, 0.0).with_course(90.0).has_valid_coordinates());
    }
}
