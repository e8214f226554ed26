//! Per-trajectory anomaly summary.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DetectionMethod, Trajectory};

/// Counts of flagged and corrected rows for one trajectory.
///
/// Downstream quality scoring reads this instead of re-walking the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalySummary {
    /// Number of rows
    pub total: usize,
    /// Rows flagged by any detector
    pub anomalies: usize,
    /// Rows processed by a correction
    pub fixed: usize,
    /// Flagged rows per detection method
    pub by_method: BTreeMap<DetectionMethod, usize>,
    /// Largest anomaly score
    pub max_score: f64,
}

impl AnomalySummary {
    /// Summarise a trajectory.
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let mut summary = Self {
            total: trajectory.len(),
            ..Self::default()
        };

        for point in trajectory {
            if point.is_anomaly {
                summary.anomalies += 1;
                summary.max_score = summary.max_score.max(point.anomaly_score);
                if let Some(method) = point.anomaly_method {
                    *summary.by_method.entry(method).or_insert(0) += 1;
                }
            }
            if point.is_anomaly_fixed {
                summary.fixed += 1;
            }
        }
        summary
    }

    /// Fraction of flagged rows (0.0 for an empty trajectory).
    pub fn anomaly_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.anomalies as f64 / self.total as f64
        }
    }
}

impl fmt::Display for AnomalySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} points, {} anomalies ({:.1}%), {} fixed",
            self.total,
            self.anomalies,
            self.anomaly_ratio() * 100.0,
            self.fixed
        )?;
        for (method, count) in &self.by_method {
            write!(f, ", {}={}", method, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TrajectoryPoint;

    #[test]
    fn test_summary_counts() {
        let mut t: Trajectory = (0..10).map(|i| TrajectoryPoint::new(i as f64, 0.0)).collect();
        t.flag(2, DetectionMethod::Speed, 2.5);
        t.flag(5, DetectionMethod::Speed, 1.5);
        t.flag(7, DetectionMethod::ZScore, 3.2);
        t.set_corrected(2, 2.0, 0.0);

        let s = AnomalySummary::from_trajectory(&t);
        assert_eq!(s.total, 10);
        assert_eq!(s.anomalies, 3);
        assert_eq!(s.fixed, 1);
        assert_eq!(s.by_method[&DetectionMethod::Speed], 2);
        assert_eq!(s.by_method[&DetectionMethod::ZScore], 1);
        assert_eq!(s.max_score, 3.2);
        assert!((s.anomaly_ratio() - 0.3).abs() < 1e-12);

        let text = s.to_string();
        assert!(text.contains("3 anomalies"));
        assert!(text.contains("speed=2"));
    }

    #[test]
    fn test_empty_summary() {
        let s = AnomalySummary::from_trajectory(&Trajectory::default());
        assert_eq!(s.anomaly_ratio(), 0.0);
    }
}
