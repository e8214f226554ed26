//! Core data types.
//!
//! - [`TrajectoryPoint`]: one timestamped lat/lon sample plus its annotations
//! - [`Trajectory`]: the table of samples; row index is identity
//! - [`DetectionMethod`], [`CorrectionMethod`], [`DetectorKind`]: closed method sets
//! - [`AnomalySummary`]: per-trajectory counts for downstream scoring
//! - [`Warning`]: recoverable conditions reported next to results

mod method;
mod point;
mod summary;
mod trajectory;
mod warning;

pub use method::{Backend, CorrectionMethod, DetectionMethod, DetectorKind, Extrapolation};
pub use point::TrajectoryPoint;
pub use summary::AnomalySummary;
pub use trajectory::Trajectory;
pub use warning::Warning;
