//! Marga - anomaly detection and correction for noisy GPS trajectories
//!
//! # Architecture
//!
//! The crate is organized into 4 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   detector/                         │  ← Tiers & factory
//! │          (standard, gps, advanced, dynamic)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │            detection/         correction/           │  ← Algorithms
//! │   (statistical, spatial,   (linear, spline, savgol, │
//! │      motion, ml)            kalman, lowess, ...)    │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    config/                          │  ← Configuration
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │           (types, geo, stats, math)                 │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Pipeline
//!
//! 1. `detect` flags implausible rows (`is_anomaly`, `anomaly_method`,
//!    `anomaly_score`) running each method over the rows still unflagged.
//! 2. `fix` replaces flagged rows' coordinates with estimates from the
//!    unflagged rows and sets `is_anomaly_fixed`.
//! 3. `process` runs both, skipping `fix` when nothing was flagged.
//!
//! Recoverable problems (unsupported method, missing backend, failing
//! filter) never abort a call; they come back as [`Warning`]s next to the
//! complete table.
//!
//! # Features
//!
//! - `kalman`: constant-velocity Kalman correction (nalgebra)
//! - `lowess`: locally-weighted regression correction
//! - `ml`: isolation forest and local outlier factor detection (rand)

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;
pub mod error;

// ============================================================================
// Layer 2: Configuration (depends on core)
// ============================================================================
pub mod config;

// ============================================================================
// Layer 3: Algorithms (depends on core, config)
// ============================================================================
pub mod correction;
pub mod detection;

// ============================================================================
// Layer 4: Detector tiers (depends on all layers)
// ============================================================================
pub mod detector;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use core::geo::haversine;
pub use core::types::{AnomalySummary, Trajectory, TrajectoryPoint, Warning};
pub use core::types::{Backend, CorrectionMethod, DetectionMethod, DetectorKind, Extrapolation};

// Errors
pub use error::{Error, Result};

// Configuration
pub use config::{
    AdvancedConfig, AdvancedParams, Backends, DetectionConfig, DetectionParams, DetectorConfig,
    InterpolationConfig, InterpolationParams,
};

// Detectors
pub use detector::{AdvancedDetector, Detector, DynDetector, GpsDetector, Outcome, StandardDetector};
pub use detector::{create_detector, create_detector_named};
