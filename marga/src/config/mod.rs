//! Configuration for Marga detectors.
//!
//! All thresholds and filter parameters live in typed structs with
//! documented defaults, loadable from a single TOML file.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marga::config::{DetectorConfig, DetectionParams};
//!
//! // Load from default path (configs/marga.toml), or built-in defaults
//! let mut config = DetectorConfig::load_default()?;
//!
//! // Partial update: only the set fields change
//! config.merge(
//!     Some(&DetectionParams { speed_multiplier: Some(2.0), ..Default::default() }),
//!     None,
//!     None,
//! );
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`DetectionConfig`] | Detector thresholds and ML contamination |
//! | [`InterpolationConfig`] | Default correction, window, smoothing, extrapolation |
//! | [`AdvancedConfig`] | Kalman noise, LOWESS span, ML hyperparameters |
//!
//! ## Example TOML
//!
//! ```toml
//! [detection]
//! z_score_threshold = 3.0
//! speed_multiplier = 3.0        # mean + 3σ of positive speeds
//! time_gap_threshold = 30.0     # seconds
//!
//! [interpolation]
//! default_method = "linear"
//! window_size = 5
//!
//! [advanced.kalman]
//! process_noise = 1e-9          # degrees²
//! measurement_noise = 1e-8
//! ```

mod advanced;
mod backends;
mod defaults;
mod detection;
mod interpolation;
mod marga;

pub use advanced::{AdvancedConfig, AdvancedParams, KalmanConfig, LowessConfig, MlParams};
pub use backends::Backends;
pub use detection::{DetectionConfig, DetectionParams};
pub use interpolation::{InterpolationConfig, InterpolationParams};
pub use marga::{DEFAULT_CONFIG_PATH, DetectorConfig};
