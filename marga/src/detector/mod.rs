//! Detector tiers: the public cleaning surface.
//!
//! A [`Detector`] owns a [`DetectorConfig`] and an effective [`Backends`]
//! set, and runs the detection and correction algorithms over a
//! [`Trajectory`]. The tiers compose by delegation:
//!
//! | Tier | Adds | Default methods |
//! |------|------|-----------------|
//! | [`StandardDetector`] | `z_score`, `mad`, `distance`, ML; six correction filters | `z_score`, `distance` |
//! | [`GpsDetector`] | `speed`, `acceleration`, `time_gap` | `z_score`, `speed`, `acceleration`, `distance` |
//! | [`AdvancedDetector`] | `kalman`, `lowess` correction; tunable ML | as GPS |
//!
//! [`DynDetector`] selects a tier at runtime.
//!
//! # Example
//!
//! ```ignore
//! use marga::{create_detector, Detector, DetectorConfig, DetectorKind};
//!
//! let detector = create_detector(DetectorKind::Gps, DetectorConfig::default());
//! let outcome = detector.process(&trajectory, None, None)?;
//! for warning in &outcome.warnings {
//!     eprintln!("{}", warning);
//! }
//! ```

mod advanced;
mod dynamic;
mod gps;
mod standard;

pub use advanced::AdvancedDetector;
pub use dynamic::{DynDetector, create_detector, create_detector_named};
pub use gps::GpsDetector;
pub use standard::StandardDetector;

use log::{debug, info, warn};

use crate::config::{
    AdvancedParams, Backends, DetectionParams, DetectorConfig, InterpolationParams, MlParams,
};
use crate::correction::{
    Correction, CorrectionError, CorrectionResult, apply_corrections, corrector_for,
};
use crate::core::types::{
    Backend, CorrectionMethod, DetectionMethod, DetectorKind, Trajectory, Warning,
};
use crate::detection::detector_for;
use crate::error::{Error, Result};

/// Result of a cleaning call: the full annotated table plus every
/// recoverable condition met on the way.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub trajectory: Trajectory,
    pub warnings: Vec<Warning>,
}

impl Outcome {
    fn new(trajectory: Trajectory) -> Self {
        Self {
            trajectory,
            warnings: Vec::new(),
        }
    }

    /// Log and record a warning.
    fn warn(&mut self, warning: Warning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// A trajectory cleaner at a given capability tier.
///
/// Implementors provide configuration access and the capability table;
/// `detect`, `fix` and `process` are shared.
pub trait Detector {
    /// Capability tier.
    fn kind(&self) -> DetectorKind;

    /// Current configuration.
    fn config(&self) -> &DetectorConfig;

    /// Mutable configuration.
    fn config_mut(&mut self) -> &mut DetectorConfig;

    /// Effective backend set.
    fn backends(&self) -> Backends;

    /// Mutable backend set.
    fn backends_mut(&mut self) -> &mut Backends;

    /// Methods run when `detect` is called without an explicit list.
    fn default_detection_methods(&self) -> &'static [DetectionMethod];

    /// Whether this tier offers `method`.
    fn supports_detection(&self, method: DetectionMethod) -> bool;

    /// Whether this tier offers `method`.
    fn supports_correction(&self, method: CorrectionMethod) -> bool;

    /// Hyperparameters for the ML detectors.
    fn ml_params(&self) -> MlParams;

    /// Shallow-merge partial parameter updates. Chainable.
    fn configure(
        &mut self,
        detection: Option<&DetectionParams>,
        interpolation: Option<&InterpolationParams>,
        advanced: Option<&AdvancedParams>,
    ) -> &mut Self
    where
        Self: Sized,
    {
        if advanced.is_some() && self.kind() != DetectorKind::Advanced {
            debug!(
                "{} detector stores advanced parameters but does not use them",
                self.kind()
            );
        }
        self.config_mut().merge(detection, interpolation, advanced);
        self
    }

    /// Restrict the optional backends this detector may use.
    ///
    /// Never enables a backend that is not compiled in.
    fn with_backends(mut self, backends: Backends) -> Self
    where
        Self: Sized,
    {
        let effective = self.backends().restrict(backends);
        *self.backends_mut() = effective;
        self
    }

    /// Flag anomalous rows.
    ///
    /// Methods run in the given order (or [`default_detection_methods`]),
    /// each over the rows still unflagged. Rows flagged in the input keep
    /// their annotation. Fails only on invalid coordinates or when a
    /// time-based method is requested without a timestamp on every row.
    ///
    /// [`default_detection_methods`]: Detector::default_detection_methods
    fn detect(
        &self,
        trajectory: &Trajectory,
        methods: Option<&[DetectionMethod]>,
    ) -> Result<Outcome> {
        trajectory.validate_coordinates()?;
        let methods = methods.unwrap_or(self.default_detection_methods());

        if !trajectory.has_timestamps()
            && let Some(&method) = methods
                .iter()
                .find(|m| m.requires_timestamps() && self.supports_detection(**m))
        {
            return Err(Error::MissingColumn {
                column: "timestamp",
                method,
            });
        }

        let mut outcome = Outcome::new(trajectory.clone());
        let backends = self.backends();
        let ml_params = self.ml_params();
        let before = trajectory.anomaly_count();

        for &method in methods {
            if !self.supports_detection(method) {
                outcome.warn(Warning::UnsupportedDetection {
                    method,
                    detector: self.kind(),
                });
                continue;
            }
            let backend_ok = !method.is_machine_learning() || backends.ml;
            let detector = if backend_ok {
                detector_for(method, &self.config().detection, &ml_params)
            } else {
                None
            };
            let Some(detector) = detector else {
                outcome.warn(Warning::BackendUnavailable {
                    backend: Backend::MachineLearning,
                    fallback: None,
                });
                continue;
            };

            let candidates = outcome.trajectory.unflagged_indices();
            let flags = detector.detect(&outcome.trajectory, &candidates);
            let flagged = flags
                .iter()
                .filter(|f| outcome.trajectory.flag(f.index, method, f.score))
                .count();
            debug!(
                "{}: {} of {} candidates flagged",
                method,
                flagged,
                candidates.len()
            );
        }

        info!(
            "{} detector: {} new anomalies in {} points",
            self.kind(),
            outcome.trajectory.anomaly_count() - before,
            trajectory.len()
        );
        Ok(outcome)
    }

    /// Replace flagged rows with estimates.
    ///
    /// Uses `method` (or the configured default). Unsupported methods,
    /// unavailable backends and failing filters fall back to `linear` with a
    /// warning. Without any reference row the table is returned unchanged.
    fn fix(&self, trajectory: &Trajectory, method: Option<CorrectionMethod>) -> Outcome {
        let mut outcome = Outcome::new(trajectory.clone());
        if trajectory.anomaly_count() == 0 {
            return outcome;
        }

        let requested = method.unwrap_or(self.config().interpolation.default_method);
        let mut method = resolve_correction(self, requested, &mut outcome);
        let mut attempt = run_correction(self.config(), method, trajectory);

        if let Err(e) = &attempt
            && method != CorrectionMethod::Linear
            && *e != CorrectionError::NoReferencePoints
        {
            outcome.warn(Warning::CorrectionFallback {
                method,
                reason: e.to_string(),
            });
            method = CorrectionMethod::Linear;
            attempt = run_correction(self.config(), method, trajectory);
        }

        match attempt {
            Ok(corrections) => {
                let written = apply_corrections(&mut outcome.trajectory, &corrections);
                info!(
                    "{} detector: {} of {} anomalies corrected ({})",
                    self.kind(),
                    written,
                    trajectory.anomaly_count(),
                    method
                );
            }
            // Linear only fails without reference rows
            Err(_) => outcome.warn(Warning::NoReferencePoints { method }),
        }
        outcome
    }

    /// `detect`, then `fix` when the table holds any anomaly.
    fn process(
        &self,
        trajectory: &Trajectory,
        methods: Option<&[DetectionMethod]>,
        correction: Option<CorrectionMethod>,
    ) -> Result<Outcome> {
        let detected = self.detect(trajectory, methods)?;
        if detected.trajectory.anomaly_count() == 0 {
            return Ok(detected);
        }

        let fixed = self.fix(&detected.trajectory, correction);
        let mut warnings = detected.warnings;
        warnings.extend(fixed.warnings);
        Ok(Outcome {
            trajectory: fixed.trajectory,
            warnings,
        })
    }
}

/// Map a requested correction to one `detector` can run now.
fn resolve_correction<D: Detector + ?Sized>(
    detector: &D,
    method: CorrectionMethod,
    outcome: &mut Outcome,
) -> CorrectionMethod {
    if !detector.supports_correction(method) {
        outcome.warn(Warning::UnsupportedCorrection {
            method,
            detector: detector.kind(),
        });
        return CorrectionMethod::Linear;
    }
    match method.backend() {
        Some(backend) if !detector.backends().is_available(backend) => {
            outcome.warn(Warning::BackendUnavailable {
                backend,
                fallback: Some(CorrectionMethod::Linear),
            });
            CorrectionMethod::Linear
        }
        _ => method,
    }
}

/// Run one correction filter without writing.
fn run_correction(
    config: &DetectorConfig,
    method: CorrectionMethod,
    trajectory: &Trajectory,
) -> CorrectionResult<Vec<Correction>> {
    match corrector_for(method, &config.interpolation, &config.advanced) {
        Some(corrector) => corrector.corrections(trajectory),
        None => Err(CorrectionError::BackendUnavailable(
            method.backend().unwrap_or(Backend::Kalman),
        )),
    }
}
