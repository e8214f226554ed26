//! Non-fatal conditions reported alongside cleaning results.

use std::fmt;

use serde::Serialize;

use super::{Backend, CorrectionMethod, DetectionMethod, DetectorKind};

/// A recoverable problem encountered while detecting or correcting.
///
/// Warnings never abort a call; the returned trajectory is always complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Detection method not offered by this detector tier; skipped.
    UnsupportedDetection {
        method: DetectionMethod,
        detector: DetectorKind,
    },
    /// Correction method not offered by this detector tier; `linear` used.
    UnsupportedCorrection {
        method: CorrectionMethod,
        detector: DetectorKind,
    },
    /// Optional backend not available. Detection skips the method;
    /// correction falls back to `linear`.
    BackendUnavailable {
        backend: Backend,
        fallback: Option<CorrectionMethod>,
    },
    /// Correction preconditions unmet; `linear` used instead.
    CorrectionFallback {
        method: CorrectionMethod,
        reason: String,
    },
    /// No unflagged reference rows; the trajectory is returned unchanged.
    NoReferencePoints { method: CorrectionMethod },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnsupportedDetection { method, detector } => write!(
                f,
                "Detection method '{}' is not supported by the {} detector; skipped",
                method, detector
            ),
            Warning::UnsupportedCorrection { method, detector } => write!(
                f,
                "Correction method '{}' is not supported by the {} detector; using linear",
                method, detector
            ),
            Warning::BackendUnavailable { backend, fallback } => match fallback {
                Some(m) => write!(f, "Backend '{}' unavailable; using {}", backend, m),
                None => write!(f, "Backend '{}' unavailable; method skipped", backend),
            },
            Warning::CorrectionFallback { method, reason } => {
                write!(f, "Correction '{}' failed ({}); using linear", method, reason)
            }
            Warning::NoReferencePoints { method } => write!(
                f,
                "Correction '{}' found no reference points; trajectory unchanged",
                method
            ),
        }
    }
}
