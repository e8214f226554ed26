//! GPS tier: adds kinematic checks on top of the standard tier.

use super::{Detector, StandardDetector};
use crate::config::{Backends, DetectorConfig, MlParams};
use crate::core::types::{CorrectionMethod, DetectionMethod, DetectorKind};

/// Standard cleaning plus `speed`, `acceleration` and `time_gap`.
///
/// Delegates everything except the detection capability table to the
/// wrapped [`StandardDetector`].
#[derive(Debug, Clone, Default)]
pub struct GpsDetector {
    inner: StandardDetector,
}

impl GpsDetector {
    const DEFAULT_METHODS: &'static [DetectionMethod] = &[
        DetectionMethod::ZScore,
        DetectionMethod::Speed,
        DetectionMethod::Acceleration,
        DetectionMethod::Distance,
    ];

    pub fn new(config: DetectorConfig) -> Self {
        Self {
            inner: StandardDetector::new(config),
        }
    }
}

impl Detector for GpsDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Gps
    }

    fn config(&self) -> &DetectorConfig {
        self.inner.config()
    }

    fn config_mut(&mut self) -> &mut DetectorConfig {
        self.inner.config_mut()
    }

    fn backends(&self) -> Backends {
        self.inner.backends()
    }

    fn backends_mut(&mut self) -> &mut Backends {
        self.inner.backends_mut()
    }

    fn default_detection_methods(&self) -> &'static [DetectionMethod] {
        Self::DEFAULT_METHODS
    }

    fn supports_detection(&self, method: DetectionMethod) -> bool {
        method.requires_timestamps() || self.inner.supports_detection(method)
    }

    fn supports_correction(&self, method: CorrectionMethod) -> bool {
        self.inner.supports_correction(method)
    }

    fn ml_params(&self) -> MlParams {
        self.inner.ml_params()
    }
}
