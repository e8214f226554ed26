//! Advanced tier: model-based correction and tunable ML detectors.

use super::{Detector, GpsDetector};
use crate::config::{Backends, DetectorConfig, MlParams};
use crate::core::types::{CorrectionMethod, DetectionMethod, DetectorKind};

/// GPS cleaning plus `kalman` and `lowess` correction.
///
/// ML detectors read their hyperparameters from `advanced.ml`. Both extra
/// filters still depend on their backend being available; otherwise `fix`
/// falls back to `linear`.
#[derive(Debug, Clone, Default)]
pub struct AdvancedDetector {
    inner: GpsDetector,
}

impl AdvancedDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            inner: GpsDetector::new(config),
        }
    }
}

impl Detector for AdvancedDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Advanced
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
        self.inner.default_detection_methods()
    }

    fn supports_detection(&self, method: DetectionMethod) -> bool {
        self.inner.supports_detection(method)
    }

    fn supports_correction(&self, method: CorrectionMethod) -> bool {
        matches!(method, CorrectionMethod::Kalman | CorrectionMethod::Lowess)
            || self.inner.supports_correction(method)
    }

    fn ml_params(&self) -> MlParams {
        self.config().advanced.ml.clone()
    }
}
