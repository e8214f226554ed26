//! Standard tier: position statistics, spatial and ML detectors.

use super::Detector;
use crate::config::{Backends, DetectorConfig, MlParams};
use crate::core::types::{CorrectionMethod, DetectionMethod, DetectorKind};

/// Statistical and spatial cleaning without motion checks.
///
/// Detects with `z_score`, `mad`, `distance`, `isolation_forest` and `lof`;
/// corrects with every filter except `kalman` and `lowess`. ML
/// hyperparameters are fixed at their defaults.
#[derive(Debug, Clone, Default)]
pub struct StandardDetector {
    config: DetectorConfig,
    backends: Backends,
}

impl StandardDetector {
    const DEFAULT_METHODS: &'static [DetectionMethod] =
        &[DetectionMethod::ZScore, DetectionMethod::Distance];

    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            backends: Backends::compiled(),
        }
    }
}

impl Detector for StandardDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Standard
    }

    fn config(&self) -> &DetectorConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut DetectorConfig {
        &mut self.config
    }

    fn backends(&self) -> Backends {
        self.backends
    }

    fn backends_mut(&mut self) -> &mut Backends {
        &mut self.backends
    }

    fn default_detection_methods(&self) -> &'static [DetectionMethod] {
        Self::DEFAULT_METHODS
    }

    fn supports_detection(&self, method: DetectionMethod) -> bool {
        !method.requires_timestamps()
    }

    fn supports_correction(&self, method: CorrectionMethod) -> bool {
        method.backend().is_none()
    }

    fn ml_params(&self) -> MlParams {
        MlParams::default()
    }
}
