//! Runtime tier selection.
//!
//! [`DynDetector`] wraps the three tiers behind one type so a tier can be
//! picked from configuration or the command line.
//!
//! # Example
//!
//! ```ignore
//! use marga::{create_detector_named, Detector, DetectorConfig};
//!
//! let mut detector = create_detector_named("advanced", DetectorConfig::load_default()?)?;
//! detector.configure(Some(&params), None, None);
//! let outcome = detector.process(&trajectory, None, Some(CorrectionMethod::Kalman))?;
//! ```

use super::{AdvancedDetector, Detector, GpsDetector, StandardDetector};
use crate::config::{Backends, DetectorConfig, MlParams};
use crate::core::types::{CorrectionMethod, DetectionMethod, DetectorKind};
use crate::error::Result;

/// Runtime-selectable detector tier.
#[derive(Debug, Clone)]
pub enum DynDetector {
    Standard(StandardDetector),
    Gps(GpsDetector),
    Advanced(AdvancedDetector),
}

impl DynDetector {
    /// Create a detector of the given tier.
    pub fn new(kind: DetectorKind, config: DetectorConfig) -> Self {
        match kind {
            DetectorKind::Standard => DynDetector::Standard(StandardDetector::new(config)),
            DetectorKind::Gps => DynDetector::Gps(GpsDetector::new(config)),
            DetectorKind::Advanced => DynDetector::Advanced(AdvancedDetector::new(config)),
        }
    }

    fn inner(&self) -> &dyn Detector {
        match self {
            DynDetector::Standard(d) => d,
            DynDetector::Gps(d) => d,
            DynDetector::Advanced(d) => d,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Detector {
        match self {
            DynDetector::Standard(d) => d,
            DynDetector::Gps(d) => d,
            DynDetector::Advanced(d) => d,
        }
    }
}

impl Detector for DynDetector {
    fn kind(&self) -> DetectorKind {
        self.inner().kind()
    }

    fn config(&self) -> &DetectorConfig {
        self.inner().config()
    }

    fn config_mut(&mut self) -> &mut DetectorConfig {
        self.inner_mut().config_mut()
    }

    fn backends(&self) -> Backends {
        self.inner().backends()
    }

    fn backends_mut(&mut self) -> &mut Backends {
        self.inner_mut().backends_mut()
    }

    fn default_detection_methods(&self) -> &'static [DetectionMethod] {
        self.inner().default_detection_methods()
    }

    fn supports_detection(&self, method: DetectionMethod) -> bool {
        self.inner().supports_detection(method)
    }

    fn supports_correction(&self, method: CorrectionMethod) -> bool {
        self.inner().supports_correction(method)
    }

    fn ml_params(&self) -> MlParams {
        self.inner().ml_params()
    }
}

/// Create a detector of tier `kind`.
pub fn create_detector(kind: DetectorKind, config: DetectorConfig) -> DynDetector {
    DynDetector::new(kind, config)
}

/// Create a detector from a tier name (`standard`, `gps`, `advanced`).
///
/// Unknown names are an [`Error::UnknownDetector`](crate::Error::UnknownDetector).
pub fn create_detector_named(name: &str, config: DetectorConfig) -> Result<DynDetector> {
    Ok(DynDetector::new(name.parse()?, config))
}
