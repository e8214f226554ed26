//! Top-level detector configuration and file loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::advanced::{AdvancedConfig, AdvancedParams};
use super::detection::{DetectionConfig, DetectionParams};
use super::interpolation::{InterpolationConfig, InterpolationParams};
use crate::error::Result;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "configs/marga.toml";

/// Full detector configuration loaded from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Detection thresholds
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Correction parameters
    #[serde(default)]
    pub interpolation: InterpolationConfig,

    /// Kalman / LOWESS / ML hyperparameters (read by the advanced tier)
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

impl DetectorConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load from [`DEFAULT_CONFIG_PATH`], or defaults if the file is absent.
    pub fn load_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// Shallow-merge partial updates into the matching sections.
    pub fn merge(
        &mut self,
        detection: Option<&DetectionParams>,
        interpolation: Option<&InterpolationParams>,
        advanced: Option<&AdvancedParams>,
    ) {
        if let Some(p) = detection {
            self.detection.merge(p);
        }
        if let Some(p) = interpolation {
            self.interpolation.merge(p);
        }
        if let Some(p) = advanced {
            self.advanced.merge(p);
        }
    }
}
