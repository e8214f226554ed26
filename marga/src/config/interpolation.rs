//! Correction (interpolation) configuration.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::core::types::{CorrectionMethod, Extrapolation};

/// Parameters shared by the correction filters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// Method used when `fix` is called without one
    #[serde(default = "defaults::default_method")]
    pub default_method: CorrectionMethod,

    /// Half-width of the moving-average window; Savitzky-Golay uses `2w + 1`
    #[serde(default = "defaults::window_size")]
    pub window_size: usize,

    /// Smoothing-spline penalty on a unit-spaced time axis (0 interpolates)
    #[serde(default = "defaults::smooth_factor")]
    pub smooth_factor: f64,

    /// Behaviour outside the reference time range
    #[serde(default = "defaults::extrapolation")]
    pub extrapolation: Extrapolation,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            default_method: defaults::default_method(),
            window_size: defaults::window_size(),
            smooth_factor: defaults::smooth_factor(),
            extrapolation: defaults::extrapolation(),
        }
    }
}

/// Partial update for [`InterpolationConfig`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationParams {
    pub default_method: Option<CorrectionMethod>,
    pub window_size: Option<usize>,
    pub smooth_factor: Option<f64>,
    pub extrapolation: Option<Extrapolation>,
}

impl InterpolationConfig {
    /// Overwrite every field that is set in `params`.
    pub fn merge(&mut self, params: &InterpolationParams) {
        if let Some(m) = params.default_method {
            self.default_method = m;
        }
        if let Some(w) = params.window_size {
            self.window_size = w;
        }
        if let Some(s) = params.smooth_factor {
            self.smooth_factor = s;
        }
        if let Some(e) = params.extrapolation {
            self.extrapolation = e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = InterpolationConfig::default();
        assert_eq!(c.default_method, CorrectionMethod::Linear);
        assert_eq!(c.window_size, 5);
        assert_eq!(c.smooth_factor, 0.5);
        assert_eq!(c.extrapolation, Extrapolation::Nearest);
    }

    #[test]
    fn test_merge() {
        let mut c = InterpolationConfig::default();
        c.merge(&InterpolationParams {
            default_method: Some(CorrectionMethod::Savgol),
            window_size: Some(3),
            ..Default::default()
        });
        assert_eq!(c.default_method, CorrectionMethod::Savgol);
        assert_eq!(c.window_size, 3);
        assert_eq!(c.smooth_factor, 0.5);
    }

    #[test]
    fn test_method_names_in_toml() {
        let c: InterpolationConfig =
            toml::from_str("default_method = \"moving_average\"\nextrapolation = \"linear\"")
                .unwrap();
        assert_eq!(c.default_method, CorrectionMethod::MovingAverage);
        assert_eq!(c.extrapolation, Extrapolation::Linear);
    }
}
