//! Advanced-tier hyperparameters: Kalman, LOWESS and ML models.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Constant-velocity Kalman filter noise parameters.
///
/// Units are degrees² since the state is kept in latitude/longitude.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KalmanConfig {
    /// Process noise variance (Q diagonal scale)
    #[serde(default = "defaults::process_noise")]
    pub process_noise: f64,

    /// Measurement noise variance (R diagonal)
    #[serde(default = "defaults::measurement_noise")]
    pub measurement_noise: f64,

    /// Initial state covariance (P₀ = σ²·I)
    #[serde(default = "defaults::initial_covariance")]
    pub initial_covariance: f64,
}

impl Default for KalmanConfig {
    fn default() -> Self {
        Self {
            process_noise: defaults::process_noise(),
            measurement_noise: defaults::measurement_noise(),
            initial_covariance: defaults::initial_covariance(),
        }
    }
}

/// Locally-weighted regression parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LowessConfig {
    /// Fraction of points used for each local fit
    #[serde(default = "defaults::lowess_frac")]
    pub frac: f64,

    /// Robustness iterations after the initial fit
    #[serde(default = "defaults::lowess_iterations")]
    pub iterations: usize,
}

impl Default for LowessConfig {
    fn default() -> Self {
        Self {
            frac: defaults::lowess_frac(),
            iterations: defaults::lowess_iterations(),
        }
    }
}

/// Hyperparameters of the ML outlier detectors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MlParams {
    /// Trees in the isolation forest
    #[serde(default = "defaults::n_estimators")]
    pub n_estimators: usize,

    /// Subsample size per tree
    #[serde(default = "defaults::max_samples")]
    pub max_samples: usize,

    /// Neighbourhood size for the local outlier factor
    #[serde(default = "defaults::n_neighbors")]
    pub n_neighbors: usize,

    /// RNG seed; the same seed and input give the same flags
    #[serde(default = "defaults::seed")]
    pub seed: u64,
}

impl Default for MlParams {
    fn default() -> Self {
        Self {
            n_estimators: defaults::n_estimators(),
            max_samples: defaults::max_samples(),
            n_neighbors: defaults::n_neighbors(),
            seed: defaults::seed(),
        }
    }
}

/// Advanced-tier configuration section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedConfig {
    #[serde(default)]
    pub kalman: KalmanConfig,

    #[serde(default)]
    pub lowess: LowessConfig,

    #[serde(default)]
    pub ml: MlParams,
}

/// Flat partial update for [`AdvancedConfig`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedParams {
    pub kalman_process_noise: Option<f64>,
    pub kalman_measurement_noise: Option<f64>,
    pub kalman_initial_covariance: Option<f64>,
    pub lowess_frac: Option<f64>,
    pub lowess_iterations: Option<usize>,
    pub n_estimators: Option<usize>,
    pub max_samples: Option<usize>,
    pub n_neighbors: Option<usize>,
    pub random_seed: Option<u64>,
}

impl AdvancedConfig {
    /// Overwrite every field that is set in `params`.
    pub fn merge(&mut self, params: &AdvancedParams) {
        if let Some(v) = params.kalman_process_noise {
            self.kalman.process_noise = v;
        }
        if let Some(v) = params.kalman_measurement_noise {
            self.kalman.measurement_noise = v;
        }
        if let Some(v) = params.kalman_initial_covariance {
            self.kalman.initial_covariance = v;
        }
        if let Some(v) = params.lowess_frac {
            self.lowess.frac = v;
        }
        if let Some(v) = params.lowess_iterations {
            self.lowess.iterations = v;
        }
        if let Some(v) = params.n_estimators {
            self.ml.n_estimators = v;
        }
        if let Some(v) = params.max_samples {
            self.ml.max_samples = v;
        }
        if let Some(v) = params.n_neighbors {
            self.ml.n_neighbors = v;
        }
        if let Some(v) = params.random_seed {
            self.ml.seed = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AdvancedConfig::default();
        assert_eq!(c.kalman.process_noise, 1e-9);
        assert_eq!(c.kalman.measurement_noise, 1e-8);
        assert_eq!(c.lowess.frac, 0.3);
        assert_eq!(c.lowess.iterations, 3);
        assert_eq!(c.ml.n_estimators, 100);
        assert_eq!(c.ml.seed, 42);
    }

    #[test]
    fn test_flat_merge() {
        let mut c = AdvancedConfig::default();
        c.merge(&AdvancedParams {
            kalman_measurement_noise: Some(1e-6),
            lowess_frac: Some(0.5),
            random_seed: Some(7),
            ..Default::default()
        });
        assert_eq!(c.kalman.measurement_noise, 1e-6);
        assert_eq!(c.kalman.process_noise, 1e-9);
        assert_eq!(c.lowess.frac, 0.5);
        assert_eq!(c.ml.seed, 7);
    }
}
