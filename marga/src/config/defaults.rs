//! Default value functions for serde deserialization.

use crate::core::types::{CorrectionMethod, Extrapolation};

pub fn z_score_threshold() -> f64 {
    3.0
}

pub fn mad_threshold() -> f64 {
    3.5
}

pub fn speed_multiplier() -> f64 {
    3.0
}

pub fn acceleration_threshold() -> f64 {
    5.0
}

pub fn distance_threshold() -> f64 {
    100.0
}

pub fn time_gap_threshold() -> f64 {
    30.0
}

pub fn contamination() -> f64 {
    0.05
}

pub fn isolation_threshold() -> f64 {
    0.65
}

pub fn lof_threshold() -> f64 {
    1.5
}

pub fn default_method() -> CorrectionMethod {
    CorrectionMethod::Linear
}

pub fn window_size() -> usize {
    5
}

pub fn smooth_factor() -> f64 {
    0.5
}

pub fn extrapolation() -> Extrapolation {
    Extrapolation::Nearest
}

pub fn process_noise() -> f64 {
    1e-9
}

pub fn measurement_noise() -> f64 {
    1e-8
}

pub fn initial_covariance() -> f64 {
    1.0
}

pub fn lowess_frac() -> f64 {
    0.3
}

pub fn lowess_iterations() -> usize {
    3
}

pub fn n_estimators() -> usize {
    100
}

pub fn max_samples() -> usize {
    256
}

pub fn n_neighbors() -> usize {
    20
}

pub fn seed() -> u64 {
    42
}
