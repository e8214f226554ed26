//! Error types for Marga

use crate::core::types::DetectionMethod;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Marga error types
///
/// Only validation and configuration problems are errors. Everything the
/// cleaning pipeline can recover from is reported as a [`Warning`](crate::Warning).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A requested detection method needs a column the trajectory lacks
    #[error("Missing required column '{column}' for {method} detection")]
    MissingColumn {
        /// Column name
        column: &'static str,
        /// Method that required it
        method: DetectionMethod,
    },

    /// Latitude or longitude is not a finite number
    #[error("Invalid coordinate at row {row}: ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// Row index in the input trajectory
        row: usize,
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },

    /// Unknown detector variant name
    #[error("Unknown detector kind: {0}")]
    UnknownDetector(String),

    /// Unknown detection method name
    #[error("Unknown detection method: {0}")]
    UnknownDetectionMethod(String),

    /// Unknown correction method name
    #[error("Unknown correction method: {0}")]
    UnknownCorrectionMethod(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
