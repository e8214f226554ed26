//! Optional backend availability.

use serde::{Deserialize, Serialize};

use crate::core::types::Backend;

/// Which optional numerical backends a detector may use.
///
/// [`Backends::compiled`] reflects the cargo features the crate was built
/// with. A detector can be restricted further (e.g. to reproduce a
/// deployment without the ML backend) but never widened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backends {
    pub kalman: bool,
    pub lowess: bool,
    pub ml: bool,
}

impl Backends {
    /// Backends linked into this build.
    pub const fn compiled() -> Self {
        Self {
            kalman: cfg!(feature = "kalman"),
            lowess: cfg!(feature = "lowess"),
            ml: cfg!(feature = "ml"),
        }
    }

    /// No optional backends.
    pub const fn none() -> Self {
        Self {
            kalman: false,
            lowess: false,
            ml: false,
        }
    }

    /// Intersection with `other`.
    pub fn restrict(self, other: Backends) -> Self {
        Self {
            kalman: self.kalman && other.kalman,
            lowess: self.lowess && other.lowess,
            ml: self.ml && other.ml,
        }
    }

    /// Whether `backend` is usable.
    pub fn is_available(&self, backend: Backend) -> bool {
        match backend {
            Backend::Kalman => self.kalman,
            Backend::Lowess => self.lowess,
            Backend::MachineLearning => self.ml,
        }
    }
}

impl Default for Backends {
    fn default() -> Self {
        Self::compiled()
    }
}
