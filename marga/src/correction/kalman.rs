//! Constant-velocity Kalman filter (`kalman` feature).
//!
//! State `[lat, lon, v_lat, v_lon]` in degrees and degrees/second. Every
//! row is a predict step; reference rows are also measurement updates, so
//! flagged rows receive the pure prediction from the trusted history.

use log::debug;
use nalgebra::{Matrix2, Matrix2x4, Matrix4, Vector2, Vector4};

use super::{Correction, CorrectionError, CorrectionResult, Corrector, OrderedSeries};
use crate::config::KalmanConfig;
use crate::core::geo::floored_delta;
use crate::core::types::{CorrectionMethod, Trajectory};

type State = Vector4<f64>;
type Cov = Matrix4<f64>;

/// Filter state between steps.
struct ConstantVelocity {
    x: State,
    p: Cov,
    h: Matrix2x4<f64>,
    r: Matrix2<f64>,
    q: f64,
}

impl ConstantVelocity {
    fn new(config: &KalmanConfig, latitude: f64, longitude: f64) -> Self {
        #[rustfmt::skip]
        let h = Matrix2x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
        );
        Self {
            x: State::new(latitude, longitude, 0.0, 0.0),
            p: Cov::identity() * config.initial_covariance,
            h,
            r: Matrix2::identity() * config.measurement_noise,
            q: config.process_noise,
        }
    }

    /// Propagate by `dt` seconds with white-acceleration process noise.
    fn predict(&mut self, dt: f64) {
        let mut f = Cov::identity();
        f[(0, 2)] = dt;
        f[(1, 3)] = dt;

        // Q = q · G Gᵀ per axis, G = [dt²/2, dt]
        let (g0, g1) = (0.5 * dt * dt, dt);
        let mut q = Cov::zeros();
        for axis in 0..2 {
            let (pos, vel) = (axis, axis + 2);
            q[(pos, pos)] = g0 * g0;
            q[(pos, vel)] = g0 * g1;
            q[(vel, pos)] = g0 * g1;
            q[(vel, vel)] = g1 * g1;
        }

        self.x = f * self.x;
        self.p = f * self.p * f.transpose() + q * self.q;
    }

    /// Fuse a position measurement (Joseph form).
    fn update(&mut self, latitude: f64, longitude: f64) -> CorrectionResult<()> {
        let z = Vector2::new(latitude, longitude);
        let innovation = z - self.h * self.x;
        let s = self.h * self.p * self.h.transpose() + self.r;
        let Some(s_inv) = s.try_inverse() else {
            return Err(CorrectionError::Numerical("singular innovation covariance".into()));
        };
        let k = self.p * self.h.transpose() * s_inv;

        self.x += k * innovation;
        let i_kh = Cov::identity() - k * self.h;
        self.p = i_kh * self.p * i_kh.transpose() + k * self.r * k.transpose();
        Ok(())
    }
}

/// Kalman filter correction.
///
/// Without timestamps each step is one second.
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    config: KalmanConfig,
}

impl KalmanFilter {
    pub fn new(config: KalmanConfig) -> Self {
        Self { config }
    }
}

impl Corrector for KalmanFilter {
    fn corrections(&self, trajectory: &Trajectory) -> CorrectionResult<Vec<Correction>> {
        let series = OrderedSeries::new(trajectory);
        let points = trajectory.points();

        let Some(first) = series.order.iter().find(|&&i| !points[i].is_anomaly) else {
            return Err(CorrectionError::NoReferencePoints);
        };
        let mut filter =
            ConstantVelocity::new(&self.config, points[*first].latitude, points[*first].longitude);

        let mut corrections = Vec::new();
        for (p, &row) in series.order.iter().enumerate() {
            if p > 0 {
                filter.predict(floored_delta(series.x[p - 1], series.x[p]));
            }
            let point = &points[row];
            if point.is_anomaly {
                corrections.push(Correction::new(row, filter.x[0], filter.x[1]));
            } else {
                filter.update(point.latitude, point.longitude)?;
            }
        }

        debug!(
            "kalman: {} steps ({}), {} predicted",
            series.len(),
            if series.timed { "timed" } else { "unit steps" },
            corrections.len()
        );
        Ok(corrections)
    }

    fn method(&self) -> CorrectionMethod {
        CorrectionMethod::Kalman
    }
}
