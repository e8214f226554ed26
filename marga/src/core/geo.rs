//! Geodesic primitives for latitude/longitude trajectories.
//!
//! Distances use the Haversine formula on a sphere of radius
//! [`EARTH_RADIUS_M`]. Timestamps are converted to `f64` epoch seconds so that
//! every time-ordered algorithm works on one numeric axis.

use chrono::{DateTime, Utc};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Minimum elapsed time between consecutive samples (seconds).
///
/// Deltas below this are floored so speeds stay finite.
pub const MIN_TIME_DELTA_S: f64 = 0.1;

/// Great-circle distance in meters between two points given in degrees.
///
/// The intermediate `a` term is clipped to [0, 1] so near-antipodal pairs
/// stay finite.
///
/// # Example
/// ```
/// use marga::core::geo::haversine;
///
/// let d = haversine(48.0, 11.0, 48.0, 11.0);
/// assert_eq!(d, 0.0);
/// ```
#[inline]
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Batch Haversine over paired coordinate slices.
///
/// Returns one distance per index of the shortest input.
pub fn haversine_batch(lat1: &[f64], lon1: &[f64], lat2: &[f64], lon2: &[f64]) -> Vec<f64> {
    let n = lat1.len().min(lon1.len()).min(lat2.len()).min(lon2.len());
    (0..n)
        .map(|i| haversine(lat1[i], lon1[i], lat2[i], lon2[i]))
        .collect()
}

/// Distances between consecutive points of a path (length `n - 1`).
pub fn consecutive_distances(lats: &[f64], lons: &[f64]) -> Vec<f64> {
    let n = lats.len().min(lons.len());
    if n < 2 {
        return Vec::new();
    }
    haversine_batch(&lats[..n - 1], &lons[..n - 1], &lats[1..n], &lons[1..n])
}

/// Convert a timestamp to seconds since the Unix epoch.
#[inline]
pub fn to_epoch_seconds(timestamp: &DateTime<Utc>) -> f64 {
    timestamp.timestamp_micros() as f64 / 1_000_000.0
}

/// Elapsed seconds between two epoch times, floored at [`MIN_TIME_DELTA_S`].
#[inline]
pub fn floored_delta(t0: f64, t1: f64) -> f64 {
    (t1 - t0).max(MIN_TIME_DELTA_S)
}

/// Meters spanned by one degree of latitude.
#[inline]
pub fn meters_per_degree_lat() -> f64 {
    EARTH_RADIUS_M * std::f64::consts::PI / 180.0
}
