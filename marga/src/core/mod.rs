//! Core foundation: data types, geodesy, statistics and numerics.

pub mod geo;
pub mod math;
pub mod stats;
pub mod types;
