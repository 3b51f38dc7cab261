//! Geographic coordinates and fixed-distance stepping.
//!
//! The earth is treated as a perfect sphere: one degree of latitude is always
//! [`KM_PER_DEGREE`] kilometres, while one degree of longitude shrinks with the
//! cosine of the latitude.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of one degree of latitude (and of longitude at the equator), in km.
pub const KM_PER_DEGREE: f64 = 111.2;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Kilometres covered by one degree of longitude at this latitude.
    pub fn km_per_degree_lon(&self) -> f64 {
        KM_PER_DEGREE * self.lat.to_radians().cos()
    }

    /// Move east by `step_km`, wrapping across the antimeridian.
    ///
    /// The result always lies in `[-180, 180)`. Near the poles the degree
    /// length approaches zero and the step blows up; no attempt is made to
    /// handle that.
    pub fn move_right(&mut self, step_km: f64) {
        // Shift into [0, 360) so the wraparound is a plain modulo.
        let shifted = self.lon + 180.0 + step_km / self.km_per_degree_lon();
        self.lon = shifted.rem_euclid(360.0) - 180.0;
    }

    /// Move south by `step_km`. Latitude is neither wrapped nor clamped.
    pub fn move_down(&mut self, step_km: f64) {
        self.lat -= step_km / KM_PER_DEGREE;
    }

    /// True when both components are inside their valid ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..180.0).contains(&self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}
