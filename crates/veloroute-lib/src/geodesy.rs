//! Geographic coordinates and the geodesic helpers used by the optimizer.
//!
//! Distances and midpoints are computed on the WGS84 ellipsoid through the
//! `geo` crate. The squared planar distance in degrees is only used to order
//! neighbours in the greedy search mode.

use std::fmt;
use std::str::FromStr;

use geo::{Distance, Geodesic, InterpolatePoint, Point};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, used for the Cartesian projection of the
/// in-memory spatial index.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    /// Geodesic surface distance to `other` in meters.
    pub fn distance_to(&self, other: &Self) -> f64 {
        Geodesic.distance(self.to_point(), other.to_point())
    }

    /// Point halfway along the geodesic between `self` and `other`.
    pub fn midpoint(&self, other: &Self) -> Self {
        let mid = Geodesic.point_at_ratio_between(self.to_point(), other.to_point(), 0.5);
        Self {
            lat: mid.y(),
            lon: mid.x(),
        }
    }

    /// Squared planar distance in degrees. Cheap, not a metric on the sphere.
    pub fn squared_degree_distance(&self, other: &Self) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat * dlat + dlon * dlon
    }

    /// Earth-centred Cartesian position on a sphere of radius [`EARTH_RADIUS_M`].
    ///
    /// Chord length between two projected points never exceeds the surface
    /// distance, so a chord-radius query over-fetches and can be refined with
    /// [`Coordinate::distance_to`].
    pub fn to_cartesian(&self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [
            EARTH_RADIUS_M * lat.cos() * lon.cos(),
            EARTH_RADIUS_M * lat.cos() * lon.sin(),
            EARTH_RADIUS_M * lat.sin(),
        ]
    }

    /// Degree deltas `(dlat, dlon)` that enclose a circle of `meters` around
    /// this point. Used as a coarse pre-filter before exact distance checks.
    pub fn degree_window(&self, meters: f64) -> (f64, f64) {
        // One degree of latitude is never shorter than ~110.5 km on WGS84.
        let dlat = meters / 110_500.0;
        let cos_lat = self.lat.to_radians().cos().abs().max(1e-6);
        let dlon = (meters / (111_320.0 * cos_lat)).min(180.0);
        // Small margin for the ellipsoid/sphere mismatch.
        (dlat * 1.01, dlon * 1.01)
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

/// Parse `"LAT,LON"` (whitespace around either value is ignored).
impl FromStr for Coordinate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LON but got '{s}'"))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;
        Ok(Self { lat, lon })
    }
}
