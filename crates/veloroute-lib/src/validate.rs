//! Input sanity checks run before any store or graph work.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geodesy::Coordinate;
use crate::preferences::PREFERENCE_SCALE;

/// Default maximum great-circle distance between query endpoints.
pub const DEFAULT_MAX_SPAN_M: f64 = 50_000.0;

/// Latitude/longitude rectangle describing the service region (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Massachusetts, the reference deployment region.
    pub const MASSACHUSETTS: BoundingBox = BoundingBox {
        min_lat: 41.0,
        max_lat: 43.0,
        min_lon: -73.6,
        max_lon: -69.8,
    };

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }

    pub fn is_well_formed(&self) -> bool {
        [self.min_lat, self.max_lat, self.min_lon, self.max_lon]
            .iter()
            .all(|value| value.is_finite())
            && self.min_lat <= self.max_lat
            && self.min_lon <= self.max_lon
            && self.min_lat >= -90.0
            && self.max_lat <= 90.0
            && self.min_lon >= -180.0
            && self.max_lon <= 180.0
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::MASSACHUSETTS
    }
}

/// Pure predicates over query inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateValidator {
    bounds: BoundingBox,
    max_span_m: f64,
}

impl Default for CoordinateValidator {
    fn default() -> Self {
        Self::new(BoundingBox::default(), DEFAULT_MAX_SPAN_M)
    }
}

impl CoordinateValidator {
    pub fn new(bounds: BoundingBox, max_span_m: f64) -> Self {
        Self { bounds, max_span_m }
    }

    /// `true` iff the point lies inside the service region.
    pub fn validate(&self, lat: f64, lon: f64) -> bool {
        self.bounds.contains(lat, lon)
    }

    /// `true` iff every raw component is within `[0, 100]`.
    pub fn validate_preferences(&self, raw: &[f64; 6]) -> bool {
        raw.iter()
            .all(|value| (0.0..=PREFERENCE_SCALE).contains(value))
    }

    /// `true` iff the geodesic distance between `a` and `b` does not exceed the maximum span.
    pub fn validate_span(&self, a: &Coordinate, b: &Coordinate) -> bool {
        a.distance_to(b) <= self.max_span_m
    }

    /// Tagged form of [`CoordinateValidator::validate`].
    pub fn check_point(&self, point: &Coordinate) -> Result<()> {
        if self.validate(point.lat, point.lon) {
            Ok(())
        } else {
            Err(Error::InvalidCoordinate {
                lat: point.lat,
                lon: point.lon,
            })
        }
    }

    /// Tagged form of [`CoordinateValidator::validate_span`]; returns the span in meters.
    pub fn check_span(&self, a: &Coordinate, b: &Coordinate) -> Result<f64> {
        let distance_m = a.distance_to(b);
        if distance_m <= self.max_span_m {
            Ok(distance_m)
        } else {
            Err(Error::ExcessiveSpan {
                distance_m,
                max_m: self.max_span_m,
            })
        }
    }
}

/// Check a point against the default (Massachusetts) service region.
pub fn valid_point(lat: f64, lon: f64) -> bool {
    CoordinateValidator::default().validate(lat, lon)
}
