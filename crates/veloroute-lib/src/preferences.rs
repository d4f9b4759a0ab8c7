use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Names of the six preference components, in input order.
pub const PREFERENCE_NAMES: [&str; 6] = [
    "flatness",
    "bicycle",
    "distance",
    "motorway",
    "highway",
    "residential",
];

/// Upper bound of the raw (percentage) preference scale.
pub const PREFERENCE_SCALE: f64 = 100.0;

/// Normalized rider preferences, each in `[0, 1]`; 0.5 is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub flatness: f64,
    pub bicycle: f64,
    pub distance: f64,
    pub motorway: f64,
    pub highway: f64,
    pub residential: f64,
}

impl Preferences {
    /// Build from already-normalized components without validation.
    pub fn normalized(values: [f64; 6]) -> Self {
        let [flatness, bicycle, distance, motorway, highway, residential] = values;
        Self {
            flatness,
            bicycle,
            distance,
            motorway,
            highway,
            residential,
        }
    }

    /// Validate raw `[0, 100]` percentages and normalize them.
    ///
    /// Any component outside the range (or NaN) invalidates the whole vector.
    pub fn from_percentages(raw: [f64; 6]) -> Result<Self> {
        for (name, value) in PREFERENCE_NAMES.into_iter().zip(raw) {
            if !(0.0..=PREFERENCE_SCALE).contains(&value) {
                return Err(Error::InvalidPreference { name, value });
            }
        }
        Ok(Self::normalized(raw.map(|value| value / PREFERENCE_SCALE)))
    }

    pub fn to_array(self) -> [f64; 6] {
        [
            self.flatness,
            self.bicycle,
            self.distance,
            self.motorway,
            self.highway,
            self.residential,
        ]
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::normalized([0.5; 6])
    }
}
