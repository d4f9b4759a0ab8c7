//! Edge cost model.
//!
//! A traversal is scored as `distance_m * multiplier + incline term`, where the
//! multiplier is the sum of independent distance, bike-lane, and road-class
//! terms. Preferences are normalized to `[0, 1]` with 0.5 as neutral. Both the
//! multiplier and the final cost are floored at `epsilon`, so every edge weight
//! is strictly positive.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::{BikeLane, RoadClass};
use crate::preferences::Preferences;

/// Tunable constants for the cost model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParameters {
    /// Inclines above this grade (percent) cost the same as the cap.
    pub hard_cap: f64,
    /// Declines below this grade (percent) cost the same as the cap.
    pub neg_cap: f64,
    /// Weight of the cubic climbing term.
    pub damp: f64,
    /// Decay rate of the downhill "rest" term.
    pub exp_damp: f64,
    /// Floor applied to the multiplier and to the final cost.
    pub epsilon: f64,
    /// Scale of the cubic bike-lane term.
    pub bike_lane_gain: f64,
    /// Scale of the per-class road term.
    pub road_gain: f64,
    /// Preference-independent adjustment for dedicated cycleways.
    pub cycleway_bias: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            hard_cap: 20.0,
            neg_cap: -10.0,
            damp: 0.01,
            exp_damp: 0.05,
            epsilon: 0.01,
            bike_lane_gain: 6.4,
            road_gain: 1.0,
            cycleway_bias: -0.8,
        }
    }
}

impl CostParameters {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("hard_cap", self.hard_cap),
            ("neg_cap", self.neg_cap),
            ("damp", self.damp),
            ("exp_damp", self.exp_damp),
            ("epsilon", self.epsilon),
            ("bike_lane_gain", self.bike_lane_gain),
            ("road_gain", self.road_gain),
            ("cycleway_bias", self.cycleway_bias),
        ];
        if let Some((name, _)) = values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(Error::InvalidConfig {
                message: format!("cost.{name} must be finite"),
            });
        }

        if self.neg_cap > 0.0 || self.hard_cap < 0.0 {
            return Err(Error::InvalidConfig {
                message: format!(
                    "incline caps must satisfy neg_cap <= 0 <= hard_cap, got [{}, {}]",
                    self.neg_cap, self.hard_cap
                ),
            });
        }

        if self.epsilon <= 0.0 {
            return Err(Error::InvalidConfig {
                message: format!("cost.epsilon must be positive, got {}", self.epsilon),
            });
        }

        if !(0.0..=1.0).contains(&self.damp) || self.exp_damp < 0.0 {
            return Err(Error::InvalidConfig {
                message: "cost.damp must lie in [0, 1] and cost.exp_damp must be >= 0"
                    .to_string(),
            });
        }

        Ok(())
    }
}

/// Pure, deterministic scorer for single edge traversals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostModel {
    params: CostParameters,
}

impl CostModel {
    pub fn new(params: CostParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CostParameters {
        &self.params
    }

    /// Smallest weight any edge can receive.
    pub fn epsilon(&self) -> f64 {
        self.params.epsilon
    }

    /// Score one traversal. Always returns a value `>= epsilon`.
    pub fn cost(
        &self,
        distance_m: f64,
        road_class: RoadClass,
        bike_lane: BikeLane,
        incline_pct: f64,
        preferences: &Preferences,
    ) -> f64 {
        let mut multiplier = self.distance_multiplier(preferences.distance)
            + self.bike_multiplier(bike_lane.is_present(), preferences.bicycle)
            + self.road_multiplier(
                road_class,
                preferences.motorway,
                preferences.highway,
                preferences.residential,
            );
        if !(multiplier > 0.0) {
            multiplier = self.params.epsilon;
        }

        let cost =
            distance_m * multiplier + self.incline_multiplier(incline_pct) * preferences.flatness;
        if cost > 0.0 {
            cost
        } else {
            self.params.epsilon
        }
    }

    /// `2^(pref - 0.5)`: neutral at 0.5, rising monotonically with the preference.
    pub fn distance_multiplier(&self, distance_pref: f64) -> f64 {
        (distance_pref - 0.5).exp2()
    }

    /// Relative effort of a grade.
    ///
    /// Grades are clamped to `[neg_cap, hard_cap]`. Descents decay
    /// exponentially below 1; climbs grow cubically from 1.
    pub fn incline_multiplier(&self, incline_pct: f64) -> f64 {
        let p = &self.params;
        let incline = if incline_pct.is_nan() {
            0.0
        } else {
            incline_pct.max(p.neg_cap).min(p.hard_cap)
        };

        if incline < 0.0 {
            (incline * p.exp_damp).exp()
        } else {
            p.damp * (incline + 1.0).powi(3) + (1.0 - p.damp)
        }
    }

    /// Cubic in `(pref - 0.5)`; a present lane earns a discount when the rider
    /// favours cycling and a surcharge when they do not. Absent lanes add nothing.
    pub fn bike_multiplier(&self, has_bike_lane: bool, bicycle_pref: f64) -> f64 {
        if has_bike_lane {
            -self.params.bike_lane_gain * (bicycle_pref - 0.5).powi(3)
        } else {
            0.0
        }
    }

    /// Per-class linear term in `(pref - 0.5)`, inverted so a high preference
    /// lowers the cost. Cycleways carry a fixed bias; other classes are neutral.
    pub fn road_multiplier(
        &self,
        road_class: RoadClass,
        motorway_pref: f64,
        highway_pref: f64,
        residential_pref: f64,
    ) -> f64 {
        let gain = self.params.road_gain;
        match road_class {
            RoadClass::Motorway => -gain * (motorway_pref - 0.5),
            RoadClass::Primary => -gain * (highway_pref - 0.5),
            RoadClass::Residential | RoadClass::Service => -gain * (residential_pref - 0.5),
            RoadClass::Cycleway => self.params.cycleway_bias,
            RoadClass::Secondary | RoadClass::Tertiary | RoadClass::Other => 0.0,
        }
    }
}
