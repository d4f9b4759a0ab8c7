//! Optimizer configuration: defaults, optional JSON file, environment overrides.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cost::{CostModel, CostParameters};
use crate::error::{Error, Result};
use crate::routing::SearchMode;
use crate::validate::{BoundingBox, CoordinateValidator, DEFAULT_MAX_SPAN_M};

/// Default snap tolerance in meters.
pub const DEFAULT_SNAP_RADIUS_M: f64 = 100.0;

/// Default cap on rows fetched for one subgraph.
pub const DEFAULT_EDGE_LIMIT: usize = 250_000;

pub const MAX_SPAN_ENV: &str = "VELOROUTE_MAX_SPAN_M";
pub const SNAP_RADIUS_ENV: &str = "VELOROUTE_SNAP_RADIUS_M";
pub const EDGE_LIMIT_ENV: &str = "VELOROUTE_EDGE_LIMIT";
pub const SEARCH_MODE_ENV: &str = "VELOROUTE_SEARCH_MODE";

/// Deployment-level settings shared by every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Service region; points outside it are rejected.
    pub bounds: BoundingBox,
    /// Maximum geodesic distance between the two endpoints.
    pub max_span_m: f64,
    /// Maximum distance between a query point and the node it snaps to.
    pub snap_radius_m: f64,
    /// Maximum number of edge rows retrieved per query.
    pub edge_limit: usize,
    pub search_mode: SearchMode,
    pub cost: CostParameters,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            bounds: BoundingBox::default(),
            max_span_m: DEFAULT_MAX_SPAN_M,
            snap_radius_m: DEFAULT_SNAP_RADIUS_M,
            edge_limit: DEFAULT_EDGE_LIMIT,
            search_mode: SearchMode::default(),
            cost: CostParameters::default(),
        }
    }
}

impl OptimizerConfig {
    /// Defaults, overlaid by the JSON file at `path` (if any), overlaid by
    /// `VELOROUTE_*` environment variables. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_json_path(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        debug!(?config, "loaded optimizer configuration");
        Ok(config)
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Apply overrides looked up by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(MAX_SPAN_ENV) {
            self.max_span_m = parse_override(MAX_SPAN_ENV, &value)?;
        }
        if let Some(value) = lookup(SNAP_RADIUS_ENV) {
            self.snap_radius_m = parse_override(SNAP_RADIUS_ENV, &value)?;
        }
        if let Some(value) = lookup(EDGE_LIMIT_ENV) {
            self.edge_limit = parse_override(EDGE_LIMIT_ENV, &value)?;
        }
        if let Some(value) = lookup(SEARCH_MODE_ENV) {
            self.search_mode = value.parse::<SearchMode>().map_err(|message| Error::InvalidConfig {
                message: format!("{SEARCH_MODE_ENV}: {message}"),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.bounds.is_well_formed() {
            return Err(Error::InvalidConfig {
                message: format!("bounding box is malformed: {:?}", self.bounds),
            });
        }
        if !(self.max_span_m > 0.0) || !self.max_span_m.is_finite() {
            return Err(Error::InvalidConfig {
                message: format!("max_span_m must be positive, got {}", self.max_span_m),
            });
        }
        if !(self.snap_radius_m > 0.0) || !self.snap_radius_m.is_finite() {
            return Err(Error::InvalidConfig {
                message: format!("snap_radius_m must be positive, got {}", self.snap_radius_m),
            });
        }
        if self.edge_limit == 0 {
            return Err(Error::InvalidConfig {
                message: "edge_limit must be at least 1".to_string(),
            });
        }
        self.cost.validate()
    }

    pub fn validator(&self) -> CoordinateValidator {
        CoordinateValidator::new(self.bounds, self.max_span_m)
    }

    pub fn cost_model(&self) -> CostModel {
        CostModel::new(self.cost)
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidConfig {
        message: format!("{key} has unparseable value '{value}'"),
    })
}
