//! Endpoint snapping and the bounded edge query around a trip's midpoint.

use tracing::debug;

use crate::error::{Error, Result};
use crate::geodesy::Coordinate;
use crate::network::EdgeRow;
use crate::store::{SnappedNode, SpatialStore};

/// Trips shorter than this get the widest detour margin.
pub const SHORT_TRIP_M: f64 = 5_000.0;
/// Trips shorter than this (and at least [`SHORT_TRIP_M`]) get the medium margin.
pub const MEDIUM_TRIP_M: f64 = 10_000.0;

/// Detour margin as a fraction of the half span.
pub fn radius_buffer(span_m: f64) -> f64 {
    if span_m < SHORT_TRIP_M {
        0.5
    } else if span_m < MEDIUM_TRIP_M {
        0.25
    } else {
        0.1
    }
}

/// `(1 + buffer) * span / 2`.
pub fn search_radius(span_m: f64) -> f64 {
    (1.0 + radius_buffer(span_m)) * span_m * 0.5
}

/// Circle that bounds the edges considered for one trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchArea {
    pub midpoint: Coordinate,
    pub radius_m: f64,
    pub span_m: f64,
}

impl SearchArea {
    /// Geodesic midpoint of `s` and `t` and the radius for their span.
    pub fn between(s: &Coordinate, t: &Coordinate) -> Self {
        let span_m = s.distance_to(t);
        Self {
            midpoint: s.midpoint(t),
            radius_m: search_radius(span_m),
            span_m,
        }
    }
}

/// Wraps a [`SpatialStore`] with the snap radius and row limit of one deployment.
#[derive(Debug, Clone)]
pub struct SubgraphRetriever<S> {
    store: S,
    snap_radius_m: f64,
    edge_limit: usize,
}

impl<S: SpatialStore> SubgraphRetriever<S> {
    pub fn new(store: S, snap_radius_m: f64, edge_limit: usize) -> Self {
        Self {
            store,
            snap_radius_m,
            edge_limit,
        }
    }

    pub fn snap_radius_m(&self) -> f64 {
        self.snap_radius_m
    }

    /// Nearest node within `max_meters` of `(lat, lon)`, if any.
    pub fn nearest_node(&self, lat: f64, lon: f64, max_meters: f64) -> Result<Option<SnappedNode>> {
        self.store.nearest_node(lat, lon, max_meters)
    }

    /// Snap `point` within the configured radius.
    pub fn snap(&self, point: &Coordinate) -> Result<SnappedNode> {
        let snapped = self
            .nearest_node(point.lat, point.lon, self.snap_radius_m)?
            .ok_or(Error::NoNearbyNode {
                lat: point.lat,
                lon: point.lon,
                radius_m: self.snap_radius_m,
            })?;
        debug!(
            node = snapped.id,
            offset_m = snapped.distance_m,
            query = %point,
            "snapped endpoint"
        );
        Ok(snapped)
    }

    /// Edges starting inside `area`, capped at the row limit.
    pub fn retrieve(&self, area: &SearchArea) -> Result<Vec<EdgeRow>> {
        let rows = self.store.edges_within_radius(
            area.midpoint.lat,
            area.midpoint.lon,
            area.radius_m,
            self.edge_limit,
        )?;
        debug!(
            radius_m = area.radius_m,
            midpoint = %area.midpoint,
            edges = rows.len(),
            limit = self.edge_limit,
            "retrieved subgraph"
        );
        if rows.is_empty() {
            return Err(Error::EmptySubgraph {
                radius_m: area.radius_m,
            });
        }
        Ok(rows)
    }
}
