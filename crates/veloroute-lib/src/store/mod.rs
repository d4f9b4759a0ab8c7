//! Query interface over the persisted road network, plus two adapters.
//!
//! The optimizer only talks to a [`SpatialStore`]. [`InMemoryStore`] serves
//! rows held in memory (tests, CSV extracts); [`SqliteStore`] reads a SQLite
//! road-network database produced by the ingestion pipeline.

mod memory;
mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use serde::Serialize;

use crate::error::Result;
use crate::geodesy::Coordinate;
use crate::network::{EdgeRow, NodeId};

/// A graph node matched to a free query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnappedNode {
    pub id: NodeId,
    pub coord: Coordinate,
    /// Geodesic distance from the query point in meters.
    pub distance_m: f64,
}

/// Read-only spatial queries consumed by the optimizer.
///
/// Each call is a synchronous round trip with no retry. The trait does not
/// require `Sync`: [`InMemoryStore`] can be shared across threads, while
/// [`SqliteStore`] owns a single connection, so concurrent callers open one
/// store per thread.
pub trait SpatialStore {
    /// Nearest node that starts at least one edge, if one lies within `max_meters`.
    fn nearest_node(&self, lat: f64, lon: f64, max_meters: f64) -> Result<Option<SnappedNode>>;

    /// Edges whose start node lies within `radius_m` of the given point,
    /// nearest first, at most `limit` rows.
    fn edges_within_radius(
        &self,
        lat: f64,
        lon: f64,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<EdgeRow>>;
}

impl<T: SpatialStore + ?Sized> SpatialStore for &T {
    fn nearest_node(&self, lat: f64, lon: f64, max_meters: f64) -> Result<Option<SnappedNode>> {
        (**self).nearest_node(lat, lon, max_meters)
    }

    fn edges_within_radius(
        &self,
        lat: f64,
        lon: f64,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<EdgeRow>> {
        (**self).edges_within_radius(lat, lon, radius_m, limit)
    }
}

impl<T: SpatialStore + ?Sized> SpatialStore for Box<T> {
    fn nearest_node(&self, lat: f64, lon: f64, max_meters: f64) -> Result<Option<SnappedNode>> {
        (**self).nearest_node(lat, lon, max_meters)
    }

    fn edges_within_radius(
        &self,
        lat: f64,
        lon: f64,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<EdgeRow>> {
        (**self).edges_within_radius(lat, lon, radius_m, limit)
    }
}

/// Order candidates nearest first, breaking ties by node id.
pub(crate) fn by_distance_then_id(a: &(NodeId, f64), b: &(NodeId, f64)) -> std::cmp::Ordering {
    a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0))
}
