//! Veloroute library entry points.
//!
//! This crate finds bicycle routes over a road network weighted by rider
//! preferences (flatness, bike lanes, distance, and road classes). A query
//! snaps both endpoints to the network, pulls the edges around their midpoint
//! from a [`SpatialStore`], weights them with the [`CostModel`], and searches
//! the resulting graph. Higher-level consumers (CLI, web layers) should only
//! depend on the items exported here.

pub mod config;
pub mod cost;
pub mod dataset;
pub mod error;
pub mod geodesy;
pub mod graph;
pub mod network;
pub mod output;
pub mod path;
pub mod preferences;
pub mod routing;
pub mod store;
pub mod subgraph;
pub mod validate;

#[cfg(test)]
mod test_helpers;

pub use config::OptimizerConfig;
pub use cost::{CostModel, CostParameters};
pub use dataset::{default_database_path, resolve_database_path};
pub use error::{Error, Result};
pub use geodesy::Coordinate;
pub use graph::{build_graph, Graph};
pub use network::{BikeLane, EdgeRow, Node, NodeId, RoadClass};
pub use output::{RouteRenderMode, RouteSummary};
pub use path::{find_route_a_star, find_route_greedy, find_route_strict};
pub use preferences::Preferences;
pub use routing::{plan_route, RouteOptimizer, RoutePlan, RouteRequest, SearchMode};
pub use store::{InMemoryStore, SnappedNode, SpatialStore, SqliteStore};
pub use subgraph::{search_radius, SearchArea, SubgraphRetriever};
pub use validate::{valid_point, BoundingBox, CoordinateValidator};
