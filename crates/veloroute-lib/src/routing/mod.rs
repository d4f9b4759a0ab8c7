//! Route optimization entry points.
//!
//! This module provides:
//! - [`SearchMode`] - Supported search strategies (strict, greedy, A*)
//! - [`RouteRequest`] - One query: endpoints, raw preferences, optional mode
//! - [`RoutePlan`] - Planned route result
//! - [`RouteOptimizer`] - Binds a [`SpatialStore`] to an [`OptimizerConfig`]
//! - [`plan_route`] - Validate, snap, retrieve, build, search
//!
//! Every call builds its own graph and search state; nothing is cached
//! between queries.

mod planner;

pub use planner::{select_planner, AStarPlanner, GreedyPlanner, PathPlanner, StrictPlanner};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::OptimizerConfig;
use crate::error::{Error, Result};
use crate::geodesy::Coordinate;
use crate::graph::build_graph;
use crate::network::NodeId;
use crate::preferences::Preferences;
use crate::store::{SnappedNode, SpatialStore};
use crate::subgraph::{SearchArea, SubgraphRetriever};

/// Supported search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Dijkstra; optimal.
    #[default]
    Strict,
    /// Dijkstra with early exit when the goal is first seen; not optimal.
    Greedy,
    /// A* with a straight-line lower bound; optimal.
    #[serde(rename = "a-star")]
    AStar,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SearchMode::Strict => "strict",
            SearchMode::Greedy => "greedy",
            SearchMode::AStar => "a-star",
        };
        f.write_str(value)
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "dijkstra" => Ok(SearchMode::Strict),
            "greedy" => Ok(SearchMode::Greedy),
            "a-star" | "astar" | "a_star" => Ok(SearchMode::AStar),
            other => Err(format!(
                "unknown search mode '{other}' (expected strict, greedy, or a-star)"
            )),
        }
    }
}

/// High-level route request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub start: Coordinate,
    pub goal: Coordinate,
    /// Raw preference percentages in `[0, 100]`: flatness, bicycle, distance,
    /// motorway, highway, residential.
    pub preferences: [f64; 6],
    /// Overrides the configured search mode when set.
    pub mode: Option<SearchMode>,
}

impl RouteRequest {
    pub fn new(start: Coordinate, goal: Coordinate, preferences: [f64; 6]) -> Self {
        Self {
            start,
            goal,
            preferences,
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub mode: SearchMode,
    pub start: SnappedNode,
    pub goal: SnappedNode,
    /// Node ids from `start.id` to `goal.id` inclusive.
    pub nodes: Vec<NodeId>,
    /// Node positions in path order.
    pub coordinates: Vec<Coordinate>,
    /// Sum of preference-weighted edge costs.
    pub total_weight: f64,
    /// Physical length in meters.
    pub distance_m: f64,
    pub search_radius_m: f64,
    /// Rows retrieved from the store for this query.
    pub edge_count: usize,
}

impl RoutePlan {
    /// Number of edges in the route.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    fn trivial(mode: SearchMode, node: SnappedNode, goal: SnappedNode) -> Self {
        Self {
            mode,
            start: node,
            goal,
            nodes: vec![node.id],
            coordinates: vec![node.coord],
            total_weight: 0.0,
            distance_m: 0.0,
            search_radius_m: 0.0,
            edge_count: 0,
        }
    }
}

/// Compute a route for `request` against `store`.
///
/// Steps:
/// 1. Validate the config, both endpoints, the preference vector, and the span
/// 2. Snap each endpoint to its nearest node
/// 3. Retrieve edges around the geodesic midpoint
/// 4. Build the weighted graph and run the selected search
pub fn plan_route<S: SpatialStore>(
    store: &S,
    config: &OptimizerConfig,
    request: &RouteRequest,
) -> Result<RoutePlan> {
    config.validate()?;
    let mode = request.mode.unwrap_or(config.search_mode);

    let validator = config.validator();
    validator.check_point(&request.start)?;
    validator.check_point(&request.goal)?;
    let preferences = Preferences::from_percentages(request.preferences)?;
    let span_m = validator.check_span(&request.start, &request.goal)?;

    let retriever = SubgraphRetriever::new(store, config.snap_radius_m, config.edge_limit);
    let start = retriever.snap(&request.start)?;
    let goal = retriever.snap(&request.goal)?;

    if start.id == goal.id {
        debug!(node = start.id, "endpoints snapped to the same node");
        return Ok(RoutePlan::trivial(mode, start, goal));
    }

    let area = SearchArea::between(&start.coord, &goal.coord);
    let rows = retriever.retrieve(&area)?;

    let cost_model = config.cost_model();
    let graph = build_graph(&rows, &cost_model, &preferences);

    let planner = select_planner(mode);
    let nodes = planner
        .find_path(&graph, start.id, goal.id)
        .ok_or(Error::NoPathFound {
            start: start.id,
            goal: goal.id,
        })?;

    let coordinates = graph.coordinates(&nodes);
    let total_weight = graph.path_weight(&nodes).unwrap_or_default();
    let distance_m = graph.path_distance(&nodes).unwrap_or_default();

    debug!(
        %mode,
        span_m,
        hops = nodes.len().saturating_sub(1),
        total_weight,
        distance_m,
        "planned route"
    );

    Ok(RoutePlan {
        mode,
        start,
        goal,
        nodes,
        coordinates,
        total_weight,
        distance_m,
        search_radius_m: area.radius_m,
        edge_count: rows.len(),
    })
}

/// Binds a store to a configuration; the public query surface of the crate.
#[derive(Debug, Clone)]
pub struct RouteOptimizer<S> {
    store: S,
    config: OptimizerConfig,
}

impl<S: SpatialStore> RouteOptimizer<S> {
    pub fn new(store: S, config: OptimizerConfig) -> Self {
        Self { store, config }
    }

    pub fn with_defaults(store: S) -> Self {
        Self::new(store, OptimizerConfig::default())
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tagged form of [`RouteOptimizer::optimize`].
    pub fn plan(&self, request: &RouteRequest) -> Result<RoutePlan> {
        plan_route(&self.store, &self.config, request)
    }

    /// Ordered `(lat, lon)` path from `a` to `b`, or an empty vector on any
    /// failure. The reason is logged, not returned.
    pub fn optimize(&self, a: Coordinate, b: Coordinate, preferences: [f64; 6]) -> Vec<Coordinate> {
        match self.plan(&RouteRequest::new(a, b, preferences)) {
            Ok(plan) => plan.coordinates,
            Err(err) if err.is_no_route() => {
                info!(category = err.category(), error = %err, from = %a, to = %b, "no route");
                Vec::new()
            }
            Err(err) => {
                warn!(category = err.category(), error = %err, from = %a, to = %b, "route optimization failed");
                Vec::new()
            }
        }
    }
}
