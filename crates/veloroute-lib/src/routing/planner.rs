//! Search strategies behind the [`PathPlanner`] trait.
//!
//! Each [`SearchMode`] maps to one planner so the orchestrator never matches
//! on the mode itself.

use crate::graph::Graph;
use crate::network::NodeId;
use crate::path::{find_route_a_star, find_route_greedy, find_route_strict};

use super::SearchMode;

/// Trait for route search strategies.
pub trait PathPlanner: Send + Sync {
    /// The mode identifier for this planner.
    fn mode(&self) -> SearchMode;

    /// Search `graph` from `start` to `goal`.
    ///
    /// Returns `Some(path)` if a route is found, `None` otherwise.
    fn find_path(&self, graph: &Graph, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>>;

    /// Whether returned paths are guaranteed to have minimal total weight.
    fn is_optimal(&self) -> bool {
        true
    }
}

/// Dijkstra search; always returns a lowest-weight path.
#[derive(Debug, Clone, Default)]
pub struct StrictPlanner;

impl PathPlanner for StrictPlanner {
    fn mode(&self) -> SearchMode {
        SearchMode::Strict
    }

    fn find_path(&self, graph: &Graph, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
        find_route_strict(graph, start, goal)
    }
}

/// Early-exit search. Faster on dense networks but may return a heavier path
/// than [`StrictPlanner`].
#[derive(Debug, Clone, Default)]
pub struct GreedyPlanner;

impl PathPlanner for GreedyPlanner {
    fn mode(&self) -> SearchMode {
        SearchMode::Greedy
    }

    fn find_path(&self, graph: &Graph, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
        find_route_greedy(graph, start, goal)
    }

    fn is_optimal(&self) -> bool {
        false
    }
}

/// A* search guided by the graph's lowest weight per meter times the
/// straight-line distance to the goal.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner;

impl PathPlanner for AStarPlanner {
    fn mode(&self) -> SearchMode {
        SearchMode::AStar
    }

    fn find_path(&self, graph: &Graph, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
        find_route_a_star(graph, start, goal, graph.weight_per_meter_floor())
    }
}

/// Select the planner for a search mode.
pub fn select_planner(mode: SearchMode) -> Box<dyn PathPlanner> {
    match mode {
        SearchMode::Strict => Box::new(StrictPlanner),
        SearchMode::Greedy => Box::new(GreedyPlanner),
        SearchMode::AStar => Box::new(AStarPlanner),
    }
}
