//! Best-first searches over a [`Graph`].
//!
//! All searches keep one parent pointer per node and rebuild the path once the
//! goal is reached. Frontier entries may go stale when a node's cost improves;
//! they are discarded when popped.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::graph::Graph;
use crate::network::NodeId;

/// Lowest-weight path from `start` to `goal` (Dijkstra).
///
/// Returns `None` when either node is absent or the frontier empties first.
pub fn find_route_strict(graph: &Graph, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
    search(graph, start, goal, ExitPolicy::Strict)
}

/// Dijkstra with an early exit as soon as `goal` shows up among the neighbours
/// of the popped node.
///
/// Neighbours are scanned nearest-to-goal first by squared degree distance.
/// The early exit ignores frontier entries that might still reach the goal
/// more cheaply, so the result can be heavier than [`find_route_strict`]'s.
pub fn find_route_greedy(graph: &Graph, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
    search(graph, start, goal, ExitPolicy::Greedy)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitPolicy {
    Strict,
    Greedy,
}

fn search(graph: &Graph, start: NodeId, goal: NodeId, policy: ExitPolicy) -> Option<Vec<NodeId>> {
    if start == goal {
        return Some(vec![start]);
    }
    if !graph.contains(start) || !graph.contains(goal) {
        return None;
    }
    let goal_coord = graph.coordinate(goal)?;

    let mut best: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue = BinaryHeap::new();

    best.insert(start, 0.0);
    parents.insert(start, None);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        if !visited.insert(entry.node) {
            continue;
        }

        if entry.node == goal {
            return Some(reconstruct_path(&parents, start, goal));
        }

        let current_cost = entry.cost.0;
        let mut edges: Vec<_> = graph
            .neighbours(entry.node)
            .iter()
            .filter(|edge| !visited.contains(&edge.target))
            .collect();

        if policy == ExitPolicy::Greedy {
            if edges.iter().any(|edge| edge.target == goal) {
                parents.insert(goal, Some(entry.node));
                return Some(reconstruct_path(&parents, start, goal));
            }
            edges.sort_by(|a, b| {
                let da = graph
                    .coordinate(a.target)
                    .map_or(f64::INFINITY, |c| c.squared_degree_distance(&goal_coord));
                let db = graph
                    .coordinate(b.target)
                    .map_or(f64::INFINITY, |c| c.squared_degree_distance(&goal_coord));
                da.total_cmp(&db).then_with(|| a.target.cmp(&b.target))
            });
        }

        for edge in edges {
            let next = edge.target;
            let next_cost = current_cost + edge.weight;
            if next_cost < *best.get(&next).unwrap_or(&f64::INFINITY) {
                best.insert(next, next_cost);
                parents.insert(next, Some(entry.node));
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    None
}

/// A* search with `per_meter_floor * geodesic distance to goal` as heuristic.
///
/// Admissible when every edge weight is at least `per_meter_floor` times the
/// straight-line length between its endpoints. [`Graph::weight_per_meter_floor`]
/// satisfies this as long as no road is shorter than the chord it spans.
pub fn find_route_a_star(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    per_meter_floor: f64,
) -> Option<Vec<NodeId>> {
    if start == goal {
        return Some(vec![start]);
    }
    if !graph.contains(start) || !graph.contains(goal) {
        return None;
    }
    let goal_coord = graph.coordinate(goal)?;
    let heuristic = |node: NodeId| {
        graph
            .coordinate(node)
            .map_or(0.0, |coord| per_meter_floor * coord.distance_to(&goal_coord))
    };

    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    let mut queue = BinaryHeap::new();

    g_score.insert(start, 0.0);
    parents.insert(start, None);
    queue.push(AStarEntry::new(start, 0.0, heuristic(start)));

    while let Some(entry) = queue.pop() {
        let current_score = match g_score.get(&entry.node) {
            Some(score) if *score < entry.cost.0 => continue,
            Some(score) => *score,
            None => continue,
        };

        if entry.node == goal {
            return Some(reconstruct_path(&parents, start, goal));
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            let tentative_g = current_score + edge.weight;
            if tentative_g < *g_score.get(&next).unwrap_or(&f64::INFINITY) {
                g_score.insert(next, tentative_g);
                parents.insert(next, Some(entry.node));
                queue.push(AStarEntry::new(next, tentative_g, heuristic(next)));
            }
        }
    }

    None
}

fn reconstruct_path(
    parents: &HashMap<NodeId, Option<NodeId>>,
    start: NodeId,
    goal: NodeId,
) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents.get(&node).copied().flatten();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry {
    node: NodeId,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl AStarEntry {
    fn new(node: NodeId, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
