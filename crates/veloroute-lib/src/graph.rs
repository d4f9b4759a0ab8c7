use std::collections::HashMap;

use tracing::debug;

use crate::cost::CostModel;
use crate::geodesy::Coordinate;
use crate::network::{EdgeRow, Node, NodeId, RoadClass};
use crate::preferences::Preferences;

/// Directed edge within the routing graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    /// Preference-weighted cost; always positive.
    pub weight: f64,
    /// Physical length in meters.
    pub distance_m: f64,
    pub road_class: RoadClass,
}

/// Weighted directed graph built for a single query.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    adjacency: HashMap<NodeId, Vec<Edge>>,
    /// Smallest `weight / distance_m` over edges with positive length.
    min_weight_per_meter: Option<f64>,
}

impl Graph {
    /// Return the outgoing edges of a node.
    pub fn neighbours(&self, node: NodeId) -> &[Edge] {
        self.adjacency
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn coordinate(&self, id: NodeId) -> Option<Coordinate> {
        self.nodes.get(&id).map(|node| node.coord)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Lower bound on weight per meter of road, or 0 for graphs without
    /// edges of positive length.
    pub fn weight_per_meter_floor(&self) -> f64 {
        self.min_weight_per_meter.unwrap_or(0.0)
    }

    /// Lightest edge `from -> to`, if one exists.
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.neighbours(from)
            .iter()
            .filter(|edge| edge.target == to)
            .min_by(|a, b| a.weight.total_cmp(&b.weight))
    }

    /// Sum of edge weights along `path`, or `None` if a hop is missing.
    pub fn path_weight(&self, path: &[NodeId]) -> Option<f64> {
        path.windows(2)
            .map(|hop| self.edge(hop[0], hop[1]).map(|edge| edge.weight))
            .sum()
    }

    /// Physical length of `path` in meters, using the same edges as [`Graph::path_weight`].
    pub fn path_distance(&self, path: &[NodeId]) -> Option<f64> {
        path.windows(2)
            .map(|hop| self.edge(hop[0], hop[1]).map(|edge| edge.distance_m))
            .sum()
    }

    /// Positions of the nodes along `path`; unknown ids are skipped.
    pub fn coordinates(&self, path: &[NodeId]) -> Vec<Coordinate> {
        path.iter().filter_map(|id| self.coordinate(*id)).collect()
    }
}

/// Build the routing graph for one query with `preferences` baked into the weights.
///
/// Both endpoints of every row become nodes; the first coordinate seen for an
/// id wins. Each row yields exactly one directed edge in its stored direction.
pub fn build_graph<'a>(
    rows: impl IntoIterator<Item = &'a EdgeRow>,
    cost_model: &CostModel,
    preferences: &Preferences,
) -> Graph {
    let mut graph = Graph::default();

    for row in rows {
        graph
            .nodes
            .entry(row.start_id)
            .or_insert_with(|| row.start_node());
        graph
            .nodes
            .entry(row.end_id)
            .or_insert_with(|| row.end_node());

        let weight = cost_model.cost(
            row.distance_m,
            row.road_class,
            row.bike_lane,
            row.incline_pct,
            preferences,
        );
        if row.distance_m > 0.0 {
            let ratio = weight / row.distance_m;
            graph.min_weight_per_meter = Some(
                graph
                    .min_weight_per_meter
                    .map_or(ratio, |floor| floor.min(ratio)),
            );
        }

        graph.adjacency.entry(row.start_id).or_default().push(Edge {
            target: row.end_id,
            weight,
            distance_m: row.distance_m,
            road_class: row.road_class,
        });
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built routing graph"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::BikeLane;
    use crate::test_helpers::EdgeRowBuilder;

    #[test]
    fn first_coordinate_wins_and_edges_stay_directed() {
        let a = (1, 42.30, -71.10);
        let b = (2, 42.31, -71.10);
        let b_moved = (2, 42.50, -71.50);
        let rows = vec![
            EdgeRowBuilder::new(a, b).build(),
            EdgeRowBuilder::new(b_moved, a).distance(50.0).build(),
        ];
        let graph = build_graph(&rows, &CostModel::default(), &Preferences::default());

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.coordinate(2), Some(Coordinate::new(42.31, -71.10)));
        assert_eq!(graph.neighbours(1).len(), 1);
        assert_eq!(graph.neighbours(2).len(), 1);
        assert_eq!(graph.neighbours(2)[0].distance_m, 50.0);
    }

    #[test]
    fn no_reverse_edge_is_synthesized() {
        let rows = vec![EdgeRowBuilder::new((1, 42.30, -71.10), (2, 42.31, -71.10)).build()];
        let graph = build_graph(&rows, &CostModel::default(), &Preferences::default());
        assert!(graph.neighbours(2).is_empty());
        assert!(graph.contains(2));
    }

    #[test]
    fn weights_come_from_the_cost_model() {
        let model = CostModel::default();
        let prefs = Preferences::normalized([1.0, 1.0, 1.0, 0.0, 0.0, 0.5]);
        let rows = vec![
            EdgeRowBuilder::new((1, 42.30, -71.10), (2, 42.301, -71.10))
                .distance(100.0)
                .road(RoadClass::Cycleway)
                .bike_lane(BikeLane::Yes)
                .incline(10.0)
                .build(),
        ];
        let graph = build_graph(&rows, &model, &prefs);
        let edge = graph.edge(1, 2).expect("edge present");
        assert!((edge.weight - 15.3).abs() < 1e-9);
        assert_eq!(graph.path_weight(&[1, 2]), Some(edge.weight));
        assert_eq!(graph.path_weight(&[2, 1]), None);
        assert_eq!(graph.path_distance(&[1]), Some(0.0));
        assert!((graph.weight_per_meter_floor() - 0.153).abs() < 1e-12);
    }
}
