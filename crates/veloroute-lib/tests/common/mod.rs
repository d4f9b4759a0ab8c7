//! Shared fixtures for the integration tests: synthetic road networks inside
//! the default service region, SQLite fixture databases, and a brute-force
//! reference search.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rusqlite::{params, Connection};
use veloroute_lib::{BikeLane, Coordinate, EdgeRow, Graph, NodeId, RoadClass};

/// South-west corner of the synthetic grid (Cambridge, MA).
pub const GRID_ORIGIN: (f64, f64) = (42.36, -71.10);
/// Grid spacing in degrees.
pub const GRID_STEP: f64 = 0.001;

/// A road node used when assembling fixture rows.
#[derive(Debug, Clone, Copy)]
pub struct FixtureNode {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

impl FixtureNode {
    pub const fn new(id: NodeId, lat: f64, lon: f64) -> Self {
        Self { id, lat, lon }
    }

    pub fn coord(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// Directed residential edge with the straight-line length as distance.
pub fn edge(from: FixtureNode, to: FixtureNode) -> EdgeRow {
    let mut row = EdgeRow {
        start_id: from.id,
        start_lat: from.lat,
        start_lon: from.lon,
        end_id: to.id,
        end_lat: to.lat,
        end_lon: to.lon,
        distance_m: 0.0,
        road_class: RoadClass::Residential,
        bike_lane: BikeLane::No,
        incline_pct: 0.0,
    };
    row.distance_m = row.straight_line_m();
    row
}

/// Both directions of a road; the reverse row gets the negated incline.
pub fn two_way(
    from: FixtureNode,
    to: FixtureNode,
    shape: impl Fn(EdgeRow) -> EdgeRow,
) -> [EdgeRow; 2] {
    let forward = shape(edge(from, to));
    let mut backward = shape(edge(to, from));
    backward.incline_pct = -forward.incline_pct;
    [forward, backward]
}

pub fn grid_node(cols: usize, row: usize, col: usize) -> FixtureNode {
    FixtureNode::new(
        (row * cols + col + 1) as NodeId,
        GRID_ORIGIN.0 + row as f64 * GRID_STEP,
        GRID_ORIGIN.1 + col as f64 * GRID_STEP,
    )
}

/// Bidirectional residential grid of `rows x cols` nodes.
pub fn grid_rows(rows: usize, cols: usize) -> Vec<EdgeRow> {
    let mut edges = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let here = grid_node(cols, row, col);
            if col + 1 < cols {
                edges.extend(two_way(here, grid_node(cols, row, col + 1), |e| e));
            }
            if row + 1 < rows {
                edges.extend(two_way(here, grid_node(cols, row + 1, col), |e| e));
            }
        }
    }
    edges
}

/// Random directed network of `node_count` nodes with `edge_count` rows.
///
/// Every distance is at least the straight-line length between endpoints.
pub fn random_network(seed: u64, node_count: usize, edge_count: usize) -> Vec<EdgeRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let nodes: Vec<FixtureNode> = (0..node_count)
        .map(|index| {
            FixtureNode::new(
                index as NodeId + 1,
                GRID_ORIGIN.0 + rng.gen_range(0.0..0.004),
                GRID_ORIGIN.1 + rng.gen_range(0.0..0.004),
            )
        })
        .collect();
    let classes = [
        RoadClass::Motorway,
        RoadClass::Primary,
        RoadClass::Secondary,
        RoadClass::Residential,
        RoadClass::Service,
        RoadClass::Cycleway,
        RoadClass::Other,
    ];
    let lanes = [BikeLane::Yes, BikeLane::No, BikeLane::Unknown];

    let mut rows = Vec::with_capacity(edge_count);
    while rows.len() < edge_count {
        let (Some(&from), Some(&to)) = (nodes.choose(&mut rng), nodes.choose(&mut rng)) else {
            break;
        };
        if from.id == to.id {
            continue;
        }
        let mut row = edge(from, to);
        row.distance_m *= rng.gen_range(1.0..3.0);
        row.road_class = *classes.choose(&mut rng).expect("classes");
        row.bike_lane = *lanes.choose(&mut rng).expect("lanes");
        row.incline_pct = rng.gen_range(-12.0..12.0);
        rows.push(row);
    }
    rows
}

/// Lowest total weight over every simple path from `start` to `goal`.
pub fn brute_force_min_weight(graph: &Graph, start: NodeId, goal: NodeId) -> Option<f64> {
    fn walk(
        graph: &Graph,
        node: NodeId,
        goal: NodeId,
        cost: f64,
        seen: &mut HashSet<NodeId>,
        best: &mut Option<f64>,
    ) {
        if node == goal {
            if best.map_or(true, |current| cost < current) {
                *best = Some(cost);
            }
            return;
        }
        for edge in graph.neighbours(node) {
            if seen.insert(edge.target) {
                walk(graph, edge.target, goal, cost + edge.weight, seen, best);
                seen.remove(&edge.target);
            }
        }
    }

    let mut best = None;
    let mut seen = HashSet::from([start]);
    walk(graph, start, goal, 0.0, &mut seen, &mut best);
    best
}

/// Write `rows` into a flat `edges` table carrying both endpoint coordinates.
pub fn write_flat_db(path: &Path, rows: &[EdgeRow]) {
    let connection = Connection::open(path).expect("create fixture db");
    connection
        .execute_batch(
            "CREATE TABLE edges (
                start_node_id INTEGER NOT NULL,
                start_node_lat REAL NOT NULL,
                start_node_lon REAL NOT NULL,
                end_node_id INTEGER NOT NULL,
                end_node_lat REAL NOT NULL,
                end_node_lon REAL NOT NULL,
                distance REAL,
                highway_group TEXT,
                bicycle_group TEXT,
                incline REAL
            );",
        )
        .expect("create edges table");

    let mut insert = connection
        .prepare("INSERT INTO edges VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)")
        .expect("prepare insert");
    for row in rows {
        insert
            .execute(params![
                row.start_id,
                row.start_lat,
                row.start_lon,
                row.end_id,
                row.end_lat,
                row.end_lon,
                row.distance_m,
                row.road_class.as_str(),
                bike_lane_tag(row.bike_lane),
                row.incline_pct,
            ])
            .expect("insert edge");
    }
}

/// Write `rows` into `nodes(id, lat, lon)` plus `edges` referencing them by id.
pub fn write_node_join_db(path: &Path, rows: &[EdgeRow]) {
    let connection = Connection::open(path).expect("create fixture db");
    connection
        .execute_batch(
            "CREATE TABLE nodes (id INTEGER PRIMARY KEY, lat REAL NOT NULL, lon REAL NOT NULL);
             CREATE TABLE edges (
                start_node_id INTEGER NOT NULL,
                end_node_id INTEGER NOT NULL,
                distance REAL,
                highway_group TEXT,
                bicycle_group INTEGER,
                incline REAL
             );",
        )
        .expect("create tables");

    for row in rows {
        for node in [row.start_node(), row.end_node()] {
            connection
                .execute(
                    "INSERT OR IGNORE INTO nodes (id, lat, lon) VALUES (?1, ?2, ?3)",
                    params![node.id, node.coord.lat, node.coord.lon],
                )
                .expect("insert node");
        }
        connection
            .execute(
                "INSERT INTO edges VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    row.start_id,
                    row.end_id,
                    row.distance_m,
                    row.road_class.as_str(),
                    row.bike_lane.is_present() as i64,
                    row.incline_pct,
                ],
            )
            .expect("insert edge");
    }
}

fn bike_lane_tag(lane: BikeLane) -> Option<&'static str> {
    match lane {
        BikeLane::Yes => Some("yes"),
        BikeLane::No => Some("no"),
        BikeLane::Unknown => None,
    }
}
