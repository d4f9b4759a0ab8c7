// Test-only helpers for `veloroute-lib` unit tests
#![allow(dead_code)]

use crate::network::{BikeLane, EdgeRow, NodeId, RoadClass};

/// South-west corner of the synthetic grid.
pub const GRID_ORIGIN: (f64, f64) = (42.30, -71.10);
/// Grid spacing in degrees (~111 m north-south, ~82 m east-west).
pub const GRID_STEP: f64 = 0.001;

/// Builder to create `EdgeRow` instances in tests with sensible defaults.
pub struct EdgeRowBuilder {
    row: EdgeRow,
}

impl EdgeRowBuilder {
    #[must_use]
    pub fn new(start: (NodeId, f64, f64), end: (NodeId, f64, f64)) -> Self {
        let mut row = EdgeRow {
            start_id: start.0,
            start_lat: start.1,
            start_lon: start.2,
            end_id: end.0,
            end_lat: end.1,
            end_lon: end.2,
            distance_m: 0.0,
            road_class: RoadClass::Residential,
            bike_lane: BikeLane::No,
            incline_pct: 0.0,
        };
        row.distance_m = row.straight_line_m();
        Self { row }
    }

    pub fn distance(mut self, meters: f64) -> Self {
        self.row.distance_m = meters;
        self
    }

    pub fn road(mut self, class: RoadClass) -> Self {
        self.row.road_class = class;
        self
    }

    pub fn bike_lane(mut self, lane: BikeLane) -> Self {
        self.row.bike_lane = lane;
        self
    }

    pub fn incline(mut self, pct: f64) -> Self {
        self.row.incline_pct = pct;
        self
    }

    pub fn build(self) -> EdgeRow {
        self.row
    }
}

/// Node id and position of grid cell `(row, col)`.
pub fn grid_node(cols: usize, row: usize, col: usize) -> (NodeId, f64, f64) {
    (
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
            let mut link = |there: (NodeId, f64, f64)| {
                edges.push(EdgeRowBuilder::new(here, there).build());
                edges.push(EdgeRowBuilder::new(there, here).build());
            };
            if col + 1 < cols {
                link(grid_node(cols, row, col + 1));
            }
            if row + 1 < rows {
                link(grid_node(cols, row + 1, col));
            }
        }
    }
    edges
}
