use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;
use veloroute_lib::{
    build_graph, find_route_a_star, find_route_greedy, find_route_strict, BikeLane, Coordinate,
    CostModel, EdgeRow, Graph, InMemoryStore, NodeId, Preferences, RoadClass, RouteOptimizer,
};

const SIDE: usize = 60;
const STEP: f64 = 0.0008;
const ORIGIN: (f64, f64) = (42.34, -71.12);

fn node(row: usize, col: usize) -> (NodeId, f64, f64) {
    (
        (row * SIDE + col + 1) as NodeId,
        ORIGIN.0 + row as f64 * STEP,
        ORIGIN.1 + col as f64 * STEP,
    )
}

fn link(rows: &mut Vec<EdgeRow>, a: (NodeId, f64, f64), b: (NodeId, f64, f64), salt: usize) {
    let classes = [
        RoadClass::Residential,
        RoadClass::Primary,
        RoadClass::Cycleway,
        RoadClass::Service,
    ];
    for (from, to, sign) in [(a, b, 1.0), (b, a, -1.0)] {
        let mut row = EdgeRow {
            start_id: from.0,
            start_lat: from.1,
            start_lon: from.2,
            end_id: to.0,
            end_lat: to.1,
            end_lon: to.2,
            distance_m: 0.0,
            road_class: classes[salt % classes.len()],
            bike_lane: BikeLane::from(salt % 3 == 0),
            incline_pct: sign * ((salt % 7) as f64 - 3.0),
        };
        row.distance_m = row.straight_line_m();
        rows.push(row);
    }
}

static ROWS: Lazy<Vec<EdgeRow>> = Lazy::new(|| {
    let mut rows = Vec::new();
    for row in 0..SIDE {
        for col in 0..SIDE {
            let salt = row * 31 + col * 17;
            if col + 1 < SIDE {
                link(&mut rows, node(row, col), node(row, col + 1), salt);
            }
            if row + 1 < SIDE {
                link(&mut rows, node(row, col), node(row + 1, col), salt + 1);
            }
        }
    }
    rows
});

static GRAPH: Lazy<Graph> = Lazy::new(|| {
    build_graph(
        ROWS.iter(),
        &CostModel::default(),
        &Preferences::normalized([0.8, 0.9, 0.5, 0.1, 0.3, 0.6]),
    )
});

static STORE: Lazy<InMemoryStore> = Lazy::new(|| InMemoryStore::from_rows(ROWS.clone()));

fn benchmark_pathfinding(c: &mut Criterion) {
    let graph = &*GRAPH;
    let start = node(0, 0).0;
    let goal = node(SIDE - 1, SIDE - 1).0;

    c.bench_function("strict_grid_corner_to_corner", |b| {
        b.iter(|| black_box(find_route_strict(graph, start, goal).map(|path| path.len())));
    });

    c.bench_function("greedy_grid_corner_to_corner", |b| {
        b.iter(|| black_box(find_route_greedy(graph, start, goal).map(|path| path.len())));
    });

    c.bench_function("a_star_grid_corner_to_corner", |b| {
        let floor = graph.weight_per_meter_floor();
        b.iter(|| black_box(find_route_a_star(graph, start, goal, floor).map(|path| path.len())));
    });

    c.bench_function("optimize_grid_end_to_end", |b| {
        let optimizer = RouteOptimizer::with_defaults(&*STORE);
        let from = Coordinate::new(node(5, 5).1, node(5, 5).2);
        let to = Coordinate::new(node(50, 40).1, node(50, 40).2);
        let prefs = [80.0, 90.0, 50.0, 10.0, 30.0, 60.0];
        b.iter(|| black_box(optimizer.optimize(from, to, prefs).len()));
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
