//! Fixture road networks for the CLI tests.
#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use rusqlite::{params, Connection};
use tempfile::TempDir;

pub const ORIGIN: (f64, f64) = (42.36, -71.10);
pub const STEP: f64 = 0.001;
pub const SIDE: usize = 4;

pub const CSV_HEADER: &str =
    "start_id,start_lat,start_lon,end_id,end_lat,end_lon,distance_m,road_class,bike_lane,incline_pct";

/// `(id, lat, lon)` of a grid node; ids are row-major from 1.
pub fn node(row: usize, col: usize) -> (i64, f64, f64) {
    (
        (row * SIDE + col + 1) as i64,
        ORIGIN.0 + row as f64 * STEP,
        ORIGIN.1 + col as f64 * STEP,
    )
}

/// `"LAT,LON"` argument for a grid node.
pub fn point(row: usize, col: usize) -> String {
    let (_, lat, lon) = node(row, col);
    format!("{lat:.6},{lon:.6}")
}

/// Directed edges of a bidirectional residential grid; every length is 120 m.
pub fn grid_edges() -> Vec<(i64, f64, f64, i64, f64, f64)> {
    let mut edges = Vec::new();
    for row in 0..SIDE {
        for col in 0..SIDE {
            let here = node(row, col);
            let mut neighbours = Vec::new();
            if col + 1 < SIDE {
                neighbours.push(node(row, col + 1));
            }
            if row + 1 < SIDE {
                neighbours.push(node(row + 1, col));
            }
            for there in neighbours {
                edges.push((here.0, here.1, here.2, there.0, there.1, there.2));
                edges.push((there.0, there.1, there.2, here.0, here.1, here.2));
            }
        }
    }
    edges
}

/// Temporary directory holding both a CSV and a SQLite copy of the grid.
pub struct Fixture {
    _dir: TempDir,
    pub csv: PathBuf,
    pub db: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let csv = dir.path().join("edges.csv");
        let db = dir.path().join("road_network.db");
        write_csv(&csv);
        write_db(&db);
        Self { _dir: dir, csv, db }
    }
}

fn write_csv(path: &Path) {
    let mut body = String::from(CSV_HEADER);
    body.push('\n');
    for (s, slat, slon, e, elat, elon) in grid_edges() {
        writeln!(body, "{s},{slat},{slon},{e},{elat},{elon},120.0,residential,no,0.0")
            .expect("format row");
    }
    fs::write(path, body).expect("write csv");
}

fn write_db(path: &Path) {
    let connection = Connection::open(path).expect("create db");
    connection
        .execute_batch(
            "CREATE TABLE edges (
                start_node_id INTEGER, start_node_lat REAL, start_node_lon REAL,
                end_node_id INTEGER, end_node_lat REAL, end_node_lon REAL,
                distance REAL, highway_group TEXT, bicycle_group TEXT, incline REAL
            );",
        )
        .expect("create table");
    for (s, slat, slon, e, elat, elon) in grid_edges() {
        connection
            .execute(
                "INSERT INTO edges VALUES (?1, ?2, ?3, ?4, ?5, ?6, 120.0, 'residential', 'no', 0.0)",
                params![s, slat, slon, e, elat, elon],
            )
            .expect("insert edge");
    }
}

/// The CLI binary with quiet logs and monochrome output.
pub fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("veloroute-cli");
    cmd.env("RUST_LOG", "error")
        .env("NO_COLOR", "1")
        .env_remove("VELOROUTE_DB")
        .env_remove("VELOROUTE_MAX_SPAN_M")
        .env_remove("VELOROUTE_SNAP_RADIUS_M")
        .env_remove("VELOROUTE_EDGE_LIMIT")
        .env_remove("VELOROUTE_SEARCH_MODE");
    cmd
}
