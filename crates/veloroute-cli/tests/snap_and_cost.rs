mod common;

use common::{cli, node, Fixture};
use predicates::prelude::*;

#[test]
fn snap_reports_nearest_node() {
    let fixture = Fixture::new();
    let (_, lat, lon) = node(1, 2);
    cli()
        .arg("--db")
        .arg(&fixture.db)
        .args(["snap", "--at", &format!("{:.6},{:.6}", lat + 0.00005, lon)])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Nearest node 7 at"));
}

#[test]
fn snap_geojson_is_a_point() {
    let fixture = Fixture::new();
    let (_, lat, lon) = node(0, 0);
    let output = cli()
        .arg("--edges-csv")
        .arg(&fixture.csv)
        .args(["--format", "geojson", "snap", "--at", &format!("{lat},{lon}")])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("geojson");
    assert_eq!(value["geometry"]["type"], "Point");
    assert_eq!(value["properties"]["node"], 1);
}

#[test]
fn snap_radius_flag_limits_the_search() {
    let fixture = Fixture::new();
    let (_, lat, lon) = node(0, 0);
    cli()
        .arg("--edges-csv")
        .arg(&fixture.csv)
        .args(["snap", "--at", &format!("{:.6},{lon}", lat + 0.0004), "--radius", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[no_nearby_node]"));
}

#[test]
fn cost_breaks_down_multipliers() {
    cli()
        .args([
            "cost",
            "--length",
            "100",
            "--road",
            "cycleway",
            "--bike-lane",
            "yes",
            "--incline",
            "-4",
            "--flatness",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Edge cost:"))
        .stdout(predicate::str::contains("road multiplier"))
        .stdout(predicate::str::contains("incline -4.0%"));
}

#[test]
fn cost_json_matches_library_model() {
    let output = cli()
        .args(["--format", "json", "cost", "--length", "250", "--bicycle", "100", "--flatness", "0"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["road_class"], "residential");
    assert_eq!(value["bike_lane"], "no");
    // No lane, neutral road and distance preferences: the length alone.
    assert!((value["cost"].as_f64().expect("cost") - 250.0).abs() < 1e-9);
}

#[test]
fn cost_rejects_unknown_bike_lane_value() {
    cli()
        .args(["cost", "--length", "10", "--bike-lane", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected yes or no"));
}
