use std::fmt::Write;

use serde::Serialize;
use serde_json::{json, Value};

use crate::network::NodeId;
use crate::routing::{RoutePlan, SearchMode};
use crate::store::SnappedNode;

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    /// A GeoJSON `Feature` with a `LineString` geometry.
    GeoJson,
}

/// Snapped endpoint within a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteEndpoint {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    /// Distance between the query point and the node it snapped to.
    pub snap_offset_m: f64,
}

impl From<&SnappedNode> for RouteEndpoint {
    fn from(node: &SnappedNode) -> Self {
        Self {
            id: node.id,
            lat: node.coord.lat,
            lon: node.coord.lon,
            snap_offset_m: node.distance_m,
        }
    }
}

/// Node visited along a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

/// Structured representation of a planned route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub mode: SearchMode,
    pub hops: usize,
    pub distance_m: f64,
    pub total_weight: f64,
    pub start: RouteEndpoint,
    pub goal: RouteEndpoint,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    pub fn from_plan(plan: &RoutePlan) -> Self {
        let steps = plan
            .nodes
            .iter()
            .zip(&plan.coordinates)
            .enumerate()
            .map(|(index, (id, coord))| RouteStep {
                index,
                id: *id,
                lat: coord.lat,
                lon: coord.lon,
            })
            .collect();

        Self {
            mode: plan.mode,
            hops: plan.hop_count(),
            distance_m: plan.distance_m,
            total_weight: plan.total_weight,
            start: RouteEndpoint::from(&plan.start),
            goal: RouteEndpoint::from(&plan.goal),
            steps,
        }
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::GeoJson => format!("{:#}\n", self.to_geojson()),
        }
    }

    /// GeoJSON coordinates are `[lon, lat]`.
    pub fn to_geojson(&self) -> Value {
        let coordinates: Vec<[f64; 2]> = self.steps.iter().map(|step| [step.lon, step.lat]).collect();
        json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates,
            },
            "properties": {
                "mode": self.mode,
                "hops": self.hops,
                "distance_m": self.distance_m,
                "total_weight": self.total_weight,
                "start_node": self.start.id,
                "goal_node": self.goal.id,
            },
        })
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} hops, {:.0} m, weight {:.1}, mode: {})",
            self.start.id, self.goal.id, self.hops, self.distance_m, self.total_weight, self.mode
        );
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "{:>4}: {:.6},{:.6} ({})",
                step.index, step.lat, step.lon, step.id
            );
        }
        buffer
    }
}
