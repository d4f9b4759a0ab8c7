//! Road-network records exchanged with the spatial store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::geodesy::Coordinate;

/// Identifier for a road node. Stable within a single query only.
pub type NodeId = i64;

/// A graph node with its position and optional elevation in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub coord: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl Node {
    pub fn new(id: NodeId, lat: f64, lon: f64) -> Self {
        Self {
            id,
            coord: Coordinate::new(lat, lon),
            elevation: None,
        }
    }
}

/// Road classification derived from the OSM `highway` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadClass {
    Motorway,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
    Cycleway,
    Other,
}

impl RoadClass {
    /// Classify a raw tag. Unknown and empty tags map to [`RoadClass::Other`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "motorway" | "motorway_link" | "trunk" | "trunk_link" => RoadClass::Motorway,
            "primary" | "primary_link" => RoadClass::Primary,
            "secondary" | "secondary_link" => RoadClass::Secondary,
            "tertiary" | "tertiary_link" => RoadClass::Tertiary,
            "residential" | "living_street" => RoadClass::Residential,
            "service" => RoadClass::Service,
            "cycleway" => RoadClass::Cycleway,
            _ => RoadClass::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoadClass::Motorway => "motorway",
            RoadClass::Primary => "primary",
            RoadClass::Secondary => "secondary",
            RoadClass::Tertiary => "tertiary",
            RoadClass::Residential => "residential",
            RoadClass::Service => "service",
            RoadClass::Cycleway => "cycleway",
            RoadClass::Other => "other",
        }
    }
}

impl fmt::Display for RoadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoadClass {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RoadClass::from_tag(s))
    }
}

/// Bike-lane presence as recorded by ingestion; `Unknown` is costed as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BikeLane {
    Yes,
    No,
    #[default]
    Unknown,
}

impl BikeLane {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "1" | "designated" | "lane" | "track" => BikeLane::Yes,
            "no" | "false" | "0" => BikeLane::No,
            _ => BikeLane::Unknown,
        }
    }

    pub fn is_present(self) -> bool {
        self == BikeLane::Yes
    }
}

impl From<bool> for BikeLane {
    fn from(present: bool) -> Self {
        if present {
            BikeLane::Yes
        } else {
            BikeLane::No
        }
    }
}

impl From<Option<bool>> for BikeLane {
    fn from(value: Option<bool>) -> Self {
        value.map(BikeLane::from).unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for BikeLane {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(BikeLane::from_tag).unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for RoadClass {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(RoadClass::from_tag)
            .unwrap_or(RoadClass::Other))
    }
}

/// One directed edge record as returned by the spatial store.
///
/// Field order matches the store's row layout, so CSV exports with a header
/// row deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub start_id: NodeId,
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_id: NodeId,
    pub end_lat: f64,
    pub end_lon: f64,
    pub distance_m: f64,
    pub road_class: RoadClass,
    pub bike_lane: BikeLane,
    pub incline_pct: f64,
}

impl EdgeRow {
    pub fn start_node(&self) -> Node {
        Node::new(self.start_id, self.start_lat, self.start_lon)
    }

    pub fn end_node(&self) -> Node {
        Node::new(self.end_id, self.end_lat, self.end_lon)
    }

    /// Geodesic length between the two endpoints, ignoring the road geometry.
    pub fn straight_line_m(&self) -> f64 {
        self.start_node().coord.distance_to(&self.end_node().coord)
    }
}
