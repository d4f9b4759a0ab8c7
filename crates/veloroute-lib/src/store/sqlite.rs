use std::fmt;
use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params, Connection, OpenFlags, Row};
use tracing::{debug, warn};

use super::{by_distance_then_id, SnappedNode, SpatialStore};
use crate::error::{Error, Result};
use crate::geodesy::Coordinate;
use crate::network::{BikeLane, EdgeRow, NodeId, RoadClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaVariant {
    /// One `edges` table carrying both endpoint coordinates.
    FlatEdges,
    /// `edges` referencing a `nodes` table by id.
    NodeJoin,
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SchemaVariant::FlatEdges => "flat_edges",
            SchemaVariant::NodeJoin => "node_join",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeColumns {
    table: &'static str,
    id: &'static str,
    lat: &'static str,
    lon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SchemaDefinition {
    variant: SchemaVariant,
    edges_table: &'static str,
    start_id_column: &'static str,
    end_id_column: &'static str,
    /// Start/end coordinate columns on the edges table (flat layout only).
    start_coord_columns: Option<(&'static str, &'static str)>,
    end_coord_columns: Option<(&'static str, &'static str)>,
    nodes: Option<NodeColumns>,
    distance_column: Option<&'static str>,
    road_class_column: Option<&'static str>,
    bike_lane_column: Option<&'static str>,
    incline_column: Option<&'static str>,
}

impl SchemaVariant {
    fn definition(self) -> SchemaDefinition {
        let base = SchemaDefinition {
            variant: self,
            edges_table: "edges",
            start_id_column: "start_node_id",
            end_id_column: "end_node_id",
            start_coord_columns: None,
            end_coord_columns: None,
            nodes: None,
            distance_column: Some("distance"),
            road_class_column: Some("highway_group"),
            bike_lane_column: Some("bicycle_group"),
            incline_column: Some("incline"),
        };
        match self {
            SchemaVariant::FlatEdges => SchemaDefinition {
                start_coord_columns: Some(("start_node_lat", "start_node_lon")),
                end_coord_columns: Some(("end_node_lat", "end_node_lon")),
                ..base
            },
            SchemaVariant::NodeJoin => SchemaDefinition {
                nodes: Some(NodeColumns {
                    table: "nodes",
                    id: "id",
                    lat: "lat",
                    lon: "lon",
                }),
                ..base
            },
        }
    }
}

/// Read-only [`SpatialStore`] over a SQLite road-network database.
///
/// Two layouts are detected at open time: a flat `edges` table with
/// `start_node_lat`/`start_node_lon`/`end_node_lat`/`end_node_lon` columns, or
/// `edges(start_node_id, end_node_id, ...)` joined to `nodes(id, lat, lon)`.
/// The attribute columns `distance`, `highway_group`, `bicycle_group` and
/// `incline` are optional.
pub struct SqliteStore {
    connection: Connection,
    schema: SchemaDefinition,
}

impl fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStore")
            .field("schema", &self.schema.variant)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open an existing database read-only and detect its layout.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DatabaseNotFound {
                path: path.to_path_buf(),
            });
        }
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let store = Self::from_connection(connection)?;
        debug!(schema = %store.schema.variant, path = %path.display(), "opened road network");
        Ok(store)
    }

    /// Wrap an already-open connection.
    pub fn from_connection(connection: Connection) -> Result<Self> {
        let schema = detect_schema(&connection)?;
        Ok(Self { connection, schema })
    }

    /// Name of the detected layout (`flat_edges` or `node_join`).
    pub fn schema_name(&self) -> String {
        self.schema.variant.to_string()
    }

    fn start_coord_expr(&self) -> (String, String) {
        match (self.schema.start_coord_columns, self.schema.nodes) {
            (Some((lat, lon)), _) => (format!("e.{lat}"), format!("e.{lon}")),
            (None, Some(nodes)) => (
                format!("s.{lat}", lat = nodes.lat),
                format!("s.{lon}", lon = nodes.lon),
            ),
            (None, None) => ("NULL".to_string(), "NULL".to_string()),
        }
    }

    fn nearest_candidates(
        &self,
        origin: &Coordinate,
        radius_m: f64,
    ) -> Result<Vec<(NodeId, Coordinate)>> {
        let schema = &self.schema;
        let (dlat, dlon) = origin.degree_window(radius_m);

        let sql = match schema.nodes {
            Some(nodes) => format!(
                "SELECT n.{id}, n.{lat}, n.{lon} FROM {table} n \
                 WHERE n.{lat} BETWEEN ?1 AND ?2 AND n.{lon} BETWEEN ?3 AND ?4 \
                 AND EXISTS (SELECT 1 FROM {edges} e WHERE e.{start} = n.{id})",
                id = nodes.id,
                lat = nodes.lat,
                lon = nodes.lon,
                table = nodes.table,
                edges = schema.edges_table,
                start = schema.start_id_column,
            ),
            None => {
                let (lat, lon) = self.start_coord_expr();
                format!(
                    "SELECT DISTINCT e.{start}, {lat}, {lon} FROM {edges} e \
                     WHERE {lat} BETWEEN ?1 AND ?2 AND {lon} BETWEEN ?3 AND ?4",
                    start = schema.start_id_column,
                    edges = schema.edges_table,
                )
            }
        };

        let mut stmt = self.connection.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                origin.lat - dlat,
                origin.lat + dlat,
                origin.lon - dlon,
                origin.lon + dlon
            ],
            |row| {
                Ok((
                    row.get::<_, NodeId>(0)?,
                    Coordinate::new(row.get(1)?, row.get(2)?),
                ))
            },
        )?;

        let mut candidates = Vec::new();
        for row in rows {
            candidates.push(row?);
        }
        Ok(candidates)
    }

    fn edge_sql(&self) -> String {
        let schema = &self.schema;
        let (start_lat, start_lon) = self.start_coord_expr();
        let optional = |column: Option<&'static str>| {
            column
                .map(|column| format!("e.{column}"))
                .unwrap_or_else(|| "NULL".to_string())
        };

        let (end_lat, end_lon, joins) = match (schema.end_coord_columns, schema.nodes) {
            (Some((lat, lon)), _) => (format!("e.{lat}"), format!("e.{lon}"), String::new()),
            (None, Some(nodes)) => (
                format!("t.{lat}", lat = nodes.lat),
                format!("t.{lon}", lon = nodes.lon),
                format!(
                    " JOIN {table} s ON s.{id} = e.{start} LEFT JOIN {table} t ON t.{id} = e.{end}",
                    table = nodes.table,
                    id = nodes.id,
                    start = schema.start_id_column,
                    end = schema.end_id_column,
                ),
            ),
            (None, None) => ("NULL".to_string(), "NULL".to_string(), String::new()),
        };

        format!(
            "SELECT e.{start}, {start_lat}, {start_lon}, e.{end}, {end_lat}, {end_lon}, \
             {distance}, {road_class}, {bike_lane}, {incline} \
             FROM {edges} e{joins} \
             WHERE {start_lat} BETWEEN ?1 AND ?2 AND {start_lon} BETWEEN ?3 AND ?4 \
             ORDER BY e.rowid",
            start = schema.start_id_column,
            end = schema.end_id_column,
            distance = optional(schema.distance_column),
            road_class = optional(schema.road_class_column),
            bike_lane = optional(schema.bike_lane_column),
            incline = optional(schema.incline_column),
            edges = schema.edges_table,
        )
    }
}

/// Raw row before endpoint validation.
struct RawEdge {
    start_id: NodeId,
    start: Coordinate,
    end_id: NodeId,
    end: Option<Coordinate>,
    distance_m: Option<f64>,
    road_class: RoadClass,
    bike_lane: BikeLane,
    incline_pct: f64,
}

fn row_to_raw_edge(row: &Row<'_>) -> rusqlite::Result<RawEdge> {
    let end = match (row.get::<_, Option<f64>>(4)?, row.get::<_, Option<f64>>(5)?) {
        (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
        _ => None,
    };
    Ok(RawEdge {
        start_id: row.get(0)?,
        start: Coordinate::new(row.get(1)?, row.get(2)?),
        end_id: row.get(3)?,
        end,
        distance_m: row.get(6)?,
        road_class: road_class_from_value(row.get(7)?),
        bike_lane: bike_lane_from_value(row.get(8)?),
        incline_pct: row.get::<_, Option<f64>>(9)?.unwrap_or(0.0),
    })
}

fn road_class_from_value(value: Value) -> RoadClass {
    match value {
        Value::Text(tag) => RoadClass::from_tag(&tag),
        _ => RoadClass::Other,
    }
}

/// Bike-lane flags are stored either as tags or as 0/1 integers.
fn bike_lane_from_value(value: Value) -> BikeLane {
    match value {
        Value::Text(tag) => BikeLane::from_tag(&tag),
        Value::Integer(flag) => BikeLane::from(flag != 0),
        Value::Real(flag) => BikeLane::from(flag != 0.0),
        Value::Null | Value::Blob(_) => BikeLane::Unknown,
    }
}

impl RawEdge {
    fn into_edge_row(self) -> Result<Option<EdgeRow>> {
        let Some(end) = self.end else {
            return Ok(None);
        };
        let distance_m = match self.distance_m {
            Some(distance) if distance.is_finite() && distance >= 0.0 => distance,
            Some(distance) => {
                return Err(Error::InvalidEdgeRow {
                    start: self.start_id,
                    end: self.end_id,
                    message: format!("distance must be a non-negative number, got {distance}"),
                })
            }
            None => self.start.distance_to(&end),
        };
        Ok(Some(EdgeRow {
            start_id: self.start_id,
            start_lat: self.start.lat,
            start_lon: self.start.lon,
            end_id: self.end_id,
            end_lat: end.lat,
            end_lon: end.lon,
            distance_m,
            road_class: self.road_class,
            bike_lane: self.bike_lane,
            incline_pct: self.incline_pct,
        }))
    }
}

impl SpatialStore for SqliteStore {
    fn nearest_node(&self, lat: f64, lon: f64, max_meters: f64) -> Result<Option<SnappedNode>> {
        let origin = Coordinate::new(lat, lon);
        if !origin.is_finite() || !(max_meters >= 0.0) {
            return Ok(None);
        }

        let best = self
            .nearest_candidates(&origin, max_meters)?
            .into_iter()
            .map(|(id, coord)| (id, coord, origin.distance_to(&coord)))
            .filter(|(_, _, distance)| *distance <= max_meters)
            .min_by(|a, b| by_distance_then_id(&(a.0, a.2), &(b.0, b.2)));

        Ok(best.map(|(id, coord, distance_m)| SnappedNode {
            id,
            coord,
            distance_m,
        }))
    }

    fn edges_within_radius(
        &self,
        lat: f64,
        lon: f64,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<EdgeRow>> {
        let origin = Coordinate::new(lat, lon);
        if !origin.is_finite() || !(radius_m >= 0.0) || limit == 0 {
            return Ok(Vec::new());
        }

        let (dlat, dlon) = origin.degree_window(radius_m);
        let sql = self.edge_sql();
        let mut stmt = self.connection.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                origin.lat - dlat,
                origin.lat + dlat,
                origin.lon - dlon,
                origin.lon + dlon
            ],
            row_to_raw_edge,
        )?;

        let mut within = Vec::new();
        let mut skipped_edges = 0usize;
        for row in rows {
            let raw = row?;
            let distance = origin.distance_to(&raw.start);
            if distance > radius_m {
                continue;
            }
            match raw.into_edge_row()? {
                Some(edge) => within.push((distance, edge)),
                None => skipped_edges += 1,
            }
        }

        if skipped_edges > 0 {
            warn!(skipped_edges, "ignored edges referencing unknown nodes");
        }

        // Stable sort keeps rowid order between edges of the same start node.
        within.sort_by(|a, b| {
            by_distance_then_id(&(a.1.start_id, a.0), &(b.1.start_id, b.0))
        });
        Ok(within
            .into_iter()
            .take(limit)
            .map(|(_, edge)| edge)
            .collect())
    }
}

fn detect_schema(connection: &Connection) -> Result<SchemaDefinition> {
    if let Some(schema) = detect_flat_schema(connection)? {
        return Ok(schema);
    }
    if let Some(schema) = detect_node_join_schema(connection)? {
        return Ok(schema);
    }

    Err(Error::UnsupportedSchema)
}

fn detect_flat_schema(connection: &Connection) -> Result<Option<SchemaDefinition>> {
    let mut schema = SchemaVariant::FlatEdges.definition();

    if !table_exists(connection, schema.edges_table)? {
        return Ok(None);
    }

    let mut required = vec![schema.start_id_column, schema.end_id_column];
    for (lat, lon) in [schema.start_coord_columns, schema.end_coord_columns]
        .into_iter()
        .flatten()
    {
        required.push(lat);
        required.push(lon);
    }
    if !table_has_columns(connection, schema.edges_table, &required)? {
        return Ok(None);
    }

    drop_missing_attributes(connection, &mut schema)?;
    Ok(Some(schema))
}

fn detect_node_join_schema(connection: &Connection) -> Result<Option<SchemaDefinition>> {
    let mut schema = SchemaVariant::NodeJoin.definition();
    let Some(nodes) = schema.nodes else {
        return Ok(None);
    };

    if !table_exists(connection, schema.edges_table)? || !table_exists(connection, nodes.table)? {
        return Ok(None);
    }

    if !table_has_columns(
        connection,
        schema.edges_table,
        &[schema.start_id_column, schema.end_id_column],
    )? {
        return Ok(None);
    }

    if !table_has_columns(connection, nodes.table, &[nodes.id, nodes.lat, nodes.lon])? {
        return Ok(None);
    }

    drop_missing_attributes(connection, &mut schema)?;
    Ok(Some(schema))
}

fn drop_missing_attributes(connection: &Connection, schema: &mut SchemaDefinition) -> Result<()> {
    let table = schema.edges_table;
    for column in [
        &mut schema.distance_column,
        &mut schema.road_class_column,
        &mut schema.bike_lane_column,
        &mut schema.incline_column,
    ] {
        if let Some(name) = *column {
            if !table_has_columns(connection, table, &[name])? {
                *column = None;
            }
        }
    }
    Ok(())
}

fn table_exists(connection: &Connection, table: &str) -> Result<bool> {
    let mut stmt = connection
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

fn table_has_columns(connection: &Connection, table: &str, required: &[&str]) -> Result<bool> {
    let pragma = format!("PRAGMA table_info('{table}')");
    let mut stmt = connection.prepare(&pragma)?;
    let mut rows = stmt.query([])?;

    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        columns.push(name);
    }

    Ok(required.iter().all(|required| {
        columns
            .iter()
            .any(|column| column.eq_ignore_ascii_case(required))
    }))
}
