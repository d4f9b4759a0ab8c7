use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::{debug, info, warn};

use super::{by_distance_then_id, SnappedNode, SpatialStore};
use crate::error::Result;
use crate::geodesy::Coordinate;
use crate::network::{EdgeRow, NodeId};

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Chord-radius inflation covering the sphere/ellipsoid mismatch.
const CHORD_MARGIN: f64 = 1.01;

#[derive(Debug, Clone)]
struct IndexedNode {
    id: NodeId,
    coord: Coordinate,
    /// Indices into `InMemoryStore::edges` of rows starting at this node.
    edges: Vec<usize>,
}

/// Edge rows held in memory with a KD-tree over their start nodes.
///
/// Positions are projected to Earth-centred Cartesian coordinates so the tree
/// can answer radius queries in meters; candidates are then re-checked with the
/// geodesic distance.
pub struct InMemoryStore {
    /// Items index into `positions`.
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    /// Node indices per distinct start position; coincident nodes share a slot.
    positions: Vec<Vec<usize>>,
    nodes: Vec<IndexedNode>,
    edges: Vec<EdgeRow>,
}

impl InMemoryStore {
    /// Index a set of edge rows. The first coordinate seen for a start node wins.
    pub fn from_rows(rows: impl IntoIterator<Item = EdgeRow>) -> Self {
        let mut nodes: Vec<IndexedNode> = Vec::new();
        let mut id_to_index: HashMap<NodeId, usize> = HashMap::new();
        let mut edges = Vec::new();

        for row in rows {
            let edge_index = edges.len();
            let node_index = *id_to_index.entry(row.start_id).or_insert_with(|| {
                nodes.push(IndexedNode {
                    id: row.start_id,
                    coord: Coordinate::new(row.start_lat, row.start_lon),
                    edges: Vec::new(),
                });
                nodes.len() - 1
            });
            nodes[node_index].edges.push(edge_index);
            edges.push(row);
        }

        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        let mut positions: Vec<Vec<usize>> = Vec::new();
        let mut slots: HashMap<[u64; 3], usize> = HashMap::new();
        let mut skipped = 0usize;
        for (index, node) in nodes.iter().enumerate() {
            if !node.coord.is_finite() {
                skipped += 1;
                continue;
            }
            let point = node.coord.to_cartesian();
            let slot = *slots.entry(point.map(f64::to_bits)).or_insert_with(|| {
                tree.add(&point, positions.len());
                positions.push(Vec::new());
                positions.len() - 1
            });
            positions[slot].push(index);
        }
        if skipped > 0 {
            warn!(skipped, "start nodes with non-finite coordinates left unindexed");
        }

        info!(
            node_count = nodes.len(),
            distinct_positions = positions.len(),
            edge_count = edges.len(),
            "built in-memory road network"
        );

        Self {
            tree,
            positions,
            nodes,
            edges,
        }
    }

    /// Load rows from CSV with a header matching [`EdgeRow`]'s field names.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let rows = csv_reader
            .deserialize::<EdgeRow>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::from_rows(rows))
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading edge rows from csv");
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }

    /// Number of distinct start nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Start nodes within `radius_m` of `origin` as `(node index, distance)`,
    /// nearest first.
    fn nodes_within(&self, origin: &Coordinate, radius_m: f64) -> Vec<(usize, f64)> {
        if self.nodes.is_empty() || !origin.is_finite() || !(radius_m >= 0.0) {
            return Vec::new();
        }

        let chord = radius_m * CHORD_MARGIN;
        let candidates = self
            .tree
            .within::<SquaredEuclidean>(&origin.to_cartesian(), chord * chord);

        let mut hits: Vec<(NodeId, f64, usize)> = candidates
            .into_iter()
            .filter_map(|neighbour| {
                let members = &self.positions[neighbour.item];
                let first = &self.nodes[*members.first()?];
                let distance = origin.distance_to(&first.coord);
                (distance <= radius_m).then_some((members, distance))
            })
            .flat_map(|(members, distance)| {
                members
                    .iter()
                    .map(move |&index| (self.nodes[index].id, distance, index))
            })
            .collect();

        hits.sort_by(|a, b| by_distance_then_id(&(a.0, a.1), &(b.0, b.1)));
        hits.into_iter()
            .map(|(_, distance, index)| (index, distance))
            .collect()
    }
}

impl SpatialStore for InMemoryStore {
    fn nearest_node(&self, lat: f64, lon: f64, max_meters: f64) -> Result<Option<SnappedNode>> {
        let origin = Coordinate::new(lat, lon);
        Ok(self
            .nodes_within(&origin, max_meters)
            .first()
            .map(|&(index, distance_m)| {
                let node = &self.nodes[index];
                SnappedNode {
                    id: node.id,
                    coord: node.coord,
                    distance_m,
                }
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
        Ok(self
            .nodes_within(&origin, radius_m)
            .into_iter()
            .flat_map(|(index, _)| self.nodes[index].edges.iter())
            .take(limit)
            .map(|&edge| self.edges[edge].clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{BikeLane, RoadClass};
    use crate::test_helpers::EdgeRowBuilder;

    fn row(start: (NodeId, f64, f64), end: (NodeId, f64, f64)) -> EdgeRow {
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
        row
    }

    fn sample() -> InMemoryStore {
        let a = (1, 42.3600, -71.0900);
        let b = (2, 42.3610, -71.0900);
        let c = (3, 42.3700, -71.0900);
        InMemoryStore::from_rows(vec![row(a, b), row(b, a), row(b, c), row(c, b)])
    }

    #[test]
    fn nearest_node_respects_max_distance() {
        let store = sample();
        let hit = store
            .nearest_node(42.3601, -71.0900, 100.0)
            .expect("query")
            .expect("node within range");
        assert_eq!(hit.id, 1);
        assert!(hit.distance_m < 20.0);

        assert!(store
            .nearest_node(42.3650, -71.0900, 100.0)
            .expect("query")
            .is_none());
    }

    #[test]
    fn edges_are_returned_nearest_first_and_limited() {
        let store = sample();
        let edges = store
            .edges_within_radius(42.3600, -71.0900, 200.0, 10)
            .expect("query");
        let starts: Vec<NodeId> = edges.iter().map(|edge| edge.start_id).collect();
        assert_eq!(starts, vec![1, 2, 2]);

        let limited = store
            .edges_within_radius(42.3600, -71.0900, 5_000.0, 2)
            .expect("query");
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn empty_store_answers_nothing() {
        let store = InMemoryStore::from_rows(Vec::new());
        assert!(store.is_empty());
        assert!(store.nearest_node(42.0, -71.0, 1_000.0).expect("query").is_none());
        assert!(store
            .edges_within_radius(42.0, -71.0, 1_000.0, 10)
            .expect("query")
            .is_empty());
    }

    #[test]
    fn loads_rows_from_csv() {
        let data = "\
start_id,start_lat,start_lon,end_id,end_lat,end_lon,distance_m,road_class,bike_lane,incline_pct
1,42.36,-71.09,2,42.361,-71.09,111.0,cycleway,yes,0.5
2,42.361,-71.09,1,42.36,-71.09,111.0,,,-0.5
";
        let store = InMemoryStore::from_csv_reader(data.as_bytes()).expect("csv parses");
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.edge_count(), 2);
        let edges = store
            .edges_within_radius(42.36, -71.09, 50.0, 10)
            .expect("query");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].road_class, RoadClass::Cycleway);
        assert_eq!(edges[0].bike_lane, BikeLane::Yes);
    }

    #[test]
    fn csv_tolerates_missing_and_unknown_tags() {
        let data = "\
start_id,start_lat,start_lon,end_id,end_lat,end_lon,distance_m,road_class,bike_lane,incline_pct
1,42.36,-71.09,2,42.361,-71.09,111.0,,,0.0
3,42.3601,-71.09,1,42.36,-71.09,11.0,Footway,sometimes,0.0
4,42.3602,-71.09,1,42.36,-71.09,22.0,Trunk_Link,NO,0.0
";
        let store = InMemoryStore::from_csv_reader(data.as_bytes()).expect("csv parses");
        let edges = store
            .edges_within_radius(42.36, -71.09, 50.0, 10)
            .expect("query");
        let by_start = |id: NodeId| {
            edges
                .iter()
                .find(|edge| edge.start_id == id)
                .map(|edge| (edge.road_class, edge.bike_lane))
        };
        assert_eq!(by_start(1), Some((RoadClass::Other, BikeLane::Unknown)));
        assert_eq!(by_start(3), Some((RoadClass::Other, BikeLane::Unknown)));
        assert_eq!(by_start(4), Some((RoadClass::Motorway, BikeLane::No)));
    }

    #[test]
    fn coincident_start_nodes_share_one_slot() {
        let rows: Vec<EdgeRow> = (0..100)
            .map(|id| EdgeRowBuilder::new((id, 42.36, -71.1), (1_000 + id, 42.361, -71.1)).build())
            .collect();
        let store = InMemoryStore::from_rows(rows);
        assert_eq!(store.node_count(), 100);

        let nearest = store.nearest_node(42.36, -71.1, 5.0).expect("query");
        assert_eq!(nearest.map(|node| node.id), Some(0));
        let edges = store
            .edges_within_radius(42.36, -71.1, 5.0, 1_000)
            .expect("query");
        assert_eq!(edges.len(), 100);
        assert!(edges.windows(2).all(|pair| pair[0].start_id < pair[1].start_id));
    }

    #[test]
    fn one_store_serves_queries_from_many_threads() {
        let store = sample();
        let nearest: Vec<Option<NodeId>> = std::thread::scope(|scope| {
            let handles: Vec<_> = [42.3600, 42.3610, 42.3700]
                .into_iter()
                .map(|lat| {
                    let store = &store;
                    scope.spawn(move || {
                        store
                            .nearest_node(lat, -71.0900, 10.0)
                            .expect("query")
                            .map(|node| node.id)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("thread"))
                .collect()
        });
        assert_eq!(nearest, vec![Some(1), Some(2), Some(3)]);
    }
}
