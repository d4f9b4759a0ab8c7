//! Subcommand handlers.
//!
//! `main.rs` parses arguments and resolves the store; each handler here runs
//! one query and writes its result through [`crate::output`].

pub mod cost;
pub mod route;
pub mod snap;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use veloroute_lib::{
    resolve_database_path, Error as LibError, InMemoryStore, SpatialStore, SqliteStore,
};

/// The six rider preferences, each a percentage in `[0, 100]`.
#[derive(Args, Debug, Clone, Copy, PartialEq)]
pub struct PreferenceArgs {
    /// Preference for flat terrain.
    #[arg(long, default_value_t = 50.0, value_name = "0-100")]
    pub flatness: f64,
    /// Preference for roads with bike lanes.
    #[arg(long, default_value_t = 50.0, value_name = "0-100")]
    pub bicycle: f64,
    /// Tolerance for longer distances (higher scales distance up).
    #[arg(long, default_value_t = 50.0, value_name = "0-100")]
    pub distance: f64,
    /// Preference for motorways.
    #[arg(long, default_value_t = 50.0, value_name = "0-100")]
    pub motorway: f64,
    /// Preference for primary roads.
    #[arg(long, default_value_t = 50.0, value_name = "0-100")]
    pub highway: f64,
    /// Preference for residential and service streets.
    #[arg(long, default_value_t = 50.0, value_name = "0-100")]
    pub residential: f64,
}

impl PreferenceArgs {
    /// Raw percentages in the library's input order.
    pub fn to_array(self) -> [f64; 6] {
        [
            self.flatness,
            self.bicycle,
            self.distance,
            self.motorway,
            self.highway,
            self.residential,
        ]
    }
}

/// Open the road network: a CSV edge list when given, otherwise the SQLite
/// database resolved from `--db`, `VELOROUTE_DB`, or the platform data directory.
pub fn open_store(db: Option<&Path>, edges_csv: Option<&Path>) -> Result<Box<dyn SpatialStore>> {
    if let Some(csv) = edges_csv {
        let store = InMemoryStore::from_csv_path(csv)
            .with_context(|| format!("failed to load edges from {}", csv.display()))?;
        return Ok(Box::new(store));
    }

    let path = resolve_database_path(db)?;
    let store = SqliteStore::open(&path)
        .with_context(|| format!("failed to open road network at {}", path.display()))?;
    info!(path = %path.display(), schema = %store.schema_name(), "opened road network");
    Ok(Box::new(store))
}

/// Next step to suggest for a library failure, if one helps.
pub fn failure_hint(error: &LibError) -> Option<&'static str> {
    match error {
        LibError::InvalidCoordinate { .. } => {
            Some("Both points must lie inside the configured service region.")
        }
        LibError::InvalidPreference { .. } => Some("Preferences are percentages from 0 to 100."),
        LibError::ExcessiveSpan { .. } => {
            Some("Split the trip into shorter legs or raise VELOROUTE_MAX_SPAN_M.")
        }
        LibError::NoNearbyNode { .. } => {
            Some("Move the point closer to a road or raise VELOROUTE_SNAP_RADIUS_M.")
        }
        LibError::EmptySubgraph { .. } | LibError::NoPathFound { .. } => {
            Some("The road network may be disconnected here; try nearby points or another mode.")
        }
        LibError::DatabaseNotFound { .. } => {
            Some("Pass --db, set VELOROUTE_DB, or load a CSV edge list with --edges-csv.")
        }
        _ => None,
    }
}
