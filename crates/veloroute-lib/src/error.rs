use std::path::PathBuf;

use thiserror::Error;

use crate::network::NodeId;

/// Convenient result alias for the veloroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A query point lies outside the configured service region.
    #[error("coordinate ({lat}, {lon}) is outside the service region")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// A preference component was outside `[0, 100]` before normalization.
    #[error("preference {name} = {value} is outside [0, 100]")]
    InvalidPreference { name: &'static str, value: f64 },

    /// The endpoints are further apart than the configured maximum span.
    #[error("endpoints are {distance_m:.0} m apart; the maximum span is {max_m:.0} m")]
    ExcessiveSpan { distance_m: f64, max_m: f64 },

    /// No graph node lies within the snap radius of a query point.
    #[error("no road node within {radius_m:.0} m of ({lat}, {lon})")]
    NoNearbyNode { lat: f64, lon: f64, radius_m: f64 },

    /// The store returned no edges around the search midpoint.
    #[error("no road edges within {radius_m:.0} m of the search midpoint")]
    EmptySubgraph { radius_m: f64 },

    /// The frontier was exhausted without reaching the destination.
    #[error("no route found between node {start} and node {goal}")]
    NoPathFound { start: NodeId, goal: NodeId },

    /// Road network database could not be located at the resolved path.
    #[error("road network database not found at {path}")]
    DatabaseNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the road network database")]
    ProjectDirsUnavailable,

    /// Raised when the database does not contain a recognised edge layout.
    #[error("unsupported road network schema; expected an edges table (optionally with nodes)")]
    UnsupportedSchema,

    /// Raised when an edge record cannot be used to build the graph.
    #[error("invalid edge row {start} -> {end}: {message}")]
    InvalidEdgeRow {
        start: NodeId,
        end: NodeId,
        message: String,
    },

    /// Raised when optimizer configuration values are unusable.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON (configuration) errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// `true` for the failure categories that the plain `optimize` boundary
    /// reports as an empty route rather than a store or configuration fault.
    pub fn is_no_route(&self) -> bool {
        matches!(
            self,
            Error::InvalidCoordinate { .. }
                | Error::InvalidPreference { .. }
                | Error::ExcessiveSpan { .. }
                | Error::NoNearbyNode { .. }
                | Error::EmptySubgraph { .. }
                | Error::NoPathFound { .. }
        )
    }

    /// Short machine-friendly label for the failure category.
    pub fn category(&self) -> &'static str {
        match self {
            Error::InvalidCoordinate { .. } => "invalid_coordinate",
            Error::InvalidPreference { .. } => "invalid_preference",
            Error::ExcessiveSpan { .. } => "excessive_span",
            Error::NoNearbyNode { .. } => "no_nearby_node",
            Error::EmptySubgraph { .. } => "empty_subgraph",
            Error::NoPathFound { .. } => "no_path_found",
            Error::DatabaseNotFound { .. } | Error::ProjectDirsUnavailable => "database",
            Error::UnsupportedSchema | Error::InvalidEdgeRow { .. } => "data",
            Error::InvalidConfig { .. } | Error::Json(_) => "config",
            Error::Sqlite(_) | Error::Csv(_) | Error::Io(_) => "store",
        }
    }
}
