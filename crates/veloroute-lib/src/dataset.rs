use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::{Error, Result};

/// Default filename for the road network database.
pub const DATABASE_FILENAME: &str = "road_network.db";

/// Environment variable naming a database file or the directory holding one.
pub const DATABASE_ENV: &str = "VELOROUTE_DB";

/// Resolve the default database location using platform-specific project directories.
pub fn default_database_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("org", "veloroute", "veloroute").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATABASE_FILENAME))
}

/// Locate the road network database.
///
/// Resolution order:
/// 1. Explicit `target` argument when provided.
/// 2. `VELOROUTE_DB` environment variable.
/// 3. Platform-specific project data directory.
///
/// A directory resolves to `road_network.db` inside it. The resolved file must exist.
pub fn resolve_database_path(target: Option<&Path>) -> Result<PathBuf> {
    let resolved = if let Some(explicit) = target {
        canonical_database_path(explicit)
    } else if let Some(env_path) = env::var_os(DATABASE_ENV) {
        canonical_database_path(Path::new(&env_path))
    } else {
        default_database_path()?
    };

    debug!(path = %resolved.display(), "resolved road network database");
    if resolved.is_file() {
        Ok(resolved)
    } else {
        Err(Error::DatabaseNotFound { path: resolved })
    }
}

fn canonical_database_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.join(DATABASE_FILENAME);
    }
    path.to_path_buf()
}
