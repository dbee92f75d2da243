use std::path::PathBuf;

/// Returns the default path of the timetracker database
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/timetracker/timetracker.db`
/// - **Linux**: `~/.local/share/timetracker/timetracker.db`
/// - **Windows**: `%LOCALAPPDATA%\timetracker\timetracker.db`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("timetracker").join("timetracker.db"))
}

/// Open (creating and migrating if needed) the database at `path`, or at the
/// platform default when no path is configured.
pub fn initialize_database(
    path: Option<PathBuf>,
) -> anyhow::Result<std::sync::Arc<crate::database::Database>> {
    let db_path = match path {
        Some(path) => path,
        None => get_db_path()?,
    };

    let db = crate::database::Database::new(&db_path)?;
    tracing::info!("Database initialized at: {}", db_path.display());
    Ok(std::sync::Arc::new(db))
}
