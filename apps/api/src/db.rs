use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Creates a read-only connection pool over the job-listing database.
///
/// Connections are acquired per query and returned to the pool when the query
/// completes; the pool itself is closed during shutdown.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Connecting to job database at {database_url}...");

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid job database URL '{database_url}'"))?
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("Failed to open job database")?;

    info!("Job database connection pool established");
    Ok(pool)
}
