//! PostgreSQL persistence for Greenlight.
//!
//! Owns pool construction, the bundled migrations, the `movies` model and its
//! repository.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod repositories;

pub use error::DbError;
pub use repositories::Models;

pub type DbPool = sqlx::PgPool;

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum open (in-use + idle) connections.
    pub max_open_conns: u32,
    /// Idle connections the pool keeps warm.
    ///
    /// Stands in for a cap on idle connections, which sqlx does not offer.
    /// This is a floor, not a ceiling: idle connections above it are closed
    /// only once they exceed `max_idle_time`.
    pub min_idle_conns: u32,
    /// How long a connection may sit idle before it is closed.
    pub max_idle_time: Duration,
    /// Deadline for establishing a connection, including the startup ping.
    pub connect_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_open_conns: 25,
            min_idle_conns: 0,
            max_idle_time: Duration::from_secs(15 * 60),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Create a connection pool from a database URL.
///
/// Connects eagerly so an unreachable database fails at startup rather than
/// on the first request.
pub async fn create_pool(database_url: &str, config: &PoolConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_open_conns)
        .min_connections(config.min_idle_conns.min(config.max_open_conns))
        .idle_timeout(config.max_idle_time)
        .acquire_timeout(config.connect_timeout)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the migrations bundled under `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
