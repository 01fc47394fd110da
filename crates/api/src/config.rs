use std::str::FromStr;
use std::time::Duration;

use greenlight_db::PoolConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4000`).
    pub port: u16,
    /// Deployment environment reported by the health check.
    pub env: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Connection pool bounds.
    pub pool: PoolConfig,
    /// Per-statement deadline for repository calls.
    pub query_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                  |
    /// |---------------------------|--------------------------|
    /// | `HOST`                    | `0.0.0.0`                |
    /// | `PORT`                    | `4000`                   |
    /// | `APP_ENV`                 | `development`            |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                     |
    /// | `DATABASE_URL`            | (required)               |
    /// | `DB_MAX_OPEN_CONNS`       | `25`                     |
    /// | `DB_MIN_IDLE_CONNS`       | `0`                      |
    /// | `DB_MAX_IDLE_TIME_SECS`   | `900`                    |
    /// | `DB_CONNECT_TIMEOUT_SECS` | `5`                      |
    /// | `DB_QUERY_TIMEOUT_SECS`   | `3`                      |
    ///
    /// `DB_MIN_IDLE_CONNS` is a floor on warm connections, not a cap on idle
    /// ones; see [`PoolConfig::min_idle_conns`].
    ///
    /// Panics on a missing `DATABASE_URL` or an unparsable value; startup
    /// should fail fast on misconfiguration.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 4000);
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30);

        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let defaults = PoolConfig::default();
        let pool = PoolConfig {
            max_open_conns: env_or("DB_MAX_OPEN_CONNS", defaults.max_open_conns),
            min_idle_conns: env_or("DB_MIN_IDLE_CONNS", defaults.min_idle_conns),
            max_idle_time: Duration::from_secs(env_or(
                "DB_MAX_IDLE_TIME_SECS",
                defaults.max_idle_time.as_secs(),
            )),
            connect_timeout: Duration::from_secs(env_or(
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )),
        };

        let query_timeout = Duration::from_secs(env_or("DB_QUERY_TIMEOUT_SECS", 3));

        Self {
            host,
            port,
            env,
            cors_origins,
            request_timeout_secs,
            database_url,
            pool,
            query_timeout,
        }
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
