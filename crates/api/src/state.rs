use std::sync::Arc;

use greenlight_db::Models;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Repositories, each holding a handle to the shared connection pool.
    pub models: Models,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
