pub mod health;
pub mod movie;

use axum::Router;

use crate::state::AppState;

/// Build the `/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /healthcheck                                     service + database health
///
/// /movies                                          list, create
/// /movies/{id}                                     get, patch, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/movies", movie::router())
}
