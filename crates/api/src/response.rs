//! Shared response envelope types for API handlers.
//!
//! Every payload is wrapped in a named envelope (`{ "movie": ... }`,
//! `{ "movies": ..., "metadata": ... }`) so clients can rely on a stable
//! top-level key per resource.

use greenlight_core::filters::Metadata;
use greenlight_db::models::movie::Movie;
use serde::Serialize;

/// `{ "movie": ... }` envelope for single-movie responses.
#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub movie: Movie,
}

/// `{ "movies": [...], "metadata": { ... } }` envelope for list responses.
#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<Movie>,
    pub metadata: Metadata,
}
