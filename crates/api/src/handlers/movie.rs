//! Handlers for the `/v1/movies` resource.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use greenlight_core::filters::{validate_filters, Filters, DEFAULT_PAGE_SIZE};
use greenlight_core::types::DbId;
use greenlight_core::validator::Validator;
use greenlight_db::models::movie::{validate_movie, CreateMovie, UpdateMovie, SORT_SAFELIST};
use greenlight_db::DbError;
use serde::Deserialize;

use super::ensure_valid;
use crate::error::{AppError, AppResult};
use crate::query::{read_csv, read_int, read_string};
use crate::response::{MovieListResponse, MovieResponse};
use crate::state::AppState;

/// Query parameters for `GET /v1/movies`.
///
/// Numbers stay as strings here; see [`crate::query::read_int`].
#[derive(Debug, Default, Deserialize)]
pub struct ListMoviesParams {
    pub title: Option<String>,
    /// Comma-separated genre list.
    pub genres: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort: Option<String>,
}

/// Optional request header carrying the version the client last read.
pub const EXPECTED_VERSION_HEADER: &str = "x-expected-version";

fn read_id(id: Result<Path<DbId>, PathRejection>) -> AppResult<DbId> {
    id.map(|Path(id)| id).map_err(|_| AppError::ResourceNotFound)
}

fn read_json<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(input)| input)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// POST /v1/movies
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateMovie>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let mut movie = read_json(payload)?.into_movie();

    let mut v = Validator::new();
    validate_movie(&mut v, &movie);
    ensure_valid(v)?;

    state.models.movies.insert(&mut movie).await?;
    tracing::info!(movie_id = movie.id, "Movie created");

    let location = format!("/v1/movies/{}", movie.id);
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(LOCATION, location)]),
        Json(MovieResponse { movie }),
    ))
}

/// GET /v1/movies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<MovieResponse>> {
    let id = read_id(id)?;
    let movie = state.models.movies.get(id).await?;
    Ok(Json(MovieResponse { movie }))
}

/// PATCH /v1/movies/{id}
///
/// Applies only the supplied fields, re-validates the merged movie, then
/// writes it back guarded by the version that was read. A concurrent writer
/// turns this into 409, as does an `X-Expected-Version` header that no longer
/// matches the stored version.
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<UpdateMovie>, JsonRejection>,
) -> AppResult<Json<MovieResponse>> {
    let id = read_id(id)?;
    let mut movie = state.models.movies.get(id).await?;

    if let Some(expected) = headers.get(EXPECTED_VERSION_HEADER) {
        if expected.as_bytes() != movie.version.to_string().as_bytes() {
            tracing::debug!(movie_id = id, stored = movie.version, "Stale expected version");
            return Err(DbError::EditConflict.into());
        }
    }

    read_json(payload)?.apply_to(&mut movie);

    let mut v = Validator::new();
    validate_movie(&mut v, &movie);
    ensure_valid(v)?;

    state.models.movies.update(&mut movie).await?;
    tracing::info!(movie_id = movie.id, version = movie.version, "Movie updated");

    Ok(Json(MovieResponse { movie }))
}

/// DELETE /v1/movies/{id}
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = read_id(id)?;
    state.models.movies.delete(id).await?;
    tracing::info!(movie_id = id, "Movie deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/movies?title=&genres=&page=&page_size=&sort=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListMoviesParams>,
) -> AppResult<Json<MovieListResponse>> {
    let mut v = Validator::new();

    let title = read_string(params.title.as_deref(), "");
    let genres = read_csv(params.genres.as_deref(), Vec::new());
    let filters = Filters {
        page: read_int(params.page.as_deref(), "page", 1, &mut v),
        page_size: read_int(
            params.page_size.as_deref(),
            "page_size",
            DEFAULT_PAGE_SIZE,
            &mut v,
        ),
        sort: read_string(params.sort.as_deref(), "id"),
        sort_safelist: SORT_SAFELIST,
    };

    validate_filters(&mut v, &filters);
    ensure_valid(v)?;

    let (movies, metadata) = state.models.movies.get_all(&title, &genres, &filters).await?;
    tracing::debug!(count = movies.len(), sort = %filters.sort, "Movie list");

    Ok(Json(MovieListResponse { movies, metadata }))
}
