//! HTTP-level integration tests for the movie endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use common::{body_json, delete, get, patch_json, patch_json_with_headers, post_json, post_raw};
use greenlight_db::models::movie::UpdateMovie;
use greenlight_db::Models;
use serde_json::json;
use sqlx::PgPool;

fn moana() -> serde_json::Value {
    json!({
        "title": "Moana",
        "year": 2016,
        "runtime": "107 mins",
        "genres": ["animation", "adventure"]
    })
}

async fn create(pool: &PgPool, body: serde_json::Value) -> i64 {
    let response = post_json(common::build_test_app(pool.clone()), "/v1/movies", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["movie"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_movie_returns_201_with_location(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/v1/movies", moana()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[LOCATION].to_str().unwrap().to_string();

    let json = body_json(response).await;
    let movie = &json["movie"];
    let id = movie["id"].as_i64().unwrap();
    assert_eq!(location, format!("/v1/movies/{id}"));
    assert_eq!(movie["title"], "Moana");
    assert_eq!(movie["year"], 2016);
    assert_eq!(movie["runtime"], "107 mins");
    assert_eq!(movie["genres"], json!(["animation", "adventure"]));
    assert_eq!(movie["version"], 1);
    assert!(movie["created_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_ignores_client_version(pool: PgPool) {
    let mut body = moana();
    body["version"] = json!(99);
    body["id"] = json!(7);

    let response = post_json(common::build_test_app(pool), "/v1/movies", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["movie"]["version"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_invalid_movie_returns_422(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/v1/movies",
        json!({"title": "", "year": 1500, "runtime": "-3 mins", "genres": ["a", "a"]}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["title"], "must be provided");
    assert_eq!(json["error"]["year"], "must be greater than 1888");
    assert_eq!(json["error"]["runtime"], "must be a positive integer");
    assert_eq!(json["error"]["genres"], "must not contain duplicate values");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_bad_runtime_returns_400(pool: PgPool) {
    let mut body = moana();
    body["runtime"] = json!("107 minutes");

    let response = post_json(common::build_test_app(pool.clone()), "/v1/movies", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("invalid runtime format"));

    let mut body = moana();
    body["runtime"] = json!(107);
    let response = post_json(common::build_test_app(pool), "/v1/movies", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_malformed_json_returns_400(pool: PgPool) {
    let response = post_raw(common::build_test_app(pool), "/v1/movies", "{\"title\": ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_movie_by_id(pool: PgPool) {
    let id = create(&pool, moana()).await;

    let response = get(common::build_test_app(pool), &format!("/v1/movies/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["movie"]["title"], "Moana");
    assert_eq!(json["movie"]["runtime"], "107 mins");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_or_malformed_id_returns_404(pool: PgPool) {
    for uri in ["/v1/movies/999999", "/v1/movies/0", "/v1/movies/-1", "/v1/movies/abc"] {
        let response = get(common::build_test_app(pool.clone()), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_updates_only_supplied_fields(pool: PgPool) {
    let id = create(&pool, moana()).await;

    let response = patch_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/movies/{id}"),
        json!({"runtime": "110 mins"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["movie"]["title"], "Moana");
    assert_eq!(json["movie"]["runtime"], "110 mins");
    assert_eq!(json["movie"]["version"], 2);

    let response = get(common::build_test_app(pool), &format!("/v1/movies/{id}")).await;
    assert_eq!(body_json(response).await["movie"]["version"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_invalid_returns_422_and_keeps_row(pool: PgPool) {
    let id = create(&pool, moana()).await;

    let response = patch_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/movies/{id}"),
        json!({"genres": []}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"]["genres"],
        "must contain at least 1 genre"
    );

    let response = get(common::build_test_app(pool), &format!("/v1/movies/{id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["movie"]["version"], 1);
    assert_eq!(json["movie"]["genres"], json!(["animation", "adventure"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_missing_movie_returns_404(pool: PgPool) {
    let response = patch_json(
        common::build_test_app(pool),
        "/v1/movies/999999",
        json!({"title": "Nothing"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_with_matching_expected_version_succeeds(pool: PgPool) {
    let id = create(&pool, moana()).await;

    let response = patch_json_with_headers(
        common::build_test_app(pool),
        &format!("/v1/movies/{id}"),
        &[("x-expected-version", "1")],
        json!({"year": 2017}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["movie"]["year"], 2017);
    assert_eq!(json["movie"]["version"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_after_concurrent_write_returns_409(pool: PgPool) {
    let id = create(&pool, moana()).await;

    // Another writer bumps the row to version 2 after the client read version 1.
    let models = Models::new(pool.clone());
    let mut movie = models.movies.get(id).await.unwrap();
    UpdateMovie {
        title: Some("Moana (Director's Cut)".to_string()),
        ..UpdateMovie::default()
    }
    .apply_to(&mut movie);
    models.movies.update(&mut movie).await.unwrap();
    assert_eq!(movie.version, 2);

    let response = patch_json_with_headers(
        common::build_test_app(pool.clone()),
        &format!("/v1/movies/{id}"),
        &[("x-expected-version", "1")],
        json!({"title": "Moana 2"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "EDIT_CONFLICT");
    assert_eq!(
        json["error"],
        "unable to update the record due to an edit conflict, please try again"
    );

    let response = get(common::build_test_app(pool), &format!("/v1/movies/{id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["movie"]["title"], "Moana (Director's Cut)");
    assert_eq!(json["movie"]["version"], 2);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_movie(pool: PgPool) {
    let id = create(&pool, moana()).await;
    let uri = format!("/v1/movies/{id}");

    let response = delete(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(common::build_test_app(pool), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

async fn seed(pool: &PgPool) {
    create(pool, moana()).await;
    create(
        pool,
        json!({"title": "Black Panther", "year": 2018, "runtime": "134 mins", "genres": ["action", "adventure"]}),
    )
    .await;
    create(
        pool,
        json!({"title": "Deadpool", "year": 2016, "runtime": "108 mins", "genres": ["action", "comedy"]}),
    )
    .await;
}

fn titles(json: &serde_json::Value) -> Vec<String> {
    json["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_defaults(pool: PgPool) {
    seed(&pool).await;

    let response = get(common::build_test_app(pool), "/v1/movies").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(titles(&json), vec!["Moana", "Black Panther", "Deadpool"]);
    assert_eq!(
        json["metadata"],
        json!({"current_page": 1, "page_size": 20, "first_page": 1, "last_page": 1, "total_records": 3})
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_sorts_and_pages(pool: PgPool) {
    seed(&pool).await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/v1/movies?genres=adventure&sort=-year",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(titles(&json), vec!["Black Panther", "Moana"]);

    let response = get(
        common::build_test_app(pool.clone()),
        "/v1/movies?title=deadpool",
    )
    .await;
    assert_eq!(titles(&body_json(response).await), vec!["Deadpool"]);

    let response = get(
        common::build_test_app(pool),
        "/v1/movies?page=2&page_size=2&sort=title",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(titles(&json), vec!["Moana"]);
    assert_eq!(json["metadata"]["last_page"], 2);
    assert_eq!(json["metadata"]["total_records"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_with_no_matches_returns_empty_metadata(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/v1/movies?title=nothing").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["movies"], json!([]));
    assert_eq!(json["metadata"], json!({}));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_rejects_bad_parameters(pool: PgPool) {
    let response = get(
        common::build_test_app(pool),
        "/v1/movies?page=abc&page_size=1000&sort=created_at",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["error"]["page"], "must be an integer value");
    assert_eq!(json["error"]["page_size"], "must be a maximum of 100");
    assert_eq!(json["error"]["sort"], "invalid sort value");
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route_returns_json_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/v1/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "the requested resource could not be found"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_wrong_method_returns_405(pool: PgPool) {
    let response = delete(common::build_test_app(pool), "/v1/movies").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
