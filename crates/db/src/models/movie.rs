//! Movie entity model, DTOs and validation.

use chrono::Datelike;
use greenlight_core::runtime::Runtime;
use greenlight_core::types::{DbId, Timestamp, Version};
use greenlight_core::validator::{unique, Validator};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Earliest accepted release year.
pub const MIN_YEAR: i32 = 1888;

/// Longest accepted title, in bytes.
pub const MAX_TITLE_BYTES: usize = 500;

/// Maximum number of genres per movie.
pub const MAX_GENRES: usize = 5;

/// Sort keys accepted by the movie list query.
pub const SORT_SAFELIST: &[&str] = &[
    "id", "title", "year", "runtime", "-id", "-title", "-year", "-runtime",
];

/// A row from the `movies` table.
///
/// `id`, `created_at` and `version` are assigned by the database and are never
/// read from client input.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub created_at: Timestamp,
    pub title: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub year: i32,
    #[sqlx(try_from = "i32")]
    #[serde(skip_serializing_if = "Runtime::is_zero")]
    pub runtime: Runtime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    pub version: Version,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

/// DTO for creating a new movie. Missing fields fail validation, not decoding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateMovie {
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    pub genres: Vec<String>,
}

impl CreateMovie {
    pub fn into_movie(self) -> Movie {
        Movie {
            title: self.title,
            year: self.year,
            runtime: self.runtime,
            genres: self.genres,
            ..Movie::default()
        }
    }
}

/// DTO for patching a movie. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
}

impl UpdateMovie {
    pub fn apply_to(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = runtime;
        }
        if let Some(genres) = self.genres {
            movie.genres = genres;
        }
    }
}

/// Record every constraint `movie` violates into `v`.
pub fn validate_movie(v: &mut Validator, movie: &Movie) {
    v.check(!movie.title.is_empty(), "title", "must be provided");
    v.check(
        movie.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    let current_year = chrono::Utc::now().year();
    v.check(movie.year != 0, "year", "must be provided");
    v.check(movie.year >= MIN_YEAR, "year", "must be greater than 1888");
    v.check(movie.year <= current_year, "year", "must not be in the future");

    v.check(!movie.runtime.is_zero(), "runtime", "must be provided");
    v.check(movie.runtime.minutes() > 0, "runtime", "must be a positive integer");

    v.check(!movie.genres.is_empty(), "genres", "must contain at least 1 genre");
    v.check(
        movie.genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    v.check(
        movie.genres.iter().all(|g| !g.is_empty()),
        "genres",
        "must not contain empty values",
    );
    v.check(unique(&movie.genres), "genres", "must not contain duplicate values");
}
