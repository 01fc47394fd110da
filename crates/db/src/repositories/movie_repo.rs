//! Repository for the `movies` table.
//!
//! Concurrent writers are arbitrated by the database alone: [`MovieRepo::update`]
//! is a compare-and-swap on `(id, version)`, so of two updates that read the
//! same version exactly one succeeds and the other gets
//! [`DbError::EditConflict`]. No call retries internally.

use std::future::Future;
use std::time::Duration;

use greenlight_core::filters::{calculate_metadata, Filters, Metadata};
use greenlight_core::types::{DbId, Timestamp, Version};
use sqlx::{FromRow, PgPool};

use crate::error::DbError;
use crate::models::movie::Movie;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, created_at, title, year, runtime, genres, version";

/// Deadline applied to every statement unless overridden.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// A list-query row carrying the window-function total alongside the movie.
#[derive(FromRow)]
struct MovieWithTotal {
    total_records: i64,
    #[sqlx(flatten)]
    movie: Movie,
}

/// Provides CRUD and search operations for movies.
#[derive(Debug, Clone)]
pub struct MovieRepo {
    pool: PgPool,
    query_timeout: Duration,
}

impl MovieRepo {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Override the per-statement deadline.
    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run `fut` under the per-call deadline. Dropping the future on expiry
    /// cancels the in-flight statement.
    async fn with_deadline<T, F>(&self, fut: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                tracing::warn!(timeout = ?self.query_timeout, "Movie query deadline exceeded");
                Err(DbError::Timeout(self.query_timeout))
            }
        }
    }

    /// Insert a new movie.
    ///
    /// The database assigns `id`, `created_at` and `version`; they are written
    /// back into `movie`.
    pub async fn insert(&self, movie: &mut Movie) -> Result<(), DbError> {
        let (id, created_at, version) = self
            .with_deadline(
                sqlx::query_as::<_, (DbId, Timestamp, Version)>(
                    "INSERT INTO movies (title, year, runtime, genres)
                     VALUES ($1, $2, $3, $4)
                     RETURNING id, created_at, version",
                )
                .bind(&movie.title)
                .bind(movie.year)
                .bind(movie.runtime.minutes())
                .bind(&movie.genres)
                .fetch_one(&self.pool),
            )
            .await?;

        movie.id = id;
        movie.created_at = created_at;
        movie.version = version;
        Ok(())
    }

    /// Find a movie by ID. Non-positive IDs are rejected without a query.
    pub async fn get(&self, id: DbId) -> Result<Movie, DbError> {
        if id < 1 {
            return Err(DbError::NotFound);
        }

        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        self.with_deadline(
            sqlx::query_as::<_, Movie>(&query)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(DbError::NotFound)
    }

    /// Write `movie` if and only if the stored row still has `movie.version`.
    ///
    /// On success the stored version is incremented and copied into `movie`.
    /// Zero matching rows yields [`DbError::EditConflict`] whether the row was
    /// deleted or another writer got there first; re-fetch to tell them apart.
    pub async fn update(&self, movie: &mut Movie) -> Result<(), DbError> {
        let version = self
            .with_deadline(
                sqlx::query_scalar::<_, Version>(
                    "UPDATE movies
                     SET title = $1, year = $2, runtime = $3, genres = $4, version = version + 1
                     WHERE id = $5 AND version = $6
                     RETURNING version",
                )
                .bind(&movie.title)
                .bind(movie.year)
                .bind(movie.runtime.minutes())
                .bind(&movie.genres)
                .bind(movie.id)
                .bind(movie.version)
                .fetch_optional(&self.pool),
            )
            .await?;

        match version {
            Some(version) => {
                movie.version = version;
                Ok(())
            }
            None => Err(DbError::EditConflict),
        }
    }

    /// Permanently delete a movie by ID.
    pub async fn delete(&self, id: DbId) -> Result<(), DbError> {
        if id < 1 {
            return Err(DbError::NotFound);
        }

        let result = self
            .with_deadline(
                sqlx::query("DELETE FROM movies WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    /// List one page of movies plus pagination metadata.
    ///
    /// An empty `title` or `genres` matches everything. Otherwise `title` must
    /// equal the stored title ignoring case, and the stored genres must contain
    /// every requested genre. The page and the total come from a single query.
    ///
    /// `filters` must already have passed
    /// [`validate_filters`](greenlight_core::filters::validate_filters).
    pub async fn get_all(
        &self,
        title: &str,
        genres: &[String],
        filters: &Filters,
    ) -> Result<(Vec<Movie>, Metadata), DbError> {
        let order = filters.sort_order().inspect_err(|err| {
            tracing::error!(error = %err, "Unvalidated sort key reached the movie repository");
        })?;

        let query = format!(
            "SELECT count(*) OVER() AS total_records, {COLUMNS}
             FROM movies
             WHERE (LOWER(title) = LOWER($1) OR $1 = '')
               AND (genres @> $2 OR $2 = '{{}}')
             ORDER BY {column} {direction}, id ASC
             LIMIT $3 OFFSET $4",
            column = order.column,
            direction = order.direction.as_sql(),
        );

        let rows = self
            .with_deadline(
                sqlx::query_as::<_, MovieWithTotal>(&query)
                    .bind(title)
                    .bind(genres)
                    .bind(filters.limit())
                    .bind(filters.offset())
                    .fetch_all(&self.pool),
            )
            .await?;

        let total_records = rows.first().map_or(0, |row| row.total_records);
        let movies: Vec<Movie> = rows.into_iter().map(|row| row.movie).collect();
        let metadata = calculate_metadata(total_records, filters.page, filters.page_size);

        tracing::debug!(count = movies.len(), total_records, "Movie list query");
        Ok((movies, metadata))
    }
}
