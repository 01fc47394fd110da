//! Repository layer.
//!
//! Each repository owns a clone of the connection pool and exposes async
//! CRUD methods. [`Models`] bundles them for handlers.

use std::time::Duration;

use crate::DbPool;

pub mod movie_repo;

pub use movie_repo::MovieRepo;

/// All repositories, built from one pool.
#[derive(Debug, Clone)]
pub struct Models {
    pub movies: MovieRepo,
}

impl Models {
    pub fn new(pool: DbPool) -> Self {
        Self {
            movies: MovieRepo::new(pool),
        }
    }

    /// Apply `query_timeout` as the per-statement deadline of every repository.
    pub fn with_query_timeout(self, query_timeout: Duration) -> Self {
        Self {
            movies: self.movies.with_query_timeout(query_timeout),
        }
    }
}
