//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers delegate to the repositories in `greenlight_db::Models` and map
//! errors via [`AppError`](crate::error::AppError).

use greenlight_core::error::CoreError;
use greenlight_core::validator::Validator;

use crate::error::AppResult;

pub mod movie;

/// Turn accumulated validation failures into a 422 error.
pub(crate) fn ensure_valid(v: Validator) -> AppResult<()> {
    if v.is_valid() {
        Ok(())
    } else {
        Err(CoreError::Validation(v.into_errors()).into())
    }
}
