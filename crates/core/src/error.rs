use crate::validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("invalid runtime format")]
    InvalidRuntimeFormat,
}
