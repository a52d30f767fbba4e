pub mod repository;

pub use repository::TbrRepository;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Record not found: {0}")]
    NotFoundError(String),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Conflict: {0}")]
    ConflictError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
