use thiserror::Error;

use crate::codec::CodecError;

use super::RepositoryError;

/// Error type for service operations
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input validation failed
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Resource already exists or conflict occurred
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource was not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unrecoverable internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => Self::NotFound(msg),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::InvalidData(msg) => Self::ValidationError(msg),
            RepositoryError::Database(e) => {
                log::error!("Repository failure: {}", e);
                Self::InternalError("A database error occurred".to_string())
            }
        }
    }
}

// Only reached on the encode path: a bad token on the decode path is a lookup miss.
impl From<CodecError> for ServiceError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::OutOfRange(msg) => {
                Self::InternalError(format!("Identifier space exhausted: {}", msg))
            }
            other => Self::InternalError(other.to_string()),
        }
    }
}
