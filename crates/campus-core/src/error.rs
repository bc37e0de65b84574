//! Error types for campus-core
//!
//! One taxonomy for the whole registration lifecycle; handlers map these
//! onto HTTP status codes at the edge.

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Missing, invalid, or expired credential
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated but lacking the role or ownership the operation needs
    #[error("access denied")]
    Forbidden,

    /// Referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Malformed or rejected input (past date, duplicate email, ...)
    #[error("validation error: {0}")]
    Validation(String),

    /// Write collides with existing state (duplicate registration)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying storage error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error (serialization, corrupted records, ...)
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = Error::NotFound("event");
        assert_eq!(err.to_string(), "event not found");
    }

    #[test]
    fn test_validation_message() {
        let err = Error::Validation("event date must be in the future".to_string());
        assert!(err.to_string().contains("future"));
    }

    #[test]
    fn test_conflict_message() {
        let err = Error::Conflict("already registered".to_string());
        assert!(err.to_string().starts_with("conflict"));
    }
}
