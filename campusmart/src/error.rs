//! Error types.

use thiserror::Error;

/// The main error type for campusmart operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A strict lookup did not find the requested record.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A record with the same identifier already exists.
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    /// A message was posted against a thread that does not exist.
    #[error("Unknown thread: {0}")]
    UnknownThread(String),

    /// A sort key outside `newest`, `oldest`, `price-low`, `price-high`.
    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    /// Invalid argument passed to a store operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A record failed creation-time validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistence backend error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a not-found error.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create a duplicate id error.
    pub fn duplicate(kind: &'static str, id: impl Into<String>) -> Self {
        Error::DuplicateId {
            kind,
            id: id.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Check if this is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::UnknownThread(_))
    }

    /// Check if the caller can fix this by changing its input.
    ///
    /// Storage and IO failures are environmental; everything else is a
    /// local, recoverable condition the front end should report.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Error::Storage(_) | Error::Io(_) | Error::Json(_))
    }
}

/// Result type alias for campusmart operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::not_found("product", "42");
        assert_eq!(format!("{}", e), "product not found: 42");

        let e = Error::InvalidSortKey("cheapest".into());
        assert_eq!(format!("{}", e), "Invalid sort key: cheapest");
    }

    #[test]
    fn test_classification() {
        assert!(Error::UnknownThread("missing".into()).is_not_found());
        assert!(!Error::duplicate("product", "1").is_not_found());
        assert!(Error::duplicate("product", "1").is_caller_error());
        assert!(!Error::Storage("disk full".into()).is_caller_error());
    }
}
