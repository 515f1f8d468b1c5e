use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} with ID {id} Not Found")]
    NotFound { entity_type: &'static str, id: i64 },
    #[error("{entity_type} with ID {id} and Title: {title} Not Found")]
    NoMatch {
        entity_type: &'static str,
        id: i64,
        title: String,
    },
    #[error("{0}")]
    Constraint(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("{entity_type} writer unavailable: {reason}")]
    WriterUnavailable {
        entity_type: &'static str,
        reason: String,
    },
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
