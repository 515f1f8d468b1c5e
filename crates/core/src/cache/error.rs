use thiserror::Error;

use super::serialization::SerializationError;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<SerializationError> for CacheError {
    fn from(err: SerializationError) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{all_todos_key, deserialize_value, todo_key};
    use crate::todo::Todo;

    #[test]
    fn test_connection_failure_names_the_backend() {
        let error = CacheError::ConnectionFailed("redis://127.0.0.1:6379 refused".to_string());

        assert_eq!(
            error.to_string(),
            "Cache connection failed: redis://127.0.0.1:6379 refused"
        );
    }

    #[test]
    fn test_operation_failure_carries_the_entity_key() {
        let error = CacheError::OperationFailed(format!("SETEX {} rejected", all_todos_key(Some(3))));

        assert_eq!(error.to_string(), "Cache operation failed: SETEX alltodo-3 rejected");
        assert_ne!(
            error,
            CacheError::OperationFailed(format!("SETEX {} rejected", todo_key(3)))
        );
    }

    #[test]
    fn test_corrupt_cached_todo_list_becomes_serialization_error() {
        let err = deserialize_value::<Vec<Todo>>(b"{\"todo_id\": 7}").unwrap_err();

        let error = CacheError::from(err);

        assert!(matches!(error, CacheError::Serialization(_)));
        assert!(error
            .to_string()
            .starts_with("Serialization error: Failed to deserialize: "));
    }
}
