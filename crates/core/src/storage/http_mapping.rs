//! Pure functions for mapping repository errors to HTTP status codes.
//!
//! This module provides HTTP status code mappings for [`RepositoryError`] variants,
//! following the Functional Core pattern - pure functions with no side effects.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound`, `NoMatch` -> 404 (Not Found)
/// - `Constraint`, `InvalidData` -> 400 (Bad Request)
/// - `ConnectionFailed`, `WriterUnavailable` -> 503 (Service Unavailable)
/// - `QueryFailed`, `Serialization`, `InconsistentState` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use todo_api_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Activity",
///     id: 42,
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::NoMatch { .. } => 404,
        RepositoryError::Constraint(_) => 400,
        RepositoryError::InvalidData(_) => 400,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::WriterUnavailable { .. } => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InconsistentState(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::NotFound {
            entity_type: "Todo",
            id: 1,
        };
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_no_match_maps_to_404() {
        let error = RepositoryError::NoMatch {
            entity_type: "Todo",
            id: 1,
            title: "x".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_constraint_maps_to_400() {
        let error = RepositoryError::Constraint("duplicate email".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_invalid_data_maps_to_400() {
        let error = RepositoryError::InvalidData("bad timestamp".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = RepositoryError::ConnectionFailed("refused".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_writer_unavailable_maps_to_503() {
        let error = RepositoryError::WriterUnavailable {
            entity_type: "Todo",
            reason: "shut down".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        for error in [
            RepositoryError::QueryFailed("syntax".to_string()),
            RepositoryError::Serialization("bad json".to_string()),
            RepositoryError::InconsistentState("2 rows deleted".to_string()),
        ] {
            assert_eq!(repository_error_to_status_code(&error), 500);
        }
    }
}
