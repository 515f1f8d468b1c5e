//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError` from
//! `todo_api_core::storage`. Constraint violations keep SQLite's own message so
//! clients see which column was rejected.

use todo_api_core::storage::RepositoryError;

/// Maps a rusqlite error to a RepositoryError.
///
/// # Error Mapping
///
/// - Any `SQLITE_CONSTRAINT_*` → `RepositoryError::Constraint`
/// - `SQLITE_BUSY` / `SQLITE_LOCKED` / `SQLITE_CANTOPEN` → `RepositoryError::ConnectionFailed`
/// - `QueryReturnedNoRows` → `RepositoryError::NotFound`
/// - All other errors → `RepositoryError::QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str, id: i64) -> RepositoryError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            RepositoryError::Constraint(err.to_string())
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if matches!(
                sqlite_err.code,
                rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::DatabaseBusy
                    | rusqlite::ErrorCode::DatabaseLocked
            ) =>
        {
            RepositoryError::ConnectionFailed(err.to_string())
        }

        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound { entity_type, id },

        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a RepositoryError.
///
/// `id` is the entity the statement targeted, or `0` for statements that
/// are not keyed (inserts and list queries). Repository errors raised inside
/// a connection closure travel as `Error::Other` and are returned unchanged.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: i64,
) -> RepositoryError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type, id)
        }
        tokio_rusqlite::Error::Close(_) | tokio_rusqlite::Error::ConnectionClosed => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        tokio_rusqlite::Error::Other(inner) => match inner.downcast_ref::<RepositoryError>() {
            Some(repo_err) => repo_err.clone(),
            None => RepositoryError::QueryFailed(err.to_string()),
        },
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Wraps a repository error so it can leave a `Connection::call` closure.
pub fn repository_err(err: RepositoryError) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Other(Box::new(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    fn sqlite_failure(code: rusqlite::ErrorCode, extended_code: i32, msg: &str) -> tokio_rusqlite::Error {
        let sqlite_err = rusqlite::ffi::Error {
            code,
            extended_code,
        };
        tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
            sqlite_err,
            Some(msg.to_string()),
        ))
    }

    #[test]
    fn test_unique_constraint_maps_to_constraint_with_message() {
        let err = sqlite_failure(
            rusqlite::ErrorCode::ConstraintViolation,
            ffi::SQLITE_CONSTRAINT_UNIQUE,
            "UNIQUE constraint failed: activities.email",
        );

        let result = map_tokio_rusqlite_error(err, "Activity", 0);

        assert_eq!(
            result,
            RepositoryError::Constraint("UNIQUE constraint failed: activities.email".to_string())
        );
    }

    #[test]
    fn test_not_null_constraint_maps_to_constraint() {
        let err = sqlite_failure(
            rusqlite::ErrorCode::ConstraintViolation,
            ffi::SQLITE_CONSTRAINT_NOTNULL,
            "NOT NULL constraint failed: todos.title",
        );

        let result = map_tokio_rusqlite_error(err, "Todo", 0);

        assert!(matches!(result, RepositoryError::Constraint(_)));
    }

    #[test]
    fn test_busy_maps_to_connection_failed() {
        let err = sqlite_failure(rusqlite::ErrorCode::DatabaseBusy, ffi::SQLITE_BUSY, "database is locked");

        let result = map_tokio_rusqlite_error(err, "Todo", 0);

        assert!(matches!(result, RepositoryError::ConnectionFailed(_)));
    }

    #[test]
    fn test_no_rows_maps_to_not_found_with_id() {
        let err = tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows);

        let result = map_tokio_rusqlite_error(err, "Activity", 42);

        assert_eq!(
            result,
            RepositoryError::NotFound {
                entity_type: "Activity",
                id: 42
            }
        );
    }

    #[test]
    fn test_repository_error_passes_through_closure_boundary() {
        let original = RepositoryError::InconsistentState("2 rows deleted".to_string());

        let result = map_tokio_rusqlite_error(repository_err(original.clone()), "Todo", 1);

        assert_eq!(result, original);
    }

    #[test]
    fn test_other_error_maps_to_query_failed() {
        let err = tokio_rusqlite::Error::Other(Box::new(std::io::Error::other("test error")));

        let result = map_tokio_rusqlite_error(err, "Todo", 0);

        assert!(matches!(result, RepositoryError::QueryFailed(_)));
    }
}
