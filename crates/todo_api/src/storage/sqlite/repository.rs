//! SQLite repository implementation.
//!
//! Implements the repository traits from `todo_api_core::storage` using SQLite.
//! Inserts run in `IMMEDIATE` transactions and read the new row ID back, so
//! identity always comes from `AUTOINCREMENT`.

use std::time::Duration;

use async_trait::async_trait;
use rusqlite::TransactionBehavior;
use tokio_rusqlite::Connection;

use todo_api_core::storage::{ActivityRepository, RepositoryError, Result, TodoRepository};
use todo_api_core::todo::{Activity, Todo};

use super::conversions::{format_datetime, row_to_activity, row_to_todo};
use super::error::{map_tokio_rusqlite_error, repository_err};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Resolves the affected-row count of a single-row delete.
///
/// Zero rows is a miss. More than one row means the primary key is not
/// unique, so the caller must roll back instead of committing.
fn check_deleted_rows(
    rows: usize,
    entity_type: &'static str,
    id: i64,
    title: Option<String>,
) -> std::result::Result<(), RepositoryError> {
    match (rows, title) {
        (1, _) => Ok(()),
        (0, Some(title)) => Err(RepositoryError::NoMatch {
            entity_type,
            id,
            title,
        }),
        (0, None) => Err(RepositoryError::NotFound { entity_type, id }),
        (n, _) => Err(RepositoryError::InconsistentState(format!(
            "delete of {entity_type} {id} matched {n} rows"
        ))),
    }
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for activities and todos.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist. Schema tables
    /// are created automatically. `busy_timeout` bounds how long a statement
    /// waits on a locked database before failing and rolling back.
    pub async fn new(path: &str, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn, busy_timeout).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn, Duration::from_secs(5)).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection, busy_timeout: Duration) -> Result<()> {
        conn.call(move |conn| {
            conn.busy_timeout(busy_timeout).map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))
    }
}

// ============================================================================
// ActivityRepository implementation
// ============================================================================

#[async_trait]
impl ActivityRepository for SqliteRepository {
    async fn get_activity(&self, id: i64) -> Result<Option<Activity>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ACTIVITY_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([id], row_to_activity) {
                    Ok(activity) => Ok(Some(activity)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Activity", id))
    }

    async fn list_activities(&self) -> Result<Vec<Activity>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ALL_ACTIVITIES)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_activity).map_err(wrap_err)?;

                let mut activities = Vec::new();
                for row_result in rows {
                    activities.push(row_result.map_err(wrap_err)?);
                }
                Ok(activities)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Activity", 0))
    }

    async fn insert_activity(&self, activity: Activity) -> Result<Activity> {
        let title = activity.title.clone();
        let email = activity.email.clone();
        let created_at = format_datetime(&activity.created_at);
        let updated_at = format_datetime(&activity.updated_at);

        let id = self
            .conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_ACTIVITY,
                    rusqlite::params![title, email, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                let id = tx.last_insert_rowid();
                tx.commit().map_err(wrap_err)?;
                Ok(id)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Activity", 0))?;

        Ok(Activity { id, ..activity })
    }

    async fn update_activity(&self, activity: &Activity) -> Result<()> {
        let id = activity.id;
        let title = activity.title.clone();
        let updated_at = format_datetime(&activity.updated_at);

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_ACTIVITY,
                        rusqlite::params![id, title, updated_at],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Activity", id))
    }

    async fn delete_activity(&self, id: i64, title: Option<&str>) -> Result<()> {
        let title = title.map(str::to_string);

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let rows = match &title {
                    Some(t) => tx.execute(schema::DELETE_ACTIVITY_WITH_TITLE, rusqlite::params![id, t]),
                    None => tx.execute(schema::DELETE_ACTIVITY, [id]),
                }
                .map_err(wrap_err)?;
                check_deleted_rows(rows, "Activity", id, title).map_err(repository_err)?;
                tx.commit().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Activity", id))
    }
}

// ============================================================================
// TodoRepository implementation
// ============================================================================

#[async_trait]
impl TodoRepository for SqliteRepository {
    async fn get_todo(&self, id: i64) -> Result<Option<Todo>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_TODO_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([id], row_to_todo) {
                    Ok(todo) => Ok(Some(todo)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Todo", id))
    }

    async fn list_todos(&self, activity_group_id: Option<i64>) -> Result<Vec<Todo>> {
        self.conn
            .call(move |conn| {
                let mut todos = Vec::new();
                match activity_group_id {
                    Some(group_id) => {
                        let mut stmt = conn
                            .prepare(schema::SELECT_TODOS_BY_GROUP)
                            .map_err(wrap_err)?;
                        let rows = stmt.query_map([group_id], row_to_todo).map_err(wrap_err)?;
                        for row_result in rows {
                            todos.push(row_result.map_err(wrap_err)?);
                        }
                    }
                    None => {
                        let mut stmt = conn.prepare(schema::SELECT_ALL_TODOS).map_err(wrap_err)?;
                        let rows = stmt.query_map([], row_to_todo).map_err(wrap_err)?;
                        for row_result in rows {
                            todos.push(row_result.map_err(wrap_err)?);
                        }
                    }
                }
                Ok(todos)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Todo", 0))
    }

    async fn insert_todo(&self, todo: Todo) -> Result<Todo> {
        let activity_group_id = todo.activity_group_id;
        let title = todo.title.clone();
        let is_active = todo.is_active;
        let priority = todo.priority.clone();
        let created_at = format_datetime(&todo.created_at);
        let updated_at = format_datetime(&todo.updated_at);

        let id = self
            .conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_TODO,
                    rusqlite::params![
                        activity_group_id,
                        title,
                        is_active,
                        priority,
                        created_at,
                        updated_at
                    ],
                )
                .map_err(wrap_err)?;
                let id = tx.last_insert_rowid();
                tx.commit().map_err(wrap_err)?;
                Ok(id)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Todo", 0))?;

        Ok(Todo { id, ..todo })
    }

    async fn update_todo(&self, todo: &Todo) -> Result<()> {
        let id = todo.id;
        let title = todo.title.clone();
        let is_active = todo.is_active;
        let priority = todo.priority.clone();
        let updated_at = format_datetime(&todo.updated_at);

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_TODO,
                        rusqlite::params![id, title, is_active, priority, updated_at],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Todo", id))
    }

    async fn delete_todo(&self, id: i64, title: Option<&str>) -> Result<()> {
        let title = title.map(str::to_string);

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let rows = match &title {
                    Some(t) => tx.execute(schema::DELETE_TODO_WITH_TITLE, rusqlite::params![id, t]),
                    None => tx.execute(schema::DELETE_TODO, [id]),
                }
                .map_err(wrap_err)?;
                check_deleted_rows(rows, "Todo", id, title).map_err(repository_err)?;
                tx.commit().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Todo", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn repo() -> SqliteRepository {
        SqliteRepository::new_in_memory().await.unwrap()
    }

    #[test]
    fn test_check_deleted_rows() {
        assert!(check_deleted_rows(1, "Todo", 1, None).is_ok());
        assert_eq!(
            check_deleted_rows(0, "Todo", 9, None),
            Err(RepositoryError::NotFound {
                entity_type: "Todo",
                id: 9
            })
        );
        assert!(matches!(
            check_deleted_rows(0, "Todo", 9, Some("x".to_string())),
            Err(RepositoryError::NoMatch { .. })
        ));
        assert!(matches!(
            check_deleted_rows(2, "Todo", 9, None),
            Err(RepositoryError::InconsistentState(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let repo = repo().await;

        let first = repo
            .insert_activity(Activity::new("First", ""))
            .await
            .unwrap();
        let second = repo
            .insert_activity(Activity::new("Second", ""))
            .await
            .unwrap();

        assert!(first.id > 0);
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_insert_then_get_round_trips() {
        let repo = repo().await;
        let todo = repo
            .insert_todo(Todo::new(4, "buy milk").with_priority("low"))
            .await
            .unwrap();

        let fetched = repo.get_todo(todo.id).await.unwrap().unwrap();

        assert_eq!(fetched, todo);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = repo().await;
        assert!(repo.get_activity(999).await.unwrap().is_none());
        assert!(repo.get_todo(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_constraint_violation() {
        let repo = repo().await;
        repo.insert_activity(Activity::new("A", "dup@example.com"))
            .await
            .unwrap();

        let err = repo
            .insert_activity(Activity::new("B", "dup@example.com"))
            .await
            .unwrap_err();

        match err {
            RepositoryError::Constraint(msg) => assert!(msg.contains("email")),
            other => panic!("Expected Constraint, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_emails_do_not_collide() {
        let repo = repo().await;
        repo.insert_activity(Activity::new("A", "")).await.unwrap();
        repo.insert_activity(Activity::new("B", "")).await.unwrap();

        let all = repo.list_activities().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|a| a.email.is_empty()));
    }

    #[tokio::test]
    async fn test_list_todos_filters_by_group() {
        let repo = repo().await;
        repo.insert_todo(Todo::new(1, "a")).await.unwrap();
        repo.insert_todo(Todo::new(2, "b")).await.unwrap();
        repo.insert_todo(Todo::new(1, "c")).await.unwrap();

        let group_one = repo.list_todos(Some(1)).await.unwrap();
        assert_eq!(group_one.len(), 2);
        assert!(group_one.windows(2).all(|w| w[0].id < w[1].id));

        assert_eq!(repo.list_todos(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repo().await;
        let ghost = Todo::new(1, "ghost").with_id(77);

        let err = repo.update_todo(&ghost).await.unwrap_err();

        assert_eq!(
            err,
            RepositoryError::NotFound {
                entity_type: "Todo",
                id: 77
            }
        );
    }

    #[tokio::test]
    async fn test_update_persists_fields() {
        let repo = repo().await;
        let mut activity = repo
            .insert_activity(Activity::new("old", ""))
            .await
            .unwrap();
        activity.title = "new title".to_string();
        activity.touch();

        repo.update_activity(&activity).await.unwrap();

        let fetched = repo.get_activity(activity.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "new title");
        assert_eq!(fetched.updated_at, activity.updated_at);
    }

    #[tokio::test]
    async fn test_update_from_stale_copy_keeps_stored_email() {
        let repo = repo().await;
        let mut stale = repo
            .insert_activity(Activity::new("groceries", "owner@example.com"))
            .await
            .unwrap();
        stale.email = "someone-else@example.com".to_string();
        stale.title = "weekly groceries".to_string();

        repo.update_activity(&stale).await.unwrap();

        let fetched = repo.get_activity(stale.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "weekly groceries");
        assert_eq!(fetched.email, "owner@example.com");
    }

    #[tokio::test]
    async fn test_delete_requires_existing_row() {
        let repo = repo().await;
        let todo = repo.insert_todo(Todo::new(1, "x")).await.unwrap();

        repo.delete_todo(todo.id, None).await.unwrap();
        assert!(repo.get_todo(todo.id).await.unwrap().is_none());

        let err = repo.delete_todo(todo.id, None).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_with_title_guard() {
        let repo = repo().await;
        let activity = repo
            .insert_activity(Activity::new("Work", ""))
            .await
            .unwrap();

        let err = repo
            .delete_activity(activity.id, Some("Play"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NoMatch { .. }));
        assert!(repo.get_activity(activity.id).await.unwrap().is_some());

        repo.delete_activity(activity.id, Some("Work"))
            .await
            .unwrap();
        assert!(repo.get_activity(activity.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = repo().await;
        let first = repo.insert_todo(Todo::new(1, "a")).await.unwrap();
        repo.delete_todo(first.id, None).await.unwrap();

        let second = repo.insert_todo(Todo::new(1, "b")).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_distinct_ids() {
        let repo = Arc::new(repo().await);
        let mut handles = Vec::new();
        for i in 0..20 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.insert_todo(Todo::new(1, format!("todo {i}")))
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 20);
        assert_eq!(repo.list_todos(None).await.unwrap().len(), 20);
    }
}
