//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use todo_api_core::storage::{ActivityRepository, RepositoryError, Result, TodoRepository};
use todo_api_core::todo::{filter_todos_by_group, Activity, Todo};

/// In-memory storage backend.
///
/// IDs come from per-table atomic sequences, so concurrent inserts never
/// observe the same value. Data is lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    activities: Arc<RwLock<BTreeMap<i64, Activity>>>,
    todos: Arc<RwLock<BTreeMap<i64, Todo>>>,
    activity_seq: Arc<AtomicI64>,
    todo_seq: Arc<AtomicI64>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            activities: Arc::new(RwLock::new(BTreeMap::new())),
            todos: Arc::new(RwLock::new(BTreeMap::new())),
            activity_seq: Arc::new(AtomicI64::new(0)),
            todo_seq: Arc::new(AtomicI64::new(0)),
        }
    }
}

/// Returns the next value of a sequence, starting at 1.
fn next_id(seq: &AtomicI64) -> i64 {
    seq.fetch_add(1, Ordering::SeqCst) + 1
}

#[async_trait]
impl ActivityRepository for InMemoryRepository {
    async fn get_activity(&self, id: i64) -> Result<Option<Activity>> {
        let activities = self.activities.read().await;
        Ok(activities.get(&id).cloned())
    }

    async fn list_activities(&self) -> Result<Vec<Activity>> {
        let activities = self.activities.read().await;
        Ok(activities.values().cloned().collect())
    }

    async fn insert_activity(&self, activity: Activity) -> Result<Activity> {
        let mut activities = self.activities.write().await;
        if !activity.email.is_empty() && activities.values().any(|a| a.email == activity.email) {
            return Err(RepositoryError::Constraint(format!(
                "duplicate email: {}",
                activity.email
            )));
        }
        let stored = Activity {
            id: next_id(&self.activity_seq),
            ..activity
        };
        activities.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_activity(&self, activity: &Activity) -> Result<()> {
        let mut activities = self.activities.write().await;
        match activities.get_mut(&activity.id) {
            Some(existing) => {
                existing.title = activity.title.clone();
                existing.updated_at = activity.updated_at;
                Ok(())
            }
            None => Err(RepositoryError::NotFound {
                entity_type: "Activity",
                id: activity.id,
            }),
        }
    }

    async fn delete_activity(&self, id: i64, title: Option<&str>) -> Result<()> {
        let mut activities = self.activities.write().await;
        match (activities.get(&id), title) {
            (Some(existing), Some(title)) if existing.title != title => {
                Err(RepositoryError::NoMatch {
                    entity_type: "Activity",
                    id,
                    title: title.to_string(),
                })
            }
            (Some(_), _) => {
                activities.remove(&id);
                Ok(())
            }
            (None, Some(title)) => Err(RepositoryError::NoMatch {
                entity_type: "Activity",
                id,
                title: title.to_string(),
            }),
            (None, None) => Err(RepositoryError::NotFound {
                entity_type: "Activity",
                id,
            }),
        }
    }
}

#[async_trait]
impl TodoRepository for InMemoryRepository {
    async fn get_todo(&self, id: i64) -> Result<Option<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos.get(&id).cloned())
    }

    async fn list_todos(&self, activity_group_id: Option<i64>) -> Result<Vec<Todo>> {
        let todos = self.todos.read().await;
        let all: Vec<Todo> = todos.values().cloned().collect();
        Ok(filter_todos_by_group(&all, activity_group_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn insert_todo(&self, todo: Todo) -> Result<Todo> {
        let mut todos = self.todos.write().await;
        let stored = Todo {
            id: next_id(&self.todo_seq),
            ..todo
        };
        todos.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_todo(&self, todo: &Todo) -> Result<()> {
        let mut todos = self.todos.write().await;
        match todos.get_mut(&todo.id) {
            Some(existing) => {
                *existing = todo.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound {
                entity_type: "Todo",
                id: todo.id,
            }),
        }
    }

    async fn delete_todo(&self, id: i64, title: Option<&str>) -> Result<()> {
        let mut todos = self.todos.write().await;
        match (todos.get(&id), title) {
            (Some(existing), Some(title)) if existing.title != title => {
                Err(RepositoryError::NoMatch {
                    entity_type: "Todo",
                    id,
                    title: title.to_string(),
                })
            }
            (Some(_), _) => {
                todos.remove(&id);
                Ok(())
            }
            (None, Some(title)) => Err(RepositoryError::NoMatch {
                entity_type: "Todo",
                id,
                title: title.to_string(),
            }),
            (None, None) => Err(RepositoryError::NotFound {
                entity_type: "Todo",
                id,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequence_starts_at_one_and_increases() {
        let repo = InMemoryRepository::new();
        let a = repo.insert_activity(Activity::new("a", "")).await.unwrap();
        let b = repo.insert_activity(Activity::new("b", "")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_tables_have_independent_sequences() {
        let repo = InMemoryRepository::new();
        repo.insert_activity(Activity::new("a", "")).await.unwrap();
        let todo = repo.insert_todo(Todo::new(1, "t")).await.unwrap();
        assert_eq!(todo.id, 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryRepository::new();
        repo.insert_activity(Activity::new("a", "x@y.z"))
            .await
            .unwrap();
        let err = repo
            .insert_activity(Activity::new("b", "x@y.z"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_list_todos_by_group() {
        let repo = InMemoryRepository::new();
        repo.insert_todo(Todo::new(1, "a")).await.unwrap();
        repo.insert_todo(Todo::new(2, "b")).await.unwrap();

        assert_eq!(repo.list_todos(Some(2)).await.unwrap().len(), 1);
        assert_eq!(repo.list_todos(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let repo = InMemoryRepository::new();
        let ghost = Todo::new(1, "ghost").with_id(5);
        assert!(matches!(
            repo.update_todo(&ghost).await,
            Err(RepositoryError::NotFound { id: 5, .. })
        ));
        assert!(matches!(
            repo.delete_todo(5, None).await,
            Err(RepositoryError::NotFound { id: 5, .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_title_guard() {
        let repo = InMemoryRepository::new();
        let todo = repo.insert_todo(Todo::new(1, "keep")).await.unwrap();

        assert!(matches!(
            repo.delete_todo(todo.id, Some("other")).await,
            Err(RepositoryError::NoMatch { .. })
        ));
        repo.delete_todo(todo.id, Some("keep")).await.unwrap();
        assert!(repo.get_todo(todo.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_activity_never_rewrites_email() {
        let repo = InMemoryRepository::new();
        let mut activity = repo
            .insert_activity(Activity::new("a", "first@example.com"))
            .await
            .unwrap();
        activity.email = "second@example.com".to_string();
        activity.title = "renamed".to_string();

        repo.update_activity(&activity).await.unwrap();

        let fetched = repo.get_activity(activity.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "renamed");
        assert_eq!(fetched.email, "first@example.com");
    }
}
