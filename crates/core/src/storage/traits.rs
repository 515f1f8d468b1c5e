use async_trait::async_trait;

use crate::todo::{Activity, Entity, Todo};

use super::Result;

/// Repository for activity operations.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Gets an activity by its ID.
    async fn get_activity(&self, id: i64) -> Result<Option<Activity>>;

    /// Lists every activity ordered by ID.
    async fn list_activities(&self) -> Result<Vec<Activity>>;

    /// Persists a new activity and returns it with its store-assigned ID.
    async fn insert_activity(&self, activity: Activity) -> Result<Activity>;

    /// Updates an existing activity. Fails with `NotFound` if no row matched.
    async fn update_activity(&self, activity: &Activity) -> Result<()>;

    /// Deletes exactly one activity by ID, optionally also matching its title.
    async fn delete_activity(&self, id: i64, title: Option<&str>) -> Result<()>;
}

/// Repository for todo operations.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Gets a todo by its ID.
    async fn get_todo(&self, id: i64) -> Result<Option<Todo>>;

    /// Lists todos ordered by ID, optionally scoped to an activity group.
    async fn list_todos(&self, activity_group_id: Option<i64>) -> Result<Vec<Todo>>;

    /// Persists a new todo and returns it with its store-assigned ID.
    async fn insert_todo(&self, todo: Todo) -> Result<Todo>;

    /// Updates an existing todo. Fails with `NotFound` if no row matched.
    async fn update_todo(&self, todo: &Todo) -> Result<()>;

    /// Deletes exactly one todo by ID, optionally also matching its title.
    async fn delete_todo(&self, id: i64, title: Option<&str>) -> Result<()>;
}

/// Durable destination for newly created entities, consumed by the write worker.
#[async_trait]
pub trait EntitySink<E: Entity>: Send + Sync {
    /// Persists `entity` in a single transaction and returns the stored copy.
    async fn persist(&self, entity: E) -> Result<E>;
}

#[async_trait]
impl<R: ActivityRepository + ?Sized> EntitySink<Activity> for R {
    async fn persist(&self, entity: Activity) -> Result<Activity> {
        self.insert_activity(entity).await
    }
}

#[async_trait]
impl<R: TodoRepository + ?Sized> EntitySink<Todo> for R {
    async fn persist(&self, entity: Todo) -> Result<Todo> {
        self.insert_todo(entity).await
    }
}
