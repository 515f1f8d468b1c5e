//! Cached todo repository.

use std::sync::Arc;

use async_trait::async_trait;

use todo_api_core::cache::{all_todos_key, todo_key, Cache};
use todo_api_core::storage::{Result, TodoRepository};
use todo_api_core::todo::Todo;

use super::policy::{CachePolicy, CacheSettings};
use crate::storage::writer::WriteQueue;

/// Todo repository with read-through caching and write-behind inserts.
pub struct CachedTodoRepository<R, C>
where
    R: TodoRepository,
    C: Cache,
{
    repository: Arc<R>,
    writer: WriteQueue<Todo>,
    policy: CachePolicy<C, Todo>,
}

impl<R, C> CachedTodoRepository<R, C>
where
    R: TodoRepository,
    C: Cache,
{
    pub fn new(
        repository: Arc<R>,
        writer: WriteQueue<Todo>,
        cache: Arc<C>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            repository,
            writer,
            policy: CachePolicy::new(cache, settings),
        }
    }
}

#[async_trait]
impl<R, C> TodoRepository for CachedTodoRepository<R, C>
where
    R: TodoRepository + 'static,
    C: Cache + 'static,
{
    async fn get_todo(&self, id: i64) -> Result<Option<Todo>> {
        self.policy
            .get_or_fetch(todo_key(id), id, || self.repository.get_todo(id))
            .await
    }

    async fn list_todos(&self, activity_group_id: Option<i64>) -> Result<Vec<Todo>> {
        self.policy
            .list_or_fetch(all_todos_key(activity_group_id), activity_group_id, || {
                self.repository.list_todos(activity_group_id)
            })
            .await
    }

    async fn insert_todo(&self, todo: Todo) -> Result<Todo> {
        let writer = self.writer.clone();
        let stored = self
            .policy
            .write(async move { writer.submit(todo).await })
            .await?;
        tracing::debug!(
            id = stored.id,
            activity_group_id = stored.activity_group_id,
            "Todo inserted"
        );
        Ok(stored)
    }

    async fn update_todo(&self, todo: &Todo) -> Result<()> {
        let repository = self.repository.clone();
        let todo = todo.clone();
        self.policy
            .write(async move { repository.update_todo(&todo).await })
            .await
    }

    async fn delete_todo(&self, id: i64, title: Option<&str>) -> Result<()> {
        let repository = self.repository.clone();
        let title = title.map(str::to_owned);
        self.policy
            .write(async move { repository.delete_todo(id, title.as_deref()).await })
            .await
    }
}
