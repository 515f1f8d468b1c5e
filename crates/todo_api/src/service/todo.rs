use std::sync::Arc;

use anyhow::Result;

use todo_api_core::storage::{DeleteMatch, RepositoryError, TodoRepository};
use todo_api_core::todo::{validate_todo, CreateTodoRequest, Todo, UpdateTodoRequest};

/// Todo item use cases.
#[derive(Clone)]
pub struct TodoService {
    repository: Arc<dyn TodoRepository>,
    delete_match: DeleteMatch,
}

impl TodoService {
    pub fn new(repository: Arc<dyn TodoRepository>, delete_match: DeleteMatch) -> Self {
        Self {
            repository,
            delete_match,
        }
    }

    /// Validates and persists a new todo through the write worker.
    ///
    /// A missing `activity_group_id` is reported before a missing title, and
    /// neither reaches the store.
    pub async fn create_todo(&self, request: CreateTodoRequest) -> Result<Todo> {
        let todo = request.into_todo();
        validate_todo(&todo)?;

        let stored = self.repository.insert_todo(todo).await?;
        tracing::info!(
            id = stored.id,
            activity_group_id = stored.activity_group_id,
            "Created todo"
        );
        Ok(stored)
    }

    pub async fn get_todo(&self, id: i64) -> Result<Todo> {
        let todo = self
            .repository
            .get_todo(id)
            .await?
            .ok_or(RepositoryError::NotFound {
                entity_type: "Todo",
                id,
            })?;
        Ok(todo)
    }

    /// Lists todos, optionally scoped to one activity group.
    pub async fn list_todos(&self, activity_group_id: Option<i64>) -> Result<Vec<Todo>> {
        let todos = self.repository.list_todos(activity_group_id).await?;
        tracing::debug!(count = todos.len(), ?activity_group_id, "Listed todos");
        Ok(todos)
    }

    pub async fn update_todo(&self, id: i64, request: UpdateTodoRequest) -> Result<Todo> {
        let mut todo = self.get_todo(id).await?;
        request.apply_to(&mut todo);

        self.repository.update_todo(&todo).await?;
        tracing::info!(id, "Updated todo");
        Ok(todo)
    }

    pub async fn delete_todo(&self, id: i64) -> Result<()> {
        match self.delete_match {
            DeleteMatch::Id => self.repository.delete_todo(id, None).await?,
            DeleteMatch::IdAndTitle => {
                let current = self.get_todo(id).await?;
                let guard = self.delete_match.title_guard(&current.title);
                self.repository.delete_todo(id, guard).await?;
            }
        }
        tracing::info!(id, "Deleted todo");
        Ok(())
    }
}
