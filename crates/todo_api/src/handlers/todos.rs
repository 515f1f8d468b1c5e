//! Todo item handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Response,
    Json,
};

use todo_api_core::todo::{CreateTodoRequest, ListTodosQuery, TodoDto, UpdateTodoRequest};

use super::{response::respond, AppError};
use crate::state::AppState;

/// Create a todo (POST /todo-items).
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let todo = state.todos.create_todo(request).await?;
    Ok(respond(StatusCode::CREATED, TodoDto::from(todo)))
}

/// List todos, optionally for one group (GET /todo-items?activity_group_id=).
///
/// `activity_group_id=0` is treated the same as leaving it out.
pub async fn list_todos(
    State(state): State<AppState>,
    query: Result<Query<ListTodosQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let todos = state.todos.list_todos(query.filter()).await?;
    let dtos: Vec<TodoDto> = todos.into_iter().map(TodoDto::from).collect();
    Ok(respond(StatusCode::OK, dtos))
}

/// Get one todo (GET /todo-items/{id}).
pub async fn get_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let todo = state.todos.get_todo(id).await?;
    Ok(respond(StatusCode::OK, TodoDto::from(todo)))
}

/// Partially update a todo (PATCH /todo-items/{id}).
pub async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let todo = state.todos.update_todo(id, request).await?;
    Ok(respond(StatusCode::OK, TodoDto::from(todo)))
}

/// Delete a todo (DELETE /todo-items/{id}).
pub async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    state.todos.delete_todo(id).await?;
    Ok(respond(StatusCode::OK, serde_json::json!({})))
}
