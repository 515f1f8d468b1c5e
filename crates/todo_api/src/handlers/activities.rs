//! Activity group handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Response,
    Json,
};

use todo_api_core::todo::{ActivityDto, CreateActivityRequest, UpdateActivityRequest};

use super::{response::respond, AppError};
use crate::state::AppState;

/// Create an activity group (POST /activity-groups).
pub async fn create_activity(
    State(state): State<AppState>,
    payload: Result<Json<CreateActivityRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let activity = state.activities.create_activity(request).await?;
    Ok(respond(StatusCode::CREATED, ActivityDto::from(activity)))
}

/// List all activity groups (GET /activity-groups).
pub async fn list_activities(State(state): State<AppState>) -> Result<Response, AppError> {
    let activities = state.activities.list_activities().await?;
    let dtos: Vec<ActivityDto> = activities.into_iter().map(ActivityDto::from).collect();
    Ok(respond(StatusCode::OK, dtos))
}

/// Get one activity group (GET /activity-groups/{id}).
pub async fn get_activity(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let activity = state.activities.get_activity(id).await?;
    Ok(respond(StatusCode::OK, ActivityDto::from(activity)))
}

/// Rename an activity group (PATCH /activity-groups/{id}).
pub async fn update_activity(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateActivityRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let activity = state.activities.update_activity(id, request).await?;
    Ok(respond(StatusCode::OK, ActivityDto::from(activity)))
}

/// Delete an activity group (DELETE /activity-groups/{id}).
pub async fn delete_activity(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    state.activities.delete_activity(id).await?;
    Ok(respond(StatusCode::OK, serde_json::json!({})))
}
