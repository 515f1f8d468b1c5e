use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use todo_api_core::storage::{repository_error_to_status_code, RepositoryError};
use todo_api_core::todo::ValidationError;

use super::response::WebResponse;

/// Handler error rendered as a JSON envelope.
///
/// The status code comes from the concrete error inside the `anyhow::Error`:
/// validation errors and extractor rejections are 400, repository errors go
/// through [`repository_error_to_status_code`], anything else is 500.
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status_code(&self) -> StatusCode {
        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else if self.0.is::<ValidationError>()
            || self.0.is::<JsonRejection>()
            || self.0.is::<PathRejection>()
            || self.0.is::<QueryRejection>()
        {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let message = self.0.to_string();

        if status_code.is_server_error() {
            tracing::error!(status = %status_code, error = %message, "Request failed");
        } else {
            tracing::warn!(status = %status_code, error = %message, "Request rejected");
        }

        (status_code, Json(WebResponse::failure(status_code, message))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
