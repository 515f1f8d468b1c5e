//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Write worker states

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::response::{respond, WebResponse};
use crate::{state::AppState, storage::writer::WorkerState};

/// Snapshot of both write workers.
#[derive(Debug, Serialize)]
pub struct WorkerHealth {
    pub activity_writer: WorkerState,
    pub todo_writer: WorkerState,
}

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Write worker states.
///
/// Returns 503 once either worker has stopped, since inserts can no longer
/// be accepted.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Response {
    let (activity_writer, todo_writer) = state.worker_states();
    let health = WorkerHealth {
        activity_writer,
        todo_writer,
    };

    if activity_writer == WorkerState::Stopped || todo_writer == WorkerState::Stopped {
        let status = StatusCode::SERVICE_UNAVAILABLE;
        let body = WebResponse {
            status: status.canonical_reason().unwrap_or("Error").to_string(),
            message: "write worker stopped".to_string(),
            data: health,
        };
        return (status, Json(body)).into_response();
    }

    respond(StatusCode::OK, health)
}
