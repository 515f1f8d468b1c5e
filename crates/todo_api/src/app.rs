use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        activities::{
            create_activity, delete_activity, get_activity, list_activities, update_activity,
        },
        health::{healthz, livez},
        todos::{create_todo, delete_todo, get_todo, list_todos, update_todo},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
///
/// Requests still running after `request_timeout` are answered with 408.
/// Writes they started run to completion in the background.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route(
            "/activity-groups",
            get(list_activities).post(create_activity),
        )
        .route(
            "/activity-groups/{id}",
            get(get_activity)
                .patch(update_activity)
                .delete(delete_activity),
        )
        .route("/todo-items", get(list_todos).post(create_todo))
        .route(
            "/todo-items/{id}",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
