//! JSON envelope shared by every response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Status and message used by every successful response.
pub const SUCCESS: &str = "Success";

/// `{status, message, data}` body returned by all endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> WebResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: SUCCESS.to_string(),
            message: SUCCESS.to_string(),
            data,
        }
    }
}

impl WebResponse<serde_json::Value> {
    /// Error envelope: the status is the reason phrase and `data` is `{}`.
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.canonical_reason().unwrap_or("Error").to_string(),
            message: message.into(),
            data: serde_json::json!({}),
        }
    }
}

/// Builds a success response with the given status code.
pub fn respond<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(WebResponse::success(data))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(WebResponse::success(vec![1, 2])).unwrap();

        assert_eq!(
            body,
            serde_json::json!({"status": "Success", "message": "Success", "data": [1, 2]})
        );
    }

    #[test]
    fn test_failure_envelope_uses_reason_phrase() {
        let body = serde_json::to_value(WebResponse::failure(
            StatusCode::NOT_FOUND,
            "Todo with ID 999 Not Found",
        ))
        .unwrap();

        assert_eq!(body["status"], "Not Found");
        assert_eq!(body["message"], "Todo with ID 999 Not Found");
        assert_eq!(body["data"], serde_json::json!({}));
    }
}
