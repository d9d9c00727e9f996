//! Request and response models for the HTTP surface.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Structured JSON error body.
///
/// Every failure the API surfaces carries an `error` code and, where
/// useful, a human-readable `message`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// An error with its HTTP status, convertible straight into a response.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                message: Some(message.into()),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Body for `POST /api/events`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Event type name, e.g. `LOW_STOCK`.
    #[serde(rename = "type")]
    pub event_type: String,
    pub user_id: String,
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
    /// Optional severity hint, e.g. `HIGH`.
    #[serde(default)]
    pub severity: Option<String>,
}

/// Body for `POST /api/test-notification`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestNotificationRequest {
    pub user_id: String,
    /// Channel name, e.g. `IN_APP`.
    pub channel: String,
    pub subject: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_shape() {
        let err = ErrorResponse::bad_request("missing field");
        let value = serde_json::to_value(&err.body).unwrap();
        assert_eq!(value["error"], "BAD_REQUEST");
        assert_eq!(value["message"], "missing field");
    }

    #[test]
    fn test_create_event_request_parses() {
        let req: CreateEventRequest = serde_json::from_value(json!({
            "type": "LOW_STOCK",
            "userId": "user-1",
            "data": {"stock": 3}
        }))
        .unwrap();

        assert_eq!(req.event_type, "LOW_STOCK");
        assert_eq!(req.user_id, "user-1");
        assert!(req.severity.is_none());
    }

    #[test]
    fn test_create_event_request_requires_user() {
        let result: Result<CreateEventRequest, _> =
            serde_json::from_value(json!({"type": "LOW_STOCK"}));
        assert!(result.is_err());
    }
}
