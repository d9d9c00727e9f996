//! In-app inbox and direct-send handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shelfwatch_core::Channel;
use shelfwatch_notify::Error as NotifyError;

use super::ServerState;
use crate::models::{ErrorResponse, TestNotificationRequest};

/// `GET /api/notifications/:user_id` - the user's in-app inbox.
pub async fn get_in_app_handler(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Response {
    let messages = state.pipeline.dispatcher().in_app_notifications(&user_id).await;
    Json(messages).into_response()
}

/// `DELETE /api/notifications/:user_id` - clear the user's in-app inbox.
pub async fn clear_in_app_handler(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Response {
    state
        .pipeline
        .dispatcher()
        .clear_in_app_notifications(&user_id)
        .await;
    Json(json!({"message": "In-app notifications cleared"})).into_response()
}

/// `POST /api/test-notification` - direct single-adapter send, bypassing
/// preference lookup.
pub async fn test_notification_handler(
    State(state): State<ServerState>,
    payload: Result<Json<TestNotificationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return ErrorResponse::bad_request(rejection.body_text()).into_response();
        }
    };

    let Some(channel) = Channel::from_string(&request.channel) else {
        return ErrorResponse::bad_request(format!("unknown channel: {}", request.channel))
            .into_response();
    };

    match state
        .pipeline
        .dispatcher()
        .send_direct(&request.user_id, channel, &request.subject, &request.content)
        .await
    {
        Ok(message) => {
            let outcome = if message.was_sent() {
                "Test notification sent"
            } else {
                "Test notification attempted but delivery failed"
            };
            Json(json!({"message": outcome})).into_response()
        }
        Err(NotifyError::UnknownChannel(name)) => {
            ErrorResponse::bad_request(format!("no adapter registered for channel {}", name))
                .into_response()
        }
        Err(err) => ErrorResponse::internal(err.to_string()).into_response(),
    }
}
