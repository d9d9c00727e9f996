//! Event ingestion handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shelfwatch_core::{AlertEvent, EventType, Severity};
use shelfwatch_queue::QueueError;

use super::ServerState;
use crate::models::{CreateEventRequest, ErrorResponse};

/// `POST /api/events` - accept an event into the pipeline.
///
/// Returns `201` with the assigned event id once the event is stored and
/// queued for evaluation. Processing itself is asynchronous.
pub async fn create_event_handler(
    State(state): State<ServerState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return ErrorResponse::bad_request(rejection.body_text()).into_response();
        }
    };

    let Some(event_type) = EventType::from_string(&request.event_type) else {
        return ErrorResponse::bad_request(format!(
            "unknown event type: {}",
            request.event_type
        ))
        .into_response();
    };

    if request.user_id.is_empty() {
        return ErrorResponse::bad_request("userId must not be empty").into_response();
    }

    let severity = match &request.severity {
        Some(s) => match Severity::from_string(s) {
            Some(severity) => Some(severity),
            None => {
                return ErrorResponse::bad_request(format!("unknown severity: {}", s))
                    .into_response();
            }
        },
        None => None,
    };

    let mut event = AlertEvent::new(event_type, request.user_id).with_data(request.data);
    if let Some(severity) = severity {
        event = event.with_severity(severity);
    }

    match state.pipeline.submit_event(event).await {
        Ok(event_id) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Event accepted",
                "eventId": event_id.to_string(),
            })),
        )
            .into_response(),
        Err(QueueError::Full) => {
            ErrorResponse::unavailable("event queue is full").into_response()
        }
        Err(err) => ErrorResponse::internal(err.to_string()).into_response(),
    }
}
