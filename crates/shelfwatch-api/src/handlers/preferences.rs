//! User preference handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shelfwatch_notify::UserPreferences;

use super::ServerState;
use crate::models::ErrorResponse;

/// `GET /api/preferences/:user_id` - current preferences for a user.
pub async fn get_preferences_handler(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Response {
    match state.pipeline.preferences().get(&user_id).await {
        Some(preferences) => Json(preferences).into_response(),
        None => {
            ErrorResponse::not_found(format!("no preferences for user {}", user_id))
                .into_response()
        }
    }
}

/// `PUT /api/preferences/:user_id` - full-replace preferences for a user.
///
/// The path segment is authoritative for the user id; an id in the body
/// is overwritten rather than trusted.
pub async fn update_preferences_handler(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
    payload: Result<Json<UserPreferences>, JsonRejection>,
) -> Response {
    let Json(mut preferences) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return ErrorResponse::bad_request(rejection.body_text()).into_response();
        }
    };

    preferences.user_id = user_id;
    state.pipeline.preferences().update(preferences.clone()).await;

    Json(json!({
        "message": "Preferences updated",
        "preferences": preferences,
    }))
    .into_response()
}
