//! Application router configuration.

use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use super::{ServerState, MAX_REQUEST_BODY_SIZE};
use crate::handlers::{basic, events, notifications, preferences, stats};
use crate::models::ErrorResponse;

/// Create the application router over a fresh in-memory pipeline.
pub async fn create_router() -> Router {
    create_router_with_state(ServerState::new().await)
}

/// Create the application router with a specific state.
pub fn create_router_with_state(state: ServerState) -> Router {
    Router::new()
        .route("/api/health", get(basic::health_handler))
        .route("/api/events", post(events::create_event_handler))
        .route(
            "/api/preferences/:user_id",
            get(preferences::get_preferences_handler).put(preferences::update_preferences_handler),
        )
        .route(
            "/api/notifications/:user_id",
            get(notifications::get_in_app_handler).delete(notifications::clear_in_app_handler),
        )
        .route(
            "/api/test-notification",
            post(notifications::test_notification_handler),
        )
        .route("/api/queues/stats", get(stats::queue_stats_handler))
        .fallback(fallback_handler)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_SIZE))
        .with_state(state)
}

/// Unknown routes get the same structured JSON body as every other error.
async fn fallback_handler() -> impl IntoResponse {
    ErrorResponse::not_found("route not found")
}
