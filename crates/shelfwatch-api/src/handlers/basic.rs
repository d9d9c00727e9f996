//! Health check handler.

use axum::Json;
use serde_json::json;

/// Basic health check (public endpoint).
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "service": "shelfwatch",
    }))
}
