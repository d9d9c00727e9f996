//! Queue statistics handler.

use axum::extract::State;
use axum::Json;
use shelfwatch_queue::PipelineStats;

use super::ServerState;

/// `GET /api/queues/stats` - counters for both pipeline queues.
pub async fn queue_stats_handler(State(state): State<ServerState>) -> Json<PipelineStats> {
    Json(state.pipeline.stats().await)
}
