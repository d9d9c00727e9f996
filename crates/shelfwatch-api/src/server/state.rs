//! Shared server state.

use std::sync::Arc;

use shelfwatch_queue::{Pipeline, PipelineConfig};

/// State shared across all request handlers.
#[derive(Clone)]
pub struct ServerState {
    /// The assembled alerting pipeline.
    pub pipeline: Arc<Pipeline>,
}

impl ServerState {
    /// State over a freshly assembled in-memory pipeline.
    pub async fn new() -> Self {
        Self::with_pipeline(Arc::new(Pipeline::new(PipelineConfig::default()).await))
    }

    /// State over a caller-provided pipeline.
    pub fn with_pipeline(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}
