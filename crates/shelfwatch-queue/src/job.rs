//! Job payloads for the two pipeline queues.

use serde::{Deserialize, Serialize};
use shelfwatch_core::EventId;

/// Event-queue job: evaluate one stored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateJob {
    pub event_id: EventId,
}

impl EvaluateJob {
    pub fn new(event_id: EventId) -> Self {
        Self { event_id }
    }
}

/// Notification-queue job: deliver notifications for one alerted event.
///
/// The payload carries ids only; the worker re-derives the alert decision
/// and re-reads preference state at processing time, so stale snapshots
/// never drive delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverJob {
    pub event_id: EventId,
    pub user_id: String,
}

impl DeliverJob {
    pub fn new(event_id: EventId, user_id: impl Into<String>) -> Self {
        Self {
            event_id,
            user_id: user_id.into(),
        }
    }
}

/// A payload wrapped with retry accounting.
#[derive(Debug, Clone)]
pub struct QueuedJob<T> {
    pub payload: T,
    /// Number of attempts already made.
    pub attempts: u32,
}

impl<T> QueuedJob<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            attempts: 0,
        }
    }

    /// Consume the job for another attempt, bumping the counter.
    pub fn retried(mut self) -> Self {
        self.attempts += 1;
        self
    }
}
