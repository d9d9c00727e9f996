//! Event storage.
//!
//! The store contract is deliberately narrow so the in-memory reference
//! implementation can be swapped for a durable backend without changing
//! callers. Lookups of missing events return `None`; absence is a normal,
//! non-exceptional state.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::event::{AlertEvent, EventId, EventType};

/// Keyed storage of raw alert events.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Store an event. Last write wins on id.
    async fn store(&self, event: AlertEvent) -> Result<()>;

    /// Get an event by id.
    async fn get(&self, id: &EventId) -> Option<AlertEvent>;

    /// Get all events of a type.
    async fn get_by_type(&self, event_type: EventType) -> Vec<AlertEvent>;

    /// Get all events for a user.
    async fn get_by_user(&self, user_id: &str) -> Vec<AlertEvent>;

    /// Flip the processed flag. Returns `false` if the event is unknown.
    async fn mark_processed(&self, id: &EventId) -> bool;
}

/// In-memory event store.
///
/// Events are never evicted; retention is a production-store concern.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<HashMap<EventId, AlertEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn store(&self, event: AlertEvent) -> Result<()> {
        self.events.write().await.insert(event.id.clone(), event);
        Ok(())
    }

    async fn get(&self, id: &EventId) -> Option<AlertEvent> {
        self.events.read().await.get(id).cloned()
    }

    async fn get_by_type(&self, event_type: EventType) -> Vec<AlertEvent> {
        self.events
            .read()
            .await
            .values()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    async fn get_by_user(&self, user_id: &str) -> Vec<AlertEvent> {
        self.events
            .read()
            .await
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }

    async fn mark_processed(&self, id: &EventId) -> bool {
        match self.events.write().await.get_mut(id) {
            Some(event) => {
                event.processed = true;
                true
            }
            None => false,
        }
    }
}
