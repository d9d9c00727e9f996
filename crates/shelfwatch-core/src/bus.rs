//! Pipeline event bus.
//!
//! Components report what happened (event accepted, evaluated, notification
//! sent, job failed) by publishing to a broadcast bus. Subscribers observe
//! the pipeline without participating in it; a slow subscriber drops events
//! rather than applying backpressure to the workers.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::event::{Channel, EventId, Severity};

/// Default channel capacity for the event bus.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Observability events published by the pipeline.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// An event was accepted at the ingestion boundary.
    EventAccepted { event_id: EventId, user_id: String },
    /// The evaluator finished an event.
    EventEvaluated {
        event_id: EventId,
        alerted: bool,
        severity: Option<Severity>,
    },
    /// One notification message was attempted.
    NotificationSent {
        event_id: EventId,
        user_id: String,
        channel: Channel,
        success: bool,
    },
    /// A queue job exhausted its retries or failed terminally.
    JobFailed { queue: &'static str, reason: String },
}

/// Broadcast bus for pipeline events.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PipelineEvent>,
}

impl EventBus {
    /// Create a new event bus with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new event bus with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Get the number of current subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish an event. Returns `true` if at least one subscriber received it.
    pub fn publish(&self, event: PipelineEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Subscribe to all pipeline events.
    pub fn subscribe(&self) -> EventBusReceiver {
        EventBusReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver for pipeline events.
pub struct EventBusReceiver {
    rx: broadcast::Receiver<PipelineEvent>,
}

impl EventBusReceiver {
    /// Receive the next event.
    ///
    /// Returns `None` if the bus is closed. A lagged receiver skips the
    /// missed events and keeps receiving.
    pub async fn recv(&mut self) -> Option<PipelineEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&mut self) -> Option<PipelineEvent> {
        self.rx.try_recv().ok()
    }
}

/// Shared event bus handle.
pub type SharedEventBus = Arc<EventBus>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(PipelineEvent::EventAccepted {
            event_id: EventId::new(),
            user_id: "user-1".to_string(),
        });

        let received = rx.recv().await.unwrap();
        assert!(matches!(received, PipelineEvent::EventAccepted { .. }));
    }

    #[tokio::test]
    async fn test_no_subscribers() {
        let bus = EventBus::new();
        assert!(!bus.publish(PipelineEvent::JobFailed {
            queue: "events",
            reason: "test".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(PipelineEvent::EventEvaluated {
            event_id: EventId::new(),
            alerted: true,
            severity: Some(Severity::High),
        });

        assert!(rx1.recv().await.is_some());
        assert!(rx2.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_try_recv() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        assert!(rx.try_recv().is_none());

        bus.publish(PipelineEvent::NotificationSent {
            event_id: EventId::new(),
            user_id: "user-1".to_string(),
            channel: Channel::InApp,
            success: true,
        });

        assert!(rx.try_recv().is_some());
    }
}
