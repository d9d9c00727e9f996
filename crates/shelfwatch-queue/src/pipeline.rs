//! Pipeline assembly.
//!
//! Wires the event store, preference store, evaluator, dispatcher, the two
//! job queues and the worker into a single handle the API surface and the
//! CLI hold on to.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shelfwatch_core::{
    AlertEvent, EventBus, EventId, EventStore, InMemoryEventStore, PipelineEvent, SharedEventBus,
};
use shelfwatch_notify::{InMemoryPreferenceStore, NotificationDispatcher, PreferenceStore};
use shelfwatch_rules::ThresholdEvaluator;

use crate::job::{DeliverJob, EvaluateJob};
use crate::queue::{JobQueue, QueueError, QueueStats, DEFAULT_QUEUE_SIZE};
use crate::worker::{Worker, WorkerConfig};

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Capacity of the event queue.
    pub event_queue_size: usize,
    /// Capacity of the notification queue.
    pub notification_queue_size: usize,
    /// Worker settings.
    pub worker: WorkerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            event_queue_size: DEFAULT_QUEUE_SIZE,
            notification_queue_size: DEFAULT_QUEUE_SIZE,
            worker: WorkerConfig::default(),
        }
    }
}

/// Combined counters for both queues.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    pub event_queue: QueueStats,
    pub notification_queue: QueueStats,
}

/// The assembled alerting pipeline.
pub struct Pipeline {
    store: Arc<dyn EventStore>,
    preferences: Arc<dyn PreferenceStore>,
    dispatcher: Arc<NotificationDispatcher>,
    event_queue: Arc<JobQueue<EvaluateJob>>,
    notification_queue: Arc<JobQueue<DeliverJob>>,
    worker: Worker,
    bus: SharedEventBus,
}

impl Pipeline {
    /// Assemble a pipeline over in-memory stores and the default channel
    /// adapters.
    pub async fn new(config: PipelineConfig) -> Self {
        let store: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::new());
        let preferences: Arc<dyn PreferenceStore> = Arc::new(InMemoryPreferenceStore::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(preferences.clone()).await);
        Self::with_components(
            config,
            store,
            preferences,
            dispatcher,
            Arc::new(ThresholdEvaluator::new()),
        )
    }

    /// Assemble a pipeline over caller-provided components.
    pub fn with_components(
        config: PipelineConfig,
        store: Arc<dyn EventStore>,
        preferences: Arc<dyn PreferenceStore>,
        dispatcher: Arc<NotificationDispatcher>,
        evaluator: Arc<ThresholdEvaluator>,
    ) -> Self {
        let bus: SharedEventBus = Arc::new(EventBus::new());
        let event_queue = Arc::new(JobQueue::new(config.event_queue_size));
        let notification_queue = Arc::new(JobQueue::new(config.notification_queue_size));

        let worker = Worker::new(
            config.worker,
            store.clone(),
            evaluator,
            dispatcher.clone(),
            event_queue.clone(),
            notification_queue.clone(),
            bus.clone(),
        );

        Self {
            store,
            preferences,
            dispatcher,
            event_queue,
            notification_queue,
            worker,
            bus,
        }
    }

    /// Start the worker loops.
    pub async fn start(&self) {
        self.worker.start().await;
    }

    /// Stop the worker loops, letting in-flight jobs finish.
    pub async fn stop(&self) {
        self.worker.stop().await;
    }

    pub async fn is_running(&self) -> bool {
        self.worker.is_running().await
    }

    /// Accept an event: persist it and queue it for evaluation.
    pub async fn submit_event(&self, event: AlertEvent) -> Result<EventId, QueueError> {
        let event_id = event.id.clone();
        let user_id = event.user_id.clone();

        if let Err(err) = self.store.store(event).await {
            tracing::error!(event_id = %event_id, error = %err, "failed to store event");
            return Err(QueueError::Failed(err.to_string()));
        }
        self.event_queue
            .enqueue(EvaluateJob::new(event_id.clone()))
            .await?;

        self.bus.publish(PipelineEvent::EventAccepted {
            event_id: event_id.clone(),
            user_id,
        });
        tracing::info!(event_id = %event_id, "event accepted");
        Ok(event_id)
    }

    /// Snapshot counters for both queues.
    pub async fn stats(&self) -> PipelineStats {
        PipelineStats {
            event_queue: self.event_queue.stats().await,
            notification_queue: self.notification_queue.stats().await,
        }
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    pub fn preferences(&self) -> &Arc<dyn PreferenceStore> {
        &self.preferences
    }

    pub fn dispatcher(&self) -> &Arc<NotificationDispatcher> {
        &self.dispatcher
    }

    pub fn bus(&self) -> &SharedEventBus {
        &self.bus
    }
}
