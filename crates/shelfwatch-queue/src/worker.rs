//! Queue consumer loops.
//!
//! One worker runs two independent consumer loops, one per queue, each
//! with its own concurrency limit. Jobs that fail transiently are retried
//! up to a bounded attempt count; a job referencing a missing event fails
//! terminally, since retrying cannot conjure a missing event. A failing
//! job never takes the worker down.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shelfwatch_core::{AlertEvent, EventStore, PipelineEvent, SharedEventBus};
use shelfwatch_notify::NotificationDispatcher;
use shelfwatch_rules::{generate_alert_message, AlertDecision, ThresholdEvaluator};
use tokio::sync::{RwLock, Semaphore};
use tokio::task::JoinHandle;

use crate::job::{DeliverJob, EvaluateJob, QueuedJob};
use crate::queue::JobQueue;

/// Worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Poll interval for checking the queues.
    pub poll_interval_ms: u64,
    /// Concurrent jobs on the event queue.
    pub event_concurrency: usize,
    /// Concurrent jobs on the notification queue.
    pub notification_concurrency: usize,
    /// Total attempts before a job is marked failed.
    pub max_attempts: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            event_concurrency: 4,
            notification_concurrency: 8,
            max_attempts: 3,
        }
    }
}

/// Pipeline worker running the two consumer loops.
pub struct Worker {
    config: WorkerConfig,
    store: Arc<dyn EventStore>,
    evaluator: Arc<ThresholdEvaluator>,
    dispatcher: Arc<NotificationDispatcher>,
    event_queue: Arc<JobQueue<EvaluateJob>>,
    notification_queue: Arc<JobQueue<DeliverJob>>,
    bus: SharedEventBus,
    running: Arc<RwLock<bool>>,
    task_handles: Arc<RwLock<Vec<JoinHandle<()>>>>,
    event_semaphore: Arc<Semaphore>,
    notification_semaphore: Arc<Semaphore>,
}

impl Worker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: WorkerConfig,
        store: Arc<dyn EventStore>,
        evaluator: Arc<ThresholdEvaluator>,
        dispatcher: Arc<NotificationDispatcher>,
        event_queue: Arc<JobQueue<EvaluateJob>>,
        notification_queue: Arc<JobQueue<DeliverJob>>,
        bus: SharedEventBus,
    ) -> Self {
        let event_semaphore = Arc::new(Semaphore::new(config.event_concurrency));
        let notification_semaphore = Arc::new(Semaphore::new(config.notification_concurrency));
        Self {
            config,
            store,
            evaluator,
            dispatcher,
            event_queue,
            notification_queue,
            bus,
            running: Arc::new(RwLock::new(false)),
            task_handles: Arc::new(RwLock::new(Vec::new())),
            event_semaphore,
            notification_semaphore,
        }
    }

    /// Start both consumer loops. Idempotent while running.
    pub async fn start(&self) {
        let mut running = self.running.write().await;
        if *running {
            return;
        }
        *running = true;
        drop(running);

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        let event_loop = {
            let ctx = EventJobContext {
                store: self.store.clone(),
                evaluator: self.evaluator.clone(),
                event_queue: self.event_queue.clone(),
                notification_queue: self.notification_queue.clone(),
                bus: self.bus.clone(),
                max_attempts: self.config.max_attempts,
            };
            let running = self.running.clone();
            let queue = self.event_queue.clone();
            let semaphore = self.event_semaphore.clone();

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(poll_interval);
                loop {
                    if !*running.read().await {
                        break;
                    }
                    interval.tick().await;

                    while let Some(job) = queue.try_dequeue().await {
                        let permit = match semaphore.clone().acquire_owned().await {
                            Ok(permit) => permit,
                            Err(_) => return,
                        };
                        let ctx = ctx.clone();
                        tokio::spawn(async move {
                            handle_evaluate_job(job, &ctx).await;
                            drop(permit);
                        });
                    }
                }
            })
        };

        let notification_loop = {
            let ctx = DeliverJobContext {
                store: self.store.clone(),
                evaluator: self.evaluator.clone(),
                dispatcher: self.dispatcher.clone(),
                notification_queue: self.notification_queue.clone(),
                bus: self.bus.clone(),
                max_attempts: self.config.max_attempts,
            };
            let running = self.running.clone();
            let queue = self.notification_queue.clone();
            let semaphore = self.notification_semaphore.clone();

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(poll_interval);
                loop {
                    if !*running.read().await {
                        break;
                    }
                    interval.tick().await;

                    while let Some(job) = queue.try_dequeue().await {
                        let permit = match semaphore.clone().acquire_owned().await {
                            Ok(permit) => permit,
                            Err(_) => return,
                        };
                        let ctx = ctx.clone();
                        tokio::spawn(async move {
                            handle_deliver_job(job, &ctx).await;
                            drop(permit);
                        });
                    }
                }
            })
        };

        let mut handles = self.task_handles.write().await;
        handles.push(event_loop);
        handles.push(notification_loop);

        tracing::info!(
            event_concurrency = self.config.event_concurrency,
            notification_concurrency = self.config.notification_concurrency,
            "worker started"
        );
    }

    /// Stop the consumer loops and wait for them to exit.
    ///
    /// In-flight jobs finish; waiting jobs stay queued.
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        if !*running {
            return;
        }
        *running = false;
        drop(running);

        let mut handles = self.task_handles.write().await;
        for handle in handles.drain(..) {
            handle.await.ok();
        }
        drop(handles);

        // The loops are gone, so no new jobs can start; holding every
        // permit means every spawned job has settled its queue slot.
        if let Ok(permits) = self
            .event_semaphore
            .acquire_many(self.config.event_concurrency as u32)
            .await
        {
            drop(permits);
        }
        if let Ok(permits) = self
            .notification_semaphore
            .acquire_many(self.config.notification_concurrency as u32)
            .await
        {
            drop(permits);
        }

        tracing::info!("worker stopped");
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}

#[derive(Clone)]
struct EventJobContext {
    store: Arc<dyn EventStore>,
    evaluator: Arc<ThresholdEvaluator>,
    event_queue: Arc<JobQueue<EvaluateJob>>,
    notification_queue: Arc<JobQueue<DeliverJob>>,
    bus: SharedEventBus,
    max_attempts: u32,
}

#[derive(Clone)]
struct DeliverJobContext {
    store: Arc<dyn EventStore>,
    evaluator: Arc<ThresholdEvaluator>,
    dispatcher: Arc<NotificationDispatcher>,
    notification_queue: Arc<JobQueue<DeliverJob>>,
    bus: SharedEventBus,
    max_attempts: u32,
}

/// Evaluate one event and, when it alerts, hand it to the notification
/// queue.
async fn handle_evaluate_job(job: QueuedJob<EvaluateJob>, ctx: &EventJobContext) {
    let event_id = job.payload.event_id.clone();

    let Some(event) = ctx.store.get(&event_id).await else {
        // A missing event is terminal, not retryable.
        tracing::warn!(event_id = %event_id, "event not found, failing evaluation job");
        ctx.event_queue.ack_failure();
        ctx.bus.publish(PipelineEvent::JobFailed {
            queue: "events",
            reason: format!("event {} not found", event_id),
        });
        return;
    };

    match ctx.evaluator.evaluate(&event) {
        AlertDecision::NoAlert => {
            ctx.store.mark_processed(&event_id).await;
            ctx.bus.publish(PipelineEvent::EventEvaluated {
                event_id,
                alerted: false,
                severity: None,
            });
            ctx.event_queue.ack_success();
        }
        AlertDecision::Alert { severity, .. } => {
            // Record the evaluated severity before fanning out.
            let updated = AlertEvent {
                severity: Some(severity),
                ..event.clone()
            };
            if let Err(err) = ctx.store.store(updated).await {
                retry_or_fail(job, &ctx.event_queue, "events", ctx, err.to_string()).await;
                return;
            }

            let deliver = DeliverJob::new(event_id.clone(), event.user_id.clone());
            match ctx.notification_queue.enqueue(deliver).await {
                Ok(()) => {
                    ctx.store.mark_processed(&event_id).await;
                    ctx.bus.publish(PipelineEvent::EventEvaluated {
                        event_id,
                        alerted: true,
                        severity: Some(severity),
                    });
                    ctx.event_queue.ack_success();
                }
                Err(err) => {
                    retry_or_fail(job, &ctx.event_queue, "events", ctx, err.to_string()).await;
                }
            }
        }
    }
}

/// Re-derive the alert decision for an already-processed event and fan
/// the notification out across the user's channels.
async fn handle_deliver_job(job: QueuedJob<DeliverJob>, ctx: &DeliverJobContext) {
    let event_id = job.payload.event_id.clone();
    let user_id = job.payload.user_id.clone();

    let Some(event) = ctx.store.get(&event_id).await else {
        tracing::warn!(event_id = %event_id, "event not found, failing delivery job");
        ctx.notification_queue.ack_failure();
        ctx.bus.publish(PipelineEvent::JobFailed {
            queue: "notifications",
            reason: format!("event {} not found", event_id),
        });
        return;
    };

    let AlertDecision::Alert { severity, channels } = ctx.evaluator.evaluate(&event) else {
        // Evaluation is deterministic; nothing to deliver, nothing to retry.
        tracing::debug!(event_id = %event_id, "event no longer alerts, nothing to deliver");
        ctx.notification_queue.ack_success();
        return;
    };

    let message = generate_alert_message(&event, severity);
    let sent = ctx
        .dispatcher
        .send_notifications_for_event(
            &event_id,
            event.event_type,
            &user_id,
            &channels,
            &message.subject,
            &message.content,
        )
        .await;

    for msg in &sent {
        ctx.bus.publish(PipelineEvent::NotificationSent {
            event_id: event_id.clone(),
            user_id: user_id.clone(),
            channel: msg.channel,
            success: msg.was_sent(),
        });
    }

    // An empty fan-out (disabled user, no preference) is a successful
    // no-op. A failed channel makes the whole job retryable; a retry
    // re-attempts every configured channel (at-least-once delivery).
    if sent.iter().all(|m| m.was_sent()) {
        ctx.notification_queue.ack_success();
    } else {
        let failed = sent.iter().filter(|m| !m.was_sent()).count();
        deliver_retry_or_fail(job, ctx, format!("{} channel(s) failed delivery", failed)).await;
    }
}

async fn retry_or_fail(
    job: QueuedJob<EvaluateJob>,
    queue: &JobQueue<EvaluateJob>,
    queue_name: &'static str,
    ctx: &EventJobContext,
    reason: String,
) {
    let job = job.retried();
    if job.attempts >= ctx.max_attempts {
        tracing::error!(
            queue = queue_name,
            attempts = job.attempts,
            reason = %reason,
            "job exhausted retries"
        );
        queue.ack_failure();
        ctx.bus.publish(PipelineEvent::JobFailed {
            queue: queue_name,
            reason,
        });
        return;
    }

    tracing::warn!(
        queue = queue_name,
        attempts = job.attempts,
        reason = %reason,
        "retrying job"
    );
    match queue.requeue(job).await {
        Ok(()) => queue.release(),
        Err(err) => {
            queue.ack_failure();
            ctx.bus.publish(PipelineEvent::JobFailed {
                queue: queue_name,
                reason: format!("requeue failed: {}", err),
            });
        }
    }
}

async fn deliver_retry_or_fail(job: QueuedJob<DeliverJob>, ctx: &DeliverJobContext, reason: String) {
    let job = job.retried();
    if job.attempts >= ctx.max_attempts {
        tracing::error!(
            queue = "notifications",
            attempts = job.attempts,
            reason = %reason,
            "job exhausted retries"
        );
        ctx.notification_queue.ack_failure();
        ctx.bus.publish(PipelineEvent::JobFailed {
            queue: "notifications",
            reason,
        });
        return;
    }

    tracing::warn!(
        queue = "notifications",
        attempts = job.attempts,
        reason = %reason,
        "retrying job"
    );
    match ctx.notification_queue.requeue(job).await {
        Ok(()) => ctx.notification_queue.release(),
        Err(err) => {
            ctx.notification_queue.ack_failure();
            ctx.bus.publish(PipelineEvent::JobFailed {
                queue: "notifications",
                reason: format!("requeue failed: {}", err),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_config_default() {
        let config = WorkerConfig::default();
        assert_eq!(config.poll_interval_ms, 50);
        assert_eq!(config.event_concurrency, 4);
        assert_eq!(config.notification_concurrency, 8);
        assert_eq!(config.max_attempts, 3);
    }
}
