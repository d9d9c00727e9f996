//! Bounded in-memory job queue with failure accounting.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::job::QueuedJob;

/// Default queue capacity.
pub const DEFAULT_QUEUE_SIZE: usize = 10_000;

/// Point-in-time queue counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    /// Jobs waiting to be dequeued.
    pub waiting: u64,
    /// Jobs dequeued and currently being processed.
    pub active: u64,
    /// Jobs that finished successfully.
    pub completed: u64,
    /// Jobs that failed terminally (exhausted retries or unretryable).
    pub failed: u64,
}

/// Queue error types.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("queue is full")]
    Full,

    #[error("queue is closed")]
    Closed,

    #[error("queue operation failed: {0}")]
    Failed(String),
}

/// FIFO job queue bounded by `max_size`.
///
/// Dequeued jobs are tracked as active until the consumer settles them
/// with [`ack_success`](JobQueue::ack_success),
/// [`ack_failure`](JobQueue::ack_failure), or
/// [`release`](JobQueue::release) after a requeue. The queue itself never
/// retries; retry policy belongs to the worker.
pub struct JobQueue<T> {
    inner: RwLock<Inner<T>>,
    active: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

struct Inner<T> {
    queue: VecDeque<QueuedJob<T>>,
    max_size: usize,
    closed: bool,
}

impl<T> JobQueue<T> {
    /// Create a queue holding at most `max_size` waiting jobs.
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                queue: VecDeque::new(),
                max_size,
                closed: false,
            }),
            active: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Enqueue a fresh job.
    pub async fn enqueue(&self, payload: T) -> Result<(), QueueError> {
        self.push(QueuedJob::new(payload)).await
    }

    /// Put a previously dequeued job back for another attempt.
    ///
    /// The caller must still [`release`](JobQueue::release) the active slot.
    pub async fn requeue(&self, job: QueuedJob<T>) -> Result<(), QueueError> {
        self.push(job).await
    }

    async fn push(&self, job: QueuedJob<T>) -> Result<(), QueueError> {
        let mut inner = self.inner.write().await;
        if inner.closed {
            return Err(QueueError::Closed);
        }
        if inner.queue.len() >= inner.max_size {
            return Err(QueueError::Full);
        }
        inner.queue.push_back(job);
        Ok(())
    }

    /// Take the next job, marking it active. Non-blocking.
    pub async fn try_dequeue(&self) -> Option<QueuedJob<T>> {
        let job = self.inner.write().await.queue.pop_front();
        if job.is_some() {
            self.active.fetch_add(1, Ordering::Relaxed);
        }
        job
    }

    /// Settle an active job as completed.
    pub fn ack_success(&self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Settle an active job as terminally failed.
    pub fn ack_failure(&self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Release an active slot without a verdict (the job was requeued).
    pub fn release(&self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Reject further enqueues. Waiting jobs stay dequeueable.
    pub async fn close(&self) {
        self.inner.write().await.closed = true;
    }

    /// Number of waiting jobs.
    pub async fn len(&self) -> usize {
        self.inner.read().await.queue.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.queue.is_empty()
    }

    /// Snapshot of the queue counters.
    pub async fn stats(&self) -> QueueStats {
        QueueStats {
            waiting: self.inner.read().await.queue.len() as u64,
            active: self.active.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
