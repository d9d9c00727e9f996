//! Two-stage asynchronous job pipeline.
//!
//! Events flow through two bounded in-memory queues: the event queue feeds
//! threshold evaluation, the notification queue feeds per-channel delivery.
//! A [`Worker`] runs one consumer loop per queue, each with its own
//! concurrency limit, and retries transient failures up to a bounded
//! attempt count. [`Pipeline`] wires the queues, worker, stores and
//! dispatcher together behind a single handle.

pub mod job;
pub mod pipeline;
pub mod queue;
pub mod worker;

pub use job::{DeliverJob, EvaluateJob, QueuedJob};
pub use pipeline::{Pipeline, PipelineConfig, PipelineStats};
pub use queue::{JobQueue, QueueError, QueueStats, DEFAULT_QUEUE_SIZE};
pub use worker::{Worker, WorkerConfig};
