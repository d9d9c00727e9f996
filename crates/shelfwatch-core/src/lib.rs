//! Core domain types for the shelfwatch alerting pipeline.
//!
//! An [`AlertEvent`] is an immutable fact about the inventory ("stock fell
//! below N", "product expires in D days", "supplier order status changed")
//! that may or may not warrant notifying a user. Events are written once to
//! an [`EventStore`], evaluated asynchronously, and flipped to `processed`
//! exactly once.
//!
//! The store is a trait so the same pipeline runs against the in-memory
//! reference implementation or a durable backend without touching callers.

pub mod bus;
pub mod error;
pub mod event;
pub mod store;

pub use bus::{EventBus, PipelineEvent, SharedEventBus};
pub use error::{Error, Result};
pub use event::{AlertEvent, Channel, EventId, EventType, Severity};
pub use store::{EventStore, InMemoryEventStore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
