//! In-app channel adapter.
//!
//! The in-app channel is simultaneously a delivery mechanism and a
//! queryable inbox: every successful send appends to the recipient's
//! per-user list, which stays there until explicitly cleared.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use shelfwatch_core::Channel;
use tokio::sync::RwLock;

use super::ChannelAdapter;
use crate::message::NotificationMessage;
use crate::Result;

/// Per-user append-only inbox.
#[derive(Default)]
pub struct InAppAdapter {
    inboxes: RwLock<HashMap<String, Vec<NotificationMessage>>>,
}

impl InAppAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored messages for a user, oldest first.
    pub async fn messages_for(&self, user_id: &str) -> Vec<NotificationMessage> {
        self.inboxes
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Drop all stored messages for a user.
    pub async fn clear_for(&self, user_id: &str) {
        self.inboxes.write().await.remove(user_id);
    }

    /// Number of stored messages for a user.
    pub async fn count_for(&self, user_id: &str) -> usize {
        self.inboxes
            .read()
            .await
            .get(user_id)
            .map(|v| v.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl ChannelAdapter for InAppAdapter {
    fn channel(&self) -> Channel {
        Channel::InApp
    }

    async fn send(&self, message: &NotificationMessage) -> bool {
        let mut stored = message.clone();
        stored.sent = Some(true);
        stored.sent_at = Some(Utc::now());

        self.inboxes
            .write()
            .await
            .entry(message.user_id.clone())
            .or_default()
            .push(stored);

        tracing::info!(
            notification_id = %message.id,
            user_id = %message.user_id,
            "in-app notification stored"
        );
        true
    }

    fn validate_config(&self) -> Result<()> {
        // No external dependency.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfwatch_core::EventId;

    fn message(user_id: &str) -> NotificationMessage {
        NotificationMessage::new(EventId::new(), user_id, Channel::InApp, "Subject", "Content")
    }

    #[tokio::test]
    async fn test_send_appends() {
        let adapter = InAppAdapter::new();

        assert!(adapter.send(&message("user-1")).await);
        assert!(adapter.send(&message("user-1")).await);
        assert!(adapter.send(&message("user-2")).await);

        assert_eq!(adapter.count_for("user-1").await, 2);
        assert_eq!(adapter.count_for("user-2").await, 1);
        assert_eq!(adapter.count_for("nobody").await, 0);
    }

    #[tokio::test]
    async fn test_stored_messages_are_marked_sent() {
        let adapter = InAppAdapter::new();
        adapter.send(&message("user-1")).await;

        let stored = adapter.messages_for("user-1").await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].sent, Some(true));
        assert!(stored[0].sent_at.is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let adapter = InAppAdapter::new();
        adapter.send(&message("user-1")).await;
        adapter.send(&message("user-2")).await;

        adapter.clear_for("user-1").await;

        assert_eq!(adapter.count_for("user-1").await, 0);
        // Other inboxes untouched.
        assert_eq!(adapter.count_for("user-2").await, 1);
    }

    #[tokio::test]
    async fn test_validate_config_is_trivially_ok() {
        let adapter = InAppAdapter::new();
        assert!(adapter.validate_config().is_ok());
    }
}
