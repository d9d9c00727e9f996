//! Notification message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelfwatch_core::{Channel, EventId};
use uuid::Uuid;

/// Unique notification identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One delivery attempt through one channel.
///
/// Created immediately before the adapter is invoked. `sent` is tri-state:
/// `None` until the attempt resolves, then `Some(true)`/`Some(false)`;
/// `sent`/`sent_at` are the only mutable fields, written once by the
/// dispatcher after the adapter call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMessage {
    pub id: NotificationId,
    pub event_id: EventId,
    pub user_id: String,
    pub channel: Channel,
    pub subject: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

impl NotificationMessage {
    pub fn new(
        event_id: EventId,
        user_id: impl Into<String>,
        channel: Channel,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            event_id,
            user_id: user_id.into(),
            channel,
            subject: subject.into(),
            content: content.into(),
            sent: None,
            sent_at: None,
        }
    }

    /// Record the delivery outcome.
    pub fn mark_sent(&mut self, success: bool) {
        self.sent = Some(success);
        self.sent_at = Some(Utc::now());
    }

    pub fn was_sent(&self) -> bool {
        self.sent == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = NotificationMessage::new(
            EventId::new(),
            "user-1",
            Channel::Email,
            "Low stock",
            "3 units remaining",
        );

        assert_eq!(msg.channel, Channel::Email);
        assert_eq!(msg.sent, None);
        assert_eq!(msg.sent_at, None);
        assert!(!msg.was_sent());
    }

    #[test]
    fn test_mark_sent() {
        let mut msg =
            NotificationMessage::new(EventId::new(), "user-1", Channel::Sms, "Subject", "Content");

        msg.mark_sent(true);
        assert_eq!(msg.sent, Some(true));
        assert!(msg.sent_at.is_some());
        assert!(msg.was_sent());

        let mut failed =
            NotificationMessage::new(EventId::new(), "user-1", Channel::Sms, "Subject", "Content");
        failed.mark_sent(false);
        assert_eq!(failed.sent, Some(false));
        assert!(!failed.was_sent());
    }

    #[test]
    fn test_serde_shape() {
        let msg = NotificationMessage::new(
            EventId::new(),
            "user-1",
            Channel::InApp,
            "Subject",
            "Content",
        );
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["userId"], "user-1");
        assert_eq!(value["channel"], "IN_APP");
        // Unresolved attempts serialize without sent/sentAt.
        assert!(value.get("sent").is_none());
    }
}
