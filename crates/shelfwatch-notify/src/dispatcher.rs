//! Notification dispatcher.
//!
//! Orchestrates "for this user, for this event, send through every channel
//! the user has enabled for this event type" and records per-message
//! results. Preference state is read at dispatch time, never cached at
//! enqueue time, so a user disabled mid-flight receives nothing.

use std::sync::Arc;

use shelfwatch_core::{Channel, EventId, EventType};

use crate::channels::{AdapterRegistry, InAppAdapter};
use crate::message::NotificationMessage;
use crate::preferences::PreferenceStore;
use crate::{Error, Result};

/// Fans alert decisions out across channel adapters.
pub struct NotificationDispatcher {
    preferences: Arc<dyn PreferenceStore>,
    adapters: Arc<AdapterRegistry>,
    inbox: Arc<InAppAdapter>,
}

impl NotificationDispatcher {
    /// Dispatcher over the four reference adapters.
    pub async fn new(preferences: Arc<dyn PreferenceStore>) -> Self {
        let (adapters, inbox) = AdapterRegistry::with_defaults().await;
        Self {
            preferences,
            adapters: Arc::new(adapters),
            inbox,
        }
    }

    /// Dispatcher over a custom adapter registry.
    ///
    /// The in-app adapter must be registered in `adapters` as well; it is
    /// passed separately because the inbox is also a query surface.
    pub fn with_registry(
        preferences: Arc<dyn PreferenceStore>,
        adapters: Arc<AdapterRegistry>,
        inbox: Arc<InAppAdapter>,
    ) -> Self {
        Self {
            preferences,
            adapters,
            inbox,
        }
    }

    /// Deliver one alert to one user across their configured channels.
    ///
    /// The user's preferred channels for the event type are intersected
    /// with the evaluator's recommended channels, preserving the user's
    /// preference order. Every resolved channel is attempted; one channel
    /// failing never short-circuits the rest. Returns the attempted
    /// messages in preference order.
    ///
    /// An absent preference or a disabled user yields an empty list with
    /// no side effects; both are normal states, not errors.
    pub async fn send_notifications_for_event(
        &self,
        event_id: &EventId,
        event_type: EventType,
        user_id: &str,
        recommended: &[Channel],
        subject: &str,
        content: &str,
    ) -> Vec<NotificationMessage> {
        let Some(prefs) = self.preferences.get(user_id).await else {
            tracing::debug!(user_id, "no preferences configured, skipping delivery");
            return Vec::new();
        };

        if !prefs.enabled {
            tracing::debug!(user_id, "notifications disabled, skipping delivery");
            return Vec::new();
        }

        let resolved: Vec<Channel> = prefs
            .channels_for(event_type)
            .iter()
            .copied()
            .filter(|c| recommended.contains(c))
            .collect();

        if resolved.is_empty() {
            tracing::debug!(user_id, event_type = %event_type, "no channels resolved for event type");
            return Vec::new();
        }

        let mut results = Vec::with_capacity(resolved.len());

        for channel in resolved {
            let mut message =
                NotificationMessage::new(event_id.clone(), user_id, channel, subject, content);

            let success = match self.adapters.get(channel).await {
                Some(adapter) => adapter.send(&message).await,
                None => {
                    tracing::warn!(channel = %channel, "no adapter registered for preferred channel");
                    false
                }
            };

            message.mark_sent(success);
            results.push(message);
        }

        tracing::info!(
            event_id = %event_id,
            user_id,
            attempted = results.len(),
            delivered = results.iter().filter(|m| m.was_sent()).count(),
            "notification fan-out complete"
        );

        results
    }

    /// Send directly through one channel, bypassing preference lookup.
    ///
    /// Used by the test-notification surface.
    pub async fn send_direct(
        &self,
        user_id: &str,
        channel: Channel,
        subject: &str,
        content: &str,
    ) -> Result<NotificationMessage> {
        let adapter = self
            .adapters
            .get(channel)
            .await
            .ok_or_else(|| Error::UnknownChannel(channel.to_string()))?;

        // Synthetic event id: a direct send has no originating event.
        let mut message =
            NotificationMessage::new(EventId::new(), user_id, channel, subject, content);
        let success = adapter.send(&message).await;
        message.mark_sent(success);
        Ok(message)
    }

    /// The user's in-app inbox, oldest first.
    pub async fn in_app_notifications(&self, user_id: &str) -> Vec<NotificationMessage> {
        self.inbox.messages_for(user_id).await
    }

    /// Clear the user's in-app inbox.
    pub async fn clear_in_app_notifications(&self, user_id: &str) {
        self.inbox.clear_for(user_id).await;
    }

    /// Validate every registered adapter; `true` only when all pass.
    pub async fn validate_all_adapters(&self) -> bool {
        self.adapters.validate_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{EmailAdapter, PushAdapter, SmsAdapter};
    use crate::preferences::{InMemoryPreferenceStore, UserPreferences};

    async fn test_dispatcher() -> (NotificationDispatcher, Arc<InMemoryPreferenceStore>) {
        let prefs = Arc::new(InMemoryPreferenceStore::new());

        let registry = AdapterRegistry::new();
        let inbox = Arc::new(InAppAdapter::new());
        registry
            .register(Arc::new(EmailAdapter::reliable("alerts@example.com")))
            .await;
        registry.register(Arc::new(SmsAdapter::reliable("TEST"))).await;
        registry.register(Arc::new(PushAdapter::reliable("key"))).await;
        registry.register(inbox.clone()).await;

        let dispatcher = NotificationDispatcher::with_registry(
            prefs.clone() as Arc<dyn PreferenceStore>,
            Arc::new(registry),
            inbox,
        );
        (dispatcher, prefs)
    }

    const ALL_CHANNELS: [Channel; 4] =
        [Channel::Email, Channel::Sms, Channel::Push, Channel::InApp];

    #[tokio::test]
    async fn test_no_preferences_no_delivery() {
        let (dispatcher, _prefs) = test_dispatcher().await;

        let sent = dispatcher
            .send_notifications_for_event(
                &EventId::new(),
                EventType::LowStock,
                "nobody",
                &ALL_CHANNELS,
                "Subject",
                "Content",
            )
            .await;

        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_user_no_delivery() {
        let (dispatcher, prefs) = test_dispatcher().await;
        prefs
            .update(
                UserPreferences::new("user-1")
                    .with_channels(EventType::LowStock, vec![Channel::Email, Channel::InApp])
                    .disabled(),
            )
            .await;

        let sent = dispatcher
            .send_notifications_for_event(
                &EventId::new(),
                EventType::LowStock,
                "user-1",
                &ALL_CHANNELS,
                "Subject",
                "Content",
            )
            .await;

        assert!(sent.is_empty());
        assert_eq!(dispatcher.in_app_notifications("user-1").await.len(), 0);
    }

    #[tokio::test]
    async fn test_default_deny_for_unconfigured_event_type() {
        let (dispatcher, prefs) = test_dispatcher().await;
        prefs
            .update(
                UserPreferences::new("user-1")
                    .with_channels(EventType::LowStock, vec![Channel::Email]),
            )
            .await;

        let sent = dispatcher
            .send_notifications_for_event(
                &EventId::new(),
                EventType::ImminentExpiration,
                "user-1",
                &ALL_CHANNELS,
                "Subject",
                "Content",
            )
            .await;

        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn test_fan_out_preserves_preference_order() {
        let (dispatcher, prefs) = test_dispatcher().await;
        prefs
            .update(UserPreferences::new("user-1").with_channels(
                EventType::LowStock,
                vec![Channel::InApp, Channel::Email, Channel::Sms],
            ))
            .await;

        let sent = dispatcher
            .send_notifications_for_event(
                &EventId::new(),
                EventType::LowStock,
                "user-1",
                &ALL_CHANNELS,
                "Subject",
                "Content",
            )
            .await;

        let channels: Vec<Channel> = sent.iter().map(|m| m.channel).collect();
        assert_eq!(channels, vec![Channel::InApp, Channel::Email, Channel::Sms]);
        assert!(sent.iter().all(|m| m.sent == Some(true)));
    }

    #[tokio::test]
    async fn test_recommended_channels_limit_fan_out() {
        let (dispatcher, prefs) = test_dispatcher().await;
        prefs
            .update(UserPreferences::new("user-1").with_channels(
                EventType::LowStock,
                vec![Channel::Email, Channel::Sms, Channel::InApp],
            ))
            .await;

        // The evaluator recommends email + in-app only; sms stays silent.
        let sent = dispatcher
            .send_notifications_for_event(
                &EventId::new(),
                EventType::LowStock,
                "user-1",
                &[Channel::Email, Channel::InApp],
                "Subject",
                "Content",
            )
            .await;

        let channels: Vec<Channel> = sent.iter().map(|m| m.channel).collect();
        assert_eq!(channels, vec![Channel::Email, Channel::InApp]);
    }

    #[tokio::test]
    async fn test_one_channel_failing_does_not_short_circuit() {
        let prefs = Arc::new(InMemoryPreferenceStore::new());
        let registry = AdapterRegistry::new();
        let inbox = Arc::new(InAppAdapter::new());
        registry
            .register(Arc::new(
                EmailAdapter::new("alerts@example.com")
                    .with_latency(std::time::Duration::ZERO)
                    .with_failure_rate(1.0),
            ))
            .await;
        registry.register(inbox.clone()).await;

        let dispatcher = NotificationDispatcher::with_registry(
            prefs.clone() as Arc<dyn PreferenceStore>,
            Arc::new(registry),
            inbox,
        );

        prefs
            .update(
                UserPreferences::new("user-1")
                    .with_channels(EventType::LowStock, vec![Channel::Email, Channel::InApp]),
            )
            .await;

        let sent = dispatcher
            .send_notifications_for_event(
                &EventId::new(),
                EventType::LowStock,
                "user-1",
                &ALL_CHANNELS,
                "Subject",
                "Content",
            )
            .await;

        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].sent, Some(false));
        assert_eq!(sent[1].sent, Some(true));
        assert_eq!(dispatcher.in_app_notifications("user-1").await.len(), 1);
    }

    #[tokio::test]
    async fn test_in_app_inbox_additive_until_cleared() {
        let (dispatcher, prefs) = test_dispatcher().await;
        prefs
            .update(
                UserPreferences::new("user-1")
                    .with_channels(EventType::LowStock, vec![Channel::InApp]),
            )
            .await;

        for _ in 0..3 {
            dispatcher
                .send_notifications_for_event(
                    &EventId::new(),
                    EventType::LowStock,
                    "user-1",
                    &ALL_CHANNELS,
                    "Subject",
                    "Content",
                )
                .await;
        }

        assert_eq!(dispatcher.in_app_notifications("user-1").await.len(), 3);

        dispatcher.clear_in_app_notifications("user-1").await;
        assert_eq!(dispatcher.in_app_notifications("user-1").await.len(), 0);
    }

    #[tokio::test]
    async fn test_send_direct_bypasses_preferences() {
        let (dispatcher, _prefs) = test_dispatcher().await;

        // No preferences registered at all.
        let message = dispatcher
            .send_direct("user-1", Channel::InApp, "Test", "Direct send")
            .await
            .unwrap();

        assert_eq!(message.sent, Some(true));
        assert_eq!(dispatcher.in_app_notifications("user-1").await.len(), 1);
    }

    #[tokio::test]
    async fn test_send_direct_unknown_channel() {
        let prefs = Arc::new(InMemoryPreferenceStore::new());
        let registry = AdapterRegistry::new();
        let inbox = Arc::new(InAppAdapter::new());

        let dispatcher = NotificationDispatcher::with_registry(
            prefs as Arc<dyn PreferenceStore>,
            Arc::new(registry),
            inbox,
        );

        let result = dispatcher
            .send_direct("user-1", Channel::Email, "Test", "Direct send")
            .await;
        assert!(matches!(result, Err(Error::UnknownChannel(_))));
    }

    #[tokio::test]
    async fn test_validate_all_adapters() {
        let (dispatcher, _prefs) = test_dispatcher().await;
        assert!(dispatcher.validate_all_adapters().await);
    }
}
