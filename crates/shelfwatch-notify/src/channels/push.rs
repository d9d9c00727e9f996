//! Push-like channel adapter (simulated).

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use shelfwatch_core::Channel;

use super::ChannelAdapter;
use crate::message::NotificationMessage;
use crate::{Error, Result};

/// Simulated push notification delivery.
///
/// The most reliable of the simulated external channels.
#[derive(Debug, Clone)]
pub struct PushAdapter {
    api_key: String,
    latency: Duration,
    failure_rate: f64,
}

impl PushAdapter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            latency: Duration::from_millis(10),
            failure_rate: 0.02,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate;
        self
    }

    /// Deterministic variant for tests: zero latency, never fails.
    pub fn reliable(api_key: impl Into<String>) -> Self {
        Self::new(api_key)
            .with_latency(Duration::ZERO)
            .with_failure_rate(0.0)
    }
}

#[async_trait]
impl ChannelAdapter for PushAdapter {
    fn channel(&self) -> Channel {
        Channel::Push
    }

    async fn send(&self, message: &NotificationMessage) -> bool {
        tokio::time::sleep(self.latency).await;

        let success = rand::thread_rng().gen::<f64>() >= self.failure_rate;
        if success {
            tracing::info!(
                notification_id = %message.id,
                user_id = %message.user_id,
                "push notification sent"
            );
        } else {
            tracing::warn!(
                notification_id = %message.id,
                user_id = %message.user_id,
                "push delivery failed"
            );
        }
        success
    }

    fn validate_config(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::InvalidConfiguration(
                "push api key is empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfwatch_core::EventId;

    #[tokio::test]
    async fn test_reliable_send() {
        let adapter = PushAdapter::reliable("key");
        let msg =
            NotificationMessage::new(EventId::new(), "user-1", Channel::Push, "Subject", "Content");

        assert!(adapter.send(&msg).await);
    }

    #[test]
    fn test_validate_config() {
        assert!(PushAdapter::new("key").validate_config().is_ok());
        assert!(PushAdapter::new("").validate_config().is_err());
    }
}
