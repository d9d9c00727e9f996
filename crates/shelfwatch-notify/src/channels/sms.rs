//! SMS-like channel adapter (simulated).

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use shelfwatch_core::Channel;

use super::ChannelAdapter;
use crate::message::NotificationMessage;
use crate::{Error, Result};

/// Simulated SMS gateway delivery.
#[derive(Debug, Clone)]
pub struct SmsAdapter {
    sender_id: String,
    latency: Duration,
    failure_rate: f64,
}

impl SmsAdapter {
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            latency: Duration::from_millis(25),
            failure_rate: 0.05,
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
    pub fn reliable(sender_id: impl Into<String>) -> Self {
        Self::new(sender_id)
            .with_latency(Duration::ZERO)
            .with_failure_rate(0.0)
    }
}

#[async_trait]
impl ChannelAdapter for SmsAdapter {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    async fn send(&self, message: &NotificationMessage) -> bool {
        tokio::time::sleep(self.latency).await;

        let success = rand::thread_rng().gen::<f64>() >= self.failure_rate;
        if success {
            tracing::info!(
                notification_id = %message.id,
                user_id = %message.user_id,
                "sms sent"
            );
        } else {
            tracing::warn!(
                notification_id = %message.id,
                user_id = %message.user_id,
                "sms delivery failed"
            );
        }
        success
    }

    fn validate_config(&self) -> Result<()> {
        if self.sender_id.is_empty() {
            return Err(Error::InvalidConfiguration(
                "sms sender id is empty".to_string(),
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
        let adapter = SmsAdapter::reliable("SHELFWATCH");
        let msg =
            NotificationMessage::new(EventId::new(), "user-1", Channel::Sms, "Subject", "Content");

        assert!(adapter.send(&msg).await);
    }

    #[test]
    fn test_validate_config() {
        assert!(SmsAdapter::new("SHELFWATCH").validate_config().is_ok());
        assert!(SmsAdapter::new("").validate_config().is_err());
    }
}
