//! Email-like channel adapter (simulated).

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use shelfwatch_core::Channel;

use super::ChannelAdapter;
use crate::message::NotificationMessage;
use crate::{Error, Result};

/// Simulated SMTP delivery.
///
/// Email is the flakiest reference channel: highest latency, highest
/// failure probability.
#[derive(Debug, Clone)]
pub struct EmailAdapter {
    from_address: String,
    latency: Duration,
    failure_rate: f64,
}

impl EmailAdapter {
    pub fn new(from_address: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
            latency: Duration::from_millis(40),
            failure_rate: 0.10,
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
    pub fn reliable(from_address: impl Into<String>) -> Self {
        Self::new(from_address)
            .with_latency(Duration::ZERO)
            .with_failure_rate(0.0)
    }
}

#[async_trait]
impl ChannelAdapter for EmailAdapter {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, message: &NotificationMessage) -> bool {
        tokio::time::sleep(self.latency).await;

        let success = rand::thread_rng().gen::<f64>() >= self.failure_rate;
        if success {
            tracing::info!(
                notification_id = %message.id,
                user_id = %message.user_id,
                subject = %message.subject,
                "email sent"
            );
        } else {
            tracing::warn!(
                notification_id = %message.id,
                user_id = %message.user_id,
                "email delivery failed"
            );
        }
        success
    }

    fn validate_config(&self) -> Result<()> {
        if self.from_address.is_empty() || !self.from_address.contains('@') {
            return Err(Error::InvalidConfiguration(format!(
                "invalid from address: '{}'",
                self.from_address
            )));
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
        let adapter = EmailAdapter::reliable("alerts@example.com");
        let msg = NotificationMessage::new(
            EventId::new(),
            "user-1",
            Channel::Email,
            "Subject",
            "Content",
        );

        assert!(adapter.send(&msg).await);
    }

    #[tokio::test]
    async fn test_guaranteed_failure() {
        let adapter = EmailAdapter::new("alerts@example.com")
            .with_latency(Duration::ZERO)
            .with_failure_rate(1.0);
        let msg = NotificationMessage::new(
            EventId::new(),
            "user-1",
            Channel::Email,
            "Subject",
            "Content",
        );

        assert!(!adapter.send(&msg).await);
    }

    #[test]
    fn test_validate_config() {
        assert!(EmailAdapter::new("alerts@example.com").validate_config().is_ok());
        assert!(EmailAdapter::new("").validate_config().is_err());
        assert!(EmailAdapter::new("not-an-address").validate_config().is_err());
    }
}
