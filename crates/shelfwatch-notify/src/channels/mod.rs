//! Notification channel adapters.

pub mod email;
pub mod inapp;
pub mod push;
pub mod sms;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use shelfwatch_core::Channel;
use tokio::sync::RwLock;

use crate::message::NotificationMessage;
use crate::Result;

pub use email::EmailAdapter;
pub use inapp::InAppAdapter;
pub use push::PushAdapter;
pub use sms::SmsAdapter;

/// Behavioral contract every delivery mechanism satisfies.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// The channel this adapter serves.
    fn channel(&self) -> Channel;

    /// Attempt one delivery.
    ///
    /// Returns `false` for expected failure modes (provider rejected,
    /// simulated outage); callers treat `false` as "not delivered, do not
    /// retry within this call". Retries are the job queue's responsibility.
    async fn send(&self, message: &NotificationMessage) -> bool;

    /// Check the adapter's configuration.
    ///
    /// Misconfiguration (missing sender address, empty credentials) fails
    /// loudly here so it surfaces at startup rather than at delivery time.
    fn validate_config(&self) -> Result<()>;
}

/// Registry of channel adapters keyed by channel.
///
/// The dispatcher resolves channels through this table; adding a channel
/// means implementing [`ChannelAdapter`] and registering it here.
pub struct AdapterRegistry {
    adapters: RwLock<HashMap<Channel, Arc<dyn ChannelAdapter>>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: RwLock::new(HashMap::new()),
        }
    }

    /// Registry preloaded with the four reference adapters.
    ///
    /// Returns the registry together with the in-app adapter handle, since
    /// the in-app inbox is also a queryable surface.
    pub async fn with_defaults() -> (Self, Arc<InAppAdapter>) {
        let registry = Self::new();
        let inapp = Arc::new(InAppAdapter::new());

        registry.register(Arc::new(EmailAdapter::new("alerts@shelfwatch.dev"))).await;
        registry.register(Arc::new(SmsAdapter::new("SHELFWATCH"))).await;
        registry.register(Arc::new(PushAdapter::new("shelfwatch-push-key"))).await;
        registry.register(inapp.clone()).await;

        (registry, inapp)
    }

    /// Register an adapter under its channel.
    pub async fn register(&self, adapter: Arc<dyn ChannelAdapter>) {
        self.adapters.write().await.insert(adapter.channel(), adapter);
    }

    /// Get the adapter for a channel.
    pub async fn get(&self, channel: Channel) -> Option<Arc<dyn ChannelAdapter>> {
        self.adapters.read().await.get(&channel).cloned()
    }

    /// List registered channels.
    pub async fn channels(&self) -> Vec<Channel> {
        self.adapters.read().await.keys().copied().collect()
    }

    pub async fn len(&self) -> usize {
        self.adapters.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.adapters.read().await.is_empty()
    }

    /// Validate every registered adapter and AND the results.
    ///
    /// Failures are logged per adapter; the whole check never blocks
    /// process start.
    pub async fn validate_all(&self) -> bool {
        let adapters = self.adapters.read().await;
        let mut all_ok = true;

        for (channel, adapter) in adapters.iter() {
            match adapter.validate_config() {
                Ok(()) => {
                    tracing::debug!(channel = %channel, "adapter configuration ok");
                }
                Err(e) => {
                    tracing::error!(channel = %channel, error = %e, "adapter configuration invalid");
                    all_ok = false;
                }
            }
        }

        all_ok
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
