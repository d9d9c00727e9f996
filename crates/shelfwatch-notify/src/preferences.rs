//! User notification preferences.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shelfwatch_core::{Channel, EventType};
use tokio::sync::RwLock;

/// Per-user notification preferences.
///
/// `enabled` is the master kill switch: when false, no channel ever fires
/// for this user regardless of evaluation results. A missing entry in
/// `channels` for an event type means zero delivery for that type
/// (default-deny, not default-allow).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Ordered channel list per event type; the order is the delivery order.
    #[serde(default, rename = "preferences")]
    pub channels: HashMap<EventType, Vec<Channel>>,
    #[serde(rename = "isEnabled")]
    pub enabled: bool,
}

impl UserPreferences {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            phone_number: None,
            channels: HashMap::new(),
            enabled: true,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Set the channel list for an event type.
    pub fn with_channels(mut self, event_type: EventType, channels: Vec<Channel>) -> Self {
        self.channels.insert(event_type, channels);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Channels the user wants for an event type, in preference order.
    pub fn channels_for(&self, event_type: EventType) -> &[Channel] {
        self.channels
            .get(&event_type)
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }
}

/// Preference storage contract.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Get a user's preferences. Absence is a normal state, not an error.
    async fn get(&self, user_id: &str) -> Option<UserPreferences>;

    /// Store a user's preferences. Full replace, not a merge.
    async fn update(&self, preferences: UserPreferences);
}

/// In-memory preference store.
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    preferences: RwLock<HashMap<String, UserPreferences>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get(&self, user_id: &str) -> Option<UserPreferences> {
        self.preferences.read().await.get(user_id).cloned()
    }

    async fn update(&self, preferences: UserPreferences) {
        self.preferences
            .write()
            .await
            .insert(preferences.user_id.clone(), preferences);
    }
}
