//! Notification delivery for the shelfwatch alerting pipeline.
//!
//! A [`NotificationDispatcher`] fans one alert decision out into per-channel
//! delivery attempts, honoring the user's preferences at dispatch time.
//! Channels are pluggable: every delivery mechanism implements
//! [`ChannelAdapter`] and registers in an [`AdapterRegistry`]; adding a
//! channel never touches the dispatcher.
//!
//! The reference adapters simulate delivery with a small latency and a
//! bounded per-channel failure probability. Expected delivery failure is a
//! returned `false`, never an error; retries belong to the job queue, not
//! to the adapter.

pub mod channels;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod preferences;

pub use channels::{
    AdapterRegistry, ChannelAdapter, EmailAdapter, InAppAdapter, PushAdapter, SmsAdapter,
};
pub use dispatcher::NotificationDispatcher;
pub use error::{Error, Result};
pub use message::{NotificationId, NotificationMessage};
pub use preferences::{InMemoryPreferenceStore, PreferenceStore, UserPreferences};
