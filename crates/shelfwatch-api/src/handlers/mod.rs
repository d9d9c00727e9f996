//! HTTP request handlers.

pub mod basic;
pub mod events;
pub mod notifications;
pub mod preferences;
pub mod stats;

pub use crate::server::ServerState;
