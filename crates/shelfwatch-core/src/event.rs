//! Alert event types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique event identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Domain event types the pipeline understands.
///
/// The enumeration is closed: an ingestion payload carrying an unknown type
/// is rejected at the boundary, it never reaches the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Stock level fell below a threshold.
    LowStock,
    /// Product expires within a threshold number of days.
    ImminentExpiration,
    /// Supplier order changed status.
    SupplierOrderUpdate,
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::LowStock => "LOW_STOCK",
            Self::ImminentExpiration => "IMMINENT_EXPIRATION",
            Self::SupplierOrderUpdate => "SUPPLIER_ORDER_UPDATE",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "LOW_STOCK" => Some(Self::LowStock),
            "IMMINENT_EXPIRATION" => Some(Self::ImminentExpiration),
            "SUPPLIER_ORDER_UPDATE" => Some(Self::SupplierOrderUpdate),
            _ => None,
        }
    }

    /// All known event types.
    pub fn all() -> [EventType; 3] {
        [
            Self::LowStock,
            Self::ImminentExpiration,
            Self::SupplierOrderUpdate,
        ]
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Alert severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Informational - no action required.
    #[default]
    Low = 0,
    /// Worth a look.
    Medium = 1,
    /// Action required soon.
    High = 2,
    /// Immediate action required.
    Critical = 3,
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notification delivery channel.
///
/// New channels are added by implementing the adapter contract in the
/// notify crate, never by branching on channel name in the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Email,
    Sms,
    Push,
    InApp,
}

impl Channel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email => "EMAIL",
            Self::Sms => "SMS",
            Self::Push => "PUSH",
            Self::InApp => "IN_APP",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "EMAIL" => Some(Self::Email),
            "SMS" => Some(Self::Sms),
            "PUSH" => Some(Self::Push),
            "IN_APP" => Some(Self::InApp),
            _ => None,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable fact about the world that might warrant attention.
///
/// Created once at the ingestion boundary; the only mutation over its
/// lifetime is the `processed` flag flipping to `true` after evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    /// Unique event identifier.
    pub id: EventId,
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Owner/subject of the event.
    pub user_id: String,
    /// Event-specific fields (e.g. `stock`, `days_until_expiration`, `status`).
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
    /// Caller-supplied severity hint; evaluation may override it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
    /// Whether the worker finished evaluating this event.
    #[serde(default)]
    pub processed: bool,
}

impl AlertEvent {
    /// Create a new event.
    pub fn new(event_type: EventType, user_id: impl Into<String>) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            user_id: user_id.into(),
            data: HashMap::new(),
            severity: None,
            timestamp: Utc::now(),
            processed: false,
        }
    }

    /// Set the event data map.
    pub fn with_data(mut self, data: HashMap<String, serde_json::Value>) -> Self {
        self.data = data;
        self
    }

    /// Add a single data field.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Set the severity hint.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Read a numeric data field, if present and numeric.
    pub fn number_field(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(|v| v.as_f64())
    }

    /// Read a string data field, if present and a string.
    pub fn text_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_id() {
        let id = EventId::new();
        assert_eq!(id.0.get_version(), Some(uuid::Version::Random));
    }

    #[test]
    fn test_event_type_round_trip() {
        for t in EventType::all() {
            assert_eq!(EventType::from_string(t.as_str()), Some(t));
        }
        assert_eq!(EventType::from_string("UNKNOWN"), None);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_channel_from_string() {
        assert_eq!(Channel::from_string("EMAIL"), Some(Channel::Email));
        assert_eq!(Channel::from_string("in_app"), Some(Channel::InApp));
        assert_eq!(Channel::from_string("carrier-pigeon"), None);
    }

    #[test]
    fn test_event_creation() {
        let event = AlertEvent::new(EventType::LowStock, "user-1")
            .with_field("stock", json!(3))
            .with_severity(Severity::High);

        assert_eq!(event.event_type, EventType::LowStock);
        assert_eq!(event.user_id, "user-1");
        assert_eq!(event.number_field("stock"), Some(3.0));
        assert_eq!(event.severity, Some(Severity::High));
        assert!(!event.processed);
    }

    #[test]
    fn test_event_serde() {
        let event = AlertEvent::new(EventType::SupplierOrderUpdate, "user-1")
            .with_field("status", json!("DELAYED"));

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "SUPPLIER_ORDER_UPDATE");
        assert_eq!(value["userId"], "user-1");
        assert_eq!(value["data"]["status"], "DELAYED");

        let back: AlertEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back.event_type, EventType::SupplierOrderUpdate);
        assert_eq!(back.text_field("status"), Some("DELAYED"));
    }

    #[test]
    fn test_field_type_mismatch() {
        let event =
            AlertEvent::new(EventType::LowStock, "user-1").with_field("stock", json!("plenty"));

        assert_eq!(event.number_field("stock"), None);
        assert_eq!(event.text_field("stock"), Some("plenty"));
        assert_eq!(event.number_field("missing"), None);
    }
}
