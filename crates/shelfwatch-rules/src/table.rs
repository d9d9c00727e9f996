//! The threshold rule table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shelfwatch_core::{Channel, EventType, Severity};

use crate::condition::{CompareOp, Condition};

/// One rule: when the condition matches, alert with this severity through
/// these recommended channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub condition: Condition,
    pub severity: Severity,
    pub channels: Vec<Channel>,
}

impl ThresholdRule {
    pub fn new(condition: Condition, severity: Severity, channels: Vec<Channel>) -> Self {
        Self {
            condition,
            severity,
            channels,
        }
    }
}

/// Static rule table, one ordered rule list per event type.
///
/// Within one list, rules are tested in declaration order and the first
/// match wins. Ties are broken by position, not by severity, so the most
/// restrictive condition must be declared first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdTable {
    rules: HashMap<EventType, Vec<ThresholdRule>>,
}

impl ThresholdTable {
    /// Create an empty table.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Append a rule to an event type's list.
    pub fn add_rule(&mut self, event_type: EventType, rule: ThresholdRule) -> &mut Self {
        self.rules.entry(event_type).or_default().push(rule);
        self
    }

    /// Get the ordered rule list for an event type.
    pub fn rules_for(&self, event_type: EventType) -> Option<&[ThresholdRule]> {
        self.rules.get(&event_type).map(|r| r.as_slice())
    }

    /// Number of event types with at least one rule.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for ThresholdTable {
    /// The compiled reference table.
    fn default() -> Self {
        use Channel::*;
        use Severity::*;

        let mut table = Self::empty();

        table
            .add_rule(
                EventType::LowStock,
                ThresholdRule::new(
                    Condition::number("stock", CompareOp::Lt, 5.0),
                    Critical,
                    vec![Email, Sms, InApp],
                ),
            )
            .add_rule(
                EventType::LowStock,
                ThresholdRule::new(
                    Condition::number("stock", CompareOp::Lt, 10.0),
                    High,
                    vec![Email, InApp],
                ),
            )
            .add_rule(
                EventType::LowStock,
                ThresholdRule::new(
                    Condition::number("stock", CompareOp::Lt, 20.0),
                    Medium,
                    vec![InApp],
                ),
            );

        table
            .add_rule(
                EventType::ImminentExpiration,
                ThresholdRule::new(
                    Condition::number("days_until_expiration", CompareOp::Le, 2.0),
                    Critical,
                    vec![Email, Sms, InApp],
                ),
            )
            .add_rule(
                EventType::ImminentExpiration,
                ThresholdRule::new(
                    Condition::number("days_until_expiration", CompareOp::Le, 7.0),
                    High,
                    vec![Email, InApp],
                ),
            )
            .add_rule(
                EventType::ImminentExpiration,
                ThresholdRule::new(
                    Condition::number("days_until_expiration", CompareOp::Le, 14.0),
                    Medium,
                    vec![InApp],
                ),
            );

        table
            .add_rule(
                EventType::SupplierOrderUpdate,
                ThresholdRule::new(
                    Condition::text("status", CompareOp::Eq, "DELAYED"),
                    High,
                    vec![Email, InApp],
                ),
            )
            .add_rule(
                EventType::SupplierOrderUpdate,
                ThresholdRule::new(
                    Condition::text("status", CompareOp::Eq, "CANCELLED"),
                    Critical,
                    vec![Email, Sms, InApp],
                ),
            )
            .add_rule(
                EventType::SupplierOrderUpdate,
                ThresholdRule::new(
                    Condition::text("status", CompareOp::Eq, "SHIPPED"),
                    Low,
                    vec![InApp],
                ),
            )
            .add_rule(
                EventType::SupplierOrderUpdate,
                ThresholdRule::new(
                    Condition::text("status", CompareOp::Eq, "DELIVERED"),
                    Low,
                    vec![InApp],
                ),
            );

        table
    }
}
