//! Threshold evaluation.

use shelfwatch_core::{AlertEvent, Channel, Severity};

use crate::table::ThresholdTable;

/// Outcome of evaluating an event against the rule table.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertDecision {
    /// No rule matched, or the event type has no rules.
    NoAlert,
    /// Alert with this severity through these recommended channels.
    Alert {
        severity: Severity,
        channels: Vec<Channel>,
    },
}

impl AlertDecision {
    pub fn should_alert(&self) -> bool {
        matches!(self, Self::Alert { .. })
    }
}

/// Evaluates events against a threshold table.
///
/// Evaluation is pure: no I/O, no suspension, no side effects beyond
/// reading the table.
#[derive(Debug, Clone)]
pub struct ThresholdEvaluator {
    table: ThresholdTable,
}

impl ThresholdEvaluator {
    /// Evaluator over the compiled reference table.
    pub fn new() -> Self {
        Self {
            table: ThresholdTable::default(),
        }
    }

    /// Evaluator over a custom table.
    pub fn with_table(table: ThresholdTable) -> Self {
        Self { table }
    }

    /// Decide whether the event warrants an alert.
    ///
    /// Rules are tested in declaration order; the first match wins.
    pub fn evaluate(&self, event: &AlertEvent) -> AlertDecision {
        let Some(rules) = self.table.rules_for(event.event_type) else {
            tracing::debug!(event_id = %event.id, event_type = %event.event_type, "no rules for event type");
            return AlertDecision::NoAlert;
        };

        for rule in rules {
            if rule.condition.matches(&event.data) {
                tracing::debug!(
                    event_id = %event.id,
                    condition = %rule.condition,
                    severity = %rule.severity,
                    "threshold matched"
                );
                return AlertDecision::Alert {
                    severity: rule.severity,
                    channels: rule.channels.clone(),
                };
            }
        }

        AlertDecision::NoAlert
    }
}

impl Default for ThresholdEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
