//! Threshold rules for the shelfwatch alerting pipeline.
//!
//! Given an [`AlertEvent`](shelfwatch_core::AlertEvent), the evaluator
//! decides "no alert" or "alert with this severity through these channels"
//! from a small per-event-type rule table. Conditions are structured
//! predicates (field, operator, literal) rather than free-form text, so
//! the table is statically auditable and there is no parsing or injection
//! surface.
//!
//! Rule ordering is a designed invariant: within one event type the first
//! matching rule wins, regardless of severity or specificity.

pub mod condition;
pub mod evaluator;
pub mod table;
pub mod template;

pub use condition::{CompareOp, CondValue, Condition};
pub use evaluator::{AlertDecision, ThresholdEvaluator};
pub use table::{ThresholdRule, ThresholdTable};
pub use template::{generate_alert_message, AlertMessage};
