//! Structured rule conditions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Comparison operator for rule conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
}

impl CompareOp {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Literal value a condition compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CondValue {
    Number(f64),
    Text(String),
}

/// A single predicate: `event.data[field] <op> value`.
///
/// A missing field or a type mismatch between the data value and the
/// literal is a non-match, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub op: CompareOp,
    pub value: CondValue,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: CompareOp, value: CondValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Numeric comparison shorthand.
    pub fn number(field: impl Into<String>, op: CompareOp, value: f64) -> Self {
        Self::new(field, op, CondValue::Number(value))
    }

    /// String comparison shorthand.
    pub fn text(field: impl Into<String>, op: CompareOp, value: impl Into<String>) -> Self {
        Self::new(field, op, CondValue::Text(value.into()))
    }

    /// Evaluate the predicate against an event data map.
    pub fn matches(&self, data: &HashMap<String, serde_json::Value>) -> bool {
        let Some(actual) = data.get(&self.field) else {
            return false;
        };

        match &self.value {
            CondValue::Number(expected) => match actual.as_f64() {
                Some(actual) => compare_f64(actual, self.op, *expected),
                None => false,
            },
            CondValue::Text(expected) => match actual.as_str() {
                Some(actual) => match self.op {
                    CompareOp::Eq => actual == expected,
                    CompareOp::Ne => actual != expected,
                    // Ordering comparisons are not defined for text.
                    _ => false,
                },
                None => false,
            },
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            CondValue::Number(n) => write!(f, "{} {} {}", self.field, self.op, n),
            CondValue::Text(s) => write!(f, "{} {} \"{}\"", self.field, self.op, s),
        }
    }
}

fn compare_f64(actual: f64, op: CompareOp, expected: f64) -> bool {
    match op {
        CompareOp::Lt => actual < expected,
        CompareOp::Le => actual <= expected,
        CompareOp::Gt => actual > expected,
        CompareOp::Ge => actual >= expected,
        CompareOp::Eq => actual == expected,
        CompareOp::Ne => actual != expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(key: &str, value: serde_json::Value) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert(key.to_string(), value);
        map
    }

    #[test]
    fn test_numeric_operators() {
        let d = data("stock", json!(5));

        assert!(Condition::number("stock", CompareOp::Lt, 10.0).matches(&d));
        assert!(!Condition::number("stock", CompareOp::Lt, 5.0).matches(&d));
        assert!(Condition::number("stock", CompareOp::Le, 5.0).matches(&d));
        assert!(Condition::number("stock", CompareOp::Gt, 4.0).matches(&d));
        assert!(Condition::number("stock", CompareOp::Ge, 5.0).matches(&d));
        assert!(Condition::number("stock", CompareOp::Eq, 5.0).matches(&d));
        assert!(Condition::number("stock", CompareOp::Ne, 6.0).matches(&d));
    }

    #[test]
    fn test_text_operators() {
        let d = data("status", json!("DELAYED"));

        assert!(Condition::text("status", CompareOp::Eq, "DELAYED").matches(&d));
        assert!(!Condition::text("status", CompareOp::Eq, "SHIPPED").matches(&d));
        assert!(Condition::text("status", CompareOp::Ne, "SHIPPED").matches(&d));
        // Ordering is undefined for text.
        assert!(!Condition::text("status", CompareOp::Lt, "SHIPPED").matches(&d));
    }

    #[test]
    fn test_missing_field_is_non_match() {
        let d = data("stock", json!(5));
        assert!(!Condition::number("quantity", CompareOp::Lt, 10.0).matches(&d));
    }

    #[test]
    fn test_type_mismatch_is_non_match() {
        let d = data("stock", json!("plenty"));
        assert!(!Condition::number("stock", CompareOp::Lt, 10.0).matches(&d));

        let d = data("status", json!(3));
        assert!(!Condition::text("status", CompareOp::Eq, "3").matches(&d));
    }

    #[test]
    fn test_display() {
        let c = Condition::number("stock", CompareOp::Lt, 5.0);
        assert_eq!(c.to_string(), "stock < 5");
    }
}
