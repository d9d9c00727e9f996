//! Alert message templates.
//!
//! Pure, deterministic template expansion keyed by event type. Unknown or
//! incomplete event data falls back to a generic subject/content rather
//! than failing.

use serde::{Deserialize, Serialize};
use shelfwatch_core::{AlertEvent, EventType, Severity};

/// Rendered subject and content for one alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub subject: String,
    pub content: String,
}

/// Render the notification text for an event at a given severity.
pub fn generate_alert_message(event: &AlertEvent, severity: Severity) -> AlertMessage {
    match event.event_type {
        EventType::LowStock => low_stock_message(event, severity),
        EventType::ImminentExpiration => expiration_message(event, severity),
        EventType::SupplierOrderUpdate => order_update_message(event, severity),
    }
}

fn low_stock_message(event: &AlertEvent, severity: Severity) -> AlertMessage {
    let product = event.text_field("product_name").unwrap_or("A product");
    match event.number_field("stock") {
        Some(stock) => AlertMessage {
            subject: format!("[{}] Low stock: {}", severity, product),
            content: format!(
                "{} is running low: {} unit(s) remaining. Consider restocking soon.",
                product, stock
            ),
        },
        None => generic_message(event, severity),
    }
}

fn expiration_message(event: &AlertEvent, severity: Severity) -> AlertMessage {
    let product = event.text_field("product_name").unwrap_or("A product");
    match event.number_field("days_until_expiration") {
        Some(days) => AlertMessage {
            subject: format!("[{}] Expiration approaching: {}", severity, product),
            content: format!(
                "{} expires in {} day(s). Plan usage or removal before the expiration date.",
                product, days
            ),
        },
        None => generic_message(event, severity),
    }
}

fn order_update_message(event: &AlertEvent, severity: Severity) -> AlertMessage {
    let order = event.text_field("order_id").unwrap_or("A supplier order");
    match event.text_field("status") {
        Some(status) => AlertMessage {
            subject: format!("[{}] Supplier order update: {}", severity, status),
            content: format!("Order {} changed status to {}.", order, status),
        },
        None => generic_message(event, severity),
    }
}

fn generic_message(event: &AlertEvent, severity: Severity) -> AlertMessage {
    AlertMessage {
        subject: format!("[{}] {} alert", severity, event.event_type),
        content: format!(
            "An alert of type {} was raised for your account.",
            event.event_type
        ),
    }
}
