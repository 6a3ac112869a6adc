use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;
use super::DiscountKind;

/// Order settlement states.
///
/// Orders are created `New`, move forward through approval and shipping,
/// and can only be cancelled before they ship. Terminal states accept no
/// further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    New,
    Approved,
    Shipping,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (New, Approved) | (New, Cancelled) | (Approved, Shipping) | (Approved, Cancelled) | (Shipping, Completed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Shipping => "SHIPPING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A settled order line. Price fields are snapshots taken when the line
/// was added; later product edits do not touch them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub product: RecordId,
    pub product_name: String,
    /// List price minus the product-level percentage discount
    pub unit_price: f64,
    pub quantity: i64,
    pub line_total: f64,
}

/// An order as stored. Line items live inline so a settlement step can
/// rewrite stock, lines and totals in one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Human-facing code, `HD` plus twelve hex digits
    pub code: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub ship_address: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<RecordId>,
    #[serde(default)]
    pub details: Vec<OrderDetail>,
    pub order_date: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    #[validate(length(min = 1, max = 25, message = "phone must be 1-25 characters"))]
    pub phone: String,
    #[validate(length(min = 1, max = 500, message = "shipping address is required"))]
    pub ship_address: String,
    #[validate(length(max = 500, message = "note is too long"))]
    pub note: Option<String>,
}

/// One requested line in a settlement or stock-check call
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: String,
    #[validate(range(min = 1, max = 9999, message = "quantity must be 1-9999"))]
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttachDiscountRequest {
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub code: String,
}

/// List filter for the order back office. Date parts are independent
/// predicates over the order timestamp; keyword matches contact fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub keyword: Option<String>,
    pub status: Option<OrderStatus>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    #[serde(default = "OrderQuery::default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl OrderQuery {
    fn default_limit() -> usize {
        50
    }
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            status: None,
            year: None,
            month: None,
            day: None,
            limit: Self::default_limit(),
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailView {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub line_total: f64,
}

impl From<OrderDetail> for OrderDetailView {
    fn from(d: OrderDetail) -> Self {
        OrderDetailView {
            product_id: d.product.to_string(),
            product_name: d.product_name,
            unit_price: d.unit_price,
            quantity: d.quantity,
            line_total: d.line_total,
        }
    }
}

/// Discount facts an order view exposes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountBrief {
    pub code: String,
    pub kind: DiscountKind,
    pub amount: f64,
}

/// Full order view. `subtotal` sums the line totals; `total` is what is
/// left after the attached discount code, never below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    pub code: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub ship_address: String,
    pub note: Option<String>,
    pub status: OrderStatus,
    pub discount: Option<DiscountBrief>,
    pub details: Vec<OrderDetailView>,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub total: f64,
    pub order_date: i64,
    pub updated_at: i64,
}

/// Query row backing the order listing
#[derive(Debug, Clone, Deserialize)]
pub struct OrderListRow {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub code: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub order_date: i64,
    #[serde(default)]
    pub item_count: i64,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub discount_kind: Option<DiscountKind>,
    #[serde(default)]
    pub discount_amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListItem {
    pub id: String,
    pub code: String,
    pub name: String,
    pub email: String,
    pub status: OrderStatus,
    pub order_date: i64,
    pub item_count: i64,
    pub total: f64,
}

/// Advisory stock report for a prospective settlement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    pub product_id: String,
    pub product_name: String,
    pub requested: i64,
    pub available: i64,
    pub sufficient: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_are_legal() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Approved));
        assert!(OrderStatus::Approved.can_transition_to(OrderStatus::Shipping));
        assert!(OrderStatus::Shipping.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn cancellation_allowed_only_before_shipping() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Approved.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipping.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for next in [
            OrderStatus::New,
            OrderStatus::Approved,
            OrderStatus::Shipping,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Completed.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::New.is_terminal());
    }

    #[test]
    fn status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Shipping).unwrap(),
            "\"SHIPPING\""
        );
        let back: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(back, OrderStatus::Cancelled);
    }
}
