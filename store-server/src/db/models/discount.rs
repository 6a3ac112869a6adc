use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

/// How a discount amount is interpreted at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// `amount` is a percentage of the bill
    Percentage,
    /// `amount` is subtracted from the bill as-is
    FixedAmount,
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountKind::Percentage => "PERCENTAGE",
            DiscountKind::FixedAmount => "FIXED_AMOUNT",
        }
    }
}

/// A redeemable discount code.
///
/// `quantity` is the number of redemptions left. Attaching the code to an
/// order consumes exactly one unit, and a code with zero units left can no
/// longer be redeemed no matter how valid it otherwise is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub code: String,
    pub kind: DiscountKind,
    pub amount: f64,
    /// Minimum bill total required before the code applies
    pub min_price: f64,
    pub quantity: i64,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub active: bool,
    /// UTC millisecond timestamps
    #[serde(default)]
    pub create_date: i64,
    pub expiry_date: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCreate {
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub code: String,
    pub kind: DiscountKind,
    #[validate(range(min = 0.0, message = "amount cannot be negative"))]
    pub amount: f64,
    #[validate(range(min = 0.0, message = "minimum price cannot be negative"))]
    #[serde(default)]
    pub min_price: f64,
    #[validate(range(min = 0, message = "quantity cannot be negative"))]
    pub quantity: i64,
    #[serde(default = "default_true")]
    pub active: bool,
    pub expiry_date: i64,
}

/// Full-replace edit payload; the code itself stays editable and is
/// re-checked for uniqueness against every other discount.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DiscountUpdate {
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub code: String,
    pub kind: DiscountKind,
    #[validate(range(min = 0.0, message = "amount cannot be negative"))]
    pub amount: f64,
    #[validate(range(min = 0.0, message = "minimum price cannot be negative"))]
    #[serde(default)]
    pub min_price: f64,
    #[validate(range(min = 0, message = "quantity cannot be negative"))]
    pub quantity: i64,
    pub active: bool,
    pub expiry_date: i64,
}

/// List filter for the discount back office
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountQuery {
    pub keyword: Option<String>,
    pub active: Option<bool>,
    pub kind: Option<DiscountKind>,
    #[serde(default = "DiscountQuery::default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl DiscountQuery {
    fn default_limit() -> usize {
        50
    }
}

impl Default for DiscountQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            active: None,
            kind: None,
            limit: Self::default_limit(),
            offset: 0,
        }
    }
}

/// Wire shape for discount endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountView {
    pub id: String,
    pub code: String,
    pub kind: DiscountKind,
    pub amount: f64,
    pub min_price: f64,
    pub quantity: i64,
    pub active: bool,
    pub create_date: i64,
    pub expiry_date: i64,
}

impl From<Discount> for DiscountView {
    fn from(d: Discount) -> Self {
        DiscountView {
            id: d.id.map(|id| id.to_string()).unwrap_or_default(),
            code: d.code,
            kind: d.kind,
            amount: d.amount,
            min_price: d.min_price,
            quantity: d.quantity,
            active: d.active,
            create_date: d.create_date,
            expiry_date: d.expiry_date,
        }
    }
}

/// Outcome of a policy check against a code, reported to the caller
/// without consuming anything.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountValidation {
    pub code: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<DiscountKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}
