use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;
use super::{CategoryBrief, Lifecycle, SupplierBrief};

/// Product image reference. The first active picture serves as the
/// storefront thumbnail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Picture {
    pub path: String,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub active: bool,
}

/// A catalog product as stored.
///
/// `discount` is a percentage (0-100) baked into the list price at
/// settlement time; it is unrelated to redeemable discount codes.
/// `active` controls storefront visibility and is cleared on soft delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub meta_title: Option<String>,
    pub price: f64,
    /// Units in stock; decremented at settlement, never below zero
    pub quantity: i64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub active: bool,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    pub supplier: RecordId,
    #[serde(default)]
    pub categories: Vec<RecordId>,
    #[serde(default)]
    pub pictures: Vec<Picture>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(length(max = 512, message = "short description is too long"))]
    pub short_description: Option<String>,
    #[validate(length(max = 2048, message = "description is too long"))]
    pub description: Option<String>,
    #[validate(length(max = 128, message = "meta title is too long"))]
    pub meta_title: Option<String>,
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "quantity cannot be negative"))]
    pub quantity: i64,
    #[validate(range(min = 0.0, max = 100.0, message = "discount must be 0-100 percent"))]
    #[serde(default)]
    pub discount: f64,
    /// Record id of an existing supplier
    pub supplier: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub pictures: Vec<Picture>,
}

/// Full-replace edit payload. Every update must say why it happened;
/// the reason lands in the product history.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(length(max = 512, message = "short description is too long"))]
    pub short_description: Option<String>,
    #[validate(length(max = 2048, message = "description is too long"))]
    pub description: Option<String>,
    #[validate(length(max = 128, message = "meta title is too long"))]
    pub meta_title: Option<String>,
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "quantity cannot be negative"))]
    pub quantity: i64,
    #[validate(range(min = 0.0, max = 100.0, message = "discount must be 0-100 percent"))]
    #[serde(default)]
    pub discount: f64,
    pub supplier: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub pictures: Vec<Picture>,
    #[validate(length(min = 1, max = 500, message = "edit reason is required"))]
    pub edit_reason: String,
}

/// List filter for catalog queries. Date parts are independent
/// predicates over the creation timestamp.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub keyword: Option<String>,
    pub category_id: Option<String>,
    pub category_slug: Option<String>,
    pub slug: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub active: Option<bool>,
    pub deleted: Option<bool>,
    /// Storefront shorthand: active and not soft-deleted
    pub published: Option<bool>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    #[serde(default = "ProductQuery::default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl ProductQuery {
    fn default_limit() -> usize {
        50
    }
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            category_id: None,
            category_slug: None,
            slug: None,
            min_price: None,
            max_price: None,
            active: None,
            deleted: None,
            published: None,
            year: None,
            month: None,
            day: None,
            limit: Self::default_limit(),
            offset: 0,
        }
    }
}

/// Row shape for catalog listings; categories come back resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListItem {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    pub slug: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub discount: f64,
    pub active: bool,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    #[serde(default)]
    pub categories: Vec<CategoryBrief>,
    #[serde(default)]
    pub pictures: Vec<Picture>,
    #[serde(default)]
    pub created_at: i64,
}

/// Full product view with supplier and categories resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub meta_title: Option<String>,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub discount: f64,
    pub active: bool,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    pub supplier: SupplierBrief,
    #[serde(default)]
    pub categories: Vec<CategoryBrief>,
    #[serde(default)]
    pub pictures: Vec<Picture>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Sales-ranked product row for the storefront landing page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSaleItem {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    pub slug: String,
    pub price: f64,
    pub discount: f64,
    pub sold: i64,
}
