use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

/// A product supplier. Products reference suppliers by record id and a
/// supplier must exist before a product can point at it. Suppliers have
/// no soft-delete phase; deletion is refused while products still
/// reference them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupplierCreate {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(length(max = 128, message = "contact name is too long"))]
    pub contact_name: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 25, message = "phone is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "address is too long"))]
    pub address: Option<String>,
    #[validate(length(max = 512, message = "description is too long"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupplierUpdate {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(length(max = 128, message = "contact name is too long"))]
    pub contact_name: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 25, message = "phone is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "address is too long"))]
    pub address: Option<String>,
    #[validate(length(max = 512, message = "description is too long"))]
    pub description: Option<String>,
}

/// Reduced shape embedded in product views
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierBrief {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    pub slug: String,
}

/// Wire shape for supplier endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Supplier> for SupplierView {
    fn from(s: Supplier) -> Self {
        SupplierView {
            id: s.id.map(|id| id.to_string()).unwrap_or_default(),
            name: s.name,
            slug: s.slug,
            contact_name: s.contact_name,
            email: s.email,
            phone: s.phone,
            address: s.address,
            description: s.description,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}
