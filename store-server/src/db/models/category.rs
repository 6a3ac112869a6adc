use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;
use super::Lifecycle;

/// A storefront category. `show_on_menu` drives the navigation bar and
/// is forced off when the category is soft-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub show_on_menu: bool,
    #[serde(default)]
    pub lifecycle: Lifecycle,
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
pub struct CategoryCreate {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(length(max = 512, message = "description is too long"))]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub show_on_menu: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(length(max = 512, message = "description is too long"))]
    pub description: Option<String>,
    pub show_on_menu: bool,
}

/// Reduced shape embedded in product views and menu listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBrief {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    pub slug: String,
}

/// Back-office row with the number of live products attached
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub show_on_menu: bool,
    pub lifecycle: Lifecycle,
    pub product_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CategoryView {
    pub fn from_entity(category: Category, product_count: i64) -> Self {
        CategoryView {
            id: category.id.map(|id| id.to_string()).unwrap_or_default(),
            name: category.name,
            slug: category.slug,
            description: category.description,
            show_on_menu: category.show_on_menu,
            lifecycle: category.lifecycle,
            product_count,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}
