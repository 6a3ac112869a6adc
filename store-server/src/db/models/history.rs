use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// What a history entry records about a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryAction {
    Create,
    Update,
    Delete,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Create => "CREATE",
            HistoryAction::Update => "UPDATE",
            HistoryAction::Delete => "DELETE",
        }
    }
}

/// Append-only change record for a product.
///
/// Entries are never edited in place; the only destructive operation is
/// the explicit bulk purge by id list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub product: RecordId,
    /// Product name snapshot so entries survive a purge of the product
    pub product_name: String,
    pub user_id: String,
    pub action: HistoryAction,
    pub reason: String,
    pub action_time: i64,
}

/// Filter for history listings. Date parts are independent predicates
/// over the action timestamp.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub product_id: Option<String>,
    pub user_id: Option<String>,
    pub action: Option<HistoryAction>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    #[serde(default = "HistoryQuery::default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl HistoryQuery {
    fn default_limit() -> usize {
        50
    }
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            product_id: None,
            user_id: None,
            action: None,
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
pub struct HistoryView {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub user_id: String,
    pub action: HistoryAction,
    pub reason: String,
    pub action_time: i64,
}

impl From<ProductHistory> for HistoryView {
    fn from(h: ProductHistory) -> Self {
        HistoryView {
            id: h.id.map(|id| id.to_string()).unwrap_or_default(),
            product_id: h.product.to_string(),
            product_name: h.product_name,
            user_id: h.user_id,
            action: h.action,
            reason: h.reason,
            action_time: h.action_time,
        }
    }
}

/// Bulk purge request, a plain list of history record ids
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPurgeRequest {
    #[validate(length(min = 1, message = "at least one history id is required"))]
    pub ids: Vec<String>,
}
