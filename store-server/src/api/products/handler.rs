//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    HistoryPurgeRequest, HistoryQuery, HistoryView, ProductCreate, ProductDetail, ProductListItem,
    ProductQuery, ProductUpdate, TopSaleItem,
};
use crate::db::repository::{HistoryRepository, ProductRepository};
use crate::utils::validation::validation_failed;
use crate::utils::{ApiResponse, AppError, AppResult, PageResult};

/// Upper bound for the storefront ranking endpoints
const MAX_PROJECTION_ITEMS: usize = 50;

/// Soft-delete payload; the reason lands in the history log
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleDeleteRequest {
    #[validate(length(min = 1, max = 500, message = "reason must be 1-500 characters"))]
    pub reason: String,
}

/// GET /api/products - paged, filtered catalog query
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<ApiResponse<PageResult<ProductListItem>>> {
    let repo = ProductRepository::new(state.get_db());
    let page = repo.find_paged(&query).await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/products/{id} - full detail with supplier and categories
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ProductDetail>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_detail(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(ApiResponse::success(product))
}

/// GET /api/products/bySlug/{slug} - storefront detail projection
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<ProductDetail>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_detail_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(ApiResponse::success(product))
}

/// GET /api/products/topSales/{n} - best sellers ranked by sold quantity
pub async fn top_sales(
    State(state): State<ServerState>,
    Path(n): Path<usize>,
) -> AppResult<ApiResponse<Vec<TopSaleItem>>> {
    let repo = ProductRepository::new(state.get_db());
    let items = repo.find_top_sales(n.min(MAX_PROJECTION_ITEMS)).await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/products/related/{slug}/{n} - same-category products
pub async fn related(
    State(state): State<ServerState>,
    Path((slug, n)): Path<(String, usize)>,
) -> AppResult<ApiResponse<Vec<ProductListItem>>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_detail_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    let items = repo
        .find_related(&product.id.to_string(), n.min(MAX_PROJECTION_ITEMS))
        .await?;
    Ok(ApiResponse::success(items))
}

/// POST /api/products - create product
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<ApiResponse<ProductDetail>> {
    payload.validate().map_err(validation_failed)?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(payload, &user.id).await?;

    let id = product.id.map(|id| id.to_string()).unwrap_or_default();
    let detail = repo
        .find_detail(&id)
        .await?
        .ok_or_else(|| AppError::internal("Created product could not be read back"))?;
    Ok(ApiResponse::created(detail))
}

/// PUT /api/products/{id} - full update, requires an edit reason
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<ApiResponse<ProductDetail>> {
    payload.validate().map_err(validation_failed)?;

    let repo = ProductRepository::new(state.get_db());
    repo.update(&id, payload, &user.id).await?;

    let detail = repo
        .find_detail(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(ApiResponse::success(detail))
}

/// PATCH /api/products/toggleActive/{id} - flip storefront visibility
pub async fn toggle_active(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ProductDetail>> {
    let repo = ProductRepository::new(state.get_db());
    repo.toggle_active(&id).await?;

    let detail = repo
        .find_detail(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(ApiResponse::success(detail))
}

/// DELETE /api/products/toggleDelete/{id} - soft delete or restore
///
/// Returns whether the product is soft-deleted after the toggle.
pub async fn toggle_delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ToggleDeleteRequest>,
) -> AppResult<ApiResponse<bool>> {
    payload.validate().map_err(validation_failed)?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .toggle_soft_delete(&id, &user.id, &payload.reason)
        .await?;
    Ok(ApiResponse::success(product.lifecycle.is_deleted()))
}

/// DELETE /api/products/{id} - hard delete, only from the soft-deleted state
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    let repo = ProductRepository::new(state.get_db());
    repo.delete(&id, &user.id).await?;
    Ok(ApiResponse::success(true))
}

/// GET /api/products/histories - paged history query
pub async fn list_histories(
    State(state): State<ServerState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<ApiResponse<PageResult<HistoryView>>> {
    let repo = HistoryRepository::new(state.get_db());
    let page = repo.find_paged(&query).await?;
    let items = page.items.into_iter().map(HistoryView::from).collect();
    Ok(ApiResponse::success(PageResult::new(items, page.total)))
}

/// DELETE /api/products/histories - bulk purge by id list
pub async fn purge_histories(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(payload): Json<HistoryPurgeRequest>,
) -> AppResult<ApiResponse<u64>> {
    payload.validate().map_err(validation_failed)?;

    let repo = HistoryRepository::new(state.get_db());
    let removed = repo.purge(&payload.ids).await?;
    Ok(ApiResponse::success(removed))
}
