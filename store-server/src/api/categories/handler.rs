//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Category, CategoryBrief, CategoryCreate, CategoryUpdate, CategoryView};
use crate::db::repository::CategoryRepository;
use crate::utils::validation::validation_failed;
use crate::utils::{ApiResponse, AppError, AppResult};

/// Project one category, looking up its product count
async fn into_view(repo: &CategoryRepository, category: Category) -> AppResult<CategoryView> {
    let counts = repo.product_counts().await?;
    let count = category
        .id
        .as_ref()
        .and_then(|id| counts.get(id).copied())
        .unwrap_or(0);
    Ok(CategoryView::from_entity(category, count))
}

/// GET /api/categories - all categories with live product counts
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<CategoryView>>> {
    let repo = CategoryRepository::new(state.get_db());
    let categories = repo.find_all().await?;
    let counts = repo.product_counts().await?;

    let views = categories
        .into_iter()
        .map(|c| {
            let count = c
                .id
                .as_ref()
                .and_then(|id| counts.get(id).copied())
                .unwrap_or(0);
            CategoryView::from_entity(c, count)
        })
        .collect();
    Ok(ApiResponse::success(views))
}

/// GET /api/categories/menu - storefront menu entries
pub async fn menu(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<CategoryBrief>>> {
    let repo = CategoryRepository::new(state.get_db());
    let entries = repo.menu().await?;
    Ok(ApiResponse::success(entries))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CategoryView>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;
    Ok(ApiResponse::success(into_view(&repo, category).await?))
}

/// GET /api/categories/bySlug/{slug}
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<CategoryView>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;
    Ok(ApiResponse::success(into_view(&repo, category).await?))
}

/// POST /api/categories - create category
pub async fn create(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<ApiResponse<CategoryView>> {
    payload.validate().map_err(validation_failed)?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.create(payload).await?;
    Ok(ApiResponse::created(CategoryView::from_entity(category, 0)))
}

/// PUT /api/categories/{id} - full update, slug follows the name
pub async fn update(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<ApiResponse<CategoryView>> {
    payload.validate().map_err(validation_failed)?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.update(&id, payload).await?;
    Ok(ApiResponse::success(into_view(&repo, category).await?))
}

/// PATCH /api/categories/toggleShowOnMenu/{id}
pub async fn toggle_show_on_menu(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CategoryView>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo.toggle_show_on_menu(&id).await?;
    Ok(ApiResponse::success(into_view(&repo, category).await?))
}

/// DELETE /api/categories/toggleDelete/{id} - soft delete or restore
///
/// Returns whether the category is soft-deleted after the toggle.
pub async fn toggle_delete(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo.toggle_soft_delete(&id).await?;
    Ok(ApiResponse::success(category.lifecycle.is_deleted()))
}

/// DELETE /api/categories/{id} - hard delete, only from the soft-deleted
/// state; products drop their membership link
pub async fn delete(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    let repo = CategoryRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(ApiResponse::success(true))
}
