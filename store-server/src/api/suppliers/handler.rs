//! Supplier API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{SupplierCreate, SupplierUpdate, SupplierView};
use crate::db::repository::SupplierRepository;
use crate::utils::validation::validation_failed;
use crate::utils::{ApiResponse, AppError, AppResult};

/// GET /api/suppliers - all suppliers, alphabetical
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<SupplierView>>> {
    let repo = SupplierRepository::new(state.get_db());
    let suppliers = repo.find_all().await?;
    let views = suppliers.into_iter().map(SupplierView::from).collect();
    Ok(ApiResponse::success(views))
}

/// GET /api/suppliers/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<SupplierView>> {
    let repo = SupplierRepository::new(state.get_db());
    let supplier = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Supplier"))?;
    Ok(ApiResponse::success(SupplierView::from(supplier)))
}

/// POST /api/suppliers - create supplier
pub async fn create(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(payload): Json<SupplierCreate>,
) -> AppResult<ApiResponse<SupplierView>> {
    payload.validate().map_err(validation_failed)?;

    let repo = SupplierRepository::new(state.get_db());
    let supplier = repo.create(payload).await?;
    Ok(ApiResponse::created(SupplierView::from(supplier)))
}

/// PUT /api/suppliers/{id} - full update, slug follows the name
pub async fn update(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<SupplierUpdate>,
) -> AppResult<ApiResponse<SupplierView>> {
    payload.validate().map_err(validation_failed)?;

    let repo = SupplierRepository::new(state.get_db());
    let supplier = repo.update(&id, payload).await?;
    Ok(ApiResponse::success(SupplierView::from(supplier)))
}

/// DELETE /api/suppliers/{id} - refused while products reference it
pub async fn delete(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    let repo = SupplierRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(ApiResponse::success(true))
}
