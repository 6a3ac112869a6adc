//! Discount API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::checkout::{Applicability, policy};
use crate::core::ServerState;
use crate::db::models::{
    DiscountCreate, DiscountQuery, DiscountUpdate, DiscountValidation, DiscountView,
};
use crate::db::repository::DiscountRepository;
use crate::utils::validation::validation_failed;
use crate::utils::{ApiResponse, AppError, AppResult, PageResult, now_millis};

/// Pure applicability check payload
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub code: String,
    #[validate(range(min = 0.0, message = "billTotal must be non-negative"))]
    pub bill_total: f64,
}

/// GET /api/discounts - paged, filtered listing
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<DiscountQuery>,
) -> AppResult<ApiResponse<PageResult<DiscountView>>> {
    let repo = DiscountRepository::new(state.get_db());
    let page = repo.find_paged(&query).await?;
    let items = page.items.into_iter().map(DiscountView::from).collect();
    Ok(ApiResponse::success(PageResult::new(items, page.total)))
}

/// GET /api/discounts/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DiscountView>> {
    let repo = DiscountRepository::new(state.get_db());
    let discount = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Discount"))?;
    Ok(ApiResponse::success(DiscountView::from(discount)))
}

/// POST /api/discounts - create discount
pub async fn create(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(payload): Json<DiscountCreate>,
) -> AppResult<ApiResponse<DiscountView>> {
    payload.validate().map_err(validation_failed)?;

    let repo = DiscountRepository::new(state.get_db());
    let discount = repo.create(payload).await?;
    Ok(ApiResponse::created(DiscountView::from(discount)))
}

/// PUT /api/discounts/{id} - full update
pub async fn update(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<DiscountUpdate>,
) -> AppResult<ApiResponse<DiscountView>> {
    payload.validate().map_err(validation_failed)?;

    let repo = DiscountRepository::new(state.get_db());
    let discount = repo.update(&id, payload).await?;
    Ok(ApiResponse::success(DiscountView::from(discount)))
}

/// PATCH /api/discounts/toggleActive/{id} - flip redeemability
pub async fn toggle_active(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DiscountView>> {
    let repo = DiscountRepository::new(state.get_db());
    let discount = repo.toggle_active(&id).await?;
    Ok(ApiResponse::success(DiscountView::from(discount)))
}

/// DELETE /api/discounts/{id} - refused while orders reference it
pub async fn delete(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    let repo = DiscountRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(ApiResponse::success(true))
}

/// POST /api/discounts/validate - pure applicability check
///
/// Non-applicability is a verdict, not an error: the envelope is a success
/// and the payload carries `valid` plus the reason. Nothing is decremented
/// here.
pub async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<ValidateRequest>,
) -> AppResult<ApiResponse<DiscountValidation>> {
    payload.validate().map_err(validation_failed)?;

    let repo = DiscountRepository::new(state.get_db());
    let verdict = match repo.find_by_code(&payload.code).await? {
        None => DiscountValidation {
            code: payload.code,
            valid: false,
            reason: Some("Discount code not found".to_string()),
            kind: None,
            amount: None,
        },
        Some(discount) => match policy::evaluate(&discount, payload.bill_total, now_millis()) {
            Applicability::Redeemable => DiscountValidation {
                code: discount.code,
                valid: true,
                reason: None,
                kind: Some(discount.kind),
                amount: Some(discount.amount),
            },
            Applicability::NotApplicable(reason) => DiscountValidation {
                code: discount.code,
                valid: false,
                reason: Some(reason.message().to_string()),
                kind: Some(discount.kind),
                amount: Some(discount.amount),
            },
        },
    };

    Ok(ApiResponse::success(verdict))
}
