//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    AttachDiscountRequest, OrderCreate, OrderItemRequest, OrderListItem, OrderQuery, OrderView,
    StockReport,
};
use crate::db::repository::{OrderRepository, assemble_view};
use crate::utils::validation::validation_failed;
use crate::utils::{ApiResponse, AppError, AppResult, PageResult};

fn order_repo(state: &ServerState) -> OrderRepository {
    OrderRepository::new(state.get_db(), state.get_write_lock())
}

/// GET /api/orders - paged, filtered back-office listing
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<ApiResponse<PageResult<OrderListItem>>> {
    let page = order_repo(&state).find_paged(&query).await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/orders/{id} - detail with derived totals
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderView>> {
    let view = order_repo(&state)
        .find_view(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(ApiResponse::success(view))
}

/// POST /api/orders - open an order with contact details
///
/// The customer identity comes from the token, never the body.
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<ApiResponse<OrderView>> {
    payload.validate().map_err(validation_failed)?;

    let order = order_repo(&state).create(payload, &user.id).await?;
    Ok(ApiResponse::created(assemble_view(order, None)))
}

/// POST /api/orders/{id}/discount - validate and attach a discount code
///
/// Redemption and the quantity decrement happen atomically; losing the
/// last unit to a concurrent request fails the whole call.
pub async fn attach_discount(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<AttachDiscountRequest>,
) -> AppResult<ApiResponse<OrderView>> {
    payload.validate().map_err(validation_failed)?;

    let repo = order_repo(&state);
    repo.attach_discount(&id, &payload.code).await?;

    let view = repo
        .find_view(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(ApiResponse::success(view))
}

/// POST /api/orders/{id}/details - settle line items
///
/// Prices are snapshotted and stock decremented in one transaction; any
/// insufficient line aborts the whole step.
pub async fn add_line_items(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(items): Json<Vec<OrderItemRequest>>,
) -> AppResult<ApiResponse<OrderView>> {
    for item in &items {
        item.validate().map_err(validation_failed)?;
    }

    let repo = order_repo(&state);
    repo.add_line_items(&id, &items).await?;

    let view = repo
        .find_view(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(ApiResponse::success(view))
}

/// POST /api/orders/checkStock - advisory sufficiency report
///
/// Never reserves anything; settlement re-checks under the transaction.
pub async fn check_stock(
    State(state): State<ServerState>,
    Json(items): Json<Vec<OrderItemRequest>>,
) -> AppResult<ApiResponse<Vec<StockReport>>> {
    for item in &items {
        item.validate().map_err(validation_failed)?;
    }

    let report = order_repo(&state).check_stock(&items).await?;
    Ok(ApiResponse::success(report))
}

/// PATCH /api/orders/approve/{id} - New → Approved
pub async fn approve(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderView>> {
    let repo = order_repo(&state);
    repo.approve(&id).await?;

    let view = repo
        .find_view(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(ApiResponse::success(view))
}

/// PATCH /api/orders/cancel/{id} - New/Approved → Cancelled
///
/// Stock and redeemed discount units are not returned.
pub async fn cancel(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderView>> {
    let repo = order_repo(&state);
    repo.cancel(&id).await?;

    let view = repo
        .find_view(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(ApiResponse::success(view))
}
