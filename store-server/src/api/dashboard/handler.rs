//! Dashboard API Handlers

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::checkout::money;
use crate::core::ServerState;
use crate::db::models::DiscountKind;
use crate::utils::time::today_range_millis;
use crate::utils::{ApiResponse, AppError, AppResult};

/// Back-office counters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_orders: u64,
    pub orders_today: u64,
    /// Sum of derived totals of today's non-cancelled orders
    pub revenue_today: f64,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

/// One order's revenue inputs; the total is derived in Rust the same way
/// the order views derive it
#[derive(Debug, Deserialize)]
struct RevenueRow {
    #[serde(default)]
    subtotal: f64,
    #[serde(default)]
    discount_kind: Option<DiscountKind>,
    #[serde(default)]
    discount_amount: Option<f64>,
}

/// GET /api/dashboard - storefront and settlement counters
pub async fn stats(State(state): State<ServerState>) -> AppResult<ApiResponse<DashboardStats>> {
    let (start, end) = today_range_millis();

    let sql = "SELECT count() AS total FROM product GROUP ALL; \
               SELECT count() AS total FROM order GROUP ALL; \
               SELECT count() AS total FROM order \
               WHERE order_date >= $start AND order_date < $end GROUP ALL; \
               SELECT math::sum(details.line_total) AS subtotal, \
               discount.kind AS discount_kind, discount.amount AS discount_amount \
               FROM order \
               WHERE status != 'CANCELLED' AND order_date >= $start AND order_date < $end";

    let mut result = state
        .db
        .query(sql)
        .bind(("start", start))
        .bind(("end", end))
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let total_products = take_count(&mut result, 0)?;
    let total_orders = take_count(&mut result, 1)?;
    let orders_today = take_count(&mut result, 2)?;

    let rows: Vec<RevenueRow> = result
        .take(3)
        .map_err(|e| AppError::database(e.to_string()))?;
    let revenue_today = rows
        .iter()
        .map(|row| {
            let reduction = match (row.discount_kind, row.discount_amount) {
                (Some(kind), Some(amount)) => money::discount_reduction(row.subtotal, kind, amount),
                _ => 0.0,
            };
            money::after_reduction(row.subtotal, reduction)
        })
        .sum();

    Ok(ApiResponse::success(DashboardStats {
        total_products,
        total_orders,
        orders_today,
        revenue_today,
    }))
}

fn take_count(result: &mut surrealdb::Response, index: usize) -> Result<u64, AppError> {
    let counts: Vec<CountRow> = result
        .take(index)
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(counts.first().map(|c| c.total).unwrap_or(0))
}
