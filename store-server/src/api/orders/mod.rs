//! Order API module
//!
//! Settlement steps (create, attach discount, add line items) plus the
//! back-office listing and status transitions.

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/checkStock", post(handler::check_stock))
        .route("/approve/{id}", patch(handler::approve))
        .route("/cancel/{id}", patch(handler::cancel))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/discount", post(handler::attach_discount))
        .route("/{id}/details", post(handler::add_line_items))
}
