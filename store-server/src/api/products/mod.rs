//! Product API module
//!
//! Catalog management, storefront projections and the product history log.

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/histories",
            get(handler::list_histories).delete(handler::purge_histories),
        )
        .route("/bySlug/{slug}", get(handler::get_by_slug))
        .route("/topSales/{n}", get(handler::top_sales))
        .route("/related/{slug}/{n}", get(handler::related))
        .route("/toggleActive/{id}", patch(handler::toggle_active))
        .route("/toggleDelete/{id}", delete(handler::toggle_delete))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
