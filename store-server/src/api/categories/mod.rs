//! Category API module

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", category_routes())
}

fn category_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/menu", get(handler::menu))
        .route("/bySlug/{slug}", get(handler::get_by_slug))
        .route("/toggleShowOnMenu/{id}", patch(handler::toggle_show_on_menu))
        .route("/toggleDelete/{id}", delete(handler::toggle_delete))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
