//! API routing module
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`products`] - catalog management and storefront projections
//! - [`categories`] - category management
//! - [`suppliers`] - supplier management
//! - [`discounts`] - discount management and validation
//! - [`orders`] - order settlement and back office
//! - [`dashboard`] - back-office counters
//!
//! Every endpoint responds with the uniform envelope; reads are public,
//! mutations require a bearer token.

pub mod health;

pub mod categories;
pub mod dashboard;
pub mod discounts;
pub mod orders;
pub mod products;
pub mod suppliers;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Assemble the full application router with middleware applied
pub fn create_router(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(suppliers::router())
        .merge(discounts::router())
        .merge(orders::router())
        .merge(dashboard::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
