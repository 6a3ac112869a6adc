//! Store Server - storefront and back-office REST API
//!
//! # Overview
//!
//! Single binary serving an e-commerce catalog with order settlement:
//!
//! - **Catalog** (`db`): products, categories, suppliers on embedded SurrealDB
//! - **Settlement** (`checkout`): price snapshots, discount policy, totals
//! - **Auth** (`auth`): validation of externally issued JWTs
//! - **HTTP API** (`api`): RESTful handlers, uniform response envelope
//!
//! # Module structure
//!
//! ```text
//! store-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT validation, current user
//! ├── checkout/      # pure settlement logic (money, policy, codes)
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models, repositories, schema
//! └── utils/         # logging, slugs, time, validation
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, PageResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
