//! Utility modules
//!
//! - [`logger`] - tracing setup
//! - [`slug`] - URL slug derivation
//! - [`time`] - date boundary helpers
//! - [`validation`] - validator-to-envelope bridging

pub mod logger;
pub mod slug;
pub mod time;
pub mod validation;

// Re-export error types from shared for handler signatures
pub use shared::error::{AppError, AppResult, ErrorKind};
pub use shared::response::{ApiResponse, PageResult};
pub use shared::util::now_millis;
