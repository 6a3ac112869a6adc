//! Unified error system
//!
//! - [`ErrorKind`]: logical classification with envelope status codes
//! - [`AppError`]: error type carried from repositories to the API boundary
//!
//! Every error renders into the uniform response envelope with HTTP
//! transport status 200; see [`crate::response`].
//!
//! # Example
//!
//! ```
//! use shared::error::AppError;
//!
//! let err = AppError::not_found("Product");
//! assert_eq!(err.status_code(), 404);
//!
//! let err = AppError::validation("Edit reason is required")
//!     .with_detail("editReason: must not be empty");
//! assert_eq!(err.error_lines().len(), 2);
//! ```

mod kind;
mod types;

pub use kind::ErrorKind;
pub use types::{AppError, AppResult};
