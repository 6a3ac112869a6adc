//! Shared types for the store service
//!
//! Wire-level building blocks used by the server and by clients of its API:
//! the response envelope, error kinds, and small utility helpers.

pub mod error;
pub mod response;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorKind};
pub use response::{ApiResponse, PageResult};
