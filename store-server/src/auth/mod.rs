//! Authentication module
//!
//! JWT validation and the current-user extractor:
//! - [`JwtService`] - token validation and (for tooling) generation
//! - [`CurrentUser`] - authenticated user context
//! - [`extractor`] - axum `FromRequestParts` implementation

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
