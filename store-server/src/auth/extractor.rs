//! JWT Extractor
//!
//! Custom extractor validating the bearer token and yielding the
//! authenticated user.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::utils::{AppError, ErrorKind};

/// Use this extractor in protected handlers to validate the JWT and
/// obtain the [`CurrentUser`]
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already extracted earlier in the request
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header).ok_or_else(|| {
                AppError::with_message(ErrorKind::Unauthorized, "Invalid authorization header")
            })?,
            None => {
                tracing::warn!(uri = %parts.uri, "request without authorization header");
                return Err(AppError::unauthorized());
            }
        };

        let jwt_service = state.get_jwt_service();
        match jwt_service.validate_token(token) {
            Ok(claims) => {
                let user = CurrentUser::from(claims);

                // Cache for later extractors on the same request
                parts.extensions.insert(user.clone());

                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, uri = %parts.uri, "token validation failed");

                match e {
                    JwtError::ExpiredToken => {
                        Err(AppError::with_message(ErrorKind::Unauthorized, "Token expired"))
                    }
                    _ => Err(AppError::with_message(ErrorKind::Unauthorized, "Invalid token")),
                }
            }
        }
    }
}
