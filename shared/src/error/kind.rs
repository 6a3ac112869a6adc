//! Error kinds carried by [`AppError`](super::AppError)
//!
//! Every failure the API reports falls into one of these kinds. The kind
//! decides the logical status code placed in the response envelope; the
//! transport status stays 200 regardless.

/// Logical error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Entity absent (404)
    NotFound,
    /// Duplicate name/slug/code (409)
    Conflict,
    /// Missing or malformed input (400)
    ValidationFailed,
    /// Request is well-formed but the operation is not allowed in the
    /// current state, e.g. purging a record that is not soft-deleted (422)
    Unprocessable,
    /// Missing or invalid access token (401)
    Unauthorized,
    /// Storage or transaction failure (500)
    Internal,
}

impl ErrorKind {
    /// Logical status code for the envelope
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::ValidationFailed => 400,
            Self::Unprocessable => 422,
            Self::Unauthorized => 401,
            Self::Internal => 500,
        }
    }

    /// Default message used when no custom message is given
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::NotFound => "Resource not found",
            Self::Conflict => "Resource already exists",
            Self::ValidationFailed => "Validation failed",
            Self::Unprocessable => "Operation not allowed in current state",
            Self::Unauthorized => "Authentication required",
            Self::Internal => "Internal server error",
        }
    }

    /// Stable name, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::ValidationFailed => "validation_failed",
            Self::Unprocessable => "unprocessable",
            Self::Unauthorized => "unauthorized",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::ValidationFailed.status_code(), 400);
        assert_eq!(ErrorKind::Unprocessable.status_code(), 422);
        assert_eq!(ErrorKind::Unauthorized.status_code(), 401);
        assert_eq!(ErrorKind::Internal.status_code(), 500);
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(ErrorKind::Unprocessable.to_string(), "unprocessable");
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
    }
}
