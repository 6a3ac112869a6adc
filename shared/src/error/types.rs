//! Application error type

use super::kind::ErrorKind;
use thiserror::Error;

/// Application error carried from repositories and handlers to the API
/// boundary, where it is rendered into the response envelope.
///
/// `message` is the primary human-readable line; `details` holds optional
/// follow-up lines (field-level validation failures, for example). The
/// envelope's `errors` array is `message` followed by `details`.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// Classification, decides the envelope status code
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Additional error lines, often empty
    pub details: Vec<String>,
}

impl AppError {
    /// Create an error with the default message for the kind
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            message: kind.default_message().to_string(),
            kind,
            details: Vec::new(),
        }
    }

    /// Create an error with a custom message
    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Append a detail line
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Logical status code for the envelope
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// All error lines for the envelope: message first, then details
    pub fn error_lines(&self) -> Vec<String> {
        std::iter::once(self.message.clone())
            .chain(self.details.iter().cloned())
            .collect()
    }

    // ==================== Convenience constructors ====================

    /// Entity absent
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::NotFound, format!("{} not found", resource.into()))
    }

    /// Duplicate name/slug/code
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Conflict, msg)
    }

    /// Missing or malformed input
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::ValidationFailed, msg)
    }

    /// Operation not allowed in the record's current state
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Unprocessable, msg)
    }

    /// Missing or invalid access token
    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized)
    }

    /// Internal failure
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Internal, msg)
    }

    /// Storage failure, reported as internal
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Internal, format!("Database error: {}", msg.into()))
    }
}

/// Result type alias used throughout the server
pub type AppResult<T> = Result<T, AppError>;
