//! API response envelope
//!
//! Every endpoint wraps its payload in the same structure:
//!
//! ```json
//! { "isSuccess": true,  "statusCode": 200, "data": { ... } }
//! { "isSuccess": false, "statusCode": 404, "errors": ["Product not found"] }
//! ```
//!
//! The HTTP transport status is always 200; logical success and failure
//! travel inside the envelope. Existing consumers depend on this, so the
//! contract must hold on every path, including errors.

use crate::error::AppError;
use axum::Json;
use axum::response::IntoResponse;
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Uniform response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Logical success flag
    pub is_success: bool,
    /// Logical status code (HTTP-numbered), independent of transport
    pub status_code: u16,
    /// Payload, present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error lines, present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    /// Successful response with payload (200)
    pub fn success(data: T) -> Self {
        Self {
            is_success: true,
            status_code: 200,
            data: Some(data),
            errors: None,
        }
    }

    /// Successful response for a freshly created resource (201)
    pub fn created(data: T) -> Self {
        Self {
            is_success: true,
            status_code: 201,
            data: Some(data),
            errors: None,
        }
    }

    /// Failure from an [`AppError`]
    pub fn failure(err: &AppError) -> Self {
        Self {
            is_success: false,
            status_code: err.status_code(),
            data: None,
            errors: Some(err.error_lines()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        // Transport status is 200 by contract, even for logical failures.
        (StatusCode::OK, Json(self)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.kind == crate::error::ErrorKind::Internal {
            tracing::error!(kind = %self.kind, message = %self.message, "internal error");
        }
        ApiResponse::<()>::failure(&self).into_response()
    }
}

/// One page of a filtered listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total matching items across all pages
    pub total: u64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}
