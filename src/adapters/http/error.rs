//! HTTP error mapping.
//!
//! Every failure leaves the API as `{code, message, details?}` JSON, including
//! failures on endpoints that would otherwise stream a PDF.

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::application::handlers::{CreateEntityError, UpdateEntityError};
use crate::domain::foundation::{DomainError, ErrorCode, Role};

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}

/// Error returned from HTTP handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, body: ErrorResponse) -> Self {
        Self { status, body }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorResponse::bad_request(message))
    }

    pub fn forbidden(role: Role) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            ErrorResponse::new(
                ErrorCode::Forbidden.to_string(),
                format!("Role '{}' may not modify entities", role),
            ),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// HTTP status for a domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::EntityNotFound | ErrorCode::DocumentNotFound | ErrorCode::NotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::ConcurrencyConflict => StatusCode::CONFLICT,
        ErrorCode::RenderFailed
        | ErrorCode::DatabaseError
        | ErrorCode::StorageError
        | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = status_for(err.code);
        if status.is_server_error() {
            tracing::error!(code = %err.code, error = %err.message, "Request failed");
        }
        Self::new(
            status,
            ErrorResponse {
                code: err.code.to_string(),
                message: err.message,
                details: err.details,
            },
        )
    }
}

impl From<CreateEntityError> for ApiError {
    fn from(err: CreateEntityError) -> Self {
        match err {
            CreateEntityError::Forbidden(role) => ApiError::forbidden(role),
            CreateEntityError::Domain(e) => e.into(),
        }
    }
}

impl From<UpdateEntityError> for ApiError {
    fn from(err: UpdateEntityError) -> Self {
        match err {
            UpdateEntityError::Forbidden(role) => ApiError::forbidden(role),
            UpdateEntityError::Domain(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
