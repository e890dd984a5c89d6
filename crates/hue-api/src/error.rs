//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Registry errors map to HTTP status codes by kind; the machine-readable
//! code is the upper-cased [`RegistryError::reason`] tag.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hue_core::RegistryError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code, e.g. `NAME_TAKEN`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// A registry operation was rejected.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// No route target, such as an unknown registry name (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request body or query could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or malformed caller identity (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and machine-readable code.
    fn status_and_code(&self) -> (StatusCode, String) {
        match self {
            Self::Registry(err) => (registry_status(err), err.reason().to_ascii_uppercase()),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND".to_string()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST".to_string()),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED".to_string()),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR".to_string(),
            ),
        }
    }

    fn is_internal(&self) -> bool {
        match self {
            Self::Internal(_) => true,
            Self::Registry(err) => registry_status(err).is_server_error(),
            _ => false,
        }
    }
}

fn registry_status(err: &RegistryError) -> StatusCode {
    use RegistryError::*;
    match err {
        InvalidInput(_) | ReservedNameMismatch { .. } | ReservedTraitName(_)
        | PaymentMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AlreadyClaimed { .. } | NameTaken { .. } | CombinationUsed { .. }
        | CapacityExceeded(_) => StatusCode::CONFLICT,
        NotHolder { .. } | NotOwner(_) | PolicyDenied { .. } | Locked(_) | IssuanceDisabled => {
            StatusCode::FORBIDDEN
        }
        NotFound(_) => StatusCode::NOT_FOUND,
        Settlement(_) | Canonicalization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if self.is_internal() {
            tracing::error!(error = %self, "internal server error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}
