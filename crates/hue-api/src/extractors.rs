//! # Custom Extractors
//!
//! The calling account comes from the `x-hue-caller` header. Read-only
//! routes do not ask for it; every mutating route does, and a missing or
//! malformed header is a 401.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::Json;

use hue_core::AccountId;

use crate::error::AppError;

/// Header carrying the calling account.
pub const CALLER_HEADER: &str = "x-hue-caller";

/// The calling account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub AccountId);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| AppError::Unauthorized(format!("missing {CALLER_HEADER} header")))?
            .to_str()
            .map_err(|_| AppError::Unauthorized(format!("{CALLER_HEADER} is not ASCII")))?;
        AccountId::new(raw)
            .map(Caller)
            .map_err(|e| AppError::Unauthorized(e.to_string()))
    }
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a query string, mapping errors to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Parse an account named in a request body.
pub fn account(raw: &str) -> Result<AccountId, AppError> {
    Ok(AccountId::new(raw)?)
}
