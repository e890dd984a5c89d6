//! # Word Registry API
//!
//! ## Endpoints
//!
//! - `POST /v1/words` mint
//! - `POST /v1/words/verify` classify a word tuple without issuing it
//! - `GET /v1/words?start=&end=` canonical combinations in a range
//! - `GET /v1/words/{id}` document data URI
//! - `GET|PUT /v1/words/{id}/attributes` list or write attributes
//! - `POST /v1/words/{id}/transfer` transfer by the holder

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use hue_core::SequenceId;
use hue_registry::Outcome;

use crate::error::AppError;
use crate::extractors::{account, extract_json, extract_query, Caller};
use crate::routes::{
    self, AttributesRequest, AttributesResponse, DocumentResponse, MintResponse, RangeQuery,
    RangeResponse, TransferRequest,
};
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Mint one or more word tuples to `to`. Each item has one to three slots.
#[derive(Debug, Deserialize)]
pub struct MintWordsRequest {
    pub items: Vec<Vec<String>>,
    pub to: String,
    pub payment: u128,
}

/// Slots to classify.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub words: Vec<String>,
}

/// Classification of a word tuple.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    /// `valid`, `invalid_count`, `invalid_length`, `invalid_character`
    /// or `combination_used`.
    pub outcome: String,
    /// Canonical combination when valid or already used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combination: Option<String>,
    /// Number of slots given, for `invalid_count`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Offending slot, for `invalid_length` and `invalid_character`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,
    /// Byte length of the offending slot, for `invalid_length`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Outcome> for VerifyResponse {
    fn from(outcome: Outcome) -> Self {
        let mut response = VerifyResponse {
            valid: outcome.is_valid(),
            outcome: outcome.kind().to_string(),
            ..VerifyResponse::default()
        };
        match &outcome {
            Outcome::Valid(tuple) => response.combination = Some(tuple.combination_key()),
            Outcome::InvalidCount(n) => response.count = Some(*n),
            Outcome::InvalidLength { slot, len } => {
                response.slot = Some(*slot);
                response.len = Some(*len);
            }
            Outcome::InvalidCharacter { slot } => response.slot = Some(*slot),
            Outcome::CombinationUsed(combination) => {
                response.combination = Some(combination.clone())
            }
        }
        if let Err(err) = outcome.into_result() {
            response.message = Some(err.to_string());
        }
        response
    }
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the words router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/words", post(mint).get(range))
        .route("/v1/words/verify", post(verify))
        .route("/v1/words/{id}", get(document))
        .route(
            "/v1/words/{id}/attributes",
            get(attributes).put(set_attributes),
        )
        .route("/v1/words/{id}/transfer", post(transfer))
}

// ── Handlers ────────────────────────────────────────────────────────

async fn mint(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<MintWordsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MintResponse>), AppError> {
    let req = extract_json(body)?;
    let to = account(&req.to)?;
    let ids = state
        .registries
        .words
        .mint(&caller, &req.items, &to, req.payment)?;
    Ok((StatusCode::CREATED, Json(MintResponse::from_ids(ids))))
}

async fn verify(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let req = extract_json(body)?;
    let outcome = state.registries.words.verify(&req.words);
    Ok(Json(VerifyResponse::from(outcome)))
}

async fn range(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<RangeResponse>, AppError> {
    let query = extract_query(query)?;
    Ok(Json(routes::range(&state.registries.words, query)?))
}

async fn document(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DocumentResponse>, AppError> {
    let uri = state.registries.words.document(SequenceId(id))?;
    Ok(Json(DocumentResponse {
        sequence_id: id,
        uri,
    }))
}

async fn attributes(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AttributesResponse>, AppError> {
    Ok(Json(routes::attributes(&state.registries.words, id)?))
}

async fn set_attributes(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
    body: Result<Json<AttributesRequest>, JsonRejection>,
) -> Result<Json<AttributesResponse>, AppError> {
    let req = extract_json(body)?;
    Ok(Json(routes::set_attributes(
        &state.registries.words,
        &caller,
        id,
        req,
    )?))
}

async fn transfer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    routes::transfer(&state.registries.words, &caller, id, req)?;
    Ok(StatusCode::NO_CONTENT)
}
