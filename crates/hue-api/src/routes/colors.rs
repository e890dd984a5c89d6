//! # Colour Registry API
//!
//! ## Endpoints
//!
//! - `POST /v1/colors` mint
//! - `GET /v1/colors?start=&end=` canonical keys in a range
//! - `GET /v1/colors/{id}` document data URI
//! - `GET|PUT /v1/colors/{id}/attributes` list or write attributes
//! - `PUT /v1/colors/{id}/name` rename
//! - `PUT /v1/colors/names` batch rename
//! - `POST /v1/colors/{id}/transfer` transfer by the holder

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use hue_core::SequenceId;
use hue_issuance::ColorMint;

use crate::error::AppError;
use crate::extractors::{account, extract_json, extract_query, Caller};
use crate::routes::{
    self, AttributesRequest, AttributesResponse, DocumentResponse, MintResponse, RangeQuery,
    RangeResponse, TransferRequest,
};
use crate::state::AppState;

// ── Request DTOs ────────────────────────────────────────────────────

/// Mint one or more colours to `to`.
#[derive(Debug, Deserialize)]
pub struct MintColorsRequest {
    pub items: Vec<ColorMint>,
    pub to: String,
    pub payment: u128,
}

/// New display name for one identifier.
#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

/// One entry of a batch rename.
#[derive(Debug, Deserialize)]
pub struct RenameItem {
    pub sequence_id: u64,
    pub name: String,
}

/// Batch rename, applied in order.
#[derive(Debug, Deserialize)]
pub struct RenameBatchRequest {
    pub items: Vec<RenameItem>,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the colours router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/colors", post(mint).get(range))
        .route("/v1/colors/names", put(rename_batch))
        .route("/v1/colors/{id}", get(document))
        .route("/v1/colors/{id}/name", put(rename))
        .route(
            "/v1/colors/{id}/attributes",
            get(attributes).put(set_attributes),
        )
        .route("/v1/colors/{id}/transfer", post(transfer))
}

// ── Handlers ────────────────────────────────────────────────────────

async fn mint(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<MintColorsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MintResponse>), AppError> {
    let req = extract_json(body)?;
    let to = account(&req.to)?;
    let ids = state
        .registries
        .colors
        .mint(&caller, &req.items, &to, req.payment)?;
    Ok((StatusCode::CREATED, Json(MintResponse::from_ids(ids))))
}

async fn range(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<RangeResponse>, AppError> {
    let query = extract_query(query)?;
    Ok(Json(routes::range(&state.registries.colors, query)?))
}

async fn document(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DocumentResponse>, AppError> {
    let uri = state.registries.colors.document(SequenceId(id))?;
    Ok(Json(DocumentResponse {
        sequence_id: id,
        uri,
    }))
}

async fn attributes(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AttributesResponse>, AppError> {
    Ok(Json(routes::attributes(&state.registries.colors, id)?))
}

async fn set_attributes(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
    body: Result<Json<AttributesRequest>, JsonRejection>,
) -> Result<Json<AttributesResponse>, AppError> {
    let req = extract_json(body)?;
    Ok(Json(routes::set_attributes(
        &state.registries.colors,
        &caller,
        id,
        req,
    )?))
}

async fn rename(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
    body: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<Json<AttributesResponse>, AppError> {
    let req = extract_json(body)?;
    state
        .registries
        .colors
        .rename(&caller, SequenceId(id), &req.name)?;
    Ok(Json(routes::attributes(&state.registries.colors, id)?))
}

async fn rename_batch(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<RenameBatchRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    let items: Vec<(SequenceId, String)> = req
        .items
        .into_iter()
        .map(|item| (SequenceId(item.sequence_id), item.name))
        .collect();
    state.registries.colors.rename_batch(&caller, &items)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn transfer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    routes::transfer(&state.registries.colors, &caller, id, req)?;
    Ok(StatusCode::NO_CONTENT)
}
