//! # Owner Administration API
//!
//! Every route names its registry, `colors` or `words`, and requires the
//! caller to be that registry's owner. Ownership is checked by the
//! registry itself, so a non-owner gets `403 NOT_OWNER`.
//!
//! ## Endpoints
//!
//! - `POST /v1/admin/{registry}/issuance` `{enabled}`
//! - `POST /v1/admin/{registry}/price` `{price}`
//! - `POST /v1/admin/{registry}/price-changes` `{allowed}`
//! - `POST /v1/admin/{registry}/name-overrides` `{allowed}`
//! - `POST /v1/admin/{registry}/staked-custody` `{account?}`
//! - `POST /v1/admin/{registry}/withdraw` `{amount?}`
//! - `POST /v1/admin/{registry}/policies` `{trait_name, user_modifiable, enabled_for_all}`
//! - `POST /v1/admin/{registry}/suppression-lock`
//! - `POST /v1/admin/{registry}/{id}/grant` and `/revoke` `{trait_name}`
//! - `POST /v1/admin/{registry}/{id}/suppress` and `/unsuppress`
//! - `POST /v1/admin/{registry}/{id}/attributes` `{trait_name, value}`
//! - `POST /v1/admin/{registry}/{id}/name` `{name}` (colours only)

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use hue_core::{RegistryError, SequenceId};

use crate::error::AppError;
use crate::extractors::{account, extract_json, Caller};
use crate::state::AppState;

/// Run `$body` against the service named by `$registry`, bound to `$svc`.
macro_rules! with_registry {
    ($state:expr, $registry:expr, |$svc:ident| $body:expr) => {
        match $registry.as_str() {
            "colors" => {
                let $svc = &*$state.registries.colors;
                $body
            }
            "words" => {
                let $svc = &*$state.registries.words;
                $body
            }
            other => Err(AppError::NotFound(format!("no registry named {other:?}"))),
        }
    };
}

// ── Request/Response DTOs ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EnabledRequest {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct AllowedRequest {
    pub allowed: bool,
}

#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    pub price: u64,
}

#[derive(Debug, Deserialize)]
pub struct CustodyRequest {
    #[serde(default)]
    pub account: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    #[serde(default)]
    pub amount: Option<u128>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub amount: u128,
    pub balance: u128,
}

#[derive(Debug, Deserialize)]
pub struct PolicyRequest {
    pub trait_name: String,
    pub user_modifiable: bool,
    pub enabled_for_all: bool,
}

#[derive(Debug, Deserialize)]
pub struct TraitRequest {
    pub trait_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminAttributeRequest {
    pub trait_name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct OverrideNameRequest {
    pub name: String,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the administration router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/{registry}/issuance", post(set_issuance))
        .route("/v1/admin/{registry}/price", post(set_price))
        .route("/v1/admin/{registry}/price-changes", post(set_price_changes))
        .route("/v1/admin/{registry}/name-overrides", post(set_name_overrides))
        .route("/v1/admin/{registry}/staked-custody", post(set_staked_custody))
        .route("/v1/admin/{registry}/withdraw", post(withdraw))
        .route("/v1/admin/{registry}/policies", post(set_policy))
        .route("/v1/admin/{registry}/suppression-lock", post(lock_suppression))
        .route("/v1/admin/{registry}/{id}/grant", post(grant_trait))
        .route("/v1/admin/{registry}/{id}/revoke", post(revoke_trait))
        .route("/v1/admin/{registry}/{id}/suppress", post(suppress))
        .route("/v1/admin/{registry}/{id}/unsuppress", post(unsuppress))
        .route("/v1/admin/{registry}/{id}/attributes", post(set_attribute))
        .route("/v1/admin/{registry}/{id}/name", post(override_name))
}

// ── Handlers ────────────────────────────────────────────────────────

async fn set_issuance(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(registry): Path<String>,
    body: Result<Json<EnabledRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    with_registry!(state, registry, |svc| {
        svc.set_issuance_enabled(&caller, req.enabled)?;
        Ok(StatusCode::NO_CONTENT)
    })
}

async fn set_price(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(registry): Path<String>,
    body: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    with_registry!(state, registry, |svc| {
        svc.set_price(&caller, req.price)?;
        Ok(StatusCode::NO_CONTENT)
    })
}

async fn set_price_changes(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(registry): Path<String>,
    body: Result<Json<AllowedRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    with_registry!(state, registry, |svc| {
        svc.set_price_changes_allowed(&caller, req.allowed)?;
        Ok(StatusCode::NO_CONTENT)
    })
}

async fn set_name_overrides(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(registry): Path<String>,
    body: Result<Json<AllowedRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    with_registry!(state, registry, |svc| {
        svc.set_name_overrides_allowed(&caller, req.allowed)?;
        Ok(StatusCode::NO_CONTENT)
    })
}

async fn set_staked_custody(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(registry): Path<String>,
    body: Result<Json<CustodyRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    let custody = req.account.as_deref().map(account).transpose()?;
    with_registry!(state, registry, |svc| {
        svc.set_staked_custody(&caller, custody)?;
        Ok(StatusCode::NO_CONTENT)
    })
}

async fn withdraw(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(registry): Path<String>,
    body: Result<Json<WithdrawRequest>, JsonRejection>,
) -> Result<Json<WithdrawResponse>, AppError> {
    let req = extract_json(body)?;
    with_registry!(state, registry, |svc| {
        let amount = svc.withdraw(&caller, req.amount)?;
        Ok(Json(WithdrawResponse {
            amount,
            balance: svc.balance(),
        }))
    })
}

async fn set_policy(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(registry): Path<String>,
    body: Result<Json<PolicyRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    with_registry!(state, registry, |svc| {
        svc.set_policy(
            &caller,
            &req.trait_name,
            req.user_modifiable,
            req.enabled_for_all,
        )?;
        Ok(StatusCode::NO_CONTENT)
    })
}

async fn lock_suppression(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(registry): Path<String>,
) -> Result<StatusCode, AppError> {
    with_registry!(state, registry, |svc| {
        svc.lock_suppression(&caller)?;
        Ok(StatusCode::NO_CONTENT)
    })
}

async fn grant_trait(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((registry, id)): Path<(String, u64)>,
    body: Result<Json<TraitRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    with_registry!(state, registry, |svc| {
        svc.grant_trait(&caller, SequenceId(id), &req.trait_name)?;
        Ok(StatusCode::NO_CONTENT)
    })
}

async fn revoke_trait(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((registry, id)): Path<(String, u64)>,
    body: Result<Json<TraitRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    with_registry!(state, registry, |svc| {
        svc.revoke_trait(&caller, SequenceId(id), &req.trait_name)?;
        Ok(StatusCode::NO_CONTENT)
    })
}

async fn suppress(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((registry, id)): Path<(String, u64)>,
) -> Result<StatusCode, AppError> {
    with_registry!(state, registry, |svc| {
        svc.suppress(&caller, SequenceId(id))?;
        Ok(StatusCode::NO_CONTENT)
    })
}

async fn unsuppress(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((registry, id)): Path<(String, u64)>,
) -> Result<StatusCode, AppError> {
    with_registry!(state, registry, |svc| {
        svc.unsuppress(&caller, SequenceId(id))?;
        Ok(StatusCode::NO_CONTENT)
    })
}

async fn set_attribute(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((registry, id)): Path<(String, u64)>,
    body: Result<Json<AdminAttributeRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    with_registry!(state, registry, |svc| {
        svc.admin_set_attribute(&caller, SequenceId(id), &req.trait_name, &req.value)?;
        Ok(StatusCode::NO_CONTENT)
    })
}

async fn override_name(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((registry, id)): Path<(String, u64)>,
    body: Result<Json<OverrideNameRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_json(body)?;
    match registry.as_str() {
        "colors" => {
            state
                .registries
                .colors
                .override_display_name(&caller, SequenceId(id), &req.name)?;
            Ok(StatusCode::NO_CONTENT)
        }
        "words" => Err(RegistryError::InvalidInput(
            "word identifiers cannot be renamed".to_string(),
        )
        .into()),
        other => Err(AppError::NotFound(format!("no registry named {other:?}"))),
    }
}
