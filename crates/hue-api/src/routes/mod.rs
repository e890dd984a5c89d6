//! # Route Modules
//!
//! Request and response bodies shared by both registries, and the
//! handler bodies that work the same way for either registry kind.

pub mod admin;
pub mod colors;
pub mod words;

use serde::{Deserialize, Serialize};

use hue_core::SequenceId;
use hue_issuance::{RegistryKind, Service};
use hue_registry::AttributeEntry;

use crate::error::AppError;
use crate::extractors::account;

// ── Request/Response DTOs ───────────────────────────────────────────

/// `?start=&end=` for range queries.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: u64,
    pub end: u64,
}

/// Canonical keys in a range.
#[derive(Debug, Serialize, Deserialize)]
pub struct RangeResponse {
    pub start: u64,
    pub end: u64,
    pub keys: Vec<String>,
}

/// Sequence ids assigned by a mint.
#[derive(Debug, Serialize, Deserialize)]
pub struct MintResponse {
    pub sequence_ids: Vec<u64>,
}

impl MintResponse {
    fn from_ids(ids: Vec<SequenceId>) -> Self {
        Self {
            sequence_ids: ids.into_iter().map(SequenceId::get).collect(),
        }
    }
}

/// A rendered document.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub sequence_id: u64,
    /// `data:application/json;base64,...`
    pub uri: String,
}

/// Attributes of one identifier, display name first.
#[derive(Debug, Serialize, Deserialize)]
pub struct AttributesResponse {
    pub sequence_id: u64,
    pub attributes: Vec<AttributeEntry>,
}

/// One trait write, or several as parallel arrays.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AttributesRequest {
    Single {
        trait_name: String,
        value: String,
    },
    Batch {
        trait_names: Vec<String>,
        values: Vec<String>,
    },
}

/// Transfer by the current holder, who is the caller.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub to: String,
}

// ── Shared handler bodies ───────────────────────────────────────────

pub(crate) fn range<R: RegistryKind>(
    service: &Service<R>,
    query: RangeQuery,
) -> Result<RangeResponse, AppError> {
    let keys = service.range(query.start, query.end)?;
    Ok(RangeResponse {
        start: query.start,
        end: query.end,
        keys,
    })
}

pub(crate) fn attributes<R: RegistryKind>(
    service: &Service<R>,
    id: u64,
) -> Result<AttributesResponse, AppError> {
    let attributes = service.list_attributes(SequenceId(id))?;
    Ok(AttributesResponse {
        sequence_id: id,
        attributes,
    })
}

pub(crate) fn set_attributes<R: RegistryKind>(
    service: &Service<R>,
    caller: &hue_core::AccountId,
    id: u64,
    req: AttributesRequest,
) -> Result<AttributesResponse, AppError> {
    match req {
        AttributesRequest::Single { trait_name, value } => {
            service.set_attribute(caller, SequenceId(id), &trait_name, &value)?
        }
        AttributesRequest::Batch {
            trait_names,
            values,
        } => service.set_attributes(caller, SequenceId(id), &trait_names, &values)?,
    }
    attributes(service, id)
}

pub(crate) fn transfer<R: RegistryKind>(
    service: &Service<R>,
    caller: &hue_core::AccountId,
    id: u64,
    req: TransferRequest,
) -> Result<(), AppError> {
    let to = account(&req.to)?;
    service.notify_transfer(SequenceId(id), caller, to)?;
    Ok(())
}
