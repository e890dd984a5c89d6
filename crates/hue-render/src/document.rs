//! # Attribute Document
//!
//! The externally visible rendering of one identifier: a JSON object with
//! `name`, `description`, `image`, and `attributes`, serialized through
//! [`CanonicalBytes`] and delivered as a base64 data URI. The image is
//! embedded the same way.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use hue_core::{CanonicalBytes, RegistryError};

/// Prefix of the embedded image.
pub const IMAGE_URI_PREFIX: &str = "data:image/svg+xml;base64,";
/// Prefix of the whole document.
pub const DOCUMENT_URI_PREFIX: &str = "data:application/json;base64,";

/// One `trait_type`/`value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Trait name.
    pub trait_type: String,
    /// Value as shown.
    pub value: String,
}

impl Attribute {
    /// Build a pair.
    pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }

    /// A derived `"true"`/`"false"` flag.
    pub fn flag(trait_type: impl Into<String>, value: bool) -> Self {
        Self::new(trait_type, if value { "true" } else { "false" })
    }
}

/// Rendered state of one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Display name.
    pub name: String,
    /// Fixed description from the render config.
    pub description: String,
    /// `data:image/svg+xml;base64,...`
    pub image: String,
    /// Stored attributes in first-write order, then derived traits.
    pub attributes: Vec<Attribute>,
}

impl Document {
    /// Assemble a document around a raw SVG string.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        svg: &str,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image: format!("{IMAGE_URI_PREFIX}{}", STANDARD.encode(svg)),
            attributes,
        }
    }

    /// Canonical JSON bytes: sorted keys, compact, attribute order kept.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, RegistryError> {
        Ok(CanonicalBytes::new(self)?)
    }

    /// `data:application/json;base64,...` of the canonical bytes.
    pub fn to_data_uri(&self) -> Result<String, RegistryError> {
        let bytes = self.canonical_bytes()?;
        Ok(format!("{DOCUMENT_URI_PREFIX}{}", STANDARD.encode(bytes)))
    }

    /// Decode the embedded SVG.
    pub fn svg(&self) -> Option<String> {
        let encoded = self.image.strip_prefix(IMAGE_URI_PREFIX)?;
        let bytes = STANDARD.decode(encoded).ok()?;
        String::from_utf8(bytes).ok()
    }
}

/// Decode a document data URI back into a [`Document`].
pub fn decode_data_uri(uri: &str) -> Result<Document, RegistryError> {
    let encoded = uri
        .strip_prefix(DOCUMENT_URI_PREFIX)
        .ok_or_else(|| RegistryError::InvalidInput("not a JSON data URI".to_string()))?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| RegistryError::InvalidInput(format!("bad base64: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| RegistryError::InvalidInput(format!("bad document JSON: {e}")))
}
