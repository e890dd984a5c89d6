//! # Peer Registry Lookup
//!
//! A registry may show names owned by another registry, such as a word
//! identifier whose background is a colour key. The peer is queried through
//! a typed interface and may be absent or failing; resolution always falls
//! back to the raw key and never returns an error.

use thiserror::Error;

use hue_registry::ColorRegistry;

/// Failure reported by a peer registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeerError {
    /// The peer could not be reached or refused to answer.
    #[error("peer registry unavailable: {0}")]
    Unavailable(String),

    /// The peer rejected the key as malformed.
    #[error("peer registry rejected key {0:?}")]
    InvalidKey(String),
}

/// Read-only name query against another registry.
pub trait PeerRegistry: Send + Sync {
    /// Current display name of the identifier issued under `key`.
    /// `Ok(None)` means the key was never issued.
    fn display_name(&self, key: &str) -> Result<Option<String>, PeerError>;
}

impl PeerRegistry for ColorRegistry {
    fn display_name(&self, key: &str) -> Result<Option<String>, PeerError> {
        if hue_core::ColorKey::parse(key).is_err() {
            return Err(PeerError::InvalidKey(key.to_string()));
        }
        Ok(self.display_name_of_key(key))
    }
}

/// Display name for `key` from `peer`, or `key` itself.
pub fn resolve_display_name(peer: Option<&dyn PeerRegistry>, key: &str) -> String {
    let Some(peer) = peer else {
        return key.to_string();
    };
    match peer.display_name(key) {
        Ok(Some(name)) => name,
        Ok(None) => {
            tracing::debug!(key, "peer has no record; using raw key");
            key.to_string()
        }
        Err(err) => {
            tracing::debug!(key, error = %err, "peer lookup failed; using raw key");
            key.to_string()
        }
    }
}
