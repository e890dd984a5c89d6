//! # Reservations
//!
//! Two exclusivity sets that sit beside the record table:
//!
//! - [`NameReservations`]: canonical display name → the one identifier that
//!   currently uses it. Released only when that identifier renames away.
//! - [`CombinationSet`]: digests of every word tuple ever issued.
//!   Append-only; a combination is never freed.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use hue_core::{sha256_digest, CanonicalBytes, ContentDigest, SequenceId, WordTuple};

/// Canonical display-name claims.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameReservations {
    claims: HashMap<String, SequenceId>,
}

impl NameReservations {
    /// Create an empty reservation set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier holding `name_key`, if any.
    pub fn holder(&self, name_key: &str) -> Option<SequenceId> {
        self.claims.get(name_key).copied()
    }

    /// Whether `id` may take `name_key`: unclaimed, or already its own.
    pub fn is_available_for(&self, name_key: &str, id: SequenceId) -> bool {
        self.holder(name_key).map_or(true, |holder| holder == id)
    }

    /// Whether anyone holds `name_key`.
    pub fn is_reserved(&self, name_key: &str) -> bool {
        self.claims.contains_key(name_key)
    }

    /// Number of reserved names.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether no name is reserved.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub(crate) fn claim(&mut self, name_key: String, id: SequenceId) {
        self.claims.insert(name_key, id);
    }

    /// Release `name_key` if `id` holds it.
    pub(crate) fn release(&mut self, name_key: &str, id: SequenceId) {
        if self.holder(name_key) == Some(id) {
            self.claims.remove(name_key);
        }
    }
}

/// Append-only set of issued word combinations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombinationSet {
    digests: HashSet<ContentDigest>,
}

impl CombinationSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Digest of a tuple's canonical combination key.
    pub fn digest(tuple: &WordTuple) -> ContentDigest {
        sha256_digest(&CanonicalBytes::from_text(&tuple.combination_key()))
    }

    /// Whether `tuple` was issued before.
    pub fn contains(&self, tuple: &WordTuple) -> bool {
        self.digests.contains(&Self::digest(tuple))
    }

    /// Number of committed combinations.
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    /// Whether nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    pub(crate) fn commit(&mut self, tuple: &WordTuple) {
        self.digests.insert(Self::digest(tuple));
    }
}
