//! # Issuance Records
//!
//! One [`IssuanceRecord`] per issued identifier, stored densely by sequence
//! id. Records are never removed, and the sequence counter is the table
//! length, so ids form `[0, counter)` with no gaps and no reuse.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use hue_core::{RegistryError, SequenceId, TraitName};

/// Issuance state of one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRecord {
    /// Position in issuance order.
    pub sequence_id: SequenceId,
    /// Canonical key: `#RRGGBB` for colours, the pipe-joined combination for words.
    pub canonical_key: String,
    /// Always true today. Reserved for retraction, which no operation performs.
    pub is_active: bool,
    /// Number of successful renames.
    pub name_change_count: u32,
    /// Traits the owner has opened to the holder of this identifier, in
    /// grant order.
    pub modifiable_trait_whitelist: Vec<TraitName>,
}

impl IssuanceRecord {
    /// Whether `trait_name` is in this identifier's whitelist.
    pub fn whitelists(&self, trait_name: &TraitName) -> bool {
        self.modifiable_trait_whitelist.contains(trait_name)
    }
}

/// Dense record table plus the canonical-key index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordTable {
    records: Vec<IssuanceRecord>,
    by_key: HashMap<String, SequenceId>,
}

impl RecordTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identifiers issued; also the next sequence id.
    pub fn issued_count(&self) -> u64 {
        self.records.len() as u64
    }

    /// Sequence id holding `canonical_key`, if any.
    pub fn lookup(&self, canonical_key: &str) -> Option<SequenceId> {
        self.by_key.get(canonical_key).copied()
    }

    /// Whether an active record holds `canonical_key`.
    pub fn is_claimed(&self, canonical_key: &str) -> bool {
        self.lookup(canonical_key)
            .and_then(|id| self.get(id))
            .is_some_and(|r| r.is_active)
    }

    /// Record for `id`, if issued.
    pub fn get(&self, id: SequenceId) -> Option<&IssuanceRecord> {
        self.records.get(id.index())
    }

    /// Record for `id`, or `NotFound`.
    pub fn require(&self, id: SequenceId) -> Result<&IssuanceRecord, RegistryError> {
        self.get(id).ok_or(RegistryError::NotFound(id.get()))
    }

    pub(crate) fn require_mut(
        &mut self,
        id: SequenceId,
    ) -> Result<&mut IssuanceRecord, RegistryError> {
        self.records
            .get_mut(id.index())
            .ok_or(RegistryError::NotFound(id.get()))
    }

    /// Append a record for `canonical_key` and return its id. Callers have
    /// already checked that the key is unclaimed.
    pub(crate) fn allocate(&mut self, canonical_key: String) -> SequenceId {
        let id = SequenceId(self.issued_count());
        self.by_key.insert(canonical_key.clone(), id);
        self.records.push(IssuanceRecord {
            sequence_id: id,
            canonical_key,
            is_active: true,
            name_change_count: 0,
            modifiable_trait_whitelist: Vec::new(),
        });
        id
    }

    /// Canonical keys for ids in `[start, end)`.
    ///
    /// Fails with `InvalidInput` unless `start < end`, and with
    /// `CapacityExceeded` when `end` is past the issued count.
    pub fn range(&self, start: u64, end: u64) -> Result<Vec<String>, RegistryError> {
        if start >= end {
            return Err(RegistryError::InvalidInput(format!(
                "range start {start} must be below end {end}"
            )));
        }
        if end > self.issued_count() {
            return Err(RegistryError::CapacityExceeded(format!(
                "range end {end} is past the issued count {}",
                self.issued_count()
            )));
        }
        Ok(self.records[start as usize..end as usize]
            .iter()
            .map(|r| r.canonical_key.clone())
            .collect())
    }

    /// All records in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &IssuanceRecord> {
        self.records.iter()
    }
}
