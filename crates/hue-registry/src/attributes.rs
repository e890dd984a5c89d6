//! # Attribute Store and Trait Policy
//!
//! Each identifier owns an ordered list of trait values. Order is
//! first-write order: overwriting a trait keeps its position. Entries are
//! never removed.
//!
//! Whether a holder may write a trait is decided at write time by joining
//! two independent pieces of state:
//!
//! ```text
//! permitted = policy.user_modifiable
//!             && (policy.enabled_for_all_identifiers || record.whitelists(trait))
//! ```
//!
//! The policy table is global and owner-editable; the whitelist lives on the
//! record. Changing either affects only later writes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hue_core::{RegistryError, SequenceId, TraitName};

use crate::record::IssuanceRecord;

/// Longest accepted attribute value, in bytes.
pub const MAX_VALUE_LEN: usize = 256;

/// Who wrote an attribute value last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    /// Written by issuance.
    Issuer,
    /// Written by the holder through a policy-checked write.
    Holder,
    /// Written by the registry owner.
    Admin,
}

/// One trait value of one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntry {
    /// Identifier the value belongs to.
    pub identifier_sequence_id: SequenceId,
    /// Trait name.
    pub trait_name: TraitName,
    /// Current value.
    pub value: String,
    /// Last writer.
    pub origin: EntryOrigin,
}

/// Global rule for one trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitPolicy {
    /// Trait the rule applies to.
    pub trait_name: TraitName,
    /// Whether holders may ever write it.
    pub user_modifiable: bool,
    /// Whether the permission covers every identifier, or only those whose
    /// whitelist names the trait.
    pub enabled_for_all_identifiers: bool,
}

/// Owner-editable policy table. A trait with no entry is admin-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyTable {
    policies: BTreeMap<TraitName, TraitPolicy>,
}

impl PolicyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy for `trait_name`, if one was set.
    pub fn get(&self, trait_name: &TraitName) -> Option<&TraitPolicy> {
        self.policies.get(trait_name)
    }

    /// All policies, ordered by trait name.
    pub fn iter(&self) -> impl Iterator<Item = &TraitPolicy> {
        self.policies.values()
    }

    /// Whether the holder of `record` may write `trait_name` right now.
    pub fn permits(&self, record: &IssuanceRecord, trait_name: &TraitName) -> bool {
        self.get(trait_name).is_some_and(|p| {
            p.user_modifiable && (p.enabled_for_all_identifiers || record.whitelists(trait_name))
        })
    }

    pub(crate) fn upsert(&mut self, policy: TraitPolicy) {
        self.policies.insert(policy.trait_name.clone(), policy);
    }
}

/// Per-identifier ordered trait values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeStore {
    entries: BTreeMap<SequenceId, Vec<AttributeEntry>>,
}

impl AttributeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries for `id` in first-write order.
    pub fn list(&self, id: SequenceId) -> &[AttributeEntry] {
        self.entries.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Current entry for one trait.
    pub fn get(&self, id: SequenceId, trait_name: &str) -> Option<&AttributeEntry> {
        self.list(id)
            .iter()
            .find(|e| e.trait_name.as_str() == trait_name)
    }

    /// Current value of one trait.
    pub fn value(&self, id: SequenceId, trait_name: &str) -> Option<&str> {
        self.get(id, trait_name).map(|e| e.value.as_str())
    }

    /// Insert or overwrite. A new trait is appended; an existing one keeps
    /// its position.
    pub(crate) fn write(
        &mut self,
        id: SequenceId,
        trait_name: TraitName,
        value: String,
        origin: EntryOrigin,
    ) {
        let list = self.entries.entry(id).or_default();
        match list.iter_mut().find(|e| e.trait_name == trait_name) {
            Some(entry) => {
                entry.value = value;
                entry.origin = origin;
            }
            None => list.push(AttributeEntry {
                identifier_sequence_id: id,
                trait_name,
                value,
                origin,
            }),
        }
    }
}

/// Check an attribute value before it is stored.
pub fn validate_value(value: &str) -> Result<(), RegistryError> {
    if value.len() > MAX_VALUE_LEN {
        return Err(RegistryError::InvalidInput(format!(
            "attribute value exceeds {MAX_VALUE_LEN} bytes"
        )));
    }
    if value.chars().any(char::is_control) {
        return Err(RegistryError::InvalidInput(
            "attribute value contains control characters".to_string(),
        ));
    }
    Ok(())
}
