//! # Token Store
//!
//! State shared by every registry kind: the owner, the record table, the
//! attribute store, the trait policy table, suppression, and the event log.
//! [`ColorRegistry`](crate::ColorRegistry) and
//! [`WordRegistry`](crate::WordRegistry) each wrap one and add their own
//! uniqueness rules.
//!
//! Only this module writes attribute entries. The display-name trait is
//! written through crate-private paths used by issuance and rename; the
//! public write paths refuse it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use hue_core::{AccountId, RegistryError, SequenceId, TraitName};

use crate::attributes::{
    validate_value, AttributeEntry, AttributeStore, EntryOrigin, PolicyTable, TraitPolicy,
};
use crate::events::{EventKind, EventLog};
use crate::holder::HolderLedger;
use crate::record::{IssuanceRecord, RecordTable};
use crate::DISPLAY_NAME_TRAIT;

/// State common to colour and word registries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenStore {
    owner: AccountId,
    records: RecordTable,
    attributes: AttributeStore,
    policies: PolicyTable,
    suppressed: BTreeSet<SequenceId>,
    suppression_locked: bool,
    events: EventLog,
}

impl TokenStore {
    /// Create an empty store administered by `owner`.
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            records: RecordTable::new(),
            attributes: AttributeStore::new(),
            policies: PolicyTable::new(),
            suppressed: BTreeSet::new(),
            suppression_locked: false,
            events: EventLog::new(),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The registry owner.
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Fail with `NotOwner` unless `caller` is the owner.
    pub fn require_owner(&self, caller: &AccountId) -> Result<(), RegistryError> {
        if caller != &self.owner {
            return Err(RegistryError::NotOwner(caller.to_string()));
        }
        Ok(())
    }

    /// The record table.
    pub fn records(&self) -> &RecordTable {
        &self.records
    }

    /// Record for `id`, or `NotFound`.
    pub fn record(&self, id: SequenceId) -> Result<&IssuanceRecord, RegistryError> {
        self.records.require(id)
    }

    /// Number of identifiers issued.
    pub fn issued_count(&self) -> u64 {
        self.records.issued_count()
    }

    /// Canonical keys for `[start, end)`.
    pub fn range(&self, start: u64, end: u64) -> Result<Vec<String>, RegistryError> {
        self.records.range(start, end)
    }

    /// The attribute store.
    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    /// Attributes of `id` in first-write order; the display name is first.
    pub fn list_attributes(&self, id: SequenceId) -> Result<&[AttributeEntry], RegistryError> {
        self.record(id)?;
        Ok(self.attributes.list(id))
    }

    /// Current display name of `id`.
    pub fn display_name(&self, id: SequenceId) -> Option<&str> {
        self.attributes.value(id, DISPLAY_NAME_TRAIT)
    }

    /// The trait policy table.
    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Whether `id` is administratively suppressed.
    pub fn is_suppressed(&self, id: SequenceId) -> bool {
        self.suppressed.contains(&id)
    }

    /// Whether suppression has been permanently locked.
    pub fn is_suppression_locked(&self) -> bool {
        self.suppression_locked
    }

    /// The event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    // ── Holder writes ────────────────────────────────────────────────

    /// Policy-checked write by the current holder.
    ///
    /// Checks, in order: identifier exists, trait is not the display-name
    /// trait, caller holds the identifier, value is well-formed, policy
    /// permits the trait for this identifier.
    pub fn set_attribute(
        &mut self,
        ledger: &dyn HolderLedger,
        caller: &AccountId,
        id: SequenceId,
        trait_name: &str,
        value: &str,
    ) -> Result<(), RegistryError> {
        let record = self.record(id)?;
        let trait_name = writable_trait(trait_name)?;
        if !ledger.is_holder(id, caller) {
            return Err(RegistryError::NotHolder {
                sequence_id: id.get(),
                caller: caller.to_string(),
            });
        }
        validate_value(value)?;
        if !self.policies.permits(record, &trait_name) {
            return Err(RegistryError::PolicyDenied {
                sequence_id: id.get(),
                trait_name: trait_name.to_string(),
            });
        }
        self.commit_attribute(id, trait_name, value, EntryOrigin::Holder);
        Ok(())
    }

    /// Parallel-array variant of [`set_attribute`](Self::set_attribute).
    ///
    /// Array lengths are checked up front. After that each pair is its own
    /// transaction: a failure at pair `n` leaves pairs `0..n` written.
    pub fn set_attributes(
        &mut self,
        ledger: &dyn HolderLedger,
        caller: &AccountId,
        id: SequenceId,
        trait_names: &[String],
        values: &[String],
    ) -> Result<(), RegistryError> {
        if trait_names.len() != values.len() {
            return Err(RegistryError::InvalidInput(format!(
                "{} trait names but {} values",
                trait_names.len(),
                values.len()
            )));
        }
        for (trait_name, value) in trait_names.iter().zip(values) {
            self.set_attribute(ledger, caller, id, trait_name, value)?;
        }
        Ok(())
    }

    // ── Owner writes ─────────────────────────────────────────────────

    /// Owner write that bypasses trait policy. The display-name trait is
    /// still refused.
    pub fn admin_set_attribute(
        &mut self,
        caller: &AccountId,
        id: SequenceId,
        trait_name: &str,
        value: &str,
    ) -> Result<(), RegistryError> {
        self.record(id)?;
        let trait_name = writable_trait(trait_name)?;
        self.require_owner(caller)?;
        validate_value(value)?;
        self.commit_attribute(id, trait_name, value, EntryOrigin::Admin);
        Ok(())
    }

    /// Upsert the global policy for a trait. Applies to later writes only.
    pub fn set_policy(
        &mut self,
        caller: &AccountId,
        trait_name: &str,
        user_modifiable: bool,
        enabled_for_all: bool,
    ) -> Result<(), RegistryError> {
        let trait_name = writable_trait(trait_name)?;
        self.require_owner(caller)?;
        self.policies.upsert(TraitPolicy {
            trait_name: trait_name.clone(),
            user_modifiable,
            enabled_for_all_identifiers: enabled_for_all,
        });
        self.events.push(
            None,
            EventKind::PolicySet {
                trait_name,
                user_modifiable,
                enabled_for_all,
            },
        );
        Ok(())
    }

    /// Add a trait to `id`'s whitelist. Granting twice is a no-op.
    pub fn grant_trait(
        &mut self,
        caller: &AccountId,
        id: SequenceId,
        trait_name: &str,
    ) -> Result<(), RegistryError> {
        let trait_name = writable_trait(trait_name)?;
        self.require_owner(caller)?;
        let record = self.records.require_mut(id)?;
        if !record.whitelists(&trait_name) {
            record.modifiable_trait_whitelist.push(trait_name.clone());
            self.events
                .push(Some(id), EventKind::TraitGranted { trait_name });
        }
        Ok(())
    }

    /// Remove a trait from `id`'s whitelist. Stored values are untouched.
    pub fn revoke_trait(
        &mut self,
        caller: &AccountId,
        id: SequenceId,
        trait_name: &str,
    ) -> Result<(), RegistryError> {
        let trait_name = TraitName::new(trait_name)?;
        self.require_owner(caller)?;
        let record = self.records.require_mut(id)?;
        if record.whitelists(&trait_name) {
            record.modifiable_trait_whitelist.retain(|t| t != &trait_name);
            self.events
                .push(Some(id), EventKind::TraitRevoked { trait_name });
        }
        Ok(())
    }

    /// Suppress `id`. Fails with `Locked` once suppression is locked.
    pub fn suppress(&mut self, caller: &AccountId, id: SequenceId) -> Result<(), RegistryError> {
        self.require_suppression_change(caller, id)?;
        if self.suppressed.insert(id) {
            self.events.push(Some(id), EventKind::Suppressed);
        }
        Ok(())
    }

    /// Lift suppression of `id`. Fails with `Locked` once suppression is locked.
    pub fn unsuppress(&mut self, caller: &AccountId, id: SequenceId) -> Result<(), RegistryError> {
        self.require_suppression_change(caller, id)?;
        if self.suppressed.remove(&id) {
            self.events.push(Some(id), EventKind::Unsuppressed);
        }
        Ok(())
    }

    /// Permanently freeze the suppressed set. Irreversible.
    pub fn lock_suppression(&mut self, caller: &AccountId) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        if self.suppression_locked {
            return Err(RegistryError::Locked(
                "suppression is already locked".to_string(),
            ));
        }
        self.suppression_locked = true;
        self.events.push(None, EventKind::SuppressionLocked);
        Ok(())
    }

    fn require_suppression_change(
        &self,
        caller: &AccountId,
        id: SequenceId,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        if self.suppression_locked {
            return Err(RegistryError::Locked("suppression is locked".to_string()));
        }
        self.record(id)?;
        Ok(())
    }

    // ── Crate-private paths ──────────────────────────────────────────

    /// Allocate a record and store its initial display name.
    pub(crate) fn issue_record(&mut self, canonical_key: String, display_name: &str) -> SequenceId {
        let id = self.records.allocate(canonical_key.clone());
        self.attributes.write(
            id,
            TraitName::display_name(),
            display_name.to_string(),
            EntryOrigin::Issuer,
        );
        self.events
            .push(Some(id), EventKind::Issued { key: canonical_key });
        id
    }

    /// Overwrite the display name and count the rename.
    pub(crate) fn rename_record(
        &mut self,
        id: SequenceId,
        new_name: &str,
        by: &AccountId,
        origin: EntryOrigin,
    ) -> Result<(), RegistryError> {
        let from = self.display_name(id).unwrap_or_default().to_string();
        let record = self.records.require_mut(id)?;
        record.name_change_count = record.name_change_count.saturating_add(1);
        self.attributes
            .write(id, TraitName::display_name(), new_name.to_string(), origin);
        self.events.push(
            Some(id),
            EventKind::Renamed {
                from,
                to: new_name.to_string(),
                by: by.clone(),
            },
        );
        Ok(())
    }

    fn commit_attribute(
        &mut self,
        id: SequenceId,
        trait_name: TraitName,
        value: &str,
        origin: EntryOrigin,
    ) {
        self.attributes
            .write(id, trait_name.clone(), value.to_string(), origin);
        self.events.push(
            Some(id),
            EventKind::AttributeSet {
                trait_name,
                value: value.to_string(),
            },
        );
    }
}

/// Parse a trait name for a write, refusing the display-name trait.
fn writable_trait(raw: &str) -> Result<TraitName, RegistryError> {
    let trait_name = TraitName::new(raw)?;
    if trait_name.is_display_name() {
        return Err(RegistryError::ReservedTraitName(raw.to_string()));
    }
    Ok(trait_name)
}
