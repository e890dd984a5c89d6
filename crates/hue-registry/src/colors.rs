//! # Colour Registry
//!
//! Issues `#RRGGBB` identifiers and keeps display names unique across all
//! of them. Issuance is split into [`ColorRegistry::prepare`], a read-only
//! check that returns a [`PendingColor`], and [`ColorRegistry::commit`],
//! which cannot fail. Callers with their own preconditions (payment,
//! quotas) run them between the two steps.
//!
//! Precondition order for a single issuance:
//!
//! 1. key and name are well-formed (`InvalidInput`)
//! 2. a hex-shaped name spells this key (`ReservedNameMismatch`)
//! 3. the key is unclaimed (`AlreadyClaimed`)
//! 4. the canonical name is unreserved (`NameTaken`)

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use hue_core::validate::derived_key;
use hue_core::{names_match_key, AccountId, ColorKey, DisplayName, RegistryError, SequenceId};

use crate::attributes::EntryOrigin;
use crate::holder::HolderLedger;
use crate::reservation::NameReservations;
use crate::store::TokenStore;

/// A colour issuance that passed every registry check.
///
/// Only valid against the state it was prepared on; commit it before the
/// next mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingColor {
    key: ColorKey,
    name: DisplayName,
}

impl PendingColor {
    /// Canonical key to be issued.
    pub fn key(&self) -> &ColorKey {
        &self.key
    }

    /// Display name to be reserved.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }
}

/// Colour identifiers plus the display-name reservation set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorRegistry {
    store: TokenStore,
    names: NameReservations,
}

impl ColorRegistry {
    /// Empty registry administered by `owner`.
    pub fn new(owner: AccountId) -> Self {
        Self {
            store: TokenStore::new(owner),
            names: NameReservations::new(),
        }
    }

    /// Shared registry state.
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Shared registry state, for attribute and policy writes.
    pub fn store_mut(&mut self) -> &mut TokenStore {
        &mut self.store
    }

    /// Display-name reservations.
    pub fn names(&self) -> &NameReservations {
        &self.names
    }

    // ── Issuance ─────────────────────────────────────────────────────

    /// Check one issuance against current state without changing it.
    ///
    /// A missing name defaults to the key's own hex digits.
    pub fn prepare(
        &self,
        raw_key: &str,
        raw_name: Option<&str>,
    ) -> Result<PendingColor, RegistryError> {
        let key = ColorKey::parse(raw_key)?;
        let name = match raw_name {
            Some(raw) => DisplayName::new(raw)?,
            None => key.natural_name(),
        };
        if self.store.records().is_claimed(key.as_str()) {
            return Err(RegistryError::AlreadyClaimed {
                key: key.to_string(),
            });
        }
        if self.names.is_reserved(&name.canonical()) {
            return Err(RegistryError::NameTaken {
                name: name.canonical(),
            });
        }
        check_name_matches(&key, &name)?;
        Ok(PendingColor { key, name })
    }

    /// Check a batch. Besides each item's own checks, no two items may
    /// share a key or a canonical name.
    pub fn prepare_many(
        &self,
        items: &[(String, Option<String>)],
    ) -> Result<Vec<PendingColor>, RegistryError> {
        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        let mut pending = Vec::with_capacity(items.len());
        for (raw_key, raw_name) in items {
            let item = self.prepare(raw_key, raw_name.as_deref())?;
            if !keys.insert(item.key.to_string()) {
                return Err(RegistryError::AlreadyClaimed {
                    key: item.key.to_string(),
                });
            }
            if !names.insert(item.name.canonical()) {
                return Err(RegistryError::NameTaken {
                    name: item.name.canonical(),
                });
            }
            pending.push(item);
        }
        Ok(pending)
    }

    /// Commit a prepared issuance: allocate the id, create the record,
    /// reserve the name, store the display-name attribute.
    pub fn commit(&mut self, pending: PendingColor) -> SequenceId {
        let PendingColor { key, name } = pending;
        let id = self.store.issue_record(key.to_string(), name.as_str());
        self.names.claim(name.canonical(), id);
        id
    }

    /// Prepare and commit in one step.
    pub fn issue(
        &mut self,
        raw_key: &str,
        raw_name: Option<&str>,
    ) -> Result<SequenceId, RegistryError> {
        let pending = self.prepare(raw_key, raw_name)?;
        Ok(self.commit(pending))
    }

    // ── Renames ──────────────────────────────────────────────────────

    /// Rename `id` on behalf of its current holder.
    ///
    /// Taking back the identifier's own current name (in any spelling) is
    /// allowed and still counts as a rename.
    pub fn rename(
        &mut self,
        ledger: &dyn HolderLedger,
        caller: &AccountId,
        id: SequenceId,
        new_name: &str,
    ) -> Result<(), RegistryError> {
        self.store.record(id)?;
        if !ledger.is_holder(id, caller) {
            return Err(RegistryError::NotHolder {
                sequence_id: id.get(),
                caller: caller.to_string(),
            });
        }
        self.apply_rename(caller, id, new_name, EntryOrigin::Holder)
    }

    /// Rename several identifiers in order. Stops at the first failure;
    /// earlier renames stay committed.
    pub fn rename_batch(
        &mut self,
        ledger: &dyn HolderLedger,
        caller: &AccountId,
        items: &[(SequenceId, String)],
    ) -> Result<(), RegistryError> {
        for (id, name) in items {
            self.rename(ledger, caller, *id, name)?;
        }
        Ok(())
    }

    /// Owner rename under the same validation and reservation rules.
    pub fn override_display_name(
        &mut self,
        caller: &AccountId,
        id: SequenceId,
        new_name: &str,
    ) -> Result<(), RegistryError> {
        self.store.record(id)?;
        self.store.require_owner(caller)?;
        self.apply_rename(caller, id, new_name, EntryOrigin::Admin)
    }

    fn apply_rename(
        &mut self,
        caller: &AccountId,
        id: SequenceId,
        new_name: &str,
        origin: EntryOrigin,
    ) -> Result<(), RegistryError> {
        let key = self.key_of(id)?;
        let name = DisplayName::new(new_name)?;
        let name_key = name.canonical();
        if !self.names.is_available_for(&name_key, id) {
            return Err(RegistryError::NameTaken { name: name_key });
        }
        check_name_matches(&key, &name)?;

        if let Some(old) = self.store.display_name(id) {
            let old_key = hue_core::canonicalize_name(old);
            self.names.release(&old_key, id);
        }
        self.names.claim(name_key, id);
        self.store.rename_record(id, name.as_str(), caller, origin)
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Canonical key of `id`.
    pub fn key_of(&self, id: SequenceId) -> Result<ColorKey, RegistryError> {
        ColorKey::parse(&self.store.record(id)?.canonical_key)
    }

    /// Sequence id issued under `raw_key`, if any.
    pub fn lookup(&self, raw_key: &str) -> Option<SequenceId> {
        let key = ColorKey::parse(raw_key).ok()?;
        self.store.records().lookup(key.as_str())
    }

    /// Current display name of the colour issued under `raw_key`.
    pub fn display_name_of_key(&self, raw_key: &str) -> Option<String> {
        let id = self.lookup(raw_key)?;
        self.store.display_name(id).map(str::to_string)
    }
}

fn check_name_matches(key: &ColorKey, name: &DisplayName) -> Result<(), RegistryError> {
    if names_match_key(key.as_str(), name.as_str()) {
        return Ok(());
    }
    Err(RegistryError::ReservedNameMismatch {
        key: key.to_string(),
        name: name.to_string(),
        derived: derived_key(name.as_str()).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Ledger(HashMap<SequenceId, AccountId>);

    impl HolderLedger for Ledger {
        fn holder_of(&self, id: SequenceId) -> Option<AccountId> {
            self.0.get(&id).cloned()
        }

        fn assign(&mut self, id: SequenceId, holder: AccountId) {
            self.0.insert(id, holder);
        }

        fn transfer(&mut self, id: SequenceId, to: AccountId) -> Result<(), RegistryError> {
            self.0.insert(id, to);
            Ok(())
        }
    }

    fn acct(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    fn registry() -> ColorRegistry {
        ColorRegistry::new(acct("owner"))
    }

    #[test]
    fn natural_name_matches_own_key() {
        let mut reg = registry();
        let id = reg.issue("#FF00AA", Some("ff00aa")).unwrap();
        assert_eq!(reg.store().display_name(id), Some("ff00aa"));

        let err = reg.issue("#00FF00", Some("ff00ab")).unwrap_err();
        assert!(matches!(err, RegistryError::ReservedNameMismatch { .. }));
    }

    #[test]
    fn hex_shaped_name_of_another_key_is_refused() {
        let mut reg = registry();
        let err = reg.issue("#FF00AA", Some("ff00ab")).unwrap_err();
        match err {
            RegistryError::ReservedNameMismatch { key, derived, .. } => {
                assert_eq!(key, "#FF00AA");
                assert_eq!(derived, "#FF00AB");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(reg.store().issued_count(), 0);
    }

    #[test]
    fn missing_name_defaults_to_hex_digits() {
        let mut reg = registry();
        let id = reg.issue("#ff00aa", None).unwrap();
        assert_eq!(reg.store().display_name(id), Some("FF00AA"));
        assert!(reg.names().is_reserved("ff00aa"));
    }

    #[test]
    fn key_spellings_collide() {
        let mut reg = registry();
        reg.issue("#ff00aa", Some("Crimson")).unwrap();
        assert!(matches!(
            reg.issue("#FF00AA", Some("Scarlet")),
            Err(RegistryError::AlreadyClaimed { .. })
        ));
    }

    #[test]
    fn name_spellings_collide() {
        let mut reg = registry();
        reg.issue("#FF0000", Some("Crimson")).unwrap();
        assert!(matches!(
            reg.issue("#00FF00", Some("CRIMSON")),
            Err(RegistryError::NameTaken { .. })
        ));
        assert_eq!(reg.store().issued_count(), 1);
    }

    #[test]
    fn malformed_input_is_rejected_first() {
        let reg = registry();
        assert!(matches!(
            reg.prepare("FF00AA", None),
            Err(RegistryError::InvalidInput(_))
        ));
        assert!(matches!(
            reg.prepare("#FF00AA", Some("has space")),
            Err(RegistryError::InvalidInput(_))
        ));
    }

    #[test]
    fn batch_refuses_intra_batch_duplicates() {
        let reg = registry();
        let dup_key = vec![
            ("#000001".to_string(), Some("One".to_string())),
            ("#000001".to_string(), Some("Two".to_string())),
        ];
        assert!(matches!(
            reg.prepare_many(&dup_key),
            Err(RegistryError::AlreadyClaimed { .. })
        ));
        let dup_name = vec![
            ("#000001".to_string(), Some("One".to_string())),
            ("#000002".to_string(), Some("one".to_string())),
        ];
        assert!(matches!(
            reg.prepare_many(&dup_name),
            Err(RegistryError::NameTaken { .. })
        ));
    }

    #[test]
    fn rename_moves_the_reservation() {
        let mut reg = registry();
        let mut ledger = Ledger::default();
        let alice = acct("alice");
        let a = reg.issue("#FF0000", Some("Crimson")).unwrap();
        let b = reg.issue("#00FF00", Some("Lime")).unwrap();
        ledger.assign(a, alice.clone());
        ledger.assign(b, alice.clone());

        assert!(matches!(
            reg.rename(&ledger, &alice, a, "lime"),
            Err(RegistryError::NameTaken { .. })
        ));

        reg.rename(&ledger, &alice, a, "Scarlet").unwrap();
        assert!(!reg.names().is_reserved("crimson"));
        assert_eq!(reg.names().holder("scarlet"), Some(a));
        assert_eq!(reg.store().record(a).unwrap().name_change_count, 1);

        reg.rename(&ledger, &alice, b, "Crimson").unwrap();
        assert_eq!(reg.names().holder("crimson"), Some(b));
    }

    #[test]
    fn rename_to_own_name_in_other_case() {
        let mut reg = registry();
        let mut ledger = Ledger::default();
        let alice = acct("alice");
        let a = reg.issue("#FF0000", Some("crimson")).unwrap();
        ledger.assign(a, alice.clone());
        reg.rename(&ledger, &alice, a, "Crimson").unwrap();
        assert_eq!(reg.store().display_name(a), Some("Crimson"));
        assert_eq!(reg.names().holder("crimson"), Some(a));
        assert_eq!(reg.names().len(), 1);
    }

    #[test]
    fn rename_requires_holder() {
        let mut reg = registry();
        let mut ledger = Ledger::default();
        let a = reg.issue("#FF0000", None).unwrap();
        ledger.assign(a, acct("alice"));
        assert!(matches!(
            reg.rename(&ledger, &acct("bob"), a, "Stolen"),
            Err(RegistryError::NotHolder { .. })
        ));
        assert!(matches!(
            reg.rename(&ledger, &acct("alice"), a, "00ff00"),
            Err(RegistryError::ReservedNameMismatch { .. })
        ));
    }

    #[test]
    fn batch_rename_keeps_earlier_items() {
        let mut reg = registry();
        let mut ledger = Ledger::default();
        let alice = acct("alice");
        let a = reg.issue("#FF0000", None).unwrap();
        let b = reg.issue("#00FF00", None).unwrap();
        ledger.assign(a, alice.clone());
        ledger.assign(b, acct("bob"));

        let err = reg
            .rename_batch(
                &ledger,
                &alice,
                &[(a, "Crimson".to_string()), (b, "Lime".to_string())],
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotHolder { .. }));
        assert_eq!(reg.store().display_name(a), Some("Crimson"));
        assert_eq!(reg.store().display_name(b), Some("00FF00"));
    }

    #[test]
    fn owner_override() {
        let mut reg = registry();
        let a = reg.issue("#FF0000", None).unwrap();
        assert!(matches!(
            reg.override_display_name(&acct("alice"), a, "Red"),
            Err(RegistryError::NotOwner(_))
        ));
        reg.override_display_name(&acct("owner"), a, "Red").unwrap();
        let entry = reg.store().attributes().get(a, "Name").unwrap();
        assert_eq!(entry.value, "Red");
        assert_eq!(entry.origin, EntryOrigin::Admin);
    }

    #[test]
    fn lookups_use_canonical_key() {
        let mut reg = registry();
        reg.issue("#FF00AA", Some("Magenta")).unwrap();
        assert_eq!(reg.display_name_of_key("#ff00aa"), Some("Magenta".into()));
        assert_eq!(reg.display_name_of_key("#000000"), None);
        assert_eq!(reg.display_name_of_key("garbage"), None);
        assert_eq!(reg.key_of(SequenceId(0)).unwrap().as_str(), "#FF00AA");
    }
}
