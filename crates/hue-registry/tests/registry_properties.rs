//! Registry-level properties checked against fresh state per case.

use std::collections::HashMap;

use hue_core::{AccountId, RegistryError, SequenceId};
use hue_registry::{ColorRegistry, HolderLedger, WordRegistry};
use proptest::prelude::*;

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

proptest! {
    #[test]
    fn second_key_with_same_name_is_name_taken(
        a in 0u32..0x0100_0000,
        b in 0u32..0x0100_0000,
        name in prop_oneof!["[A-Za-z0-9]{1,32}", "[0-9A-Fa-f]{6}"],
    ) {
        // A hex-shaped name is only usable by the key it spells.
        let first = if hue_core::is_valid_key(&format!("#{name}")) {
            format!("#{}", name.to_ascii_uppercase())
        } else {
            format!("#{a:06X}")
        };
        let second = format!("#{b:06X}");
        prop_assume!(first != second);
        let mut reg = ColorRegistry::new(acct("owner"));
        reg.issue(&first, Some(&name)).unwrap();
        let err = reg.issue(&second, Some(&name.to_uppercase())).unwrap_err();
        let is_name_taken = matches!(err, RegistryError::NameTaken { .. });
        prop_assert!(is_name_taken);
        prop_assert_eq!(reg.store().issued_count(), 1);
    }

    #[test]
    fn sequence_ids_stay_contiguous(keys in proptest::collection::vec(0u32..64, 1..40)) {
        let mut reg = ColorRegistry::new(acct("owner"));
        for k in keys {
            let _ = reg.issue(&format!("#{k:06X}"), None);
        }
        let ids: Vec<u64> = reg.store().records().iter().map(|r| r.sequence_id.get()).collect();
        let expected: Vec<u64> = (0..reg.store().issued_count()).collect();
        prop_assert_eq!(ids, expected);
        prop_assert_eq!(reg.names().len() as u64, reg.store().issued_count());
    }
}

#[test]
fn every_reservation_points_at_a_current_display_name() {
    let mut reg = ColorRegistry::new(acct("owner"));
    let mut ledger = Ledger::default();
    let alice = acct("alice");
    for (i, key) in ["#110000", "#220000", "#330000"].iter().enumerate() {
        let id = reg.issue(key, Some(&format!("Shade{i}"))).unwrap();
        ledger.assign(id, alice.clone());
    }
    reg.rename(&ledger, &alice, SequenceId(0), "Ruby").unwrap();
    reg.rename(&ledger, &alice, SequenceId(1), "Shade0").unwrap();
    assert!(reg.rename(&ledger, &alice, SequenceId(2), "ruby").is_err());

    for record in reg.store().records().iter() {
        let name = reg.store().display_name(record.sequence_id).unwrap();
        assert_eq!(
            reg.names().holder(&name.to_ascii_lowercase()),
            Some(record.sequence_id)
        );
    }
    assert_eq!(reg.names().len(), 3);
}

#[test]
fn hat_policy_scenario() {
    let mut reg = ColorRegistry::new(acct("owner"));
    let mut ledger = Ledger::default();
    let owner = acct("owner");
    let holder = acct("alice");
    let id = reg.issue("#FF00AA", None).unwrap();
    ledger.assign(id, holder.clone());

    reg.store_mut().set_policy(&owner, "Hat", true, false).unwrap();
    let denied = reg
        .store_mut()
        .set_attribute(&ledger, &holder, id, "Hat", "red")
        .unwrap_err();
    assert!(matches!(denied, RegistryError::PolicyDenied { .. }));

    reg.store_mut().grant_trait(&owner, id, "Hat").unwrap();
    reg.store_mut()
        .set_attribute(&ledger, &holder, id, "Hat", "red")
        .unwrap();

    let attrs = reg.store().list_attributes(id).unwrap();
    let pairs: Vec<(&str, &str)> = attrs
        .iter()
        .map(|e| (e.trait_name.as_str(), e.value.as_str()))
        .collect();
    assert_eq!(pairs, vec![("Name", "FF00AA"), ("Hat", "red")]);
}

#[test]
fn range_bounds_follow_issued_count() {
    let mut reg = WordRegistry::new(acct("owner"));
    for w in ["ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX"] {
        reg.issue(&[w]).unwrap();
    }
    assert!(matches!(
        reg.store().range(5, 5),
        Err(RegistryError::InvalidInput(_))
    ));
    assert!(matches!(
        reg.store().range(0, 7),
        Err(RegistryError::CapacityExceeded(_))
    ));
    assert_eq!(reg.store().range(4, 6).unwrap(), vec!["FIVE||", "SIX||"]);
}

#[test]
fn registry_state_round_trips_through_json() {
    let mut reg = ColorRegistry::new(acct("owner"));
    reg.issue("#123456", Some("Navy")).unwrap();
    let json = serde_json::to_string(&reg).unwrap();
    let back: ColorRegistry = serde_json::from_str(&json).unwrap();
    assert_eq!(back.display_name_of_key("#123456"), Some("Navy".to_string()));
    assert!(matches!(
        back.prepare("#654321", Some("navy")),
        Err(RegistryError::NameTaken { .. })
    ));
}

#[test]
fn natural_name_of_an_issued_key_is_name_taken() {
    let mut reg = ColorRegistry::new(acct("owner"));
    reg.issue("#ABCDEF", None).unwrap();
    assert!(matches!(
        reg.issue("#123456", Some("ABCDEF")),
        Err(RegistryError::NameTaken { .. })
    ));

    reg.issue("#FF00AA", Some("ff00aa")).unwrap();
    assert!(matches!(
        reg.issue("#000001", Some("ff00aa")),
        Err(RegistryError::NameTaken { .. })
    ));
    assert!(matches!(
        reg.issue("#000001", Some("ff00ab")),
        Err(RegistryError::ReservedNameMismatch { .. })
    ));
    assert_eq!(reg.store().issued_count(), 2);
}

#[test]
fn rename_onto_a_held_hex_name_is_name_taken() {
    let mut reg = ColorRegistry::new(acct("owner"));
    let mut ledger = Ledger::default();
    let alice = acct("alice");
    let first = reg.issue("#ABCDEF", None).unwrap();
    let second = reg.issue("#123456", Some("Ocean")).unwrap();
    ledger.assign(first, alice.clone());
    ledger.assign(second, alice.clone());
    assert!(matches!(
        reg.rename(&ledger, &alice, second, "abcdef"),
        Err(RegistryError::NameTaken { .. })
    ));
    assert!(matches!(
        reg.rename(&ledger, &alice, second, "abcde0"),
        Err(RegistryError::ReservedNameMismatch { .. })
    ));
}
