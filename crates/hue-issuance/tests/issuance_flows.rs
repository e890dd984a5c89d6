//! End-to-end issuance flows through the services.

use std::io::Write as _;

use hue_core::{AccountId, RegistryError, SequenceId};
use hue_issuance::{
    ColorMint, ColorService, IssuanceConfig, Registries, RegistrySettings, Settlement,
    WordService,
};
use hue_registry::Outcome;
use hue_render::{decode_data_uri, RenderConfig};

fn acct(s: &str) -> AccountId {
    AccountId::new(s).unwrap()
}

fn open(price: u64) -> RegistrySettings {
    RegistrySettings {
        unit_price: price,
        price_step: 1,
        issuance_enabled: true,
        ..RegistrySettings::default()
    }
}

fn colors(price: u64) -> ColorService {
    ColorService::new(&open(price), RenderConfig::default()).unwrap()
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|w| w.to_string()).collect()
}

fn attr<'a>(doc: &'a hue_render::Document, trait_type: &str) -> Option<&'a str> {
    doc.attributes
        .iter()
        .find(|a| a.trait_type == trait_type)
        .map(|a| a.value.as_str())
}

#[test]
fn payment_must_equal_price_times_quantity() {
    let svc = colors(100);
    let alice = acct("alice");
    let items = vec![
        ColorMint::unnamed("#ff0000"),
        ColorMint::named("#00FF00", "Leaf"),
        ColorMint::unnamed("#0000FF"),
    ];

    assert!(matches!(
        svc.mint(&alice, &items, &alice, 250),
        Err(RegistryError::PaymentMismatch {
            expected: 300,
            actual: 250
        })
    ));
    assert_eq!(svc.issued_count(), 0);
    assert_eq!(svc.balance(), 0);

    let ids = svc.mint(&alice, &items, &alice, 300).unwrap();
    assert_eq!(ids, vec![SequenceId(0), SequenceId(1), SequenceId(2)]);
    assert_eq!(svc.balance(), 300);
    assert_eq!(svc.holder_of(SequenceId(1)), Some(alice.clone()));
    assert_eq!(svc.display_name(SequenceId(0)).unwrap(), "FF0000");
    assert_eq!(svc.display_name(SequenceId(1)).unwrap(), "Leaf");
    assert_eq!(
        svc.range(0, 3).unwrap(),
        vec!["#FF0000", "#00FF00", "#0000FF"]
    );
}

#[test]
fn disabled_issuance_rejects_before_validation() {
    let svc = ColorService::new(&RegistrySettings::default(), RenderConfig::default()).unwrap();
    let alice = acct("alice");
    assert!(matches!(
        svc.mint(&alice, &[ColorMint::unnamed("not a key")], &alice, 0),
        Err(RegistryError::IssuanceDisabled)
    ));

    assert!(matches!(
        svc.set_issuance_enabled(&alice, true),
        Err(RegistryError::NotOwner(_))
    ));
    svc.set_issuance_enabled(&acct("owner"), true).unwrap();
    svc.mint(&alice, &[ColorMint::unnamed("#123456")], &alice, 0)
        .unwrap();
}

#[test]
fn empty_and_duplicate_batches_are_rejected_whole() {
    let svc = colors(0);
    let alice = acct("alice");
    assert!(matches!(
        svc.mint(&alice, &[], &alice, 0),
        Err(RegistryError::InvalidInput(_))
    ));
    let dup = vec![ColorMint::unnamed("#ABCDEF"), ColorMint::unnamed("#abcdef")];
    assert!(matches!(
        svc.mint(&alice, &dup, &alice, 0),
        Err(RegistryError::AlreadyClaimed { .. })
    ));
    assert_eq!(svc.issued_count(), 0);
}

#[test]
fn per_holder_quota_counts_mints_to_recipient() {
    let settings = RegistrySettings {
        max_per_holder: Some(2),
        ..open(0)
    };
    let svc = ColorService::new(&settings, RenderConfig::default()).unwrap();
    let alice = acct("alice");
    let bob = acct("bob");
    svc.mint(&alice, &[ColorMint::unnamed("#000001")], &alice, 0)
        .unwrap();
    svc.notify_transfer(SequenceId(0), &alice, bob.clone())
        .unwrap();
    svc.mint(&alice, &[ColorMint::unnamed("#000002")], &alice, 0)
        .unwrap();
    assert!(matches!(
        svc.mint(&alice, &[ColorMint::unnamed("#000003")], &alice, 0),
        Err(RegistryError::CapacityExceeded(_))
    ));
    svc.mint(&alice, &[ColorMint::unnamed("#000003")], &bob, 0)
        .unwrap();
}

#[test]
fn hat_policy_scenario() {
    let svc = colors(0);
    let owner = acct("owner");
    let alice = acct("alice");
    svc.mint(&alice, &[ColorMint::unnamed("#112233")], &alice, 0)
        .unwrap();
    let id = SequenceId(0);

    assert!(matches!(
        svc.set_attribute(&alice, id, "Hat", "Red"),
        Err(RegistryError::PolicyDenied { .. })
    ));
    svc.set_policy(&owner, "Hat", true, false).unwrap();
    assert!(matches!(
        svc.set_attribute(&alice, id, "Hat", "Red"),
        Err(RegistryError::PolicyDenied { .. })
    ));
    svc.grant_trait(&owner, id, "Hat").unwrap();
    svc.set_attribute(&alice, id, "Hat", "Red").unwrap();

    assert!(matches!(
        svc.set_attribute(&acct("mallory"), id, "Hat", "Blue"),
        Err(RegistryError::NotHolder { .. })
    ));
    assert!(matches!(
        svc.set_attribute(&alice, id, "Name", "Other"),
        Err(RegistryError::ReservedTraitName(_))
    ));

    let traits: Vec<String> = svc
        .list_attributes(id)
        .unwrap()
        .iter()
        .map(|e| e.trait_name.to_string())
        .collect();
    assert_eq!(traits, vec!["Name", "Hat"]);
}

#[test]
fn batch_attributes_stop_at_first_failure() {
    let svc = colors(0);
    let owner = acct("owner");
    let alice = acct("alice");
    svc.mint(&alice, &[ColorMint::unnamed("#445566")], &alice, 0)
        .unwrap();
    svc.set_policy(&owner, "Hat", true, true).unwrap();
    let id = SequenceId(0);

    assert!(matches!(
        svc.set_attributes(&alice, id, &words(&["Hat"]), &words(&["Red", "Blue"])),
        Err(RegistryError::InvalidInput(_))
    ));
    assert!(matches!(
        svc.set_attributes(&alice, id, &words(&["Hat", "Shoes"]), &words(&["Red", "Blue"])),
        Err(RegistryError::PolicyDenied { .. })
    ));
    assert_eq!(svc.list_attributes(id).unwrap().len(), 2);
}

#[test]
fn renames_release_the_old_name() {
    let svc = colors(0);
    let alice = acct("alice");
    let items = vec![
        ColorMint::named("#010101", "Dusk"),
        ColorMint::named("#020202", "Dawn"),
    ];
    svc.mint(&alice, &items, &alice, 0).unwrap();

    assert!(matches!(
        svc.rename(&alice, SequenceId(1), "DUSK"),
        Err(RegistryError::NameTaken { .. })
    ));
    svc.rename(&alice, SequenceId(0), "Evening").unwrap();
    svc.rename(&alice, SequenceId(1), "dusk").unwrap();
    assert_eq!(svc.display_name(SequenceId(1)).unwrap(), "dusk");

    assert!(matches!(
        svc.rename(&alice, SequenceId(0), "ABCDEF"),
        Err(RegistryError::ReservedNameMismatch { .. })
    ));
    assert!(matches!(
        svc.rename(&acct("bob"), SequenceId(0), "Night"),
        Err(RegistryError::NotHolder { .. })
    ));
}

#[test]
fn batch_rename_keeps_earlier_renames() {
    let svc = colors(0);
    let alice = acct("alice");
    svc.mint(
        &alice,
        &[ColorMint::unnamed("#0A0A0A"), ColorMint::unnamed("#0B0B0B")],
        &alice,
        0,
    )
    .unwrap();
    let err = svc
        .rename_batch(
            &alice,
            &[
                (SequenceId(0), "Slate".to_string()),
                (SequenceId(1), "slate".to_string()),
            ],
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::NameTaken { .. }));
    assert_eq!(svc.display_name(SequenceId(0)).unwrap(), "Slate");
    assert_eq!(svc.display_name(SequenceId(1)).unwrap(), "0B0B0B");
}

#[test]
fn owner_override_needs_permission() {
    let svc = colors(0);
    let owner = acct("owner");
    let alice = acct("alice");
    svc.mint(&alice, &[ColorMint::unnamed("#0C0C0C")], &alice, 0)
        .unwrap();

    assert!(matches!(
        svc.override_display_name(&owner, SequenceId(0), "Coal"),
        Err(RegistryError::Locked(_))
    ));
    svc.set_name_overrides_allowed(&owner, true).unwrap();
    assert!(matches!(
        svc.override_display_name(&alice, SequenceId(0), "Coal"),
        Err(RegistryError::NotOwner(_))
    ));
    svc.override_display_name(&owner, SequenceId(0), "Coal")
        .unwrap();
    assert_eq!(svc.display_name(SequenceId(0)).unwrap(), "Coal");
}

#[test]
fn suppression_and_lock() {
    let svc = colors(0);
    let owner = acct("owner");
    let alice = acct("alice");
    svc.mint(&alice, &[ColorMint::unnamed("#0D0D0D")], &alice, 0)
        .unwrap();
    let id = SequenceId(0);

    svc.suppress(&owner, id).unwrap();
    let doc = svc.render(id).unwrap();
    assert_eq!(doc.name, "Blocked");
    assert_eq!(doc.attributes.len(), 1);
    assert_eq!(attr(&doc, "Blocked"), Some("true"));

    svc.lock_suppression(&owner).unwrap();
    assert!(matches!(
        svc.unsuppress(&owner, id),
        Err(RegistryError::Locked(_))
    ));
    assert!(matches!(
        svc.lock_suppression(&owner),
        Err(RegistryError::Locked(_))
    ));
    assert!(svc.is_suppressed(id));
}

#[test]
fn transfer_moves_write_rights() {
    let svc = colors(0);
    let owner = acct("owner");
    let alice = acct("alice");
    let bob = acct("bob");
    svc.mint(&alice, &[ColorMint::unnamed("#0E0E0E")], &alice, 0)
        .unwrap();
    svc.set_policy(&owner, "Hat", true, true).unwrap();

    assert!(matches!(
        svc.notify_transfer(SequenceId(9), &alice, bob.clone()),
        Err(RegistryError::NotFound(9))
    ));
    assert!(matches!(
        svc.notify_transfer(SequenceId(0), &bob, bob.clone()),
        Err(RegistryError::NotHolder { .. })
    ));
    svc.notify_transfer(SequenceId(0), &alice, bob.clone())
        .unwrap();

    assert!(matches!(
        svc.set_attribute(&alice, SequenceId(0), "Hat", "Red"),
        Err(RegistryError::NotHolder { .. })
    ));
    svc.set_attribute(&bob, SequenceId(0), "Hat", "Red")
        .unwrap();
}

#[test]
fn staked_custody_shows_in_document() {
    let svc = colors(0);
    let owner = acct("owner");
    let alice = acct("alice");
    let vault = acct("vault");
    svc.mint(&alice, &[ColorMint::unnamed("#0F0F0F")], &alice, 0)
        .unwrap();
    assert_eq!(attr(&svc.render(SequenceId(0)).unwrap(), "Staked"), Some("false"));

    svc.set_staked_custody(&owner, Some(vault.clone())).unwrap();
    svc.notify_transfer(SequenceId(0), &alice, vault).unwrap();
    assert_eq!(attr(&svc.render(SequenceId(0)).unwrap(), "Staked"), Some("true"));
}

#[test]
fn document_uri_decodes_to_render() {
    let svc = colors(0);
    let alice = acct("alice");
    svc.mint(&alice, &[ColorMint::named("#FF8800", "Amber")], &alice, 0)
        .unwrap();
    let uri = svc.document(SequenceId(0)).unwrap();
    assert_eq!(uri, svc.document(SequenceId(0)).unwrap());
    let doc = decode_data_uri(&uri).unwrap();
    assert_eq!(doc, svc.render(SequenceId(0)).unwrap());
    assert_eq!(doc.name, "Amber");
    assert!(doc.svg().unwrap().contains("#FF8800"));
    assert!(matches!(
        svc.document(SequenceId(1)),
        Err(RegistryError::NotFound(1))
    ));
}

#[test]
fn price_changes_and_withdrawal() {
    let svc = colors(100);
    let owner = acct("owner");
    let alice = acct("alice");
    svc.set_price(&owner, 200).unwrap();
    assert_eq!(svc.unit_price(), 200);
    svc.mint(&alice, &[ColorMint::unnamed("#111111")], &alice, 200)
        .unwrap();

    svc.set_price_changes_allowed(&owner, false).unwrap();
    assert!(matches!(
        svc.set_price(&owner, 300),
        Err(RegistryError::Locked(_))
    ));
    assert!(matches!(
        svc.withdraw(&alice, None),
        Err(RegistryError::NotOwner(_))
    ));
    assert_eq!(svc.withdraw(&owner, None).unwrap(), 200);
    assert_eq!(svc.balance(), 0);
}

struct Refusing;

impl Settlement for Refusing {
    fn settle(&mut self, _payer: &AccountId, _amount: u128) -> Result<(), RegistryError> {
        Err(RegistryError::Settlement("payment rail offline".to_string()))
    }

    fn balance(&self) -> u128 {
        0
    }

    fn withdraw(&mut self, _amount: u128) -> Result<u128, RegistryError> {
        Ok(0)
    }
}

#[test]
fn failed_settlement_consumes_nothing() {
    let svc = WordService::with_settlement(&open(5), RenderConfig::default(), Box::new(Refusing))
        .unwrap();
    let alice = acct("alice");
    let item = vec![words(&["RED", "FOX"])];
    assert!(matches!(
        svc.mint(&alice, &item, &alice, 5),
        Err(RegistryError::Settlement(_))
    ));
    assert_eq!(svc.issued_count(), 0);
    assert!(svc.verify(&words(&["RED", "FOX"])).is_valid());
    assert!(svc.events().is_empty());
}

#[test]
fn word_combinations_are_single_use() {
    let svc = WordService::new(&open(0), RenderConfig::default()).unwrap();
    let alice = acct("alice");
    let ids = svc
        .mint(&alice, &[words(&["BLUE", "MOON", ""]), words(&["SUN"])], &alice, 0)
        .unwrap();
    assert_eq!(ids, vec![SequenceId(0), SequenceId(1)]);
    assert_eq!(svc.display_name(SequenceId(0)).unwrap(), "BLUE MOON");
    assert_eq!(svc.range(0, 2).unwrap(), vec!["BLUE|MOON|", "SUN||"]);

    assert!(matches!(
        svc.verify(&words(&["BLUE", "MOON"])),
        Outcome::CombinationUsed(_)
    ));
    assert!(matches!(
        svc.mint(&alice, &[words(&["BLUE", "MOON"])], &alice, 0),
        Err(RegistryError::CombinationUsed { .. })
    ));
    assert!(matches!(
        svc.verify(&words(&["", "MOON"])),
        Outcome::InvalidLength { slot: 0, len: 0 }
    ));
}

#[test]
fn word_documents_resolve_colour_names_through_peer() {
    let config = IssuanceConfig {
        colors: open(0),
        words: open(0),
        render: RenderConfig::default(),
    };
    let registries = Registries::from_config(&config).unwrap();
    let owner = acct("owner");
    let alice = acct("alice");

    registries
        .colors
        .mint(&alice, &[ColorMint::named("#336699", "Harbor")], &alice, 0)
        .unwrap();
    registries
        .words
        .mint(&alice, &[words(&["SEA", "SALT"])], &alice, 0)
        .unwrap();
    registries.words.set_policy(&owner, "Background", true, true).unwrap();
    registries
        .words
        .set_attribute(&alice, SequenceId(0), "Background", "#336699")
        .unwrap();
    registries
        .words
        .set_policy(&owner, "Foreground", true, true)
        .unwrap();
    registries
        .words
        .set_attribute(&alice, SequenceId(0), "Foreground", "#FEDCBA")
        .unwrap();

    let doc = registries.words.render(SequenceId(0)).unwrap();
    assert_eq!(doc.name, "SEA SALT");
    assert_eq!(attr(&doc, "Background"), Some("Harbor"));
    assert_eq!(attr(&doc, "Foreground"), Some("#FEDCBA"));
    assert_eq!(attr(&doc, "Word Count"), Some("2"));
    assert_eq!(attr(&doc, "Fully Customized"), Some("true"));
    let svg = doc.svg().unwrap();
    assert!(svg.contains("#336699"));
    assert!(svg.contains(">SEA<"));
}

#[test]
fn registries_load_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "colors:\n  unit_price: 10\n  issuance_enabled: true\nwords:\n  max_supply: 1\n  issuance_enabled: true\n"
    )
    .unwrap();
    let config = IssuanceConfig::load(file.path()).unwrap();
    let registries = Registries::from_config(&config).unwrap();
    assert_eq!(registries.colors.unit_price(), 10);

    let alice = acct("alice");
    registries
        .words
        .mint(&alice, &[words(&["ONE"])], &alice, 0)
        .unwrap();
    assert!(matches!(
        registries.words.mint(&alice, &[words(&["TWO"])], &alice, 0),
        Err(RegistryError::CapacityExceeded(_))
    ));
}
