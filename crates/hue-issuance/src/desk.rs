//! # Issuance Desk
//!
//! Everything about minting that is not registry state: whether minting is
//! open, the price, supply and per-recipient quotas, payment settlement,
//! the holder ledger, and the owner's administrative flags.
//!
//! Mint preconditions are checked in this order, after the registry has
//! validated the items themselves:
//!
//! 1. issuance is enabled (`IssuanceDisabled`)
//! 2. supply and recipient quota have room (`CapacityExceeded`)
//! 3. payment equals price × quantity (`PaymentMismatch`)

use std::collections::HashMap;

use hue_core::{AccountId, RegistryError, SequenceId};
use hue_registry::HolderLedger;

use crate::config::RegistrySettings;
use crate::ledger::InMemoryHolderLedger;
use crate::settlement::{Settlement, Treasury};

/// Minting policy, payments, and holders for one registry.
pub struct IssuanceDesk {
    owner: AccountId,
    unit_price: u64,
    price_step: u64,
    issuance_enabled: bool,
    capacity: u64,
    max_per_holder: Option<u32>,
    staked_custody: Option<AccountId>,
    price_changes_allowed: bool,
    name_overrides_allowed: bool,
    minted_to: HashMap<AccountId, u32>,
    ledger: InMemoryHolderLedger,
    settlement: Box<dyn Settlement>,
}

impl std::fmt::Debug for IssuanceDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuanceDesk")
            .field("owner", &self.owner)
            .field("unit_price", &self.unit_price)
            .field("issuance_enabled", &self.issuance_enabled)
            .field("capacity", &self.capacity)
            .field("balance", &self.settlement.balance())
            .finish_non_exhaustive()
    }
}

impl IssuanceDesk {
    /// Desk from config. `kind_capacity` is the registry's own namespace
    /// size; the configured supply can only lower it.
    pub fn new(settings: &RegistrySettings, kind_capacity: u64) -> Result<Self, RegistryError> {
        Self::with_settlement(settings, kind_capacity, Box::new(Treasury::new()))
    }

    /// Desk with an external settlement collaborator.
    pub fn with_settlement(
        settings: &RegistrySettings,
        kind_capacity: u64,
        settlement: Box<dyn Settlement>,
    ) -> Result<Self, RegistryError> {
        if settings.price_step == 0 {
            return Err(RegistryError::InvalidInput(
                "price_step must be positive".to_string(),
            ));
        }
        let staked_custody = settings
            .staked_custody
            .as_deref()
            .map(AccountId::new)
            .transpose()?;
        Ok(Self {
            owner: AccountId::new(&settings.owner)?,
            unit_price: settings.unit_price,
            price_step: settings.price_step,
            issuance_enabled: settings.issuance_enabled,
            capacity: settings
                .max_supply
                .map_or(kind_capacity, |m| m.min(kind_capacity)),
            max_per_holder: settings.max_per_holder,
            staked_custody,
            price_changes_allowed: settings.price_changes_allowed,
            name_overrides_allowed: settings.name_overrides_allowed,
            minted_to: HashMap::new(),
            ledger: InMemoryHolderLedger::new(),
            settlement,
        })
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Registry owner.
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Current unit price.
    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    /// Whether minting is open.
    pub fn issuance_enabled(&self) -> bool {
        self.issuance_enabled
    }

    /// Maximum number of identifiers.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Custody account whose holdings render as staked.
    pub fn staked_custody(&self) -> Option<&AccountId> {
        self.staked_custody.as_ref()
    }

    /// The holder ledger.
    pub fn ledger(&self) -> &InMemoryHolderLedger {
        &self.ledger
    }

    /// Settled, unwithdrawn funds.
    pub fn balance(&self) -> u128 {
        self.settlement.balance()
    }

    /// Identifiers minted to `account` so far.
    pub fn minted_to(&self, account: &AccountId) -> u32 {
        self.minted_to.get(account).copied().unwrap_or(0)
    }

    // ── Minting ──────────────────────────────────────────────────────

    /// Fail with `IssuanceDisabled` while minting is closed.
    pub fn require_open(&self) -> Result<(), RegistryError> {
        if !self.issuance_enabled {
            return Err(RegistryError::IssuanceDisabled);
        }
        Ok(())
    }

    /// Check a mint of `quantity` identifiers to `to` with `payment`,
    /// given `issued` identifiers so far. Changes nothing.
    pub fn check_mint(
        &self,
        issued: u64,
        quantity: usize,
        to: &AccountId,
        payment: u128,
    ) -> Result<(), RegistryError> {
        self.require_open()?;
        let quantity_u64 = quantity as u64;
        if issued.saturating_add(quantity_u64) > self.capacity {
            return Err(RegistryError::CapacityExceeded(format!(
                "{quantity} more would exceed the supply of {}",
                self.capacity
            )));
        }
        if let Some(limit) = self.max_per_holder {
            let after = u64::from(self.minted_to(to)).saturating_add(quantity_u64);
            if after > u64::from(limit) {
                return Err(RegistryError::CapacityExceeded(format!(
                    "{to} may receive at most {limit} identifiers"
                )));
            }
        }
        let expected = u128::from(self.unit_price) * quantity as u128;
        if payment != expected {
            return Err(RegistryError::PaymentMismatch {
                expected,
                actual: payment,
            });
        }
        Ok(())
    }

    /// Settle the payment for a checked mint.
    pub fn settle(&mut self, payer: &AccountId, payment: u128) -> Result<(), RegistryError> {
        self.settlement.settle(payer, payment)
    }

    /// Assign freshly committed identifiers to their recipient.
    pub fn record_mint(&mut self, ids: &[SequenceId], to: &AccountId) {
        for id in ids {
            self.ledger.assign(*id, to.clone());
        }
        let count = self.minted_to.entry(to.clone()).or_insert(0);
        *count = count.saturating_add(ids.len() as u32);
    }

    // ── Transfers ────────────────────────────────────────────────────

    /// Apply an external transfer notification. `from` must be the
    /// recorded holder.
    pub fn notify_transfer(
        &mut self,
        id: SequenceId,
        from: &AccountId,
        to: AccountId,
    ) -> Result<(), RegistryError> {
        if !self.ledger.is_holder(id, from) {
            return Err(RegistryError::NotHolder {
                sequence_id: id.get(),
                caller: from.to_string(),
            });
        }
        self.ledger.transfer(id, to)
    }

    // ── Owner operations ─────────────────────────────────────────────

    /// Fail with `NotOwner` unless `caller` is the owner.
    pub fn require_owner(&self, caller: &AccountId) -> Result<(), RegistryError> {
        if caller != &self.owner {
            return Err(RegistryError::NotOwner(caller.to_string()));
        }
        Ok(())
    }

    /// Open or close minting.
    pub fn set_issuance_enabled(
        &mut self,
        caller: &AccountId,
        enabled: bool,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        self.issuance_enabled = enabled;
        Ok(())
    }

    /// Change the unit price.
    pub fn set_price(&mut self, caller: &AccountId, price: u64) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        if !self.price_changes_allowed {
            return Err(RegistryError::Locked(
                "price changes are disabled".to_string(),
            ));
        }
        if price % self.price_step != 0 {
            return Err(RegistryError::InvalidInput(format!(
                "price {price} is not a multiple of {}",
                self.price_step
            )));
        }
        self.unit_price = price;
        Ok(())
    }

    /// Allow or forbid later price changes.
    pub fn set_price_changes_allowed(
        &mut self,
        caller: &AccountId,
        allowed: bool,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        self.price_changes_allowed = allowed;
        Ok(())
    }

    /// Allow or forbid owner display-name overrides.
    pub fn set_name_overrides_allowed(
        &mut self,
        caller: &AccountId,
        allowed: bool,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        self.name_overrides_allowed = allowed;
        Ok(())
    }

    /// Fail with `Locked` unless name overrides are allowed.
    pub fn require_name_overrides(&self) -> Result<(), RegistryError> {
        if !self.name_overrides_allowed {
            return Err(RegistryError::Locked(
                "display-name overrides are disabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Set or clear the staked-custody account.
    pub fn set_staked_custody(
        &mut self,
        caller: &AccountId,
        custody: Option<AccountId>,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        self.staked_custody = custody;
        Ok(())
    }

    /// Withdraw `amount`, or the whole balance when `None`.
    pub fn withdraw(
        &mut self,
        caller: &AccountId,
        amount: Option<u128>,
    ) -> Result<u128, RegistryError> {
        self.require_owner(caller)?;
        let amount = amount.unwrap_or_else(|| self.settlement.balance());
        self.settlement.withdraw(amount)
    }
}
