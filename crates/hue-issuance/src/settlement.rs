//! # Settlement Seam
//!
//! Payment is settled by an external collaborator before anything is
//! committed. [`Treasury`] is the in-process implementation: it accepts
//! every payment and accumulates a withdrawable balance.

use hue_core::{AccountId, RegistryError};

/// Moves an issuance payment from the payer to the registry.
pub trait Settlement: Send + Sync {
    /// Settle `amount` paid by `payer`. An error aborts the issuance.
    fn settle(&mut self, payer: &AccountId, amount: u128) -> Result<(), RegistryError>;

    /// Settled funds not yet withdrawn.
    fn balance(&self) -> u128;

    /// Pay `amount` out of the balance. Fails with `PaymentMismatch` when
    /// `amount` exceeds the balance.
    fn withdraw(&mut self, amount: u128) -> Result<u128, RegistryError>;
}

/// In-memory settled balance.
#[derive(Debug, Clone, Default)]
pub struct Treasury {
    balance: u128,
    total_settled: u128,
}

impl Treasury {
    /// Empty treasury.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything ever settled, including withdrawn funds.
    pub fn total_settled(&self) -> u128 {
        self.total_settled
    }
}

impl Settlement for Treasury {
    fn settle(&mut self, _payer: &AccountId, amount: u128) -> Result<(), RegistryError> {
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| RegistryError::Settlement("treasury balance overflow".to_string()))?;
        self.balance = balance;
        self.total_settled = self.total_settled.saturating_add(amount);
        Ok(())
    }

    fn balance(&self) -> u128 {
        self.balance
    }

    fn withdraw(&mut self, amount: u128) -> Result<u128, RegistryError> {
        if amount > self.balance {
            return Err(RegistryError::PaymentMismatch {
                expected: self.balance,
                actual: amount,
            });
        }
        self.balance -= amount;
        Ok(amount)
    }
}
