//! In-memory holder ledger.

use std::collections::HashMap;

use hue_core::{AccountId, RegistryError, SequenceId};
use hue_registry::HolderLedger;

/// Holder per identifier, kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHolderLedger {
    holders: HashMap<SequenceId, AccountId>,
}

impl InMemoryHolderLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identifiers currently held by `account`.
    pub fn holdings(&self, account: &AccountId) -> usize {
        self.holders.values().filter(|h| *h == account).count()
    }
}

impl HolderLedger for InMemoryHolderLedger {
    fn holder_of(&self, id: SequenceId) -> Option<AccountId> {
        self.holders.get(&id).cloned()
    }

    fn assign(&mut self, id: SequenceId, holder: AccountId) {
        self.holders.insert(id, holder);
    }

    fn transfer(&mut self, id: SequenceId, to: AccountId) -> Result<(), RegistryError> {
        let holder = self
            .holders
            .get_mut(&id)
            .ok_or(RegistryError::NotFound(id.get()))?;
        *holder = to;
        Ok(())
    }
}
