//! # Holder Ledger Seam
//!
//! Who currently holds an identifier is tracked outside the registry. The
//! registry only asks; it never stores holders itself.

use hue_core::{AccountId, RegistryError, SequenceId};

/// Query and update interface to the external ownership ledger.
pub trait HolderLedger: Send + Sync {
    /// Current holder of `id`, or `None` if the ledger has never seen it.
    fn holder_of(&self, id: SequenceId) -> Option<AccountId>;

    /// Record the first holder of a freshly issued identifier.
    fn assign(&mut self, id: SequenceId, holder: AccountId);

    /// Move `id` to `to`. Fails with `NotFound` if `id` has no holder.
    fn transfer(&mut self, id: SequenceId, to: AccountId) -> Result<(), RegistryError>;

    /// Whether `caller` currently holds `id`.
    fn is_holder(&self, id: SequenceId, caller: &AccountId) -> bool {
        self.holder_of(id).as_ref() == Some(caller)
    }
}
