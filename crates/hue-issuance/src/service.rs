//! # Registry Services
//!
//! A [`Service`] owns one registry and its [`IssuanceDesk`] behind a single
//! `parking_lot::Mutex`. Every operation, reads included, takes the lock
//! once and releases it before returning, so callers observe a total order
//! of whole transactions and never an intermediate state. The lock is never
//! held across an `.await`.
//!
//! Operations shared by both registry kinds (attributes, policy,
//! suppression, owner flags, transfers) live on `Service<R>`. Minting,
//! renaming, and rendering are kind-specific and live on
//! [`ColorService`] and [`WordService`].
//!
//! Every committed mutation is logged with `tracing` and counted with
//! `metrics`; every rejection increments `hue_rejections_total{reason}`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use hue_core::{AccountId, RegistryError, SequenceId, COLOR_SPACE_SIZE};
use hue_registry::{
    AttributeEntry, ColorRegistry, HolderLedger, Outcome, RegistryEvent, TokenStore,
    WordRegistry,
};
use hue_render::{Document, HolderView, PeerError, PeerRegistry, RenderConfig, Renderer};

use crate::config::RegistrySettings;
use crate::desk::IssuanceDesk;
use crate::settlement::Settlement;

/// How long a peer lookup waits for this registry's lock before giving up.
const PEER_LOOKUP_TIMEOUT: Duration = Duration::from_millis(250);

// ─── Registry kinds ──────────────────────────────────────────────────

/// A registry type a [`Service`] can own.
pub trait RegistryKind: Send + 'static {
    /// Metric and log label.
    const LABEL: &'static str;
    /// Size of the namespace.
    const CAPACITY: u64;

    /// Empty registry administered by `owner`.
    fn create(owner: AccountId) -> Self;
    /// Shared state.
    fn store(&self) -> &TokenStore;
    /// Shared state, mutable.
    fn store_mut(&mut self) -> &mut TokenStore;
}

impl RegistryKind for ColorRegistry {
    const LABEL: &'static str = "colors";
    const CAPACITY: u64 = COLOR_SPACE_SIZE;

    fn create(owner: AccountId) -> Self {
        ColorRegistry::new(owner)
    }

    fn store(&self) -> &TokenStore {
        ColorRegistry::store(self)
    }

    fn store_mut(&mut self) -> &mut TokenStore {
        ColorRegistry::store_mut(self)
    }
}

impl RegistryKind for WordRegistry {
    const LABEL: &'static str = "words";
    const CAPACITY: u64 = u64::MAX;

    fn create(owner: AccountId) -> Self {
        WordRegistry::new(owner)
    }

    fn store(&self) -> &TokenStore {
        WordRegistry::store(self)
    }

    fn store_mut(&mut self) -> &mut TokenStore {
        WordRegistry::store_mut(self)
    }
}

// ─── Service ─────────────────────────────────────────────────────────

struct State<R> {
    registry: R,
    desk: IssuanceDesk,
}

/// One registry, its desk, and its renderer.
pub struct Service<R: RegistryKind> {
    state: Mutex<State<R>>,
    renderer: Renderer,
    peer: Option<Arc<dyn PeerRegistry>>,
}

/// The colour registry service.
pub type ColorService = Service<ColorRegistry>;
/// The word registry service.
pub type WordService = Service<WordRegistry>;

/// One colour in a mint request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMint {
    /// Raw key, any case.
    pub key: String,
    /// Display name; the key's hex digits when absent.
    #[serde(default)]
    pub name: Option<String>,
}

impl ColorMint {
    /// Mint item with an explicit name.
    pub fn named(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: Some(name.into()),
        }
    }

    /// Mint item with the natural name.
    pub fn unnamed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: None,
        }
    }
}

impl<R: RegistryKind> std::fmt::Debug for Service<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("registry", &R::LABEL)
            .field("has_peer", &self.peer.is_some())
            .finish_non_exhaustive()
    }
}

impl<R: RegistryKind> Service<R> {
    /// Service with the in-memory treasury.
    pub fn new(settings: &RegistrySettings, render: RenderConfig) -> Result<Self, RegistryError> {
        let desk = IssuanceDesk::new(settings, R::CAPACITY)?;
        Ok(Self::from_desk(desk, render))
    }

    /// Service with an external settlement collaborator.
    pub fn with_settlement(
        settings: &RegistrySettings,
        render: RenderConfig,
        settlement: Box<dyn Settlement>,
    ) -> Result<Self, RegistryError> {
        let desk = IssuanceDesk::with_settlement(settings, R::CAPACITY, settlement)?;
        Ok(Self::from_desk(desk, render))
    }

    fn from_desk(desk: IssuanceDesk, render: RenderConfig) -> Self {
        Self {
            state: Mutex::new(State {
                registry: R::create(desk.owner().clone()),
                desk,
            }),
            renderer: Renderer::new(render),
            peer: None,
        }
    }

    /// Attach a peer registry for display-name resolution.
    pub fn with_peer(mut self, peer: Arc<dyn PeerRegistry>) -> Self {
        self.peer = Some(peer);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Registry label, `colors` or `words`.
    pub fn label(&self) -> &'static str {
        R::LABEL
    }

    /// Identifiers issued so far.
    pub fn issued_count(&self) -> u64 {
        self.state.lock().registry.store().issued_count()
    }

    /// Canonical keys for `[start, end)`.
    pub fn range(&self, start: u64, end: u64) -> Result<Vec<String>, RegistryError> {
        let result = self.state.lock().registry.store().range(start, end);
        observe::<R, _>("range", result)
    }

    /// Attributes of `id`, display name first.
    pub fn list_attributes(&self, id: SequenceId) -> Result<Vec<AttributeEntry>, RegistryError> {
        let state = self.state.lock();
        let result = state.registry.store().list_attributes(id).map(<[_]>::to_vec);
        observe::<R, _>("list_attributes", result)
    }

    /// Current display name of `id`.
    pub fn display_name(&self, id: SequenceId) -> Result<String, RegistryError> {
        let state = self.state.lock();
        let store = state.registry.store();
        store.record(id)?;
        Ok(store.display_name(id).unwrap_or_default().to_string())
    }

    /// Current holder of `id`.
    pub fn holder_of(&self, id: SequenceId) -> Option<AccountId> {
        self.state.lock().desk.ledger().holder_of(id)
    }

    /// Committed events, oldest first.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.state.lock().registry.store().events().all().to_vec()
    }

    /// Settled, unwithdrawn funds.
    pub fn balance(&self) -> u128 {
        self.state.lock().desk.balance()
    }

    /// Current unit price.
    pub fn unit_price(&self) -> u64 {
        self.state.lock().desk.unit_price()
    }

    /// Whether `id` is suppressed.
    pub fn is_suppressed(&self, id: SequenceId) -> bool {
        self.state.lock().registry.store().is_suppressed(id)
    }

    // ── Holder operations ────────────────────────────────────────────

    /// Policy-checked attribute write by the current holder.
    pub fn set_attribute(
        &self,
        caller: &AccountId,
        id: SequenceId,
        trait_name: &str,
        value: &str,
    ) -> Result<(), RegistryError> {
        let mut guard = self.state.lock();
        let State { registry, desk } = &mut *guard;
        let result = registry
            .store_mut()
            .set_attribute(desk.ledger(), caller, id, trait_name, value);
        if result.is_ok() {
            metrics::counter!("hue_attribute_writes_total", "registry" => R::LABEL).increment(1);
            tracing::info!(
                registry = R::LABEL,
                sequence_id = id.get(),
                trait_name,
                "attribute set"
            );
        }
        observe::<R, _>("set_attribute", result)
    }

    /// Parallel-array attribute writes. Lengths must match; pairs commit
    /// one at a time and stop at the first failure.
    pub fn set_attributes(
        &self,
        caller: &AccountId,
        id: SequenceId,
        trait_names: &[String],
        values: &[String],
    ) -> Result<(), RegistryError> {
        let mut guard = self.state.lock();
        let State { registry, desk } = &mut *guard;
        let store = registry.store_mut();
        let before = store.events().len();
        let result = store.set_attributes(desk.ledger(), caller, id, trait_names, values);
        let written = store.events().len() - before;
        if written > 0 {
            metrics::counter!("hue_attribute_writes_total", "registry" => R::LABEL)
                .increment(written as u64);
            tracing::info!(registry = R::LABEL, sequence_id = id.get(), written, "attributes set");
        }
        observe::<R, _>("set_attributes", result)
    }

    /// Apply an external transfer notification.
    pub fn notify_transfer(
        &self,
        id: SequenceId,
        from: &AccountId,
        to: AccountId,
    ) -> Result<(), RegistryError> {
        let mut guard = self.state.lock();
        let State { registry, desk } = &mut *guard;
        let result = registry
            .store()
            .record(id)
            .map(|_| ())
            .and_then(|()| desk.notify_transfer(id, from, to.clone()));
        if result.is_ok() {
            tracing::info!(registry = R::LABEL, sequence_id = id.get(), %from, %to, "transferred");
        }
        observe::<R, _>("notify_transfer", result)
    }

    // ── Owner operations ─────────────────────────────────────────────

    /// Owner write that bypasses trait policy.
    pub fn admin_set_attribute(
        &self,
        caller: &AccountId,
        id: SequenceId,
        trait_name: &str,
        value: &str,
    ) -> Result<(), RegistryError> {
        let result = self
            .state
            .lock()
            .registry
            .store_mut()
            .admin_set_attribute(caller, id, trait_name, value);
        if result.is_ok() {
            metrics::counter!("hue_attribute_writes_total", "registry" => R::LABEL).increment(1);
            tracing::info!(
                registry = R::LABEL,
                sequence_id = id.get(),
                trait_name,
                "attribute set by owner"
            );
        }
        observe_admin::<R, _>("admin_set_attribute", caller, result)
    }

    /// Upsert a trait policy.
    pub fn set_policy(
        &self,
        caller: &AccountId,
        trait_name: &str,
        user_modifiable: bool,
        enabled_for_all: bool,
    ) -> Result<(), RegistryError> {
        let result = self.state.lock().registry.store_mut().set_policy(
            caller,
            trait_name,
            user_modifiable,
            enabled_for_all,
        );
        if result.is_ok() {
            tracing::info!(
                registry = R::LABEL,
                trait_name,
                user_modifiable,
                enabled_for_all,
                "trait policy set"
            );
        }
        observe_admin::<R, _>("set_policy", caller, result)
    }

    /// Add a trait to `id`'s whitelist.
    pub fn grant_trait(
        &self,
        caller: &AccountId,
        id: SequenceId,
        trait_name: &str,
    ) -> Result<(), RegistryError> {
        let result = self
            .state
            .lock()
            .registry
            .store_mut()
            .grant_trait(caller, id, trait_name);
        observe_admin::<R, _>("grant_trait", caller, result)
    }

    /// Remove a trait from `id`'s whitelist.
    pub fn revoke_trait(
        &self,
        caller: &AccountId,
        id: SequenceId,
        trait_name: &str,
    ) -> Result<(), RegistryError> {
        let result = self
            .state
            .lock()
            .registry
            .store_mut()
            .revoke_trait(caller, id, trait_name);
        observe_admin::<R, _>("revoke_trait", caller, result)
    }

    /// Suppress `id` from rendering.
    pub fn suppress(&self, caller: &AccountId, id: SequenceId) -> Result<(), RegistryError> {
        let result = self.state.lock().registry.store_mut().suppress(caller, id);
        if result.is_ok() {
            tracing::info!(registry = R::LABEL, sequence_id = id.get(), "suppressed");
        }
        observe_admin::<R, _>("suppress", caller, result)
    }

    /// Lift suppression of `id`.
    pub fn unsuppress(&self, caller: &AccountId, id: SequenceId) -> Result<(), RegistryError> {
        let result = self.state.lock().registry.store_mut().unsuppress(caller, id);
        if result.is_ok() {
            tracing::info!(registry = R::LABEL, sequence_id = id.get(), "unsuppressed");
        }
        observe_admin::<R, _>("unsuppress", caller, result)
    }

    /// Freeze suppression forever.
    pub fn lock_suppression(&self, caller: &AccountId) -> Result<(), RegistryError> {
        let result = self.state.lock().registry.store_mut().lock_suppression(caller);
        if result.is_ok() {
            tracing::info!(registry = R::LABEL, "suppression locked");
        }
        observe_admin::<R, _>("lock_suppression", caller, result)
    }

    /// Open or close minting.
    pub fn set_issuance_enabled(
        &self,
        caller: &AccountId,
        enabled: bool,
    ) -> Result<(), RegistryError> {
        let result = self.state.lock().desk.set_issuance_enabled(caller, enabled);
        if result.is_ok() {
            tracing::info!(registry = R::LABEL, enabled, "issuance toggled");
        }
        observe_admin::<R, _>("set_issuance_enabled", caller, result)
    }

    /// Change the unit price.
    pub fn set_price(&self, caller: &AccountId, price: u64) -> Result<(), RegistryError> {
        let result = self.state.lock().desk.set_price(caller, price);
        if result.is_ok() {
            tracing::info!(registry = R::LABEL, price, "price changed");
        }
        observe_admin::<R, _>("set_price", caller, result)
    }

    /// Allow or forbid price changes.
    pub fn set_price_changes_allowed(
        &self,
        caller: &AccountId,
        allowed: bool,
    ) -> Result<(), RegistryError> {
        let result = self
            .state
            .lock()
            .desk
            .set_price_changes_allowed(caller, allowed);
        observe_admin::<R, _>("set_price_changes_allowed", caller, result)
    }

    /// Allow or forbid display-name overrides.
    pub fn set_name_overrides_allowed(
        &self,
        caller: &AccountId,
        allowed: bool,
    ) -> Result<(), RegistryError> {
        let result = self
            .state
            .lock()
            .desk
            .set_name_overrides_allowed(caller, allowed);
        observe_admin::<R, _>("set_name_overrides_allowed", caller, result)
    }

    /// Set or clear the staked-custody account.
    pub fn set_staked_custody(
        &self,
        caller: &AccountId,
        custody: Option<AccountId>,
    ) -> Result<(), RegistryError> {
        let result = self.state.lock().desk.set_staked_custody(caller, custody);
        observe_admin::<R, _>("set_staked_custody", caller, result)
    }

    /// Withdraw settled funds. `None` drains the balance.
    pub fn withdraw(
        &self,
        caller: &AccountId,
        amount: Option<u128>,
    ) -> Result<u128, RegistryError> {
        let result = self.state.lock().desk.withdraw(caller, amount);
        if let Ok(amount) = &result {
            tracing::info!(registry = R::LABEL, amount = %amount, "withdrawn");
        }
        observe_admin::<R, _>("withdraw", caller, result)
    }

    fn finish_mint(
        &self,
        caller: &AccountId,
        to: &AccountId,
        result: Result<Vec<SequenceId>, RegistryError>,
    ) -> Result<Vec<SequenceId>, RegistryError> {
        if let Ok(ids) = &result {
            metrics::counter!("hue_issued_total", "registry" => R::LABEL)
                .increment(ids.len() as u64);
            tracing::info!(
                registry = R::LABEL,
                first = ids.first().map(|id| id.get()),
                count = ids.len(),
                %caller,
                %to,
                "minted"
            );
        }
        observe::<R, _>("mint", result)
    }
}

// ─── Colours ─────────────────────────────────────────────────────────

impl Service<ColorRegistry> {
    /// Mint colours to `to`, paid by `caller`.
    ///
    /// Every item is validated, including against the others in the batch,
    /// before payment is settled. Settlement happens before commit, so a
    /// settlement failure leaves the registry untouched.
    pub fn mint(
        &self,
        caller: &AccountId,
        items: &[ColorMint],
        to: &AccountId,
        payment: u128,
    ) -> Result<Vec<SequenceId>, RegistryError> {
        let result = self.mint_colors(caller, items, to, payment);
        self.finish_mint(caller, to, result)
    }

    fn mint_colors(
        &self,
        caller: &AccountId,
        items: &[ColorMint],
        to: &AccountId,
        payment: u128,
    ) -> Result<Vec<SequenceId>, RegistryError> {
        let mut guard = self.state.lock();
        let State { registry, desk } = &mut *guard;
        desk.require_open()?;
        if items.is_empty() {
            return Err(RegistryError::InvalidInput("mint needs at least one item".to_string()));
        }
        let raw: Vec<(String, Option<String>)> = items
            .iter()
            .map(|item| (item.key.clone(), item.name.clone()))
            .collect();
        let pending = registry.prepare_many(&raw)?;
        desk.check_mint(registry.store().issued_count(), pending.len(), to, payment)?;
        desk.settle(caller, payment)?;
        let ids: Vec<SequenceId> = pending.into_iter().map(|p| registry.commit(p)).collect();
        desk.record_mint(&ids, to);
        Ok(ids)
    }

    /// Rename `id` on behalf of its holder.
    pub fn rename(
        &self,
        caller: &AccountId,
        id: SequenceId,
        name: &str,
    ) -> Result<(), RegistryError> {
        let mut guard = self.state.lock();
        let State { registry, desk } = &mut *guard;
        let result = registry.rename(desk.ledger(), caller, id, name);
        if result.is_ok() {
            metrics::counter!("hue_renames_total").increment(1);
            tracing::info!(registry = "colors", sequence_id = id.get(), name, "renamed");
        }
        observe::<ColorRegistry, _>("rename", result)
    }

    /// Rename several identifiers in order, each its own transaction.
    /// Stops at the first failure; earlier renames stay.
    pub fn rename_batch(
        &self,
        caller: &AccountId,
        items: &[(SequenceId, String)],
    ) -> Result<(), RegistryError> {
        for (id, name) in items {
            self.rename(caller, *id, name)?;
        }
        Ok(())
    }

    /// Owner rename. Fails with `Locked` unless overrides are allowed.
    pub fn override_display_name(
        &self,
        caller: &AccountId,
        id: SequenceId,
        name: &str,
    ) -> Result<(), RegistryError> {
        let mut guard = self.state.lock();
        let State { registry, desk } = &mut *guard;
        let result = desk
            .require_owner(caller)
            .and_then(|()| desk.require_name_overrides())
            .and_then(|()| registry.override_display_name(caller, id, name));
        if result.is_ok() {
            metrics::counter!("hue_renames_total").increment(1);
            tracing::info!(
                registry = "colors",
                sequence_id = id.get(),
                name,
                "display name overridden"
            );
        }
        observe_admin::<ColorRegistry, _>("override_display_name", caller, result)
    }

    /// Rendered document for `id`.
    pub fn render(&self, id: SequenceId) -> Result<Document, RegistryError> {
        let state = self.state.lock();
        let holder = state.desk.ledger().holder_of(id);
        let view = HolderView {
            holder: holder.as_ref(),
            staked_custody: state.desk.staked_custody(),
        };
        let result = self.renderer.render_color(&state.registry, id, &view);
        observe::<ColorRegistry, _>("render", result)
    }

    /// Document data URI for `id`.
    pub fn document(&self, id: SequenceId) -> Result<String, RegistryError> {
        self.render(id)?.to_data_uri()
    }
}

impl PeerRegistry for Service<ColorRegistry> {
    fn display_name(&self, key: &str) -> Result<Option<String>, PeerError> {
        let state = self
            .state
            .try_lock_for(PEER_LOOKUP_TIMEOUT)
            .ok_or_else(|| PeerError::Unavailable("colour registry is busy".to_string()))?;
        PeerRegistry::display_name(&state.registry, key)
    }
}

// ─── Words ───────────────────────────────────────────────────────────

impl Service<WordRegistry> {
    /// Classify raw slots against current state. Pure.
    pub fn verify(&self, slots: &[String]) -> Outcome {
        self.state.lock().registry.verify(slots)
    }

    /// Mint word tuples to `to`, paid by `caller`. Combinations are added
    /// only after every check and the settlement have passed.
    pub fn mint(
        &self,
        caller: &AccountId,
        items: &[Vec<String>],
        to: &AccountId,
        payment: u128,
    ) -> Result<Vec<SequenceId>, RegistryError> {
        let result = self.mint_words(caller, items, to, payment);
        self.finish_mint(caller, to, result)
    }

    fn mint_words(
        &self,
        caller: &AccountId,
        items: &[Vec<String>],
        to: &AccountId,
        payment: u128,
    ) -> Result<Vec<SequenceId>, RegistryError> {
        let mut guard = self.state.lock();
        let State { registry, desk } = &mut *guard;
        desk.require_open()?;
        if items.is_empty() {
            return Err(RegistryError::InvalidInput("mint needs at least one item".to_string()));
        }
        let pending = registry.prepare_many(items)?;
        desk.check_mint(registry.store().issued_count(), pending.len(), to, payment)?;
        desk.settle(caller, payment)?;
        let ids: Vec<SequenceId> = pending.into_iter().map(|p| registry.commit(p)).collect();
        desk.record_mint(&ids, to);
        Ok(ids)
    }

    /// Rendered document for `id`. Colour traits resolve through the peer.
    pub fn render(&self, id: SequenceId) -> Result<Document, RegistryError> {
        let state = self.state.lock();
        let holder = state.desk.ledger().holder_of(id);
        let view = HolderView {
            holder: holder.as_ref(),
            staked_custody: state.desk.staked_custody(),
        };
        let result = self
            .renderer
            .render_words(&state.registry, id, self.peer.as_deref(), &view);
        observe::<WordRegistry, _>("render", result)
    }

    /// Document data URI for `id`.
    pub fn document(&self, id: SequenceId) -> Result<String, RegistryError> {
        self.render(id)?.to_data_uri()
    }
}

// ─── Observability ───────────────────────────────────────────────────

fn count_rejection<R: RegistryKind>(err: &RegistryError) {
    metrics::counter!(
        "hue_rejections_total",
        "registry" => R::LABEL,
        "reason" => err.reason()
    )
    .increment(1);
}

fn observe<R: RegistryKind, T>(
    operation: &'static str,
    result: Result<T, RegistryError>,
) -> Result<T, RegistryError> {
    if let Err(err) = &result {
        count_rejection::<R>(err);
        tracing::debug!(
            registry = R::LABEL,
            operation,
            reason = err.reason(),
            error = %err,
            "rejected"
        );
    }
    result
}

fn observe_admin<R: RegistryKind, T>(
    operation: &'static str,
    caller: &AccountId,
    result: Result<T, RegistryError>,
) -> Result<T, RegistryError> {
    if let Err(err) = &result {
        count_rejection::<R>(err);
        tracing::warn!(
            registry = R::LABEL,
            operation,
            %caller,
            reason = err.reason(),
            error = %err,
            "administrative call rejected"
        );
    }
    result
}
