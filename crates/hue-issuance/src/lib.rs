//! # hue-issuance — Issuance and Transfer
//!
//! The façade callers talk to. Each registry kind is wrapped in a
//! [`Service`] that serialises every operation behind one lock and joins
//! the registry state with the parts of issuance that are not registry
//! state: price, supply, quotas, payment settlement, and holders.
//!
//! ## Modules
//!
//! - **Config** (`config.rs`): [`IssuanceConfig`], one YAML file for both
//!   registries and the renderer.
//! - **Ledger** (`ledger.rs`): [`InMemoryHolderLedger`], the in-process
//!   [`HolderLedger`](hue_registry::HolderLedger).
//! - **Settlement** (`settlement.rs`): the [`Settlement`] seam and the
//!   in-process [`Treasury`].
//! - **Desk** (`desk.rs`): [`IssuanceDesk`], mint preconditions and owner
//!   flags.
//! - **Service** (`service.rs`): [`ColorService`] and [`WordService`].
//!
//! ## Mint Sequence
//!
//! ```text
//! open? ─▶ validate every item ─▶ supply/quota ─▶ payment
//!       ─▶ settle ─▶ commit ─▶ assign holders
//! ```
//!
//! Nothing is written before settlement succeeds, so a rejected or
//! unpaid mint never consumes a key, a name, or a word combination.

pub mod config;
pub mod desk;
pub mod ledger;
pub mod service;
pub mod settlement;

use std::sync::Arc;

use hue_core::RegistryError;
use hue_render::PeerRegistry;

pub use config::{ConfigError, IssuanceConfig, RegistrySettings};
pub use desk::IssuanceDesk;
pub use ledger::InMemoryHolderLedger;
pub use service::{ColorMint, ColorService, RegistryKind, Service, WordService};
pub use settlement::{Settlement, Treasury};

/// Both registries, with the word registry resolving colour names through
/// the colour registry.
#[derive(Debug, Clone)]
pub struct Registries {
    /// The colour registry.
    pub colors: Arc<ColorService>,
    /// The word registry.
    pub words: Arc<WordService>,
}

impl Registries {
    /// Build both services from a validated config.
    pub fn from_config(config: &IssuanceConfig) -> Result<Self, RegistryError> {
        let colors = Arc::new(ColorService::new(&config.colors, config.render.clone())?);
        let peer: Arc<dyn PeerRegistry> = colors.clone();
        let words =
            Arc::new(WordService::new(&config.words, config.render.clone())?.with_peer(peer));
        tracing::info!(
            colors_enabled = config.colors.issuance_enabled,
            words_enabled = config.words.issuance_enabled,
            "registries ready"
        );
        Ok(Self { colors, words })
    }
}
