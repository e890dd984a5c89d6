//! # Renderer
//!
//! Turns registry state into a [`Document`]. Reads only registry state, the
//! render config, and the holder view passed in; never the event log or the
//! clock. Equal inputs give byte-equal documents.
//!
//! Attribute list layout:
//!
//! ```text
//! [ Name, <stored traits in first-write order>,
//!   Word Count (words only), Fully Customized, Staked ]
//! ```
//!
//! A suppressed identifier short-circuits to the placeholder image and the
//! single `Blocked` attribute.

use hue_core::{AccountId, RegistryError, SequenceId};
use hue_registry::{
    ColorRegistry, EntryOrigin, TokenStore, WordRegistry, BACKGROUND_TRAIT, FOREGROUND_TRAIT,
};

use crate::config::RenderConfig;
use crate::document::{Attribute, Document};
use crate::peer::{resolve_display_name, PeerRegistry};
use crate::svg::{placeholder_image, render_image};

/// Derived trait: number of words.
pub const WORD_COUNT_TRAIT: &str = "Word Count";
/// Derived trait: both colours set by the holder.
pub const FULLY_CUSTOMIZED_TRAIT: &str = "Fully Customized";
/// Derived trait: held by the staked-custody account.
pub const STAKED_TRAIT: &str = "Staked";
/// Only attribute of a suppressed identifier.
pub const BLOCKED_TRAIT: &str = "Blocked";

/// Holder facts the renderer needs but the registry does not store.
#[derive(Debug, Clone, Copy, Default)]
pub struct HolderView<'a> {
    /// Current holder, if known.
    pub holder: Option<&'a AccountId>,
    /// Distinguished custody account, if configured.
    pub staked_custody: Option<&'a AccountId>,
}

impl HolderView<'_> {
    /// Whether the identifier sits with the custody account.
    pub fn is_staked(&self) -> bool {
        matches!((self.holder, self.staked_custody), (Some(h), Some(c)) if h == c)
    }
}

/// Stateless renderer over a fixed config.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Renderer using `config`.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// The render config.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Document for a colour identifier. Its own key is the background
    /// unless a `Background` trait is set.
    pub fn render_color(
        &self,
        registry: &ColorRegistry,
        id: SequenceId,
        view: &HolderView<'_>,
    ) -> Result<Document, RegistryError> {
        let store = registry.store();
        let record = store.record(id)?;
        if store.is_suppressed(id) {
            return Ok(self.blocked());
        }

        let name = store.display_name(id).unwrap_or_default().to_string();
        let background = store
            .attributes()
            .value(id, BACKGROUND_TRAIT)
            .unwrap_or(record.canonical_key.as_str());
        let foreground = self.foreground(store, id);
        let svg = render_image(&self.config, background, foreground, &[name.clone()]);

        let mut attributes = stored_attributes(store, id, |_, value| value.to_string());
        attributes.push(Attribute::flag(
            FULLY_CUSTOMIZED_TRAIT,
            fully_customized(store, id),
        ));
        attributes.push(Attribute::flag(STAKED_TRAIT, view.is_staked()));

        Ok(Document::new(name, &self.config.description, &svg, attributes))
    }

    /// Document for a word identifier. One text line per word over the
    /// configured default background. Colour traits are listed under the
    /// peer's display name for that colour when the peer knows it.
    pub fn render_words(
        &self,
        registry: &WordRegistry,
        id: SequenceId,
        peer: Option<&dyn PeerRegistry>,
        view: &HolderView<'_>,
    ) -> Result<Document, RegistryError> {
        let store = registry.store();
        store.record(id)?;
        if store.is_suppressed(id) {
            return Ok(self.blocked());
        }

        let words = registry.words_of(id)?;
        let name = store.display_name(id).unwrap_or_default().to_string();
        let background = store
            .attributes()
            .value(id, BACKGROUND_TRAIT)
            .unwrap_or(self.config.default_background.as_str());
        let foreground = self.foreground(store, id);
        let svg = render_image(&self.config, background, foreground, &words);

        let mut attributes = stored_attributes(store, id, |trait_name, value| {
            if trait_name == BACKGROUND_TRAIT || trait_name == FOREGROUND_TRAIT {
                resolve_display_name(peer, value)
            } else {
                value.to_string()
            }
        });
        attributes.push(Attribute::new(WORD_COUNT_TRAIT, words.len().to_string()));
        attributes.push(Attribute::flag(
            FULLY_CUSTOMIZED_TRAIT,
            fully_customized(store, id),
        ));
        attributes.push(Attribute::flag(STAKED_TRAIT, view.is_staked()));

        Ok(Document::new(name, &self.config.description, &svg, attributes))
    }

    /// The fixed document shown for suppressed identifiers.
    pub fn blocked(&self) -> Document {
        Document::new(
            BLOCKED_TRAIT,
            &self.config.description,
            &placeholder_image(&self.config),
            vec![Attribute::new(BLOCKED_TRAIT, "true")],
        )
    }

    fn foreground<'a>(&'a self, store: &'a TokenStore, id: SequenceId) -> &'a str {
        store
            .attributes()
            .value(id, FOREGROUND_TRAIT)
            .unwrap_or(self.config.default_foreground.as_str())
    }
}

fn stored_attributes(
    store: &TokenStore,
    id: SequenceId,
    shown: impl Fn(&str, &str) -> String,
) -> Vec<Attribute> {
    store
        .attributes()
        .list(id)
        .iter()
        .map(|e| {
            let trait_name = e.trait_name.as_str();
            Attribute::new(trait_name, shown(trait_name, &e.value))
        })
        .collect()
}

fn fully_customized(store: &TokenStore, id: SequenceId) -> bool {
    [BACKGROUND_TRAIT, FOREGROUND_TRAIT].iter().all(|t| {
        store
            .attributes()
            .get(id, t)
            .is_some_and(|e| e.origin == EntryOrigin::Holder)
    })
}
