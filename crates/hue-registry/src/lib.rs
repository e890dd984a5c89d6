//! # hue-registry — Registry State
//!
//! Owns the authoritative state of a registry instance and every rule
//! that guards it. Each registry is a plain owned value; nothing here is
//! global, so every test builds fresh state.
//!
//! ## Components
//!
//! - **Records** (`record.rs`): the dense, append-only table of
//!   [`IssuanceRecord`]s. Sequence ids are table positions, so the range
//!   `[0, len)` is contiguous by construction.
//!
//! - **Reservations** (`reservation.rs`): display-name claims (released on
//!   rename) and the append-only word-combination digest set.
//!
//! - **Attributes** (`attributes.rs`): per-identifier ordered trait values
//!   and the owner-editable [`TraitPolicy`] table, joined with each record's
//!   whitelist at write time.
//!
//! - **Store** (`store.rs`): [`TokenStore`], the state both registry kinds
//!   share: owner, records, attributes, policies, suppression, event log.
//!
//! - **Colours** (`colors.rs`): [`ColorRegistry`], keyed by `#RRGGBB`, with
//!   display-name reservation and renames.
//!
//! - **Words** (`words.rs`): [`WordRegistry`] and the pure
//!   [`verify`](WordRegistry::verify) step that classifies a word tuple.
//!
//! ## Transaction Discipline
//!
//! Every mutating method checks all of its preconditions before touching
//! state. A method that returns `Err` has changed nothing. Batch methods
//! are loops of single-item transactions: a failure at item `n` leaves
//! items `0..n` committed.

pub mod attributes;
pub mod colors;
pub mod events;
pub mod holder;
pub mod record;
pub mod reservation;
pub mod store;
pub mod words;

pub use attributes::{AttributeEntry, AttributeStore, EntryOrigin, PolicyTable, TraitPolicy};
pub use colors::{ColorRegistry, PendingColor};
pub use events::{EventKind, EventLog, RegistryEvent};
pub use holder::HolderLedger;
pub use record::{IssuanceRecord, RecordTable};
pub use reservation::{CombinationSet, NameReservations};
pub use store::TokenStore;
pub use words::{Outcome, PendingWords, WordRegistry};

pub use hue_core::DISPLAY_NAME_TRAIT;

/// Trait holding the background colour of the rendered image.
pub const BACKGROUND_TRAIT: &str = "Background";
/// Trait holding the text colour of the rendered image.
pub const FOREGROUND_TRAIT: &str = "Foreground";
