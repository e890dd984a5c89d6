//! # hue-core — Foundational Types for the hue Registries
//!
//! This crate is the leaf of the workspace DAG. It holds everything the
//! registries agree on before any state exists: how raw input is folded
//! into comparison keys, which strings are well-formed, the identifier
//! newtypes, the error taxonomy, and the canonical byte pipeline used for
//! rendered documents and combination digests.
//!
//! ## Key Design Principles
//!
//! 1. **Pure normalization.** [`normalize`] and [`validate`] are total,
//!    stateless functions. Every write path runs raw input through
//!    `normalize` first and `validate` second.
//!
//! 2. **Newtypes with validated constructors.** `ColorKey`, `DisplayName`,
//!    `Word`, `WordTuple`, `TraitName`, `AccountId`. A `ColorKey` in hand is
//!    always canonical; there is no way to build a lowercase one.
//!
//! 3. **`CanonicalBytes` newtype.** Rendered documents and combination
//!    digests are computed only from canonical JSON bytes, so two equal
//!    states can never serialize differently.
//!
//! 4. **One error enum.** [`RegistryError`] is the complete taxonomy shared
//!    by every registry operation.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hue-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod normalize;
pub mod temporal;
pub mod validate;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, RegistryError};
pub use identity::{
    AccountId, ColorKey, DisplayName, SequenceId, TraitName, Word, WordTuple, COLOR_SPACE_SIZE,
    DISPLAY_NAME_TRAIT, MAX_WORDS,
};
pub use normalize::{canonicalize_key, canonicalize_name};
pub use temporal::Timestamp;
pub use validate::{is_valid_display_name, is_valid_key, is_valid_word, names_match_key};
