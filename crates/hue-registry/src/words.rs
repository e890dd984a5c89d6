//! # Word Registry
//!
//! Issues identifiers made of one to three uppercase words. The exact tuple
//! is the uniqueness key; there is no display-name reservation and words
//! cannot be renamed.
//!
//! [`WordRegistry::verify`] classifies raw slots without touching state.
//! The combination is added to the [`CombinationSet`] only by
//! [`WordRegistry::commit`], after the caller's own checks have passed, so
//! a failed payment never burns a combination.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use hue_core::identity::COMBINATION_SEPARATOR;
use hue_core::validate::MAX_WORD_LEN;
use hue_core::{AccountId, RegistryError, SequenceId, Word, WordTuple, MAX_WORDS};

use crate::reservation::CombinationSet;
use crate::store::TokenStore;

/// Result of classifying a raw word tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Well-formed and unused.
    Valid(WordTuple),
    /// No words, or more than three slots.
    InvalidCount(usize),
    /// A word shorter than 1 or longer than 16 bytes, including an empty
    /// slot followed by a non-empty one.
    InvalidLength {
        /// Zero-based slot.
        slot: usize,
        /// Byte length found.
        len: usize,
    },
    /// A word with a byte outside `A-Z0-9`.
    InvalidCharacter {
        /// Zero-based slot.
        slot: usize,
    },
    /// The tuple was issued before.
    CombinationUsed(String),
}

impl Outcome {
    /// Whether the tuple may be issued.
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid(_))
    }

    /// Snake-case tag of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Valid(_) => "valid",
            Outcome::InvalidCount(_) => "invalid_count",
            Outcome::InvalidLength { .. } => "invalid_length",
            Outcome::InvalidCharacter { .. } => "invalid_character",
            Outcome::CombinationUsed(_) => "combination_used",
        }
    }

    /// The tuple, or the matching [`RegistryError`].
    pub fn into_result(self) -> Result<WordTuple, RegistryError> {
        match self {
            Outcome::Valid(tuple) => Ok(tuple),
            Outcome::InvalidCount(n) => Err(RegistryError::InvalidInput(format!(
                "a word identifier has 1-{MAX_WORDS} words, got {n}"
            ))),
            Outcome::InvalidLength { slot, len } => Err(RegistryError::InvalidInput(format!(
                "word {slot} is {len} bytes, must be 1-{MAX_WORD_LEN}"
            ))),
            Outcome::InvalidCharacter { slot } => Err(RegistryError::InvalidInput(format!(
                "word {slot} must contain only A-Z and 0-9"
            ))),
            Outcome::CombinationUsed(combination) => {
                Err(RegistryError::CombinationUsed { combination })
            }
        }
    }
}

/// A word issuance that passed every registry check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWords {
    tuple: WordTuple,
}

impl PendingWords {
    /// Tuple to be issued.
    pub fn tuple(&self) -> &WordTuple {
        &self.tuple
    }
}

/// Word identifiers plus the combination set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordRegistry {
    store: TokenStore,
    combinations: CombinationSet,
}

impl WordRegistry {
    /// Empty registry administered by `owner`.
    pub fn new(owner: AccountId) -> Self {
        Self {
            store: TokenStore::new(owner),
            combinations: CombinationSet::new(),
        }
    }

    /// Shared registry state.
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Shared registry state, for attribute and policy writes.
    pub fn store_mut(&mut self) -> &mut TokenStore {
        &mut self.store
    }

    /// Committed combinations.
    pub fn combinations(&self) -> &CombinationSet {
        &self.combinations
    }

    /// Classify raw slots. Pure.
    ///
    /// Trailing empty slots are ignored; an empty slot before a word is an
    /// `InvalidLength`.
    pub fn verify<S: AsRef<str>>(&self, slots: &[S]) -> Outcome {
        if slots.len() > MAX_WORDS {
            return Outcome::InvalidCount(slots.len());
        }
        let used = slots
            .iter()
            .rposition(|s| !s.as_ref().is_empty())
            .map_or(0, |last| last + 1);
        if used == 0 {
            return Outcome::InvalidCount(0);
        }

        let mut words = Vec::with_capacity(used);
        for (slot, raw) in slots[..used].iter().enumerate() {
            let raw = raw.as_ref();
            if raw.is_empty() || raw.len() > MAX_WORD_LEN {
                return Outcome::InvalidLength {
                    slot,
                    len: raw.len(),
                };
            }
            match Word::new(raw) {
                Ok(word) => words.push(word),
                Err(_) => return Outcome::InvalidCharacter { slot },
            }
        }

        match WordTuple::new(words) {
            Ok(tuple) if self.combinations.contains(&tuple) => {
                Outcome::CombinationUsed(tuple.combination_key())
            }
            Ok(tuple) => Outcome::Valid(tuple),
            Err(_) => Outcome::InvalidCount(used),
        }
    }

    /// Verify one tuple and wrap it for commit.
    pub fn prepare<S: AsRef<str>>(&self, slots: &[S]) -> Result<PendingWords, RegistryError> {
        let tuple = self.verify(slots).into_result()?;
        Ok(PendingWords { tuple })
    }

    /// Verify a batch. No two items may reduce to the same combination.
    pub fn prepare_many<S: AsRef<str>>(
        &self,
        items: &[Vec<S>],
    ) -> Result<Vec<PendingWords>, RegistryError> {
        let mut seen = HashSet::new();
        let mut pending = Vec::with_capacity(items.len());
        for slots in items {
            let item = self.prepare(slots.as_slice())?;
            let combination = item.tuple.combination_key();
            if !seen.insert(combination.clone()) {
                return Err(RegistryError::CombinationUsed { combination });
            }
            pending.push(item);
        }
        Ok(pending)
    }

    /// Commit a verified tuple: record it, add the combination, and store
    /// the space-joined words as the display name.
    pub fn commit(&mut self, pending: PendingWords) -> SequenceId {
        let tuple = pending.tuple;
        let id = self
            .store
            .issue_record(tuple.combination_key(), &tuple.joined());
        self.combinations.commit(&tuple);
        id
    }

    /// Prepare and commit in one step.
    pub fn issue<S: AsRef<str>>(&mut self, slots: &[S]) -> Result<SequenceId, RegistryError> {
        let pending = self.prepare(slots)?;
        Ok(self.commit(pending))
    }

    /// Words of `id`, in slot order.
    pub fn words_of(&self, id: SequenceId) -> Result<Vec<String>, RegistryError> {
        let record = self.store.record(id)?;
        Ok(record
            .canonical_key
            .split(COMBINATION_SEPARATOR)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect())
    }
}
