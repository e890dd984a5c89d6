//! # Identity Newtypes
//!
//! Every identifier the registries handle has its own type, built only
//! through a validating constructor. A `ColorKey` is always canonical and
//! well-formed; a `DisplayName` is always 1–32 ASCII alphanumerics; a
//! `WordTuple` always has one to three uppercase words.
//!
//! Deserialization goes through the same constructors (`try_from`), so a
//! record loaded from JSON upholds the same invariants as one built in code.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::normalize::{canonicalize_key, canonicalize_name};
use crate::validate::{is_valid_display_name, is_valid_key, is_valid_word};

/// Number of distinct six-hex-digit colours.
pub const COLOR_SPACE_SIZE: u64 = 1 << 24;

/// Maximum number of words in one word identifier.
pub const MAX_WORDS: usize = 3;

/// Separator between word slots in a combination key.
pub const COMBINATION_SEPARATOR: char = '|';

const MAX_TRAIT_NAME_LEN: usize = 32;
const MAX_ACCOUNT_ID_LEN: usize = 128;

// ─── SequenceId ──────────────────────────────────────────────────────

/// Position of an identifier in issuance order. Allocated from a
/// per-registry counter, contiguous from zero, never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SequenceId(pub u64);

impl SequenceId {
    /// The raw integer.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Index into a dense record table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SequenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── ColorKey ────────────────────────────────────────────────────────

/// Canonical colour key, e.g. `#FF00AA`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorKey(String);

impl ColorKey {
    /// Canonicalize and validate a raw key.
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let key = canonicalize_key(raw);
        if !is_valid_key(&key) {
            return Err(RegistryError::InvalidInput(format!(
                "colour key must be '#' followed by six hex digits, got {raw:?}"
            )));
        }
        Ok(Self(key))
    }

    /// The canonical key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The six hex digits without the leading `#`.
    pub fn hex_digits(&self) -> &str {
        &self.0[1..]
    }

    /// The name a colour gets when none is given: its own hex digits.
    pub fn natural_name(&self) -> DisplayName {
        DisplayName(self.hex_digits().to_string())
    }
}

impl TryFrom<String> for ColorKey {
    type Error = RegistryError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<ColorKey> for String {
    fn from(key: ColorKey) -> Self {
        key.0
    }
}

impl std::fmt::Display for ColorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── DisplayName ─────────────────────────────────────────────────────

/// A display name as the caller spelled it. Uniqueness is decided on
/// [`DisplayName::canonical`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate a raw display name. The spelling is kept as given.
    pub fn new(raw: &str) -> Result<Self, RegistryError> {
        if !is_valid_display_name(raw) {
            return Err(RegistryError::InvalidInput(format!(
                "display name must be 1-32 ASCII letters or digits, got {raw:?}"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// The name as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded reservation key.
    pub fn canonical(&self) -> String {
        canonicalize_name(&self.0)
    }
}

impl TryFrom<String> for DisplayName {
    type Error = RegistryError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> Self {
        name.0
    }
}

impl std::fmt::Display for DisplayName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Word / WordTuple ────────────────────────────────────────────────

/// A single uppercase word, 1–16 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

impl Word {
    /// Validate a raw word.
    pub fn new(raw: &str) -> Result<Self, RegistryError> {
        if !is_valid_word(raw) {
            return Err(RegistryError::InvalidInput(format!(
                "word must be 1-16 uppercase letters or digits, got {raw:?}"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// The word.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Word {
    type Error = RegistryError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.0
    }
}

/// An ordered tuple of one to three words.
///
/// Words are contiguous from the first slot. Missing trailing slots are not
/// stored, so `("A")`, `("A", "")` and `("A", "", "")` all verify to the
/// same tuple and the same [`combination_key`](WordTuple::combination_key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Word>", into = "Vec<Word>")]
pub struct WordTuple(Vec<Word>);

impl WordTuple {
    /// Build a tuple from already-validated words.
    pub fn new(words: Vec<Word>) -> Result<Self, RegistryError> {
        if words.is_empty() || words.len() > MAX_WORDS {
            return Err(RegistryError::InvalidInput(format!(
                "a word identifier has 1-{MAX_WORDS} words, got {}",
                words.len()
            )));
        }
        Ok(Self(words))
    }

    /// The words, in order.
    pub fn words(&self) -> &[Word] {
        &self.0
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a tuple holds at least one word.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Words joined by a single space, used as the display name.
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(Word::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// All three slots joined with `|`, empty slots as empty strings.
    pub fn combination_key(&self) -> String {
        let mut slots: Vec<&str> = self.0.iter().map(Word::as_str).collect();
        slots.resize(MAX_WORDS, "");
        slots.join(&COMBINATION_SEPARATOR.to_string())
    }
}

impl TryFrom<Vec<Word>> for WordTuple {
    type Error = RegistryError;

    fn try_from(words: Vec<Word>) -> Result<Self, Self::Error> {
        Self::new(words)
    }
}

impl From<WordTuple> for Vec<Word> {
    fn from(tuple: WordTuple) -> Self {
        tuple.0
    }
}

// ─── TraitName ───────────────────────────────────────────────────────

/// Name of an attribute trait: 1–32 printable ASCII bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TraitName(String);

/// Trait under which every identifier's display name is stored.
pub const DISPLAY_NAME_TRAIT: &str = "Name";

impl TraitName {
    /// The reserved display-name trait.
    pub fn display_name() -> Self {
        Self(DISPLAY_NAME_TRAIT.to_string())
    }

    /// Whether this is the reserved display-name trait.
    pub fn is_display_name(&self) -> bool {
        self.0 == DISPLAY_NAME_TRAIT
    }

    /// Validate a raw trait name.
    pub fn new(raw: &str) -> Result<Self, RegistryError> {
        let ok = (1..=MAX_TRAIT_NAME_LEN).contains(&raw.len())
            && raw.bytes().all(|b| b.is_ascii_graphic() || b == b' ');
        if !ok || raw.trim() != raw {
            return Err(RegistryError::InvalidInput(format!(
                "trait name must be 1-{MAX_TRAIT_NAME_LEN} printable ASCII bytes \
                 without surrounding spaces, got {raw:?}"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// The trait name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TraitName {
    type Error = RegistryError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl From<TraitName> for String {
    fn from(name: TraitName) -> Self {
        name.0
    }
}

impl std::fmt::Display for TraitName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── AccountId ───────────────────────────────────────────────────────

/// Opaque identity of a caller, holder, or the registry owner.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Validate a raw account identity: non-empty, no whitespace.
    pub fn new(raw: &str) -> Result<Self, RegistryError> {
        if raw.is_empty()
            || raw.len() > MAX_ACCOUNT_ID_LEN
            || raw.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(RegistryError::InvalidInput(format!(
                "account id must be 1-{MAX_ACCOUNT_ID_LEN} bytes without whitespace, got {raw:?}"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// The identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = RegistryError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
