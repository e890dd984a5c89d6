//! # Check Subcommand
//!
//! Runs the normalizer and validator over one value and prints the
//! canonical form and the verdict. Registry state is not consulted, so a
//! valid value may still be taken.
//!
//! ```bash
//! hue check key '#ff00aa'
//! hue check name Sunset
//! hue check word MOON
//! ```

use anyhow::Result;
use clap::{Args, ValueEnum};

use hue_core::validate::derived_key;
use hue_core::{canonicalize_key, canonicalize_name, ColorKey, DisplayName, Word};

/// What kind of value to check.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// A `#RRGGBB` colour key.
    Key,
    /// A colour display name.
    Name,
    /// One word of a word identifier.
    Word,
}

/// Arguments for the `hue check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Kind of value.
    #[arg(value_enum)]
    pub kind: CheckKind,

    /// Raw value as a caller would submit it.
    pub value: String,
}

/// Verdict for one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub canonical: String,
    pub valid: bool,
    /// Why the value is invalid, or a note about a valid one.
    pub note: Option<String>,
}

impl std::fmt::Display for CheckReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "canonical: {}", self.canonical)?;
        write!(f, "valid:     {}", self.valid)?;
        if let Some(note) = &self.note {
            write!(f, "\nnote:      {note}")?;
        }
        Ok(())
    }
}

/// Check `value` as `kind`.
pub fn check(kind: CheckKind, value: &str) -> CheckReport {
    match kind {
        CheckKind::Key => match ColorKey::parse(value) {
            Ok(key) => CheckReport {
                canonical: key.to_string(),
                valid: true,
                note: None,
            },
            Err(err) => CheckReport {
                canonical: canonicalize_key(value),
                valid: false,
                note: Some(err.to_string()),
            },
        },
        CheckKind::Name => match DisplayName::new(value) {
            Ok(name) => CheckReport {
                canonical: name.canonical(),
                valid: true,
                note: derived_key(value).map(|key| format!("only usable by {key}")),
            },
            Err(err) => CheckReport {
                canonical: canonicalize_name(value),
                valid: false,
                note: Some(err.to_string()),
            },
        },
        CheckKind::Word => match Word::new(value) {
            Ok(word) => CheckReport {
                canonical: word.as_str().to_string(),
                valid: true,
                note: None,
            },
            Err(err) => CheckReport {
                canonical: value.to_string(),
                valid: false,
                note: Some(err.to_string()),
            },
        },
    }
}

/// Execute the check subcommand. Exit code 0 when valid, 1 otherwise.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let report = check(args.kind, &args.value);
    tracing::debug!(kind = ?args.kind, valid = report.valid, "checked value");
    println!("{report}");
    Ok(if report.valid { 0 } else { 1 })
}
