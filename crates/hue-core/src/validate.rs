//! # Validator
//!
//! Byte-level well-formedness predicates. These never allocate except in
//! [`names_match_key`], which has to build the key a name spells.

use crate::normalize::canonicalize_name;

/// Length of a colour key: `#` plus six hex digits.
pub const KEY_LEN: usize = 7;
/// Longest accepted display name, in bytes.
pub const MAX_DISPLAY_NAME_LEN: usize = 32;
/// Longest accepted word, in bytes.
pub const MAX_WORD_LEN: usize = 16;

/// `#` followed by exactly six hex digits, either case.
pub fn is_valid_key(key: &str) -> bool {
    let bytes = key.as_bytes();
    bytes.len() == KEY_LEN && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

/// 1 to 32 bytes, ASCII letters and digits only.
pub fn is_valid_display_name(name: &str) -> bool {
    (1..=MAX_DISPLAY_NAME_LEN).contains(&name.len())
        && name.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// 1 to 16 bytes, uppercase ASCII letters and digits only.
pub fn is_valid_word(word: &str) -> bool {
    (1..=MAX_WORD_LEN).contains(&word.len())
        && word
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Whether `name` may be used as the display name of `key`.
///
/// A name that spells a colour key (six hex digits, any case) may only be
/// used by that colour. Any other name passes. `key` is compared in
/// canonical form.
pub fn names_match_key(key: &str, name: &str) -> bool {
    match derived_key(name) {
        Some(derived) => derived == crate::normalize::canonicalize_key(key),
        None => true,
    }
}

/// The colour key a display name spells, if it spells one.
pub fn derived_key(name: &str) -> Option<String> {
    let derived = format!("#{}", canonicalize_name(name).to_ascii_uppercase());
    is_valid_key(&derived).then_some(derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn keys() {
        assert!(is_valid_key("#FF00AA"));
        assert!(is_valid_key("#ff00aa"));
        assert!(is_valid_key("#000000"));
        assert!(!is_valid_key("FF00AA"));
        assert!(!is_valid_key("#FF00A"));
        assert!(!is_valid_key("#FF00AAA"));
        assert!(!is_valid_key("#GG00AA"));
        assert!(!is_valid_key("#FF 0AA"));
        assert!(!is_valid_key(""));
    }

    #[test]
    fn display_names() {
        assert!(is_valid_display_name("Crimson"));
        assert!(is_valid_display_name("a"));
        assert!(is_valid_display_name(&"x".repeat(32)));
        assert!(!is_valid_display_name(&"x".repeat(33)));
        assert!(!is_valid_display_name(""));
        assert!(!is_valid_display_name("Deep Red"));
        assert!(!is_valid_display_name("red!"));
        assert!(!is_valid_display_name("rouge\u{e9}"));
    }

    #[test]
    fn words_reject_lowercase() {
        assert!(is_valid_word("ALPHA"));
        assert!(is_valid_word("R2D2"));
        assert!(is_valid_word(&"Z".repeat(16)));
        assert!(!is_valid_word(&"Z".repeat(17)));
        assert!(!is_valid_word(""));
        assert!(!is_valid_word("Alpha"));
        assert!(!is_valid_word("AL PHA"));
    }

    #[test]
    fn hex_shaped_names_must_spell_their_key() {
        assert!(names_match_key("#FF00AA", "ff00aa"));
        assert!(names_match_key("#FF00AA", "FF00AA"));
        assert!(names_match_key("#ff00aa", "Ff00Aa"));
        assert!(!names_match_key("#FF00AA", "ff00ab"));
        assert!(!names_match_key("#000000", "FFFFFF"));
    }

    #[test]
    fn non_hex_names_always_pass() {
        assert!(names_match_key("#FF00AA", "Crimson"));
        assert!(names_match_key("#FF00AA", "ff00a"));
        assert!(names_match_key("#FF00AA", "ff00aag"));
        assert!(derived_key("Crimson").is_none());
        assert_eq!(derived_key("abcdef").as_deref(), Some("#ABCDEF"));
    }

    proptest! {
        #[test]
        fn a_colour_always_matches_its_own_digits(n in 0u32..0x0100_0000) {
            let key = format!("#{n:06X}");
            prop_assert!(is_valid_key(&key));
            prop_assert!(names_match_key(&key, &key[1..]));
            prop_assert!(names_match_key(&key, &key[1..].to_ascii_lowercase()));
        }

        #[test]
        fn valid_words_are_valid_names(w in "[A-Z0-9]{1,16}") {
            prop_assert!(is_valid_word(&w));
            prop_assert!(is_valid_display_name(&w));
        }
    }
}
