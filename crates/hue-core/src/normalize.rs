//! # Normalizer
//!
//! Pure functions that fold raw input into the comparison keys used by the
//! uniqueness maps. Both are total: every string has a canonical form,
//! including strings the validator later rejects.

/// Canonical form of a colour key: `a`-`f` folded to `A`-`F`.
///
/// Only the hex alphabet is touched. `#ff00aa` becomes `#FF00AA`, while
/// `#gg00aa` becomes `#gg00AA` and is left for the validator to reject.
pub fn canonicalize_key(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            'a'..='f' => c.to_ascii_uppercase(),
            other => other,
        })
        .collect()
}

/// Canonical form of a display name: ASCII letters lowercased.
///
/// No trimming and no Unicode folding; comparison is case-insensitive over
/// ASCII and byte-exact otherwise.
pub fn canonicalize_name(raw: &str) -> String {
    raw.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn key_folds_only_hex_letters() {
        assert_eq!(canonicalize_key("#ff00aa"), "#FF00AA");
        assert_eq!(canonicalize_key("#Ff00aA"), "#FF00AA");
        assert_eq!(canonicalize_key("#gg00aa"), "#gg00AA");
        assert_eq!(canonicalize_key("xyz"), "xyz");
    }

    #[test]
    fn name_lowercases_ascii_only() {
        assert_eq!(canonicalize_name("Crimson"), "crimson");
        assert_eq!(canonicalize_name("FF00AA"), "ff00aa");
        assert_eq!(canonicalize_name(" A b "), " a b ");
        assert_eq!(canonicalize_name("ÉCLAIR"), "Éclair");
    }

    proptest! {
        #[test]
        fn canonicalize_key_idempotent(s in ".{0,24}") {
            let once = canonicalize_key(&s);
            prop_assert_eq!(canonicalize_key(&once), once);
        }

        #[test]
        fn canonicalize_name_idempotent(s in ".{0,40}") {
            let once = canonicalize_name(&s);
            prop_assert_eq!(canonicalize_name(&once), once);
        }

        #[test]
        fn canonicalize_key_preserves_length(s in ".{0,24}") {
            prop_assert_eq!(canonicalize_key(&s).len(), s.len());
        }
    }
}
