//! # Canonical Serialization — Byte-Stable JSON
//!
//! `CanonicalBytes` is the only path by which a rendered document or a
//! digest input becomes bytes. External indexers diff document bytes over
//! time, so two identical registry states must never serialize
//! differently.
//!
//! ## Rules
//!
//! 1. **Reject floats.** Every value in a document is a string, an integer,
//!    a boolean, or null.
//! 2. **Sorted object keys, compact separators.** Serialization goes through
//!    `serde_jcs` (RFC 8785).
//! 3. **Arrays keep their order.** Attribute lists are arrays, so insertion
//!    order survives canonicalization untouched.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - Built only by `CanonicalBytes::new()` or `CanonicalBytes::from_text()`.
/// - No float values.
/// - Object keys sorted, no insignificant whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// float, `CanonicalizationError::SerializationFailed` if serialization
    /// fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Canonical bytes of a single JSON string.
    ///
    /// Infallible: a string value has no floats and no keys to sort, and
    /// in-memory string serialization cannot fail.
    pub fn from_text(text: &str) -> Self {
        let s = serde_json::to_string(text).unwrap_or_default();
        Self(s.into_bytes())
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the owned byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(arr) => arr.iter().try_for_each(reject_floats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_keys_compact() {
        let data = serde_json::json!({"name": "Crimson", "attributes": [], "description": "d"});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"attributes":[],"description":"d","name":"Crimson"}"#);
    }

    #[test]
    fn test_attribute_order_preserved() {
        let data = serde_json::json!({
            "attributes": [
                {"value": "Crimson", "trait_type": "Name"},
                {"value": "#000000", "trait_type": "Foreground"},
                {"value": "#FFFFFF", "trait_type": "Background"}
            ]
        });
        let cb = CanonicalBytes::new(&data).unwrap();
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(
            s,
            r##"{"attributes":[{"trait_type":"Name","value":"Crimson"},{"trait_type":"Foreground","value":"#000000"},{"trait_type":"Background","value":"#FFFFFF"}]}"##
        );
    }

    #[test]
    fn test_float_rejection() {
        let data = serde_json::json!({"attributes": [{"value": 0.5}]});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::FloatRejected(f)) => assert_eq!(f, 0.5),
            other => panic!("Expected FloatRejected, got: {other:?}"),
        }
    }

    #[test]
    fn test_integer_accepted() {
        let data = serde_json::json!({"count": 3});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"count":3}"#);
    }

    #[test]
    fn test_from_text_matches_new() {
        let a = CanonicalBytes::from_text("ALPHA|BETA|");
        let b = CanonicalBytes::new(&"ALPHA|BETA|").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_object() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
        assert!(!cb.is_empty());
        assert_eq!(cb.len(), 2);
    }

    #[test]
    fn test_string_value() {
        let cb = CanonicalBytes::new(&"ALPHA|BETA|").unwrap();
        assert_eq!(cb.into_bytes(), b"\"ALPHA|BETA|\"".to_vec());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn json_value_no_floats() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9#_ ]{0,20}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z_]{1,10}", inner, 0..6)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn canonical_bytes_deterministic(value in json_value_no_floats()) {
            let a = CanonicalBytes::new(&value).unwrap();
            let b = CanonicalBytes::new(&value).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        #[test]
        fn canonical_bytes_reparse_to_same_value(value in json_value_no_floats()) {
            let cb = CanonicalBytes::new(&value).unwrap();
            let parsed: Value = serde_json::from_slice(cb.as_bytes()).unwrap();
            prop_assert_eq!(parsed, value);
        }
    }
}
