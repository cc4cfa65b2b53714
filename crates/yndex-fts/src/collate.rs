//! Keys and key collation.
//!
//! Collation normalizes a caller-supplied key into the canonical form used
//! for every engine operation. Two keys that differ only in non-canonical
//! respects (case, surrounding whitespace) must resolve to the same engine
//! entry.
//!
//! Collation is a pure function: no locks, no failure modes. The adapter
//! applies it before acquiring any lock.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A caller-supplied index key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// Textual key.
    Text(String),
    /// Integer key.
    Integer(i64),
}

impl Key {
    /// Create a text key.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Create an integer key.
    pub fn integer(value: i64) -> Self {
        Self::Integer(value)
    }

    /// The type of this key, for validation against an index's declared
    /// key type.
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::Text(_) => KeyType::Text,
            Self::Integer(_) => KeyType::Integer,
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Integer(i) => write!(f, "{i}"),
        }
    }
}

/// The key type an index is declared over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    /// Textual keys.
    #[default]
    Text,
    /// Integer keys.
    Integer,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Integer => write!(f, "integer"),
        }
    }
}

/// Key collation mode.
///
/// Controls how keys are normalized before engine delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collation {
    /// Keys are used exactly as supplied.
    Binary,
    /// Text keys are trimmed and case-folded; other key types pass
    /// through unchanged.
    #[default]
    CaseInsensitive,
}

impl Collation {
    /// Normalize a key into its canonical form.
    pub fn collate(&self, key: Key) -> Key {
        match (self, key) {
            (Self::CaseInsensitive, Key::Text(s)) => Key::Text(s.trim().to_lowercase()),
            (_, key) => key,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_binary_collation_is_identity() {
        let key = Key::text("  Mixed Case  ");
        assert_eq!(Collation::Binary.collate(key.clone()), key);
    }

    #[test]
    fn test_case_insensitive_folds_text() {
        let collated = Collation::CaseInsensitive.collate(Key::text("  Alice "));
        assert_eq!(collated, Key::text("alice"));
    }

    #[test]
    fn test_case_insensitive_passes_integers_through() {
        let key = Key::integer(42);
        assert_eq!(Collation::CaseInsensitive.collate(key.clone()), key);
    }

    #[test]
    fn test_key_type_reporting() {
        assert_eq!(Key::text("a").key_type(), KeyType::Text);
        assert_eq!(Key::integer(1).key_type(), KeyType::Integer);
    }

    #[test]
    fn test_key_from_conversions() {
        assert_eq!(Key::from("alice"), Key::text("alice"));
        assert_eq!(Key::from(7i64), Key::integer(7));
    }

    #[test]
    fn test_collation_serialization() {
        let json = serde_json::to_string(&Collation::CaseInsensitive).unwrap();
        assert_eq!(json, "\"case_insensitive\"");

        let parsed: Collation = serde_json::from_str("\"binary\"").unwrap();
        assert_eq!(parsed, Collation::Binary);
    }

    #[test]
    fn test_key_serialization_untagged() {
        assert_eq!(serde_json::to_string(&Key::text("a")).unwrap(), "\"a\"");
        assert_eq!(serde_json::to_string(&Key::integer(3)).unwrap(), "3");

        let parsed: Key = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(parsed, Key::text("bob"));
        let parsed: Key = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, Key::integer(12));
    }

    proptest! {
        #[test]
        fn test_collation_is_idempotent(s in "\\PC*") {
            let collation = Collation::CaseInsensitive;
            let once = collation.collate(Key::text(s));
            let twice = collation.collate(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_case_variants_collate_equal(s in "[a-zA-Z0-9 ]{0,32}") {
            let collation = Collation::CaseInsensitive;
            prop_assert_eq!(
                collation.collate(Key::text(s.to_uppercase())),
                collation.collate(Key::text(s.to_lowercase()))
            );
        }
    }
}
