//! Qualifiers and qualifier patterns.
//!
//! A [`Qualifier`] is the exact key/value tag set of a capability or intent.
//! A [`QualifierPattern`] is what intentions declare: each entry is either an
//! exact value, a required key with any value (`'*'`), or an optional key
//! (`'?'`). The entry `'*': '*'` allows keys the pattern does not name.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Wildcard token for values and keys.
pub const WILDCARD: &str = "*";

/// Optional-value token.
pub const OPTIONAL: &str = "?";

/// Key/value tag set addressing a capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Qualifier(HashMap<String, String>);

impl Qualifier {
    /// Create an empty qualifier.
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Add an entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the qualifier has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries sorted lexicographically by key.
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Qualifier {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.sorted_entries().into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key:?}:{value:?}")?;
        }
        f.write_str("}")
    }
}

/// How a single qualifier value is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuePattern {
    /// The key must be present with exactly this value.
    Exact(String),
    /// The key must be present with any value.
    Any,
    /// The key may be absent or carry any value.
    Optional,
}

impl ValuePattern {
    fn parse(raw: &str) -> Self {
        match raw {
            WILDCARD => Self::Any,
            OPTIONAL => Self::Optional,
            other => Self::Exact(other.to_string()),
        }
    }

    fn as_raw(&self) -> &str {
        match self {
            Self::Exact(value) => value,
            Self::Any => WILDCARD,
            Self::Optional => OPTIONAL,
        }
    }
}

/// Typed matcher over qualifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct QualifierPattern {
    entries: BTreeMap<String, ValuePattern>,
    wildcard_keys: bool,
}

impl QualifierPattern {
    /// Pattern matching only the empty qualifier.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pattern matching every qualifier.
    #[must_use]
    pub fn any() -> Self {
        Self {
            entries: BTreeMap::new(),
            wildcard_keys: true,
        }
    }

    /// Build a pattern from raw `'*'`/`'?'` notation.
    #[must_use]
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut pattern = Self::default();
        for (key, value) in entries {
            let key = key.into();
            if key == WILDCARD {
                pattern.wildcard_keys = true;
            } else {
                pattern.entries.insert(key, ValuePattern::parse(value.as_ref()));
            }
        }
        pattern
    }

    /// Pattern matching exactly the given qualifier.
    #[must_use]
    pub fn exact(qualifier: &Qualifier) -> Self {
        Self {
            entries: qualifier
                .iter()
                .map(|(k, v)| (k.to_string(), ValuePattern::Exact(v.to_string())))
                .collect(),
            wildcard_keys: false,
        }
    }

    /// Whether keys not named by the pattern are accepted.
    #[must_use]
    pub fn allows_wildcard_keys(&self) -> bool {
        self.wildcard_keys
    }

    /// Whether the pattern uses any wildcard.
    #[must_use]
    pub fn has_wildcards(&self) -> bool {
        self.wildcard_keys
            || self
                .entries
                .values()
                .any(|v| !matches!(v, ValuePattern::Exact(_)))
    }

    /// Evaluate the pattern against a qualifier.
    #[must_use]
    pub fn matches(&self, qualifier: &Qualifier) -> bool {
        let named_ok = self.entries.iter().all(|(key, pattern)| {
            match (pattern, qualifier.get(key)) {
                (ValuePattern::Exact(expected), Some(actual)) => expected == actual,
                (ValuePattern::Any | ValuePattern::Optional, Some(_))
                | (ValuePattern::Optional, None) => true,
                (ValuePattern::Exact(_) | ValuePattern::Any, None) => false,
            }
        });
        if !named_ok {
            return false;
        }
        self.wildcard_keys || qualifier.iter().all(|(key, _)| self.entries.contains_key(key))
    }
}

impl From<HashMap<String, String>> for QualifierPattern {
    fn from(value: HashMap<String, String>) -> Self {
        Self::from_entries(value)
    }
}

impl From<QualifierPattern> for HashMap<String, String> {
    fn from(value: QualifierPattern) -> Self {
        let mut raw: HashMap<String, String> = value
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.as_raw().to_string()))
            .collect();
        if value.wildcard_keys {
            raw.insert(WILDCARD.to_string(), WILDCARD.to_string());
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(entries: &[(&str, &str)]) -> Qualifier {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_qualifier_equality_ignores_insertion_order() {
        let a = Qualifier::new().with("a", "1").with("b", "2");
        let b = Qualifier::new().with("b", "2").with("a", "1");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), r#"{"a":"1","b":"2"}"#);
    }

    #[test]
    fn test_exact_pattern() {
        let pattern = QualifierPattern::from_entries([("component", "contact")]);
        assert!(pattern.matches(&q(&[("component", "contact")])));
        assert!(!pattern.matches(&q(&[("component", "other")])));
        assert!(!pattern.matches(&q(&[("component", "contact"), ("extra", "x")])));
        assert!(!pattern.matches(&Qualifier::new()));
    }

    #[test]
    fn test_any_value_requires_key() {
        let pattern = QualifierPattern::from_entries([("component", "*")]);
        assert!(pattern.matches(&q(&[("component", "anything")])));
        assert!(!pattern.matches(&Qualifier::new()));
    }

    #[test]
    fn test_optional_value() {
        let pattern = QualifierPattern::from_entries([("component", "contact"), ("mode", "?")]);
        assert!(pattern.matches(&q(&[("component", "contact")])));
        assert!(pattern.matches(&q(&[("component", "contact"), ("mode", "edit")])));
        assert!(!pattern.matches(&q(&[("mode", "edit")])));
    }

    #[test]
    fn test_wildcard_keys() {
        let pattern = QualifierPattern::from_entries([("*", "*")]);
        assert!(pattern.allows_wildcard_keys());
        assert!(pattern.matches(&Qualifier::new()));
        assert!(pattern.matches(&q(&[("a", "1"), ("b", "2")])));

        let scoped = QualifierPattern::from_entries([("entity", "person"), ("*", "*")]);
        assert!(scoped.matches(&q(&[("entity", "person"), ("id", "42")])));
        assert!(!scoped.matches(&q(&[("entity", "company")])));
    }

    #[test]
    fn test_empty_pattern_matches_only_empty_qualifier() {
        let pattern = QualifierPattern::empty();
        assert!(pattern.matches(&Qualifier::new()));
        assert!(!pattern.matches(&q(&[("a", "1")])));
    }

    #[test]
    fn test_pattern_serde_notation() {
        let pattern: QualifierPattern =
            serde_json::from_value(serde_json::json!({"entity": "*", "*": "*"})).unwrap();
        assert!(pattern.has_wildcards());
        assert!(pattern.allows_wildcard_keys());

        let raw: HashMap<String, String> = pattern.into();
        assert_eq!(raw.get("entity").map(String::as_str), Some("*"));
        assert_eq!(raw.get("*").map(String::as_str), Some("*"));
    }
}
