//! Case-normalized identifiers.
//!
//! Kumir identifiers are case-insensitive and may contain spaces
//! (`положить маркер`). A `Name` stores the normalized key: lowercase,
//! with every run of whitespace collapsed to a single space.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Normalized identifier. Cloning is a reference-count bump.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(
    feature = "json",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub struct Name(Arc<str>);

impl Name {
    /// Normalize and wrap a raw identifier.
    pub fn new(raw: &str) -> Self {
        Name(Arc::from(normalize(raw)))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

impl From<&str> for Name {
    fn from(raw: &str) -> Self {
        Name::new(raw)
    }
}

impl From<String> for Name {
    fn from(raw: String) -> Self {
        Name::new(&raw)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.0.to_string()
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", &*self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive() {
        assert_eq!(Name::new("Сумма"), Name::new("СУММА"));
        assert_eq!(Name::new("МаксЦел").as_str(), "максцел");
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(Name::new("  положить\t  Маркер ").as_str(), "положить маркер");
        assert_eq!(Name::new("слева стена"), Name::new("слева   стена"));
    }

    #[test]
    fn borrow_matches_hash_of_key() {
        let mut set = std::collections::HashSet::new();
        set.insert(Name::new("Влево"));
        assert!(set.contains("влево"));
    }
}
