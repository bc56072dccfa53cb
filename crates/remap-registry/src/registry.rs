//! An ordered, immutable identifier registry for one category at one
//! protocol version.

use std::collections::BTreeMap;

use crate::error::{RegistryError, RegistryResult};

/// A single identifier record: a contiguous numeric position and its key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentifierRecord {
    /// Position of the identifier within its registry (0..N-1).
    pub index: u32,
    /// Canonical name, unique within the registry.
    pub key: String,
}

/// An ordered sequence of identifier records for one category at one
/// protocol version.
///
/// Index assignment is positional and exactly preserves the input ordering,
/// since the runtime protocol representation addresses identifiers by
/// ordinal. A registry is immutable once loaded: the key→index lookup is
/// built at construction and never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registry {
    keys: Vec<String>,
    by_key: BTreeMap<String, u32>,
}

impl Registry {
    /// Build a registry from keys in registry order.
    ///
    /// Fails with [`RegistryError::DuplicateKey`] if two keys are equal.
    pub fn from_keys(keys: impl IntoIterator<Item = String>) -> RegistryResult<Self> {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut by_key = BTreeMap::new();
        for (index, key) in keys.iter().enumerate() {
            if by_key.insert(key.clone(), index as u32).is_some() {
                return Err(RegistryError::DuplicateKey { key: key.clone() });
            }
        }
        Ok(Self { keys, by_key })
    }

    /// Number of identifiers in the registry.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the registry holds no identifiers.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The key at a given index, if in bounds.
    pub fn key(&self, index: u32) -> Option<&str> {
        self.keys.get(index as usize).map(String::as_str)
    }

    /// The index of a key, if present.
    pub fn index_of(&self, key: &str) -> Option<u32> {
        self.by_key.get(key).copied()
    }

    /// Returns `true` if the registry contains the key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// All keys in registry order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Iterate records in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.keys
            .iter()
            .enumerate()
            .map(|(i, k)| (i as u32, k.as_str()))
    }

    /// Materialize all records in index order.
    pub fn records(&self) -> Vec<IdentifierRecord> {
        self.keys
            .iter()
            .enumerate()
            .map(|(i, k)| IdentifierRecord {
                index: i as u32,
                key: k.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(keys: &[&str]) -> Registry {
        Registry::from_keys(keys.iter().map(|k| k.to_string())).unwrap()
    }

    #[test]
    fn preserves_input_order() {
        let r = reg(&["stone", "dirt", "grass_block"]);
        assert_eq!(r.len(), 3);
        assert_eq!(r.key(0), Some("stone"));
        assert_eq!(r.key(1), Some("dirt"));
        assert_eq!(r.key(2), Some("grass_block"));
    }

    #[test]
    fn index_lookup_matches_position() {
        let r = reg(&["stone", "dirt"]);
        assert_eq!(r.index_of("dirt"), Some(1));
        assert_eq!(r.index_of("gravel"), None);
    }

    #[test]
    fn duplicate_key_rejected() {
        let err = Registry::from_keys(["stone".to_string(), "stone".to_string()]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateKey { key } if key == "stone"));
    }

    #[test]
    fn records_are_contiguous() {
        let r = reg(&["a", "b", "c"]);
        let records = r.records();
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.index, i as u32);
        }
    }

    #[test]
    fn empty_registry() {
        let r = Registry::from_keys(Vec::new()).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.key(0), None);
    }
}
