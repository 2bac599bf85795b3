//! Validated, order-independent filter specifications

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::criterion::{Criterion, FilterKey, Scope};

/// An immutable set of named filter criteria
///
/// Unknown names and values whose shape does not fit their name are dropped
/// at construction. Two specs built from the same criteria in any insertion
/// order are equal and share a digest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    criteria: BTreeMap<FilterKey, Criterion>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object; anything else yields an empty spec
    pub fn from_json(value: &Value) -> Self {
        let mut spec = Self::new();
        if let Value::Object(map) = value {
            for (name, raw) in map {
                let Some(key) = FilterKey::parse(name) else {
                    continue;
                };
                if let Some(criterion) = Criterion::from_json(raw) {
                    spec.insert(key, criterion);
                }
            }
        }
        spec
    }

    /// Parse a JSON document into a spec
    pub fn parse_json(s: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(s)?;
        Ok(Self::from_json(&value))
    }

    /// Return a copy with one more criterion; mismatched shapes are ignored
    pub fn with(mut self, key: FilterKey, criterion: Criterion) -> Self {
        self.insert(key, criterion);
        self
    }

    fn insert(&mut self, key: FilterKey, criterion: Criterion) {
        if key.accepts(&criterion) {
            self.criteria.insert(key, criterion);
        }
    }

    pub fn get(&self, key: FilterKey) -> Option<&Criterion> {
        self.criteria.get(&key)
    }

    pub fn contains(&self, key: FilterKey) -> bool {
        self.criteria.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &Criterion)> {
        self.criteria.iter().map(|(k, c)| (*k, c))
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Number of criteria in `scope` that actually constrain something
    pub fn active_count(&self, scope: Scope) -> usize {
        self.criteria
            .iter()
            .filter(|(k, c)| k.applies_to(scope) && c.is_active())
            .count()
    }

    /// Canonical serialization: JSON object with keys sorted by name
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// SHA-256 hex digest of the canonical serialization
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_json().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl Serialize for FilterSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted: BTreeMap<&'static str, &Criterion> =
            self.criteria.iter().map(|(k, c)| (k.as_str(), c)).collect();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (name, criterion) in sorted {
            map.serialize_entry(name, criterion)?;
        }
        map.end()
    }
}
