//! Table-backed lookup.

use std::collections::HashMap;
use vdispatch_core::{LookupError, VersionLookup};

/// Answers from a fixed table; unknown subjects are `NotFound`.
///
/// Subject names are matched exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapLookup {
    versions: HashMap<String, String>,
}

impl MapLookup {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder style).
    pub fn with(mut self, subject: impl Into<String>, version: impl Into<String>) -> Self {
        self.insert(subject, version);
        self
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, subject: impl Into<String>, version: impl Into<String>) {
        self.versions.insert(subject.into(), version.into());
    }

    /// Remove an entry.
    pub fn remove(&mut self, subject: &str) -> Option<String> {
        self.versions.remove(subject)
    }

    /// The value for `subject`, if known.
    pub fn get(&self, subject: &str) -> Option<&str> {
        self.versions.get(subject).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MapLookup
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            versions: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl VersionLookup for MapLookup {
    fn resolve(&self, subject: &str) -> Result<String, LookupError> {
        self.get(subject)
            .map(str::to_string)
            .ok_or_else(|| LookupError::NotFound(subject.to_string()))
    }
}
