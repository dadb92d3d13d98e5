use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// Environment passed to the labelling process.
///
/// Stored as an ordered list of key–value pairs; keys are expected to be unique
/// (the exec layer refuses to build an `Env` with colliding keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(Vec<KeyValue>);

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create an empty environment with room for `n` entries.
    pub fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the environment is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|kv| kv.key())
    }

    /// Get the value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|kv| kv.key() == key).map(|kv| kv.value())
    }

    /// Append a key–value pair.
    ///
    /// No uniqueness check is done here; `exlabel_exec::materialize` rejects collisions itself.
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.push(KeyValue::new(key, value));
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Env {
    type Item = &'a KeyValue;
    type IntoIter = std::slice::Iter<'a, KeyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
