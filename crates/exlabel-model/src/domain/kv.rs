use serde::{Deserialize, Serialize};

/// Single environment variable handed to the labelling process.
///
/// Both fields are plain UTF-8 strings; OS-level restrictions are checked
/// by the exec layer right before the process is spawned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValue {
    /// Variable name.
    key: String,
    /// Variable value.
    value: String,
}

impl KeyValue {
    /// Create a new key–value pair.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the value.
    pub fn value(&self) -> &str {
        &self.value
    }
}
