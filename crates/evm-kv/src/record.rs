use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A key/value row as returned by prefix queries.
///
/// The server also stores `id`, `created_at` and `project_id`; the client
/// never selects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    /// Opaque JSON document. `Null` when the column is null.
    #[serde(default)]
    pub value: Value,
}

impl Record {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Returns the namespace part of the key (text before the first `:`).
    pub fn namespace(&self) -> Option<&str> {
        self.key.split_once(':').map(|(ns, _)| ns)
    }
}
