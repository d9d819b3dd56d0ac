//! Event domain on top of the key-value store.
//!
//! Schema (stable across the codebase):
//! - key: `event:<unix millis at creation>`
//! - value: `{ "name": string }`

use evm_kv::{KvError, KvStore, Record};
use serde::{Deserialize, Serialize};

/// Namespace prefix for event keys.
pub const EVENT_PREFIX: &str = "event:";

/// A named event as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// The record key (`event:<millis>`).
    pub id: String,
    pub name: String,
}

/// Stored document for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDoc {
    pub name: String,
}

impl Event {
    /// Builds an event from a prefix-query row.
    ///
    /// Returns `None` for rows outside the namespace or without a string `name`.
    pub fn from_record(record: Record) -> Option<Self> {
        if !record.key.starts_with(EVENT_PREFIX) {
            return None;
        }
        match serde_json::from_value::<EventDoc>(record.value) {
            Ok(doc) => Some(Self {
                id: record.key,
                name: doc.name,
            }),
            Err(err) => {
                tracing::warn!(key = %record.key, error = %err, "skipping malformed event");
                None
            }
        }
    }
}

/// Builds the key for an event created at `millis`.
pub fn event_key(millis: i64) -> String {
    format!("{EVENT_PREFIX}{millis}")
}

/// Key for an event created now.
pub fn new_event_key() -> String {
    event_key(chrono::Utc::now().timestamp_millis())
}

/// True when `name` has visible content. Names are stored as typed.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}

/// Event operations over any [`KvStore`].
///
/// Every method is a single store call; there is no local cache.
#[derive(Debug, Clone)]
pub struct EventBook<S> {
    store: S,
}

impl<S: KvStore> EventBook<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists all events in backend order.
    pub async fn list(&self) -> Result<Vec<Event>, KvError> {
        let records = self.store.get_with_prefix(EVENT_PREFIX).await?;
        Ok(records.into_iter().filter_map(Event::from_record).collect())
    }

    /// Creates an event under a fresh timestamp key.
    ///
    /// Returns `Ok(None)` without calling the store when the name is blank,
    /// and `Ok(None)` when the store rejects the write.
    pub async fn add(&self, name: &str) -> Result<Option<Event>, KvError> {
        self.add_with_key(new_event_key(), name).await
    }

    /// Creates an event under an explicit key.
    pub async fn add_with_key(&self, key: String, name: &str) -> Result<Option<Event>, KvError> {
        if !is_valid_name(name) {
            return Ok(None);
        }
        let doc = EventDoc {
            name: name.to_string(),
        };
        if self.store.set_as(&key, &doc).await? {
            tracing::info!(key = %key, "event added");
            Ok(Some(Event {
                id: key,
                name: doc.name,
            }))
        } else {
            Ok(None)
        }
    }

    /// Writes a new name for an existing event id.
    ///
    /// Blank names are a no-op returning `Ok(false)`.
    pub async fn rename(&self, id: &str, name: &str) -> Result<bool, KvError> {
        if !is_valid_name(name) {
            return Ok(false);
        }
        let ok = self
            .store
            .set_as(
                id,
                &EventDoc {
                    name: name.to_string(),
                },
            )
            .await?;
        if ok {
            tracing::info!(key = id, "event renamed");
        }
        Ok(ok)
    }

    /// Deletes an event. Deleting an unknown id succeeds.
    pub async fn remove(&self, id: &str) -> Result<bool, KvError> {
        let ok = self.store.delete(id).await?;
        if ok {
            tracing::info!(key = id, "event deleted");
        }
        Ok(ok)
    }
}
