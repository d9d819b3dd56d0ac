//! The key-value seam.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{KvError, Record};

/// Four-operation key-value store.
///
/// Implementations are plain request/response wrappers with no local state.
/// Write operations return `Ok(false)` when the backend rejects the write and
/// `Err` when the request could not be completed at all.
pub trait KvStore: Send + Sync {
    /// Returns the value of the first row whose key equals `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>, KvError>> + Send;

    /// Inserts a row `{key, value}`.
    fn set(&self, key: &str, value: &Value)
    -> impl Future<Output = Result<bool, KvError>> + Send;

    /// Deletes every row whose key equals `key`. Matching nothing is a success.
    fn delete(&self, key: &str) -> impl Future<Output = Result<bool, KvError>> + Send;

    /// Returns all rows whose key starts with `prefix`, in backend order.
    fn get_with_prefix(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<Record>, KvError>> + Send;

    /// Typed variant of [`KvStore::get`].
    fn get_as<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<T>, KvError>> + Send {
        async move {
            let Some(value) = self.get(key).await? else {
                return Ok(None);
            };
            let body = value.to_string();
            serde_json::from_value(value)
                .map(Some)
                .map_err(|source| KvError::Decode { source, body })
        }
    }

    /// Typed variant of [`KvStore::set`].
    fn set_as<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> impl Future<Output = Result<bool, KvError>> + Send {
        let encoded = serde_json::to_value(value);
        async move {
            let value = encoded.map_err(KvError::Encode)?;
            self.set(key, &value).await
        }
    }
}
