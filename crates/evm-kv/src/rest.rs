//! REST client for a PostgREST-style tabular endpoint.
//!
//! | Operation         | Method | Query / Body                            |
//! |-------------------|--------|-----------------------------------------|
//! | `get`             | GET    | `?select=value&key=eq.<key>`            |
//! | `set`             | POST   | body `{key, value}`                     |
//! | `delete`          | DELETE | `?key=eq.<key>`                         |
//! | `get_with_prefix` | GET    | `?select=key,value&key=like.<prefix>%`  |
//!
//! Every request carries the API key twice: as `apikey` and as a bearer token.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{KvError, KvStore, Record};

/// How `set` writes a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Plain insert. Repeated `set` on a key adds another row.
    #[default]
    Insert,
    /// Insert with `Prefer: resolution=merge-duplicates` on `key`.
    /// Only updates in place when the table has a unique constraint on `key`.
    Upsert,
}

/// Connection settings for [`RestKvClient`].
#[derive(Debug, Clone)]
pub struct RestKvConfig {
    pub endpoint: String,
    pub api_key: String,
    pub write_mode: WriteMode,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

#[derive(Deserialize)]
struct ValueRow {
    #[serde(default)]
    value: Option<Value>,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    key: &'a str,
    value: &'a Value,
}

/// Key-value client over HTTP.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RestKvClient {
    endpoint: Url,
    api_key: String,
    write_mode: WriteMode,
    http: reqwest::Client,
}

impl RestKvClient {
    pub fn new(config: RestKvConfig) -> Result<Self, KvError> {
        let endpoint = parse_endpoint(&config.endpoint)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            endpoint,
            api_key: config.api_key,
            write_mode: config.write_mode,
            http,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.endpoint.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

impl KvStore for RestKvClient {
    async fn get(&self, key: &str) -> Result<Option<Value>, KvError> {
        tracing::debug!(key, "kv get");
        let response = self
            .request(Method::GET)
            .query(&[("select", "value"), ("key", eq_filter(key).as_str())])
            .send()
            .await?;

        let rows: Vec<ValueRow> = read_json(response).await?;
        if rows.len() > 1 {
            tracing::debug!(key, rows = rows.len(), "duplicate rows for key, using first");
        }
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.value)
            .filter(|value| !value.is_null()))
    }

    async fn set(&self, key: &str, value: &Value) -> Result<bool, KvError> {
        tracing::debug!(key, mode = ?self.write_mode, "kv set");
        let mut request = self
            .request(Method::POST)
            .json(&InsertRow { key, value });
        if self.write_mode == WriteMode::Upsert {
            request = request
                .query(&[("on_conflict", "key")])
                .header("Prefer", "resolution=merge-duplicates");
        }
        let response = request.send().await?;
        write_outcome("set", key, response).await
    }

    async fn delete(&self, key: &str) -> Result<bool, KvError> {
        tracing::debug!(key, "kv delete");
        let response = self
            .request(Method::DELETE)
            .query(&[("key", eq_filter(key).as_str())])
            .send()
            .await?;
        write_outcome("delete", key, response).await
    }

    async fn get_with_prefix(&self, prefix: &str) -> Result<Vec<Record>, KvError> {
        tracing::debug!(prefix, "kv get_with_prefix");
        let response = self
            .request(Method::GET)
            .query(&[("select", "key,value"), ("key", like_prefix_filter(prefix).as_str())])
            .send()
            .await?;

        let rows: Vec<Record> = read_json(response).await?;
        let total = rows.len();
        // `_` and `%` in the prefix are LIKE wildcards; keep literal matches only.
        let rows: Vec<Record> = rows
            .into_iter()
            .filter(|row| row.key.starts_with(prefix))
            .collect();
        if rows.len() != total {
            tracing::debug!(
                prefix,
                dropped = total - rows.len(),
                "dropped wildcard matches"
            );
        }
        Ok(rows)
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, KvError> {
    let invalid = |reason: String| KvError::InvalidEndpoint {
        endpoint: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

fn eq_filter(key: &str) -> String {
    format!("eq.{key}")
}

fn like_prefix_filter(prefix: &str) -> String {
    format!("like.{prefix}%")
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, KvError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), body = %body, "kv read rejected");
        return Err(KvError::Status {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|source| KvError::Decode { source, body })
}

async fn write_outcome(op: &'static str, key: &str, response: Response) -> Result<bool, KvError> {
    let status = response.status();
    if status.is_success() {
        return Ok(true);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(op, key, status = status.as_u16(), body = %body, "kv write rejected");
    Ok(false)
}
