use thiserror::Error;

/// Errors surfaced by key-value operations.
///
/// Write operations report a non-2xx response as `Ok(false)` instead of
/// [`KvError::Status`]; reads have no boolean to fall back on.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),
}

impl KvError {
    /// Returns the HTTP status for server-side rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            KvError::Status { status, .. } => Some(*status),
            KvError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
