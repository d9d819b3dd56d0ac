//! Key-value persistence over a REST tabular endpoint.
//!
//! The whole data layer is four operations (`get`, `set`, `delete`,
//! `get_with_prefix`) expressed by the [`KvStore`] trait. [`RestKvClient`]
//! maps them onto PostgREST-style query parameters (`eq.`, `like.`).

pub mod error;
pub mod record;
pub mod rest;
pub mod store;

pub use error::KvError;
pub use record::Record;
pub use rest::{RestKvClient, RestKvConfig, WriteMode};
pub use store::KvStore;
