//! CLI command handlers.

pub mod config;
pub mod events;
pub mod kv;
pub mod tui;
