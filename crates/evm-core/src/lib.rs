//! Shared configuration, logging and the event domain for evm.

pub mod config;
pub mod events;
pub mod logging;

pub use events::{EVENT_PREFIX, Event, EventBook};
