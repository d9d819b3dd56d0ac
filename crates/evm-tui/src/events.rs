//! Events consumed by the reducer.

use evm_core::Event;

/// Store errors are carried as display strings; the UI only shows them.
pub type CallResult<T> = Result<T, String>;

#[derive(Debug)]
pub enum UiEvent {
    /// First event after the runtime starts.
    Start,
    /// Periodic tick (spinner, toast expiry).
    Tick,
    /// Raw terminal input.
    Terminal(crossterm::event::Event),
    /// Prefix query finished.
    EventsLoaded(CallResult<Vec<Event>>),
    /// `set` for a new event finished. `Ok(None)` means the server refused it.
    EventAdded {
        name: String,
        result: CallResult<Option<Event>>,
    },
    /// `set` for an edited event finished.
    EventSaved {
        id: String,
        name: String,
        result: CallResult<bool>,
    },
    /// `delete` finished.
    EventDeleted { id: String, result: CallResult<bool> },
}
