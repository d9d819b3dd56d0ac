//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O only; the reducer never talks to the store itself.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Fetch every `event:` record.
    LoadEvents,

    /// Insert a new event under a fresh timestamp key.
    AddEvent { name: String },

    /// Write a new name for an existing event.
    SaveEvent { id: String, name: String },

    /// Delete every row for an event id.
    DeleteEvent { id: String },
}
