//! Application state for the event manager.
//!
//! ```text
//! AppState
//! ├── screen: Screen          (Idle | Loading | Editing(draft))
//! ├── events: Vec<Event>      (local mirror of the server list)
//! ├── new_event: String       (add input)
//! ├── selected: usize         (list cursor)
//! ├── toast: Option<Toast>    (transient status message)
//! └── in_flight: usize        (store calls awaiting completion)
//! ```
//!
//! The local list is patched from completion events, never re-fetched after
//! a write.

use std::time::{Duration, Instant};

use evm_core::Event;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(2000);

/// The single-screen state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Idle,
    /// Initial (or manual) list fetch in progress.
    Loading,
    /// One event is being renamed.
    Editing(EditDraft),
}

/// Draft captured when an edit begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    /// Id of the event under edit. May point at a deleted event.
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Removed,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
    pub shown_at: Instant,
}

impl Toast {
    pub fn new(kind: ToastKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= TOAST_DURATION
    }
}

/// Combined application state.
#[derive(Debug)]
pub struct AppState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    pub screen: Screen,
    pub events: Vec<Event>,
    /// Text of the "add new event" input.
    pub new_event: String,
    /// Index of the highlighted event.
    pub selected: usize,
    pub toast: Option<Toast>,
    /// Number of store calls still running.
    pub in_flight: usize,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
    /// Endpoint shown in the header (cached at startup).
    pub endpoint: String,
}

impl AppState {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            screen: Screen::Idle,
            events: Vec::new(),
            new_event: String::new(),
            selected: 0,
            toast: None,
            in_flight: 0,
            spinner_frame: 0,
            endpoint: endpoint.into(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.screen, Screen::Loading)
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        match &self.screen {
            Screen::Editing(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.events.get(self.selected)
    }

    /// Keeps the cursor inside the list after removals.
    pub fn clamp_selection(&mut self) {
        if self.events.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.events.len() {
            self.selected = self.events.len() - 1;
        }
    }

    pub fn show_toast(&mut self, toast: Toast) {
        self.toast = Some(toast);
    }

    /// True while anything on screen animates or may expire.
    pub fn needs_fast_tick(&self) -> bool {
        self.in_flight > 0 || self.is_loading() || self.toast.is_some()
    }
}
