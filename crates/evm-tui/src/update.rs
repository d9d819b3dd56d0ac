//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! Writes are optimistic only in the sense that the local list is patched
//! from the completion event instead of re-fetching. Completions are applied
//! in the order they arrive, which may differ from the order actions were
//! taken.

use std::time::Instant;

use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use evm_core::Event;
use evm_core::events::is_valid_name;

use crate::effects::UiEffect;
use crate::events::{CallResult, UiEvent};
use crate::state::{AppState, EditDraft, Screen, Toast, ToastKind};

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Start => start_loading(app),
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            expire_toast(app, Instant::now());
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::EventsLoaded(result) => {
            finish_call(app);
            on_events_loaded(app, result);
            vec![]
        }
        UiEvent::EventAdded { name, result } => {
            finish_call(app);
            on_event_added(app, &name, result);
            vec![]
        }
        UiEvent::EventSaved { id, name, result } => {
            finish_call(app);
            on_event_saved(app, &id, &name, result);
            vec![]
        }
        UiEvent::EventDeleted { id, result } => {
            finish_call(app);
            on_event_deleted(app, &id, result);
            vec![]
        }
    }
}

fn finish_call(app: &mut AppState) {
    app.in_flight = app.in_flight.saturating_sub(1);
}

fn expire_toast(app: &mut AppState, now: Instant) {
    if app.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
        app.toast = None;
    }
}

// ============================================================================
// Actions
// ============================================================================

/// `Idle -> Loading`, fetching the list.
fn start_loading(app: &mut AppState) -> Vec<UiEffect> {
    if app.screen != Screen::Idle {
        return vec![];
    }
    app.screen = Screen::Loading;
    app.in_flight += 1;
    vec![UiEffect::LoadEvents]
}

fn add_event(app: &mut AppState) -> Vec<UiEffect> {
    if !is_valid_name(&app.new_event) {
        return vec![];
    }
    app.in_flight += 1;
    vec![UiEffect::AddEvent {
        name: app.new_event.clone(),
    }]
}

/// Enters edit mode for the highlighted event, replacing any open draft.
fn begin_edit(app: &mut AppState) -> Vec<UiEffect> {
    if app.is_loading() {
        return vec![];
    }
    if let Some(event) = app.selected_event() {
        app.screen = Screen::Editing(EditDraft {
            id: event.id.clone(),
            name: event.name.clone(),
        });
    }
    vec![]
}

fn save_edit(app: &mut AppState) -> Vec<UiEffect> {
    let Some(draft) = app.editing() else {
        return vec![];
    };
    if !is_valid_name(&draft.name) {
        return vec![];
    }
    let effect = UiEffect::SaveEvent {
        id: draft.id.clone(),
        name: draft.name.clone(),
    };
    app.in_flight += 1;
    vec![effect]
}

fn delete_selected(app: &mut AppState) -> Vec<UiEffect> {
    if app.is_loading() {
        return vec![];
    }
    let Some(event) = app.selected_event() else {
        return vec![];
    };
    let effect = UiEffect::DeleteEvent {
        id: event.id.clone(),
    };
    app.in_flight += 1;
    vec![effect]
}

// ============================================================================
// Completions
// ============================================================================

fn on_events_loaded(app: &mut AppState, result: CallResult<Vec<Event>>) {
    if app.is_loading() {
        app.screen = Screen::Idle;
    }
    match result {
        Ok(events) => {
            tracing::debug!(count = events.len(), "events loaded");
            app.events = events;
            app.clamp_selection();
        }
        Err(error) => {
            tracing::warn!(%error, "loading events failed");
            app.show_toast(Toast::new(
                ToastKind::Error,
                "Could not load events.",
                error,
            ));
        }
    }
}

fn on_event_added(app: &mut AppState, name: &str, result: CallResult<Option<Event>>) {
    match result {
        Ok(Some(event)) => {
            app.events.push(event);
            app.new_event.clear();
            app.show_toast(Toast::new(
                ToastKind::Success,
                "Event added.",
                "We've added your event.",
            ));
        }
        Ok(None) => app.show_toast(Toast::new(
            ToastKind::Error,
            "Event not added.",
            format!("The server rejected \"{name}\"."),
        )),
        Err(error) => app.show_toast(Toast::new(ToastKind::Error, "Event not added.", error)),
    }
}

fn on_event_saved(app: &mut AppState, id: &str, name: &str, result: CallResult<bool>) {
    match result {
        Ok(true) => {
            for event in app.events.iter_mut().filter(|e| e.id == id) {
                event.name = name.to_string();
            }
            app.screen = Screen::Idle;
            app.show_toast(Toast::new(
                ToastKind::Info,
                "Event updated.",
                "We've updated your event.",
            ));
        }
        Ok(false) => app.show_toast(Toast::new(
            ToastKind::Error,
            "Event not updated.",
            "The server rejected the change.",
        )),
        Err(error) => app.show_toast(Toast::new(ToastKind::Error, "Event not updated.", error)),
    }
}

fn on_event_deleted(app: &mut AppState, id: &str, result: CallResult<bool>) {
    match result {
        Ok(true) => {
            // An open draft for this id is left as is.
            app.events.retain(|e| e.id != id);
            app.clamp_selection();
            app.show_toast(Toast::new(
                ToastKind::Removed,
                "Event deleted.",
                "We've deleted your event.",
            ));
        }
        Ok(false) => app.show_toast(Toast::new(
            ToastKind::Error,
            "Event not deleted.",
            "The server rejected the delete.",
        )),
        Err(error) => app.show_toast(Toast::new(ToastKind::Error, "Event not deleted.", error)),
    }
}

// ============================================================================
// Terminal input
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: TermEvent) -> Vec<UiEffect> {
    match event {
        TermEvent::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        TermEvent::Paste(text) => {
            let text: String = text.chars().filter(|c| !c.is_control()).collect();
            focused_input(app).push_str(&text);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::Char('r') if ctrl => start_loading(app),
        KeyCode::Char('e') if ctrl => begin_edit(app),
        KeyCode::Char('d') if ctrl => delete_selected(app),
        KeyCode::Esc => {
            if app.editing().is_some() {
                app.screen = Screen::Idle;
                vec![]
            } else {
                vec![UiEffect::Quit]
            }
        }
        KeyCode::Enter => {
            if app.editing().is_some() {
                save_edit(app)
            } else {
                add_event(app)
            }
        }
        KeyCode::Up => {
            app.selected = app.selected.saturating_sub(1);
            vec![]
        }
        KeyCode::Down => {
            if app.selected + 1 < app.events.len() {
                app.selected += 1;
            }
            vec![]
        }
        KeyCode::Backspace => {
            focused_input(app).pop();
            vec![]
        }
        KeyCode::Char(c) if !ctrl => {
            focused_input(app).push(c);
            vec![]
        }
        _ => vec![],
    }
}

/// The text buffer keystrokes go to: the draft while editing, else the add input.
fn focused_input(app: &mut AppState) -> &mut String {
    match &mut app.screen {
        Screen::Editing(draft) => &mut draft.name,
        _ => &mut app.new_event,
    }
}
