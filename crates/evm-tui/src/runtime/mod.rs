//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! All side effects happen here. The reducer stays pure and returns effects;
//! store calls are spawned on tokio and their completions come back through
//! an unbounded inbox channel drained once per loop iteration.

mod handlers;

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use evm_core::EventBook;
use evm_kv::KvStore;
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::terminal::{self, Tui};
use crate::{render, update};

/// Tick cadence while something animates (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Tick cadence when nothing is happening.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

type UiEventSender = mpsc::UnboundedSender<UiEvent>;
type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Full-screen runtime over any cloneable store handle.
pub struct TuiRuntime<S> {
    terminal: Tui,
    pub state: AppState,
    book: EventBook<S>,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl<S> TuiRuntime<S>
where
    S: KvStore + Clone + 'static,
{
    pub fn new(store: S, endpoint: impl Into<String>) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state: AppState::new(endpoint),
            book: EventBook::new(store),
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs until the reducer asks to quit.
    ///
    /// Blocks the calling thread; effect tasks run on the ambient
    /// multi-threaded tokio runtime.
    pub fn run(&mut self) -> Result<()> {
        self.dispatch_event(UiEvent::Start);

        let mut dirty = true;
        while !self.state.should_quit {
            let events = self.collect_events()?;
            if !events.is_empty() {
                dirty = true;
            }
            for event in events {
                self.dispatch_event(event);
            }

            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.state.needs_fast_tick() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns a handler and sends its completion event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        let book = self.book.clone();
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::LoadEvents => {
                self.spawn_effect(move || handlers::load_events(book));
            }
            UiEffect::AddEvent { name } => {
                self.spawn_effect(move || handlers::add_event(book, name));
            }
            UiEffect::SaveEvent { id, name } => {
                self.spawn_effect(move || handlers::save_event(book, id, name));
            }
            UiEffect::DeleteEvent { id } => {
                self.spawn_effect(move || handlers::delete_event(book, id));
            }
        }
    }
}

impl<S> Drop for TuiRuntime<S> {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
