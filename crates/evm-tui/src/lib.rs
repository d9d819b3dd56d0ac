//! Full-screen event manager.

pub mod common;
pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr, stdout};

use anyhow::Result;
use evm_kv::KvStore;
pub use runtime::TuiRuntime;

/// Runs the interactive event manager against `store`.
///
/// `endpoint` is only displayed in the header.
pub async fn run_event_manager<S>(store: S, endpoint: &str) -> Result<()>
where
    S: KvStore + Clone + 'static,
{
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The event manager requires a terminal.\n\
             Use `evm events list` for non-interactive access."
        );
    }

    tracing::info!(endpoint, "starting event manager");
    let mut runtime = TuiRuntime::new(store, endpoint)?;
    runtime.run()?;
    drop(runtime);

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
