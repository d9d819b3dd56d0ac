//! Interactive mode.

use anyhow::Result;
use evm_core::config::Config;

#[cfg(feature = "tui")]
pub async fn run(config: &Config) -> Result<()> {
    let client = config.connect()?;
    let endpoint = client.endpoint().to_string();
    evm_tui::run_event_manager(client, &endpoint).await
}

#[cfg(not(feature = "tui"))]
pub async fn run(_config: &Config) -> Result<()> {
    anyhow::bail!("This build has no interactive mode. Use `evm events --help`.")
}
