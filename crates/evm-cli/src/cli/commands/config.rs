//! Config command handlers.

use anyhow::{Context, Result};
use evm_core::config::{self, ConfigField};

pub fn path() {
    println!("{}", config::paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    config::Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn set(field: ConfigField, value: &str) -> Result<()> {
    let config_path = config::paths::config_path();
    config::Config::save_field_to(&config_path, field, value)
        .with_context(|| format!("update config at {}", config_path.display()))?;
    println!("Set {} in {}", field.key(), config_path.display());
    Ok(())
}
