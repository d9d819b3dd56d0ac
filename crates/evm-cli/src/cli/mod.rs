//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use evm_core::config::{self, ConfigField};
use evm_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "evm")]
#[command(version)]
#[command(about = "Event manager over a REST key-value table")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the table endpoint from config
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage events from the command line
    Events {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Raw key-value access
    Kv {
        #[command(subcommand)]
        command: KvCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum EventCommands {
    /// Lists all events
    List,
    /// Adds an event
    Add {
        /// Display name of the event
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Renames an event
    Rename {
        /// Event id (`event:<millis>`)
        #[arg(value_name = "ID")]
        id: String,
        /// New name
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Deletes an event
    Delete {
        /// Event id (`event:<millis>`)
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum KvCommands {
    /// Prints the JSON value stored under a key
    Get {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Stores a JSON value under a key
    Set {
        #[arg(value_name = "KEY")]
        key: String,
        /// Any JSON document, e.g. '{"name":"Launch"}'
        #[arg(value_name = "JSON")]
        value: String,
    },
    /// Deletes every row for a key
    Delete {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Lists records whose key starts with a prefix
    List {
        #[arg(value_name = "PREFIX")]
        prefix: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set a single config value
    Set {
        #[arg(value_enum)]
        field: SettableField,
        #[arg(value_name = "VALUE")]
        value: String,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum SettableField {
    Endpoint,
    ApiKey,
    WriteMode,
    LogLevel,
}

impl From<SettableField> for ConfigField {
    fn from(field: SettableField) -> Self {
        match field {
            SettableField::Endpoint => ConfigField::Endpoint,
            SettableField::ApiKey => ConfigField::ApiKey,
            SettableField::WriteMode => ConfigField::WriteMode,
            SettableField::LogLevel => ConfigField::LogLevel,
        }
    }
}

pub fn run() -> Result<()> {
    let Cli { command, endpoint } = Cli::parse();

    // Config commands must work even when the file is broken.
    let command = match command {
        Some(Commands::Config { command }) => return run_config(command),
        other => other,
    };

    let mut config = config::Config::load().context("load config")?;
    config.apply_overrides(endpoint, None);

    // Logging is best effort; a read-only home must not block the CLI.
    let _log_guard = match logging::init(&config.log_level) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    };

    tracing::debug!(endpoint = %config.endpoint, mode = ?config.write_mode, "config loaded");

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(command, &config).await })
}

fn run_config(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            commands::config::path();
            Ok(())
        }
        ConfigCommands::Init => commands::config::init(),
        ConfigCommands::Set { field, value } => commands::config::set(field.into(), &value),
    }
}

async fn dispatch(command: Option<Commands>, config: &config::Config) -> Result<()> {
    // default to the interactive manager
    let Some(command) = command else {
        return commands::tui::run(config).await;
    };

    let client = config.connect()?;

    match command {
        Commands::Events { command } => match command {
            EventCommands::List => commands::events::list(client).await,
            EventCommands::Add { name } => commands::events::add(client, &name).await,
            EventCommands::Rename { id, name } => {
                commands::events::rename(client, &id, &name).await
            }
            EventCommands::Delete { id } => commands::events::delete(client, &id).await,
        },

        Commands::Kv { command } => match command {
            KvCommands::Get { key } => commands::kv::get(&client, &key).await,
            KvCommands::Set { key, value } => commands::kv::set(&client, &key, &value).await,
            KvCommands::Delete { key } => commands::kv::delete(&client, &key).await,
            KvCommands::List { prefix } => commands::kv::list(&client, &prefix).await,
        },

        Commands::Config { command } => run_config(command),
    }
}
