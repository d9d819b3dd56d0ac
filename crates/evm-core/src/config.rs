//! Configuration management for evm.
//!
//! Loads configuration from ${EVM_HOME}/config.toml with sensible defaults,
//! then applies `EVM_ENDPOINT` / `EVM_API_KEY` overrides.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use evm_kv::{RestKvClient, RestKvConfig, WriteMode};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// New comments from the template are always present while the user's
/// values win.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;
    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for evm configuration and data directories.
    //!
    //! EVM_HOME resolution order:
    //! 1. EVM_HOME environment variable (if set)
    //! 2. ~/.config/evm (default)

    use std::path::PathBuf;

    /// Returns the evm home directory.
    pub fn evm_home() -> PathBuf {
        if let Ok(home) = std::env::var("EVM_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".evm"),
            |h| h.join(".config").join("evm"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        evm_home().join("config.toml")
    }

    /// Returns the directory holding log files.
    pub fn logs_dir() -> PathBuf {
        evm_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// REST endpoint of the key-value table.
    pub endpoint: String,

    /// Static API key (apikey header + bearer token).
    pub api_key: Option<String>,

    /// Insert or upsert on `set`.
    pub write_mode: WriteMode,

    /// Per-request timeout in seconds (0 disables)
    pub request_timeout_secs: u32,

    /// Default log filter when EVM_LOG is unset.
    pub log_level: String,
}

impl Config {
    pub const DEFAULT_ENDPOINT: &str = "https://dsmnnnvbvapoyacvfuqg.supabase.co/v1/rest/events";
    const DEFAULT_LOG_LEVEL: &str = "info";
    /// Default is disabled
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 0;

    /// Loads configuration from the default path and applies env overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path())?;
        config.apply_overrides(
            std::env::var("EVM_ENDPOINT").ok(),
            std::env::var("EVM_API_KEY").ok(),
        );
        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Applies endpoint/API key overrides. Blank values are ignored.
    pub fn apply_overrides(&mut self, endpoint: Option<String>, api_key: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Builds the client settings, failing when no API key is configured.
    pub fn kv_config(&self) -> Result<RestKvConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .with_context(|| {
                format!(
                    "No API key configured. Set api_key in {} or EVM_API_KEY.",
                    paths::config_path().display()
                )
            })?;

        Ok(RestKvConfig {
            endpoint: self.endpoint.clone(),
            api_key: api_key.to_string(),
            write_mode: self.write_mode,
            timeout: self.request_timeout(),
        })
    }

    /// Creates the REST client described by this config.
    pub fn connect(&self) -> Result<RestKvClient> {
        let client = RestKvClient::new(self.kv_config()?)
            .with_context(|| format!("Failed to create client for {}", self.endpoint))?;
        tracing::debug!(endpoint = %client.endpoint(), mode = ?client.write_mode(), "kv client ready");
        Ok(client)
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Saves a single top-level string field, keeping comments intact.
    ///
    /// Creates the file with default template if it doesn't exist.
    /// If file exists, merges user values into the latest template.
    pub fn save_field_to(path: &Path, field: ConfigField, new_value: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc[field.key()] = value(new_value);

        let rendered = doc.to_string();
        // Reject values that would make the file unloadable (e.g. bad write_mode).
        toml::from_str::<Config>(&rendered)
            .with_context(|| format!("Invalid value for {}: {new_value}", field.key()))?;

        Self::write_config(path, &rendered)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            write_mode: WriteMode::default(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Fields settable through `evm config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Endpoint,
    ApiKey,
    WriteMode,
    LogLevel,
}

impl ConfigField {
    pub fn key(self) -> &'static str {
        match self {
            ConfigField::Endpoint => "endpoint",
            ConfigField::ApiKey => "api_key",
            ConfigField::WriteMode => "write_mode",
            ConfigField::LogLevel => "log_level",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.endpoint, Config::DEFAULT_ENDPOINT);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "api_key = \"abc\"\nwrite_mode = \"upsert\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.write_mode, WriteMode::Upsert);
        assert_eq!(config.endpoint, Config::DEFAULT_ENDPOINT);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_invalid_write_mode_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "write_mode = \"sometimes\"\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("endpoint ="));
        assert!(contents.contains("# api_key ="));
        // The template must load back to the Rust defaults.
        assert_eq!(Config::load_from(&config_path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_overrides_replace_values_and_ignore_blanks() {
        let mut config = Config::default();
        config.apply_overrides(Some("http://localhost:3000/objects".into()), Some("  ".into()));
        assert_eq!(config.endpoint, "http://localhost:3000/objects");
        assert_eq!(config.api_key, None);

        config.apply_overrides(None, Some(" key ".into()));
        assert_eq!(config.api_key.as_deref(), Some("key"));
    }

    #[test]
    fn test_request_timeout_zero_disables() {
        let mut config = Config::default();
        assert_eq!(config.request_timeout(), None);
        config.request_timeout_secs = 5;
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_kv_config_requires_api_key() {
        let config = Config::default();
        let err = config.kv_config().unwrap_err();
        assert!(err.to_string().contains("No API key configured"));

        let config = Config {
            api_key: Some("secret".to_string()),
            request_timeout_secs: 3,
            ..Default::default()
        };
        let kv = config.kv_config().unwrap();
        assert_eq!(kv.api_key, "secret");
        assert_eq!(kv.timeout, Some(Duration::from_secs(3)));
        assert_eq!(kv.endpoint, Config::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_save_field_creates_file_with_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        Config::save_field_to(&config_path, ConfigField::ApiKey, "k-123").unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# evm configuration"));
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k-123"));
    }

    #[test]
    fn test_save_field_preserves_other_fields() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "endpoint = \"http://localhost:3000/objects\"\napi_key = \"old\"\n",
        )
        .unwrap();

        Config::save_field_to(&config_path, ConfigField::WriteMode, "upsert").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.write_mode, WriteMode::Upsert);
        assert_eq!(config.endpoint, "http://localhost:3000/objects");
        assert_eq!(config.api_key.as_deref(), Some("old"));
    }

    #[test]
    fn test_save_field_rejects_invalid_value() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        let result = Config::save_field_to(&config_path, ConfigField::WriteMode, "sometimes");
        assert!(result.is_err());
        assert!(!config_path.exists());
    }
}
