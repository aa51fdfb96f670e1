//! Application settings loaded from config.toml
//!
//! Every field has a default, so a missing file yields a working local-only
//! configuration. Environment variables (optionally from `.env`) override the
//! file for the values that differ per device.

use super::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Env var naming the config file to load
pub const CONFIG_PATH_ENV: &str = "POSTPARTUM_CONFIG";
/// Env var overriding `database.url`
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Env var overriding `sync.endpoint`
pub const SYNC_ENDPOINT_ENV: &str = "POSTPARTUM_SYNC_ENDPOINT";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
}

/// Where the primary store lives
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL; must be file-backed
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// Remote mirror settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Master switch; when false the sync agent is disabled
    pub enabled: bool,
    /// Base URL of the remote record service
    pub endpoint: Option<String>,
    /// Container (database) the records are written to
    pub container: String,
    /// Name of the env var holding the bearer token
    pub token_env: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Directory for temporary asset files; system temp dir when absent
    pub scratch_dir: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            container: "iCloud.PostpartumEase".to_string(),
            token_env: "POSTPARTUM_SYNC_TOKEN".to_string(),
            timeout_secs: 30,
            scratch_dir: None,
        }
    }
}

impl SyncConfig {
    /// Bearer token from the configured env var, if set.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env).ok().filter(|t| !t.is_empty())
    }

    /// Scratch directory for asset files.
    #[must_use]
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl AppConfig {
    /// Applies environment overrides on top of file values.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            debug!("Using {DATABASE_URL_ENV} from environment");
            self.database.url = url;
        }
        if let Ok(endpoint) = std::env::var(SYNC_ENDPOINT_ENV) {
            debug!("Using {SYNC_ENDPOINT_ENV} from environment");
            self.sync.endpoint = Some(endpoint);
        }
        self
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from `$POSTPARTUM_CONFIG` or `./config.toml`, then
/// applies environment overrides. A missing file means defaults.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).map_or_else(|_| PathBuf::from("config.toml"), PathBuf::from);
    let config = if path.exists() {
        load_config(&path)?
    } else {
        info!("No config file at {}, using defaults", path.display());
        AppConfig::default()
    };
    Ok(config.with_env_overrides())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [database]
            url = "sqlite://custom/path.sqlite?mode=rwc"

            [sync]
            enabled = false
            endpoint = "https://records.example.com/v1"
            container = "iCloud.com.example.PostpartumEase"
            timeout_secs = 5
            scratch_dir = "/tmp/ppe"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.database.url, "sqlite://custom/path.sqlite?mode=rwc");
        assert!(!config.sync.enabled);
        assert_eq!(
            config.sync.endpoint.as_deref(),
            Some("https://records.example.com/v1")
        );
        assert_eq!(config.sync.timeout_secs, 5);
        assert_eq!(config.sync.scratch_dir(), PathBuf::from("/tmp/ppe"));
        // Not given, defaulted
        assert_eq!(config.sync.token_env, "POSTPARTUM_SYNC_TOKEN");
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert!(config.sync.enabled);
        assert!(config.sync.endpoint.is_none());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = parse_config("[sync]\ntimeout_secs = \"soon\"");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_config("/nonexistent/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
