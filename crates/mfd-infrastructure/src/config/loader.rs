//! Configuration loader
//!
//! Loads configuration from defaults, an optional TOML file, and
//! environment variables, merged in that order with Figment.

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use mfd_domain::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::types::AppConfig;

/// Default environment variable prefix
const CONFIG_ENV_PREFIX: &str = "MFD";

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources.
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from [`AppConfig::default`]
    /// 2. TOML configuration file, when a path was given
    /// 3. Environment variables with the prefix, nested keys split on `__`
    ///    (e.g. `MFD_HTTP__RETRY`)
    ///
    /// # Errors
    /// An explicitly configured file path that does not exist is an error;
    /// running without a file is not.
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if !config_path.exists() {
                warn!(path = %config_path.display(), "configuration file not found");
                return Err(Error::config(format!(
                    "Local file not found: {}",
                    config_path.display()
                )));
            }
            figment = figment.merge(Toml::file(config_path));
            info!(path = %config_path.display(), "configuration file loaded");
        }

        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("__"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| Error::config(e.to_string()))?;

        validate(&config)?;
        Ok(config)
    }

    /// Reload configuration (useful for hot-reloading)
    pub fn reload(&self) -> Result<AppConfig> {
        self.load()
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| Error::config(format!("Failed to serialize config to TOML: {e}")))?;
        std::fs::write(path.as_ref(), toml_string)
            .map_err(|e| Error::config(format!("Failed to write config file: {e}")))?;
        Ok(())
    }

    /// The configured file path, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

/// Validate configuration values
fn validate(config: &AppConfig) -> Result<()> {
    if config.http.timeout_secs == 0 {
        return Err(Error::config("HTTP timeout cannot be 0"));
    }
    if config.http.limit == 0 {
        return Err(Error::config("HTTP concurrency limit cannot be 0"));
    }
    if config.feeds.nasdaq_base_url.is_empty() || config.feeds.cnn_base_url.is_empty() {
        return Err(Error::config("Feed base URLs cannot be empty"));
    }
    Ok(())
}
