//!
//! Configuration loading system for refbridge.
//!
//! Layers, lowest priority first:
//! 1. Built-in defaults
//! 2. User config file (~/.config/refbridge/config.toml)
//! 3. Explicit config file (`REFBRIDGE_CONFIG`, or [`ConfigLoader::with_config_file`])
//! 4. Environment variables (`REFBRIDGE_*`)
//!
//! Files are merged key by key: only keys present in a file override earlier layers.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use crate::config::paths;
use crate::config::{Config, LogLevel};
use crate::error::{BridgeError, Result};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

/* --- constants ------------------------------------------------------------------------------- */

/// Prefix of every recognised environment variable
const ENV_PREFIX: &str = "REFBRIDGE_";

/// Variable naming an explicit config file
pub const CONFIG_FILE_ENV: &str = "REFBRIDGE_CONFIG";

/* --- types ----------------------------------------------------------------------------------- */

///
/// Configuration loader implementing the Builder pattern.
///
/// Each method returns self for chaining; later layers override earlier ones.
pub struct ConfigLoader {
    /// Current configuration being built
    config: Config,
    /// Environment variable overrides collected, sorted for deterministic application
    env_overrides: BTreeMap<String, String>,
    /// Whether defaults have been applied
    defaults_applied: bool,
}

/// Config file contents; absent keys leave the current value alone.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    endpoint: EndpointFile,
    #[serde(default)]
    logging: LoggingFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EndpointFile {
    base_url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    stream: Option<bool>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingFile {
    level: Option<LogLevel>,
}

/* --- implementations --------------------------------------------------------------------- */

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// # Examples
    /// ```rust,no_run
    /// use refbridge::config::loader::ConfigLoader;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ConfigLoader::new()
    ///     .with_defaults()
    ///     .with_user_config()?
    ///     .with_env_vars()?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new() -> Self {
        Self { config: Config::default(), env_overrides: BTreeMap::new(), defaults_applied: false }
    }

    /// Apply built-in default values
    ///
    /// This should be called first in the configuration loading chain.
    pub fn with_defaults(mut self) -> Self {
        self.config = Config::default();
        self.defaults_applied = true;
        self
    }

    /// Load user configuration file
    ///
    /// A missing file is not an error.
    ///
    /// # Returns
    /// * `Ok(Self)` - User config loaded or skipped (file not found)
    /// * `Err(BridgeError)` - User config exists but failed to load
    pub fn with_user_config(mut self) -> Result<Self> {
        let user_config_path = paths::user_config_file()?;

        if user_config_path.exists() {
            tracing::debug!("Loading user config from: {}", user_config_path.display());
            self.load_config_file(&user_config_path)?;
        } else {
            tracing::debug!("User config not found at: {}", user_config_path.display());
        }

        Ok(self)
    }

    /// Load the file named by `REFBRIDGE_CONFIG`, if the variable is set
    ///
    /// Unlike the user config, a file named explicitly must exist.
    pub fn with_env_config_file(self) -> Result<Self> {
        match env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                let expanded = paths::expand_path(path.trim())?;
                self.with_config_file(expanded)
            }
            _ => Ok(self),
        }
    }

    /// Load configuration from specific file path
    ///
    /// # Arguments
    /// * `path` - Path to configuration file to load
    ///
    /// # Returns
    /// * `Ok(Self)` - Config loaded successfully
    /// * `Err(BridgeError)` - Failed to load or parse config file
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading custom config from: {}", path.display());
        self.load_config_file(path)?;
        Ok(self)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - REFBRIDGE_BASE_URL
    /// - REFBRIDGE_MODEL
    /// - REFBRIDGE_API_KEY
    /// - REFBRIDGE_STREAM
    /// - REFBRIDGE_TIMEOUT_SECS
    /// - REFBRIDGE_LOG_LEVEL
    ///
    /// # Returns
    /// * `Ok(Self)` - Environment variables applied
    /// * `Err(BridgeError)` - Invalid environment variable values
    pub fn with_env_vars(mut self) -> Result<Self> {
        tracing::debug!("Loading configuration from environment variables");

        for (key, value) in env::vars() {
            if key.starts_with(ENV_PREFIX) {
                self.env_overrides.insert(key, value);
            }
        }

        self.apply_env_overrides()?;

        Ok(self)
    }

    /// Build and validate the final configuration
    ///
    /// # Returns
    /// * `Ok(Config)` - Valid, fully-loaded configuration
    /// * `Err(BridgeError)` - Configuration validation failed
    pub fn build(self) -> Result<Config> {
        let config = self.build_base()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the configuration without validating it
    pub fn build_base(self) -> Result<Config> {
        if !self.defaults_applied {
            return Err(BridgeError::Config(
                "Configuration loader must call with_defaults() before build()".to_string(),
            ));
        }

        tracing::debug!(
            "Config: endpoint.base_url={}, endpoint.model={}, endpoint.stream={}, logging.level={:?}",
            self.config.endpoint.base_url,
            self.config.endpoint.model,
            self.config.endpoint.stream,
            self.config.logging.level
        );

        Ok(self.config)
    }

    /* --- private methods ----------------------------------------------------------------- */

    /// Load and merge configuration from a TOML file
    fn load_config_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();

        paths::validate_config_file(path)?;

        let contents = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let file_config: ConfigFile = toml::from_str(&contents).map_err(|e| {
            BridgeError::Config(format!(
                "Failed to parse TOML configuration file '{}': {}\n\
                 \n\
                 Please check the syntax of your configuration file.\n\
                 Valid sections are [endpoint] and [logging].\n\
                 \n\
                 Run 'refbridge validate' for more details.",
                path.display(),
                e
            ))
        })?;

        self.merge_file(file_config);

        tracing::debug!("Successfully loaded config from: {}", path.display());
        Ok(())
    }

    /// Merge keys present in a config file into the current config
    fn merge_file(&mut self, file: ConfigFile) {
        let endpoint = &mut self.config.endpoint;
        if let Some(base_url) = file.endpoint.base_url {
            endpoint.base_url = base_url;
        }
        if let Some(model) = file.endpoint.model {
            endpoint.model = model;
        }
        if let Some(api_key) = file.endpoint.api_key {
            endpoint.api_key = api_key;
        }
        if let Some(stream) = file.endpoint.stream {
            endpoint.stream = stream;
        }
        if let Some(timeout_secs) = file.endpoint.timeout_secs {
            endpoint.timeout_secs = timeout_secs;
        }

        if let Some(level) = file.logging.level {
            self.config.logging.level = level;
        }
    }

    /// Apply environment variable overrides to current configuration
    fn apply_env_overrides(&mut self) -> Result<()> {
        for (key, value) in &self.env_overrides {
            match key.as_str() {
                "REFBRIDGE_BASE_URL" => {
                    self.config.endpoint.base_url = value.clone();
                }
                "REFBRIDGE_MODEL" => {
                    self.config.endpoint.model = value.clone();
                }
                "REFBRIDGE_API_KEY" => {
                    self.config.endpoint.api_key = value.clone();
                }
                "REFBRIDGE_STREAM" => {
                    self.config.endpoint.stream = parse_bool_env(value, key)?;
                }
                "REFBRIDGE_TIMEOUT_SECS" => {
                    self.config.endpoint.timeout_secs = value.parse().map_err(|e| {
                        BridgeError::Config(format!(
                            "Invalid REFBRIDGE_TIMEOUT_SECS value '{}': {}\n\
                             Timeout must be a whole number of seconds.",
                            value, e
                        ))
                    })?;
                }
                "REFBRIDGE_LOG_LEVEL" => {
                    self.config.logging.level = LogLevel::from_str(value)?;
                }

                // handled by with_env_config_file
                CONFIG_FILE_ENV => {}

                _ => {
                    tracing::debug!("Ignoring unknown environment variable: {}", key);
                }
            }
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/* --- utility functions ------------------------------------------------------------------- */

/// Parse boolean value from environment variable
fn parse_bool_env(value: &str, var_name: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" | "enabled" => Ok(true),
        "false" | "no" | "0" | "off" | "disabled" => Ok(false),
        _ => Err(BridgeError::Config(format!(
            "Invalid boolean value for {}: '{}'\n\
             Valid values: true/false, yes/no, 1/0, on/off, enabled/disabled",
            var_name, value
        ))),
    }
}

/* --- tests ------------------------------------------------------------------------------- */
