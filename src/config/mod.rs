//!
//! Configuration management for refbridge.
//!
//! Settings come from a layered hierarchy:
//! - built-in defaults
//! - the user config file in the platform-native config directory
//! - an explicit file named by `REFBRIDGE_CONFIG`
//! - `REFBRIDGE_*` environment variables
//!
//! Submodules:
//! - `loader.rs` - layering and merging
//! - `paths.rs` - platform path resolution
//! - `validation.rs` - value checks
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- modules --------------------------------------------------------------------------------- */

pub mod loader;
pub mod paths;
pub mod validation;

/* --- uses ------------------------------------------------------------------------------------ */

use std::time::Duration;

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};

/* --- types ----------------------------------------------------------------------------------- */

///
/// Main application configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Chat-completion endpoint settings
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

///
/// OpenAI-compatible endpoint configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL up to and including the API version (`.../v1`)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Bearer credential; local servers usually accept anything
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Request a streamed (SSE) response
    #[serde(default)]
    pub stream: bool,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

///
/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
}

///
/// Logging level enumeration.
///
/// Defines available log levels compatible with tracing crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/* --- defaults -------------------------------------------------------------------------------- */

/// Default endpoint: a local Ollama server
fn default_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}

/// Default model
fn default_model() -> String {
    "gemma:2b".to_string()
}

/// Default credential
fn default_api_key() -> String {
    "ollama".to_string()
}

/// Default request timeout (5 minutes, small models on CPU are slow)
fn default_timeout_secs() -> u64 {
    300
}

/// Default logging level
fn default_log_level() -> LogLevel {
    LogLevel::Info
}

/* --- implementations --------------------------------------------------------------------- */

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: default_api_key(),
            stream: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl Config {
    /// Load configuration from the standard hierarchy:
    /// 1. Environment variables (highest priority)
    /// 2. File named by `REFBRIDGE_CONFIG`
    /// 3. User config file (~/.config/refbridge/config.toml)
    /// 4. Built-in defaults (lowest priority)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(BridgeError)` - Configuration loading or validation failed
    ///
    /// # Examples
    /// ```rust,no_run
    /// use refbridge::config::Config;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config::load()?;
    /// println!("Talking to {}", config.endpoint.base_url);
    /// # Ok(())
    /// # }
    /// ```
    pub fn load() -> Result<Self> {
        loader::ConfigLoader::new()
            .with_defaults()
            .with_user_config()?
            .with_env_config_file()?
            .with_env_vars()?
            .build()
    }

    /// Validate the current configuration
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is valid
    /// * `Err(BridgeError)` - Validation failed, all problems listed
    pub fn validate(&self) -> Result<()> {
        validation::ConfigValidator::new(self).validate()
    }

    /// Get configuration file example as TOML string
    pub fn example_toml() -> &'static str {
        r#"# refbridge configuration
# This file should be placed at:
#   Linux/Unix: ~/.config/refbridge/config.toml
#   macOS: ~/Library/Application Support/com.SkyCorp.refbridge/config.toml
#   Windows: %APPDATA%/SkyCorp/refbridge/config/config.toml

[endpoint]
# OpenAI-compatible base URL (default: http://localhost:11434/v1)
base_url = "http://localhost:11434/v1"

# Model identifier (default: gemma:2b)
model = "gemma:2b"

# Bearer credential (default: ollama)
api_key = "ollama"

# Request a streamed response (default: false)
stream = false

# Request timeout in seconds (default: 300)
timeout_secs = 300

[logging]
# Logging level: trace, debug, info, warn, error (default: info)
# RUST_LOG takes precedence when set
level = "info"
"#
    }
}

impl EndpointConfig {
    /// Full chat-completions URL; a trailing `/` on the base is ignored.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl LogLevel {
    /// Convert to tracing::Level for logging setup
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }

    /// Directive string understood by `EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(BridgeError::Config(format!(
                "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
                s
            ))),
        }
    }
}

/* --- tests ------------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint.base_url, "http://localhost:11434/v1");
        assert_eq!(config.endpoint.model, "gemma:2b");
        assert_eq!(config.endpoint.api_key, "ollama");
        assert!(!config.endpoint.stream);
        assert_eq!(config.endpoint.timeout_secs, 300);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let mut endpoint = EndpointConfig::default();
        assert_eq!(endpoint.completions_url(), "http://localhost:11434/v1/chat/completions");
        endpoint.base_url = "http://gpu-box:8000/v1/".to_string();
        assert_eq!(endpoint.completions_url(), "http://gpu-box:8000/v1/chat/completions");
    }

    #[test]
    fn test_example_toml_parses_to_defaults() {
        let config: Config = toml::from_str(Config::example_toml()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[endpoint]\nmodel = \"llama3\"\n").unwrap();
        assert_eq!(config.endpoint.model, "llama3");
        assert_eq!(config.endpoint.base_url, "http://localhost:11434/v1");
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("WARNING").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("debug").unwrap().as_str(), "debug");
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
        assert!(LogLevel::from_str("loud").is_err());
    }
}
