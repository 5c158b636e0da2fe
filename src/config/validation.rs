//!
//! Configuration validation for refbridge.
//!
//! Collects every problem before failing so a user fixes a config in one pass. Problems
//! that still allow the bridge to run are reported as warnings.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use crate::config::{Config, LogLevel};
use crate::error::{BridgeError, Result};

/* --- constants ------------------------------------------------------------------------------- */

/// Timeouts above this are almost certainly a unit mistake
const MAX_SENSIBLE_TIMEOUT_SECS: u64 = 3600;

/* --- types ----------------------------------------------------------------------------------- */

///
/// Configuration validator.
pub struct ConfigValidator<'a> {
    /// Configuration to validate
    config: &'a Config,
    /// Validation errors collected during validation
    errors: Vec<String>,
    /// Validation warnings collected during validation
    warnings: Vec<String>,
}

/* --- implementations --------------------------------------------------------------------- */

impl<'a> ConfigValidator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config, errors: Vec::new(), warnings: Vec::new() }
    }

    /// Perform configuration validation
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is valid (warnings are logged)
    /// * `Err(BridgeError)` - Validation failed; the message lists every error
    pub fn validate(mut self) -> Result<()> {
        self.validate_endpoint_config();
        self.validate_logging_config();

        for warning in &self.warnings {
            tracing::warn!("Configuration warning: {}", warning);
        }

        if !self.errors.is_empty() {
            let error_msg = format!(
                "Configuration validation failed with {} error(s):\n\n{}\n\
                 \n\
                 Please fix these issues and try again.",
                self.errors.len(),
                self.errors
                    .iter()
                    .enumerate()
                    .map(|(i, e)| format!("{}. {}", i + 1, e))
                    .collect::<Vec<_>>()
                    .join("\n")
            );
            return Err(BridgeError::Config(error_msg));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Run the checks and return only the warnings
    pub fn warnings(mut self) -> Vec<String> {
        self.validate_endpoint_config();
        self.validate_logging_config();
        self.warnings
    }

    /* --- private validation methods ------------------------------------------------------ */

    /// Validate endpoint configuration
    fn validate_endpoint_config(&mut self) {
        let endpoint = &self.config.endpoint;
        let base_url = endpoint.base_url.trim();

        if base_url.is_empty() {
            self.add_error("endpoint.base_url cannot be empty".to_string());
        } else if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            self.add_error(format!(
                "Invalid endpoint.base_url '{}': must start with http:// or https://",
                base_url
            ));
        } else if base_url.trim_end_matches('/').ends_with("/chat/completions") {
            self.add_warning(format!(
                "endpoint.base_url '{}' already ends with /chat/completions; \
                 the path is appended automatically",
                base_url
            ));
        }

        if endpoint.model.trim().is_empty() {
            self.add_error("endpoint.model cannot be empty".to_string());
        }

        if endpoint.timeout_secs == 0 {
            self.add_error("endpoint.timeout_secs cannot be zero".to_string());
        } else if endpoint.timeout_secs > MAX_SENSIBLE_TIMEOUT_SECS {
            self.add_warning(format!(
                "Long request timeout ({}s) may leave the agent waiting",
                endpoint.timeout_secs
            ));
        }

        if endpoint.api_key.is_empty() {
            self.add_warning(
                "endpoint.api_key is empty; requests are sent with an empty bearer token"
                    .to_string(),
            );
        }
    }

    /// Validate logging configuration
    fn validate_logging_config(&mut self) {
        if self.config.logging.level == LogLevel::Trace {
            self.add_warning(
                "Trace log level enabled: full prompts and replies will be logged".to_string(),
            );
        }
    }

    /// Add a validation error
    fn add_error(&mut self, error: String) {
        tracing::debug!("Validation error: {}", error);
        self.errors.push(error);
    }

    /// Add a validation warning
    fn add_warning(&mut self, warning: String) {
        tracing::debug!("Validation warning: {}", warning);
        self.warnings.push(warning);
    }
}

/* --- tests ------------------------------------------------------------------------------- */
