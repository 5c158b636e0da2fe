//!
//! Error handling for the local chat-completion bridge.
//!
//! Defines the error types raised below the bridge boundary. Transport failures never
//! leave the bridge as errors: [`crate::bridge::Bridge`] folds them into text replies
//! with [`BridgeError::reply_text`]. Configuration errors are real errors.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use thiserror::Error;

/* --- types ----------------------------------------------------------------------------------- */

///
/// Bridge error types.
///
/// Covers configuration loading and everything that can go wrong talking to the
/// completion endpoint.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Endpoint answered with a non-200 status.
    #[error("Upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Connection refused, DNS failure, timeout, broken stream.
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/* --- start of code -------------------------------------------------------------------------- */

/// Result type alias for cleaner error handling throughout the crate
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    ///
    /// Render the error as the text reply surfaced to the model/user.
    ///
    /// Upstream failures echo the endpoint body; connection failures name the URL.
    pub fn reply_text(&self) -> String {
        match self {
            BridgeError::Upstream { body, .. } => format!("Error: {}", body),
            BridgeError::Request { url, source } => {
                format!("Error connecting to local model ({}): {}", url, source)
            }
            other => format!("Error: {}", other),
        }
    }
}
