//!
//! Transport to the OpenAI-compatible completion endpoint.
//!
//! One POST per bridge cycle, no retries. Connections are not pooled: each one is closed
//! once its response has been consumed or dropped. Streaming replies are folded into a
//! single string by [`crate::streaming`] before they leave this module.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::config::EndpointConfig;
use crate::error::{BridgeError, Result};
use crate::model::WireMessage;
use crate::streaming;

/* --- constants ------------------------------------------------------------------------------ */

/** Content type header for JSON requests */
const CONTENT_TYPE_JSON: &str = "application/json";

/** Authorization header name */
const AUTHORIZATION_HEADER: &str = "Authorization";

/** Bearer token prefix */
const BEARER_PREFIX: &str = "Bearer ";

/* --- types ----------------------------------------------------------------------------------- */

///
/// A backend able to complete a chat.
///
/// Implementations return the reply text; the bridge decides what the text means.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    ///
    /// Send the conversation and return the model's reply text.
    ///
    /// # Arguments
    ///  * `messages` - ordered wire messages
    ///  * `stream` - request a streamed reply
    ///
    /// # Returns
    ///  * reply text, possibly empty
    ///  * `BridgeError::Upstream` for a non-200 answer, `BridgeError::Request` for network faults
    async fn complete(&self, messages: &[WireMessage], stream: bool) -> Result<String>;
}

///
/// Request body of `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [WireMessage],
    pub stream: bool,
}

///
/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    /** full chat-completions URL */
    url: String,
    model: String,
    api_key: String,
}

/* --- start of code -------------------------------------------------------------------------- */

impl HttpTransport {
    ///
    /// Create a transport for the configured endpoint.
    ///
    /// # Arguments
    ///  * `endpoint` - endpoint settings (URL, model, credential, timeout)
    ///
    /// # Returns
    ///  * transport with a client carrying the configured timeout
    ///  * `BridgeError::Config` if the HTTP client cannot be built
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(endpoint.timeout())
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| BridgeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: endpoint.completions_url(),
            model: endpoint.model.clone(),
            api_key: endpoint.api_key.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_error(&self, source: reqwest::Error) -> BridgeError {
        BridgeError::Request { url: self.url.clone(), source }
    }

    ///
    /// Fail with `BridgeError::Upstream` unless the endpoint answered 200.
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        tracing::error!("Endpoint returned {}: {}", status, body);
        Err(BridgeError::Upstream { status: status.as_u16(), body })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn complete(&self, messages: &[WireMessage], stream: bool) -> Result<String> {
        let request = CompletionRequest { model: &self.model, messages, stream };
        tracing::debug!(
            "POST {} model={} messages={} last_role={} stream={}",
            self.url,
            self.model,
            messages.len(),
            messages.last().map_or("none", |m| m.role.as_str()),
            stream
        );

        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION_HEADER, format!("{}{}", BEARER_PREFIX, self.api_key))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let response = self.check_status(response).await?;

        if stream {
            return streaming::accumulate(response.bytes_stream())
                .await
                .map_err(|e| self.request_error(e));
        }

        let body = response.text().await.map_err(|e| self.request_error(e))?;
        Ok(message_content(&body))
    }
}

///
/// Extract `choices[0].message.content` from a non-streamed completion body.
///
/// Malformed or incomplete bodies yield an empty string.
pub fn message_content(body: &str) -> String {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Completion body is not JSON: {}", e);
            return String::new();
        }
    };

    parsed
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
