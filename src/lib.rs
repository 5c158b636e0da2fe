//! # refbridge - structured agent runtime to local chat-completion bridge
//!
//! Small local models served behind an OpenAI-compatible endpoint (Ollama, llama.cpp,
//! vLLM) understand role-tagged text and little else. This crate lets a structured agent
//! runtime drive them anyway: the conversation is flattened into wire messages, the free
//! text reply is searched for a tool invocation, and a few game-specific heuristics keep
//! a Rock-Paper-Scissors-Plus referee moving when the model misbehaves.
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use refbridge::{Bridge, Config, ConversationTurn, LlmRequest, Part, TurnRole};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let bridge = Bridge::from_config(&config.endpoint)?;
//!
//!     let request = LlmRequest {
//!         system_instruction: None,
//!         contents: vec![ConversationTurn {
//!             role: TurnRole::User,
//!             parts: vec![Part::Text { text: "I choose rock".to_string() }],
//!         }],
//!     };
//!
//!     let reply = bridge.generate(&request).await;
//!     println!("{}", serde_json::to_string_pretty(&reply)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`converter`] - runtime turns to wire messages
//! - [`transport`] - HTTP client for `/chat/completions`
//! - [`streaming`] - SSE accumulation
//! - [`extractor`] - tool-call recovery from free text
//! - [`gate`], [`fallback`], [`correction`] - loop prevention and move heuristics
//! - [`bridge`] - one request/response cycle
//! - [`config`] - layered configuration
//! - [`error`] - error types

pub mod bridge;
pub mod config;
pub mod converter;
pub mod correction;
pub mod error;
pub mod extractor;
pub mod fallback;
pub mod gate;
pub mod model;
pub mod moves;
pub mod streaming;
pub mod transport;

// Re-export commonly used types
pub use bridge::Bridge;
pub use config::Config;
pub use error::BridgeError;
pub use model::{
    BridgeReply, ConversationTurn, LlmRequest, ParseResult, Part, ReplyContent,
    SystemInstruction, ToolCallIntent, ToolCallRequest, TurnRole, WireMessage, WireRole,
};
pub use transport::{ChatTransport, HttpTransport};
