//!
//! One request/response cycle between the agent runtime and the completion endpoint.
//!
//! convert -> gate -> transport -> extract -> fallback -> correction. Transport failures are
//! folded into error text replies; nothing below this point escapes as an error.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use rand::Rng;

use crate::config::EndpointConfig;
use crate::converter::TurnsToWireConverter;
use crate::error::Result;
use crate::model::{BridgeReply, LlmRequest, WireMessage};
use crate::transport::{ChatTransport, HttpTransport};
use crate::{correction, extractor, fallback, gate};

/* --- types ----------------------------------------------------------------------------------- */

///
/// Stateless bridge over a chat transport.
///
/// Safe to share between tasks; every cycle owns its own data.
#[derive(Debug, Clone)]
pub struct Bridge<T> {
    transport: T,
    converter: TurnsToWireConverter,
    /** request streamed replies */
    stream: bool,
}

/* --- start of code -------------------------------------------------------------------------- */

impl Bridge<HttpTransport> {
    ///
    /// Build a bridge talking HTTP to the configured endpoint.
    pub fn from_config(endpoint: &EndpointConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::new(endpoint)?, endpoint.stream))
    }
}

impl<T: ChatTransport> Bridge<T> {
    pub fn new(transport: T, stream: bool) -> Self {
        Self { transport, converter: TurnsToWireConverter::new(), stream }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    ///
    /// Run one cycle with a thread-local random source.
    pub async fn generate(&self, request: &LlmRequest) -> BridgeReply {
        let messages = self.converter.convert(request);
        let reply = self.complete(&messages).await;
        // ThreadRng is !Send, so it is drawn after the await
        let mut rng = rand::thread_rng();
        self.interpret(reply, &messages, &mut rng)
    }

    ///
    /// Run one cycle with an explicit random source.
    ///
    /// # Arguments
    ///  * `request` - runtime request (system instruction and turns)
    ///  * `rng` - source for the synthesized bot move
    ///
    /// # Returns
    ///  * structured reply; transport failures become text replies with `turn_complete=false`
    pub async fn generate_with_rng<R: Rng + Send + ?Sized>(
        &self,
        request: &LlmRequest,
        rng: &mut R,
    ) -> BridgeReply {
        let messages = self.converter.convert(request);
        let reply = self.complete(&messages).await;
        self.interpret(reply, &messages, rng)
    }

    async fn complete(&self, messages: &[WireMessage]) -> Result<String> {
        self.transport.complete(messages, self.stream).await
    }

    /// Turn the transport outcome into a reply.
    fn interpret<R: Rng + ?Sized>(
        &self,
        reply: Result<String>,
        messages: &[WireMessage],
        rng: &mut R,
    ) -> BridgeReply {
        let text = match reply {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Completion request failed: {}", e);
                return BridgeReply::error(e.reply_text());
            }
        };
        tracing::debug!("Model replied with {} byte(s)", text.len());

        let allow_tools = gate::allow_tools(messages);
        let last_text = messages.last().map(WireMessage::content_str).unwrap_or_default();

        let result = extractor::extract(&text, allow_tools);
        let result = fallback::synthesize(result, last_text, allow_tools, rng);
        let result = correction::correct(result, last_text, allow_tools);

        BridgeReply::from(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::model::{ConversationTurn, Part, ReplyContent, SystemInstruction, TurnRole};
    use crate::moves::GAME_TOOL_NAME;
    use async_trait::async_trait;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replays canned replies and records what it was sent.
    struct FakeTransport {
        reply: Mutex<Option<Result<String>>>,
        seen: Mutex<Vec<Vec<WireMessage>>>,
    }

    impl FakeTransport {
        fn replying(reply: Result<String>) -> Self {
            Self { reply: Mutex::new(Some(reply)), seen: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl ChatTransport for FakeTransport {
        async fn complete(&self, messages: &[WireMessage], _stream: bool) -> Result<String> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.reply.lock().unwrap().take().unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn user_request(text: &str) -> LlmRequest {
        LlmRequest {
            system_instruction: Some(SystemInstruction::Text("You are the referee.".to_string())),
            contents: vec![ConversationTurn {
                role: TurnRole::User,
                parts: vec![Part::Text { text: text.to_string() }],
            }],
        }
    }

    #[tokio::test]
    async fn test_json_tool_call_reply() {
        let bridge = Bridge::new(
            FakeTransport::replying(Ok(
                r#"{"tool_call": "manage_game_state", "args": {"user_move": "ROCK", "bot_move": "PAPER"}}"#
                    .to_string(),
            )),
            false,
        );
        let mut rng = StdRng::seed_from_u64(0);

        let reply = bridge.generate_with_rng(&user_request("rock"), &mut rng).await;

        let call = reply.as_tool_call().expect("tool call");
        assert_eq!(call.name(), GAME_TOOL_NAME);
        assert_eq!(call.arguments()["user_move"], "ROCK");
        assert_eq!(call.arguments()["bot_move"], "PAPER");
        assert!(reply.turn_complete);

        let seen = bridge.transport().seen.lock().unwrap();
        assert_eq!(seen[0].len(), 2);
    }

    #[tokio::test]
    async fn test_fallback_when_model_refuses() {
        let bridge = Bridge::new(FakeTransport::replying(Ok("Good choice!".to_string())), false);
        let mut rng = StdRng::seed_from_u64(1);

        let reply = bridge.generate_with_rng(&user_request("I choose bomb"), &mut rng).await;

        let call = reply.as_tool_call().expect("synthesized call");
        let args = call.arguments();
        assert_eq!(args["user_move"], "BOMB");
        assert!(["ROCK", "PAPER", "SCISSORS"].contains(&args["bot_move"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn test_override_corrects_user_move() {
        let bridge = Bridge::new(
            FakeTransport::replying(Ok(
                r#"{"tool_call": "manage_game_state", "args": {"user_move": "ROCK", "bot_move": "SCISSORS"}}"#
                    .to_string(),
            )),
            false,
        );
        let mut rng = StdRng::seed_from_u64(2);

        let reply = bridge.generate_with_rng(&user_request("PAPER please"), &mut rng).await;

        assert_eq!(reply.as_tool_call().unwrap().arguments()["user_move"], "PAPER");
    }

    #[tokio::test]
    async fn test_after_tool_result_tools_are_blocked() {
        let request = LlmRequest {
            system_instruction: None,
            contents: vec![
                ConversationTurn {
                    role: TurnRole::Model,
                    parts: vec![Part::ToolCall {
                        id: Some("call_1".to_string()),
                        name: GAME_TOOL_NAME.to_string(),
                        args: json!({"user_move": "ROCK", "bot_move": "PAPER"})
                            .as_object()
                            .cloned()
                            .unwrap(),
                    }],
                },
                ConversationTurn {
                    role: TurnRole::User,
                    parts: vec![Part::ToolResult {
                        call_id: "call_1".to_string(),
                        response: json!({"round_winner": "BOT"}),
                    }],
                },
            ],
        };
        let bridge = Bridge::new(
            FakeTransport::replying(Ok(r#"{"tool_call": "manage_game_state"}"#.to_string())),
            false,
        );

        let reply = bridge.generate(&request).await;

        assert_eq!(reply.as_text(), Some(extractor::ROUND_COMPLETE_MESSAGE));
        assert!(reply.turn_complete);
    }

    #[tokio::test]
    async fn test_transport_error_becomes_text_reply() {
        let bridge = Bridge::new(
            FakeTransport::replying(Err(BridgeError::Upstream {
                status: 500,
                body: "model not found".to_string(),
            })),
            false,
        );

        let reply = bridge.generate(&user_request("rock")).await;

        assert_eq!(reply.content, ReplyContent::Text("Error: model not found".to_string()));
        assert!(!reply.turn_complete);
    }

    #[tokio::test]
    async fn test_plain_chat_passes_through() {
        let bridge =
            Bridge::new(FakeTransport::replying(Ok("  Welcome to the game!  ".to_string())), false);

        let reply = bridge.generate(&user_request("what are the rules?")).await;

        assert_eq!(reply.as_text(), Some("Welcome to the game!"));
    }
}
