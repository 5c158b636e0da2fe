//!
//! Data model shared by every bridge stage.
//!
//! Two families of types live here: the structured conversation owned by the agent
//! runtime (turns made of text, tool-call and tool-result parts) and the flattened,
//! role-tagged wire messages understood by OpenAI-compatible completion endpoints.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/* --- constants ------------------------------------------------------------------------------ */

/** Prefix for call ids generated by the bridge */
const CALL_ID_PREFIX: &str = "call_";

/** Tool call type understood by chat-completion endpoints */
const FUNCTION_CALL_TYPE: &str = "function";

/* --- conversation types --------------------------------------------------------------------- */

///
/// Role of a turn in the agent runtime's conversation.
///
/// The runtime calls the assistant side `model`; both spellings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    #[serde(alias = "assistant")]
    Model,
    System,
    Tool,
}

///
/// One piece of a conversation turn.
///
/// Exactly one variant per part; the runtime never mixes payloads inside a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /** plain text */
    Text { text: String },
    /** a tool invocation previously issued by the model */
    ToolCall {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        #[serde(default)]
        args: Map<String, Value>,
    },
    /** the result of running a tool, referencing the originating call */
    ToolResult {
        call_id: String,
        #[serde(default)]
        response: Value,
    },
}

///
/// A single turn of the runtime's conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /** who authored the turn */
    pub role: TurnRole,
    /** ordered parts of the turn */
    #[serde(default)]
    pub parts: Vec<Part>,
}

///
/// System instruction attached to a request, either raw text or a list of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SystemInstruction {
    Text(String),
    Parts(Vec<Part>),
}

///
/// Request handed to the bridge by the agent runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmRequest {
    /** optional system instruction */
    #[serde(default)]
    pub system_instruction: Option<SystemInstruction>,
    /** conversation so far, oldest first */
    #[serde(default)]
    pub contents: Vec<ConversationTurn>,
}

/* --- wire types ----------------------------------------------------------------------------- */

///
/// Role of a wire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    System,
    User,
    Assistant,
    Tool,
}

///
/// Function part of a tool call on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /** tool name */
    pub name: String,
    /** JSON-encoded argument object */
    pub arguments: String,
}

///
/// Tool call request as carried by assistant wire messages and bridge replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /** call id, unique within the conversation */
    pub id: String,
    /** always `function` */
    #[serde(rename = "type")]
    pub call_type: String,
    /** function name and encoded arguments */
    pub function: FunctionCall,
}

///
/// Flattened, role-tagged message sent to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    /** text content; `null` for pure tool-call messages */
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/* --- extraction types ----------------------------------------------------------------------- */

///
/// A tool invocation recovered from model text, before an id is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallIntent {
    pub name: String,
    pub args: Map<String, Value>,
}

///
/// Outcome of tool-call extraction; exactly one of the two holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult {
    ToolCall { id: String, intent: ToolCallIntent },
    PlainText(String),
}

/* --- reply types ---------------------------------------------------------------------------- */

///
/// Content of the structured reply returned to the agent runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyContent {
    Text(String),
    ToolCall(ToolCallRequest),
}

///
/// Structured reply of one bridge cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeReply {
    pub content: ReplyContent,
    /** false for error replies */
    pub turn_complete: bool,
}

/* --- start of code -------------------------------------------------------------------------- */

///
/// Generate a fresh tool call id (`call_<uuid-v4>`).
pub fn new_call_id() -> String {
    format!("{}{}", CALL_ID_PREFIX, uuid::Uuid::new_v4())
}

/// Encode a JSON value the way the wire expects it; empty or null payloads become `{}`.
pub(crate) fn encode_payload(value: &Value) -> String {
    let is_empty = match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if is_empty { "{}".to_string() } else { value.to_string() }
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: String) -> Self {
        Self {
            id: id.into(),
            call_type: FUNCTION_CALL_TYPE.to_string(),
            function: FunctionCall { name: name.into(), arguments },
        }
    }

    ///
    /// Promote an extracted intent to a full request under the given id.
    pub fn from_intent(id: String, intent: &ToolCallIntent) -> Self {
        let arguments = encode_payload(&Value::Object(intent.args.clone()));
        Self::new(id, intent.name.clone(), arguments)
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    ///
    /// Decode the argument string back into a JSON object.
    ///
    /// # Returns
    ///  * the argument mapping, empty if the string is not a JSON object
    pub fn arguments(&self) -> Map<String, Value> {
        match serde_json::from_str::<Value>(&self.function.arguments) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

impl WireMessage {
    pub fn text(role: WireRole, content: impl Into<String>) -> Self {
        Self { role, content: Some(content.into()), tool_calls: None, tool_call_id: None }
    }

    pub fn tool_calls(role: WireRole, content: Option<String>, calls: Vec<ToolCallRequest>) -> Self {
        Self { role, content, tool_calls: Some(calls), tool_call_id: None }
    }

    pub fn tool_result(call_id: impl Into<String>, content: String) -> Self {
        Self {
            role: WireRole::Tool,
            content: Some(content),
            tool_calls: None,
            tool_call_id: Some(call_id.into()),
        }
    }

    /// Text content, or the empty string for `null` content.
    pub fn content_str(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

impl WireRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireRole::System => "system",
            WireRole::User => "user",
            WireRole::Assistant => "assistant",
            WireRole::Tool => "tool",
        }
    }
}

impl ParseResult {
    pub fn is_tool_call(&self) -> bool {
        matches!(self, ParseResult::ToolCall { .. })
    }
}

impl BridgeReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self { content: ReplyContent::Text(text.into()), turn_complete: true }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { content: ReplyContent::Text(text.into()), turn_complete: false }
    }

    pub fn tool_call(call: ToolCallRequest) -> Self {
        Self { content: ReplyContent::ToolCall(call), turn_complete: true }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCallRequest> {
        match &self.content {
            ReplyContent::ToolCall(call) => Some(call),
            ReplyContent::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            ReplyContent::Text(text) => Some(text),
            ReplyContent::ToolCall(_) => None,
        }
    }
}

impl From<ParseResult> for BridgeReply {
    fn from(result: ParseResult) -> Self {
        match result {
            ParseResult::ToolCall { id, intent } => {
                BridgeReply::tool_call(ToolCallRequest::from_intent(id, &intent))
            }
            ParseResult::PlainText(text) => BridgeReply::text(text),
        }
    }
}
