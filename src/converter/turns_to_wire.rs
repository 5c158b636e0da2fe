//!
//! Structured conversation to wire message converter.
//!
//! Flattens the agent runtime's turns (text, tool-call and tool-result parts) into the
//! ordered list of role-tagged messages an OpenAI-compatible endpoint expects. Message
//! order follows the input exactly and no turn yields more than one non-tool message.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use std::collections::HashSet;

use serde_json::Value;

use crate::model::{
    ConversationTurn, LlmRequest, Part, SystemInstruction, ToolCallRequest, TurnRole, WireMessage,
    WireRole, encode_payload, new_call_id,
};

/* --- types ----------------------------------------------------------------------------------- */

///
/// Converter from runtime turns to wire messages.
///
/// Stateless; ids issued while converting are tracked per call only to flag tool results
/// that reference an unknown call.
#[derive(Debug, Default, Clone)]
pub struct TurnsToWireConverter;

/* --- constants ------------------------------------------------------------------------------ */

/** Separator used when joining text parts */
const TEXT_SEPARATOR: &str = "\n";

/* --- start of code -------------------------------------------------------------------------- */

impl TurnsToWireConverter {
    pub fn new() -> Self {
        Self
    }

    ///
    /// Convert a runtime request into wire messages.
    ///
    /// Emits the system instruction first (when present), then each turn in order.
    ///
    /// # Arguments
    ///  * `request` - runtime request holding the system instruction and turns
    ///
    /// # Returns
    ///  * ordered wire messages
    pub fn convert(&self, request: &LlmRequest) -> Vec<WireMessage> {
        let mut messages = Vec::with_capacity(request.contents.len() + 1);

        if let Some(system) = request.system_instruction.as_ref().and_then(system_text) {
            messages.push(WireMessage::text(WireRole::System, system));
        }

        let mut issued_ids = HashSet::new();
        for turn in &request.contents {
            self.convert_turn(turn, &mut messages, &mut issued_ids);
        }

        tracing::debug!(
            "Converted {} turn(s) into {} wire message(s)",
            request.contents.len(),
            messages.len()
        );
        messages
    }

    ///
    /// Convert a single turn, appending its messages to `messages`.
    ///
    /// Tool results are emitted as they appear and supersede the turn's text and
    /// tool-call parts. Otherwise the turn collapses into one message.
    ///
    /// # Arguments
    ///  * `turn` - turn to convert
    ///  * `messages` - output wire messages
    ///  * `issued_ids` - ids of tool calls emitted so far in this conversation
    fn convert_turn(
        &self,
        turn: &ConversationTurn,
        messages: &mut Vec<WireMessage>,
        issued_ids: &mut HashSet<String>,
    ) {
        let role = wire_role(turn.role);
        let mut texts: Vec<&str> = Vec::new();
        let mut tool_calls = Vec::new();
        let mut has_tool_result = false;

        for part in &turn.parts {
            match part {
                Part::Text { text } => {
                    if !text.is_empty() {
                        texts.push(text.as_str());
                    }
                }
                Part::ToolCall { id, name, args } => {
                    let call_id = match id {
                        Some(id) if !id.is_empty() => id.clone(),
                        _ => new_call_id(),
                    };
                    let arguments = encode_payload(&Value::Object(args.clone()));
                    tool_calls.push(ToolCallRequest::new(call_id, name.clone(), arguments));
                }
                Part::ToolResult { call_id, response } => {
                    if !issued_ids.contains(call_id) {
                        tracing::warn!(
                            "Tool result references call id '{}' with no earlier tool call",
                            call_id
                        );
                    }
                    messages.push(WireMessage::tool_result(call_id.clone(), encode_payload(response)));
                    has_tool_result = true;
                }
            }
        }

        if has_tool_result {
            if !texts.is_empty() || !tool_calls.is_empty() {
                tracing::debug!("Dropping text/tool-call parts superseded by a tool result");
            }
            return;
        }

        let text = texts.join(TEXT_SEPARATOR);
        if !tool_calls.is_empty() {
            issued_ids.extend(tool_calls.iter().map(|call| call.id.clone()));
            let content = if text.is_empty() { None } else { Some(text) };
            messages.push(WireMessage::tool_calls(role, content, tool_calls));
        } else if !text.is_empty() {
            messages.push(WireMessage::text(role, text));
        }
    }
}

/// Only the model side maps to `assistant`; every other role speaks as the user.
fn wire_role(role: TurnRole) -> WireRole {
    match role {
        TurnRole::Model => WireRole::Assistant,
        TurnRole::User | TurnRole::System | TurnRole::Tool => WireRole::User,
    }
}

/// Flatten a system instruction; `None` when it carries no text.
fn system_text(instruction: &SystemInstruction) -> Option<String> {
    let text = match instruction {
        SystemInstruction::Text(text) => text.clone(),
        SystemInstruction::Parts(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } if !text.is_empty() => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(TEXT_SEPARATOR),
    };
    if text.is_empty() { None } else { Some(text) }
}
