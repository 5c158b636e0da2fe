//!
//! Loop-prevention gate.
//!
//! A model that has just been handed a tool result tends to call the tool again. Tool
//! calls are therefore only honoured when the conversation does not end on a tool message.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

use crate::model::{WireMessage, WireRole};

///
/// Decide whether tool calls may be recovered from the next reply.
///
/// # Arguments
///  * `messages` - wire messages about to be sent
///
/// # Returns
///  * false when the last message is a tool result, true otherwise (including empty input)
pub fn allow_tools(messages: &[WireMessage]) -> bool {
    let allowed = messages.last().is_none_or(|last| last.role != WireRole::Tool);
    if !allowed {
        tracing::debug!("Last message is a tool result; blocking tool calls for this reply");
    }
    allowed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_conversation_allows_tools() {
        assert!(allow_tools(&[]));
    }

    #[test]
    fn test_last_tool_message_blocks() {
        let messages = vec![
            WireMessage::text(WireRole::User, "ROCK"),
            WireMessage::tool_result("call_1", r#"{"round_winner":"USER"}"#.to_string()),
        ];
        assert!(!allow_tools(&messages));
    }

    #[test]
    fn test_other_last_roles_allow() {
        for role in [WireRole::System, WireRole::User, WireRole::Assistant] {
            let messages = vec![
                WireMessage::tool_result("call_1", "{}".to_string()),
                WireMessage::text(role, "next"),
            ];
            assert!(allow_tools(&messages), "role {} should allow tools", role.as_str());
        }
    }
}
