//!
//! Override correction of the parsed user move.
//!
//! Small models mis-transcribe the user's move. The literal user text is authoritative:
//! when it names a move, that move replaces whatever the model put in `user_move`.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

use serde_json::Value;

use crate::model::ParseResult;
use crate::moves::{self, GAME_TOOL_NAME, USER_MOVE_ARG};

///
/// Force `user_move` of a game-tool call to the move named in the user's text.
///
/// Moves are matched by substring in the order BOMB, ROCK, PAPER, SCISSOR. Other tools,
/// plain text and blocked cycles pass through untouched.
///
/// # Arguments
///  * `result` - output of extraction and fallback
///  * `last_text` - text of the last wire message
///  * `allow_tools` - gate decision
///
/// # Returns
///  * the possibly corrected result
pub fn correct(mut result: ParseResult, last_text: &str, allow_tools: bool) -> ParseResult {
    if !allow_tools {
        return result;
    }
    let ParseResult::ToolCall { intent, .. } = &mut result else {
        return result;
    };
    if intent.name != GAME_TOOL_NAME {
        return result;
    }
    let Some(user_move) = moves::find_move_by_precedence(last_text) else {
        return result;
    };

    let previous = intent.args.insert(USER_MOVE_ARG.to_string(), Value::from(user_move.as_str()));
    if previous.as_ref().and_then(Value::as_str) != Some(user_move.as_str()) {
        tracing::warn!(
            "Overriding parsed user_move {:?} with {} from user text",
            previous,
            user_move
        );
    }
    result
}
