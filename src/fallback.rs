//!
//! Fallback tool-call synthesis.
//!
//! When the model answers in prose although the user clearly named a move, the bridge
//! builds the game-tool call itself so the round still advances.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use rand::Rng;
use serde_json::{Map, Value};

use crate::model::{ParseResult, ToolCallIntent, new_call_id};
use crate::moves::{self, BOT_MOVE_ARG, GAME_TOOL_NAME, Move, USER_MOVE_ARG};

/* --- start of code -------------------------------------------------------------------------- */

///
/// Replace a plain-text reply with a synthesized game-tool call when possible.
///
/// The user's move is the leftmost whole-word move in `last_text`; the bot's move is drawn
/// uniformly from the three standard moves.
///
/// # Arguments
///  * `result` - extractor output
///  * `last_text` - text of the last wire message (the user's latest input)
///  * `allow_tools` - gate decision; nothing is synthesized when false
///  * `rng` - random source for the bot move
///
/// # Returns
///  * the synthesized tool call, or `result` unchanged
pub fn synthesize<R: Rng + ?Sized>(
    result: ParseResult,
    last_text: &str,
    allow_tools: bool,
    rng: &mut R,
) -> ParseResult {
    if !allow_tools || result.is_tool_call() {
        return result;
    }

    let Some(user_move) = moves::find_move_word(last_text) else {
        return result;
    };
    let bot_move = Move::random_standard(rng);

    let mut args = Map::new();
    args.insert(USER_MOVE_ARG.to_string(), Value::from(user_move.as_str()));
    args.insert(BOT_MOVE_ARG.to_string(), Value::from(bot_move.as_str()));

    let id = new_call_id();
    tracing::info!(
        "Model did not call the tool; synthesized {} with user_move={} bot_move={} id={}",
        GAME_TOOL_NAME,
        user_move,
        bot_move,
        id
    );

    ParseResult::ToolCall { id, intent: ToolCallIntent { name: GAME_TOOL_NAME.to_string(), args } }
}
