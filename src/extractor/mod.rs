//!
//! Tool-call extraction from free model text.
//!
//! Models served by local endpoints rarely emit native tool calls. They describe the call
//! in text instead: a dictionary literal, a JSON object buried in prose, markdown labels
//! or a bare `"name", {args}` pair. The extractor runs an ordered list of recognizers and
//! returns the first intent found, or the text itself.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

pub mod literal;
pub mod strategies;

use crate::model::{ParseResult, ToolCallIntent, new_call_id};

pub use literal::{LiteralError, parse_literal};

/* --- types ----------------------------------------------------------------------------------- */

/// A recognizer: pure function from trimmed text to an optional intent.
pub type Strategy = fn(&str) -> Option<ToolCallIntent>;

/* --- constants ------------------------------------------------------------------------------ */

/** Reply substituted for tool-shaped text while tools are blocked */
pub const ROUND_COMPLETE_MESSAGE: &str = "Round complete. Waiting for your next move...";

/** Marker that makes text look like a tool call */
const TOOL_CALL_MARKER: &str = "tool_call";

/** Recognizers in priority order */
pub const STRATEGIES: [(&str, Strategy); 4] = [
    ("literal", strategies::literal_structure),
    ("json", strategies::strict_json),
    ("markup", strategies::emphasized_markup),
    ("comma", strategies::lazy_comma),
];

/* --- start of code -------------------------------------------------------------------------- */

///
/// Recover a tool-call intent from model text.
///
/// # Arguments
///  * `text` - raw reply text; trimmed before inspection
///  * `allow_tools` - false right after a tool result, to stop call loops
///
/// # Returns
///  * `ParseResult::ToolCall` with a fresh id for the first strategy that matches
///  * `ParseResult::PlainText` with the trimmed text otherwise
pub fn extract(text: &str, allow_tools: bool) -> ParseResult {
    let text = text.trim();

    if !allow_tools {
        if text.contains(TOOL_CALL_MARKER) || text.starts_with('{') {
            tracing::info!("Suppressing tool-shaped reply while tools are blocked");
            return ParseResult::PlainText(ROUND_COMPLETE_MESSAGE.to_string());
        }
        return ParseResult::PlainText(text.to_string());
    }

    for (label, strategy) in STRATEGIES {
        match strategy(text) {
            Some(intent) => {
                let id = new_call_id();
                tracing::info!(
                    "Detected tool call ({}): {} {:?} id={}",
                    label,
                    intent.name,
                    intent.args,
                    id
                );
                return ParseResult::ToolCall { id, intent };
            }
            None => tracing::debug!("Strategy '{}' found no tool call", label),
        }
    }

    ParseResult::PlainText(text.to_string())
}
