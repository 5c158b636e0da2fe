//!
//! Tool-call recognition strategies.
//!
//! Each strategy is a pure function from model text to an optional tool-call intent.
//! They are tried in a fixed order by [`super::extract`].
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::literal::{parse_literal, parse_literal_prefix};
use crate::model::ToolCallIntent;

/* --- constants ------------------------------------------------------------------------------ */

/** Key naming the tool in structured answers */
const TOOL_CALL_KEY: &str = "tool_call";

/** Key holding the tool arguments in structured answers */
const ARGS_KEY: &str = "args";

/** Quoted key searched for by the strict-JSON strategy */
const QUOTED_TOOL_CALL_KEY: &str = "\"tool_call\"";

static EMPHASIZED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\*\*tool_call\W*\*\*\W*["']?(\w+)["']?"#).unwrap());

static EMPHASIZED_ARGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*args\W*\*\*\W*(\{)").unwrap());

static LAZY_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["'](\w+)["'],\s*(\{)"#).unwrap());

/* --- start of code -------------------------------------------------------------------------- */

///
/// Literal-structure strategy: the whole text is a dictionary literal.
///
/// Accepts single quotes, Python keywords, tuples and trailing commas.
///
/// # Arguments
///  * `text` - trimmed model text
///
/// # Returns
///  * the intent when the text is a mapping with a string `tool_call`
pub fn literal_structure(text: &str) -> Option<ToolCallIntent> {
    if !text.starts_with('{') || !text.contains(TOOL_CALL_KEY) {
        return None;
    }
    let value = parse_literal(text)
        .inspect_err(|e| tracing::debug!("Literal-structure strategy miss: {}", e))
        .ok()?;
    intent_from_mapping(&value)
}

///
/// Strict-JSON strategy: a JSON object with a `tool_call` key embedded anywhere in text.
///
/// For every `"tool_call"` occurrence, objects starting at each preceding `{` are tried
/// from the nearest outwards, so the smallest enclosing object wins.
pub fn strict_json(text: &str) -> Option<ToolCallIntent> {
    for (key_pos, _) in text.match_indices(QUOTED_TOOL_CALL_KEY) {
        let key_end = key_pos + QUOTED_TOOL_CALL_KEY.len();

        for (open, _) in text[..key_pos].rmatch_indices('{') {
            let Some((value, used)) = json_prefix(&text[open..]) else {
                continue;
            };
            if open + used < key_end {
                continue;
            }
            if let Some(intent) = intent_from_mapping(&value) {
                return Some(intent);
            }
        }
    }
    None
}

///
/// Emphasized-markup strategy: `**tool_call:** name` with an optional `**args:** {...}`.
///
/// Arguments that fail to parse as JSON become an empty mapping.
pub fn emphasized_markup(text: &str) -> Option<ToolCallIntent> {
    let name = EMPHASIZED_NAME.captures(text)?.get(1)?.as_str().to_string();

    let args = EMPHASIZED_ARGS
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|brace| json_prefix(&text[brace.start()..]))
        .and_then(|(value, _)| match value {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_default();

    Some(ToolCallIntent { name, args })
}

///
/// Lazy-comma strategy: `"name", {...}` as if the model wrote call arguments.
///
/// The block is parsed as JSON, then as a relaxed literal; only non-empty mappings count.
pub fn lazy_comma(text: &str) -> Option<ToolCallIntent> {
    LAZY_COMMA.captures_iter(text).find_map(|caps| {
        let name = caps.get(1)?.as_str();
        let block = &text[caps.get(2)?.start()..];

        let value = json_prefix(block)
            .or_else(|| parse_literal_prefix(block).ok())
            .map(|(value, _)| value)?;

        match value {
            Value::Object(args) if !args.is_empty() => {
                Some(ToolCallIntent { name: name.to_string(), args })
            }
            _ => None,
        }
    })
}

/// Parse the first JSON value at the start of `text`, returning it and its byte length.
fn json_prefix(text: &str) -> Option<(Value, usize)> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => Some((value, stream.byte_offset())),
        _ => None,
    }
}

///
/// Build an intent from a `{tool_call, args}` mapping.
///
/// `tool_call` must be a non-empty string and `args`, when present, a mapping.
fn intent_from_mapping(value: &Value) -> Option<ToolCallIntent> {
    let object = value.as_object()?;
    let name = object.get(TOOL_CALL_KEY)?.as_str().filter(|name| !name.is_empty())?;
    let args = match object.get(ARGS_KEY) {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(args)) => args.clone(),
        Some(_) => return None,
    };
    Some(ToolCallIntent { name: name.to_string(), args })
}
