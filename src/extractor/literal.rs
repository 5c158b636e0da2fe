//!
//! Relaxed literal parser.
//!
//! Small models often answer with dictionary literals rather than strict JSON: single-quoted
//! strings, `True`/`False`/`None`, tuples and trailing commas. This parser accepts that
//! superset of JSON and produces a [`serde_json::Value`].
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use serde_json::{Map, Number, Value};
use thiserror::Error;

/* --- constants ------------------------------------------------------------------------------ */

/** Maximum container nesting accepted */
const MAX_DEPTH: usize = 64;

/* --- types ----------------------------------------------------------------------------------- */

///
/// Failure to parse a relaxed literal.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{reason} at offset {offset}")]
pub struct LiteralError {
    /** byte offset into the input */
    pub offset: usize,
    pub reason: &'static str,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

/* --- start of code -------------------------------------------------------------------------- */

///
/// Parse a whole string as one relaxed literal.
///
/// Surrounding whitespace is allowed; anything else after the value is an error.
///
/// # Arguments
///  * `text` - literal source
///
/// # Returns
///  * the parsed value
///  * `LiteralError` with the offending offset
pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser::new(text);
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.pos != text.len() {
        return Err(parser.error("trailing characters"));
    }
    Ok(value)
}

///
/// Parse one relaxed literal at the start of `text`, ignoring whatever follows it.
///
/// # Returns
///  * the parsed value and the number of bytes it consumed
pub fn parse_literal_prefix(text: &str) -> Result<(Value, usize), LiteralError> {
    let mut parser = Parser::new(text);
    let value = parser.parse_value()?;
    Ok((value, parser.pos))
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    fn error(&self, reason: &'static str) -> LiteralError {
        LiteralError { offset: self.pos, reason }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, expected: char, reason: &'static str) -> Result<(), LiteralError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            _ => Err(self.error(reason)),
        }
    }

    fn parse_value(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.nested(Self::parse_dict),
            Some('[') => self.nested(|p| p.parse_sequence('[', ']')),
            Some('(') => self.nested(|p| p.parse_sequence('(', ')')),
            Some('"') | Some('\'') => self.parse_string().map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_keyword(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Value, LiteralError>,
    ) -> Result<Value, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_dict(&mut self) -> Result<Value, LiteralError> {
        self.expect('{', "expected '{'")?;
        let mut map = Map::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Object(map));
            }

            let key = match self.peek() {
                Some('"') | Some('\'') => self.parse_string()?,
                _ => return Err(self.error("dictionary keys must be strings")),
            };
            self.expect(':', "expected ':' after key")?;
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(Value::Object(map)),
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    /// Lists and tuples; `(x)` without a comma is just `x`.
    fn parse_sequence(&mut self, open: char, close: char) -> Result<Value, LiteralError> {
        self.expect(open, "expected sequence opening")?;
        let mut items = Vec::new();
        let mut saw_comma = false;

        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.pos += 1;
                break;
            }

            items.push(self.parse_value()?);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => saw_comma = true,
                Some(c) if c == close => break,
                _ => return Err(self.error("expected ',' or end of sequence")),
            }
        }

        if open == '(' && !saw_comma && items.len() == 1 {
            return Ok(items.remove(0));
        }
        Ok(Value::Array(items))
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("expected string")),
        };
        let mut out = String::new();

        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('u') => self.parse_unicode_escape()?,
                        Some(c @ ('\\' | '\'' | '"' | '/')) => c,
                        Some(other) => {
                            // unknown escapes keep their backslash
                            out.push('\\');
                            other
                        }
                        None => return Err(self.error("unterminated escape")),
                    };
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_unicode_escape(&mut self) -> Result<char, LiteralError> {
        let hex = self.src.get(self.pos..self.pos + 4).ok_or_else(|| self.error("short unicode escape"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid unicode escape"))?;
        self.pos += 4;
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode scalar"))
    }

    fn parse_number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E' | '_') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let token: String = self.src[start..self.pos].chars().filter(|c| *c != '_').collect();
        let token = token.strip_prefix('+').unwrap_or(&token);

        if let Ok(int) = token.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        token
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(LiteralError { offset: start, reason: "invalid number" })
    }

    fn parse_keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            _ => Err(LiteralError { offset: start, reason: "unknown identifier" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_quoted_dict() {
        let value = parse_literal("{'tool_call': 'X', 'args': {'a': 1}}").unwrap();
        assert_eq!(value, json!({"tool_call": "X", "args": {"a": 1}}));
    }

    #[test]
    fn test_python_and_json_keywords() {
        let value = parse_literal("{'a': True, 'b': False, 'c': None, 'd': true, 'e': null}").unwrap();
        assert_eq!(value, json!({"a": true, "b": false, "c": null, "d": true, "e": null}));
    }

    #[test]
    fn test_trailing_commas_and_tuples() {
        let value = parse_literal("{'moves': ('ROCK', 'PAPER',), 'n': [1, 2,], }").unwrap();
        assert_eq!(value, json!({"moves": ["ROCK", "PAPER"], "n": [1, 2]}));
    }

    #[test]
    fn test_parenthesized_value_is_not_a_tuple() {
        assert_eq!(parse_literal("(5)").unwrap(), json!(5));
        assert_eq!(parse_literal("(5,)").unwrap(), json!([5]));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_literal("-3").unwrap(), json!(-3));
        assert_eq!(parse_literal("2.5").unwrap(), json!(2.5));
        assert_eq!(parse_literal("1_000").unwrap(), json!(1000));
        assert!(parse_literal("1.2.3").is_err());
    }

    #[test]
    fn test_string_escapes() {
        let value = parse_literal(r#"'it\'s "fine"\nA'"#).unwrap();
        assert_eq!(value, json!("it's \"fine\"\nA"));
    }

    #[test]
    fn test_rejects_trailing_text_and_bad_keys() {
        assert!(parse_literal("{'a': 1} extra").is_err());
        assert!(parse_literal("{1: 'a'}").is_err());
        assert!(parse_literal("{'a': undefined}").is_err());
        assert!(parse_literal("{'a': 1").is_err());
    }

    #[test]
    fn test_prefix_reports_consumed_length() {
        let (value, used) = parse_literal_prefix("{'a': 1} and more").unwrap();
        assert_eq!(value, json!({"a": 1}));
        assert_eq!(used, 8);
    }

    #[test]
    fn test_nesting_limit() {
        let deep = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
        assert_eq!(parse_literal(&deep).unwrap_err().reason, "nesting too deep");
    }
}
