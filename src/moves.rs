//!
//! Game-tool contract: tool name, argument keys and the move vocabulary.
//!
//! The game engine itself lives outside this crate; the bridge only needs to know how a
//! round is requested and how moves appear in free user text.
//!
//! Authors:
//!   Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp

/* --- uses ------------------------------------------------------------------------------------ */

use std::fmt;
use std::sync::LazyLock;

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

/* --- constants ------------------------------------------------------------------------------ */

/** Name of the canonical game-action tool */
pub const GAME_TOOL_NAME: &str = "manage_game_state";

/** Argument key holding the user's move */
pub const USER_MOVE_ARG: &str = "user_move";

/** Argument key holding the bot's move */
pub const BOT_MOVE_ARG: &str = "bot_move";

/** Moves a synthesized opponent may pick */
pub const STANDARD_MOVES: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

/** Precedence used when correcting a parsed user move */
const OVERRIDE_PRECEDENCE: [Move; 4] = [Move::Bomb, Move::Rock, Move::Paper, Move::Scissors];

static MOVE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(ROCK|PAPER|SCISSORS?|BOMB)\b").unwrap());

/* --- types ----------------------------------------------------------------------------------- */

///
/// A move in Rock-Paper-Scissors-Plus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
    /** special move, usable once per match */
    Bomb,
}

/* --- start of code -------------------------------------------------------------------------- */

impl Move {
    /// Canonical upper-case spelling used on the tool contract.
    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Rock => "ROCK",
            Move::Paper => "PAPER",
            Move::Scissors => "SCISSORS",
            Move::Bomb => "BOMB",
        }
    }

    /// Substring that identifies the move inside upper-cased text.
    fn keyword(&self) -> &'static str {
        match self {
            Move::Scissors => "SCISSOR",
            other => other.as_str(),
        }
    }

    ///
    /// Parse an upper-case keyword, accepting the singular `SCISSOR`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "ROCK" => Some(Move::Rock),
            "PAPER" => Some(Move::Paper),
            "SCISSOR" | "SCISSORS" => Some(Move::Scissors),
            "BOMB" => Some(Move::Bomb),
            _ => None,
        }
    }

    /// Uniform pick among the three standard moves.
    pub fn random_standard<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *STANDARD_MOVES.choose(rng).unwrap_or(&Move::Rock)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// Find the first whole-word move keyword in the text.
///
/// The text is upper-cased before matching; the leftmost keyword wins.
///
/// # Arguments
///  * `text` - free user text
///
/// # Returns
///  * the move named first, if any
pub fn find_move_word(text: &str) -> Option<Move> {
    let upper = text.to_uppercase();
    MOVE_KEYWORD.captures(&upper).and_then(|caps| Move::from_keyword(&caps[1]))
}

///
/// Find a move by substring in fixed precedence order: BOMB, ROCK, PAPER, SCISSOR.
///
/// Unlike [`find_move_word`] this ignores word boundaries and position; the first move in
/// precedence order that appears anywhere in the text wins.
pub fn find_move_by_precedence(text: &str) -> Option<Move> {
    let upper = text.to_uppercase();
    OVERRIDE_PRECEDENCE.into_iter().find(|mv| upper.contains(mv.keyword()))
}
