//! Fixed-width move notation used by the move logs
//!
//! A move is six characters: origin, captured square (two spaces when
//! nothing is captured) and destination, e.g. `"a4  b3"` or `"a4b5c6"`.
//! A recorded move prefixes the side flag (`1` white, `0` black): `"1a4  b3"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Square;
use crate::error::NotationError;
use crate::game::Move;
use crate::pieces::Side;

/// Length of an encoded move
pub const MOVE_WIDTH: usize = 6;

const NO_CAPTURE: &str = "  ";

/// A move together with the side that played it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordedMove {
    pub side: Side,
    pub mv: Move,
}

impl RecordedMove {
    pub fn new(side: Side, mv: Move) -> Self {
        Self { side, mv }
    }
}

impl fmt::Display for RecordedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side.flag(), encode_move(&self.mv))
    }
}

impl FromStr for RecordedMove {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_recorded(s)
    }
}

/// Encode a move as six characters
pub fn encode_move(mv: &Move) -> String {
    let mut out = String::with_capacity(MOVE_WIDTH);
    out.push_str(&mv.from.to_string());
    match mv.captured {
        Some(captured) => out.push_str(&captured.to_string()),
        None => out.push_str(NO_CAPTURE),
    }
    out.push_str(&mv.to.to_string());
    out
}

/// Decode a six-character move.
///
/// Rejects unknown squares and moves that are neither a one-square diagonal
/// step nor a two-square jump over the recorded capture.
pub fn decode_move(text: &str) -> Result<Move, NotationError> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() != MOVE_WIDTH {
        return Err(NotationError::WrongLength {
            text: text.to_string(),
            expected: MOVE_WIDTH,
            found: chars.len(),
        });
    }

    let field = |i: usize| -> String { chars[i..i + 2].iter().collect() };
    let from = parse_square(&field(0))?;
    let captured_text = field(2);
    let captured = if captured_text == NO_CAPTURE {
        None
    } else {
        Some(parse_square(&captured_text)?)
    };
    let to = parse_square(&field(4))?;

    let well_formed = match captured {
        None => from.is_adjacent(to),
        Some(over) => from.midpoint(to) == Some(over),
    };
    if !well_formed {
        return Err(NotationError::InvalidGeometry(text.to_string()));
    }

    Ok(Move { from, captured, to })
}

/// Decode a recorded move: `"1a4  b3"`, or the tuple form `"(1, 'a4  b3')"`
pub fn decode_recorded(text: &str) -> Result<RecordedMove, NotationError> {
    let trimmed = text.trim_end_matches(&['\r', '\n'][..]);
    let (flag, body) = match trimmed.strip_prefix('(') {
        Some(tuple) => split_tuple(tuple).ok_or_else(|| NotationError::WrongLength {
            text: text.to_string(),
            expected: MOVE_WIDTH + 7,
            found: text.chars().count(),
        })?,
        None => {
            let mut chars = trimmed.chars();
            let flag = chars.next().ok_or_else(|| NotationError::WrongLength {
                text: text.to_string(),
                expected: MOVE_WIDTH + 1,
                found: 0,
            })?;
            (flag, chars.as_str())
        }
    };

    let side = Side::from_flag(flag).ok_or_else(|| NotationError::InvalidSideFlag(flag.to_string()))?;
    let mv = decode_move(body)?;
    Ok(RecordedMove { side, mv })
}

/// Encode a full game as one cell per recorded move
pub fn encode_sequence(moves: &[RecordedMove]) -> Vec<String> {
    moves.iter().map(|m| m.to_string()).collect()
}

/// Decode a full game; any bad cell rejects the whole sequence
pub fn decode_sequence<S: AsRef<str>>(cells: &[S]) -> Result<Vec<RecordedMove>, NotationError> {
    cells.iter().map(|cell| decode_recorded(cell.as_ref())).collect()
}

fn parse_square(text: &str) -> Result<Square, NotationError> {
    Square::from_name(text).ok_or_else(|| NotationError::InvalidSquare(text.to_string()))
}

/// Split `1, 'a4  b3')` into the flag and the quoted body
fn split_tuple(tuple: &str) -> Option<(char, &str)> {
    let inner = tuple.strip_suffix(')')?;
    let (flag, rest) = inner.split_once(',')?;
    let flag = flag.trim();
    if flag.chars().count() != 1 {
        return None;
    }
    let body = rest.trim_start().strip_prefix('\'')?.strip_suffix('\'')?;
    flag.chars().next().map(|c| (c, body))
}
