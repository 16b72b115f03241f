//! Error types for move notation and rule checks

use crate::board::Square;
use crate::game::Move;
use crate::pieces::Side;

/// Malformed move-log data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("expected {expected} characters, found {found} in {text:?}")]
    WrongLength {
        text: String,
        expected: usize,
        found: usize,
    },

    #[error("not a playable square: {0:?}")]
    InvalidSquare(String),

    #[error("invalid side flag: {0:?}")]
    InvalidSideFlag(String),

    #[error("{0:?} is neither a diagonal step nor a jump over the captured square")]
    InvalidGeometry(String),
}

/// A move rejected at the rules-engine boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    #[error("illegal move {mv} for {side}")]
    IllegalMove { side: Side, mv: Move },

    #[error("no {side} piece on {square}")]
    NoPiece { side: Side, square: Square },
}

/// A recorded game that does not follow the rules from the opening position
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("move {index} ({mv}) was played by {found}, but {expected} is to move")]
    OutOfTurn {
        index: usize,
        expected: Side,
        found: Side,
        mv: Move,
    },

    #[error("move {index}: {source}")]
    Illegal {
        index: usize,
        #[source]
        source: RulesError,
    },
}
