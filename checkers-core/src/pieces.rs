//! Sides and piece records

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Direction, Square};

/// Pieces per side at the start of a game
pub const PIECES_PER_SIDE: usize = 6;

/// Starting squares for white (white moves toward rank 1)
pub const WHITE_START: [&str; PIECES_PER_SIDE] = ["a6", "b5", "c6", "d5", "e6", "f5"];

/// Starting squares for black (black moves toward rank 6)
pub const BLACK_START: [&str; PIECES_PER_SIDE] = ["a2", "b1", "c2", "d1", "e2", "f1"];

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Rank on which this side's pieces are crowned
    pub fn crowning_rank(self) -> u8 {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }

    /// Directions an uncrowned piece of this side may move in
    pub fn forward_directions(self) -> [Direction; 2] {
        match self {
            Side::White => [Direction::SouthEast, Direction::SouthWest],
            Side::Black => [Direction::NorthEast, Direction::NorthWest],
        }
    }

    /// Log-format flag: `1` for white, `0` for black
    pub fn flag(self) -> char {
        match self {
            Side::White => '1',
            Side::Black => '0',
        }
    }

    pub fn from_flag(flag: char) -> Option<Self> {
        match flag {
            '1' => Some(Side::White),
            '0' => Some(Side::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub square: Square,
    pub crowned: bool,
}

impl Piece {
    pub fn new(side: Side, square: Square) -> Self {
        Self {
            side,
            square,
            crowned: false,
        }
    }

    pub fn crowned(side: Side, square: Square) -> Self {
        Self {
            side,
            square,
            crowned: true,
        }
    }

    /// Directions this piece may move or capture in
    pub fn move_directions(&self) -> &'static [Direction] {
        use Direction::*;
        match (self.crowned, self.side) {
            (true, _) => &[NorthEast, NorthWest, SouthEast, SouthWest],
            (false, Side::White) => &[SouthEast, SouthWest],
            (false, Side::Black) => &[NorthEast, NorthWest],
        }
    }

    /// Whether the piece stands on its crowning rank
    pub fn on_crowning_rank(&self) -> bool {
        self.square.rank() == self.side.crowning_rank()
    }

    /// Crown the piece if it stands on its crowning rank.
    ///
    /// Returns true only when this call crowned it.
    pub fn crown(&mut self) -> bool {
        if self.crowned || !self.on_crowning_rank() {
            return false;
        }
        self.crowned = true;
        true
    }
}
