//! Square geometry for the 6x6 board
//!
//! Only the 18 dark squares are playable. Files run `a`..`f` (0..5 internally),
//! ranks run 1..6. A square is dark when its 1-based file plus its rank is odd.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotationError;

/// Board dimension (files and ranks)
pub const BOARD_SIZE: u8 = 6;

/// Number of playable squares
pub const SQUARE_COUNT: usize = 18;

/// A playable square
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    // Field order gives rank-major ordering for the derived Ord.
    rank: u8,
    file: u8,
}

impl Square {
    /// Square from a 0-based file and a 1-based rank, if it is a playable square
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < BOARD_SIZE && (1..=BOARD_SIZE).contains(&rank) && (file + rank) % 2 == 0 {
            Some(Self { rank, file })
        } else {
            None
        }
    }

    /// Square from its algebraic name (`"a2"`)
    pub fn from_name(name: &str) -> Option<Self> {
        let bytes = name.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].checked_sub(b'a')?;
        let rank = bytes[1].checked_sub(b'0')?;
        Self::new(file, rank)
    }

    /// 0-based file index (a = 0)
    pub fn file(&self) -> u8 {
        self.file
    }

    /// 1-based rank
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// File letter
    pub fn file_char(&self) -> char {
        (b'a' + self.file) as char
    }

    /// Square reached by moving `(df, dr)`, if it is on the board
    pub fn offset(&self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if file < 0 || rank < 0 {
            return None;
        }
        Square::new(file as u8, rank as u8)
    }

    /// Diagonal neighbour in `direction`
    pub fn step(&self, direction: Direction) -> Option<Square> {
        let (df, dr) = direction.delta();
        self.offset(df, dr)
    }

    /// Reflection of `self` through `pivot` (the landing square of a jump over `self`)
    pub fn reflect_from(&self, pivot: Square) -> Option<Square> {
        let df = self.file as i8 - pivot.file as i8;
        let dr = self.rank as i8 - pivot.rank as i8;
        self.offset(df, dr)
    }

    /// Square halfway between two squares two diagonals apart
    pub fn midpoint(&self, other: Square) -> Option<Square> {
        let df = other.file as i8 - self.file as i8;
        let dr = other.rank as i8 - self.rank as i8;
        if df.abs() != 2 || dr.abs() != 2 {
            return None;
        }
        self.offset(df / 2, dr / 2)
    }

    /// Whether `other` is a diagonal neighbour
    pub fn is_adjacent(&self, other: Square) -> bool {
        let df = (other.file as i8 - self.file as i8).abs();
        let dr = (other.rank as i8 - self.rank as i8).abs();
        df == 1 && dr == 1
    }

    /// All playable squares, rank 1 first, files a..f within a rank
    pub fn all() -> impl Iterator<Item = Square> {
        (1..=BOARD_SIZE).flat_map(|rank| (0..BOARD_SIZE).filter_map(move |file| Square::new(file, rank)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank)
    }
}

impl FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_name(s).ok_or_else(|| NotationError::InvalidSquare(s.to_string()))
    }
}

impl TryFrom<String> for Square {
    type Error = NotationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

/// Diagonal direction; "north" is toward rank 6
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

/// All four diagonals in corner order
pub const DIRECTIONS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::NorthWest,
    Direction::SouthEast,
    Direction::SouthWest,
];

impl Direction {
    /// (file delta, rank delta)
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (-1, 1),
            Direction::SouthEast => (1, -1),
            Direction::SouthWest => (-1, -1),
        }
    }

    /// Index into a corner array (matches `DIRECTIONS`)
    pub const fn index(self) -> usize {
        match self {
            Direction::NorthEast => 0,
            Direction::NorthWest => 1,
            Direction::SouthEast => 2,
            Direction::SouthWest => 3,
        }
    }
}
