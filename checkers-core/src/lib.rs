//! Checkers Core - 6x6 checkers rules engine
//!
//! This crate provides the game rules:
//! - Board geometry (18 dark squares, diagonal directions)
//! - Sides and pieces with crowning
//! - Game state, forced-capture move generation and terminal detection
//! - Fixed-width move notation for the move logs

pub mod board;
pub mod error;
pub mod game;
pub mod notation;
pub mod pieces;

// Re-exports for convenient access
pub use board::{Direction, Square, BOARD_SIZE, DIRECTIONS};
pub use error::{NotationError, ReplayError, RulesError};
pub use game::{Board, BoardSnapshot, Corner, GameResult, GameState, Move, Neighbors, DEFAULT_MOVE_LIMIT};
pub use notation::{decode_move, decode_recorded, decode_sequence, encode_move, encode_sequence, RecordedMove};
pub use pieces::{Piece, Side, PIECES_PER_SIDE};
