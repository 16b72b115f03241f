//! Board state, move generation and the rules engine

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::{Direction, Square, DIRECTIONS};
use crate::error::{ReplayError, RulesError};
use crate::notation::{encode_move, RecordedMove};
use crate::pieces::{Piece, Side, BLACK_START, PIECES_PER_SIDE, WHITE_START};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Recorded moves after which an undecided game is a draw
pub const DEFAULT_MOVE_LIMIT: usize = 35;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    /// Winning side (None for a draw)
    pub fn winner(self) -> Option<Side> {
        match self {
            GameResult::WhiteWins => Some(Side::White),
            GameResult::BlackWins => Some(Side::Black),
            GameResult::Draw => None,
        }
    }

    pub fn win_for(side: Side) -> Self {
        match side {
            Side::White => GameResult::WhiteWins,
            Side::Black => GameResult::BlackWins,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "white"),
            GameResult::BlackWins => write!(f, "black"),
            GameResult::Draw => write!(f, "draw"),
        }
    }
}

/// A single step or jump: (from, captured square if any, to)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub captured: Option<Square>,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, captured: Option<Square>, to: Square) -> Self {
        Self { from, captured, to }
    }

    /// Non-capturing diagonal step
    pub fn step(from: Square, to: Square) -> Self {
        Self::new(from, None, to)
    }

    /// Jump over `over`, capturing it
    pub fn jump(from: Square, over: Square, to: Square) -> Self {
        Self::new(from, Some(over), to)
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_move(self))
    }
}

/// What sits on a diagonal corner next to a piece
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    OffBoard,
    Empty(Square),
    Friendly(Square),
    Opponent(Square),
}

/// The four diagonal corners around a piece, indexed by direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbors {
    corners: [Corner; 4],
}

impl Neighbors {
    pub fn get(&self, direction: Direction) -> Corner {
        self.corners[direction.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, Corner)> + '_ {
        DIRECTIONS.iter().map(move |&dir| (dir, self.get(dir)))
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Occupancy maps, one per side. `Clone` is a full deep copy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Board {
    white: FxHashMap<Square, Piece>,
    black: FxHashMap<Square, Piece>,
}

impl Board {
    /// Empty board
    pub fn empty() -> Self {
        Self::default()
    }

    /// Standard starting position
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for (side, names) in [(Side::White, WHITE_START), (Side::Black, BLACK_START)] {
            for name in names {
                if let Some(square) = Square::from_name(name) {
                    board.place(Piece::new(side, square));
                }
            }
        }
        board
    }

    fn map(&self, side: Side) -> &FxHashMap<Square, Piece> {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    fn map_mut(&mut self, side: Side) -> &mut FxHashMap<Square, Piece> {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }

    /// Piece on a square, whichever side owns it
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.white.get(&square).or_else(|| self.black.get(&square))
    }

    /// Piece of `side` on a square
    pub fn piece(&self, side: Side, square: Square) -> Option<&Piece> {
        self.map(side).get(&square)
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.piece_at(square).is_some()
    }

    pub fn count(&self, side: Side) -> usize {
        self.map(side).len()
    }

    /// Pieces of a side in square order
    pub fn pieces(&self, side: Side) -> Vec<Piece> {
        let mut pieces: Vec<Piece> = self.map(side).values().copied().collect();
        pieces.sort_by_key(|p| p.square);
        pieces
    }

    /// Put a piece on an empty square
    pub fn place(&mut self, piece: Piece) {
        assert!(
            !self.is_occupied(piece.square),
            "cannot place {} piece on occupied square {}",
            piece.side,
            piece.square
        );
        assert!(
            self.count(piece.side) < PIECES_PER_SIDE,
            "{} already has {} pieces",
            piece.side,
            PIECES_PER_SIDE
        );
        self.map_mut(piece.side).insert(piece.square, piece);
    }

    /// Take a piece of `side` off the board
    pub fn remove(&mut self, side: Side, square: Square) -> Piece {
        match self.map_mut(side).remove(&square) {
            Some(piece) => piece,
            None => panic!("no {} piece to remove on {}", side, square),
        }
    }

    fn relocate(&mut self, side: Side, from: Square, to: Square) {
        assert!(!self.is_occupied(to), "destination {} is occupied", to);
        let mut piece = self.remove(side, from);
        piece.square = to;
        self.map_mut(side).insert(to, piece);
    }

    fn piece_mut(&mut self, square: Square) -> Option<&mut Piece> {
        if self.white.contains_key(&square) {
            self.white.get_mut(&square)
        } else {
            self.black.get_mut(&square)
        }
    }
}

/// Read-only view of a position for external players and front ends
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub side_to_move: Side,
    pub white: Vec<Piece>,
    pub black: Vec<Piece>,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Position plus side to move (clone for an independent copy)
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    board: Board,
    side_to_move: Side,
    move_limit: usize,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard opening position, white to move
    pub fn new() -> Self {
        Self {
            board: Board::starting(),
            side_to_move: Side::White,
            move_limit: DEFAULT_MOVE_LIMIT,
        }
    }

    /// Arbitrary position
    pub fn from_pieces(pieces: &[Piece], side_to_move: Side) -> Self {
        let mut board = Board::empty();
        for &piece in pieces {
            board.place(piece);
        }
        Self {
            board,
            side_to_move,
            move_limit: DEFAULT_MOVE_LIMIT,
        }
    }

    pub fn with_move_limit(mut self, move_limit: usize) -> Self {
        self.move_limit = move_limit;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn move_limit(&self) -> usize {
        self.move_limit
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.board.piece_at(square)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            side_to_move: self.side_to_move,
            white: self.board.pieces(Side::White),
            black: self.board.pieces(Side::Black),
        }
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Classify the four diagonal corners around a piece
    pub fn neighbors(&self, piece: &Piece) -> Neighbors {
        let mut corners = [Corner::OffBoard; 4];
        for dir in DIRECTIONS {
            corners[dir.index()] = match piece.square.step(dir) {
                None => Corner::OffBoard,
                Some(square) => match self.board.piece_at(square) {
                    None => Corner::Empty(square),
                    Some(other) if other.side == piece.side => Corner::Friendly(square),
                    Some(_) => Corner::Opponent(square),
                },
            };
        }
        Neighbors { corners }
    }

    /// Legal moves for one piece, and whether they are captures.
    ///
    /// Captures are mandatory: when any exist, steps are dropped.
    pub fn legal_moves_for_piece(&self, piece: &Piece) -> (Vec<Move>, bool) {
        let neighbors = self.neighbors(piece);
        let mut steps = Vec::new();
        let mut captures = Vec::new();

        for &dir in piece.move_directions() {
            match neighbors.get(dir) {
                Corner::Empty(to) => steps.push(Move::step(piece.square, to)),
                Corner::Opponent(over) => {
                    if let Some(landing) = over.reflect_from(piece.square) {
                        if !self.board.is_occupied(landing) {
                            captures.push(Move::jump(piece.square, over, landing));
                        }
                    }
                }
                Corner::OffBoard | Corner::Friendly(_) => {}
            }
        }

        if captures.is_empty() {
            (steps, false)
        } else {
            (captures, true)
        }
    }

    /// Legal moves for the side to move; captures only if any piece can capture
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut steps = Vec::new();
        let mut captures = Vec::new();

        for piece in self.board.pieces(self.side_to_move) {
            let (moves, is_capture) = self.legal_moves_for_piece(&piece);
            if is_capture {
                captures.extend(moves);
            } else {
                steps.extend(moves);
            }
        }

        if captures.is_empty() {
            steps
        } else {
            captures
        }
    }

    /// Legal moves of the side-to-move piece on `square`
    pub fn legal_moves_from(&self, square: Square) -> Result<(Vec<Move>, bool), RulesError> {
        let piece = self
            .board
            .piece(self.side_to_move, square)
            .ok_or(RulesError::NoPiece {
                side: self.side_to_move,
                square,
            })?;
        Ok(self.legal_moves_for_piece(piece))
    }

    pub fn is_legal(&self, mv: &Move) -> bool {
        self.legal_moves().contains(mv)
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Apply a move for the side to move.
    ///
    /// Panics if the mover is not the side to move, the destination is taken
    /// or the captured square holds no opponent piece. Crowning and turn
    /// changes are left to the caller.
    pub fn apply_move(&mut self, mv: Move) {
        let side = self.side_to_move;
        assert!(
            self.board.piece(side, mv.from).is_some(),
            "{} has no piece on {} (move {})",
            side,
            mv.from,
            mv
        );
        assert!(
            !self.board.is_occupied(mv.to),
            "destination {} is occupied (move {})",
            mv.to,
            mv
        );

        if let Some(captured) = mv.captured {
            self.board.remove(side.opponent(), captured);
        }
        self.board.relocate(side, mv.from, mv.to);
    }

    /// Apply a move only if it is legal for the side to move
    pub fn try_move(&mut self, mv: Move) -> Result<(), RulesError> {
        if !self.is_legal(&mv) {
            return Err(RulesError::IllegalMove {
                side: self.side_to_move,
                mv,
            });
        }
        self.apply_move(mv);
        Ok(())
    }

    /// Crown the piece on `square` if it just reached its back rank
    pub fn crown_if_eligible(&mut self, square: Square) -> bool {
        self.board.piece_mut(square).map_or(false, |piece| piece.crown())
    }

    /// Hand the move to the other side
    pub fn advance_turn(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    // ========================================================================
    // TURNS
    // ========================================================================

    /// Play one move of a turn.
    ///
    /// `continuation` is the square of a piece in the middle of a capture
    /// chain; only that piece may move then. The move is checked, applied and
    /// the piece crowned if eligible. Returns the square that must keep
    /// jumping, or None once the turn has passed to the opponent.
    pub fn play_step(&mut self, mv: Move, continuation: Option<Square>) -> Result<Option<Square>, RulesError> {
        let candidates = match continuation {
            Some(square) => self.legal_moves_from(square)?.0,
            None => self.legal_moves(),
        };
        if !candidates.contains(&mv) {
            return Err(RulesError::IllegalMove {
                side: self.side_to_move,
                mv,
            });
        }

        self.apply_move(mv);
        self.crown_if_eligible(mv.to);

        let jumps_again = mv.is_capture()
            && self
                .legal_moves_from(mv.to)
                .map_or(false, |(_, is_capture)| is_capture);
        if jumps_again {
            return Ok(Some(mv.to));
        }
        self.advance_turn();
        Ok(None)
    }

    /// Replay a recorded game from the opening position, checking every move
    pub fn replay(moves: &[RecordedMove]) -> Result<GameState, ReplayError> {
        let mut state = GameState::new();
        let mut continuation = None;
        for (index, recorded) in moves.iter().enumerate() {
            if recorded.side != state.side_to_move {
                return Err(ReplayError::OutOfTurn {
                    index,
                    expected: state.side_to_move,
                    found: recorded.side,
                    mv: recorded.mv,
                });
            }
            continuation = state
                .play_step(recorded.mv, continuation)
                .map_err(|source| ReplayError::Illegal { index, source })?;
        }
        Ok(state)
    }

    // ========================================================================
    // TERMINAL DETECTION
    // ========================================================================

    /// Result of the game after `move_count` recorded moves, or None if it goes on.
    ///
    /// An empty side loses even when the move ceiling is also reached.
    pub fn outcome(&self, move_count: usize) -> Option<GameResult> {
        if self.board.count(Side::Black) == 0 {
            Some(GameResult::WhiteWins)
        } else if self.board.count(Side::White) == 0 {
            Some(GameResult::BlackWins)
        } else if move_count >= self.move_limit || self.legal_moves().is_empty() {
            Some(GameResult::Draw)
        } else {
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_name(name).unwrap()
    }

    fn white(name: &str) -> Piece {
        Piece::new(Side::White, sq(name))
    }

    fn black(name: &str) -> Piece {
        Piece::new(Side::Black, sq(name))
    }

    #[test]
    fn test_game_creation() {
        let game = GameState::new();
        assert_eq!(game.side_to_move(), Side::White);
        assert_eq!(game.board().count(Side::White), 6);
        assert_eq!(game.board().count(Side::Black), 6);
        assert_eq!(game.outcome(0), None);
    }

    #[test]
    fn test_opening_moves_are_forward_steps() {
        let game = GameState::new();
        let moves = game.legal_moves();
        assert!(!moves.is_empty());
        for mv in &moves {
            assert!(!mv.is_capture(), "{} should not capture", mv);
            assert_eq!(mv.to.rank() + 1, mv.from.rank(), "{} should advance toward rank 1", mv);
        }
        // Only the rank-5 pieces can move: b5, d5, f5 (f5 has one diagonal)
        assert_eq!(moves.len(), 5);
        assert!(moves.contains(&Move::step(sq("b5"), sq("a4"))));
        assert!(moves.contains(&Move::step(sq("f5"), sq("e4"))));
    }

    #[test]
    fn test_neighbors() {
        let game = GameState::from_pieces(&[white("c4"), white("b5"), black("d3")], Side::White);
        let piece = *game.piece_at(sq("c4")).unwrap();
        let n = game.neighbors(&piece);
        assert_eq!(n.get(Direction::NorthEast), Corner::Empty(sq("d5")));
        assert_eq!(n.get(Direction::NorthWest), Corner::Friendly(sq("b5")));
        assert_eq!(n.get(Direction::SouthEast), Corner::Opponent(sq("d3")));
        assert_eq!(n.get(Direction::SouthWest), Corner::Empty(sq("b3")));

        let edge = game.neighbors(&white("a2"));
        assert_eq!(edge.get(Direction::NorthWest), Corner::OffBoard);
        assert_eq!(edge.get(Direction::SouthWest), Corner::OffBoard);
    }

    #[test]
    fn test_piece_capture_is_mandatory() {
        let game = GameState::from_pieces(&[white("c4"), black("d3")], Side::White);
        let (moves, is_capture) = game.legal_moves_for_piece(&white("c4"));
        assert!(is_capture);
        assert_eq!(moves, vec![Move::jump(sq("c4"), sq("d3"), sq("e2"))]);
    }

    #[test]
    fn test_blocked_landing_is_not_a_capture() {
        let game = GameState::from_pieces(&[white("c4"), black("d3"), black("e2")], Side::White);
        let (moves, is_capture) = game.legal_moves_for_piece(&white("c4"));
        assert!(!is_capture);
        assert_eq!(moves, vec![Move::step(sq("c4"), sq("b3"))]);
    }

    #[test]
    fn test_side_capture_is_mandatory() {
        // a6 can only step; c4 can capture d3, so only the capture is legal
        let game = GameState::from_pieces(
            &[white("a6"), white("c4"), black("d3"), black("b1")],
            Side::White,
        );
        let moves = game.legal_moves();
        assert_eq!(moves, vec![Move::jump(sq("c4"), sq("d3"), sq("e2"))]);
    }

    #[test]
    fn test_uncrowned_cannot_move_backward() {
        // Black piece behind a white piece cannot be captured by moving backward
        let game = GameState::from_pieces(&[white("c4"), black("d5")], Side::White);
        let (moves, is_capture) = game.legal_moves_for_piece(&white("c4"));
        assert!(!is_capture);
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|m| m.to.rank() == 3));
    }

    #[test]
    fn test_crowned_moves_all_directions() {
        let king = Piece::crowned(Side::White, sq("c4"));
        let game = GameState::from_pieces(&[king, black("d5")], Side::White);
        let (moves, is_capture) = game.legal_moves_for_piece(&king);
        assert!(is_capture);
        assert_eq!(moves, vec![Move::jump(sq("c4"), sq("d5"), sq("e6"))]);
    }

    #[test]
    fn test_apply_capture() {
        let mut game = GameState::from_pieces(&[white("c4"), black("d3"), black("b1")], Side::White);
        game.apply_move(Move::jump(sq("c4"), sq("d3"), sq("e2")));
        assert!(game.piece_at(sq("c4")).is_none());
        assert!(game.piece_at(sq("d3")).is_none());
        assert_eq!(game.piece_at(sq("e2")).unwrap().side, Side::White);
        assert_eq!(game.board().count(Side::Black), 1);
        // Turn is not advanced by apply_move
        assert_eq!(game.side_to_move(), Side::White);
    }

    #[test]
    #[should_panic(expected = "occupied")]
    fn test_apply_to_occupied_square_panics() {
        let mut game = GameState::from_pieces(&[white("c4"), black("d3")], Side::White);
        game.apply_move(Move::step(sq("c4"), sq("d3")));
    }

    #[test]
    #[should_panic(expected = "has no piece")]
    fn test_apply_for_wrong_side_panics() {
        let mut game = GameState::from_pieces(&[white("c4"), black("d3")], Side::Black);
        game.apply_move(Move::step(sq("c4"), sq("b3")));
    }

    #[test]
    #[should_panic(expected = "no white piece to remove")]
    fn test_capture_of_missing_piece_panics() {
        let mut game = GameState::from_pieces(&[black("d3"), white("a6")], Side::Black);
        game.apply_move(Move::jump(sq("d3"), sq("e4"), sq("f5")));
    }

    #[test]
    fn test_try_move_rejects_illegal() {
        let mut game = GameState::new();
        let before = game.clone();
        let err = game.try_move(Move::step(sq("a6"), sq("b5"))).unwrap_err();
        assert!(matches!(err, RulesError::IllegalMove { side: Side::White, .. }));
        assert_eq!(game, before);

        game.try_move(Move::step(sq("b5"), sq("a4"))).unwrap();
        assert_eq!(game.piece_at(sq("a4")).unwrap().side, Side::White);
    }

    #[test]
    fn test_crowning() {
        let mut game = GameState::from_pieces(&[white("c2"), black("f5")], Side::White);
        game.apply_move(Move::step(sq("c2"), sq("b1")));
        assert!(game.crown_if_eligible(sq("b1")));
        assert!(game.piece_at(sq("b1")).unwrap().crowned);
        assert!(!game.crown_if_eligible(sq("b1")));
        assert!(game.piece_at(sq("b1")).unwrap().crowned);
        // Not eligible off the back rank
        assert!(!game.crown_if_eligible(sq("f5")));
    }

    #[test]
    fn test_outcome_empty_side_overrides_ceiling() {
        let game = GameState::from_pieces(&[white("c4")], Side::Black);
        assert_eq!(game.outcome(0), Some(GameResult::WhiteWins));
        assert_eq!(game.outcome(DEFAULT_MOVE_LIMIT), Some(GameResult::WhiteWins));

        let game = GameState::from_pieces(&[black("c4")], Side::White);
        assert_eq!(game.outcome(100), Some(GameResult::BlackWins));
    }

    #[test]
    fn test_outcome_draws() {
        let game = GameState::new().with_move_limit(10);
        assert_eq!(game.outcome(9), None);
        assert_eq!(game.outcome(10), Some(GameResult::Draw));
        assert_eq!(game.outcome(11), Some(GameResult::Draw));

        // White on b1 (uncrowned) cannot move toward rank 0: no legal moves
        let stuck = GameState::from_pieces(&[white("b1"), black("f5")], Side::White);
        assert!(stuck.legal_moves().is_empty());
        assert_eq!(stuck.outcome(0), Some(GameResult::Draw));
    }

    #[test]
    fn test_clone_is_deep() {
        let original = GameState::new();
        let mut copy = original.clone();
        copy.apply_move(Move::step(sq("b5"), sq("a4")));
        copy.crown_if_eligible(sq("a4"));
        assert!(original.piece_at(sq("b5")).is_some());
        assert!(original.piece_at(sq("a4")).is_none());
    }

    #[test]
    fn test_snapshot() {
        let game = GameState::new();
        let snap = game.snapshot();
        assert_eq!(snap.side_to_move, Side::White);
        assert_eq!(snap.white.len(), 6);
        assert_eq!(snap.black.len(), 6);
        assert!(snap.white.iter().all(|p| !p.crowned));

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"a6\""));
    }

    #[test]
    fn test_legal_moves_from() {
        let game = GameState::new();
        let (moves, is_capture) = game.legal_moves_from(sq("d5")).unwrap();
        assert!(!is_capture);
        assert_eq!(moves.len(), 2);
        assert!(game.legal_moves_from(sq("a2")).is_err());
    }

    fn recorded(side: Side, from: &str, over: Option<&str>, to: &str) -> RecordedMove {
        RecordedMove::new(side, Move::new(sq(from), over.map(sq), sq(to)))
    }

    #[test]
    fn test_play_step_keeps_jumping_piece() {
        let mut game = GameState::from_pieces(&[white("e4"), black("d3"), black("f1")], Side::White);
        let next = game.play_step(Move::jump(sq("e4"), sq("d3"), sq("c2")), None).unwrap();
        assert_eq!(next, None);
        assert_eq!(game.side_to_move(), Side::Black);

        let mut game = GameState::from_pieces(
            &[white("f5"), white("b5"), black("e4"), black("c2"), black("a6")],
            Side::White,
        );
        let next = game.play_step(Move::jump(sq("f5"), sq("e4"), sq("d3")), None).unwrap();
        assert_eq!(next, Some(sq("d3")));
        assert_eq!(game.side_to_move(), Side::White);

        // Only the jumping piece may move during the chain
        let err = game.play_step(Move::step(sq("b5"), sq("a4")), Some(sq("d3"))).unwrap_err();
        assert!(matches!(err, RulesError::IllegalMove { .. }));
        assert_eq!(game.play_step(Move::jump(sq("d3"), sq("c2"), sq("b1")), Some(sq("d3"))), Ok(None));
        assert!(game.piece_at(sq("b1")).unwrap().crowned);
        assert_eq!(game.side_to_move(), Side::Black);
    }

    #[test]
    fn test_replay_legal_game() {
        let moves = vec![
            recorded(Side::White, "d5", None, "c4"),
            recorded(Side::Black, "c2", None, "b3"),
            recorded(Side::White, "f5", None, "e4"),
            recorded(Side::Black, "b3", Some("c4"), "d5"),
        ];
        let state = GameState::replay(&moves).unwrap();
        assert_eq!(state.side_to_move(), Side::White);
        assert_eq!(state.board().count(Side::White), 5);
        assert!(state.piece_at(sq("d5")).is_some());
    }

    #[test]
    fn test_replay_rejects_out_of_turn() {
        let moves = vec![recorded(Side::Black, "a2", None, "b3")];
        assert!(matches!(
            GameState::replay(&moves),
            Err(ReplayError::OutOfTurn { index: 0, expected: Side::White, found: Side::Black, .. })
        ));
    }

    #[test]
    fn test_replay_rejects_illegal_jumps() {
        // Well-formed jumps by a piece that is not there
        let moves = vec![
            recorded(Side::White, "c4", Some("d3"), "e2"),
            recorded(Side::White, "e2", Some("d3"), "c4"),
        ];
        assert!(matches!(
            GameState::replay(&moves),
            Err(ReplayError::Illegal { index: 0, .. })
        ));

        // A step while a capture is available
        let moves = vec![
            recorded(Side::White, "d5", None, "c4"),
            recorded(Side::Black, "c2", None, "b3"),
            recorded(Side::White, "f5", None, "e4"),
            recorded(Side::Black, "e2", None, "f3"),
        ];
        assert!(matches!(
            GameState::replay(&moves),
            Err(ReplayError::Illegal { index: 3, .. })
        ));
    }
}
