//! Game runner - executes single games
//!
//! Level 3 - Step-level implementation
//!
//! [`GameDriver`] owns one game and applies moves one at a time: the move is
//! checked against the candidates, applied, the piece is crowned if it reached
//! its back rank, and the same side keeps the move while the jumping piece can
//! capture again. The end of the game is only checked after a full turn.

use std::sync::Arc;

use checkers_core::{GameResult, GameState, Move, RecordedMove, Side, Square};
use checkers_tree::GameTree;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{GameConfig, PlayerKind};
use crate::error::PlayError;
use crate::player::{create_player, Player, TurnContext};

/// A finished game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Final game result
    pub result: GameResult,
    /// Every recorded move, one entry per jump of a capture chain
    pub moves: Vec<RecordedMove>,
}

impl GameRecord {
    pub fn white_wins(&self) -> bool {
        self.result == GameResult::WhiteWins
    }

    pub fn black_wins(&self) -> bool {
        self.result == GameResult::BlackWins
    }

    pub fn is_draw(&self) -> bool {
        self.result == GameResult::Draw
    }

    /// Winner (None for draw)
    pub fn winner(&self) -> Option<Side> {
        self.result.winner()
    }

    /// Number of recorded moves
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// What happens after a move is submitted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnStatus {
    /// The same side must keep jumping with the piece on `jumping`
    Continue { side: Side, jumping: Square },
    /// The turn passed to this side
    NextTurn(Side),
    /// The game ended
    Finished(GameResult),
}

// ============================================================================
// GAME DRIVER
// ============================================================================

/// Turn-by-turn state of one game
#[derive(Clone, Debug)]
pub struct GameDriver {
    state: GameState,
    history: Vec<RecordedMove>,
    continuation: Option<Square>,
    result: Option<GameResult>,
}

impl GameDriver {
    /// Standard opening, white to move
    pub fn new(config: &GameConfig) -> Self {
        Self::from_state(GameState::new().with_move_limit(config.move_limit))
    }

    /// Start from an arbitrary position
    pub fn from_state(state: GameState) -> Self {
        let result = state.outcome(0);
        Self {
            state,
            history: Vec::new(),
            continuation: None,
            result,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &[RecordedMove] {
        &self.history
    }

    pub fn side_to_move(&self) -> Side {
        self.state.side_to_move()
    }

    /// Square of the piece that must keep jumping, if a capture chain is open
    pub fn continuation(&self) -> Option<Square> {
        self.continuation
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// What the player to move gets to see
    pub fn context(&self) -> TurnContext<'_> {
        TurnContext {
            state: &self.state,
            previous: self.history.last().map(|recorded| recorded.mv),
            continuation: self.continuation,
            history: &self.history,
        }
    }

    /// Moves the side to move may submit now
    pub fn candidates(&self) -> Vec<Move> {
        self.context().candidates()
    }

    /// Apply a move for the side to move.
    ///
    /// Illegal moves are rejected without changing anything.
    pub fn submit(&mut self, mv: Move) -> Result<TurnStatus, PlayError> {
        if self.result.is_some() {
            return Err(PlayError::GameOver);
        }
        let side = self.state.side_to_move();
        let continuation = self
            .state
            .play_step(mv, self.continuation)
            .map_err(|_| PlayError::IllegalMove { side, mv })?;
        self.history.push(RecordedMove::new(side, mv));
        trace!(%side, %mv, "move applied");

        if let Some(jumping) = continuation {
            self.continuation = Some(jumping);
            return Ok(TurnStatus::Continue { side, jumping });
        }

        self.continuation = None;
        match self.state.outcome(self.history.len()) {
            Some(result) => {
                self.result = Some(result);
                Ok(TurnStatus::Finished(result))
            }
            None => Ok(TurnStatus::NextTurn(self.state.side_to_move())),
        }
    }

    /// The finished game, or None while it is still going
    pub fn into_record(self) -> Option<GameRecord> {
        let result = self.result?;
        Some(GameRecord {
            result,
            moves: self.history,
        })
    }
}

// ============================================================================
// PLAYING GAMES
// ============================================================================

/// Play one game to the end
pub fn play_game(
    white: &mut dyn Player,
    black: &mut dyn Player,
    config: &GameConfig,
) -> Result<GameRecord, PlayError> {
    let mut driver = GameDriver::new(config);

    while !driver.is_finished() {
        let side = driver.side_to_move();
        let player: &mut dyn Player = match side {
            Side::White => &mut *white,
            Side::Black => &mut *black,
        };
        let mv = player
            .choose_move(&driver.context())
            .ok_or(PlayError::NoMove { side })?;
        driver.submit(mv)?;
    }

    driver.into_record().ok_or(PlayError::GameOver)
}

/// Game runner that builds players by kind and plays seeded games
pub struct GameRunner {
    tree: Arc<GameTree>,
    config: GameConfig,
    /// Random seed counter
    seed_counter: u64,
}

impl GameRunner {
    pub fn new(tree: Arc<GameTree>, config: GameConfig) -> Self {
        let seed_counter = config.base_seed();
        Self {
            tree,
            config,
            seed_counter,
        }
    }

    /// Play a single game between two strategies
    pub fn play(&mut self, white: PlayerKind, black: PlayerKind) -> Result<GameRecord, PlayError> {
        let seed = self.next_seed();
        let mut white = create_player(white, &self.tree, seed)?;
        let mut black = create_player(black, &self.tree, seed.wrapping_add(1))?;
        play_game(white.as_mut(), black.as_mut(), &self.config)
    }

    /// Get next seed and advance the counter past both players' seeds
    fn next_seed(&mut self) -> u64 {
        let seed = self.seed_counter;
        self.seed_counter = self.seed_counter.wrapping_add(2);
        seed
    }

    /// Reset seed counter
    pub fn reset_seed(&mut self, seed: u64) {
        self.seed_counter = seed;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
