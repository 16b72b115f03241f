//! Move-choosing strategies
//!
//! Level 3 - Step-level implementation
//!
//! Every player answers one question: given the position, the previous move
//! and the game so far, which move now? Tree-guided players keep a cursor into
//! the shared game tree and fall back to random play for the rest of the game
//! as soon as the tree stops describing the position.

use std::sync::Arc;

use checkers_core::{GameState, Move, RecordedMove, Side, Square};
use checkers_tree::{GameTree, NodeId, TreeNode};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::PlayerKind;
use crate::error::PlayError;

// ============================================================================
// TURN CONTEXT
// ============================================================================

/// Everything a player may look at when choosing a move
#[derive(Clone, Copy, Debug)]
pub struct TurnContext<'a> {
    pub state: &'a GameState,
    /// Previous move in the game (None at the start)
    pub previous: Option<Move>,
    /// Square of the piece that must keep jumping, during a capture chain
    pub continuation: Option<Square>,
    /// Recorded moves so far
    pub history: &'a [RecordedMove],
}

impl<'a> TurnContext<'a> {
    /// Context for a fresh turn with no capture chain in progress
    pub fn new(state: &'a GameState, history: &'a [RecordedMove]) -> Self {
        Self {
            state,
            previous: history.last().map(|recorded| recorded.mv),
            continuation: None,
            history,
        }
    }

    pub fn side(&self) -> Side {
        self.state.side_to_move()
    }

    /// Moves the player may choose from
    pub fn candidates(&self) -> Vec<Move> {
        match self.continuation {
            Some(square) => self
                .state
                .legal_moves_from(square)
                .map(|(moves, _)| moves)
                .unwrap_or_default(),
            None => self.state.legal_moves(),
        }
    }
}

/// A strategy that picks moves
pub trait Player {
    /// Choose a move among `ctx.candidates()`, or None if there is nothing to play
    fn choose_move(&mut self, ctx: &TurnContext<'_>) -> Option<Move>;

    fn kind(&self) -> PlayerKind;
}

/// Build a non-interactive player.
///
/// Human players need a [`MoveSource`]; construct [`HumanPlayer`] directly.
pub fn create_player(
    kind: PlayerKind,
    tree: &Arc<GameTree>,
    seed: u64,
) -> Result<Box<dyn Player + Send>, PlayError> {
    let player: Box<dyn Player + Send> = match kind {
        PlayerKind::Random => Box::new(RandomPlayer::new(seed)),
        PlayerKind::Aggressive => Box::new(AggressivePlayer::new(Arc::clone(tree), seed)),
        PlayerKind::Defensive => Box::new(DefensivePlayer::new(Arc::clone(tree), seed)),
        PlayerKind::Exploring => Box::new(ExploringPlayer::new(Arc::clone(tree), seed)),
        PlayerKind::Human => return Err(PlayError::InteractivePlayer(kind)),
    };
    Ok(player)
}

// ============================================================================
// TREE CURSOR
// ============================================================================

/// A player's position in the game tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeCursor {
    node: Option<NodeId>,
    consumed: usize,
}

impl Default for TreeCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeCursor {
    /// Cursor at the root
    pub fn new() -> Self {
        Self {
            node: Some(NodeId::ROOT),
            consumed: 0,
        }
    }

    /// Current node, None once tracking is lost
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn is_tracking(&self) -> bool {
        self.node.is_some()
    }

    /// Walk every recorded move not seen yet, whoever played it.
    ///
    /// A move missing from the tree ends tracking for good.
    pub fn sync(&mut self, tree: &GameTree, history: &[RecordedMove]) -> Option<NodeId> {
        if history.len() < self.consumed {
            *self = Self::new();
        }
        for recorded in &history[self.consumed..] {
            let Some(node) = self.node else {
                break;
            };
            self.node = tree.find_child_by_move(node, &recorded.mv);
            if self.node.is_none() {
                debug!(mv = %recorded.mv, "move not in tree, dropping tree tracking");
            }
        }
        self.consumed = history.len();
        self.node
    }

    pub fn lose_track(&mut self) {
        self.node = None;
    }
}

/// Shared tree plus cursor, used by the tree-guided players
#[derive(Clone, Debug)]
struct TreeGuide {
    tree: Arc<GameTree>,
    cursor: TreeCursor,
}

impl TreeGuide {
    fn new(tree: Arc<GameTree>) -> Self {
        Self {
            tree,
            cursor: TreeCursor::new(),
        }
    }

    /// Synced node if it describes this turn: right side to move
    fn node_for(&mut self, ctx: &TurnContext<'_>) -> Option<NodeId> {
        let node = self.cursor.sync(&self.tree, ctx.history)?;
        if self.tree.get(node).side_to_move != ctx.side() {
            debug!(side = %ctx.side(), "tree node has the other side to move, dropping tree tracking");
            self.cursor.lose_track();
            return None;
        }
        Some(node)
    }

    /// Move of the child preferred by `better(candidate, best)`, scanning in order
    fn select_child<K, B>(&mut self, ctx: &TurnContext<'_>, key: K, better: B) -> Option<Move>
    where
        K: Fn(&TreeNode) -> f64,
        B: Fn(f64, f64) -> bool,
    {
        let node = self.node_for(ctx)?;
        let mut best: Option<(f64, Move)> = None;
        for &child in &self.tree.get(node).children {
            let child = self.tree.get(child);
            let Some(mv) = child.mv else {
                continue;
            };
            let score = key(child);
            if best.map_or(true, |(best_score, _)| better(score, best_score)) {
                best = Some((score, mv));
            }
        }

        match best {
            Some((_, mv)) if ctx.candidates().contains(&mv) => Some(mv),
            Some((_, mv)) => {
                debug!(%mv, "tree move is not legal here, dropping tree tracking");
                self.cursor.lose_track();
                None
            }
            None => {
                debug!("tree has no continuation here, dropping tree tracking");
                self.cursor.lose_track();
                None
            }
        }
    }
}

// ============================================================================
// PLAYERS
// ============================================================================

/// Uniformly random legal moves
#[derive(Clone, Debug)]
pub struct RandomPlayer {
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform pick from `moves`
    pub fn pick(&mut self, moves: &[Move]) -> Option<Move> {
        moves.choose(&mut self.rng).copied()
    }
}

impl Player for RandomPlayer {
    fn choose_move(&mut self, ctx: &TurnContext<'_>) -> Option<Move> {
        self.pick(&ctx.candidates())
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Random
    }
}

/// Steers toward positions where the opponent historically lost the most
#[derive(Clone, Debug)]
pub struct AggressivePlayer {
    guide: TreeGuide,
    fallback: RandomPlayer,
}

impl AggressivePlayer {
    pub fn new(tree: Arc<GameTree>, seed: u64) -> Self {
        Self {
            guide: TreeGuide::new(tree),
            fallback: RandomPlayer::new(seed),
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.guide.cursor.is_tracking()
    }
}

impl Player for AggressivePlayer {
    fn choose_move(&mut self, ctx: &TurnContext<'_>) -> Option<Move> {
        let opponent = ctx.side().opponent();
        if let Some(mv) = self
            .guide
            .select_child(ctx, |node| node.lost(opponent), |score, best| score >= best)
        {
            return Some(mv);
        }
        self.fallback.choose_move(ctx)
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Aggressive
    }
}

/// Steers toward positions where it historically lost the least
#[derive(Clone, Debug)]
pub struct DefensivePlayer {
    guide: TreeGuide,
    fallback: RandomPlayer,
}

impl DefensivePlayer {
    pub fn new(tree: Arc<GameTree>, seed: u64) -> Self {
        Self {
            guide: TreeGuide::new(tree),
            fallback: RandomPlayer::new(seed),
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.guide.cursor.is_tracking()
    }
}

impl Player for DefensivePlayer {
    fn choose_move(&mut self, ctx: &TurnContext<'_>) -> Option<Move> {
        let own = ctx.side();
        if let Some(mv) = self
            .guide
            .select_child(ctx, |node| node.lost(own), |score, best| score <= best)
        {
            return Some(mv);
        }
        self.fallback.choose_move(ctx)
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Defensive
    }
}

/// Prefers moves the tree has never seen from this position
#[derive(Clone, Debug)]
pub struct ExploringPlayer {
    guide: TreeGuide,
    rng: RandomPlayer,
}

impl ExploringPlayer {
    pub fn new(tree: Arc<GameTree>, seed: u64) -> Self {
        Self {
            guide: TreeGuide::new(tree),
            rng: RandomPlayer::new(seed),
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.guide.cursor.is_tracking()
    }
}

impl Player for ExploringPlayer {
    fn choose_move(&mut self, ctx: &TurnContext<'_>) -> Option<Move> {
        let candidates = ctx.candidates();
        if let Some(node) = self.guide.node_for(ctx) {
            let tree = &self.guide.tree;
            let unexplored: Vec<Move> = candidates
                .iter()
                .copied()
                .filter(|mv| tree.find_child_by_move(node, mv).is_none())
                .collect();
            if !unexplored.is_empty() {
                return self.rng.pick(&unexplored);
            }
        }
        self.rng.pick(&candidates)
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Exploring
    }
}

// ============================================================================
// HUMAN PLAYER
// ============================================================================

/// Supplies moves for a human player (terminal, GUI, script)
pub trait MoveSource {
    /// Next proposed move, or None when the source is exhausted
    fn next_move(&mut self, ctx: &TurnContext<'_>, candidates: &[Move]) -> Option<Move>;

    /// Called when a proposed move is not legal; the source is asked again
    fn rejected(&mut self, _mv: Move, _candidates: &[Move]) {}
}

/// Player driven by a [`MoveSource`]
pub struct HumanPlayer<S> {
    source: S,
}

impl<S: MoveSource> HumanPlayer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: MoveSource> Player for HumanPlayer<S> {
    fn choose_move(&mut self, ctx: &TurnContext<'_>) -> Option<Move> {
        let candidates = ctx.candidates();
        if candidates.is_empty() {
            return None;
        }
        loop {
            let mv = self.source.next_move(ctx, &candidates)?;
            if candidates.contains(&mv) {
                return Some(mv);
            }
            self.source.rejected(mv, &candidates);
        }
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Human
    }
}

// ============================================================================
// TESTS
// ============================================================================
