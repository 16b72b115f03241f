//! Errors raised while playing games

use checkers_core::{Move, Side};
use checkers_tree::TreeError;

use crate::config::PlayerKind;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlayError {
    #[error("{mv} is not a legal move for {side}")]
    IllegalMove { side: Side, mv: Move },

    #[error("{side} produced no move")]
    NoMove { side: Side },

    #[error("the game is already over")]
    GameOver,

    #[error("{0} players need an interactive move source and cannot play in batches")]
    InteractivePlayer(PlayerKind),

    #[error("tree update failed: {0}")]
    Tree(#[from] TreeError),
}
