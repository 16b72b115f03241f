//! Error types for the game tree and the corpus files

use std::path::PathBuf;

use checkers_core::{Move, NotationError, ReplayError, Side};

/// A move sequence that does not fit the tree
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("move {index} ({mv}) was played by {found}, but {expected} is to move there")]
    MoverMismatch {
        index: usize,
        expected: Side,
        found: Side,
        mv: Move,
    },

    #[error("game {game} could not be inserted: {source}")]
    InvalidGame {
        game: usize,
        #[source]
        source: Box<TreeError>,
    },
}

/// Why a corpus row was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error("game does not follow the rules: {0}")]
    Replay(#[from] ReplayError),
}

/// Failure to read or write a corpus file
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("failed to {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
