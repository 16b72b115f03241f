//! Checkers Tree - statistical game tree and game corpus
//!
//! Provides:
//! - An arena tree indexed by move, holding expected piece losses per position
//! - CSV reading and writing of recorded games

pub mod corpus;
pub mod error;
pub mod tree;

pub use corpus::{append_corpus, parse_corpus, read_corpus, write_corpus, write_games, CorpusLoad, RejectedRecord};
pub use error::{CorpusError, RecordError, TreeError};
pub use tree::{build_from_corpus, build_skipping_invalid, GameTree, NodeId, SkippedGame, TreeNode};
