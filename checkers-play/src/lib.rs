//! Checkers Play - players, game driving and batches of games
//!
//! This crate provides:
//! - Random, tree-guided (aggressive, defensive, exploring) and human players
//! - A turn-by-turn game driver with capture chains and crowning
//! - Parallel statistics batches against random play
//! - The exploration runner that grows the game tree
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: explore, run_statistics (orchestration)
//! - Level 2: play_match (phases)
//! - Level 3: play_game, GameDriver, players (steps)
//! - Level 4: configuration

mod config;
mod error;
mod exploration;
mod game_runner;
mod match_play;
mod player;

pub use config::{ExploreConfig, GameConfig, PlayerKind, StatsConfig, DEFAULT_SEED};
pub use error::PlayError;
pub use exploration::{explore, explore_with_progress, Exploration};
pub use game_runner::{play_game, GameDriver, GameRecord, GameRunner, TurnStatus};
pub use match_play::{
    play_match, run_statistics, truncated_percentage, HeuristicSummary, MatchResult, SetResult, StatisticsReport,
};
pub use player::{
    create_player, AggressivePlayer, DefensivePlayer, ExploringPlayer, HumanPlayer, MoveSource, Player, RandomPlayer,
    TreeCursor, TurnContext,
};
