//! Match play - batches of games between two strategies
//!
//! Level 2 - Phase-level implementation

use std::sync::Arc;

use checkers_tree::GameTree;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{PlayerKind, StatsConfig};
use crate::error::PlayError;
use crate::game_runner::{GameRecord, GameRunner};

/// Result of a match (multiple games)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Wins for the white player
    pub white_wins: u32,
    /// Wins for the black player
    pub black_wins: u32,
    /// Draws (move limit or no legal moves)
    pub draws: u32,
    /// Average game length in recorded moves
    pub avg_moves: f64,
    /// Total games played
    pub games_played: u32,
}

impl MatchResult {
    /// Create empty result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Tally finished games
    pub fn from_records(records: &[GameRecord]) -> Self {
        let mut result = Self::empty();
        let mut total_moves = 0usize;
        for record in records {
            total_moves += record.len();
            if record.white_wins() {
                result.white_wins += 1;
            } else if record.black_wins() {
                result.black_wins += 1;
            } else {
                result.draws += 1;
            }
        }
        result.games_played = records.len() as u32;
        if !records.is_empty() {
            result.avg_moves = total_moves as f64 / records.len() as f64;
        }
        result
    }

    /// Combine two results
    pub fn combine(&self, other: &MatchResult) -> MatchResult {
        let total_games = self.games_played + other.games_played;
        let avg_moves = if total_games > 0 {
            (self.avg_moves * self.games_played as f64 + other.avg_moves * other.games_played as f64)
                / total_games as f64
        } else {
            0.0
        };

        MatchResult {
            white_wins: self.white_wins + other.white_wins,
            black_wins: self.black_wins + other.black_wins,
            draws: self.draws + other.draws,
            avg_moves,
            games_played: total_games,
        }
    }

    /// Get win rate for white player
    pub fn white_win_rate(&self) -> f64 {
        rate(self.white_wins, self.games_played)
    }

    /// Get win rate for black player
    pub fn black_win_rate(&self) -> f64 {
        rate(self.black_wins, self.games_played)
    }

    /// Get draw rate
    pub fn draw_rate(&self) -> f64 {
        rate(self.draws, self.games_played)
    }
}

fn rate(count: u32, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        count as f64 / games as f64
    }
}

/// Win percentage truncated (not rounded) to two decimals
pub fn truncated_percentage(wins: u32, games: u32) -> f64 {
    if games == 0 {
        return 0.0;
    }
    (u64::from(wins) * 10_000 / u64::from(games)) as f64 / 100.0
}

/// Play `games` games between two strategies (Level 2 phase)
///
/// Game `i` is seeded from `config.seed + 2i`; games run on the rayon pool
/// when `config.parallel` is set. The tree is only read.
pub fn play_match(
    white: PlayerKind,
    black: PlayerKind,
    tree: &Arc<GameTree>,
    games: usize,
    config: &StatsConfig,
) -> Result<MatchResult, PlayError> {
    for kind in [white, black] {
        if kind.is_interactive() {
            return Err(PlayError::InteractivePlayer(kind));
        }
    }
    if games == 0 {
        return Ok(MatchResult::empty());
    }

    let base_seed = config.game_config().base_seed();
    let play_one = |index: usize| -> Result<GameRecord, PlayError> {
        let mut runner = GameRunner::new(Arc::clone(tree), config.game_config());
        runner.reset_seed(base_seed.wrapping_add(2 * index as u64));
        runner.play(white, black)
    };

    let records: Vec<GameRecord> = if config.parallel {
        (0..games).into_par_iter().map(play_one).collect::<Result<_, _>>()?
    } else {
        (0..games).map(play_one).collect::<Result<_, _>>()?
    };

    Ok(MatchResult::from_records(&records))
}

// ============================================================================
// Level 1 - Statistics report
// ============================================================================

/// One set of games of a heuristic (white) against random (black)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetResult {
    /// 1-based set number
    pub set: usize,
    pub heuristic_win_pct: f64,
    pub random_win_pct: f64,
    /// Whether the heuristic won more games than random in this set
    pub heuristic_ahead: bool,
    pub result: MatchResult,
}

/// All sets for one heuristic
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeuristicSummary {
    pub player: PlayerKind,
    pub sets: Vec<SetResult>,
    pub total: MatchResult,
}

impl HeuristicSummary {
    /// Sets in which the heuristic won more games than random
    pub fn sets_ahead(&self) -> usize {
        self.sets.iter().filter(|set| set.heuristic_ahead).count()
    }
}

/// Aggressive and defensive play against random
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub games_per_set: usize,
    pub tree_nodes: usize,
    pub aggressive: HeuristicSummary,
    pub defensive: HeuristicSummary,
}

/// Run `config.sets` sets of `config.games_per_set` games for each heuristic
pub fn run_statistics(tree: &Arc<GameTree>, config: &StatsConfig) -> Result<StatisticsReport, PlayError> {
    let aggressive = summarize(PlayerKind::Aggressive, 0, tree, config)?;
    let defensive = summarize(PlayerKind::Defensive, config.sets, tree, config)?;
    Ok(StatisticsReport {
        games_per_set: config.games_per_set,
        tree_nodes: tree.len(),
        aggressive,
        defensive,
    })
}

/// Play every set for one heuristic; `set_offset` keeps seeds apart between heuristics
fn summarize(
    player: PlayerKind,
    set_offset: usize,
    tree: &Arc<GameTree>,
    config: &StatsConfig,
) -> Result<HeuristicSummary, PlayError> {
    let base_seed = config.game_config().base_seed();
    let mut sets = Vec::with_capacity(config.sets);
    let mut total = MatchResult::empty();

    for set in 1..=config.sets {
        let set_index = (set_offset + set - 1) as u64;
        let set_config = StatsConfig {
            seed: Some(base_seed.wrapping_add(set_index.wrapping_mul(2 * config.games_per_set as u64))),
            ..config.clone()
        };
        let result = play_match(player, PlayerKind::Random, tree, config.games_per_set, &set_config)?;

        let heuristic_win_pct = truncated_percentage(result.white_wins, result.games_played);
        let random_win_pct = truncated_percentage(result.black_wins, result.games_played);
        info!(
            %player,
            set,
            heuristic_win_pct,
            random_win_pct,
            draws = result.draws,
            "statistics set finished"
        );

        total = total.combine(&result);
        sets.push(SetResult {
            set,
            heuristic_win_pct,
            random_win_pct,
            heuristic_ahead: result.white_wins > result.black_wins,
            result,
        });
    }

    Ok(HeuristicSummary { player, sets, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game_runner::play_game;
    use crate::player::RandomPlayer;

    fn record_with(result: checkers_core::GameResult, moves: usize) -> GameRecord {
        let mut white = RandomPlayer::new(moves as u64);
        let mut black = RandomPlayer::new(moves as u64 + 1);
        let mut record = play_game(&mut white, &mut black, &GameConfig::default()).unwrap();
        record.result = result;
        record.moves.truncate(moves);
        record
    }

    #[test]
    fn test_match_result_empty() {
        let result = MatchResult::empty();
        assert_eq!(result.games_played, 0);
        assert_eq!(result.white_win_rate(), 0.0);
        assert_eq!(result.draw_rate(), 0.0);
    }

    #[test]
    fn test_from_records() {
        use checkers_core::GameResult::*;
        let records = vec![record_with(WhiteWins, 2), record_with(BlackWins, 4), record_with(Draw, 3)];
        let result = MatchResult::from_records(&records);
        assert_eq!(result.white_wins, 1);
        assert_eq!(result.black_wins, 1);
        assert_eq!(result.draws, 1);
        assert_eq!(result.games_played, 3);
        assert!((result.avg_moves - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_match_result_combine() {
        let a = MatchResult {
            white_wins: 3,
            black_wins: 1,
            draws: 0,
            avg_moves: 20.0,
            games_played: 4,
        };
        let b = MatchResult {
            white_wins: 0,
            black_wins: 2,
            draws: 2,
            avg_moves: 30.0,
            games_played: 4,
        };
        let combined = a.combine(&b);
        assert_eq!(combined.white_wins, 3);
        assert_eq!(combined.black_wins, 3);
        assert_eq!(combined.draws, 2);
        assert_eq!(combined.games_played, 8);
        assert!((combined.avg_moves - 25.0).abs() < 1e-9);
        assert!((combined.white_win_rate() - 0.375).abs() < 1e-9);
    }

    #[test]
    fn test_truncated_percentage() {
        assert_eq!(truncated_percentage(1, 3), 33.33);
        assert_eq!(truncated_percentage(2, 3), 66.66);
        assert_eq!(truncated_percentage(523, 1000), 52.3);
        assert_eq!(truncated_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let tree = Arc::new(GameTree::default());
        let config = StatsConfig::new(1, 6).with_seed(17);
        let parallel = play_match(PlayerKind::Random, PlayerKind::Random, &tree, 6, &config).unwrap();
        let sequential =
            play_match(PlayerKind::Random, PlayerKind::Random, &tree, 6, &config.clone().sequential()).unwrap();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.games_played, 6);
        assert_eq!(parallel.white_wins + parallel.black_wins + parallel.draws, 6);
    }

    #[test]
    fn test_interactive_players_refused() {
        let tree = Arc::new(GameTree::default());
        let err = play_match(PlayerKind::Human, PlayerKind::Random, &tree, 1, &StatsConfig::default()).unwrap_err();
        assert_eq!(err, PlayError::InteractivePlayer(PlayerKind::Human));
    }

    #[test]
    fn test_run_statistics_shape() {
        let tree = Arc::new(GameTree::default());
        let config = StatsConfig::new(2, 5).with_seed(1).sequential();
        let report = run_statistics(&tree, &config).unwrap();
        assert_eq!(report.games_per_set, 5);
        assert_eq!(report.aggressive.player, PlayerKind::Aggressive);
        assert_eq!(report.defensive.player, PlayerKind::Defensive);
        assert_eq!(report.aggressive.sets.len(), 2);
        assert_eq!(report.aggressive.total.games_played, 10);
        for set in &report.defensive.sets {
            assert_eq!(set.heuristic_ahead, set.result.white_wins > set.result.black_wins);
            assert!(set.heuristic_win_pct + set.random_win_pct <= 100.0);
        }
    }
}
