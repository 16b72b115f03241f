//! Configuration types for games, statistics batches and exploration
//!
//! Level 4 - Utilities and configuration

use std::fmt;
use std::str::FromStr;

use checkers_core::DEFAULT_MOVE_LIMIT;
use serde::{Deserialize, Serialize};

/// Seed used when a config carries none
pub const DEFAULT_SEED: u64 = 42;

/// Player strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Uniform over the legal moves
    #[default]
    Random,
    /// Follows the tree toward the opponent's largest expected loss
    Aggressive,
    /// Follows the tree toward its own smallest expected loss
    Defensive,
    /// Prefers moves the tree has not seen yet
    Exploring,
    /// Moves come from an external source
    Human,
}

impl PlayerKind {
    pub const ALL: [PlayerKind; 5] = [
        PlayerKind::Random,
        PlayerKind::Aggressive,
        PlayerKind::Defensive,
        PlayerKind::Exploring,
        PlayerKind::Human,
    ];

    /// Whether the strategy reads the game tree
    pub fn uses_tree(self) -> bool {
        matches!(
            self,
            PlayerKind::Aggressive | PlayerKind::Defensive | PlayerKind::Exploring
        )
    }

    pub fn is_interactive(self) -> bool {
        self == PlayerKind::Human
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerKind::Random => "random",
            PlayerKind::Aggressive => "aggressive",
            PlayerKind::Defensive => "defensive",
            PlayerKind::Exploring => "exploring",
            PlayerKind::Human => "human",
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        PlayerKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| {
                format!(
                    "unknown player '{}' (expected one of: random, aggressive, defensive, exploring, human)",
                    s
                )
            })
    }
}

/// Settings for a single game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Recorded moves after which the game is drawn
    pub move_limit: usize,
    /// Random seed for reproducibility (None = DEFAULT_SEED)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            move_limit: DEFAULT_MOVE_LIMIT,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_move_limit(mut self, move_limit: usize) -> Self {
        self.move_limit = move_limit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn base_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }
}

/// Settings for the heuristic-versus-random statistics
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsConfig {
    /// Number of sets per heuristic
    pub sets: usize,
    /// Games in each set
    pub games_per_set: usize,
    /// Whether to run games in parallel
    pub parallel: bool,
    /// Recorded moves after which a game is drawn
    pub move_limit: usize,
    /// Random seed for reproducibility (None = DEFAULT_SEED)
    pub seed: Option<u64>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            sets: 5,
            games_per_set: 1000,
            parallel: true,
            move_limit: DEFAULT_MOVE_LIMIT,
            seed: None,
        }
    }
}

impl StatsConfig {
    /// Create config with the given set layout
    pub fn new(sets: usize, games_per_set: usize) -> Self {
        Self {
            sets,
            games_per_set,
            ..Default::default()
        }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_move_limit(mut self, move_limit: usize) -> Self {
        self.move_limit = move_limit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Per-game settings derived from this config
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            move_limit: self.move_limit,
            seed: self.seed,
        }
    }
}

/// Settings for the exploration runner
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExploreConfig {
    /// Games to play
    pub games: usize,
    /// Recorded moves after which a game is drawn
    pub move_limit: usize,
    /// Random seed for reproducibility (None = DEFAULT_SEED)
    pub seed: Option<u64>,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            games: 100,
            move_limit: DEFAULT_MOVE_LIMIT,
            seed: None,
        }
    }
}

impl ExploreConfig {
    pub fn new(games: usize) -> Self {
        Self {
            games,
            ..Default::default()
        }
    }

    pub fn with_move_limit(mut self, move_limit: usize) -> Self {
        self.move_limit = move_limit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            move_limit: self.move_limit,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_kind_parse() {
        assert_eq!("random".parse::<PlayerKind>().unwrap(), PlayerKind::Random);
        assert_eq!("Aggressive".parse::<PlayerKind>().unwrap(), PlayerKind::Aggressive);
        assert_eq!(" defensive ".parse::<PlayerKind>().unwrap(), PlayerKind::Defensive);
        assert!("minimax".parse::<PlayerKind>().is_err());
        for kind in PlayerKind::ALL {
            assert_eq!(kind.to_string().parse::<PlayerKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_player_kind_flags() {
        assert!(PlayerKind::Aggressive.uses_tree());
        assert!(PlayerKind::Exploring.uses_tree());
        assert!(!PlayerKind::Random.uses_tree());
        assert!(PlayerKind::Human.is_interactive());
        assert!(!PlayerKind::Defensive.is_interactive());
    }

    #[test]
    fn test_game_config_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.move_limit, 35);
        assert_eq!(config.base_seed(), DEFAULT_SEED);
        assert_eq!(config.with_seed(7).base_seed(), 7);
    }

    #[test]
    fn test_stats_config_defaults() {
        let config = StatsConfig::default();
        assert_eq!(config.sets, 5);
        assert_eq!(config.games_per_set, 1000);
        assert!(config.parallel);

        let config = StatsConfig::new(2, 10).sequential().with_move_limit(20).with_seed(3);
        assert!(!config.parallel);
        assert_eq!(config.game_config(), GameConfig { move_limit: 20, seed: Some(3) });
    }

    #[test]
    fn test_explore_config_defaults() {
        let config = ExploreConfig::default();
        assert_eq!(config.games, 100);
        assert_eq!(config.move_limit, 35);
        assert_eq!(ExploreConfig::new(5).games, 5);
    }
}
