//! Exploration runner - grows the game tree by self-play
//!
//! Level 1 - Orchestration
//!
//! Two exploring players play one game at a time against the current tree.
//! Each finished game is inserted before the next one starts, so later games
//! steer away from lines the tree already knows.

use std::sync::Arc;

use checkers_tree::GameTree;
use tracing::{debug, info};

use crate::config::ExploreConfig;
use crate::error::PlayError;
use crate::game_runner::{play_game, GameRecord};
use crate::player::ExploringPlayer;

/// Tree grown by exploration plus every game played
#[derive(Clone, Debug)]
pub struct Exploration {
    pub tree: GameTree,
    pub games: Vec<GameRecord>,
}

/// Play `config.games` exploring games, starting from `initial` or an empty tree
pub fn explore(config: &ExploreConfig, initial: Option<GameTree>) -> Result<Exploration, PlayError> {
    explore_with_progress(config, initial, |_, _| {})
}

/// Same as [`explore`], calling `on_game(index, record)` after each inserted game
pub fn explore_with_progress<F>(
    config: &ExploreConfig,
    initial: Option<GameTree>,
    mut on_game: F,
) -> Result<Exploration, PlayError>
where
    F: FnMut(usize, &GameRecord),
{
    let game_config = config.game_config();
    let base_seed = game_config.base_seed();
    let mut tree = Arc::new(initial.unwrap_or_default());
    let mut games = Vec::with_capacity(config.games);

    info!(games = config.games, start_nodes = tree.len(), "exploring");

    for index in 0..config.games {
        let seed = base_seed.wrapping_add(2 * index as u64);
        let record = {
            let mut white = ExploringPlayer::new(Arc::clone(&tree), seed);
            let mut black = ExploringPlayer::new(Arc::clone(&tree), seed.wrapping_add(1));
            play_game(&mut white, &mut black, &game_config)?
        };

        // Players are gone, so this is the only handle and no copy is made
        Arc::make_mut(&mut tree).insert_sequence(&record.moves)?;
        debug!(
            game = index,
            result = %record.result,
            moves = record.len(),
            nodes = tree.len(),
            "explored game"
        );

        on_game(index, &record);
        games.push(record);
    }

    info!(games = games.len(), nodes = tree.len(), "exploration finished");

    let tree = Arc::try_unwrap(tree).unwrap_or_else(|shared| (*shared).clone());
    Ok(Exploration { tree, games })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_game_is_in_the_tree() {
        let result = explore(&ExploreConfig::new(25).with_seed(3), None).unwrap();
        assert_eq!(result.games.len(), 25);
        for record in &result.games {
            assert!(result.tree.contains_sequence(&record.moves));
        }
    }

    #[test]
    fn test_tree_grows_and_opening_is_covered() {
        let result = explore(&ExploreConfig::new(10).with_seed(8), None).unwrap();
        let root = result.tree.get(result.tree.root());
        // Five opening moves exist and exploration prefers unseen ones
        assert_eq!(root.children.len(), 5);
        assert!(result.tree.len() > 10);
    }

    #[test]
    fn test_exploration_is_reproducible() {
        let config = ExploreConfig::new(5).with_seed(99);
        let a = explore(&config, None).unwrap();
        let b = explore(&config, None).unwrap();
        assert_eq!(a.games, b.games);
        assert_eq!(a.tree, b.tree);
    }

    #[test]
    fn test_exploring_games_are_distinct() {
        let result = explore(&ExploreConfig::new(50).with_seed(42), None).unwrap();
        for (i, a) in result.games.iter().enumerate() {
            for b in &result.games[i + 1..] {
                assert_ne!(a.moves, b.moves);
            }
        }
    }

    #[test]
    fn test_continues_from_existing_tree() {
        let first = explore(&ExploreConfig::new(4).with_seed(1), None).unwrap();
        let nodes = first.tree.len();
        let mut seen = 0;
        let second = explore_with_progress(&ExploreConfig::new(3).with_seed(2), Some(first.tree), |_, _| seen += 1)
            .unwrap();
        assert_eq!(seen, 3);
        assert!(second.tree.len() > nodes);
        for record in &first.games {
            assert!(second.tree.contains_sequence(&record.moves));
        }
    }
}
