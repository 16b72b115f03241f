//! Helpers shared by the subcommands

use std::path::Path;

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use checkers_tree::{build_skipping_invalid, read_corpus, GameTree};

/// Tree built from a corpus file, with load counts for reporting
pub struct LoadedTree {
    pub tree: GameTree,
    pub games: usize,
    pub rejected: usize,
}

/// Build the tree from `corpus`, or an empty tree when no file is given
pub fn load_tree(corpus: Option<&Path>) -> Result<LoadedTree> {
    let Some(path) = corpus else {
        return Ok(LoadedTree {
            tree: GameTree::default(),
            games: 0,
            rejected: 0,
        });
    };

    let load = read_corpus(path).with_context(|| format!("Failed to read corpus: {}", path.display()))?;
    if !load.is_clean() {
        tracing::warn!(
            "{} of {} rows in {} were rejected",
            load.rejected.len(),
            load.rejected.len() + load.games.len(),
            path.display()
        );
    }

    let (tree, skipped) = build_skipping_invalid(&load.games);
    if !skipped.is_empty() {
        tracing::warn!(
            "{} games from {} did not fit the tree and were skipped",
            skipped.len(),
            path.display()
        );
    }
    let games = load.games.len() - skipped.len();
    tracing::info!(
        "Loaded {} games from {} ({} tree nodes)",
        games,
        path.display(),
        tree.len()
    );

    Ok(LoadedTree {
        tree,
        games,
        rejected: load.rejected.len() + skipped.len(),
    })
}

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// The given seed, or a fresh one; logged so runs can be repeated
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    let seed = seed.unwrap_or_else(|| create_rng(None).gen());
    tracing::debug!("Using seed {}", seed);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_tree_keeps_good_rows() {
        let path = std::env::temp_dir().join(format!("checkers-cli-load-{}.csv", std::process::id()));
        std::fs::write(&path, "1b5  a4,0c2  b3\n0a2  b3,1b5  a4\n1d5  c4,0c2  d3\n").unwrap();
        let loaded = load_tree(Some(&path)).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.games, 2);
        assert_eq!(loaded.rejected, 1);
        assert_eq!(loaded.tree.get(loaded.tree.root()).children.len(), 2);
    }

    #[test]
    fn test_load_tree_without_corpus() {
        let loaded = load_tree(None).unwrap();
        assert_eq!(loaded.games, 0);
        assert_eq!(loaded.tree.len(), 1);
    }
}
