//! Tree command - inspect the game tree built from a corpus

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use checkers_core::Side;
use checkers_tree::{GameTree, TreeNode};

use crate::common::load_tree;

#[derive(Args)]
pub struct TreeArgs {
    /// Corpus of recorded games
    #[arg(long, value_name = "FILE")]
    pub corpus: PathBuf,

    /// Deepest level to print (0 prints only the root)
    #[arg(long, default_value = "2")]
    pub depth: usize,

    /// Print only the summary
    #[arg(long)]
    pub summary: bool,
}

/// Run tree command
pub fn run(args: TreeArgs) -> Result<()> {
    let loaded = load_tree(Some(&args.corpus))?;
    if loaded.games == 0 {
        bail!("No usable games in {}", args.corpus.display());
    }

    if !args.summary {
        print!("{}", loaded.tree.render(Some(args.depth)));
    }

    println!("\n=== Tree Summary ===");
    println!("Games:      {} ({} rows rejected)", loaded.games, loaded.rejected);
    println!("Nodes:      {}", loaded.tree.len());
    println!("Depth:      {}", loaded.tree.depth());
    print_opening_choices(&loaded.tree);
    Ok(())
}

/// Opening moves the two tree-guided strategies would pick for white
fn print_opening_choices(tree: &GameTree) {
    let root = tree.get(tree.root());
    let openings: Vec<_> = root.children.iter().map(|&id| tree.get(id)).collect();

    // Last maximum / minimum, matching how the players break ties
    let aggressive = openings
        .iter()
        .fold(None, |best: Option<&&TreeNode>, node| match best {
            Some(b) if node.lost(Side::Black) < b.lost(Side::Black) => Some(b),
            _ => Some(node),
        });
    let defensive = openings
        .iter()
        .fold(None, |best: Option<&&TreeNode>, node| match best {
            Some(b) if node.lost(Side::White) > b.lost(Side::White) => Some(b),
            _ => Some(node),
        });

    if let Some(node) = aggressive.and_then(|n| n.mv.map(|mv| (mv, n.lost_black))) {
        println!("Aggressive: {} (black expected to lose {:.2})", node.0, node.1);
    }
    if let Some(node) = defensive.and_then(|n| n.mv.map(|mv| (mv, n.lost_white))) {
        println!("Defensive:  {} (white expected to lose {:.2})", node.0, node.1);
    }
}
