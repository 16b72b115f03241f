//! Explore command - grow the game tree and save the games
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_exploration(), save_games(), report_results()
//! - Level 4: progress bar setup

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use checkers_core::{RecordedMove, DEFAULT_MOVE_LIMIT};
use checkers_play::{explore_with_progress, ExploreConfig, Exploration, MatchResult};
use checkers_tree::append_corpus;

use crate::common::{load_tree, resolve_seed};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ExploreArgs {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Corpus file the new games are appended to
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,

    /// Existing corpus to start the tree from
    #[arg(long, value_name = "FILE")]
    pub corpus: Option<PathBuf>,

    /// Recorded moves after which a game is drawn
    #[arg(long, default_value_t = DEFAULT_MOVE_LIMIT)]
    pub max_moves: usize,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run explore command
///
/// 1. Build the starting tree (empty or from a corpus)
/// 2. Play and insert exploring games one at a time
/// 3. Append the games to the output corpus and report
pub fn run(args: ExploreArgs, seed: Option<u64>) -> Result<()> {
    let loaded = load_tree(args.corpus.as_deref())?;
    let start_nodes = loaded.tree.len();
    let config = ExploreConfig::new(args.games)
        .with_move_limit(args.max_moves)
        .with_seed(resolve_seed(seed));

    let exploration = run_exploration(&config, loaded.tree, args.quiet)?;
    save_games(&exploration, &args)?;
    report_results(&exploration, start_nodes, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_exploration(config: &ExploreConfig, tree: checkers_tree::GameTree, quiet: bool) -> Result<Exploration> {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        create_progress_bar(config.games as u64)
    };

    let exploration = explore_with_progress(config, Some(tree), |_, record| {
        progress.set_message(format!("last game: {} in {} moves", record.result, record.len()));
        progress.inc(1);
    })
    .context("Exploration failed")?;

    progress.finish_and_clear();
    Ok(exploration)
}

fn save_games(exploration: &Exploration, args: &ExploreArgs) -> Result<()> {
    let games: Vec<Vec<RecordedMove>> = exploration.games.iter().map(|g| g.moves.clone()).collect();
    append_corpus(&args.output, &games)
        .with_context(|| format!("Failed to write games to {}", args.output.display()))?;
    tracing::info!("Appended {} games to {}", games.len(), args.output.display());
    Ok(())
}

fn report_results(exploration: &Exploration, start_nodes: usize, args: &ExploreArgs) {
    let tally = MatchResult::from_records(&exploration.games);
    let root = exploration.tree.get(exploration.tree.root());

    println!("\n=== Exploration Results ===");
    println!("Games played: {}", tally.games_played);
    println!(
        "White wins:   {} ({:.1}%)",
        tally.white_wins,
        tally.white_win_rate() * 100.0
    );
    println!(
        "Black wins:   {} ({:.1}%)",
        tally.black_wins,
        tally.black_win_rate() * 100.0
    );
    println!("Draws:        {} ({:.1}%)", tally.draws, tally.draw_rate() * 100.0);
    println!("Avg moves:    {:.1}", tally.avg_moves);
    println!(
        "Tree nodes:   {} -> {} (depth {})",
        start_nodes,
        exploration.tree.len(),
        exploration.tree.depth()
    );
    println!(
        "Root: white expects to lose {:.2}, black {:.2}",
        root.lost_white, root.lost_black
    );
    println!("Output: {}", args.output.display());
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn create_progress_bar(games: u64) -> ProgressBar {
    let progress = ProgressBar::new(games);
    let style = ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress
}
