//! Stats command - tree-guided players against random play
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: checkers_play::run_statistics() - the sets themselves
//! - Level 4: print_summary() - text formatting

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use checkers_core::DEFAULT_MOVE_LIMIT;
use checkers_play::{run_statistics, HeuristicSummary, StatisticsReport, StatsConfig};

use crate::common::{load_tree, resolve_seed};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct StatsArgs {
    /// Corpus of recorded games used to build the tree
    #[arg(long, value_name = "FILE")]
    pub corpus: Option<PathBuf>,

    /// Sets per player
    #[arg(long, default_value = "5")]
    pub sets: usize,

    /// Games per set
    #[arg(long, default_value = "1000")]
    pub games: usize,

    /// Play games one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Recorded moves after which a game is drawn
    #[arg(long, default_value_t = DEFAULT_MOVE_LIMIT)]
    pub max_moves: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON document written by `--json`
#[derive(Serialize)]
struct JsonOutput<'a> {
    timestamp: String,
    seed: u64,
    corpus: Option<String>,
    corpus_games: usize,
    elapsed_secs: f64,
    report: &'a StatisticsReport,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run stats command
pub fn run(args: StatsArgs, seed: Option<u64>) -> Result<()> {
    let loaded = load_tree(args.corpus.as_deref())?;
    if loaded.games == 0 {
        tracing::warn!("Game tree is empty; tree-guided players will play randomly");
    }

    let seed = resolve_seed(seed);
    let mut config = StatsConfig::new(args.sets, args.games)
        .with_move_limit(args.max_moves)
        .with_seed(seed);
    if args.sequential {
        config = config.sequential();
    }

    tracing::info!(
        "Running {} sets of {} games per player ({} tree nodes)",
        config.sets,
        config.games_per_set,
        loaded.tree.len()
    );

    let tree = Arc::new(loaded.tree);
    let start = Instant::now();
    let report = run_statistics(&tree, &config).context("Statistics run failed")?;
    let elapsed = start.elapsed().as_secs_f64();

    if args.json {
        let output = JsonOutput {
            timestamp: chrono::Utc::now().to_rfc3339(),
            seed,
            corpus: args.corpus.as_ref().map(|p| p.display().to_string()),
            corpus_games: loaded.games,
            elapsed_secs: elapsed,
            report: &report,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize report")?
        );
    } else {
        print_summary(&report.aggressive, "Aggressive");
        print_summary(&report.defensive, "Defensive");
        println!("\nElapsed: {:.1}s", elapsed);
    }

    Ok(())
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

fn print_summary(summary: &HeuristicSummary, label: &str) {
    println!();
    for set in &summary.sets {
        println!("{} Player Win rate for Set {}: {}", label, set.set, set.heuristic_win_pct);
        println!("Random Player Win rate for Set {}: {}", set.set, set.random_win_pct);
        println!("{} Wins more than Random: {}", label, set.heuristic_ahead);
        println!("{}", "=".repeat(63));
    }
    println!(
        "{} overall: {:.2}% wins, {:.2}% losses, {:.2}% draws ({} of {} sets ahead)",
        label,
        summary.total.white_win_rate() * 100.0,
        summary.total.black_win_rate() * 100.0,
        summary.total.draw_rate() * 100.0,
        summary.sets_ahead(),
        summary.sets.len()
    );
}
