//! Checkers CLI - Command-line interface
//!
//! Commands:
//! - play: Play a single game (human or computer players)
//! - explore: Grow the game tree by self-play and save the games
//! - stats: Measure the tree-guided players against random play
//! - tree: Inspect the game tree built from a corpus

mod common;
mod explore_cmd;
mod play_cmd;
mod stats_cmd;
mod tree_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "checkers")]
#[command(about = "6x6 checkers with a statistical game tree")]
struct Cli {
    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Grow the game tree with exploring players
    Explore(explore_cmd::ExploreArgs),
    /// Aggressive and defensive win rates against random play
    Stats(stats_cmd::StatsArgs),
    /// Print the game tree built from a corpus
    Tree(tree_cmd::TreeArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Explore(args) => explore_cmd::run(args, cli.seed),
        Commands::Stats(args) => stats_cmd::run(args, cli.seed),
        Commands::Tree(args) => tree_cmd::run(args),
    }
}

/// Logs go to stderr so JSON output on stdout stays clean
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
