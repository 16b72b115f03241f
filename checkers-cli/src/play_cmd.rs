//! Play command - one game between any two players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_player(), report_game(), record_game()
//! - Level 3: TerminalSource (human moves from stdin)
//! - Level 4: parsing and formatting utilities

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use checkers_core::{decode_move, GameState, Move, Piece, Side, DEFAULT_MOVE_LIMIT};
use checkers_play::{
    create_player, play_game, GameConfig, GameRecord, HumanPlayer, MoveSource, Player, PlayerKind, TurnContext,
};
use checkers_tree::{append_corpus, GameTree};

use crate::common::{load_tree, resolve_seed};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// White player: random, aggressive, defensive, exploring, human
    #[arg(long, default_value = "human")]
    pub white: PlayerKind,

    /// Black player: random, aggressive, defensive, exploring, human
    #[arg(long, default_value = "aggressive")]
    pub black: PlayerKind,

    /// Corpus of recorded games used to build the tree
    #[arg(long, value_name = "FILE")]
    pub corpus: Option<PathBuf>,

    /// Recorded moves after which the game is drawn
    #[arg(long, default_value_t = DEFAULT_MOVE_LIMIT)]
    pub max_moves: usize,

    /// Append the finished game to this corpus file
    #[arg(long, value_name = "FILE")]
    pub record: Option<PathBuf>,

    /// Output the game as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let tree = Arc::new(load_tree(args.corpus.as_deref())?.tree);
    let seed = resolve_seed(seed);
    let config = GameConfig::default().with_move_limit(args.max_moves).with_seed(seed);

    tracing::info!("Starting game: {} (white) vs {} (black)", args.white, args.black);

    let mut white = build_player(args.white, &tree, seed)?;
    let mut black = build_player(args.black, &tree, seed.wrapping_add(1))?;
    let record = play_game(white.as_mut(), black.as_mut(), &config).context("Game aborted")?;

    report_game(&record, args.json)?;

    if let Some(path) = &args.record {
        append_corpus(path, std::slice::from_ref(&record.moves))
            .with_context(|| format!("Failed to record game to {}", path.display()))?;
        tracing::info!("Recorded game to {}", path.display());
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Computer players come from the factory; humans read from the terminal
fn build_player(kind: PlayerKind, tree: &Arc<GameTree>, seed: u64) -> Result<Box<dyn Player + Send>> {
    if kind.is_interactive() {
        return Ok(Box::new(HumanPlayer::new(TerminalSource)));
    }
    create_player(kind, tree, seed).with_context(|| format!("Failed to create {} player", kind))
}

fn report_game(record: &GameRecord, json: bool) -> Result<()> {
    if json {
        let output = serde_json::to_string_pretty(record).context("Failed to serialize game")?;
        println!("{}", output);
        return Ok(());
    }

    println!("\n=== Game Over ===");
    println!("Result: {}", describe_result(record));
    println!("Moves:  {}", record.len());
    for (i, recorded) in record.moves.iter().enumerate() {
        println!("{:3}. {} {}", i + 1, side_label(recorded.side), recorded.mv);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - HUMAN MOVES
// ============================================================================

/// Reads moves for a human player from stdin
struct TerminalSource;

impl MoveSource for TerminalSource {
    fn next_move(&mut self, ctx: &TurnContext<'_>, candidates: &[Move]) -> Option<Move> {
        print_position(ctx.state);
        if let Some(previous) = ctx.previous {
            println!("Last move: {}", previous);
        }
        if let Some(square) = ctx.continuation {
            println!("{} must keep jumping with the piece on {}", side_label(ctx.side()), square);
        }
        print_candidates(candidates);

        let stdin = io::stdin();
        loop {
            print!("{} to move> ", side_label(ctx.side()));
            // A failed flush only delays the prompt
            let _ = io::stdout().flush();

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
            match parse_human_move(&line, candidates) {
                Some(mv) => return Some(mv),
                None => println!("Could not read '{}'. Try 'b5 a4', 'a4b5c6' or a number.", line.trim()),
            }
        }
    }

    fn rejected(&mut self, mv: Move, candidates: &[Move]) {
        println!("{} is not a legal move here.", mv);
        print_candidates(candidates);
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Accepts a 1-based candidate number, `from to` / `fromto`, or full notation
fn parse_human_move(input: &str, candidates: &[Move]) -> Option<Move> {
    let input = input.trim();
    if let Ok(index) = input.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| candidates.get(i)).copied();
    }

    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_ascii_lowercase();
    match compact.len() {
        4 => {
            let (from, to) = compact.split_at(2);
            candidates
                .iter()
                .copied()
                .find(|mv| mv.from.to_string() == from && mv.to.to_string() == to)
        }
        6 => decode_move(&compact).ok(),
        _ => None,
    }
}

fn print_candidates(candidates: &[Move]) {
    let listed: Vec<String> = candidates
        .iter()
        .enumerate()
        .map(|(i, mv)| format!("{}) {}", i + 1, mv))
        .collect();
    println!("Legal moves: {}", listed.join("  "));
}

fn print_position(state: &GameState) {
    let snapshot = state.snapshot();
    println!();
    println!("White: {}", list_pieces(&snapshot.white));
    println!("Black: {}", list_pieces(&snapshot.black));
}

/// Squares in order, crowned pieces marked with `*`
fn list_pieces(pieces: &[Piece]) -> String {
    pieces
        .iter()
        .map(|p| if p.crowned { format!("{}*", p.square) } else { p.square.to_string() })
        .collect::<Vec<_>>()
        .join(" ")
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::White => "White",
        Side::Black => "Black",
    }
}

fn describe_result(record: &GameRecord) -> String {
    match record.winner() {
        Some(side) => format!("{} wins", side_label(side)),
        None => "Draw".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_human_move() {
        let state = GameState::new();
        let candidates = state.legal_moves();

        let by_number = parse_human_move("1", &candidates).unwrap();
        assert_eq!(by_number, candidates[0]);
        assert_eq!(parse_human_move("0", &candidates), None);
        assert_eq!(parse_human_move("99", &candidates), None);

        let step = decode_move("b5  a4").unwrap();
        assert_eq!(parse_human_move("b5 a4\n", &candidates), Some(step));
        assert_eq!(parse_human_move("B5A4", &candidates), Some(step));
        assert_eq!(parse_human_move("b5  a4", &candidates), Some(step));

        assert_eq!(
            parse_human_move("a4b5c6", &[]),
            Some(decode_move("a4b5c6").unwrap())
        );
        assert_eq!(parse_human_move("hello", &candidates), None);
    }

    #[test]
    fn test_list_pieces_marks_crowns() {
        let pieces = vec![
            Piece::new(Side::White, "b5".parse().unwrap()),
            Piece::crowned(Side::White, "d1".parse().unwrap()),
        ];
        assert_eq!(list_pieces(&pieces), "b5 d1*");
    }
}
