//! Checkers-Rust: a checkers rules engine with a simple computer opponent.
//!
//! ## Usage
//!
//! - `checkers-rust` - Start the text protocol on stdin/stdout
//! - `checkers-rust protocol` - Same as above
//! - `checkers-rust play` - Play in the terminal by typing squares
//! - `checkers-rust demo` - Watch two computer players play each other

use std::io::{self, BufRead};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use checkers_rust::ai::{Difficulty, play_turn};
use checkers_rust::board::{Board, Side, Square};
use checkers_rust::constants::{CHAIN_STEP_DELAY_MS, MAX_GAME_LEN};
use checkers_rust::game::{GameSession, Mode, Status};
use checkers_rust::movegen::side_moves;
use checkers_rust::protocol::ProtocolEngine;
use checkers_rust::replay::Animator;

/// Checkers-Rust: a checkers rules engine with a simple computer opponent
#[derive(Parser)]
#[command(name = "checkers-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed for the computer's random choices
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the line-based text protocol on stdin/stdout
    Protocol,
    /// Play in the terminal: type `row,col` to click a square, `new` to restart
    Play {
        /// Opponent: `ai` or `friend`
        #[arg(long, default_value = "ai")]
        mode: String,
        /// Computer strength when playing against the computer
        #[arg(long, value_enum, default_value_t = Difficulty::Easy)]
        difficulty: Difficulty,
        /// Pause between replayed jumps, in milliseconds
        #[arg(long, default_value_t = CHAIN_STEP_DELAY_MS)]
        delay_ms: u64,
    },
    /// Let two computer players play a game against each other
    Demo {
        /// Strength of the red player
        #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
        red: Difficulty,
        /// Strength of the black player
        #[arg(long, value_enum, default_value_t = Difficulty::Expert)]
        black: Difficulty,
        /// Pause between moves, in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        /// Stop after this many turns
        #[arg(long, default_value_t = MAX_GAME_LEN)]
        max_plies: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Play {
            mode,
            difficulty,
            delay_ms,
        }) => {
            let mode = match Mode::parse(&mode, None)? {
                Mode::VsAi { .. } => Mode::VsAi { difficulty },
                other => other,
            };
            run_play(mode, Duration::from_millis(delay_ms), cli.seed)
        }
        Some(Commands::Demo {
            red,
            black,
            delay_ms,
            max_plies,
        }) => run_demo(red, black, Duration::from_millis(delay_ms), max_plies, cli.seed),
        Some(Commands::Protocol) | None => ProtocolEngine::new(cli.seed).run(),
    }
}

fn run_play(mode: Mode, delay: Duration, seed: Option<u64>) -> Result<()> {
    let mut game = match seed {
        Some(seed) => GameSession::with_seed(mode, seed),
        None => GameSession::new(mode),
    };
    let animator = Animator::with_interval(delay);

    println!("Checkers-Rust ({mode}). Type row,col to click a square, `new` or `quit`.\n");
    print_state(&game, true);

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;
        match line.trim() {
            "" => continue,
            "quit" | "q" => break,
            "new" => {
                game.reset();
                print_state(&game, true);
                continue;
            }
            text => match text.parse::<Square>() {
                Ok(sq) => {
                    let transition = game.click(sq);
                    animator.play(&game, &transition.frames, |frame| {
                        println!("{} {}\n{}", frame.side, frame.mv, frame.board);
                    });
                    print_state(&game, transition.frames.is_empty());
                }
                Err(e) => println!("{e}"),
            },
        }
    }
    Ok(())
}

fn print_state(game: &GameSession, show_board: bool) {
    if show_board {
        println!("{}", game.board());
    }
    match game.status() {
        Status::Won(side) => println!("{side} wins. Type `new` to play again."),
        Status::InProgress => {
            print!("{} to move", game.turn());
            if let Some(sel) = game.selection() {
                let dests: Vec<String> = sel.destinations().map(|d| d.to_string()).collect();
                print!(", {} selected: {}", sel.square, dests.join(" "));
            }
            println!();
        }
    }
}

fn run_demo(
    red: Difficulty,
    black: Difficulty,
    delay: Duration,
    max_plies: usize,
    seed: Option<u64>,
) -> Result<()> {
    if max_plies == 0 {
        bail!("--max-plies must be at least 1");
    }
    let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);

    println!("Checkers-Rust: red ({red}) vs black ({black})\n");
    let mut board = Board::initial();
    let mut side = Side::Red;
    println!("{board}");

    for ply in 1..=max_plies {
        let difficulty = if side == Side::Red { red } else { black };
        let Some(turn) = play_turn(&board, side, difficulty, &mut rng) else {
            println!("{side} has no moves: {} wins", side.opponent());
            return Ok(());
        };

        for (mv, next) in turn.moves.iter().zip(&turn.boards) {
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
            println!("{ply:>3}. {side} {mv}");
            board = *next;
        }
        println!("{board}");
        info!(ply, red = board.count(Side::Red), black = board.count(Side::Black), "turn done");
        side = side.opponent();
    }

    let (r, b) = (board.count(Side::Red), board.count(Side::Black));
    println!("Stopped after {max_plies} turns: red {r} pieces, black {b} pieces");
    if side_moves(&board, side).is_empty() {
        println!("{side} has no moves: {} wins", side.opponent());
    }
    Ok(())
}
