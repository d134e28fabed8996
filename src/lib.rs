//! Checkers-Rust: a checkers rules engine with a simple computer opponent.
//!
//! This crate implements 8x8 checkers with long-range kings, mandatory
//! capture and multi-jump chains, plus a computer player with three
//! difficulty tiers. It is meant to sit behind a graphical front end, which
//! forwards square clicks and draws the state the engine exposes.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, AI scoring bonuses and pacing delays
//! - [`board`] - Pieces, squares and the immutable board
//! - [`movegen`] - Per-piece move and capture generation
//! - [`game`] - Game session state machine (turns, selection, chains)
//! - [`ai`] - Computer move selection
//! - [`replay`] - Paced replay of multi-step turns
//! - [`protocol`] - Text protocol for driving the engine
//! - [`error`] - Parse errors
//!
//! ## Example
//!
//! ```
//! use checkers_rust::board::{Side, Square};
//! use checkers_rust::game::{GameSession, Mode, Outcome};
//!
//! let mut game = GameSession::with_seed(Mode::VsFriend, 1);
//! let from = Square::new(5, 2).unwrap();
//! let to = Square::new(4, 3).unwrap();
//!
//! assert_eq!(game.click(from).outcome, Outcome::Selected(from));
//! game.click(to);
//! assert_eq!(game.turn(), Side::Black);
//! ```

pub mod ai;
pub mod board;
pub mod constants;
pub mod error;
pub mod game;
pub mod movegen;
pub mod protocol;
pub mod replay;
