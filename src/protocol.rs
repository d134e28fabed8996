//! Line-oriented text protocol for driving a game from another process.
//!
//! The protocol follows the shape of GTP: each line holds an optional
//! numeric id, a command and its arguments. Successful responses start with
//! `=`, failures with `?`, followed by the id if one was given, the response
//! text, and a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version` - Engine identification
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `start <ai|friend> [easy|medium|expert]` - Start a new game
//! - `new_game` - Restart with the current mode
//! - `click <row,col>` - Click a square; prints the outcome and every move played
//! - `genmove` - Let the computer move if it is its turn
//! - `moves <row,col>` - Raw moves of the piece on a square
//! - `legal_moves` - Legal moves of the side to move
//! - `selection` - Selected square and its destinations
//! - `showboard` - Print the board
//! - `turn`, `status`, `last_move` - Game state queries
//!
//! ## Example
//!
//! ```ignore
//! use checkers_rust::protocol::ProtocolEngine;
//! let mut engine = ProtocolEngine::new(None);
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::board::Square;
use crate::game::{Frame, GameSession, Mode, Outcome, Status};
use crate::movegen::{Move, moves_for};

/// The list of known protocol commands.
const KNOWN_COMMANDS: &[&str] = &[
    "click",
    "genmove",
    "known_command",
    "last_move",
    "legal_moves",
    "list_commands",
    "moves",
    "name",
    "new_game",
    "protocol_version",
    "quit",
    "selection",
    "showboard",
    "start",
    "status",
    "turn",
    "version",
];

/// Protocol engine state.
pub struct ProtocolEngine {
    /// Current game, once `start` has been received
    session: Option<GameSession>,
    /// Seed for reproducible computer moves
    seed: Option<u64>,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ProtocolEngine {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            session: None,
            seed,
        }
    }

    /// Run the command loop on stdin/stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop on arbitrary streams until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n").context("failed to write response")?;
            output.flush().context("failed to flush response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    fn new_session(&self, mode: Mode) -> GameSession {
        match self.seed {
            Some(seed) => GameSession::with_seed(mode, seed),
            None => GameSession::new(mode),
        }
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "start" => {
                let Some(mode) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match Mode::parse(mode, args.get(1).copied()) {
                    Ok(mode) => {
                        self.session = Some(self.new_session(mode));
                        (true, mode.to_string())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            _ => match self.session.as_mut() {
                Some(session) => Self::execute_game(session, command, args),
                None if KNOWN_COMMANDS.contains(&command) => {
                    (false, "no game started".to_string())
                }
                None => (false, format!("unknown command: {command}")),
            },
        }
    }

    /// Commands that need a running game.
    fn execute_game(session: &mut GameSession, command: &str, args: &[&str]) -> (bool, String) {
        let square_arg = || -> Result<Square, String> {
            let text = args.first().ok_or("missing argument")?;
            text.parse::<Square>().map_err(|e| e.to_string())
        };

        match command {
            "new_game" => {
                session.reset();
                (true, String::new())
            }

            "click" => match square_arg() {
                Ok(sq) => {
                    let transition = session.click(sq);
                    let mut lines = vec![format_outcome(&transition.outcome)];
                    lines.extend(transition.frames.iter().map(format_frame));
                    (true, lines.join("\n"))
                }
                Err(e) => (false, e),
            },

            "genmove" => {
                let frames = session.play_computer_turn();
                if frames.is_empty() {
                    (true, "none".to_string())
                } else {
                    let lines: Vec<String> = frames.iter().map(format_frame).collect();
                    (true, lines.join("\n"))
                }
            }

            "moves" => match square_arg() {
                Ok(sq) => (true, format_moves(&moves_for(session.board(), sq, false))),
                Err(e) => (false, e),
            },

            "legal_moves" => (true, format_moves(&session.legal_moves())),

            "selection" => match session.selection() {
                Some(sel) => {
                    let dests: Vec<String> = sel.destinations().map(|d| d.to_string()).collect();
                    let chain = if sel.chain { " chain" } else { "" };
                    (true, format!("{}{chain}: {}", sel.square, dests.join(" ")))
                }
                None => (true, "none".to_string()),
            },

            "showboard" => (true, format!("\n{}", session.board())),

            "turn" => (true, session.turn().to_string()),

            "status" => match session.status() {
                Status::InProgress => (true, "in_progress".to_string()),
                Status::Won(side) => (true, format!("{side} wins")),
            },

            "last_move" => match session.last_move() {
                Some(mv) => (true, mv.to_string()),
                None => (true, "none".to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Ignored => "ignored".to_string(),
        Outcome::Selected(sq) => format!("selected {sq}"),
        Outcome::Deselected => "deselected".to_string(),
        Outcome::Moved {
            chain_continues: true,
            ..
        } => "moved chain".to_string(),
        Outcome::Moved { .. } => "moved".to_string(),
    }
}

fn format_frame(frame: &Frame) -> String {
    format!("{} {}", frame.side, frame.mv)
}

fn format_moves(moves: &[Move]) -> String {
    if moves.is_empty() {
        return "none".to_string();
    }
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
