//! Computer opponent move selection.
//!
//! Three difficulty tiers share one enumeration of candidate moves (every own
//! piece, non-chain context) and differ only in how they pick:
//!
//! - **Easy**: uniform random over all candidates.
//! - **Medium**: uniform random over captures if there are any, otherwise over
//!   all candidates.
//! - **Expert**: one-ply greedy search. Each candidate is applied to a scratch
//!   board and scored by material balance, plus [`CAPTURE_BONUS`] for captures
//!   and [`ADVANCE_BONUS`] for moves toward the opponent's back rank. The first
//!   best-scoring candidate wins.
//!
//! After a capture the same rule picks among the piece's follow-up captures
//! until none remain, so [`play_turn`] always returns a complete turn.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use tracing::trace;

use crate::board::{Board, Side};
use crate::constants::{ADVANCE_BONUS, CAPTURE_BONUS};
use crate::error::{EngineError, EngineResult};
use crate::movegen::{Move, continuation_captures, side_moves};

/// AI strength tier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Expert,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(EngineError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// A full computer turn: every jump in order, with the board after each one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiTurn {
    pub moves: Vec<Move>,
    pub boards: Vec<Board>,
}

impl AiTurn {
    /// Board after the last step of the turn.
    pub fn final_board(&self) -> Option<&Board> {
        self.boards.last()
    }
}

/// Material balance from `side`'s point of view. Kings count as one piece.
pub fn evaluate(board: &Board, side: Side) -> i32 {
    board.count(side) as i32 - board.count(side.opponent()) as i32
}

/// Whether `mv` brings the piece closer to the opponent's back rank.
fn advances(mv: &Move, side: Side) -> bool {
    let (from, to) = (mv.from.row() as isize, mv.to.row() as isize);
    (to - from) * side.forward() > 0
}

/// Expert score of playing `mv` for `side` on `board`.
pub fn score_move(board: &Board, side: Side, mv: &Move) -> i32 {
    let next = board.apply_move(mv);
    let mut score = evaluate(&next, side);
    if mv.is_capture() {
        score += CAPTURE_BONUS;
    }
    if advances(mv, side) {
        score += ADVANCE_BONUS;
    }
    score
}

fn pick_random(candidates: &[Move], rng: &mut fastrand::Rng) -> Option<Move> {
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.usize(..candidates.len())])
}

fn pick_best(board: &Board, side: Side, candidates: &[Move]) -> Option<Move> {
    let mut best: Option<(i32, Move)> = None;
    for mv in candidates {
        let score = score_move(board, side, mv);
        trace!(%mv, score, "expert candidate");
        // Strict comparison keeps the first candidate on ties
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, *mv));
        }
    }
    best.map(|(_, mv)| mv)
}

/// Pick one of `candidates` for `side` according to `difficulty`.
///
/// Returns `None` only when `candidates` is empty.
pub fn choose_move(
    board: &Board,
    side: Side,
    difficulty: Difficulty,
    candidates: &[Move],
    rng: &mut fastrand::Rng,
) -> Option<Move> {
    match difficulty {
        Difficulty::Easy => pick_random(candidates, rng),
        Difficulty::Medium => {
            let captures: Vec<Move> = candidates.iter().copied().filter(Move::is_capture).collect();
            if captures.is_empty() {
                pick_random(candidates, rng)
            } else {
                pick_random(&captures, rng)
            }
        }
        Difficulty::Expert => pick_best(board, side, candidates),
    }
}

/// Play a complete turn for `side`, following capture chains to the end.
///
/// Returns `None` when `side` has no move at all.
pub fn play_turn(
    board: &Board,
    side: Side,
    difficulty: Difficulty,
    rng: &mut fastrand::Rng,
) -> Option<AiTurn> {
    let candidates = side_moves(board, side);
    let mut mv = choose_move(board, side, difficulty, &candidates, rng)?;
    let mut current = *board;
    let mut turn = AiTurn {
        moves: Vec::new(),
        boards: Vec::new(),
    };

    loop {
        current = current.apply_move(&mv);
        turn.moves.push(mv);
        turn.boards.push(current);

        if !mv.is_capture() {
            break;
        }
        let further = continuation_captures(&current, mv.to);
        match choose_move(&current, side, difficulty, &further, rng) {
            Some(next) => mv = next,
            None => break,
        }
    }

    Some(turn)
}
