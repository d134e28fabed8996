//! Constants for board geometry, AI scoring, and presentation pacing.
//!
//! The board is a fixed 8x8 grid indexed by `(row, col)` with row 0 at the
//! top. Black starts on rows 0-2 and red on rows 5-7, so red moves "up"
//! (decreasing row) and black moves "down".

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 8;

/// Number of rows each side fills at the start of the game.
pub const START_ROWS: usize = 3;

/// All four diagonal directions as `(row delta, col delta)`.
/// Order matters: generated moves follow it.
pub const DIAGONALS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Upper bound on plies for self-play before it is declared unfinished.
pub const MAX_GAME_LEN: usize = 400;

// =============================================================================
// Expert AI Scoring
// =============================================================================

/// Bonus added to a candidate that captures a piece.
pub const CAPTURE_BONUS: i32 = 10;

/// Bonus added to a candidate that moves toward the opponent's back rank.
pub const ADVANCE_BONUS: i32 = 2;

// =============================================================================
// Presentation Pacing
// =============================================================================

/// Delay between replayed jumps of a capture chain, in milliseconds.
pub const CHAIN_STEP_DELAY_MS: u64 = 900;

/// Delay before the computer starts its turn, in milliseconds.
pub const AI_THINK_DELAY_MS: u64 = 400;

// =============================================================================
// Diagram Characters
// =============================================================================

/// Empty square.
pub const EMPTY: char = '.';

/// Red man / red king.
pub const RED_MAN: char = 'r';
pub const RED_KING: char = 'R';

/// Black man / black king.
pub const BLACK_MAN: char = 'b';
pub const BLACK_KING: char = 'B';
