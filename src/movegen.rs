//! Per-piece move generation.
//!
//! Men step one square diagonally forward and jump an adjacent enemy piece
//! onto the empty square behind it. While continuing a capture chain a man may
//! also jump backward. Kings slide any distance along the four diagonals and
//! capture the first enemy piece they meet, landing on any empty square past it.
//!
//! Generation does not apply the mandatory-capture rule; simple moves and
//! captures are returned together and filtered by the caller.

use std::fmt;

use crate::board::{Board, Piece, Side, Square};
use crate::constants::DIAGONALS;

/// A single step: one piece from `from` to `to`, optionally removing the
/// piece on `captured`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub captured: Option<Square>,
}

impl Move {
    pub fn simple(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            captured: None,
        }
    }

    pub fn capture(from: Square, to: Square, captured: Square) -> Self {
        Self {
            from,
            to,
            captured: Some(captured),
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.captured {
            Some(cap) => write!(f, "{} x {} -> {}", self.from, cap, self.to),
            None => write!(f, "{} -> {}", self.from, self.to),
        }
    }
}

/// The two forward diagonals for a man of `side`.
fn forward_diagonals(side: Side) -> [(isize, isize); 2] {
    let dr = side.forward();
    [(dr, -1), (dr, 1)]
}

/// Generate the moves of the piece on `sq`.
///
/// `in_chain` is set when the piece has just captured and is looking for a
/// follow-up jump; men may then capture in all four directions. An empty
/// square yields no moves.
pub fn moves_for(board: &Board, sq: Square, in_chain: bool) -> Vec<Move> {
    let Some(piece) = board.get(sq) else {
        return Vec::new();
    };
    let mut moves = Vec::new();
    if piece.king {
        king_moves(board, sq, piece, &mut moves);
    } else {
        man_moves(board, sq, piece, in_chain, &mut moves);
    }
    moves
}

fn man_moves(board: &Board, sq: Square, piece: Piece, in_chain: bool, out: &mut Vec<Move>) {
    let forward = forward_diagonals(piece.side);

    for (dr, dc) in forward {
        if let Some(to) = sq.offset(dr, dc).filter(|&t| board.is_empty(t)) {
            out.push(Move::simple(sq, to));
        }
    }

    let capture_dirs: &[(isize, isize)] = if in_chain { &DIAGONALS } else { &forward };
    for &(dr, dc) in capture_dirs {
        let Some(over) = sq.offset(dr, dc) else {
            continue;
        };
        let is_enemy = board.get(over).is_some_and(|p| p.side != piece.side);
        if !is_enemy {
            continue;
        }
        if let Some(to) = over.offset(dr, dc).filter(|&t| board.is_empty(t)) {
            out.push(Move::capture(sq, to, over));
        }
    }
}

fn king_moves(board: &Board, sq: Square, piece: Piece, out: &mut Vec<Move>) {
    for (dr, dc) in DIAGONALS {
        // Slide over empty squares
        let mut cur = sq.offset(dr, dc);
        while let Some(to) = cur.filter(|&t| board.is_empty(t)) {
            out.push(Move::simple(sq, to));
            cur = to.offset(dr, dc);
        }

        // First occupied square on this diagonal, if any
        let Some(blocker) = cur else {
            continue;
        };
        if board.get(blocker).is_some_and(|p| p.side == piece.side) {
            continue;
        }

        let mut land = blocker.offset(dr, dc);
        while let Some(to) = land.filter(|&t| board.is_empty(t)) {
            out.push(Move::capture(sq, to, blocker));
            land = to.offset(dr, dc);
        }
    }
}

/// All moves for every piece of `side`, in row-major order of the pieces.
pub fn side_moves(board: &Board, side: Side) -> Vec<Move> {
    board
        .pieces(side)
        .flat_map(|(sq, _)| moves_for(board, sq, false))
        .collect()
}

/// Whether any piece of `side` can capture (outside of a chain).
pub fn has_capture(board: &Board, side: Side) -> bool {
    board
        .pieces(side)
        .any(|(sq, _)| moves_for(board, sq, false).iter().any(Move::is_capture))
}

/// Follow-up captures for the piece that just landed on `sq`.
pub fn continuation_captures(board: &Board, sq: Square) -> Vec<Move> {
    moves_for(board, sq, true)
        .into_iter()
        .filter(Move::is_capture)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    fn destinations(moves: &[Move]) -> Vec<Square> {
        moves.iter().map(|m| m.to).collect()
    }

    #[test]
    fn test_empty_square_has_no_moves() {
        let board = Board::initial();
        assert!(moves_for(&board, sq(4, 1), false).is_empty());
    }

    #[test]
    fn test_red_man_opening_moves() {
        let board = Board::initial();
        let moves = moves_for(&board, sq(5, 2), false);
        assert_eq!(destinations(&moves), vec![sq(4, 1), sq(4, 3)]);
        assert!(moves.iter().all(|m| !m.is_capture()));
    }

    #[test]
    fn test_black_man_moves_down() {
        let board = Board::initial();
        let moves = moves_for(&board, sq(2, 1), false);
        assert_eq!(destinations(&moves), vec![sq(3, 0), sq(3, 2)]);
    }

    #[test]
    fn test_back_row_blocked() {
        let board = Board::initial();
        assert!(moves_for(&board, sq(7, 0), false).is_empty());
    }

    #[test]
    fn test_man_mixes_simple_and_capture() {
        let board = Board::from_diagram(
            "
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . b . . .
            . . . r . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            ",
        )
        .unwrap();
        let moves = moves_for(&board, sq(4, 3), false);
        assert_eq!(
            moves,
            vec![
                Move::simple(sq(4, 3), sq(3, 2)),
                Move::capture(sq(4, 3), sq(2, 5), sq(3, 4)),
            ]
        );
    }

    #[test]
    fn test_backward_capture_only_in_chain() {
        let board = Board::from_diagram(
            "
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . r . . . . .
            . . . b . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            ",
        )
        .unwrap();
        let normal = moves_for(&board, sq(3, 2), false);
        assert!(normal.iter().all(|m| !m.is_capture()));

        let chained = continuation_captures(&board, sq(3, 2));
        assert_eq!(chained, vec![Move::capture(sq(3, 2), sq(5, 4), sq(4, 3))]);
    }

    #[test]
    fn test_capture_blocked_by_occupied_landing() {
        let board = Board::from_diagram(
            "
            . . . . . . . .
            . . . . . . . .
            . . . . . b . .
            . . . . b . . .
            . . . r . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            ",
        )
        .unwrap();
        assert!(!has_capture(&board, Side::Red));
    }

    #[test]
    fn test_friendly_piece_not_captured() {
        let board = Board::from_diagram(
            "
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . r . . .
            . . . r . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            ",
        )
        .unwrap();
        let moves = moves_for(&board, sq(4, 3), false);
        assert_eq!(destinations(&moves), vec![sq(3, 2)]);
    }

    #[test]
    fn test_king_stops_at_friend() {
        let board = Board::from_diagram(
            "
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . r . . . . . .
            R . . . . . . .
            ",
        )
        .unwrap();
        assert!(moves_for(&board, sq(7, 0), false).is_empty());
    }

    #[test]
    fn test_king_capture_lands_beyond_enemy() {
        let board = Board::from_diagram(
            "
            . . . . . . . .
            . . . . . . . .
            . . . . . b . .
            . . . . . . . .
            . . . b . . . .
            . . . . . . . .
            . R . . . . . .
            . . . . . . . .
            ",
        )
        .unwrap();
        let captures: Vec<Move> = moves_for(&board, sq(6, 1), false)
            .into_iter()
            .filter(Move::is_capture)
            .collect();
        // Jumps (4,3), lands on (3,4); (2,5) is occupied so the run stops there
        assert_eq!(captures, vec![Move::capture(sq(6, 1), sq(3, 4), sq(4, 3))]);
    }

    #[test]
    fn test_side_moves_row_major() {
        let board = Board::initial();
        let moves = side_moves(&board, Side::Red);
        // Only row 5 can move: 4 pieces, 7 moves (edge piece has one)
        assert_eq!(moves.len(), 7);
        assert_eq!(moves[0].from, sq(5, 0));
        assert!(moves.windows(2).all(|w| w[0].from <= w[1].from));
    }
}
