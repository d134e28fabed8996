//! Checkers board representation and move application.
//!
//! A [`Board`] is a small `Copy` value: every accepted move produces a new
//! board through [`Board::apply_move`] and the old one is left untouched.
//! Only dark squares (`(row + col)` odd) are ever occupied.

use std::fmt;
use std::str::FromStr;

use crate::constants::{BLACK_KING, BLACK_MAN, EMPTY, N, RED_KING, RED_MAN, START_ROWS};
use crate::error::{EngineError, EngineResult};
use crate::movegen::Move;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Red,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Row delta of a forward step: red moves toward row 0, black toward row 7.
    pub fn forward(self) -> isize {
        match self {
            Side::Red => -1,
            Side::Black => 1,
        }
    }

    /// Row on which a man of this side is crowned.
    pub fn promotion_row(self) -> usize {
        match self {
            Side::Red => 0,
            Side::Black => N - 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "red"),
            Side::Black => write!(f, "black"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub side: Side,
    pub king: bool,
}

impl Piece {
    pub fn man(side: Side) -> Self {
        Self { side, king: false }
    }

    pub fn king(side: Side) -> Self {
        Self { side, king: true }
    }

    fn symbol(self) -> char {
        match (self.side, self.king) {
            (Side::Red, false) => RED_MAN,
            (Side::Red, true) => RED_KING,
            (Side::Black, false) => BLACK_MAN,
            (Side::Black, true) => BLACK_KING,
        }
    }

    fn from_symbol(c: char) -> Option<Option<Piece>> {
        match c {
            EMPTY => Some(None),
            RED_MAN => Some(Some(Piece::man(Side::Red))),
            RED_KING => Some(Some(Piece::king(Side::Red))),
            BLACK_MAN => Some(Some(Piece::man(Side::Black))),
            BLACK_KING => Some(Some(Piece::king(Side::Black))),
            _ => None,
        }
    }
}

/// A square on the board. Construction guarantees both coordinates are in `0..8`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: usize,
    col: usize,
}

impl Square {
    pub fn new(row: usize, col: usize) -> Option<Square> {
        (row < N && col < N).then_some(Square { row, col })
    }

    #[inline]
    pub fn row(self) -> usize {
        self.row
    }

    #[inline]
    pub fn col(self) -> usize {
        self.col
    }

    /// The square `dr` rows and `dc` columns away, if it is on the board.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Square> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Square::new(row, col)
    }

    /// Dark squares are the only playable ones.
    pub fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// Iterate over all 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..N).flat_map(|row| (0..N).map(move |col| Square { row, col }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Square {
    type Err = EngineError;

    /// Parse `row,col` (whitespace around either number is allowed).
    fn from_str(s: &str) -> EngineResult<Square> {
        let invalid = || EngineError::InvalidSquare(s.to_string());
        let (r, c) = s.split_once(',').ok_or_else(invalid)?;
        let row: i64 = r.trim().parse().map_err(|_| invalid())?;
        let col: i64 = c.trim().parse().map_err(|_| invalid())?;
        usize::try_from(row)
            .ok()
            .zip(usize::try_from(col).ok())
            .and_then(|(r, c)| Square::new(r, c))
            .ok_or(EngineError::OutOfBounds { row, col })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; N]; N],
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [[None; N]; N],
        }
    }

    /// Standard setup: black on the dark squares of rows 0-2, red on rows 5-7.
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for sq in Square::all().filter(|sq| sq.is_dark()) {
            if sq.row < START_ROWS {
                board.cells[sq.row][sq.col] = Some(Piece::man(Side::Black));
            } else if sq.row >= N - START_ROWS {
                board.cells[sq.row][sq.col] = Some(Piece::man(Side::Red));
            }
        }
        board
    }

    /// Copy of this board with `sq` set to `cell`, for setting up positions.
    ///
    /// Unlike [`Board::from_diagram`] this does not check square colour.
    pub fn with_cell(&self, sq: Square, cell: Option<Piece>) -> Board {
        let mut next = *self;
        next.cells[sq.row][sq.col] = cell;
        next
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.row][sq.col]
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Produce the board after `mv`.
    ///
    /// The caller is responsible for legality. The moved piece is crowned when
    /// its destination is its promotion row, whether or not the move captured.
    pub fn apply_move(&self, mv: &Move) -> Board {
        let mut next = *self;
        let Some(piece) = next.cells[mv.from.row][mv.from.col].take() else {
            return next;
        };
        let king = piece.king || mv.to.row == piece.side.promotion_row();
        next.cells[mv.to.row][mv.to.col] = Some(Piece { king, ..piece });
        if let Some(cap) = mv.captured {
            next.cells[cap.row][cap.col] = None;
        }
        next
    }

    /// Occupied squares of `side` in row-major order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.get(sq) {
            Some(p) if p.side == side => Some((sq, p)),
            _ => None,
        })
    }

    pub fn count(&self, side: Side) -> usize {
        self.pieces(side).count()
    }

    /// Parse a diagram of 8 rows using `.`, `r`, `R`, `b` and `B`.
    ///
    /// Whitespace is ignored, so rows may be spaced out. Pieces must sit on
    /// dark squares.
    pub fn from_diagram(text: &str) -> EngineResult<Board> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|l| l.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|r| !r.is_empty())
            .collect();
        if rows.len() != N {
            return Err(EngineError::InvalidDiagram(format!(
                "expected {N} rows, got {}",
                rows.len()
            )));
        }

        let mut board = Board::empty();
        for (row, chars) in rows.iter().enumerate() {
            if chars.len() != N {
                return Err(EngineError::InvalidDiagram(format!(
                    "row {row} has {} cells, expected {N}",
                    chars.len()
                )));
            }
            for (col, &c) in chars.iter().enumerate() {
                let cell = Piece::from_symbol(c).ok_or_else(|| {
                    EngineError::InvalidDiagram(format!("unknown cell {c:?} at ({row}, {col})"))
                })?;
                if cell.is_some() && (row + col) % 2 == 0 {
                    return Err(EngineError::LightSquare { row, col });
                }
                board.cells[row][col] = cell;
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..N {
            write!(f, " {col}")?;
        }
        writeln!(f)?;
        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "{row} ")?;
            for cell in cells {
                let ch = cell.map(Piece::symbol).unwrap_or(EMPTY);
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
