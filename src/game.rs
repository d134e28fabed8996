//! Game session: turn order, selection, mandatory capture and the AI hand-off.
//!
//! A [`GameSession`] owns everything a front end needs to draw the game: the
//! board, whose turn it is, the current selection with its legal
//! destinations, the last move, and whether the game is over. Its only input
//! is [`GameSession::click`], which runs one transition of the state machine
//! and returns a [`Transition`] describing what happened.
//!
//! Selection states:
//!
//! - **Idle**: clicking a piece of the side to move selects it if it has a
//!   legal move. When any piece of that side can capture, only captures are
//!   legal.
//! - **Selected**: clicking the selected square deselects it, clicking a legal
//!   destination plays the move, clicking another own piece reselects, and any
//!   other click returns to Idle.
//! - **Chain** (Selected after a capture with follow-up captures available):
//!   the selection holds only the follow-up captures and behaves like any
//!   other selection. The turn does not pass until the chain is finished.
//!
//! In a game against the computer the human plays red. When the turn passes to
//! black the computer's whole turn, capture chain included, is resolved inside
//! the same `click` and reported as extra frames.

use std::fmt;

use tracing::{debug, info};

use crate::ai::{self, Difficulty};
use crate::board::{Board, Side, Square};
use crate::error::{EngineError, EngineResult};
use crate::movegen::{Move, continuation_captures, has_capture, moves_for, side_moves};

/// Side played by the human in a game against the computer.
pub const HUMAN_SIDE: Side = Side::Red;

/// Who controls the two sides.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Human (red) against the computer (black).
    VsAi { difficulty: Difficulty },
    /// Two humans sharing the board.
    VsFriend,
}

impl Mode {
    /// Parse a mode name (`ai` or `friend`) with an optional difficulty.
    ///
    /// A game against the computer without a difficulty defaults to easy.
    pub fn parse(mode: &str, difficulty: Option<&str>) -> EngineResult<Mode> {
        match mode.to_ascii_lowercase().as_str() {
            "ai" => {
                let difficulty = difficulty
                    .map(str::parse::<Difficulty>)
                    .transpose()?
                    .unwrap_or_default();
                Ok(Mode::VsAi { difficulty })
            }
            "friend" => Ok(Mode::VsFriend),
            _ => Err(EngineError::UnknownMode(mode.to_string())),
        }
    }

    /// The side the computer plays, if any.
    pub fn ai_side(self) -> Option<Side> {
        match self {
            Mode::VsAi { .. } => Some(HUMAN_SIDE.opponent()),
            Mode::VsFriend => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::VsAi { difficulty } => write!(f, "ai {difficulty}"),
            Mode::VsFriend => write!(f, "friend"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    InProgress,
    /// The given side won because its opponent had no legal move on its turn.
    Won(Side),
}

/// A selected piece and the moves it may legally make.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub square: Square,
    pub moves: Vec<Move>,
    /// Set while the piece is in the middle of a capture chain.
    pub chain: bool,
}

impl Selection {
    pub fn destinations(&self) -> impl Iterator<Item = Square> + '_ {
        self.moves.iter().map(|m| m.to)
    }

    fn find(&self, to: Square) -> Option<Move> {
        self.moves.iter().find(|m| m.to == to).copied()
    }
}

/// What a click did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed.
    Ignored,
    /// A piece was selected (or reselected).
    Selected(Square),
    /// The selection was cleared.
    Deselected,
    /// A human move was played. `chain_continues` is set when the same piece
    /// must capture again before the turn passes.
    Moved { mv: Move, chain_continues: bool },
}

/// One applied move and the board it produced, for replay by a front end.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub side: Side,
    pub mv: Move,
    pub board: Board,
}

/// Result of a single click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub outcome: Outcome,
    /// Every board produced by this click, in order. Includes the computer's
    /// reply when the click handed the turn to it.
    pub frames: Vec<Frame>,
}

impl Transition {
    fn only(outcome: Outcome) -> Self {
        Self {
            outcome,
            frames: Vec::new(),
        }
    }
}

/// A single game of checkers.
#[derive(Clone, Debug)]
pub struct GameSession {
    mode: Mode,
    board: Board,
    turn: Side,
    selection: Option<Selection>,
    last_move: Option<Move>,
    status: Status,
    rng: fastrand::Rng,
}

impl GameSession {
    pub fn new(mode: Mode) -> Self {
        Self::with_rng(mode, fastrand::Rng::new())
    }

    /// Create a session whose computer moves are reproducible.
    pub fn with_seed(mode: Mode, seed: u64) -> Self {
        Self::with_rng(mode, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(mode: Mode, rng: fastrand::Rng) -> Self {
        info!(%mode, "starting game");
        Self {
            mode,
            board: Board::initial(),
            turn: Side::Red,
            selection: None,
            last_move: None,
            status: Status::InProgress,
            rng,
        }
    }

    /// Start a session from an arbitrary position. Used to set up puzzles and
    /// tests; the status is evaluated immediately.
    pub fn from_position(mode: Mode, board: Board, turn: Side, seed: u64) -> Self {
        let mut session = Self::with_seed(mode, seed);
        session.board = board;
        session.turn = turn;
        session.update_status();
        session
    }

    /// Start over with the same mode.
    pub fn reset(&mut self) {
        info!(mode = %self.mode, "new game");
        self.board = Board::initial();
        self.turn = Side::Red;
        self.selection = None;
        self.last_move = None;
        self.status = Status::InProgress;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the side to move is forced to capture.
    pub fn must_capture(&self) -> bool {
        has_capture(&self.board, self.turn)
    }

    /// All legal moves for the side to move, after the mandatory-capture filter.
    pub fn legal_moves(&self) -> Vec<Move> {
        let moves = side_moves(&self.board, self.turn);
        if moves.iter().any(Move::is_capture) {
            moves.into_iter().filter(Move::is_capture).collect()
        } else {
            moves
        }
    }

    fn is_human_turn(&self) -> bool {
        self.mode.ai_side() != Some(self.turn)
    }

    /// Handle a click on `sq`.
    pub fn click(&mut self, sq: Square) -> Transition {
        if self.status != Status::InProgress || !self.is_human_turn() {
            return Transition::only(Outcome::Ignored);
        }

        let Some(sel) = self.selection.take() else {
            return match self.selectable(sq) {
                Some(sel) => self.select(sel),
                None => Transition::only(Outcome::Ignored),
            };
        };

        if let Some(mv) = sel.find(sq) {
            return self.play_human(mv);
        }
        if sq == sel.square {
            debug!(square = %sq, "deselected");
            return Transition::only(Outcome::Deselected);
        }
        if self.board.get(sq).is_some_and(|p| p.side == self.turn) {
            return match self.selectable(sq) {
                Some(next) => self.select(next),
                None => {
                    self.selection = Some(sel);
                    Transition::only(Outcome::Ignored)
                }
            };
        }
        debug!(square = %sq, "selection cleared");
        Transition::only(Outcome::Deselected)
    }

    /// Legal moves for the piece on `sq`, if it belongs to the side to move
    /// and has any.
    fn selectable(&self, sq: Square) -> Option<Selection> {
        let piece = self.board.get(sq)?;
        if piece.side != self.turn {
            return None;
        }
        let mut moves = moves_for(&self.board, sq, false);
        if self.must_capture() {
            moves.retain(Move::is_capture);
        }
        (!moves.is_empty()).then_some(Selection {
            square: sq,
            moves,
            chain: false,
        })
    }

    fn select(&mut self, sel: Selection) -> Transition {
        let square = sel.square;
        debug!(square = %square, moves = sel.moves.len(), "selected");
        self.selection = Some(sel);
        Transition::only(Outcome::Selected(square))
    }

    fn apply(&mut self, mv: Move) -> Frame {
        self.board = self.board.apply_move(&mv);
        self.last_move = Some(mv);
        info!(side = %self.turn, %mv, "move played");
        Frame {
            side: self.turn,
            mv,
            board: self.board,
        }
    }

    fn play_human(&mut self, mv: Move) -> Transition {
        let mut frames = vec![self.apply(mv)];

        if mv.is_capture() {
            let further = continuation_captures(&self.board, mv.to);
            if !further.is_empty() {
                debug!(square = %mv.to, captures = further.len(), "capture chain continues");
                self.selection = Some(Selection {
                    square: mv.to,
                    moves: further,
                    chain: true,
                });
                return Transition {
                    outcome: Outcome::Moved {
                        mv,
                        chain_continues: true,
                    },
                    frames,
                };
            }
        }

        self.end_turn();
        if self.status == Status::InProgress && !self.is_human_turn() {
            frames.extend(self.play_ai());
        }
        Transition {
            outcome: Outcome::Moved {
                mv,
                chain_continues: false,
            },
            frames,
        }
    }

    /// Let the computer move if it is its turn.
    ///
    /// Clicks already do this when they hand the turn over; this is for
    /// sessions set up with the computer to move.
    pub fn play_computer_turn(&mut self) -> Vec<Frame> {
        if self.status != Status::InProgress || self.is_human_turn() {
            return Vec::new();
        }
        self.play_ai()
    }

    /// Resolve the computer's whole turn and hand the move back.
    fn play_ai(&mut self) -> Vec<Frame> {
        let Mode::VsAi { difficulty } = self.mode else {
            return Vec::new();
        };
        let side = self.turn;
        let Some(turn) = ai::play_turn(&self.board, side, difficulty, &mut self.rng) else {
            // Unreachable while update_status runs on every turn change
            self.status = Status::Won(side.opponent());
            return Vec::new();
        };

        let frames = turn
            .moves
            .iter()
            .zip(&turn.boards)
            .map(|(&mv, &board)| Frame { side, mv, board })
            .collect::<Vec<_>>();
        for frame in &frames {
            info!(%side, mv = %frame.mv, %difficulty, "computer move");
        }
        if let Some(last) = frames.last() {
            self.board = last.board;
            self.last_move = Some(last.mv);
        }
        self.end_turn();
        frames
    }

    fn end_turn(&mut self) {
        self.selection = None;
        self.turn = self.turn.opponent();
        self.update_status();
    }

    fn update_status(&mut self) {
        if side_moves(&self.board, self.turn).is_empty() {
            let winner = self.turn.opponent();
            info!(%winner, "game over");
            self.status = Status::Won(winner);
        } else {
            self.status = Status::InProgress;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    fn friend_game() -> GameSession {
        GameSession::with_seed(Mode::VsFriend, 42)
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("friend", None), Ok(Mode::VsFriend));
        assert_eq!(
            Mode::parse("ai", None),
            Ok(Mode::VsAi {
                difficulty: Difficulty::Easy
            })
        );
        assert_eq!(
            Mode::parse("AI", Some("expert")),
            Ok(Mode::VsAi {
                difficulty: Difficulty::Expert
            })
        );
        assert!(Mode::parse("online", None).is_err());
        assert!(Mode::parse("ai", Some("godlike")).is_err());
    }

    #[test]
    fn test_new_session_state() {
        let game = friend_game();
        assert_eq!(game.turn(), Side::Red);
        assert_eq!(game.status(), Status::InProgress);
        assert!(game.selection().is_none());
        assert!(game.last_move().is_none());
        assert_eq!(*game.board(), Board::initial());
    }

    #[test]
    fn test_click_empty_square_ignored() {
        let mut game = friend_game();
        assert_eq!(game.click(sq(4, 1)).outcome, Outcome::Ignored);
        assert!(game.selection().is_none());
    }

    #[test]
    fn test_click_opponent_piece_ignored() {
        let mut game = friend_game();
        assert_eq!(game.click(sq(2, 1)).outcome, Outcome::Ignored);

        // Nobody is the computer in a friend game
        assert!(game.play_computer_turn().is_empty());
        assert_eq!(game.turn(), Side::Red);
    }

    #[test]
    fn test_click_blocked_piece_ignored() {
        let mut game = friend_game();
        assert_eq!(game.click(sq(7, 0)).outcome, Outcome::Ignored);
    }

    #[test]
    fn test_select_and_deselect() {
        let mut game = friend_game();
        assert_eq!(game.click(sq(5, 2)).outcome, Outcome::Selected(sq(5, 2)));
        let dests: Vec<Square> = game.selection().unwrap().destinations().collect();
        assert_eq!(dests, vec![sq(4, 1), sq(4, 3)]);
        assert_eq!(game.click(sq(5, 2)).outcome, Outcome::Deselected);
        assert!(game.selection().is_none());
    }

    #[test]
    fn test_reselect_other_piece() {
        let mut game = friend_game();
        game.click(sq(5, 2));
        assert_eq!(game.click(sq(5, 4)).outcome, Outcome::Selected(sq(5, 4)));
        assert_eq!(game.selection().unwrap().square, sq(5, 4));
    }

    #[test]
    fn test_reselect_blocked_piece_keeps_selection() {
        let mut game = friend_game();
        game.click(sq(5, 2));
        assert_eq!(game.click(sq(6, 1)).outcome, Outcome::Ignored);
        assert_eq!(game.selection().unwrap().square, sq(5, 2));
    }

    #[test]
    fn test_click_elsewhere_clears_selection() {
        let mut game = friend_game();
        game.click(sq(5, 2));
        assert_eq!(game.click(sq(3, 0)).outcome, Outcome::Deselected);
        assert!(game.selection().is_none());
    }

    #[test]
    fn test_simple_move_switches_turn() {
        let mut game = friend_game();
        game.click(sq(5, 2));
        let t = game.click(sq(4, 3));
        assert_eq!(
            t.outcome,
            Outcome::Moved {
                mv: Move::simple(sq(5, 2), sq(4, 3)),
                chain_continues: false
            }
        );
        assert_eq!(t.frames.len(), 1);
        assert_eq!(game.turn(), Side::Black);
        assert!(game.selection().is_none());
        assert_eq!(game.last_move(), Some(Move::simple(sq(5, 2), sq(4, 3))));
        assert_eq!(game.board().get(sq(4, 3)), Some(Piece::man(Side::Red)));
    }

    #[test]
    fn test_chain_selection_can_be_dropped_and_retaken() {
        let board = Board::from_diagram(
            "
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . b . . .
            . . . . . . . .
            . . . . b . . .
            . . . r . . . .
            . . . . . . r .
            ",
        )
        .unwrap();
        let mut game = GameSession::from_position(Mode::VsFriend, board, Side::Red, 1);
        assert!(game.must_capture());

        game.click(sq(6, 3));
        let t = game.click(sq(4, 5));
        assert_eq!(
            t.outcome,
            Outcome::Moved {
                mv: Move::capture(sq(6, 3), sq(4, 5), sq(5, 4)),
                chain_continues: true
            }
        );
        assert_eq!(game.turn(), Side::Red);
        let sel = game.selection().unwrap();
        assert!(sel.chain);
        assert_eq!(sel.square, sq(4, 5));

        // Dropping the chain selection keeps the turn with red
        assert_eq!(game.click(sq(4, 5)).outcome, Outcome::Deselected);
        assert!(game.selection().is_none());
        assert_eq!(game.turn(), Side::Red);

        // Red must still capture, so the quiet piece cannot be picked up
        assert!(game.must_capture());
        assert_eq!(game.click(sq(7, 6)).outcome, Outcome::Ignored);
        assert!(game.selection().is_none());

        assert_eq!(game.click(sq(4, 5)).outcome, Outcome::Selected(sq(4, 5)));
        let sel = game.selection().unwrap();
        assert!(!sel.chain);
        assert_eq!(sel.destinations().collect::<Vec<_>>(), vec![sq(2, 3)]);

        let t = game.click(sq(2, 3));
        assert_eq!(
            t.outcome,
            Outcome::Moved {
                mv: Move::capture(sq(4, 5), sq(2, 3), sq(3, 4)),
                chain_continues: false
            }
        );
        assert_eq!(game.board().count(Side::Black), 0);
        assert_eq!(game.status(), Status::Won(Side::Red));
    }

    #[test]
    fn test_no_clicks_after_game_over() {
        let board = Board::from_diagram(
            "
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            r . . . . . . .
            ",
        )
        .unwrap();
        let mut game = GameSession::from_position(Mode::VsFriend, board, Side::Black, 1);
        assert_eq!(game.status(), Status::Won(Side::Red));
        assert_eq!(game.click(sq(7, 0)).outcome, Outcome::Ignored);
    }

    #[test]
    fn test_ai_replies_in_same_click() {
        let mut game = GameSession::with_seed(
            Mode::VsAi {
                difficulty: Difficulty::Medium,
            },
            9,
        );
        game.click(sq(5, 2));
        let t = game.click(sq(4, 3));
        assert!(t.frames.len() >= 2);
        assert_eq!(t.frames[0].side, Side::Red);
        assert!(t.frames[1..].iter().all(|f| f.side == Side::Black));
        assert_eq!(game.turn(), Side::Red);
        assert_eq!(game.board(), &t.frames.last().unwrap().board);
    }

    #[test]
    fn test_clicks_ignored_on_ai_turn() {
        let board = Board::initial();
        let mut game = GameSession::from_position(
            Mode::VsAi {
                difficulty: Difficulty::Easy,
            },
            board,
            Side::Black,
            5,
        );
        assert_eq!(game.click(sq(2, 1)).outcome, Outcome::Ignored);

        let frames = game.play_computer_turn();
        assert!(!frames.is_empty());
        assert_eq!(game.turn(), Side::Red);
        assert!(game.play_computer_turn().is_empty());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut game = friend_game();
        game.click(sq(5, 2));
        game.click(sq(4, 3));
        game.reset();
        assert_eq!(*game.board(), Board::initial());
        assert_eq!(game.turn(), Side::Red);
        assert!(game.last_move().is_none());
        assert_eq!(game.mode(), Mode::VsFriend);
    }
}
