// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{core::*, movegen, tracing::constants};

/// Possible errors that can arise when building a `GameState` from an arbitrary board.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("no {0} king on the board")]
    MissingKing(Color),
    #[error("more than one {0} king on the board")]
    ExtraKing(Color),
}

/// Errors produced when asking a `GameState` to play a move it does not consider legal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IllegalMoveError {
    #[error("no piece on {0}")]
    EmptySquare(Square),
    #[error("{0} is not a legal move in this position")]
    NotLegal(Move),
}

/// How a finished game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            Outcome::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// A game in progress: the board, whose turn it is, and every move played so far.
///
/// Moves are applied and taken back in place. A `GameState` remembers enough about each move it has applied that
/// `undo` restores the previous state exactly, including the en-passant target.
///
/// The checkmate and stalemate flags are computed by `legal_moves`. They describe the position at the time of the
/// last call and are cleared by `apply` and `undo`.
#[derive(Clone, Debug)]
pub struct GameState {
    /// The pieces, one (or none) per square.
    board: Board,
    /// Color whose turn it is to move.
    side_to_move: Color,
    /// Every move applied so far, oldest first.
    history: Vec<Move>,
    /// The en-passant target as it was before the corresponding entry of `history` was applied.
    en_passant_history: Vec<Option<Square>>,
    /// Cached king locations, indexed by color.
    king_squares: [Square; 2],
    /// The square passed over by the previous move, if it was a double pawn push.
    en_passant_target: Option<Square>,
    checkmate: bool,
    stalemate: bool,
}

impl GameState {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color as usize]
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Whether the side to move was checkmated as of the last call to `legal_moves`.
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Whether the side to move was stalemated as of the last call to `legal_moves`.
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    /// The result of the game as of the last call to `legal_moves`, or `None` if the game was still going.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.checkmate {
            Some(Outcome::Checkmate {
                winner: self.side_to_move.toggle(),
            })
        } else if self.stalemate {
            Some(Outcome::Stalemate)
        } else {
            None
        }
    }
}

impl GameState {
    /// A new game in the standard starting position, White to move.
    pub fn new() -> GameState {
        tracing::debug!(
            target: constants::GAME,
            event = constants::GAME_STARTED,
            "new game"
        );
        GameState {
            board: Board::starting_position(),
            side_to_move: Color::White,
            history: Vec::new(),
            en_passant_history: Vec::new(),
            king_squares: [E1, E8],
            en_passant_target: None,
            checkmate: false,
            stalemate: false,
        }
    }

    /// Starts a game from an arbitrary arrangement of pieces. Each side must have exactly one king.
    pub fn from_board(board: Board, side_to_move: Color) -> Result<GameState, PositionError> {
        let mut king_squares = [E1, E8];
        for color in colors() {
            let kings = board.kings(color);
            king_squares[color as usize] = match kings.as_slice() {
                [] => return Err(PositionError::MissingKing(color)),
                [king] => *king,
                _ => return Err(PositionError::ExtraKing(color)),
            };
        }

        Ok(GameState {
            board,
            side_to_move,
            history: Vec::new(),
            en_passant_history: Vec::new(),
            king_squares,
            en_passant_target: None,
            checkmate: false,
            stalemate: false,
        })
    }

    /// Returns whether any piece of color `by` has a pseudo-legal move onto `square`.
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        // The naive approach: generate every move the attacker has and look for one landing on the square.
        let mut moves = Vec::new();
        movegen::generate_moves(by, self, &mut moves);
        moves.iter().any(|mov| mov.destination() == square)
    }

    /// Returns whether the king of color `us` is attacked.
    pub fn is_check(&self, us: Color) -> bool {
        self.is_square_attacked(self.king_square(us), us.toggle())
    }

    /// Returns whether the side to move is in check.
    pub fn in_check(&self) -> bool {
        self.is_check(self.side_to_move)
    }

    /// Every move the side to move could make according to the movement rules of its pieces, whether or not it
    /// leaves its own king attacked.
    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        movegen::generate_moves(self.side_to_move, self, &mut moves);
        moves
    }

    /// Every legal move for the side to move, in generation order.
    ///
    /// Each pseudo-legal move is played, tested for leaving the mover's king attacked, and taken back. As a side
    /// effect this refreshes the checkmate and stalemate flags.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let moves = self.filter_legal_moves();
        let was_over = self.checkmate || self.stalemate;
        if moves.is_empty() {
            let check = self.in_check();
            self.checkmate = check;
            self.stalemate = !check;
            if !was_over {
                if let Some(outcome) = self.outcome() {
                    tracing::info!(
                        target: constants::GAME,
                        event = constants::GAME_OVER,
                        outcome = %outcome,
                        plies = self.history.len(),
                        "game over: {}",
                        outcome
                    );
                }
            }
        } else {
            self.checkmate = false;
            self.stalemate = false;
        }

        moves
    }

    /// The legal moves for the side to move, without touching the checkmate and stalemate flags.
    pub(crate) fn filter_legal_moves(&mut self) -> Vec<Move> {
        let us = self.side_to_move;
        let en_passant = self.en_passant_target;
        let mut moves = self.pseudo_legal_moves();
        moves.retain(|&mov| {
            self.make_move(mov);
            let legal = !self.is_check(us);
            self.unmake_move();
            if !legal {
                tracing::trace!(mov = %mov, "move leaves king in check");
            }
            legal
        });
        debug_assert_eq!(en_passant, self.en_passant_target);
        moves
    }

    /// Legality test for any move. The move is looked up by its squares among the legal moves and, if present, the
    /// generated move (with the generator's flags) is returned.
    fn find_legal(&mut self, mov: Move) -> Result<Move, IllegalMoveError> {
        self.legal_moves()
            .into_iter()
            .find(|&legal| legal == mov)
            .ok_or(IllegalMoveError::NotLegal(mov))
    }

    /// Applies `mov` if it is legal in this position, leaving the game untouched otherwise.
    pub fn try_apply(&mut self, mov: Move) -> Result<(), IllegalMoveError> {
        let legal = self.find_legal(mov)?;
        self.apply(legal);
        Ok(())
    }

    /// Plays the piece on `source` to `destination` if that is a legal move, returning the move that was applied.
    pub fn play(&mut self, source: Square, destination: Square) -> Result<Move, IllegalMoveError> {
        let candidate = Move::from_board(source, destination, &self.board)
            .ok_or(IllegalMoveError::EmptySquare(source))?;
        let legal = self.find_legal(candidate)?;
        self.apply(legal);
        Ok(legal)
    }
}

//
// Apply and undo, and associated state update functions.
//

impl GameState {
    /// Applies a move to the game, updating all internal state to reflect the effects of the move.
    ///
    /// The move is trusted: it is not checked for legality, and the piece it records as moving is assumed to be on
    /// its source square. Use `try_apply` for moves that have not come out of `legal_moves`.
    pub fn apply(&mut self, mov: Move) {
        let side = self.side_to_move;
        self.make_move(mov);
        self.checkmate = false;
        self.stalemate = false;
        tracing::debug!(
            target: constants::GAME,
            event = constants::MOVE_APPLIED,
            notation = %mov,
            side = %side,
            "applied {}",
            mov
        );
    }

    /// Takes back the most recently applied move. Does nothing if no moves have been applied.
    pub fn undo(&mut self) {
        let mov = match self.history.last() {
            Some(&mov) => mov,
            None => return,
        };

        self.unmake_move();
        self.checkmate = false;
        self.stalemate = false;
        tracing::debug!(
            target: constants::GAME,
            event = constants::MOVE_UNDONE,
            notation = %mov,
            side = %self.side_to_move,
            "undid {}",
            mov
        );
    }

    pub(crate) fn make_move(&mut self, mov: Move) {
        let moving_piece = mov.moved();
        self.board.set(mov.source(), None);
        self.board.set(mov.destination(), Some(moving_piece));
        self.history.push(mov);
        self.en_passant_history.push(self.en_passant_target);
        self.side_to_move = self.side_to_move.toggle();
        if moving_piece.kind == PieceKind::King {
            self.king_squares[moving_piece.color as usize] = mov.destination();
        }

        if mov.is_promotion() {
            self.board.set(
                mov.destination(),
                Some(Piece::new(moving_piece.color, PieceKind::Queen)),
            );
        }

        if mov.is_en_passant() {
            // The captured pawn sits beside the destination square, not on it.
            self.board.set(mov.en_passant_square(), None);
        }

        self.en_passant_target = if mov.is_double_pawn_push() {
            let passed_row = (mov.source().row() + mov.destination().row()) / 2;
            Some(Square::of(passed_row, mov.source().col()))
        } else {
            None
        };
    }

    pub(crate) fn unmake_move(&mut self) {
        let mov = match self.history.pop() {
            Some(mov) => mov,
            None => return,
        };

        let moving_piece = mov.moved();
        self.board.set(mov.source(), Some(moving_piece));
        if mov.is_en_passant() {
            self.board.set(mov.destination(), None);
            self.board.set(mov.en_passant_square(), mov.captured());
        } else {
            self.board.set(mov.destination(), mov.captured());
        }

        self.side_to_move = self.side_to_move.toggle();
        if moving_piece.kind == PieceKind::King {
            self.king_squares[moving_piece.color as usize] = mov.source();
        }

        self.en_passant_target = self.en_passant_history.pop().flatten();
        debug_assert!(!mov.is_en_passant() || self.en_passant_target == Some(mov.destination()));
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(f, "{} to move", self.side_to_move)
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}
