// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use bitflags::bitflags;

use crate::core::*;

bitflags! {
    /// Special-move markers carried by a `Move`.
    pub struct MoveFlags: u8 {
        const NONE = 0;
        const PROMOTION = 0b0000_0001;
        const EN_PASSANT = 0b0000_0010;
    }
}

/// A single ply: a piece moving from one square to another.
///
/// Besides the two squares, a move records the piece that moved, the piece it captured (if
/// any) and whether it promotes or captures en passant. Those extra fields are what let a
/// `GameState` take the move back again.
///
/// ## Identity
/// Two moves are equal when their source and destination squares are equal. The moved
/// piece, the captured piece and the flags do not take part in comparison or hashing. This
/// is what allows a move built from two clicked squares (see `Move::from_board`) to be found
/// in a list of generated moves, but it also means that two structurally different moves
/// between the same squares compare equal.
#[derive(Copy, Clone)]
pub struct Move {
    source: Square,
    destination: Square,
    moved: Piece,
    captured: Option<Piece>,
    flags: MoveFlags,
}

impl Move {
    /// Constructs a move of `moved` from the source square to the destination square,
    /// capturing `captured`. Pawn moves onto the far row are marked as promotions.
    pub fn new(source: Square, destination: Square, moved: Piece, captured: Option<Piece>) -> Move {
        let mut flags = MoveFlags::NONE;
        if moved.kind == PieceKind::Pawn && destination.row() == moved.color.promotion_row() {
            flags |= MoveFlags::PROMOTION;
        }

        Move {
            source,
            destination,
            moved,
            captured,
            flags,
        }
    }

    /// Constructs an en passant capture by the pawn `moved`. The captured pawn is not on the
    /// destination square; see `Move::en_passant_square`.
    pub fn en_passant(source: Square, destination: Square, moved: Piece) -> Move {
        let captured = Piece::new(moved.color.toggle(), PieceKind::Pawn);
        let mut mov = Move::new(source, destination, moved, Some(captured));
        mov.flags |= MoveFlags::EN_PASSANT;
        mov
    }

    /// Translates a pair of externally supplied squares into a move, reading the moving and
    /// captured pieces off of `board`. Returns `None` if there is no piece on the source
    /// square.
    ///
    /// The resulting move is only a candidate: it never carries the en passant flag and is
    /// not checked for legality. Look it up in `GameState::legal_moves` (or use
    /// `GameState::try_apply`) to obtain the move as the generator produced it.
    pub fn from_board(source: Square, destination: Square, board: &Board) -> Option<Move> {
        let moved = board.piece_at(source)?;
        Some(Move::new(
            source,
            destination,
            moved,
            board.piece_at(destination),
        ))
    }

    /// Returns the source square of this move.
    pub fn source(self) -> Square {
        self.source
    }

    /// Returns the destination square of this move.
    pub fn destination(self) -> Square {
        self.destination
    }

    /// Returns the piece that moved.
    pub fn moved(self) -> Piece {
        self.moved
    }

    /// Returns the piece captured by this move, if any.
    pub fn captured(self) -> Option<Piece> {
        self.captured
    }

    /// Returns the special-move markers of this move.
    pub fn flags(self) -> MoveFlags {
        self.flags
    }

    /// Returns whether or not this move is a capture move.
    pub fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    /// Returns whether or not this move is a promotion.
    pub fn is_promotion(self) -> bool {
        self.flags.contains(MoveFlags::PROMOTION)
    }

    /// Returns whether or not this move is an en passant move.
    pub fn is_en_passant(self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    /// Returns whether or not this move is a double pawn push.
    pub fn is_double_pawn_push(self) -> bool {
        self.moved.kind == PieceKind::Pawn
            && (self.source.row() as i8 - self.destination.row() as i8).abs() == 2
    }

    /// The square holding the pawn captured by an en passant move: beside the destination,
    /// on the row the capturing pawn started from.
    pub fn en_passant_square(self) -> Square {
        Square::of(self.source.row(), self.destination.col())
    }

    /// Returns the notation for this move: the source square followed by the destination
    /// square, e.g. `e2e4`. No capture, check or promotion markers are added.
    pub fn notation(self) -> String {
        let mut buf = self.source.to_string();
        buf.push_str(&self.destination.to_string());
        buf
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Move) -> bool {
        self.source == other.source && self.destination == other.destination
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.destination.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.notation())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} ({}", self.notation(), self.moved)?;
        if let Some(captured) = self.captured {
            write!(f, "x{}", captured)?;
        }
        if !self.flags.is_empty() {
            write!(f, " {:?}", self.flags)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::Move;
    use crate::core::*;

    const WHITE_PAWN: Piece = Piece::new(Color::White, PieceKind::Pawn);
    const BLACK_PAWN: Piece = Piece::new(Color::Black, PieceKind::Pawn);
    const WHITE_ROOK: Piece = Piece::new(Color::White, PieceKind::Rook);
    const BLACK_KNIGHT: Piece = Piece::new(Color::Black, PieceKind::Knight);

    #[test]
    fn quiet() {
        let quiet = Move::new(A4, A5, WHITE_ROOK, None);
        assert_eq!(A4, quiet.source());
        assert_eq!(A5, quiet.destination());
        assert_eq!(WHITE_ROOK, quiet.moved());
        assert!(!quiet.is_capture());
        assert!(!quiet.is_promotion());
        assert!(!quiet.is_en_passant());
    }

    #[test]
    fn capture() {
        let capture = Move::new(B4, C4, WHITE_ROOK, Some(BLACK_KNIGHT));
        assert_eq!(B4, capture.source());
        assert_eq!(C4, capture.destination());
        assert!(capture.is_capture());
        assert_eq!(Some(BLACK_KNIGHT), capture.captured());
    }

    #[test]
    fn en_passant() {
        let ep = Move::en_passant(E5, D6, WHITE_PAWN);
        assert!(ep.is_en_passant());
        assert!(ep.is_capture());
        assert_eq!(Some(BLACK_PAWN), ep.captured());
        assert_eq!(D5, ep.en_passant_square());
        assert_eq!(MoveFlags::EN_PASSANT, ep.flags());

        let promote = Move::new(B2, A1, BLACK_PAWN, Some(WHITE_ROOK));
        assert_eq!(MoveFlags::PROMOTION, promote.flags());
        assert!(Move::new(A4, A5, WHITE_ROOK, None).flags().is_empty());
    }

    #[test]
    fn double_pawn_push() {
        assert!(Move::new(D2, D4, WHITE_PAWN, None).is_double_pawn_push());
        assert!(Move::new(C7, C5, BLACK_PAWN, None).is_double_pawn_push());
        assert!(!Move::new(D2, D3, WHITE_PAWN, None).is_double_pawn_push());
        assert!(!Move::new(A1, A3, WHITE_ROOK, None).is_double_pawn_push());
    }

    #[test]
    fn promotion_on_far_row() {
        assert!(Move::new(E7, E8, WHITE_PAWN, None).is_promotion());
        assert!(Move::new(E7, F8, WHITE_PAWN, Some(BLACK_KNIGHT)).is_promotion());
        assert!(Move::new(B2, B1, BLACK_PAWN, None).is_promotion());
        assert!(!Move::new(E6, E7, WHITE_PAWN, None).is_promotion());
        // Only pawns promote.
        assert!(!Move::new(A7, A8, WHITE_ROOK, None).is_promotion());
    }

    #[test]
    fn notation_smoke() {
        assert_eq!("a1a2", Move::new(A1, A2, WHITE_ROOK, None).notation());
        assert_eq!("e2e4", Move::new(E2, E4, WHITE_PAWN, None).to_string());
    }

    #[test]
    fn notation_has_no_promotion_suffix() {
        assert_eq!("a7a8", Move::new(A7, A8, WHITE_PAWN, None).notation());
    }

    #[test]
    fn equality_ignores_metadata() {
        let quiet = Move::new(E4, D5, WHITE_PAWN, None);
        let capture = Move::new(E4, D5, WHITE_PAWN, Some(BLACK_PAWN));
        let ep = Move::en_passant(E4, D5, WHITE_PAWN);
        assert_eq!(quiet, capture);
        assert_eq!(quiet, ep);

        let set: HashSet<_> = vec![quiet, capture, ep].into_iter().collect();
        assert_eq!(1, set.len());

        assert_ne!(quiet, Move::new(E4, E5, WHITE_PAWN, None));
    }

    #[test]
    fn from_board_reads_occupants() {
        let board = Board::starting_position();
        let mov = Move::from_board(G1, F3, &board).unwrap();
        assert_eq!(Piece::new(Color::White, PieceKind::Knight), mov.moved());
        assert!(!mov.is_capture());

        let mov = Move::from_board(D1, D8, &board).unwrap();
        assert_eq!(
            Some(Piece::new(Color::Black, PieceKind::Queen)),
            mov.captured()
        );
    }

    #[test]
    fn from_board_empty_source() {
        let board = Board::starting_position();
        assert!(Move::from_board(E4, E5, &board).is_none());
    }

    #[test]
    fn debug_shows_metadata() {
        let mov = Move::new(E7, F8, WHITE_PAWN, Some(BLACK_KNIGHT));
        let debug = format!("{:?}", mov);
        assert!(debug.starts_with("e7f8 (Pxn"));
        assert!(debug.contains("PROMOTION"));
    }
}
