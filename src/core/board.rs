// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use crate::core::*;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The 8x8 grid of squares, each holding one piece or nothing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Board {
        Board {
            cells: [[None; 8]; 8],
        }
    }

    /// The standard starting arrangement, Black on rows 0 and 1 and White on rows 6 and 7.
    pub fn starting_position() -> Board {
        let mut board = Board::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            board.cells[0][col] = Some(Piece::new(Color::Black, kind));
            board.cells[1][col] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            board.cells[6][col] = Some(Piece::new(Color::White, PieceKind::Pawn));
            board.cells[7][col] = Some(Piece::new(Color::White, kind));
        }

        board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.row() as usize][square.col() as usize]
    }

    /// Places `piece` on `square`, replacing whatever was there. `None` clears the square.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[square.row() as usize][square.col() as usize] = piece;
    }

    /// Iterates the occupied squares of the board in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        squares().filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Returns every square holding a king of the given color.
    pub fn kings(&self, color: Color) -> Vec<Square> {
        let king = Piece::new(color, PieceKind::King);
        self.pieces()
            .filter(|&(_, piece)| piece == king)
            .map(|(sq, _)| sq)
            .collect()
    }
}

#[cfg(test)]
impl Board {
    /// Builds a board from eight rows of piece letters, top row (rank 8) first. `.` marks an
    /// empty square.
    pub(crate) fn from_diagram(diagram: &str) -> Board {
        let rows: Vec<&str> = diagram
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert_eq!(8, rows.len(), "diagram must have eight rows");

        let mut board = Board::empty();
        for (row, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            assert_eq!(8, chars.len(), "diagram row must have eight squares: {}", line);
            for (col, c) in chars.into_iter().enumerate() {
                if c != '.' {
                    let piece = Piece::try_from(c).expect("unknown piece in diagram");
                    board.set(Square::of(row as u8, col as u8), Some(piece));
                }
            }
        }

        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting_position()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..8u8 {
            for col in 0..8u8 {
                if let Some(piece) = self.piece_at(Square::of(row, col)) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", 8 - row)?;
        }

        for _ in 0..8 {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for col in 0..8u8 {
            write!(f, " {} ", (b'a' + col) as char)?;
        }

        writeln!(f)?;
        Ok(())
    }
}
