// Copyright 2021-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move generation. None of the generators here check whether a move leaves the mover's own king
//! attacked; `GameState::legal_moves` filters for that.

use crate::core::*;
use crate::GameState;

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub fn generate_pawn_moves(
    us: Color,
    board: &Board,
    en_passant: Option<Square>,
    source: Square,
    moves: &mut Vec<Move>,
) {
    let pawn = Piece::new(us, PieceKind::Pawn);
    let up = us.forward();

    // Single and double pushes. The double push needs both squares in front of the pawn to be empty.
    if let Some(push) = source.offset(up, 0) {
        if board.piece_at(push).is_none() {
            moves.push(Move::new(source, push, pawn, None));
            if source.row() == us.pawn_row() {
                if let Some(double) = push.offset(up, 0) {
                    if board.piece_at(double).is_none() {
                        moves.push(Move::new(source, double, pawn, None));
                    }
                }
            }
        }
    }

    // Captures, including en-passant.
    for side in [-1, 1] {
        let target = match source.offset(up, side) {
            Some(target) => target,
            None => continue,
        };

        match board.piece_at(target) {
            Some(piece) if piece.color != us => {
                moves.push(Move::new(source, target, pawn, Some(piece)));
            }
            None if en_passant == Some(target) => {
                moves.push(Move::en_passant(source, target, pawn));
            }
            _ => {}
        }
    }
}

pub fn generate_knight_moves(us: Color, board: &Board, source: Square, moves: &mut Vec<Move>) {
    generate_step_moves(us, board, source, PieceKind::Knight, &KNIGHT_JUMPS, moves);
}

pub fn generate_king_moves(us: Color, board: &Board, source: Square, moves: &mut Vec<Move>) {
    generate_step_moves(us, board, source, PieceKind::King, &KING_STEPS, moves);
}

fn generate_step_moves(
    us: Color,
    board: &Board,
    source: Square,
    kind: PieceKind,
    steps: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    let piece = Piece::new(us, kind);
    for &(dr, dc) in steps {
        let target = match source.offset(dr, dc) {
            Some(target) => target,
            None => continue,
        };

        match board.piece_at(target) {
            Some(occupant) if occupant.color == us => {}
            occupant => moves.push(Move::new(source, target, piece, occupant)),
        }
    }
}

/// Casts a ray from `source` in each of the given directions. A ray stops at the edge of the board, just before a
/// friendly piece, or on the first enemy piece (which is captured).
pub fn generate_sliding_moves(
    us: Color,
    board: &Board,
    source: Square,
    kind: PieceKind,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    let piece = Piece::new(us, kind);
    for &(dr, dc) in directions {
        let mut current = source;
        while let Some(target) = current.offset(dr, dc) {
            match board.piece_at(target) {
                None => moves.push(Move::new(source, target, piece, None)),
                Some(occupant) if occupant.color != us => {
                    moves.push(Move::new(source, target, piece, Some(occupant)));
                    break;
                }
                Some(_) => break,
            }

            current = target;
        }
    }
}

pub fn generate_queen_moves(us: Color, board: &Board, source: Square, moves: &mut Vec<Move>) {
    generate_sliding_moves(us, board, source, PieceKind::Queen, &ROOK_DIRECTIONS, moves);
    generate_sliding_moves(us, board, source, PieceKind::Queen, &BISHOP_DIRECTIONS, moves);
}

/// Generates every pseudo-legal move for `us`, scanning the board in row-major order and dispatching on the kind of
/// each of our pieces.
pub fn generate_moves(us: Color, pos: &GameState, moves: &mut Vec<Move>) {
    let board = pos.board();
    for (source, piece) in board.pieces() {
        if piece.color != us {
            continue;
        }

        match piece.kind {
            PieceKind::Pawn => {
                generate_pawn_moves(us, board, pos.en_passant_target(), source, moves)
            }
            PieceKind::Knight => generate_knight_moves(us, board, source, moves),
            PieceKind::Bishop => generate_sliding_moves(
                us,
                board,
                source,
                PieceKind::Bishop,
                &BISHOP_DIRECTIONS,
                moves,
            ),
            PieceKind::Rook => generate_sliding_moves(
                us,
                board,
                source,
                PieceKind::Rook,
                &ROOK_DIRECTIONS,
                moves,
            ),
            PieceKind::Queen => generate_queen_moves(us, board, source, moves),
            PieceKind::King => generate_king_moves(us, board, source, moves),
        }
    }
}

/// Counts the leaf nodes of the legal move tree rooted at `pos`, `depth` plies deep. The position is restored before
/// returning.
pub fn perft(pos: &mut GameState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = pos.filter_legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut count = 0;
    for mov in moves {
        pos.make_move(mov);
        count += perft(pos, depth - 1);
        pos.unmake_move();
    }

    count
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn moves_from(board: &Board, en_passant: Option<Square>, source: Square) -> Vec<Move> {
        let piece = board.piece_at(source).expect("no piece on source square");
        let mut moves = Vec::new();
        match piece.kind {
            PieceKind::Pawn => generate_pawn_moves(piece.color, board, en_passant, source, &mut moves),
            PieceKind::Knight => generate_knight_moves(piece.color, board, source, &mut moves),
            PieceKind::Bishop => generate_sliding_moves(
                piece.color,
                board,
                source,
                PieceKind::Bishop,
                &BISHOP_DIRECTIONS,
                &mut moves,
            ),
            PieceKind::Rook => generate_sliding_moves(
                piece.color,
                board,
                source,
                PieceKind::Rook,
                &ROOK_DIRECTIONS,
                &mut moves,
            ),
            PieceKind::Queen => generate_queen_moves(piece.color, board, source, &mut moves),
            PieceKind::King => generate_king_moves(piece.color, board, source, &mut moves),
        }

        moves
    }

    fn destinations(moves: &[Move]) -> HashSet<Square> {
        moves.iter().map(|m| m.destination()).collect()
    }

    fn assert_destinations(diagram: &str, source: Square, expected: &[Square]) {
        let board = Board::from_diagram(diagram);
        let moves = moves_from(&board, None, source);
        let actual = destinations(&moves);
        let expected: HashSet<_> = expected.iter().cloned().collect();
        if actual != expected {
            println!("{}", board);
            println!("moves: {:?}", moves);
            panic!("expected destinations {:?}, got {:?}", expected, actual);
        }

        assert_eq!(moves.len(), actual.len(), "duplicate moves generated");
    }

    mod pawns {
        use super::*;

        #[test]
        fn white_pawn_smoke_test() {
            assert_destinations(
                "........
                 ........
                 ........
                 ........
                 .....P..
                 ........
                 ........
                 ........",
                F4,
                &[F5],
            );
        }

        #[test]
        fn white_pawn_blocked() {
            assert_destinations(
                "........
                 ........
                 ........
                 ........
                 ....p...
                 ....P...
                 ........
                 ........",
                E3,
                &[],
            );
        }

        #[test]
        fn double_pawn_push_smoke() {
            assert_destinations(
                "........
                 ........
                 ........
                 ........
                 ........
                 ........
                 ..P.....
                 ........",
                C2,
                &[C3, C4],
            );
        }

        #[test]
        fn black_double_pawn_push() {
            assert_destinations(
                "........
                 ...p....
                 ........
                 ........
                 ........
                 ........
                 ........
                 ........",
                D7,
                &[D6, D5],
            );
        }

        #[test]
        fn no_double_pawn_push_when_blocked() {
            assert_destinations(
                "........
                 ........
                 ........
                 ........
                 ........
                 ....p...
                 ....P...
                 ........",
                E2,
                &[],
            );
            assert_destinations(
                "........
                 ........
                 ........
                 ........
                 ....p...
                 ........
                 ....P...
                 ........",
                E2,
                &[E3],
            );
        }

        #[test]
        fn no_double_pawn_push_off_start_row() {
            assert_destinations(
                "........
                 ........
                 ........
                 ........
                 ........
                 ....P...
                 ........
                 ........",
                E3,
                &[E4],
            );
        }

        #[test]
        fn captures_enemy_only() {
            assert_destinations(
                "........
                 ........
                 ........
                 ...p.N..
                 ....P...
                 ........
                 ........
                 ........",
                E4,
                &[E5, D5],
            );
        }

        #[test]
        fn capture_on_edge_file() {
            assert_destinations(
                "........
                 ........
                 ........
                 .p......
                 P.......
                 ........
                 ........
                 ........",
                A4,
                &[A5, B5],
            );
        }

        #[test]
        fn capture_order() {
            let board = Board::from_diagram(
                "........
                 ........
                 ........
                 ...p.p..
                 ....P...
                 ........
                 ........
                 ........",
            );
            let moves = moves_from(&board, None, E4);
            let notations: Vec<_> = moves.iter().map(|m| m.notation()).collect();
            assert_eq!(vec!["e4e5", "e4d5", "e4f5"], notations);
        }

        #[test]
        fn en_passant_target() {
            let board = Board::from_diagram(
                "........
                 ........
                 ........
                 ...pP...
                 ........
                 ........
                 ........
                 ........",
            );
            let moves = moves_from(&board, Some(D6), E5);
            let ep = moves
                .iter()
                .find(|m| m.destination() == D6)
                .expect("en passant capture not generated");
            assert!(ep.is_en_passant());
            assert_eq!(
                Some(Piece::new(Color::Black, PieceKind::Pawn)),
                ep.captured()
            );

            // Without a target the diagonal onto an empty square is not a move.
            let moves = moves_from(&board, None, E5);
            assert_eq!(
                destinations(&moves),
                [E6].iter().cloned().collect::<HashSet<_>>()
            );
        }

        #[test]
        fn pawn_promo_flags() {
            let board = Board::from_diagram(
                "..nnn...
                 ...P....
                 ........
                 ........
                 ........
                 ........
                 ........
                 ........",
            );
            let moves = moves_from(&board, None, D7);
            assert_eq!(
                destinations(&moves),
                [C8, E8].iter().cloned().collect::<HashSet<_>>()
            );
            assert!(moves.iter().all(|m| m.is_promotion()));
        }

        #[test]
        fn black_pawn_promotes_on_row_seven() {
            let board = Board::from_diagram(
                "........
                 ........
                 ........
                 ........
                 ........
                 ........
                 ......p.
                 ........",
            );
            let moves = moves_from(&board, None, G2);
            assert_eq!(1, moves.len());
            assert_eq!(G1, moves[0].destination());
            assert!(moves[0].is_promotion());
        }
    }

    mod knights {
        use super::*;

        #[test]
        fn center() {
            assert_destinations(
                "........
                 ........
                 ........
                 ........
                 ...N....
                 ........
                 ........
                 ........",
                D4,
                &[B3, B5, C2, C6, E2, E6, F3, F5],
            );
        }

        #[test]
        fn corner_and_friendly() {
            assert_destinations(
                "........
                 ........
                 ........
                 ........
                 ........
                 .p......
                 ..P.....
                 N.......",
                A1,
                &[B3],
            );
        }
    }

    mod sliders {
        use super::*;

        #[test]
        fn bishop_smoke_test() {
            assert_destinations(
                "........
                 ........
                 ........
                 ........
                 ...B....
                 ........
                 ........
                 ........",
                D4,
                &[E5, F6, G7, H8, E3, F2, G1, C3, B2, A1, C5, B6, A7],
            );
        }

        #[test]
        fn bishop_smoke_capture() {
            assert_destinations(
                "........
                 ........
                 ........
                 ..p.p...
                 ...B....
                 ..p.p...
                 ........
                 ........",
                D4,
                &[E5, E3, C5, C3],
            );
        }

        #[test]
        fn rook_stops_before_friendly() {
            assert_destinations(
                "........
                 ........
                 ........
                 ...P....
                 .p.R..P.
                 ........
                 ........
                 ........",
                D4,
                &[C4, B4, E4, F4, D3, D2, D1],
            );
        }

        #[test]
        fn queen_is_rook_and_bishop() {
            let board = Board::from_diagram(
                "........
                 ........
                 ........
                 ........
                 ...Q....
                 ........
                 ........
                 ........",
            );
            let moves = moves_from(&board, None, D4);
            assert_eq!(27, moves.len());
            // Orthogonal rays come first.
            assert_eq!(D5, moves[0].destination());
        }
    }

    mod kings {
        use super::*;

        #[test]
        fn edge() {
            assert_destinations(
                "........
                 ........
                 ........
                 ........
                 ........
                 ........
                 ........
                 ....K...",
                E1,
                &[D1, F1, D2, E2, F2],
            );
        }

        #[test]
        fn captures_but_not_friendly() {
            assert_destinations(
                "........
                 ........
                 ........
                 ........
                 ........
                 ........
                 ...pP...
                 ....K...",
                E1,
                &[D1, F1, D2, F2],
            );
        }
    }

    mod whole_board {
        use super::*;

        #[test]
        fn start_position_pseudo_legal() {
            let pos = GameState::new();
            let mut moves = Vec::new();
            generate_moves(Color::White, &pos, &mut moves);
            assert_eq!(20, moves.len());

            let mut moves = Vec::new();
            generate_moves(Color::Black, &pos, &mut moves);
            assert_eq!(20, moves.len());
        }

        #[test]
        fn row_major_order() {
            let pos = GameState::new();
            let mut moves = Vec::new();
            generate_moves(Color::White, &pos, &mut moves);
            let notations: Vec<_> = moves.iter().map(|m| m.notation()).collect();
            // The pawns on row 6 are scanned before the knights on row 7.
            assert_eq!("a2a3", notations[0]);
            assert_eq!("a2a4", notations[1]);
            assert_eq!("b1a3", notations[16]);
            assert_eq!("g1h3", notations[19]);
        }
    }

    mod perft_counts {
        use super::*;

        #[test]
        fn start_position() {
            let mut pos = GameState::new();
            assert_eq!(1, perft(&mut pos, 0));
            assert_eq!(20, perft(&mut pos, 1));
            assert_eq!(400, perft(&mut pos, 2));
            assert_eq!(8902, perft(&mut pos, 3));
            assert_eq!(GameState::new().board(), pos.board());
        }

        #[test]
        fn en_passant_and_pins() {
            let board = Board::from_diagram(
                "........
                 ..p.....
                 ...p....
                 KP.....r
                 .R...p.k
                 ........
                 ....P.P.
                 ........",
            );
            let mut pos = GameState::from_board(board, Color::White).unwrap();
            assert_eq!(14, perft(&mut pos, 1));
            assert_eq!(191, perft(&mut pos, 2));
            assert_eq!(2812, perft(&mut pos, 3));
        }
    }
}
