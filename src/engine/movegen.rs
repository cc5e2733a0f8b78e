//! Pseudo-legal move generation and the attack probe.
//!
//! Everything here works on the padded grid: a ray step is one addition
//! (`index + j*(dx + dy*12)`) followed by a mask check, so no direction
//! needs its own bounds logic. Generated moves obey piece movement rules
//! only; king safety is the arbiter's problem.
//!
//! The attack probe answers "does `color` attack this square" without
//! attack tables: stand a hypothetical king on the square, trace its
//! knight, rook, and bishop moves outward, and see whether any "capture"
//! found is a piece that could have made that move in reverse.

use crate::engine::board::Board144;
use crate::engine::moves::{CastlesType, Move, MoveKind};
use crate::engine::square::Square;
use crate::engine::types::{CastlingRights, ChessError, Color, Piece, PieceType};

const ROOK_VECTORS: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const BISHOP_VECTORS: [(isize, isize); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];
const ALL_VECTORS: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Padded-grid jumps of a knight.
const KNIGHT_OFFSETS: [isize; 8] = [-23, -10, 14, 25, 23, 10, -14, -25];

/// Move generator over a borrowed board.
pub struct MoveGen<'a> {
    board: &'a Board144,
}

impl<'a> MoveGen<'a> {
    pub fn new(board: &'a Board144) -> Self {
        MoveGen { board }
    }

    /// Pseudo-legal moves for the piece on `square`.
    pub fn pseudo_legal_moves(
        &self,
        square: Square,
        en_passant: Option<Square>,
        castling: CastlingRights,
    ) -> Result<Vec<Move>, ChessError> {
        let piece = self
            .board
            .get(square)
            .ok_or_else(|| ChessError::EmptySquare(square.to_algebraic()))?;
        Ok(match piece.piece_type {
            PieceType::Pawn => self.pawn_moves(square, piece, en_passant),
            PieceType::Knight => self.knight_moves(square, piece),
            PieceType::Bishop => self.bishop_moves(square, piece),
            PieceType::Rook => self.rook_moves(square, piece),
            PieceType::Queen => self.queen_moves(square, piece),
            PieceType::King => self.king_moves(square, piece, castling),
        })
    }

    /// Walk each direction vector up to `max_ray_length` steps, stopping a
    /// ray at the board edge, before a friendly piece, or on a capture.
    fn trace_ray_vectors(
        &self,
        square: Square,
        piece: Piece,
        vectors: &[(isize, isize)],
        max_ray_length: isize,
    ) -> Vec<Move> {
        let mut moves = Vec::new();
        let origin = square.index_144() as isize;
        for &(dx, dy) in vectors {
            for j in 1..=max_ray_length {
                let new_index = origin + j * (dx + dy * 12);
                let Some(to) = self.board.square_at_index(new_index) else {
                    break;
                };
                let occupant = self.board.get(to);
                let captured = occupant.filter(|p| p.color != piece.color);
                if occupant.is_some() && captured.is_none() {
                    break;
                }
                moves.push(Move::quiet(square, to, piece, captured));
                if occupant.is_some() {
                    break;
                }
            }
        }
        moves
    }

    pub fn knight_moves(&self, square: Square, piece: Piece) -> Vec<Move> {
        let mut moves = Vec::new();
        let origin = square.index_144() as isize;
        for offset in KNIGHT_OFFSETS {
            let new_index = origin + offset;
            let Some(to) = self.board.square_at_index(new_index) else {
                continue;
            };
            let occupant = self.board.get(to);
            let captured = occupant.filter(|p| p.color != piece.color);
            if occupant.is_some() && captured.is_none() {
                continue;
            }
            moves.push(Move::quiet(square, to, piece, captured));
        }
        moves
    }

    pub fn rook_moves(&self, square: Square, piece: Piece) -> Vec<Move> {
        self.trace_ray_vectors(square, piece, &ROOK_VECTORS, 7)
    }

    pub fn bishop_moves(&self, square: Square, piece: Piece) -> Vec<Move> {
        self.trace_ray_vectors(square, piece, &BISHOP_VECTORS, 7)
    }

    pub fn queen_moves(&self, square: Square, piece: Piece) -> Vec<Move> {
        self.trace_ray_vectors(square, piece, &ALL_VECTORS, 7)
    }

    pub fn pawn_moves(&self, square: Square, piece: Piece, en_passant: Option<Square>) -> Vec<Move> {
        let mut moves = Vec::new();
        let white = piece.color == Color::White;
        let origin = square.index_144() as isize;

        let mut forward_offsets: Vec<isize> = vec![if white { -12 } else { 12 }];
        let on_starting_rank = (white && square.rank() == 2) || (!white && square.rank() == 7);
        if on_starting_rank {
            forward_offsets.push(if white { -24 } else { 24 });
        }

        // Single step first; a blocked single step also blocks the double.
        for offset in forward_offsets {
            let new_index = origin + offset;
            let Some(to) = self.board.square_at_index(new_index) else {
                break;
            };
            if self.board.get(to).is_some() {
                break;
            }
            let kind = if offset.abs() == 24 {
                MoveKind::DoublePawnPush
            } else {
                MoveKind::Quiet
            };
            moves.push(Move {
                from: square,
                to,
                piece,
                captured: None,
                kind,
            });
        }

        let capture_offsets: [isize; 2] = if white { [-11, -13] } else { [11, 13] };
        for offset in capture_offsets {
            let new_index = origin + offset;
            let Some(to) = self.board.square_at_index(new_index) else {
                continue;
            };
            let captured = self.board.get(to).filter(|p| p.color != piece.color);
            if captured.is_some() {
                moves.push(Move::quiet(square, to, piece, captured));
            } else if en_passant == Some(to) {
                // The victim stands beside the destination, on the
                // mover's own rank.
                let captured_square = Square::from_col_row(to.col(), square.row());
                if let Some(captured_pawn) = self.board.get(captured_square) {
                    moves.push(Move {
                        from: square,
                        to,
                        piece,
                        captured: Some(captured_pawn),
                        kind: MoveKind::EnPassant { captured_square },
                    });
                }
            }
        }

        // Any landing on the final rank becomes a promotion, queen by
        // default; callers pick another piece through the intent boundary.
        let final_rank = if white { 8 } else { 1 };
        for mv in &mut moves {
            if mv.to.rank() == final_rank {
                mv.kind = MoveKind::Promotion {
                    promote_to: PieceType::Queen,
                };
            }
        }

        moves
    }

    pub fn king_moves(&self, square: Square, piece: Piece, castling: CastlingRights) -> Vec<Move> {
        let mut moves = self.trace_ray_vectors(square, piece, &ALL_VECTORS, 1);
        if castling.color_rights(piece.color).is_empty() {
            return moves;
        }

        let home = match piece.color {
            Color::White => Square::E1,
            Color::Black => Square::E8,
        };
        if square != home {
            return moves;
        }

        for ct in CastlesType::for_color(piece.color) {
            if !castling.has(ct.right) {
                continue;
            }
            let rook_in_place = self
                .board
                .get(ct.rook_from)
                .is_some_and(|p| p.piece_type == PieceType::Rook);
            let any_occupied = ct
                .must_be_empty
                .iter()
                .any(|&sq| self.board.get(sq).is_some());
            if rook_in_place && !any_occupied {
                moves.push(Move {
                    from: square,
                    to: ct.king_to,
                    piece,
                    captured: None,
                    kind: MoveKind::Castles(ct),
                });
            }
        }
        moves
    }

    /// Does `color` attack `square`?
    ///
    /// A square occupied by `color`'s own piece is never "threatened".
    pub fn is_square_threatened_by(&self, square: Square, color: Color) -> bool {
        if self.board.get(square).is_some_and(|p| p.color == color) {
            return false;
        }

        // The probe piece belongs to the defender, so every enemy piece it
        // runs into shows up as a capture.
        let probe = Piece::new(PieceType::King, !color);

        for mv in self.knight_moves(square, probe) {
            if mv.captured.is_some_and(|p| p.piece_type == PieceType::Knight) {
                return true;
            }
        }

        for mv in self.rook_moves(square, probe) {
            if let Some(captured) = mv.captured {
                match captured.piece_type {
                    PieceType::Rook | PieceType::Queen => return true,
                    PieceType::King if mv.from.is_adjacent_to(mv.to) => return true,
                    _ => {}
                }
            }
        }

        for mv in self.bishop_moves(square, probe) {
            if let Some(captured) = mv.captured {
                match captured.piece_type {
                    PieceType::Bishop | PieceType::Queen => return true,
                    PieceType::King if mv.from.is_adjacent_to(mv.to) => return true,
                    PieceType::Pawn if mv.from.is_adjacent_to(mv.to) => {
                        // A pawn only captures toward its promotion rank:
                        // black downward (row increases), white upward.
                        let row_diff = mv.to.row() as i8 - mv.from.row() as i8;
                        match captured.color {
                            Color::Black if row_diff == -1 => return true,
                            Color::White if row_diff == 1 => return true,
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }
        }

        false
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
