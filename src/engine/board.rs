//! Board state: 64 logical squares plus the 12×12 padded view.
//!
//! [`Board64`] owns the occupancy array and a per-color king-square cache.
//! [`Board144`] layers the padded-grid lookups on top and applies the step
//! lists produced by the move model. All mutation funnels through
//! [`Board64::set`], which keeps the king cache write-through.

use crate::engine::moves::{Move, MoveStep};
use crate::engine::square::{SQUARE_AT_INDEX_144, Square, is_index_out_of_bounds};
use crate::engine::types::{ChessError, Color, Piece, PieceType};

/// Piece placement of the standard starting position.
pub const START_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

// ---------------------------------------------------------------------------
// Board64
// ---------------------------------------------------------------------------

/// The 64 logical squares, a8-first, plus a cached king square per color.
///
/// The cache updates whenever a king is placed. Clearing a square never
/// touches it: every way a king leaves a square in a legal game is paired
/// with a placement that refreshes the cache, so the stale window is
/// confined to the interior of a step list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board64 {
    squares: [Option<Piece>; 64],
    kings: [Option<Square>; 2],
}

impl Board64 {
    pub fn empty() -> Self {
        Board64 {
            squares: [None; 64],
            kings: [None; 2],
        }
    }

    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square.0 as usize]
    }

    /// Write a square. Placing a king refreshes that color's cache.
    #[inline]
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.0 as usize] = piece;
        if let Some(p) = piece
            && p.piece_type == PieceType::King
        {
            self.kings[p.color.index()] = Some(square);
        }
    }

    /// Cached king square for `color`. `None` only on a board that never
    /// held that king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color.index()]
    }

    /// All occupied squares in board order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Occupied squares of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Parse a FEN placement field (the first FEN token).
    pub fn from_placement(placement: &str) -> Result<Self, ChessError> {
        let mut board = Board64::empty();
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}: {placement}",
                ranks.len()
            )));
        }
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0u8;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as u8;
                } else {
                    let piece = Piece::from_fen_char(c).ok_or_else(|| {
                        ChessError::InvalidFen(format!("bad piece letter '{c}' in {placement}"))
                    })?;
                    if col >= 8 {
                        return Err(ChessError::InvalidFen(format!(
                            "rank overflow in {placement}"
                        )));
                    }
                    board.set(Square::from_col_row(col, row as u8), Some(piece));
                    col += 1;
                }
            }
            if col != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} spans {col} files in {placement}",
                    8 - row
                )));
            }
        }
        Ok(board)
    }

    /// Serialize back to the FEN placement field.
    pub fn to_placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for row in 0..8u8 {
            if row > 0 {
                out.push('/');
            }
            let mut empty = 0u8;
            for col in 0..8u8 {
                match self.get(Square::from_col_row(col, row)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        out.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push((b'0' + empty) as char);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Board144
// ---------------------------------------------------------------------------

/// The padded-grid view over a [`Board64`].
///
/// Grid indexes are `isize` so ray and offset arithmetic can run over the
/// edge without wrapping; [`Board144::piece_at_index`] answers `None` for
/// anything off the real board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board144 {
    inner: Board64,
}

impl Board144 {
    pub fn new(inner: Board64) -> Self {
        Board144 { inner }
    }

    pub fn starting() -> Self {
        // The start placement is well formed.
        Board144::from_placement(START_PLACEMENT).unwrap()
    }

    pub fn from_placement(placement: &str) -> Result<Self, ChessError> {
        Ok(Board144::new(Board64::from_placement(placement)?))
    }

    #[inline]
    pub fn inner(&self) -> &Board64 {
        &self.inner
    }

    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.inner.get(square)
    }

    #[inline]
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.inner.set(square, piece);
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.inner.king_square(color)
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.inner.pieces_of(color)
    }

    pub fn to_placement(&self) -> String {
        self.inner.to_placement()
    }

    /// The square behind a padded-grid index, off-board answers `None`.
    #[inline]
    pub fn square_at_index(&self, index: isize) -> Option<Square> {
        if is_index_out_of_bounds(index) {
            None
        } else {
            SQUARE_AT_INDEX_144[index as usize]
        }
    }

    /// The piece on a padded-grid index; off-board or empty answers `None`.
    #[inline]
    pub fn piece_at_index(&self, index: isize) -> Option<Piece> {
        self.square_at_index(index).and_then(|sq| self.get(sq))
    }

    /// Apply an ordered step list.
    pub fn apply_steps(&mut self, steps: &[MoveStep]) {
        for step in steps {
            self.set(step.square, step.piece);
        }
    }

    /// Perform `mv` on the board.
    pub fn make_move(&mut self, mv: &Move) {
        self.apply_steps(&mv.apply_steps());
    }

    /// Reverse a previously-performed `mv`.
    pub fn un_make_move(&mut self, mv: &Move) {
        self.apply_steps(&mv.undo_steps());
    }

    /// Debug rendering: ranks 8 down to 1, dots for empty squares.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in 0..8u8 {
            out.push((b'8' - row) as char);
            for col in 0..8u8 {
                out.push(' ');
                match self.get(Square::from_col_row(col, row)) {
                    Some(piece) => out.push(piece.to_fen_char()),
                    None => out.push('.'),
                }
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h\n");
        out
    }
}

impl Default for Board144 {
    fn default() -> Self {
        Board144::starting()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
