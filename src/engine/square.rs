//! Square addressing and the padded-grid index tables.
//!
//! Squares are numbered in a8-first order (a8 = 0 … h1 = 63) so that the
//! 12×12 padded-grid index is a plain linear function of the square index.
//! The padded grid surrounds the real board with two rings of permanently
//! invalid cells: one ring for ray tracing, a second for knight offsets.
//! Checking a computed neighbor index against [`BOARD_BOUNDARY`] replaces
//! all per-direction bounds arithmetic.

use std::fmt;

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A square on the board, numbered 0..64 in a8-first order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(pub u8);

/// Shade of a square on a checkered board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shade {
    Light,
    Dark,
}

impl Square {
    pub const NUM: usize = 64;

    #[inline]
    pub fn new(index: u8) -> Self {
        debug_assert!(index < 64, "Square index out of range: {index}");
        Square(index)
    }

    /// Column 0..8, a-file = 0. Same in both perspectives' x-axis origin.
    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % 8
    }

    /// Row 0..8 from White's perspective: row 0 is rank 8.
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    /// Rank 1..=8 as printed in square names.
    #[inline]
    pub const fn rank(self) -> u8 {
        8 - self.row()
    }

    /// File letter 'a'..='h'.
    #[inline]
    pub const fn file(self) -> char {
        (b'a' + self.col()) as char
    }

    /// (column, row) as seen from White's side of the board.
    #[inline]
    pub const fn coordinates_white(self) -> (u8, u8) {
        (self.col(), self.row())
    }

    /// (column, row) as seen from Black's side of the board.
    #[inline]
    pub const fn coordinates_black(self) -> (u8, u8) {
        (7 - self.col(), 7 - self.row())
    }

    /// Index into the 12×12 padded grid.
    #[inline]
    pub const fn index_144(self) -> usize {
        26 + self.row() as usize * 12 + self.col() as usize
    }

    /// Shade of the square (a1 is dark).
    pub const fn shade(self) -> Shade {
        if (self.col() + self.rank()) % 2 == 0 {
            Shade::Light
        } else {
            Shade::Dark
        }
    }

    #[inline]
    pub const fn from_col_row(col: u8, row: u8) -> Self {
        Square(row * 8 + col)
    }

    /// Parse algebraic notation like "e4".
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let col = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if col < 8 && rank < 8 {
            Some(Square::from_col_row(col, 7 - rank))
        } else {
            None
        }
    }

    /// Convert to algebraic notation like "e4".
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file(), self.rank())
    }

    /// Whether two distinct squares touch (including diagonally).
    pub fn is_adjacent_to(self, other: Square) -> bool {
        if self == other {
            return false;
        }
        let col_diff = self.col().abs_diff(other.col());
        let row_diff = self.row().abs_diff(other.row());
        col_diff <= 1 && row_diff <= 1
    }

    /// All 64 squares in board order (a8 first).
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }
}

#[rustfmt::skip]
impl Square {
    pub const A8: Square = Square(0);  pub const B8: Square = Square(1);  pub const C8: Square = Square(2);  pub const D8: Square = Square(3);  pub const E8: Square = Square(4);  pub const F8: Square = Square(5);  pub const G8: Square = Square(6);  pub const H8: Square = Square(7);
    pub const A7: Square = Square(8);  pub const B7: Square = Square(9);  pub const C7: Square = Square(10); pub const D7: Square = Square(11); pub const E7: Square = Square(12); pub const F7: Square = Square(13); pub const G7: Square = Square(14); pub const H7: Square = Square(15);
    pub const A6: Square = Square(16); pub const B6: Square = Square(17); pub const C6: Square = Square(18); pub const D6: Square = Square(19); pub const E6: Square = Square(20); pub const F6: Square = Square(21); pub const G6: Square = Square(22); pub const H6: Square = Square(23);
    pub const A5: Square = Square(24); pub const B5: Square = Square(25); pub const C5: Square = Square(26); pub const D5: Square = Square(27); pub const E5: Square = Square(28); pub const F5: Square = Square(29); pub const G5: Square = Square(30); pub const H5: Square = Square(31);
    pub const A4: Square = Square(32); pub const B4: Square = Square(33); pub const C4: Square = Square(34); pub const D4: Square = Square(35); pub const E4: Square = Square(36); pub const F4: Square = Square(37); pub const G4: Square = Square(38); pub const H4: Square = Square(39);
    pub const A3: Square = Square(40); pub const B3: Square = Square(41); pub const C3: Square = Square(42); pub const D3: Square = Square(43); pub const E3: Square = Square(44); pub const F3: Square = Square(45); pub const G3: Square = Square(46); pub const H3: Square = Square(47);
    pub const A2: Square = Square(48); pub const B2: Square = Square(49); pub const C2: Square = Square(50); pub const D2: Square = Square(51); pub const E2: Square = Square(52); pub const F2: Square = Square(53); pub const G2: Square = Square(54); pub const H2: Square = Square(55);
    pub const A1: Square = Square(56); pub const B1: Square = Square(57); pub const C1: Square = Square(58); pub const D1: Square = Square(59); pub const E1: Square = Square(60); pub const F1: Square = Square(61); pub const G1: Square = Square(62); pub const H1: Square = Square(63);
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

// ---------------------------------------------------------------------------
// Padded-grid tables
// ---------------------------------------------------------------------------

/// Validity mask for the 12×12 grid: `true` only for the interior 64 cells.
pub const BOARD_BOUNDARY: [bool; 144] = build_boundary();

/// Reverse lookup: padded-grid index back to the square, `None` off-board.
pub const SQUARE_AT_INDEX_144: [Option<Square>; 144] = build_square_table();

const fn build_boundary() -> [bool; 144] {
    let mut mask = [false; 144];
    let mut row = 0;
    while row < 8 {
        let mut col = 0;
        while col < 8 {
            mask[26 + row * 12 + col] = true;
            col += 1;
        }
        row += 1;
    }
    mask
}

const fn build_square_table() -> [Option<Square>; 144] {
    let mut table = [None; 144];
    let mut row = 0u8;
    while row < 8 {
        let mut col = 0u8;
        while col < 8 {
            table[26 + row as usize * 12 + col as usize] = Some(Square::from_col_row(col, row));
            col += 1;
        }
        row += 1;
    }
    table
}

/// Is the padded-grid index off the real board?
#[inline]
pub fn is_index_out_of_bounds(index: isize) -> bool {
    index < 0 || index >= 144 || !BOARD_BOUNDARY[index as usize]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
