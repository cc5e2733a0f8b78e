//! The move model.
//!
//! Every move, however exotic, reduces to an ordered list of board writes
//! ([`MoveStep`]): put this piece (or nothing) on this square. The board
//! applies the list without knowing what kind of move produced it, and the
//! matching undo list reverses it exactly. Castling geometry lives in four
//! static [`CastlesType`] descriptors.

use std::fmt;

use crate::engine::square::Square;
use crate::engine::types::{CastlingRights, Color, Piece, PieceType};

// ---------------------------------------------------------------------------
// MoveStep
// ---------------------------------------------------------------------------

/// One board write: place `piece` (or clear) on `square`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveStep {
    pub square: Square,
    pub piece: Option<Piece>,
}

impl MoveStep {
    #[inline]
    pub const fn place(square: Square, piece: Piece) -> Self {
        MoveStep {
            square,
            piece: Some(piece),
        }
    }

    #[inline]
    pub const fn clear(square: Square) -> Self {
        MoveStep {
            square,
            piece: None,
        }
    }
}

// ---------------------------------------------------------------------------
// CastlesType
// ---------------------------------------------------------------------------

/// Static geometry of one castling variant.
#[derive(Debug, PartialEq, Eq)]
pub struct CastlesType {
    pub color: Color,
    /// The [`CastlingRights`] bit this variant consumes.
    pub right: u8,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook that must hold no piece.
    pub must_be_empty: &'static [Square],
    /// Squares the king occupies or crosses; none may be attacked.
    pub must_be_safe: &'static [Square],
    pub notation: &'static str,
}

pub static WHITE_KINGSIDE_CASTLE: CastlesType = CastlesType {
    color: Color::White,
    right: CastlingRights::WHITE_KINGSIDE,
    king_from: Square::E1,
    king_to: Square::G1,
    rook_from: Square::H1,
    rook_to: Square::F1,
    must_be_empty: &[Square::F1, Square::G1],
    must_be_safe: &[Square::E1, Square::F1, Square::G1],
    notation: "O-O",
};

pub static WHITE_QUEENSIDE_CASTLE: CastlesType = CastlesType {
    color: Color::White,
    right: CastlingRights::WHITE_QUEENSIDE,
    king_from: Square::E1,
    king_to: Square::C1,
    rook_from: Square::A1,
    rook_to: Square::D1,
    must_be_empty: &[Square::D1, Square::C1, Square::B1],
    must_be_safe: &[Square::E1, Square::D1, Square::C1],
    notation: "O-O-O",
};

pub static BLACK_KINGSIDE_CASTLE: CastlesType = CastlesType {
    color: Color::Black,
    right: CastlingRights::BLACK_KINGSIDE,
    king_from: Square::E8,
    king_to: Square::G8,
    rook_from: Square::H8,
    rook_to: Square::F8,
    must_be_empty: &[Square::F8, Square::G8],
    must_be_safe: &[Square::E8, Square::F8, Square::G8],
    notation: "O-O",
};

pub static BLACK_QUEENSIDE_CASTLE: CastlesType = CastlesType {
    color: Color::Black,
    right: CastlingRights::BLACK_QUEENSIDE,
    king_from: Square::E8,
    king_to: Square::C8,
    rook_from: Square::A8,
    rook_to: Square::D8,
    must_be_empty: &[Square::D8, Square::C8, Square::B8],
    must_be_safe: &[Square::E8, Square::D8, Square::C8],
    notation: "O-O-O",
};

impl CastlesType {
    /// Kingside then queenside variants for one color.
    pub fn for_color(color: Color) -> [&'static CastlesType; 2] {
        match color {
            Color::White => [&WHITE_KINGSIDE_CASTLE, &WHITE_QUEENSIDE_CASTLE],
            Color::Black => [&BLACK_KINGSIDE_CASTLE, &BLACK_QUEENSIDE_CASTLE],
        }
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// Which special rule, if any, a move invokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Quiet,
    /// Two-square pawn advance; sets the en-passant target behind the pawn.
    DoublePawnPush,
    /// En-passant capture; the victim stands beside the destination.
    EnPassant { captured_square: Square },
    Castles(&'static CastlesType),
    Promotion { promote_to: PieceType },
}

/// A fully-resolved move: origin, destination, moving piece, what it
/// captures, and the rule variant. Produced by the generator, consumed by
/// the arbiter; callers never build these by hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub kind: MoveKind,
}

impl Move {
    pub fn quiet(from: Square, to: Square, piece: Piece, captured: Option<Piece>) -> Self {
        Move {
            from,
            to,
            piece,
            captured,
            kind: MoveKind::Quiet,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.piece.color
    }

    /// Resets the half-move clock: any capture or any pawn move.
    pub fn resets_halfmove_clock(&self) -> bool {
        self.is_capture() || self.piece.piece_type == PieceType::Pawn
    }

    /// Same move, promoting to `promote_to` instead of the generator's
    /// queen default. Only meaningful on a promotion move.
    pub fn with_promotion(mut self, promote_to: PieceType) -> Self {
        if let MoveKind::Promotion { promote_to: p } = &mut self.kind {
            *p = promote_to;
        }
        self
    }

    /// Ordered board writes that perform the move.
    pub fn apply_steps(&self) -> Vec<MoveStep> {
        match self.kind {
            MoveKind::Quiet | MoveKind::DoublePawnPush => vec![
                MoveStep::clear(self.from),
                MoveStep::place(self.to, self.piece),
            ],
            MoveKind::EnPassant { captured_square } => vec![
                MoveStep::clear(self.from),
                MoveStep::clear(captured_square),
                MoveStep::place(self.to, self.piece),
            ],
            MoveKind::Castles(ct) => vec![
                MoveStep::clear(ct.king_from),
                MoveStep::place(ct.king_to, Piece::new(PieceType::King, ct.color)),
                MoveStep::clear(ct.rook_from),
                MoveStep::place(ct.rook_to, Piece::new(PieceType::Rook, ct.color)),
            ],
            MoveKind::Promotion { promote_to } => vec![
                MoveStep::clear(self.from),
                MoveStep::place(self.to, Piece::new(promote_to, self.color())),
            ],
        }
    }

    /// Ordered board writes that reverse the move. Applying `apply_steps`
    /// then `undo_steps` restores every touched square, captures included.
    pub fn undo_steps(&self) -> Vec<MoveStep> {
        match self.kind {
            MoveKind::Quiet | MoveKind::DoublePawnPush | MoveKind::Promotion { .. } => vec![
                MoveStep {
                    square: self.to,
                    piece: self.captured,
                },
                MoveStep::place(self.from, self.piece),
            ],
            MoveKind::EnPassant { captured_square } => vec![
                MoveStep::clear(self.to),
                MoveStep {
                    square: captured_square,
                    piece: self.captured,
                },
                MoveStep::place(self.from, self.piece),
            ],
            MoveKind::Castles(ct) => vec![
                MoveStep::clear(ct.king_to),
                MoveStep::place(ct.king_from, Piece::new(PieceType::King, ct.color)),
                MoveStep::clear(ct.rook_to),
                MoveStep::place(ct.rook_from, Piece::new(PieceType::Rook, ct.color)),
            ],
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MoveKind::Castles(ct) => write!(f, "{}", ct.notation),
            MoveKind::Promotion { promote_to } => write!(
                f,
                "{}{}={}",
                self.from,
                self.to,
                promote_to.fen_char().to_ascii_uppercase()
            ),
            _ if self.is_capture() => write!(f, "{}x{}", self.from, self.to),
            _ => write!(f, "{}{}", self.from, self.to),
        }
    }
}

// ---------------------------------------------------------------------------
// MoveIntent
// ---------------------------------------------------------------------------

/// A caller's request: origin, destination, and an optional promotion
/// choice. The boundary any notation layer lowers into before asking the
/// game to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveIntent {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl MoveIntent {
    pub fn new(from: Square, to: Square) -> Self {
        MoveIntent {
            from,
            to,
            promotion: None,
        }
    }

    pub fn promoting(from: Square, to: Square, promote_to: PieceType) -> Self {
        MoveIntent {
            from,
            to,
            promotion: Some(promote_to),
        }
    }

    /// Parse coordinate form: "e2e4", or "e7e8q" with a promotion letter.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 4 && s.len() != 5 {
            return None;
        }
        let from = Square::from_algebraic(s.get(0..2)?)?;
        let to = Square::from_algebraic(s.get(2..4)?)?;
        let promotion = match s.len() {
            5 => {
                let pt = PieceType::from_fen_char(s.chars().nth(4)?)?;
                if matches!(pt, PieceType::Pawn | PieceType::King) {
                    return None;
                }
                Some(pt)
            }
            _ => None,
        };
        Some(MoveIntent {
            from,
            to,
            promotion,
        })
    }

    /// Does `mv` realize this intent, ignoring the promotion choice?
    pub fn matches(&self, mv: &Move) -> bool {
        self.from == mv.from && self.to == mv.to
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
