use std::fmt;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Index for array lookups: White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// All piece types in order.
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Material value in pawns. The king carries no material value.
    pub const fn material_value(self) -> i32 {
        match self {
            PieceType::Pawn => 1,
            PieceType::Knight | PieceType::Bishop => 3,
            PieceType::Rook => 5,
            PieceType::Queen => 9,
            PieceType::King => 0,
        }
    }

    /// Single FEN letter, lowercase.
    pub fn fen_char(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    /// Parse a FEN piece letter (either case) into the piece type alone.
    pub fn from_fen_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "pawn"),
            PieceType::Knight => write!(f, "knight"),
            PieceType::Bishop => write!(f, "bishop"),
            PieceType::Rook => write!(f, "rook"),
            PieceType::Queen => write!(f, "queen"),
            PieceType::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A piece: type plus color. Immutable value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Piece { piece_type, color }
    }

    /// Material value in pawns.
    #[inline]
    pub const fn material_value(self) -> i32 {
        self.piece_type.material_value()
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn to_fen_char(self) -> char {
        let c = self.piece_type.fen_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parse a FEN piece letter; case determines color.
    pub fn from_fen_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        PieceType::from_fen_char(c).map(|t| Piece::new(t, color))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.piece_type)
    }
}

// ---------------------------------------------------------------------------
// CastlingRights
// ---------------------------------------------------------------------------

/// Castling availability bitfield: bits 0-3 = WK, WQ, BK, BQ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 1;
    pub const WHITE_QUEENSIDE: u8 = 2;
    pub const BLACK_KINGSIDE: u8 = 4;
    pub const BLACK_QUEENSIDE: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn remove(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Rights restricted to one color's two flags.
    pub fn color_rights(self, color: Color) -> CastlingRights {
        CastlingRights(self.0 & Self::color_flags(color))
    }

    /// Both flags for one color.
    pub fn color_flags(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE | Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_KINGSIDE | Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub fn can_castle_kingside(self, color: Color) -> bool {
        match color {
            Color::White => self.has(Self::WHITE_KINGSIDE),
            Color::Black => self.has(Self::BLACK_KINGSIDE),
        }
    }

    #[inline]
    pub fn can_castle_queenside(self, color: Color) -> bool {
        match color {
            Color::White => self.has(Self::WHITE_QUEENSIDE),
            Color::Black => self.has(Self::BLACK_QUEENSIDE),
        }
    }

    /// Parse FEN castling string (e.g. "KQkq", "-", "Kq").
    pub fn from_fen(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(CastlingRights::NONE);
        }
        let mut rights = 0u8;
        for c in s.chars() {
            match c {
                'K' => rights |= Self::WHITE_KINGSIDE,
                'Q' => rights |= Self::WHITE_QUEENSIDE,
                'k' => rights |= Self::BLACK_KINGSIDE,
                'q' => rights |= Self::BLACK_QUEENSIDE,
                _ => return None,
            }
        }
        Some(CastlingRights(rights))
    }

    /// Convert to FEN castling string.
    pub fn to_fen(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        let mut s = String::with_capacity(4);
        if self.has(Self::WHITE_KINGSIDE) {
            s.push('K');
        }
        if self.has(Self::WHITE_QUEENSIDE) {
            s.push('Q');
        }
        if self.has(Self::BLACK_KINGSIDE) {
            s.push('k');
        }
        if self.has(Self::BLACK_QUEENSIDE) {
            s.push('q');
        }
        s
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// How a finished game ended. Absent while the game is in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Checkmate; the winner delivered it.
    Checkmate { winner: Color },
    /// A drawn game, by the given rule.
    Draw(DrawKind),
    /// A player resigned; the winner is the other side.
    Resignation { winner: Color },
    /// A player ran out of time; the winner is the other side.
    Timeout { winner: Color },
}

impl Outcome {
    /// The winning side, if the outcome has one.
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner }
            | Outcome::Resignation { winner }
            | Outcome::Timeout { winner } => Some(winner),
            Outcome::Draw(_) => None,
        }
    }
}

/// Reason for a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawKind {
    Stalemate,
    ThreefoldRepetition,
    FiftyMoveRule,
    Agreed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            Outcome::Resignation { winner } => write!(f, "resignation, {winner} wins"),
            Outcome::Timeout { winner } => write!(f, "timeout, {winner} wins"),
            Outcome::Draw(DrawKind::Stalemate) => write!(f, "draw by stalemate"),
            Outcome::Draw(DrawKind::ThreefoldRepetition) => write!(f, "draw by repetition"),
            Outcome::Draw(DrawKind::FiftyMoveRule) => write!(f, "draw by fifty-move rule"),
            Outcome::Draw(DrawKind::Agreed) => write!(f, "draw by agreement"),
        }
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the rules engine.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    /// The requested move fails the legality filter. Recoverable: reject
    /// the input, no state has changed.
    #[error("illegal move: {from} -> {to}: {reason}")]
    IllegalMove {
        from: String,
        to: String,
        reason: String,
    },

    /// A move was requested from a square holding no piece.
    #[error("no piece on square {0}")]
    EmptySquare(String),

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    /// `make_move` was called after a terminal result was set.
    #[error("game is already over: {0}")]
    GameOver(String),

    /// History add/pop out of sequence, or a variation's start position
    /// mismatches its anchor ply. A caller programming error, not user
    /// input; surface it rather than recovering silently.
    #[error("history invariant violated: {0}")]
    InvariantViolation(String),

    #[error("no moves to undo")]
    NothingToUndo,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn color_toggle() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn color_display() {
        assert_eq!(Color::White.to_string(), "white");
        assert_eq!(Color::Black.to_string(), "black");
    }

    #[test_case(PieceType::Pawn, 1)]
    #[test_case(PieceType::Knight, 3)]
    #[test_case(PieceType::Bishop, 3)]
    #[test_case(PieceType::Rook, 5)]
    #[test_case(PieceType::Queen, 9)]
    #[test_case(PieceType::King, 0)]
    fn material_values(pt: PieceType, expected: i32) {
        assert_eq!(pt.material_value(), expected);
    }

    #[test]
    fn piece_fen_char_round_trip() {
        for pt in PieceType::ALL {
            let white = Piece::new(pt, Color::White);
            let black = Piece::new(pt, Color::Black);
            assert!(white.to_fen_char().is_ascii_uppercase());
            assert!(black.to_fen_char().is_ascii_lowercase());
            assert_eq!(Piece::from_fen_char(white.to_fen_char()), Some(white));
            assert_eq!(Piece::from_fen_char(black.to_fen_char()), Some(black));
        }
    }

    #[test]
    fn piece_from_fen_char_invalid() {
        assert_eq!(Piece::from_fen_char('x'), None);
        assert_eq!(Piece::from_fen_char('1'), None);
    }

    #[test]
    fn castling_rights_fen_round_trip() {
        let cases = ["-", "K", "Kq", "KQkq", "kq", "Q"];
        for s in cases {
            let cr = CastlingRights::from_fen(s).unwrap();
            assert_eq!(cr.to_fen(), s);
        }
    }

    #[test]
    fn castling_rights_flags() {
        let all = CastlingRights::ALL;
        assert!(all.can_castle_kingside(Color::White));
        assert!(all.can_castle_queenside(Color::Black));

        let mut cr = CastlingRights::ALL;
        cr.remove(CastlingRights::WHITE_KINGSIDE);
        assert!(!cr.can_castle_kingside(Color::White));
        assert!(cr.can_castle_queenside(Color::White));
    }

    #[test]
    fn castling_rights_from_fen_invalid() {
        assert_eq!(CastlingRights::from_fen("X"), None);
        assert_eq!(CastlingRights::from_fen("KZ"), None);
    }

    #[test]
    fn outcome_winner() {
        assert_eq!(
            Outcome::Checkmate {
                winner: Color::White
            }
            .winner(),
            Some(Color::White)
        );
        assert_eq!(Outcome::Draw(DrawKind::Stalemate).winner(), None);
        assert_eq!(
            Outcome::Resignation {
                winner: Color::Black
            }
            .winner(),
            Some(Color::Black)
        );
    }
}
