//! Position snapshots and their FEN encodings.
//!
//! A [`PositionRecord`] is the immutable record of the game state after a
//! move: placement, side to move, castling rights, en-passant target, the
//! two counters, and the derived check/mate/stalemate flags. Three
//! encodings: standard 6-field FEN, the 9-field extended FEN that appends
//! the flags as 0/1, and the 4-field reduced signature used as the
//! repetition key.

use crate::engine::board::{Board144, START_PLACEMENT};
use crate::engine::square::Square;
use crate::engine::types::{CastlingRights, ChessError, Color};

/// Full game-state snapshot between moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionRecord {
    pub placement: String,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    /// Plies since the last capture or pawn move.
    pub halfmove_clock: u16,
    /// Full-move counter, 1-based, incremented after Black moves.
    pub fullmove_number: u32,
    pub is_check: bool,
    pub is_mate: bool,
    pub is_stalemate: bool,
}

impl PositionRecord {
    /// The standard starting position.
    pub fn start() -> Self {
        PositionRecord {
            placement: START_PLACEMENT.to_string(),
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            is_check: false,
            is_mate: false,
            is_stalemate: false,
        }
    }

    /// Parse a FEN string with 4, 6, or 9 fields.
    ///
    /// Four fields omit the counters (defaulted to 0 and 1); nine fields
    /// append the check, mate, and stalemate flags as 0/1.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !matches!(fields.len(), 4 | 6 | 9) {
            return Err(ChessError::InvalidFen(format!(
                "expected 4, 6 or 9 fields, got {}: {fen}",
                fields.len()
            )));
        }

        // Validate the placement eagerly so a bad record fails here, not
        // when the board is first materialized.
        Board144::from_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "bad side-to-move '{other}': {fen}"
                )));
            }
        };
        let castling = CastlingRights::from_fen(fields[2])
            .ok_or_else(|| ChessError::InvalidFen(format!("bad castling field: {fen}")))?;
        let en_passant = match fields[3] {
            "-" => None,
            name => Some(
                Square::from_algebraic(name)
                    .ok_or_else(|| ChessError::InvalidFen(format!("bad en-passant field: {fen}")))?,
            ),
        };

        let (halfmove_clock, fullmove_number) = if fields.len() >= 6 {
            let half = fields[4]
                .parse::<u16>()
                .map_err(|_| ChessError::InvalidFen(format!("bad halfmove clock: {fen}")))?;
            let full = fields[5]
                .parse::<u32>()
                .map_err(|_| ChessError::InvalidFen(format!("bad fullmove number: {fen}")))?;
            // The fullmove counter is 1-based; tolerate a sloppy 0.
            (half, full.max(1))
        } else {
            (0, 1)
        };

        let parse_flag = |s: &str| match s {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(ChessError::InvalidFen(format!("bad state flag: {fen}"))),
        };
        let (is_check, is_mate, is_stalemate) = if fields.len() == 9 {
            (
                parse_flag(fields[6])?,
                parse_flag(fields[7])?,
                parse_flag(fields[8])?,
            )
        } else {
            (false, false, false)
        };

        Ok(PositionRecord {
            placement: fields[0].to_string(),
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            is_check,
            is_mate,
            is_stalemate,
        })
    }

    /// Standard 6-field FEN.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {}",
            self.reduced_signature(),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Extended 9-field FEN: standard FEN plus check/mate/stalemate flags.
    pub fn to_extended_fen(&self) -> String {
        format!(
            "{} {} {} {}",
            self.to_fen(),
            self.is_check as u8,
            self.is_mate as u8,
            self.is_stalemate as u8
        )
    }

    /// The first four FEN fields. Two positions with equal signatures are
    /// the same for repetition purposes.
    pub fn reduced_signature(&self) -> String {
        format!(
            "{} {} {} {}",
            self.placement,
            match self.side_to_move {
                Color::White => "w",
                Color::Black => "b",
            },
            self.castling.to_fen(),
            match self.en_passant {
                Some(sq) => sq.to_algebraic(),
                None => "-".to_string(),
            }
        )
    }

    /// The canonical ply counter: `fullmove*2 - 1`, plus one when Black
    /// is on the move. The standard start position counts 1; the position
    /// after White's first move counts 2.
    pub fn half_step_counter(&self) -> u32 {
        let base = self.fullmove_number * 2 - 1;
        match self.side_to_move {
            Color::White => base,
            Color::Black => base + 1,
        }
    }

    /// Materialize the board this record describes.
    pub fn board(&self) -> Result<Board144, ChessError> {
        Board144::from_placement(&self.placement)
    }

    /// Terminal under the board rules alone (mate or stalemate).
    pub fn is_terminal(&self) -> bool {
        self.is_mate || self.is_stalemate
    }
}

impl Default for PositionRecord {
    fn default() -> Self {
        PositionRecord::start()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
