//! Running material totals per color.
//!
//! Counted once from the board, then adjusted incrementally as moves are
//! made and unmade: captures subtract the victim's value, promotions add
//! the difference between the new piece and the pawn it replaces.

use crate::engine::board::Board64;
use crate::engine::moves::{Move, MoveKind};
use crate::engine::types::Color;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaterialScores {
    pub white: i32,
    pub black: i32,
}

impl MaterialScores {
    /// Count the material currently on the board.
    pub fn count(board: &Board64) -> Self {
        let mut scores = MaterialScores::default();
        for (_, piece) in board.pieces() {
            match piece.color {
                Color::White => scores.white += piece.material_value(),
                Color::Black => scores.black += piece.material_value(),
            }
        }
        scores
    }

    pub fn get(&self, color: Color) -> i32 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn add(&mut self, color: Color, delta: i32) {
        match color {
            Color::White => self.white += delta,
            Color::Black => self.black += delta,
        }
    }

    /// Adjust for a move being made.
    pub fn on_move(&mut self, mv: &Move) {
        if let Some(captured) = mv.captured {
            self.add(captured.color, -captured.material_value());
        }
        if let MoveKind::Promotion { promote_to } = mv.kind {
            self.add(mv.color(), promote_to.material_value() - 1);
        }
    }

    /// Adjust for a move being unmade.
    pub fn on_un_move(&mut self, mv: &Move) {
        if let Some(captured) = mv.captured {
            self.add(captured.color, captured.material_value());
        }
        if let MoveKind::Promotion { promote_to } = mv.kind {
            self.add(mv.color(), -(promote_to.material_value() - 1));
        }
    }
}
