//! Move history, repetition counting, and variations.
//!
//! History is keyed by half-step index (ply): the first move made from the
//! start position gets the start position's own half-step counter, and
//! every later move must follow gap-free. A repetition table keyed by the
//! reduced position signature backs the threefold-repetition rule; the
//! start position itself seeds it with one occurrence.

use std::collections::HashMap;

use crate::engine::moves::Move;
use crate::engine::position::PositionRecord;
use crate::engine::types::ChessError;

// ---------------------------------------------------------------------------
// MadeMove
// ---------------------------------------------------------------------------

/// A move that has been played, paired with the position it produced.
#[derive(Clone, Debug, PartialEq)]
pub struct MadeMove {
    pub mv: Move,
    pub position_after: PositionRecord,
}

impl MadeMove {
    pub fn new(mv: Move, position_after: PositionRecord) -> Self {
        MadeMove { mv, position_after }
    }

    /// Ply index of this move: the resulting position's half-step counter
    /// minus one, so White's first move from the standard start is ply 1.
    pub fn half_step_index(&self) -> u32 {
        self.position_after.half_step_counter() - 1
    }
}

// ---------------------------------------------------------------------------
// MoveHistory
// ---------------------------------------------------------------------------

/// Ordered, gap-free record of made moves with repetition tracking and
/// alternate lines.
#[derive(Clone, Debug)]
pub struct MoveHistory {
    start_position: PositionRecord,
    moves: Vec<MadeMove>,
    repetitions: HashMap<String, u32>,
    /// Alternate lines branching after a given ply.
    variations: HashMap<u32, Vec<MoveHistory>>,
}

impl MoveHistory {
    pub fn new(start_position: PositionRecord) -> Self {
        let mut repetitions = HashMap::new();
        repetitions.insert(start_position.reduced_signature(), 1);
        MoveHistory {
            start_position,
            moves: Vec::new(),
            repetitions,
            variations: HashMap::new(),
        }
    }

    pub fn start_position(&self) -> &PositionRecord {
        &self.start_position
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn last(&self) -> Option<&MadeMove> {
        self.moves.last()
    }

    pub fn moves(&self) -> &[MadeMove] {
        &self.moves
    }

    /// Ply index the first added move must carry.
    pub fn start_half_step(&self) -> u32 {
        self.start_position.half_step_counter()
    }

    /// Ply index of the latest move, or `start_half_step - 1` when empty.
    pub fn last_half_step(&self) -> u32 {
        match self.moves.last() {
            Some(made) => made.half_step_index(),
            None => self.start_half_step() - 1,
        }
    }

    /// Append a made move. The move's ply must be exactly the next one.
    pub fn add(&mut self, made: MadeMove) -> Result<(), ChessError> {
        let expected = self.last_half_step() + 1;
        let actual = made.half_step_index();
        if actual != expected {
            return Err(ChessError::InvariantViolation(format!(
                "expected half step {expected}, got {actual}"
            )));
        }
        *self
            .repetitions
            .entry(made.position_after.reduced_signature())
            .or_insert(0) += 1;
        self.moves.push(made);
        Ok(())
    }

    /// Remove and return the latest move, unwinding its repetition count.
    pub fn pop(&mut self) -> Result<MadeMove, ChessError> {
        let made = self.moves.pop().ok_or(ChessError::NothingToUndo)?;
        if let Some(count) = self
            .repetitions
            .get_mut(&made.position_after.reduced_signature())
        {
            *count = count.saturating_sub(1);
        }
        Ok(made)
    }

    /// The move at a given ply, if recorded.
    pub fn get(&self, half_step: u32) -> Option<&MadeMove> {
        let start = self.start_half_step();
        if half_step < start {
            return None;
        }
        self.moves.get((half_step - start) as usize)
    }

    /// The position the move at `half_step` was played from. Any ply at or
    /// before the first move answers the start position; a ply more than
    /// one past the latest move is out of range.
    pub fn position_before(&self, half_step: u32) -> Result<&PositionRecord, ChessError> {
        let start = self.start_half_step();
        if half_step <= start {
            return Ok(&self.start_position);
        }
        if half_step > self.last_half_step() + 1 {
            return Err(ChessError::InvariantViolation(format!(
                "no position recorded before half step {half_step}"
            )));
        }
        match self.get(half_step - 1) {
            Some(made) => Ok(&made.position_after),
            None => Ok(&self.start_position),
        }
    }

    /// How many times the position reached by `made` has occurred, start
    /// position included.
    pub fn position_repetitions(&self, made: &MadeMove) -> u32 {
        self.repetitions
            .get(&made.position_after.reduced_signature())
            .copied()
            .unwrap_or(0)
    }

    /// Attach an alternate line branching after ply `at_half_step`.
    ///
    /// The variation's start position must equal the parent's position at
    /// that ply exactly, counters included.
    pub fn add_variation(
        &mut self,
        at_half_step: u32,
        variation: MoveHistory,
    ) -> Result<(), ChessError> {
        let anchor = if at_half_step < self.start_half_step() {
            &self.start_position
        } else {
            &self
                .get(at_half_step)
                .ok_or_else(|| {
                    ChessError::InvariantViolation(format!(
                        "no move at half step {at_half_step} to branch from"
                    ))
                })?
                .position_after
        };
        if anchor.to_fen() != variation.start_position.to_fen() {
            return Err(ChessError::InvariantViolation(format!(
                "variation start '{}' does not match position at half step {at_half_step}",
                variation.start_position.to_fen()
            )));
        }
        self.variations
            .entry(at_half_step)
            .or_default()
            .push(variation);
        Ok(())
    }

    /// Alternate lines branching after ply `at_half_step`.
    pub fn variations_at(&self, at_half_step: u32) -> &[MoveHistory] {
        self.variations
            .get(&at_half_step)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
