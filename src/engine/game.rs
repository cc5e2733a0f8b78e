//! The game layer: arbiter plus history, material, and the terminal-state
//! machine.
//!
//! A [`Game`] is the high-level surface. It resolves move intents against
//! the legal move list, drives the arbiter, records history, keeps the
//! material count, and latches the outcome; once an outcome is set, no
//! further moves are accepted.

use tracing::debug;

use crate::config::RuleConfig;
use crate::engine::arbiter::MoveArbiter;
use crate::engine::board::Board144;
use crate::engine::history::{MadeMove, MoveHistory};
use crate::engine::material::MaterialScores;
use crate::engine::moves::{Move, MoveIntent, MoveKind};
use crate::engine::position::PositionRecord;
use crate::engine::square::Square;
use crate::engine::types::{ChessError, Color, DrawKind, Outcome};

/// A chess game in progress or finished.
#[derive(Clone, Debug)]
pub struct Game {
    arbiter: MoveArbiter,
    history: MoveHistory,
    material: Option<MaterialScores>,
    outcome: Option<Outcome>,
    config: RuleConfig,
}

impl Game {
    /// A new game from the standard starting position.
    pub fn new() -> Self {
        let arbiter = MoveArbiter::starting();
        Game::from_arbiter(arbiter, RuleConfig::default())
    }

    /// A game from an arbitrary FEN position.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let arbiter = MoveArbiter::from_fen(fen)?;
        Ok(Game::from_arbiter(arbiter, RuleConfig::default()))
    }

    /// Replace the draw-rule thresholds.
    pub fn with_config(mut self, config: RuleConfig) -> Self {
        self.config = config;
        self
    }

    /// Drop the running material count.
    pub fn without_material_count(mut self) -> Self {
        self.material = None;
        self
    }

    fn from_arbiter(arbiter: MoveArbiter, config: RuleConfig) -> Self {
        let material = MaterialScores::count(arbiter.board().inner());
        let history = MoveHistory::new(arbiter.position().clone());
        Game {
            arbiter,
            history,
            material: Some(material),
            outcome: None,
            config,
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn position(&self) -> &PositionRecord {
        self.arbiter.position()
    }

    pub fn board(&self) -> &Board144 {
        self.arbiter.board()
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn material(&self) -> Option<MaterialScores> {
        self.material
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn side_to_move(&self) -> Color {
        self.position().side_to_move
    }

    /// Debug rendering of the current board.
    pub fn render(&self) -> String {
        self.board().render()
    }

    // -- moves --------------------------------------------------------------

    /// Legal moves from one square.
    pub fn legal_moves(&mut self, square: Square) -> Result<Vec<Move>, ChessError> {
        self.arbiter.legal_moves(square)
    }

    /// Resolve an intent to a concrete legal move, applying its promotion
    /// choice when the matched move is a promotion.
    pub fn find_move(&mut self, intent: MoveIntent) -> Result<Move, ChessError> {
        let moves = self
            .arbiter
            .legal_moves_where(intent.from, |mv| intent.matches(mv))?;
        let mv = moves.into_iter().next().ok_or_else(|| ChessError::IllegalMove {
            from: intent.from.to_algebraic(),
            to: intent.to.to_algebraic(),
            reason: "no legal move between those squares".to_string(),
        })?;
        Ok(match (intent.promotion, mv.kind) {
            (Some(promote_to), MoveKind::Promotion { .. }) => mv.with_promotion(promote_to),
            _ => mv,
        })
    }

    /// Play a move. It must be legal in the current position; the game
    /// must still be in progress. Returns the new position snapshot.
    pub fn make_move(&mut self, mv: &Move) -> Result<PositionRecord, ChessError> {
        if let Some(outcome) = self.outcome {
            return Err(ChessError::GameOver(outcome.to_string()));
        }
        if !self.arbiter.is_move_legal(mv) {
            return Err(ChessError::IllegalMove {
                from: mv.from.to_algebraic(),
                to: mv.to.to_algebraic(),
                reason: "move fails the legality filter".to_string(),
            });
        }

        let position = self.arbiter.make_move(mv);
        if let Some(material) = &mut self.material {
            material.on_move(mv);
        }
        self.history.add(MadeMove::new(*mv, position.clone()))?;
        self.determine_outcome();
        Ok(position)
    }

    /// Take back the last move, restoring board, position, material, and
    /// any board-derived outcome.
    pub fn undo_last_move(&mut self) -> Result<(), ChessError> {
        let made = self.history.pop()?;
        let position_before = self
            .history
            .position_before(made.half_step_index())?
            .clone();
        self.arbiter.un_make_move(&made.mv, position_before);
        if let Some(material) = &mut self.material {
            material.on_un_move(&made.mv);
        }
        // Mate, stalemate, and the draw rules are functions of the moves
        // on the board; taking one back un-finishes the game. Manual
        // terminations stand.
        if let Some(
            Outcome::Checkmate { .. } | Outcome::Draw(DrawKind::Stalemate)
            | Outcome::Draw(DrawKind::ThreefoldRepetition)
            | Outcome::Draw(DrawKind::FiftyMoveRule),
        ) = self.outcome
        {
            self.outcome = None;
        }
        Ok(())
    }

    // -- terminations -------------------------------------------------------

    /// `color` resigns; the other side wins.
    pub fn resign(&mut self, color: Color) -> Result<Outcome, ChessError> {
        self.terminate(Outcome::Resignation { winner: !color })
    }

    /// `color` loses on time.
    pub fn flag_out_of_time(&mut self, color: Color) -> Result<Outcome, ChessError> {
        self.terminate(Outcome::Timeout { winner: !color })
    }

    /// Both players agree to a draw.
    pub fn agree_draw(&mut self) -> Result<Outcome, ChessError> {
        self.terminate(Outcome::Draw(DrawKind::Agreed))
    }

    fn terminate(&mut self, outcome: Outcome) -> Result<Outcome, ChessError> {
        if let Some(existing) = self.outcome {
            return Err(ChessError::GameOver(existing.to_string()));
        }
        debug!(outcome = %outcome, "game terminated");
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    // -- variations ---------------------------------------------------------

    /// A fresh game branching from the current position, with the same
    /// rule configuration. Attach its finished line back with
    /// [`Game::attach_variation`].
    pub fn make_variation(&self) -> Result<Game, ChessError> {
        let arbiter = MoveArbiter::from_position(self.position().clone())?;
        let mut game = Game::from_arbiter(arbiter, self.config.clone());
        if self.material.is_none() {
            game.material = None;
        }
        Ok(game)
    }

    /// Attach `variation`'s move history as an alternate line. The anchor
    /// ply comes from the variation's own start position, which must match
    /// this game's position at that ply exactly.
    pub fn attach_variation(&mut self, variation: &Game) -> Result<(), ChessError> {
        let at_half_step = variation.history.start_position().half_step_counter() - 1;
        self.history
            .add_variation(at_half_step, variation.history.clone())
    }

    // -- outcome ------------------------------------------------------------

    fn determine_outcome(&mut self) {
        // History is never empty here; make_move just appended.
        let Some(made) = self.history.last() else {
            return;
        };
        let position = &made.position_after;

        let outcome = if position.is_mate {
            Some(Outcome::Checkmate {
                winner: made.mv.color(),
            })
        } else if position.is_stalemate {
            Some(Outcome::Draw(DrawKind::Stalemate))
        } else if self.arbiter.does_move_draw_by_repetition(
            &self.history,
            made,
            self.config.repetition_draw_count,
        ) {
            Some(Outcome::Draw(DrawKind::ThreefoldRepetition))
        } else if self
            .arbiter
            .does_move_draw_by_fifty_moves(made, self.config.halfmove_draw_threshold)
        {
            Some(Outcome::Draw(DrawKind::FiftyMoveRule))
        } else {
            None
        };

        if let Some(outcome) = outcome {
            debug!(outcome = %outcome, "game over");
            self.outcome = Some(outcome);
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
