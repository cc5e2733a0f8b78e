//! The move arbiter: legality filtering, make/unmake, and position
//! bookkeeping.
//!
//! The arbiter is the only component that mutates the live board/position
//! pair. Legality is decided by simulation: apply the move's steps inside
//! a [`StepGuard`], probe the relevant squares for attacks, and let the
//! guard roll the board back on every exit path.

use tracing::debug;

use crate::engine::board::Board144;
use crate::engine::history::{MadeMove, MoveHistory};
use crate::engine::movegen::MoveGen;
use crate::engine::moves::{Move, MoveKind, MoveStep};
use crate::engine::position::PositionRecord;
use crate::engine::square::Square;
use crate::engine::types::{CastlingRights, ChessError, Color, PieceType};

// ---------------------------------------------------------------------------
// StepGuard
// ---------------------------------------------------------------------------

/// Scoped board mutation: applies a move's steps on construction and
/// replays the undo steps on drop, early returns included.
struct StepGuard<'a> {
    board: &'a mut Board144,
    undo: Vec<MoveStep>,
}

impl<'a> StepGuard<'a> {
    fn apply(board: &'a mut Board144, mv: &Move) -> Self {
        let undo = mv.undo_steps();
        board.apply_steps(&mv.apply_steps());
        StepGuard { board, undo }
    }

    fn board(&self) -> &Board144 {
        self.board
    }
}

impl Drop for StepGuard<'_> {
    fn drop(&mut self) {
        let undo = std::mem::take(&mut self.undo);
        self.board.apply_steps(&undo);
    }
}

// ---------------------------------------------------------------------------
// MoveArbiter
// ---------------------------------------------------------------------------

/// Owns the live board and position and decides what is legal on them.
#[derive(Clone, Debug)]
pub struct MoveArbiter {
    board: Board144,
    position: PositionRecord,
}

impl MoveArbiter {
    /// Arbiter over the standard starting position.
    pub fn starting() -> Self {
        MoveArbiter {
            board: Board144::starting(),
            position: PositionRecord::start(),
        }
    }

    /// Arbiter over an arbitrary position.
    pub fn from_position(position: PositionRecord) -> Result<Self, ChessError> {
        let board = position.board()?;
        Ok(MoveArbiter { board, position })
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        MoveArbiter::from_position(PositionRecord::from_fen(fen)?)
    }

    pub fn position(&self) -> &PositionRecord {
        &self.position
    }

    pub fn board(&self) -> &Board144 {
        &self.board
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.board.king_square(color)
    }

    /// The attack probe against the live board.
    pub fn is_square_threatened_by(&self, square: Square, color: Color) -> bool {
        MoveGen::new(&self.board).is_square_threatened_by(square, color)
    }

    /// Pseudo-legal moves from `square` under the current position.
    pub fn pseudo_legal_moves(&self, square: Square) -> Result<Vec<Move>, ChessError> {
        MoveGen::new(&self.board).pseudo_legal_moves(
            square,
            self.position.en_passant,
            self.position.castling,
        )
    }

    /// Would `mv` be legal on the current board?
    ///
    /// Simulates the move, checks king safety (or path safety for
    /// castling), and restores the board before returning. King captures
    /// are rejected without simulation.
    pub fn is_move_legal(&mut self, mv: &Move) -> bool {
        if mv.captured.is_some_and(|p| p.piece_type == PieceType::King) {
            return false;
        }

        let moving = mv.color();
        let enemy = !moving;
        let guard = StepGuard::apply(&mut self.board, mv);
        match mv.kind {
            MoveKind::Castles(ct) => {
                let probe = MoveGen::new(guard.board());
                ct.must_be_safe
                    .iter()
                    .all(|&sq| !probe.is_square_threatened_by(sq, enemy))
            }
            _ => match guard.board().king_square(moving) {
                Some(king) => !MoveGen::new(guard.board()).is_square_threatened_by(king, enemy),
                // Kingless boards (constructed puzzles) skip the check.
                None => true,
            },
        }
    }

    /// Legal moves from `square`.
    pub fn legal_moves(&mut self, square: Square) -> Result<Vec<Move>, ChessError> {
        self.legal_moves_where(square, |_| true)
    }

    /// Legal moves from `square`, pre-narrowed by `filter` before the
    /// legality simulation is paid for.
    pub fn legal_moves_where(
        &mut self,
        square: Square,
        filter: impl Fn(&Move) -> bool,
    ) -> Result<Vec<Move>, ChessError> {
        let moves = self.pseudo_legal_moves(square)?;
        Ok(moves
            .into_iter()
            .filter(|mv| filter(mv) && self.is_move_legal(mv))
            .collect())
    }

    /// Does the piece on `square` have any legal move? Empty squares have
    /// none.
    pub fn has_legal_move_from(&mut self, square: Square) -> bool {
        let Ok(moves) = self.pseudo_legal_moves(square) else {
            return false;
        };
        moves.iter().any(|mv| {
            // Short-circuits on the first legal move.
            self.is_move_legal(mv)
        })
    }

    /// Does `color` have any legal move anywhere? Drives mate/stalemate.
    pub fn does_player_have_legal_moves(&mut self, color: Color) -> bool {
        let squares: Vec<Square> = self.board.pieces_of(color).map(|(sq, _)| sq).collect();
        squares.into_iter().any(|sq| self.has_legal_move_from(sq))
    }

    /// Perform `mv` on the live board and advance the position record.
    ///
    /// Legality is not re-checked here; feed it moves that passed
    /// [`MoveArbiter::is_move_legal`]. Returns the new position snapshot.
    pub fn make_move(&mut self, mv: &Move) -> PositionRecord {
        self.board.make_move(mv);
        self.advance_position(mv);
        debug!(mv = %mv, fen = %self.position.to_fen(), "move made");
        self.position.clone()
    }

    /// Reverse a previously-made move. `position_before` is the snapshot
    /// taken before the move and becomes the live record as-is.
    pub fn un_make_move(&mut self, mv: &Move, position_before: PositionRecord) {
        self.board.un_make_move(mv);
        debug!(mv = %mv, fen = %position_before.to_fen(), "move unmade");
        self.position = position_before;
    }

    /// Threefold repetition: the position after `made` has now occurred at
    /// least `count` times in `history`.
    pub fn does_move_draw_by_repetition(
        &self,
        history: &MoveHistory,
        made: &MadeMove,
        count: u32,
    ) -> bool {
        history.position_repetitions(made) >= count
    }

    /// Fifty-move rule: the half-move clock after `made` has reached the
    /// configured threshold.
    pub fn does_move_draw_by_fifty_moves(&self, made: &MadeMove, threshold: u16) -> bool {
        made.position_after.halfmove_clock >= threshold
    }

    // -- position bookkeeping ----------------------------------------------

    fn advance_position(&mut self, mv: &Move) {
        let moving = mv.color();
        let enemy = !moving;

        // Counters first: the full-move counter ticks when Black has just
        // moved, read off the pre-switch side to move.
        if self.position.side_to_move == Color::Black {
            self.position.fullmove_number += 1;
        }
        if mv.resets_halfmove_clock() {
            self.position.halfmove_clock = 0;
        } else {
            self.position.halfmove_clock += 1;
        }

        self.position.side_to_move = enemy;
        self.position.placement = self.board.to_placement();
        self.position.en_passant = match mv.kind {
            MoveKind::DoublePawnPush => Some(Square::from_col_row(
                mv.to.col(),
                (mv.from.row() + mv.to.row()) / 2,
            )),
            _ => None,
        };
        self.revoke_castling_rights(mv);

        let is_check = match self.board.king_square(enemy) {
            Some(king) => MoveGen::new(&self.board).is_square_threatened_by(king, moving),
            None => false,
        };
        let opponent_has_moves = self.does_player_have_legal_moves(enemy);
        self.position.is_check = is_check;
        self.position.is_mate = !opponent_has_moves && is_check;
        self.position.is_stalemate = !opponent_has_moves && !is_check;
    }

    fn revoke_castling_rights(&mut self, mv: &Move) {
        if self.position.castling.is_empty() {
            return;
        }

        // Capturing a rook on its home square revokes the victim's right.
        if let Some(captured) = mv.captured
            && captured.piece_type == PieceType::Rook
            && let Some(flag) = rook_home_right(mv.to, captured.color)
        {
            self.position.castling.remove(flag);
        }

        match mv.piece.piece_type {
            PieceType::King => {
                let home = match mv.color() {
                    Color::White => Square::E1,
                    Color::Black => Square::E8,
                };
                if mv.from == home {
                    self.position
                        .castling
                        .remove(CastlingRights::color_flags(mv.color()));
                }
            }
            PieceType::Rook => {
                if let Some(flag) = rook_home_right(mv.from, mv.color()) {
                    self.position.castling.remove(flag);
                }
            }
            _ => {}
        }
    }
}

impl Default for MoveArbiter {
    fn default() -> Self {
        MoveArbiter::starting()
    }
}

/// The castling right tied to a rook home square, if `square` is one.
fn rook_home_right(square: Square, color: Color) -> Option<u8> {
    match (color, square) {
        (Color::White, Square::A1) => Some(CastlingRights::WHITE_QUEENSIDE),
        (Color::White, Square::H1) => Some(CastlingRights::WHITE_KINGSIDE),
        (Color::Black, Square::A8) => Some(CastlingRights::BLACK_QUEENSIDE),
        (Color::Black, Square::H8) => Some(CastlingRights::BLACK_KINGSIDE),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Piece;

    fn arbiter(fen: &str) -> MoveArbiter {
        MoveArbiter::from_fen(fen).unwrap()
    }

    fn find_move(arbiter: &mut MoveArbiter, from: &str, to: &str) -> Move {
        let from = Square::from_algebraic(from).unwrap();
        let to = Square::from_algebraic(to).unwrap();
        arbiter
            .pseudo_legal_moves(from)
            .unwrap()
            .into_iter()
            .find(|m| m.to == to)
            .unwrap()
    }

    #[test]
    fn make_move_advances_the_record() {
        let mut arb = MoveArbiter::starting();
        let e4 = find_move(&mut arb, "e2", "e4");
        assert!(arb.is_move_legal(&e4));
        let pos = arb.make_move(&e4);
        assert_eq!(
            pos.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn un_make_restores_board_and_record() {
        let mut arb = MoveArbiter::starting();
        let before_board = arb.board().clone();
        let before_pos = arb.position().clone();
        let e4 = find_move(&mut arb, "e2", "e4");
        arb.make_move(&e4);
        arb.un_make_move(&e4, before_pos.clone());
        assert_eq!(arb.board(), &before_board);
        assert_eq!(arb.position(), &before_pos);
    }

    #[test]
    fn legality_simulation_leaves_no_trace() {
        let mut arb = MoveArbiter::starting();
        let board_before = arb.board().clone();
        for sq in Square::all() {
            if arb.board().get(sq).is_some() {
                let moves = arb.pseudo_legal_moves(sq).unwrap();
                for mv in moves {
                    arb.is_move_legal(&mv);
                }
            }
        }
        assert_eq!(arb.board(), &board_before);
    }

    #[test]
    fn pinned_piece_may_not_move() {
        // Black bishop pins the white knight on d2 against the king.
        let mut arb = arbiter("4k3/8/8/8/1b6/8/3N4/4K3 w - - 0 1");
        let knight_moves = arb.legal_moves(Square::D2).unwrap();
        assert!(knight_moves.is_empty());
        // The king itself can still step aside.
        assert!(arb.has_legal_move_from(Square::E1));
    }

    #[test]
    fn king_may_not_step_into_check() {
        let mut arb = arbiter("4k3/8/8/8/8/8/r7/4K3 w - - 0 1");
        let king_moves = arb.legal_moves(Square::E1).unwrap();
        // d2, e2, f2 are covered by the rook.
        assert!(king_moves.iter().all(|m| m.to.rank() == 1));
        assert!(!king_moves.is_empty());
    }

    #[test]
    fn king_capture_always_rejected() {
        let mut arb = arbiter("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        // Hand-build a rook "capture" of the king; the generator's rays
        // would stop there anyway, the filter must reject it outright.
        let mv = Move::quiet(
            Square::A1,
            Square::E8,
            Piece::new(PieceType::Rook, Color::White),
            Some(Piece::new(PieceType::King, Color::Black)),
        );
        assert!(!arb.is_move_legal(&mv));
    }

    #[test]
    fn castling_through_attack_rejected() {
        // Enemy rook on g8 covers g1.
        let mut arb = arbiter("4k1r1/8/8/8/8/8/8/4K2R w K - 0 1");
        let castles = find_move(&mut arb, "e1", "g1");
        assert!(matches!(castles.kind, MoveKind::Castles(_)));
        assert!(!arb.is_move_legal(&castles));

        // Same geometry without the attacker.
        let mut clear = arbiter("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        let castles = find_move(&mut clear, "e1", "g1");
        assert!(clear.is_move_legal(&castles));
    }

    #[test]
    fn castling_rights_revoked_by_king_and_rook_moves() {
        let mut arb = arbiter("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let rook_lift = find_move(&mut arb, "h1", "h4");
        let pos = arb.make_move(&rook_lift);
        assert_eq!(pos.castling.to_fen(), "Qkq");

        let king_move = find_move(&mut arb, "e8", "e7");
        let pos = arb.make_move(&king_move);
        assert_eq!(pos.castling.to_fen(), "Q");
    }

    #[test]
    fn capturing_home_rook_revokes_victims_right() {
        let mut arb = arbiter("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let capture = find_move(&mut arb, "a1", "a8");
        assert!(capture.is_capture());
        let pos = arb.make_move(&capture);
        // White loses queenside (rook left a1), Black loses queenside
        // (rook captured on a8).
        assert_eq!(pos.castling.to_fen(), "Kk");
    }

    #[test]
    fn halfmove_clock_resets_on_pawn_and_capture() {
        let mut arb = arbiter("4k3/8/8/3p4/4P3/8/8/4K2R w K - 7 20");
        let capture = find_move(&mut arb, "e4", "d5");
        let pos = arb.make_move(&capture);
        assert_eq!(pos.halfmove_clock, 0);
        assert_eq!(pos.fullmove_number, 20);

        let quiet = find_move(&mut arb, "e8", "e7");
        let pos = arb.make_move(&quiet);
        assert_eq!(pos.halfmove_clock, 1);
        assert_eq!(pos.fullmove_number, 21);
    }

    #[test]
    fn en_passant_target_set_and_cleared() {
        let mut arb = MoveArbiter::starting();
        let e4 = find_move(&mut arb, "e2", "e4");
        let pos = arb.make_move(&e4);
        assert_eq!(pos.en_passant, Some(Square::E3));

        let nf6 = find_move(&mut arb, "g8", "f6");
        let pos = arb.make_move(&nf6);
        assert_eq!(pos.en_passant, None);
    }

    #[test]
    fn ladder_mate_sets_the_mate_flag() {
        // Rook on a7 seals rank 7; Rb8 delivers down the open b-file.
        let mut arb = arbiter("4k3/R7/8/8/8/8/1R6/4K3 w - - 0 1");
        let mate = find_move(&mut arb, "b2", "b8");
        let pos = arb.make_move(&mate);
        assert!(pos.is_check);
        assert!(pos.is_mate);
        assert!(!pos.is_stalemate);
    }

    #[test]
    fn stalemate_flagged_without_check() {
        // Qb6 boxes in the king on a8 without giving check.
        let mut arb = arbiter("k7/8/8/8/8/1Q6/8/4K3 w - - 0 1");
        let quiet = find_move(&mut arb, "b3", "b6");
        let pos = arb.make_move(&quiet);
        assert!(!pos.is_check);
        assert!(!pos.is_mate);
        assert!(pos.is_stalemate);
    }

    #[test]
    fn fifty_move_threshold() {
        let arb = MoveArbiter::starting();
        let made = MadeMove::new(
            Move::quiet(
                Square::G1,
                Square::F3,
                Piece::new(PieceType::Knight, Color::White),
                None,
            ),
            PositionRecord::from_fen("4k3/8/8/8/8/5N2/8/4K3 b - - 50 80").unwrap(),
        );
        assert!(arb.does_move_draw_by_fifty_moves(&made, 50));
        assert!(!arb.does_move_draw_by_fifty_moves(&made, 100));
    }
}
