//! Rules scenarios: end-to-end checks of legality, state transitions, and
//! draw/mate detection through the public `Game` and `MoveArbiter` APIs.

use chess_arbiter::engine::arbiter::MoveArbiter;
use chess_arbiter::engine::game::Game;
use chess_arbiter::engine::moves::{MoveIntent, MoveKind};
use chess_arbiter::engine::position::PositionRecord;
use chess_arbiter::engine::square::Square;
use chess_arbiter::engine::types::{Color, DrawKind, Outcome, Piece, PieceType};

fn play(game: &mut Game, coordinate: &str) -> PositionRecord {
    let mv = game
        .find_move(MoveIntent::parse(coordinate).unwrap())
        .unwrap();
    game.make_move(&mv).unwrap()
}

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

// =====================================================================
// Opening bookkeeping
// =====================================================================

#[test]
fn italian_opening_counters() {
    let mut game = Game::new();
    play(&mut game, "e2e4");
    play(&mut game, "e7e5");
    let pos = play(&mut game, "g1f3");

    assert_eq!(pos.side_to_move, Color::Black);
    assert_eq!(pos.halfmove_clock, 1);
    assert_eq!(pos.fullmove_number, 2);
    assert_eq!(pos.en_passant, None);
    assert_eq!(
        pos.to_fen(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
    );
}

// =====================================================================
// Mate and stalemate detection
// =====================================================================

#[test]
fn smothered_mate_has_no_replies() {
    let mut arbiter =
        MoveArbiter::from_fen("6rk/pp3Npp/8/8/8/8/PPP2PPP/RNBQKBNR b KQ - 0 1").unwrap();
    let king = arbiter.king_square(Color::Black).unwrap();
    assert!(arbiter.is_square_threatened_by(king, Color::White));
    assert!(!arbiter.does_player_have_legal_moves(Color::Black));
}

#[test]
fn stalemate_has_no_replies_and_no_check() {
    let mut arbiter = MoveArbiter::from_fen("7k/5K1P/6P1/8/8/8/8/8 b - - 0 1").unwrap();
    let king = arbiter.king_square(Color::Black).unwrap();
    assert!(!arbiter.is_square_threatened_by(king, Color::White));
    assert!(!arbiter.does_player_have_legal_moves(Color::Black));
}

#[test]
fn no_legal_moves_is_exactly_mate_or_stalemate() {
    // Mate: flagged check; stalemate: flagged no-check. Never both.
    let mate = PositionRecord::from_fen("6rk/pp3Qpp/8/8/8/8/PPP2PPP/RNB1KBNR b KQ - 0 1 1 1 0")
        .unwrap();
    assert!(mate.is_mate && mate.is_check && !mate.is_stalemate);

    let stale =
        PositionRecord::from_fen("7k/5K1P/6P1/8/8/8/8/8 b - - 0 1 0 0 1").unwrap();
    assert!(stale.is_stalemate && !stale.is_check && !stale.is_mate);
}

// =====================================================================
// Castling safety
// =====================================================================

#[test]
fn castling_rejected_while_path_is_attacked() {
    // Black rook on g8 covers g1.
    let mut arbiter = MoveArbiter::from_fen("4k1r1/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    let moves = arbiter.legal_moves(sq("e1")).unwrap();
    assert!(moves.iter().all(|m| !matches!(m.kind, MoveKind::Castles(_))));

    // Rook on f8 covers f1, the crossed square.
    let mut arbiter = MoveArbiter::from_fen("4kr2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    let moves = arbiter.legal_moves(sq("e1")).unwrap();
    assert!(moves.iter().all(|m| !matches!(m.kind, MoveKind::Castles(_))));

    // Without the attacker, castling is back.
    let mut arbiter = MoveArbiter::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    let moves = arbiter.legal_moves(sq("e1")).unwrap();
    assert!(moves.iter().any(|m| matches!(m.kind, MoveKind::Castles(_))));
}

// =====================================================================
// Threefold repetition
// =====================================================================

#[test]
fn king_shuffle_triggers_threefold_on_the_third_occurrence() {
    let mut game = Game::new();
    play(&mut game, "e2e4");
    play(&mut game, "e7e5");

    let shuffle = [
        "e1e2", "e8e7", "e2e1", "e7e8", // first cycle, rights evaporate
        "e1e2", "e8e7", "e2e1", "e7e8", // second cycle
        "e1e2", "e8e7", // third occurrence of the post-Ke7 position
    ];
    for (i, coordinate) in shuffle.iter().enumerate() {
        assert_eq!(game.outcome(), None, "ended early after {i} shuffle moves");
        play(&mut game, coordinate);
    }
    assert_eq!(
        game.outcome(),
        Some(Outcome::Draw(DrawKind::ThreefoldRepetition))
    );
}

#[test]
fn repetition_signature_distinguishes_castling_rights() {
    // The board after the fifth shuffle move matches the one after the
    // first, but the first still carried Black's castling rights, so the
    // two occurrences count separately and no signature reaches three.
    let mut game = Game::new();
    play(&mut game, "e2e4");
    play(&mut game, "e7e5");
    for coordinate in ["e1e2", "e8e7", "e2e1", "e7e8", "e1e2", "e8e7", "e2e1"] {
        play(&mut game, coordinate);
    }
    assert_eq!(game.outcome(), None);
}

// =====================================================================
// En passant
// =====================================================================

#[test]
fn en_passant_removes_the_bypassing_pawn_and_undo_restores_it() {
    let mut game = Game::new();
    play(&mut game, "e2e4");
    play(&mut game, "a7a6");
    play(&mut game, "e4e5");
    let pos = play(&mut game, "d7d5");
    assert_eq!(pos.en_passant, Some(sq("d6")));

    let capture = game.find_move(MoveIntent::parse("e5d6").unwrap()).unwrap();
    assert_eq!(
        capture.kind,
        MoveKind::EnPassant {
            captured_square: sq("d5")
        }
    );
    game.make_move(&capture).unwrap();

    // The victim disappears from d5, not d6.
    assert_eq!(game.board().get(sq("d5")), None);
    assert_eq!(
        game.board().get(sq("d6")),
        Some(Piece::new(PieceType::Pawn, Color::White))
    );

    game.undo_last_move().unwrap();
    assert_eq!(
        game.board().get(sq("d5")),
        Some(Piece::new(PieceType::Pawn, Color::Black))
    );
    assert_eq!(game.board().get(sq("d6")), None);
    assert_eq!(
        game.board().get(sq("e5")),
        Some(Piece::new(PieceType::Pawn, Color::White))
    );
}

#[test]
fn en_passant_window_closes_after_one_ply() {
    let mut game = Game::new();
    play(&mut game, "e2e4");
    play(&mut game, "a7a6");
    play(&mut game, "e4e5");
    play(&mut game, "d7d5");
    // White declines the capture.
    play(&mut game, "b1c3");
    play(&mut game, "a6a5");
    // The target is gone; exd6 is no longer available.
    assert!(
        game.find_move(MoveIntent::parse("e5d6").unwrap())
            .is_err()
    );
}

// =====================================================================
// Apply/undo inverse law
// =====================================================================

#[test]
fn every_legal_move_applies_and_undoes_cleanly() {
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1",
    ];
    for fen in fens {
        let mut arbiter = MoveArbiter::from_fen(fen).unwrap();
        let board_before = arbiter.board().clone();
        let position_before = arbiter.position().clone();
        let color = position_before.side_to_move;

        let squares: Vec<Square> = arbiter
            .board()
            .pieces_of(color)
            .map(|(square, _)| square)
            .collect();
        for square in squares {
            for mv in arbiter.legal_moves(square).unwrap() {
                arbiter.make_move(&mv);
                arbiter.un_make_move(&mv, position_before.clone());
                assert_eq!(arbiter.board(), &board_before, "board desync after {mv}");
                assert_eq!(
                    arbiter.position(),
                    &position_before,
                    "position desync after {mv}"
                );
            }
        }
    }
}

// =====================================================================
// Legality soundness
// =====================================================================

#[test]
fn accepted_moves_never_leave_the_king_in_check() {
    let fens = [
        // White in check from the h4 bishop; only king moves escape.
        "4k3/8/8/8/7b/8/3N4/4K3 w - - 0 1",
        "4k3/8/8/8/1b6/8/3N4/4K3 w - - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ];
    for fen in fens {
        let mut arbiter = MoveArbiter::from_fen(fen).unwrap();
        let color = arbiter.position().side_to_move;
        let position_before = arbiter.position().clone();
        let squares: Vec<Square> = arbiter
            .board()
            .pieces_of(color)
            .map(|(square, _)| square)
            .collect();
        for square in squares {
            for mv in arbiter.legal_moves(square).unwrap() {
                arbiter.make_move(&mv);
                if !matches!(mv.kind, MoveKind::Castles(_)) {
                    let king = arbiter.king_square(color).unwrap();
                    assert!(
                        !arbiter.is_square_threatened_by(king, !color),
                        "{mv} leaves the king attacked in {fen}"
                    );
                }
                arbiter.un_make_move(&mv, position_before.clone());
            }
        }
    }
}

#[test]
fn king_capture_is_never_legal() {
    let mut arbiter = MoveArbiter::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
    let mv = chess_arbiter::engine::moves::Move::quiet(
        sq("a1"),
        sq("e8"),
        Piece::new(PieceType::Rook, Color::White),
        Some(Piece::new(PieceType::King, Color::Black)),
    );
    assert!(!arbiter.is_move_legal(&mv));
}

// =====================================================================
// Fifty-move rule
// =====================================================================

#[test]
fn halfmove_clock_draw_at_the_default_threshold() {
    // Clock already at 49; one more quiet move reaches 50.
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/4KN2 w - - 49 80").unwrap();
    play(&mut game, "f1d2");
    assert_eq!(game.position().halfmove_clock, 50);
    assert_eq!(game.outcome(), Some(Outcome::Draw(DrawKind::FiftyMoveRule)));

    // A pawn move or capture resets the count instead.
    let mut game = Game::from_fen("4k3/8/8/8/8/8/4P3/4KN2 w - - 49 80").unwrap();
    play(&mut game, "e2e4");
    assert_eq!(game.position().halfmove_clock, 0);
    assert_eq!(game.outcome(), None);
}
