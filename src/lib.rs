//! A chess rules engine.
//!
//! Given a board position this crate enumerates legal moves, applies and
//! reverses them, and maintains the authoritative game state: check,
//! checkmate, stalemate, threefold repetition, and the fifty-move rule.
//! It is the substrate a UI, a notation layer, or a PGN reader/writer
//! builds on: it computes legality and state transitions, not "best move".
//!
//! The board is kept in a dual representation: the 64 logical squares
//! ([`engine::board::Board64`]) and a 12×12 padded grid
//! ([`engine::board::Board144`]) whose border cells make ray and offset
//! arithmetic branch-free. [`engine::arbiter::MoveArbiter`] is the only
//! component that mutates the live board/position pair; [`engine::game::Game`]
//! adds history, repetition tracking, and the terminal-state machine on top.
//!
//! ```
//! use chess_arbiter::engine::game::Game;
//! use chess_arbiter::engine::moves::MoveIntent;
//!
//! let mut game = Game::new();
//! let mv = game.find_move(MoveIntent::parse("e2e4").unwrap()).unwrap();
//! let position = game.make_move(&mv).unwrap();
//! assert_eq!(position.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
//! ```

pub mod config;
pub mod engine;
