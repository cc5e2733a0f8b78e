pub mod arbiter;
pub mod board;
pub mod game;
pub mod history;
pub mod material;
pub mod movegen;
pub mod moves;
pub mod position;
pub mod square;
pub mod types;

pub use arbiter::MoveArbiter;
pub use board::{Board64, Board144};
pub use game::Game;
pub use history::{MadeMove, MoveHistory};
pub use material::MaterialScores;
pub use movegen::MoveGen;
pub use moves::{CastlesType, Move, MoveIntent, MoveKind, MoveStep};
pub use position::PositionRecord;
pub use square::Square;
pub use types::*;
