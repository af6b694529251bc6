pub mod attacks;
pub mod board;
pub mod fen;
pub mod game;
pub mod legal;
pub mod movegen;
pub mod san;
pub mod types;

pub use board::Board;
pub use fen::STARTING_FEN;
pub use game::{Game, GameRecord};
pub use legal::{legal_moves, legal_moves_from};
pub use types::*;
