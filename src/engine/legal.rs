//! Legal move filtering.
//!
//! Pipeline:
//!   1. Generate pseudo-legal moves (`movegen`).
//!   2. Filter: apply each candidate to a clone of the board and drop it if
//!      the mover's king is attacked afterwards.
//!
//! This clone-apply-discard test is the only definition of legality in the
//! crate; nothing else decides whether a move is allowed.

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::types::{Color, Move, Square};

// =========================================================================
// Public API
// =========================================================================

/// All legal moves for `color` in `board`. Empty unless `color` is the side
/// to move: the other side never has a move to play, and its "moves" could
/// capture a king in check.
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    if color != board.side_to_move {
        return Vec::new();
    }
    retain_legal(board, movegen::pseudo_legal_moves(board, color))
}

/// Legal moves of the piece on `from`; empty if the square is empty or the
/// piece is not on the side to move.
pub fn legal_moves_from(board: &Board, from: Square) -> Vec<Move> {
    retain_legal(board, movegen::pseudo_legal_moves_from(board, from))
}

/// Does playing `mv` leave the mover's own king attacked?
pub fn leaves_king_in_check(board: &Board, mv: Move) -> bool {
    let us = mv.piece.color;
    let after = board.apply(mv);
    attacks::is_in_check(&after, us)
}

/// Does `color` have at least one legal move?
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    color == board.side_to_move
        && movegen::pseudo_legal_moves(board, color)
            .into_iter()
            .any(|mv| !leaves_king_in_check(board, mv))
}

fn retain_legal(board: &Board, mut moves: Vec<Move>) -> Vec<Move> {
    moves.retain(|&mv| !leaves_king_in_check(board, mv));
    moves
}

// =========================================================================
// Tests
// =========================================================================
