//! Pseudo-legal move generation.
//!
//! Produces every move that obeys a piece's movement pattern and board
//! occupancy, without asking whether the mover's own king is left in check.
//! The one exception is castling, whose attack-free path condition is part
//! of the move's pattern and is checked here through `attacks`.
//!
//! Legality filtering lives in `legal`.

use crate::engine::attacks::{self, DIAGONAL, ORTHOGONAL};
use crate::engine::board::Board;
use crate::engine::types::{Color, Move, MoveFlag, Piece, PieceType, Square};

// =========================================================================
// Public API
// =========================================================================

/// Pseudo-legal moves of the piece on `from`.
///
/// Empty if the square is empty or holds a piece of the side not to move.
pub fn pseudo_legal_moves_from(board: &Board, from: Square) -> Vec<Move> {
    let mut moves = Vec::with_capacity(32);
    if let Some(piece) = board.piece_at(from)
        && piece.color == board.side_to_move
    {
        generate_for_piece(board, from, piece, &mut moves);
    }
    moves
}

/// Pseudo-legal moves of every piece of `color`.
pub fn pseudo_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(256);
    for (from, piece) in board.pieces_of(color) {
        generate_for_piece(board, from, piece, &mut moves);
    }
    moves
}

fn generate_for_piece(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    match piece.kind {
        PieceType::Pawn => generate_pawn_moves(board, from, piece, moves),
        PieceType::Knight => generate_knight_moves(board, from, piece, moves),
        PieceType::Bishop => generate_slider_moves(board, from, piece, &DIAGONAL, moves),
        PieceType::Rook => generate_slider_moves(board, from, piece, &ORTHOGONAL, moves),
        PieceType::Queen => {
            generate_slider_moves(board, from, piece, &ORTHOGONAL, moves);
            generate_slider_moves(board, from, piece, &DIAGONAL, moves);
        }
        PieceType::King => {
            generate_king_moves(board, from, piece, moves);
            generate_castling_moves(board, from, piece, moves);
        }
    }
}

// =========================================================================
// Pawn moves
// =========================================================================

fn generate_pawn_moves(board: &Board, from: Square, pawn: Piece, moves: &mut Vec<Move>) {
    let us = pawn.color;
    let dir = us.forward();
    let start_rank = (us.back_rank() as i8 + dir) as u8;
    let promo_rank = (!us).back_rank();

    // --- Single push ---
    if let Some(to) = from.offset(0, dir)
        && board.is_empty(to)
    {
        if to.rank() == promo_rank {
            add_promotions(from, to, pawn, None, moves);
        } else {
            moves.push(Move::new(from, to, pawn, None));
        }

        // --- Double push ---
        if from.rank() == start_rank
            && let Some(to2) = to.offset(0, dir)
            && board.is_empty(to2)
        {
            moves.push(Move::with_flag(from, to2, pawn, None, MoveFlag::DoublePawnStep));
        }
    }

    // --- Captures (including promotion captures) ---
    for to in attacks::tables().pawn_attacks(us, from).iter() {
        match board.piece_at(to) {
            Some(target) if target.color != us => {
                if to.rank() == promo_rank {
                    add_promotions(from, to, pawn, Some(target), moves);
                } else {
                    moves.push(Move::new(from, to, pawn, Some(target)));
                }
            }
            Some(_) => {}
            None if board.en_passant == Some(to) && board.side_to_move == us => {
                // The target is only set on the ply right after the enemy
                // double step, so its presence is the timing check.
                let victim = Square::from_file_rank(to.file(), from.rank());
                if let Some(captured) = board.piece_at(victim)
                    && captured == Piece::new(PieceType::Pawn, !us)
                {
                    moves.push(Move::with_flag(
                        from,
                        to,
                        pawn,
                        Some(captured),
                        MoveFlag::EnPassantCapture,
                    ));
                }
            }
            None => {}
        }
    }
}

/// Add one move per promotable piece type for a pawn reaching the last rank.
fn add_promotions(
    from: Square,
    to: Square,
    pawn: Piece,
    captured: Option<Piece>,
    moves: &mut Vec<Move>,
) {
    for promo in PieceType::PROMOTIONS {
        moves.push(Move::with_flag(from, to, pawn, captured, MoveFlag::PromoteTo(promo)));
    }
}

// =========================================================================
// Knight and king (leapers)
// =========================================================================

fn generate_knight_moves(board: &Board, from: Square, knight: Piece, moves: &mut Vec<Move>) {
    let targets = attacks::tables().knight_attacks(from);
    push_leaper_targets(board, from, knight, targets.iter(), moves);
}

fn generate_king_moves(board: &Board, from: Square, king: Piece, moves: &mut Vec<Move>) {
    let targets = attacks::tables().king_attacks(from);
    push_leaper_targets(board, from, king, targets.iter(), moves);
}

/// Empty-or-enemy destinations become moves; friendly ones are skipped.
fn push_leaper_targets(
    board: &Board,
    from: Square,
    piece: Piece,
    targets: impl Iterator<Item = Square>,
    moves: &mut Vec<Move>,
) {
    for to in targets {
        match board.piece_at(to) {
            None => moves.push(Move::new(from, to, piece, None)),
            Some(target) if target.color != piece.color => {
                moves.push(Move::new(from, to, piece, Some(target)))
            }
            Some(_) => {}
        }
    }
}

// =========================================================================
// Slider moves (bishop, rook, queen)
// =========================================================================

fn generate_slider_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in directions {
        let mut cur = from;
        while let Some(to) = cur.offset(df, dr) {
            match board.piece_at(to) {
                None => moves.push(Move::new(from, to, piece, None)),
                Some(target) => {
                    if target.color != piece.color {
                        moves.push(Move::new(from, to, piece, Some(target)));
                    }
                    break;
                }
            }
            cur = to;
        }
    }
}

// =========================================================================
// Castling
// =========================================================================

fn generate_castling_moves(board: &Board, from: Square, king: Piece, moves: &mut Vec<Move>) {
    let us = king.color;
    let them = !us;
    let rank = us.back_rank();
    let rights = board.castling_rights;

    if !rights.can_castle_kingside(us) && !rights.can_castle_queenside(us) {
        return;
    }
    // Rights imply an unmoved king on its home square; a hand-built board
    // may still disagree.
    if from != Square::from_file_rank(4, rank) {
        return;
    }
    // Can't castle out of check.
    if attacks::is_attacked(board, from, them) {
        return;
    }

    let sq = |file: u8| Square::from_file_rank(file, rank);
    let own_rook = |file: u8| board.piece_at(sq(file)) == Some(Piece::new(PieceType::Rook, us));
    let empty = |files: &[u8]| files.iter().all(|&f| board.is_empty(sq(f)));
    let safe = |files: &[u8]| files.iter().all(|&f| !attacks::is_attacked(board, sq(f), them));

    // Kingside: king e→g; f and g must be empty and unattacked.
    if rights.can_castle_kingside(us)
        && own_rook(7)
        && empty(&[5, 6])
        && safe(&[5, 6])
    {
        moves.push(Move::with_flag(from, sq(6), king, None, MoveFlag::CastleKingside));
    }

    // Queenside: king e→c; b, c and d must be empty, only c and d need be safe.
    if rights.can_castle_queenside(us)
        && own_rook(0)
        && empty(&[1, 2, 3])
        && safe(&[2, 3])
    {
        moves.push(Move::with_flag(from, sq(2), king, None, MoveFlag::CastleQueenside));
    }
}

// =========================================================================
// Tests
// =========================================================================
