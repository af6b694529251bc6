//! Standard Algebraic Notation for the move history.
//!
//! Only generation is needed: the game produces SAN for each accepted move.
//! Examples: `e4`, `Nf3`, `Bxe5`, `O-O`, `e8=Q`, `Raxd1`.

use crate::engine::board::Board;
use crate::engine::types::{Color, Move, MoveFlag, PieceType};

/// SAN of `mv`, which must be one of `legal_moves` (all legal moves of the
/// position, used to disambiguate).
///
/// Check and mate suffixes are not added here: they depend on the position
/// after the move, which `Game` appends once it has classified it.
pub fn move_to_san(board: &Board, mv: Move, legal_moves: &[Move]) -> String {
    match mv.flag {
        MoveFlag::CastleKingside => "O-O".to_string(),
        MoveFlag::CastleQueenside => "O-O-O".to_string(),
        _ if mv.piece.kind == PieceType::Pawn => {
            let mut san = String::new();
            if mv.is_capture() {
                san.push(file_char(mv));
                san.push('x');
            }
            san += &mv.to.to_string();
            if let Some(promo) = mv.promotion() {
                san.push('=');
                san.push(promo.to_char(Color::White));
            }
            san
        }
        _ => {
            let capture = if mv.is_capture() { "x" } else { "" };
            format!(
                "{}{}{capture}{}",
                mv.piece.kind.to_char(Color::White),
                disambiguation(board, mv, legal_moves),
                mv.to
            )
        }
    }
}

fn file_char(mv: Move) -> char {
    char::from(b'a' + mv.from.file())
}

/// Origin file, rank or full square, whichever is the shortest that tells
/// `mv` apart from other moves of the same kind of piece to the same square.
fn disambiguation(board: &Board, mv: Move, legal_moves: &[Move]) -> String {
    let rivals: Vec<&Move> = legal_moves
        .iter()
        .filter(|m| {
            m.to == mv.to && m.from != mv.from && board.piece_at(m.from) == Some(mv.piece)
        })
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|m| m.from.file() != mv.from.file()) {
        file_char(mv).to_string()
    } else if rivals.iter().all(|m| m.from.rank() != mv.from.rank()) {
        (mv.from.rank() + 1).to_string()
    } else {
        mv.from.to_string()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::legal::legal_moves;
    use crate::engine::types::Square;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    /// SAN of the legal move `from -> to` (first match, or the given promotion).
    fn san(fen: &str, from: &str, to: &str, promo: Option<PieceType>) -> String {
        let b = Board::from_fen(fen).unwrap();
        let legal = legal_moves(&b, b.side_to_move);
        let mv = *legal
            .iter()
            .find(|m| m.from == sq(from) && m.to == sq(to) && m.promotion() == promo)
            .expect("move should be legal");
        move_to_san(&b, mv, &legal)
    }

    #[test]
    fn san_pawn_push() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(san(fen, "e2", "e4", None), "e4");
        assert_eq!(san(fen, "a2", "a3", None), "a3");
    }

    #[test]
    fn san_pawn_capture() {
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";
        assert_eq!(san(fen, "e4", "d5", None), "exd5");
    }

    #[test]
    fn san_en_passant() {
        let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
        assert_eq!(san(fen, "e5", "f6", None), "exf6");
    }

    #[test]
    fn san_pawn_promotion() {
        let fen = "7k/4P3/8/8/8/8/8/4K3 w - - 0 1";
        assert_eq!(san(fen, "e7", "e8", Some(PieceType::Queen)), "e8=Q");
        assert_eq!(san(fen, "e7", "e8", Some(PieceType::Knight)), "e8=N");
    }

    #[test]
    fn san_knight_move() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(san(fen, "g1", "f3", None), "Nf3");
    }

    #[test]
    fn san_castling() {
        let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";
        assert_eq!(san(fen, "e1", "g1", None), "O-O");
        assert_eq!(san(fen, "e1", "c1", None), "O-O-O");
    }

    #[test]
    fn san_rook_file_disambiguation() {
        // Rooks on a1 and h1 can both reach d1.
        let fen = "4k3/8/8/8/8/8/4K3/R6R w - - 0 1";
        assert_eq!(san(fen, "a1", "d1", None), "Rad1");
        assert_eq!(san(fen, "h1", "f1", None), "Rhf1");
    }

    #[test]
    fn san_rook_rank_disambiguation() {
        // Rooks on a1 and a7 can both reach a4.
        let fen = "4k3/R7/8/8/8/8/8/R3K3 w - - 0 1";
        assert_eq!(san(fen, "a1", "a4", None), "R1a4");
        assert_eq!(san(fen, "a7", "a4", None), "R7a4");
    }

    #[test]
    fn san_knight_disambiguation() {
        // b1 and f1 both reach d2; b1 and b5 both reach c3.
        let fen = "4k3/8/8/1N6/8/8/8/1N2KN2 w - - 0 1";
        assert_eq!(san(fen, "b1", "d2", None), "Nbd2");
        assert_eq!(san(fen, "b1", "c3", None), "N1c3");
        assert_eq!(san(fen, "b5", "c3", None), "N5c3");
    }

    #[test]
    fn san_piece_capture() {
        let fen = "4k3/8/8/3p4/8/1B6/8/4K3 w - - 0 1";
        assert_eq!(san(fen, "b3", "d5", None), "Bxd5");
    }
}
