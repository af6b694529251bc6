//! FEN parsing and generation.
//!
//! A thin layer over `Board`'s public fields: the rules code never depends on
//! it, but tests, the binary and any save/load collaborator do.

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::types::{CastlingRights, ChessError, Color, Piece, PieceType, Square};

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parse a FEN string into a `Board`.
    ///
    /// Validates all 6 fields (piece placement, side to move, castling,
    /// en passant, halfmove clock, fullmove number), ensures exactly one
    /// king per side and rejects positions where the side that just moved
    /// is still in check.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let mut board = Board::empty();

        // ----- Field 1: Piece placement -----
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8; // FEN starts from rank 8
            let mut file: u8 = 0;
            for ch in rank_str.chars() {
                if file > 7 {
                    return Err(ChessError::InvalidFen(format!(
                        "too many squares in rank {}",
                        rank + 1
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {}",
                            rank + 1
                        )));
                    }
                    file += digit as u8;
                } else if let Some((color, kind)) = PieceType::from_char(ch) {
                    board.place(Square::from_file_rank(file, rank), Piece::new(kind, color));
                    file += 1;
                } else {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if file != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has {} squares instead of 8",
                    rank + 1,
                    file
                )));
            }
        }

        for color in [Color::White, Color::Black] {
            let king_count = board.count(color, PieceType::King);
            if king_count != 1 {
                return Err(ChessError::InvalidFen(format!(
                    "{color} has {king_count} kings (expected 1)"
                )));
            }
        }

        // ----- Field 2: Side to move -----
        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid side to move: '{other}'"
                )));
            }
        };

        // ----- Field 3: Castling availability -----
        board.castling_rights = CastlingRights::from_fen(fields[2]).ok_or_else(|| {
            ChessError::InvalidFen(format!("invalid castling string: '{}'", fields[2]))
        })?;

        // ----- Field 4: En passant target square -----
        if fields[3] != "-" {
            let ep_sq = Square::from_algebraic(fields[3]).ok_or_else(|| {
                ChessError::InvalidFen(format!("invalid en passant square: '{}'", fields[3]))
            })?;
            // The target sits behind a pawn of the side that just moved.
            let expected_rank = match board.side_to_move {
                Color::White => 5,
                Color::Black => 2,
            };
            if ep_sq.rank() != expected_rank {
                return Err(ChessError::InvalidFen(format!(
                    "en passant square {} does not match side to move",
                    fields[3]
                )));
            }
            board.en_passant = Some(ep_sq);
        }

        // ----- Field 5: Halfmove clock -----
        board.halfmove_clock = fields[4].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid halfmove clock: '{}'", fields[4]))
        })?;

        // ----- Field 6: Fullmove number -----
        board.fullmove_number = fields[5].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid fullmove number: '{}'", fields[5]))
        })?;
        if board.fullmove_number == 0 {
            return Err(ChessError::InvalidFen(
                "fullmove number must be >= 1".to_string(),
            ));
        }

        // The side not to move may not be in check: its king could be captured.
        let waiting = !board.side_to_move;
        if attacks::is_in_check(&board, waiting) {
            return Err(ChessError::InvalidFen(format!(
                "{waiting} is in check but it is {} to move",
                board.side_to_move
            )));
        }

        Ok(board)
    }

    /// Export the position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(80);

        // ----- Field 1: Piece placement -----
        for rank in (0..8).rev() {
            let mut empty_count = 0u8;
            for file in 0..8 {
                match self.piece_at(Square::from_file_rank(file, rank)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push((b'0' + empty_count) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        // ----- Fields 2-6 -----
        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), Square::to_algebraic);
        fen.push_str(&format!(
            " {side} {} {ep} {} {}",
            self.castling_rights.to_fen(),
            self.halfmove_clock,
            self.fullmove_number
        ));

        fen
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_fen_matches_starting_board() {
        assert_eq!(Board::from_fen(STARTING_FEN).unwrap(), Board::starting());
        assert_eq!(Board::starting().to_fen(), STARTING_FEN);
    }

    #[test]
    fn fen_round_trip() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        ] {
            assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn parses_state_fields() {
        let b = Board::from_fen("4k3/8/8/8/4Pp2/8/8/4K3 b - e3 3 41").unwrap();
        assert_eq!(b.side_to_move, Color::Black);
        assert_eq!(b.castling_rights, CastlingRights::NONE);
        assert_eq!(b.en_passant, Square::from_algebraic("e3"));
        assert_eq!(b.halfmove_clock, 3);
        assert_eq!(b.fullmove_number, 41);
    }

    #[test]
    fn rejects_malformed_fen() {
        for fen in [
            "",
            "invalid",
            "8/8/8/8/8/8/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w X - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - e4 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - e3 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - x 1",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 0",
            "4k3/8/8/8/8/8/8/4K4 w - - 0 1",
            "4k3/8/8/8/8/8/8/4KZ2 w - - 0 1",
        ] {
            assert!(
                matches!(Board::from_fen(fen), Err(ChessError::InvalidFen(_))),
                "accepted {fen:?}"
            );
        }
    }

    #[test]
    fn rejects_wrong_king_count() {
        assert!(Board::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1").is_err());
    }

    #[test]
    fn rejects_side_not_to_move_in_check() {
        // Black is in check from the rook, yet it is White's turn.
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4RK2 w - - 0 1").is_err());
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").is_ok());
    }
}
