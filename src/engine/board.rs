//! Square-centric chess board state.
//!
//! `Board` stores one optional `Piece` per square plus side to move, castling
//! rights, en-passant target and move counters. It knows nothing about which
//! moves are legal: `make_move` applies whatever it is given. Legality lives
//! in `movegen`, `attacks` and `legal`.

use crate::engine::types::{CastlingRights, Color, Move, MoveFlag, Piece, PieceType, Square};

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A complete chess position as a value. Cloning yields a fully independent
/// snapshot, including castling rights and the en-passant target.
///
/// Square layout follows LERF (Little-Endian Rank-File) mapping:
/// a1 = 0, b1 = 1, … h1 = 7, a2 = 8, … h8 = 63.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; Square::NUM],

    /// Whose turn it is.
    pub side_to_move: Color,

    /// Castling availability (K/Q/k/q).
    pub castling_rights: CastlingRights,

    /// En-passant target square (the square *behind* the double-pushed pawn).
    /// Only set on the ply right after a double pawn step.
    pub en_passant: Option<Square>,

    /// Plies since the last capture or pawn move (fifty-move rule).
    pub halfmove_clock: u16,

    /// Starts at 1, incremented after Black moves.
    pub fullmove_number: u16,
}

/// Everything that makes two positions "the same" for repetition purposes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey {
    squares: [Option<Piece>; Square::NUM],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
}

// ---------------------------------------------------------------------------
// Construction helpers
// ---------------------------------------------------------------------------

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

impl Board {
    /// Create an empty board with no pieces.
    pub fn empty() -> Self {
        Board {
            squares: [None; Square::NUM],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        let mut board = Board::empty();
        for color in [Color::White, Color::Black] {
            let back = color.back_rank();
            let pawns = (back as i8 + color.forward()) as u8;
            for (file, &kind) in BACK_RANK.iter().enumerate() {
                let file = file as u8;
                board.place(Square::from_file_rank(file, back), Piece::new(kind, color));
                board.place(
                    Square::from_file_rank(file, pawns),
                    Piece::new(PieceType::Pawn, color),
                );
            }
        }
        board.castling_rights = CastlingRights::ALL;
        board
    }

    // -----------------------------------------------------------------------
    // Piece manipulation (low-level, no rule checks)
    // -----------------------------------------------------------------------

    /// Put `piece` on `sq`, replacing whatever was there.
    #[inline]
    pub fn place(&mut self, sq: Square, piece: Piece) {
        self.squares[sq.0 as usize] = Some(piece);
    }

    /// Clear `sq`, returning the piece that stood there.
    #[inline]
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.0 as usize].take()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.0 as usize]
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.squares[sq.0 as usize].is_none()
    }

    /// Every occupied square with its piece, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (Square(i as u8), p)))
    }

    /// Occupied squares of one color, a1 first.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Find the king square for the given colour, if there is exactly one king.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        let mut kings = self
            .pieces_of(color)
            .filter(|(_, p)| p.kind == PieceType::King)
            .map(|(sq, _)| sq);
        match (kings.next(), kings.next()) {
            (Some(sq), None) => Some(sq),
            _ => None,
        }
    }

    /// King square for the given colour.
    ///
    /// Panics if the one-king-per-color invariant is broken; that can only
    /// happen through a defect in move application or direct `place`/`remove`
    /// misuse.
    #[inline]
    pub fn king_sq(&self, color: Color) -> Square {
        self.find_king(color).expect("king must exist")
    }

    /// Count pieces of a color and kind.
    pub fn count(&self, color: Color, kind: PieceType) -> usize {
        self.pieces_of(color).filter(|(_, p)| p.kind == kind).count()
    }

    /// Snapshot of the fields that decide position identity.
    ///
    /// `en_passant` is passed in explicitly: callers decide whether the stored
    /// target counts (it only does when the capture is actually available).
    pub fn position_key(&self, en_passant: Option<Square>) -> PositionKey {
        PositionKey {
            squares: self.squares,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant,
        }
    }

    // -----------------------------------------------------------------------
    // Move application
    // -----------------------------------------------------------------------

    /// Apply a move to the board in place.
    ///
    /// The caller is responsible for ensuring the move is at least
    /// pseudo-legal. Handles every side effect: en-passant victim removal,
    /// rook relocation on castling, promotion, castling-right loss, the
    /// en-passant target, both move counters and the side flip.
    pub fn make_move(&mut self, mv: Move) {
        let us = mv.piece.color;

        self.remove(mv.from);
        match mv.flag {
            MoveFlag::EnPassantCapture => {
                let victim = Square::from_file_rank(mv.to.file(), mv.from.rank());
                self.remove(victim);
                self.place(mv.to, mv.piece);
            }
            MoveFlag::CastleKingside | MoveFlag::CastleQueenside => {
                let (rook_from, rook_to) = castling_rook_squares(mv.to);
                let rook = self.remove(rook_from);
                debug_assert_eq!(rook, Some(Piece::new(PieceType::Rook, us)));
                self.place(rook_to, Piece::new(PieceType::Rook, us));
                self.place(mv.to, mv.piece);
            }
            MoveFlag::PromoteTo(kind) => {
                self.place(mv.to, Piece::new(kind, us));
            }
            MoveFlag::Normal | MoveFlag::DoublePawnStep => {
                self.place(mv.to, mv.piece);
            }
        }

        // Touching a king or rook home square (moving from it or capturing
        // on it) permanently drops the matching rights.
        self.castling_rights
            .restrict(CASTLING_MASK[mv.from.0 as usize] & CASTLING_MASK[mv.to.0 as usize]);

        self.en_passant = match mv.flag {
            MoveFlag::DoublePawnStep => Some(Square::from_file_rank(
                mv.from.file(),
                (mv.from.rank() + mv.to.rank()) / 2,
            )),
            _ => None,
        };

        if mv.is_irreversible() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = !us;

        #[cfg(debug_assertions)]
        self.assert_kings();
    }

    /// Pure application: returns the successor position, leaving `self` intact.
    pub fn apply(&self, mv: Move) -> Board {
        let mut next = self.clone();
        next.make_move(mv);
        next
    }

    /// Verify the one-king-per-color invariant.
    #[cfg(any(debug_assertions, test))]
    pub fn assert_kings(&self) {
        for color in [Color::White, Color::Black] {
            let kings = self.count(color, PieceType::King);
            assert_eq!(kings, 1, "{color} has {kings} kings (expected 1)");
        }
    }

    // -----------------------------------------------------------------------
    // Text rendering
    // -----------------------------------------------------------------------

    /// Board as text, rank 8 on top, FEN letters for pieces.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for rank in (0..8u8).rev() {
            s.push((b'1' + rank) as char);
            s.push(' ');
            for file in 0..8u8 {
                let sq = Square::from_file_rank(file, rank);
                s.push(' ');
                s.push(self.piece_at(sq).map_or('.', Piece::to_char));
            }
            s.push('\n');
        }
        s.push_str("   a b c d e f g h\n");
        s
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

// ---------------------------------------------------------------------------
// Castling helpers (free functions)
// ---------------------------------------------------------------------------

/// For a king-destination square (after castling), return (rook_from, rook_to).
pub(crate) fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    match king_to.0 {
        // White kingside: king e1→g1, rook h1→f1.
        6 => (Square(7), Square(5)),
        // White queenside: king e1→c1, rook a1→d1.
        2 => (Square(0), Square(3)),
        // Black kingside: king e8→g8, rook h8→f8.
        62 => (Square(63), Square(61)),
        // Black queenside: king e8→c8, rook a8→d8.
        58 => (Square(56), Square(59)),
        _ => panic!("invalid castling king destination: {king_to}"),
    }
}

/// Mask table indexed by square index. When a move touches a square, AND the
/// castling rights with this mask. E.g. if a rook on a1 moves (or is captured),
/// remove White-queenside. The king's home square removes both that side's rights.
#[rustfmt::skip]
const CASTLING_MASK: [u8; 64] = {
    let mut mask = [0b1111u8; 64];
    mask[0]  = 0b1111 & !CastlingRights::WHITE_QUEENSIDE;
    mask[4]  = 0b1111 & !(CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE);
    mask[7]  = 0b1111 & !CastlingRights::WHITE_KINGSIDE;
    mask[56] = 0b1111 & !CastlingRights::BLACK_QUEENSIDE;
    mask[60] = 0b1111 & !(CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE);
    mask[63] = 0b1111 & !CastlingRights::BLACK_KINGSIDE;
    mask
};

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn white(kind: PieceType) -> Piece {
        Piece::new(kind, Color::White)
    }

    fn black(kind: PieceType) -> Piece {
        Piece::new(kind, Color::Black)
    }

    fn kings_only() -> Board {
        let mut b = Board::empty();
        b.place(sq("e1"), white(PieceType::King));
        b.place(sq("e8"), black(PieceType::King));
        b
    }

    #[test]
    fn starting_position_layout() {
        let b = Board::starting();
        assert_eq!(b.piece_at(sq("e1")), Some(white(PieceType::King)));
        assert_eq!(b.piece_at(sq("d8")), Some(black(PieceType::Queen)));
        assert_eq!(b.piece_at(sq("a2")), Some(white(PieceType::Pawn)));
        assert_eq!(b.piece_at(sq("h7")), Some(black(PieceType::Pawn)));
        assert_eq!(b.piece_at(sq("e4")), None);
        assert_eq!(b.pieces().count(), 32);
        assert_eq!(b.side_to_move, Color::White);
        assert_eq!(b.castling_rights, CastlingRights::ALL);
        assert_eq!(b.en_passant, None);
        assert_eq!(b.halfmove_clock, 0);
        assert_eq!(b.fullmove_number, 1);
    }

    #[test]
    fn starting_position_is_deterministic() {
        assert_eq!(Board::starting(), Board::starting());
    }

    #[test]
    fn place_and_remove() {
        let mut b = Board::empty();
        let knight = white(PieceType::Knight);
        b.place(sq("c3"), knight);
        assert_eq!(b.piece_at(sq("c3")), Some(knight));
        assert_eq!(b.remove(sq("c3")), Some(knight));
        assert!(b.is_empty(sq("c3")));
        assert_eq!(b.remove(sq("c3")), None);
    }

    #[test]
    fn clone_is_independent() {
        let original = Board::starting();
        let mut copy = original.clone();
        copy.remove(sq("e2"));
        copy.castling_rights = CastlingRights::NONE;
        assert_eq!(original.piece_at(sq("e2")), Some(white(PieceType::Pawn)));
        assert_eq!(original.castling_rights, CastlingRights::ALL);
    }

    #[test]
    fn find_king() {
        let b = Board::starting();
        assert_eq!(b.king_sq(Color::White), sq("e1"));
        assert_eq!(b.king_sq(Color::Black), sq("e8"));
        assert_eq!(Board::empty().find_king(Color::White), None);
    }

    #[test]
    #[should_panic(expected = "king must exist")]
    fn missing_king_panics() {
        Board::empty().king_sq(Color::Black);
    }

    #[test]
    fn double_step_sets_en_passant_target() {
        let b = Board::starting();
        let mv = Move::with_flag(
            sq("e2"),
            sq("e4"),
            white(PieceType::Pawn),
            None,
            MoveFlag::DoublePawnStep,
        );
        let next = b.apply(mv);
        assert_eq!(next.en_passant, Some(sq("e3")));
        assert_eq!(next.side_to_move, Color::Black);
        assert_eq!(next.halfmove_clock, 0);
        assert_eq!(next.fullmove_number, 1);
        // Pure: the source board is untouched.
        assert_eq!(b, Board::starting());

        let reply = next.apply(Move::new(
            sq("g8"),
            sq("f6"),
            black(PieceType::Knight),
            None,
        ));
        assert_eq!(reply.en_passant, None);
        assert_eq!(reply.halfmove_clock, 1);
        assert_eq!(reply.fullmove_number, 2);
    }

    #[test]
    fn black_double_step_target() {
        let mut b = kings_only();
        b.place(sq("d7"), black(PieceType::Pawn));
        b.side_to_move = Color::Black;
        b.make_move(Move::with_flag(
            sq("d7"),
            sq("d5"),
            black(PieceType::Pawn),
            None,
            MoveFlag::DoublePawnStep,
        ));
        assert_eq!(b.en_passant, Some(sq("d6")));
    }

    #[test]
    fn en_passant_removes_passed_pawn() {
        let mut b = kings_only();
        b.place(sq("e5"), white(PieceType::Pawn));
        b.place(sq("d5"), black(PieceType::Pawn));
        b.en_passant = Some(sq("d6"));
        b.make_move(Move::with_flag(
            sq("e5"),
            sq("d6"),
            white(PieceType::Pawn),
            Some(black(PieceType::Pawn)),
            MoveFlag::EnPassantCapture,
        ));
        assert_eq!(b.piece_at(sq("d6")), Some(white(PieceType::Pawn)));
        assert_eq!(b.piece_at(sq("d5")), None);
        assert_eq!(b.piece_at(sq("e5")), None);
        assert_eq!(b.en_passant, None);
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let mut b = kings_only();
        b.place(sq("h1"), white(PieceType::Rook));
        b.place(sq("a1"), white(PieceType::Rook));
        b.castling_rights = CastlingRights::ALL;
        b.make_move(Move::with_flag(
            sq("e1"),
            sq("g1"),
            white(PieceType::King),
            None,
            MoveFlag::CastleKingside,
        ));
        assert_eq!(b.piece_at(sq("g1")), Some(white(PieceType::King)));
        assert_eq!(b.piece_at(sq("f1")), Some(white(PieceType::Rook)));
        assert_eq!(b.piece_at(sq("h1")), None);
        assert!(!b.castling_rights.can_castle_kingside(Color::White));
        assert!(!b.castling_rights.can_castle_queenside(Color::White));
        assert!(b.castling_rights.can_castle_kingside(Color::Black));
    }

    #[test]
    fn queenside_castling_moves_rook() {
        let mut b = kings_only();
        b.place(sq("a8"), black(PieceType::Rook));
        b.castling_rights = CastlingRights::ALL;
        b.side_to_move = Color::Black;
        b.make_move(Move::with_flag(
            sq("e8"),
            sq("c8"),
            black(PieceType::King),
            None,
            MoveFlag::CastleQueenside,
        ));
        assert_eq!(b.piece_at(sq("c8")), Some(black(PieceType::King)));
        assert_eq!(b.piece_at(sq("d8")), Some(black(PieceType::Rook)));
        assert_eq!(b.castling_rights.to_fen(), "KQ");
    }

    #[test]
    fn capturing_rook_clears_opponent_right() {
        let mut b = kings_only();
        b.place(sq("h8"), black(PieceType::Rook));
        b.place(sq("h1"), white(PieceType::Rook));
        b.castling_rights = CastlingRights::ALL;
        b.make_move(Move::new(
            sq("h1"),
            sq("h8"),
            white(PieceType::Rook),
            Some(black(PieceType::Rook)),
        ));
        assert!(!b.castling_rights.can_castle_kingside(Color::White));
        assert!(!b.castling_rights.can_castle_kingside(Color::Black));
        assert!(b.castling_rights.can_castle_queenside(Color::Black));
        assert_eq!(b.halfmove_clock, 0);
    }

    #[test]
    fn promotion_replaces_pawn() {
        let mut b = kings_only();
        b.place(sq("a7"), white(PieceType::Pawn));
        b.make_move(Move::with_flag(
            sq("a7"),
            sq("a8"),
            white(PieceType::Pawn),
            None,
            MoveFlag::PromoteTo(PieceType::Knight),
        ));
        assert_eq!(b.piece_at(sq("a8")), Some(white(PieceType::Knight)));
        assert_eq!(b.piece_at(sq("a7")), None);
    }

    #[test]
    fn position_key_ignores_counters() {
        let mut a = Board::starting();
        let b = Board::starting();
        a.halfmove_clock = 7;
        a.fullmove_number = 12;
        assert_eq!(a.position_key(None), b.position_key(None));
        assert_ne!(a.position_key(Some(sq("e3"))), b.position_key(None));
    }

    #[test]
    fn board_string_layout() {
        let s = Board::starting().board_string();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[7], "1  R N B Q K B N R");
        assert_eq!(lines[8], "   a b c d e f g h");
    }
}
