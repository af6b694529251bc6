//! Attack detection.
//!
//! `is_attacked` answers "could a piece of this colour capture on that
//! square?" by looking outward from the square with each piece type's attack
//! pattern. It never calls into move generation, so castling legality can
//! use it without recursion.
//!
//! Leaper patterns (knight, king, pawn) come from tables built once via
//! `OnceLock`; sliders are ray-cast over the board with first-blocker
//! semantics.

use std::sync::OnceLock;

use crate::engine::board::Board;
use crate::engine::types::{Bitboard, Color, PieceType, Square};

/// Rook ray directions as (file delta, rank delta).
pub const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Bishop ray directions as (file delta, rank delta).
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

// =========================================================================
// Public API
// =========================================================================

/// Get a reference to the global leaper tables.
pub fn tables() -> &'static AttackTables {
    static TABLES: OnceLock<AttackTables> = OnceLock::new();
    TABLES.get_or_init(AttackTables::init)
}

/// Pre-computed attack sets for the non-sliding pieces.
pub struct AttackTables {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    /// `pawn[color][square]`: squares a pawn of `color` on `square` attacks.
    pawn: [[Bitboard; 64]; 2],
}

impl AttackTables {
    /// Knight attacks from a square.
    #[inline]
    pub fn knight_attacks(&self, sq: Square) -> Bitboard {
        self.knight[sq.0 as usize]
    }

    /// King attacks from a square.
    #[inline]
    pub fn king_attacks(&self, sq: Square) -> Bitboard {
        self.king[sq.0 as usize]
    }

    /// Pawn attack squares for a given colour.
    #[inline]
    pub fn pawn_attacks(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn[color.index()][sq.0 as usize]
    }

    fn init() -> Self {
        AttackTables {
            knight: leaper_table(&KNIGHT_OFFSETS),
            king: leaper_table(&KING_OFFSETS),
            pawn: [
                leaper_table(&[(-1, 1), (1, 1)]),
                leaper_table(&[(-1, -1), (1, -1)]),
            ],
        }
    }
}

/// Is `sq` attacked by any piece of colour `by`?
///
/// The piece on `sq` itself (if any) is irrelevant; only the attackers and
/// the blockers between them and `sq` matter.
pub fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let t = tables();
    let is = |target: Square, kind: PieceType| {
        board
            .piece_at(target)
            .is_some_and(|p| p.color == by && p.kind == kind)
    };

    // Pawns of `by` attacking `sq` stand where a pawn of the other colour on
    // `sq` would attack.
    if t.pawn_attacks(!by, sq).iter().any(|s| is(s, PieceType::Pawn)) {
        return true;
    }

    if t.knight_attacks(sq).iter().any(|s| is(s, PieceType::Knight)) {
        return true;
    }

    if t.king_attacks(sq).iter().any(|s| is(s, PieceType::King)) {
        return true;
    }

    let first_blocker_is = |dirs: &[(i8, i8)], slider: PieceType| {
        dirs.iter().any(|&(df, dr)| {
            first_blocker(board, sq, df, dr).is_some_and(|blocker| {
                board
                    .piece_at(blocker)
                    .is_some_and(|p| p.color == by && (p.kind == slider || p.kind == PieceType::Queen))
            })
        })
    };

    first_blocker_is(&ORTHOGONAL, PieceType::Rook) || first_blocker_is(&DIAGONAL, PieceType::Bishop)
}

/// Is `color`'s king attacked by the other side?
#[inline]
pub fn is_in_check(board: &Board, color: Color) -> bool {
    is_attacked(board, board.king_sq(color), !color)
}

/// Walk from `from` (exclusive) along `(df, dr)` and return the first
/// occupied square, or `None` if the ray leaves the board first.
pub fn first_blocker(board: &Board, from: Square, df: i8, dr: i8) -> Option<Square> {
    let mut cur = from;
    while let Some(next) = cur.offset(df, dr) {
        if !board.is_empty(next) {
            return Some(next);
        }
        cur = next;
    }
    None
}

// =========================================================================
// Initialisation
// =========================================================================

fn leaper_table(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    for sq in Square::all() {
        table[sq.0 as usize] = offsets
            .iter()
            .filter_map(|&(df, dr)| sq.offset(df, dr))
            .collect();
    }
    table
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::Piece;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn pos(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn knight_attacks_corner() {
        let t = tables();
        let a1 = t.knight_attacks(sq("a1"));
        assert_eq!(a1.len(), 2);
        assert!(a1.contains(sq("b3")));
        assert!(a1.contains(sq("c2")));
    }

    #[test]
    fn knight_attacks_center() {
        assert_eq!(tables().knight_attacks(sq("e4")).len(), 8);
    }

    #[test]
    fn king_attacks_counts() {
        let t = tables();
        assert_eq!(t.king_attacks(sq("a1")).len(), 3);
        assert_eq!(t.king_attacks(sq("a4")).len(), 5);
        assert_eq!(t.king_attacks(sq("e4")).len(), 8);
    }

    #[test]
    fn pawn_attack_tables() {
        let t = tables();
        let white_e4 = t.pawn_attacks(Color::White, sq("e4"));
        assert!(white_e4.contains(sq("d5")));
        assert!(white_e4.contains(sq("f5")));
        assert_eq!(white_e4.len(), 2);

        let black_a5 = t.pawn_attacks(Color::Black, sq("a5"));
        assert_eq!(black_a5.len(), 1);
        assert!(black_a5.contains(sq("b4")));

        assert!(t.pawn_attacks(Color::White, sq("e8")).is_empty());
    }

    #[test]
    fn starting_position_attacks() {
        let b = Board::starting();
        // Every third-rank square is covered by White.
        for file in 0..8 {
            assert!(is_attacked(&b, Square::from_file_rank(file, 2), Color::White));
            assert!(is_attacked(&b, Square::from_file_rank(file, 5), Color::Black));
        }
        assert!(!is_attacked(&b, sq("e4"), Color::White));
        assert!(!is_attacked(&b, sq("e5"), Color::Black));
        assert!(!is_in_check(&b, Color::White));
    }

    #[test]
    fn pawn_attacks_only_diagonally_forward() {
        let b = pos("4k3/8/8/8/4p3/8/8/4K3 w - - 0 1");
        assert!(is_attacked(&b, sq("d3"), Color::Black));
        assert!(is_attacked(&b, sq("f3"), Color::Black));
        assert!(!is_attacked(&b, sq("e3"), Color::Black));
        assert!(!is_attacked(&b, sq("d5"), Color::Black));
    }

    #[test]
    fn slider_stops_at_first_blocker() {
        // Rook on a1, own pawn on a4: a5 and beyond are shielded.
        let b = pos("4k3/8/8/8/P7/8/8/R3K3 b - - 0 1");
        assert!(is_attacked(&b, sq("a3"), Color::White));
        assert!(is_attacked(&b, sq("a4"), Color::White));
        assert!(!is_attacked(&b, sq("a5"), Color::White));
        assert!(is_attacked(&b, sq("d1"), Color::White));
    }

    #[test]
    fn queen_attacks_both_ways() {
        let b = pos("4k3/8/8/8/3Q4/8/8/4K3 b - - 0 1");
        assert!(is_attacked(&b, sq("d8"), Color::White));
        assert!(is_attacked(&b, sq("h8"), Color::White));
        assert!(is_attacked(&b, sq("a1"), Color::White));
        assert!(!is_attacked(&b, sq("e6"), Color::White));
    }

    #[test]
    fn bishop_does_not_attack_orthogonally() {
        let b = pos("4k3/8/8/8/3B4/8/8/4K3 b - - 0 1");
        assert!(!is_attacked(&b, sq("d8"), Color::White));
        assert!(is_attacked(&b, sq("g7"), Color::White));
    }

    #[test]
    fn check_detection() {
        let b = pos("4k3/8/8/8/8/8/8/4K2r w - - 0 1");
        assert!(is_in_check(&b, Color::White));
        assert!(!is_in_check(&b, Color::Black));
    }

    #[test]
    fn attack_ignores_occupant_of_target() {
        let mut b = pos("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        b.place(sq("a7"), Piece::new(PieceType::Knight, Color::White));
        assert!(is_attacked(&b, sq("a7"), Color::White));
    }

    #[test]
    fn first_blocker_walks_ray() {
        let b = Board::starting();
        assert_eq!(first_blocker(&b, sq("e4"), 0, 1), Some(sq("e7")));
        assert_eq!(first_blocker(&b, sq("a4"), -1, 0), None);
    }
}
