use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank (0-based) the pieces of this side start on.
    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank direction a pawn of this side advances in.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;

    fn not(self) -> Self {
        if self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// PieceType
// ---------------------------------------------------------------------------

/// The six piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Lowercase FEN letter per kind, in declaration order.
const PIECE_LETTERS: [char; 6] = ['p', 'n', 'b', 'r', 'q', 'k'];

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// The pieces a pawn may promote to, strongest first.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_promotion_target(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let letter = PIECE_LETTERS[self.index()];
        match color {
            Color::White => letter.to_ascii_uppercase(),
            Color::Black => letter,
        }
    }

    /// Inverse of [`PieceType::to_char`]; the case selects the color.
    pub fn from_char(c: char) -> Option<(Color, PieceType)> {
        let lower = c.to_ascii_lowercase();
        let kind = Self::ALL
            .into_iter()
            .find(|kind| PIECE_LETTERS[kind.index()] == lower)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some((color, kind))
    }

    pub const fn name(self) -> &'static str {
        match self {
            PieceType::Pawn => "pawn",
            PieceType::Knight => "knight",
            PieceType::Bishop => "bishop",
            PieceType::Rook => "rook",
            PieceType::Queen => "queen",
            PieceType::King => "king",
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A colored piece. Moving a piece replaces it on the board; it is never
/// mutated in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceType, color: Color) -> Self {
        Piece { kind, color }
    }

    /// FEN letter for this piece.
    #[inline]
    pub fn to_char(self) -> char {
        self.kind.to_char(self.color)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// Board coordinate packed as `rank * 8 + file`, so a1 = 0, h1 = 7 and
/// h8 = 63. The derived order is the board iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Square(pub u8);

impl Square {
    pub const NUM: usize = 64;

    #[inline]
    pub fn file(self) -> u8 {
        self.0 % 8
    }

    #[inline]
    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    #[inline]
    pub fn from_file_rank(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8, "off-board file/rank {file}/{rank}");
        Square(rank * 8 + file)
    }

    /// Square reached by stepping `(df, dr)` files/ranks, or `None` off the board.
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file() as i8 + df;
        let rank = self.rank() as i8 + dr;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::from_file_rank(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// Iterate over all 64 squares, a1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::NUM as u8).map(Square)
    }

    /// Light (`true`) or dark square.
    #[inline]
    pub fn is_light(self) -> bool {
        (self.file() + self.rank()) % 2 == 1
    }

    /// `"e4"` style coordinates; anything else is `None`.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let (Some(file @ 'a'..='h'), Some(rank @ '1'..='8'), None) =
            (chars.next(), chars.next(), chars.next())
        else {
            return None;
        };
        Some(Square::from_file_rank(file as u8 - b'a', rank as u8 - b'1'))
    }

    pub fn to_algebraic(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.file());
        write!(f, "{file}{}", self.rank() + 1)
    }
}

impl std::str::FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| ChessError::InvalidSquare(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Bitboard
// ---------------------------------------------------------------------------

/// A set of squares, one bit per square. Only used for the precomputed
/// leaper attack tables; the board itself is square-centric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    #[inline]
    pub fn contains(self, sq: Square) -> bool {
        (self.0 >> sq.0) & 1 == 1
    }

    #[inline]
    pub fn insert(&mut self, sq: Square) {
        self.0 |= 1 << sq.0;
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Squares in the set, lowest index first.
    #[inline]
    pub fn iter(self) -> BitboardIter {
        BitboardIter(self.0)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut bb = Bitboard::EMPTY;
        for sq in iter {
            bb.insert(sq);
        }
        bb
    }
}

pub struct BitboardIter(u64);

impl Iterator for BitboardIter {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let sq = Square(self.0.trailing_zeros() as u8);
        self.0 &= self.0 - 1;
        Some(sq)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}

// ---------------------------------------------------------------------------
// MoveFlag
// ---------------------------------------------------------------------------

/// What kind of transition a move is. Each `(from, to, flag)` combination is
/// produced by exactly one generation rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveFlag {
    Normal,
    DoublePawnStep,
    EnPassantCapture,
    CastleKingside,
    CastleQueenside,
    PromoteTo(PieceType),
}

impl MoveFlag {
    #[inline]
    pub fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }

    #[inline]
    pub fn promotion(self) -> Option<PieceType> {
        match self {
            MoveFlag::PromoteTo(pt) => Some(pt),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// An immutable record of one transition: which piece goes where, what it
/// takes, and which special rule (if any) applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub flag: MoveFlag,
}

impl Move {
    pub fn new(from: Square, to: Square, piece: Piece, captured: Option<Piece>) -> Self {
        Move {
            from,
            to,
            piece,
            captured,
            flag: MoveFlag::Normal,
        }
    }

    pub fn with_flag(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        flag: MoveFlag,
    ) -> Self {
        Move {
            from,
            to,
            piece,
            captured,
            flag,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceType> {
        self.flag.promotion()
    }

    /// Whether this move resets the fifty-move counter.
    #[inline]
    pub fn is_irreversible(&self) -> bool {
        self.is_capture() || self.piece.kind == PieceType::Pawn
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promo.to_char(Color::Black))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CastlingRights
// ---------------------------------------------------------------------------

/// The four castling flags as a bit set. Flags are only ever cleared during
/// a game; nothing sets one again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 1;
    pub const WHITE_QUEENSIDE: u8 = 2;
    pub const BLACK_KINGSIDE: u8 = 4;
    pub const BLACK_QUEENSIDE: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn remove(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Keep only the rights set in `mask`.
    #[inline]
    pub fn restrict(&mut self, mask: u8) {
        self.0 &= mask;
    }

    #[inline]
    pub fn kingside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    #[inline]
    pub fn queenside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub fn can_castle_kingside(self, color: Color) -> bool {
        self.has(Self::kingside_flag(color))
    }

    #[inline]
    pub fn can_castle_queenside(self, color: Color) -> bool {
        self.has(Self::queenside_flag(color))
    }

    /// Parse the FEN castling field (`"KQkq"`, `"Kq"`, `"-"`, ...).
    pub fn from_fen(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(CastlingRights::NONE);
        }
        if s.is_empty() {
            return None;
        }
        s.chars().try_fold(CastlingRights::NONE, |rights, c| {
            let (_, flag) = FEN_CASTLING.iter().find(|(letter, _)| *letter == c)?;
            Some(CastlingRights(rights.0 | flag))
        })
    }

    /// FEN castling field, `"-"` when no rights remain.
    pub fn to_fen(self) -> String {
        let s: String = FEN_CASTLING
            .iter()
            .filter(|(_, flag)| self.has(*flag))
            .map(|(letter, _)| *letter)
            .collect();
        if s.is_empty() { "-".to_string() } else { s }
    }
}

/// FEN letters of the four rights, in FEN order.
const FEN_CASTLING: [(char, u8); 4] = [
    ('K', CastlingRights::WHITE_KINGSIDE),
    ('Q', CastlingRights::WHITE_QUEENSIDE),
    ('k', CastlingRights::BLACK_KINGSIDE),
    ('q', CastlingRights::BLACK_QUEENSIDE),
];

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

// ---------------------------------------------------------------------------
// MoveInput
// ---------------------------------------------------------------------------

/// A move request in coordinate notation: `e2e4`, or `e7e8q` with a
/// promotion letter. Only the squares are checked here; legality is the
/// game's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveInput {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
}

impl std::str::FromStr for MoveInput {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        let from: Square = s[0..2].parse()?;
        let to: Square = s[2..4].parse()?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceType::from_char(c) {
                Some((_, kind)) if kind.is_promotion_target() => Some(kind),
                _ => return Err(ChessError::InvalidPromotion(c.to_string())),
            },
        };
        Ok(MoveInput {
            from,
            to,
            promotion,
        })
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Classification of the current position. Derived from the board and the
/// game record after every accepted move, never stored independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    /// The given side is to move and its king is attacked.
    InCheck(Color),
    Checkmate {
        winner: Color,
    },
    Stalemate,
    DrawByFiftyMoves,
    DrawByRepetition,
    DrawByInsufficientMaterial,
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::InCheck(_) => "check",
            GameStatus::Checkmate { .. } => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::DrawByFiftyMoves => "fifty_move_rule",
            GameStatus::DrawByRepetition => "threefold_repetition",
            GameStatus::DrawByInsufficientMaterial => "insufficient_material",
        }
    }

    pub fn is_game_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::InCheck(_))
    }

    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::DrawByFiftyMoves
                | GameStatus::DrawByRepetition
                | GameStatus::DrawByInsufficientMaterial
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InCheck(color) => write!(f, "check ({color} to move)"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate ({winner} wins)"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a move attempt was rejected. A rejected attempt never changes the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("it is {to_move}'s turn, but {from} holds a {found} piece")]
    WrongTurn {
        from: Square,
        to_move: Color,
        found: Color,
    },

    #[error("no piece on {0}")]
    NoPieceAtSource(Square),

    #[error("the {piece} on {from} cannot move to {to}")]
    IllegalForPiece {
        from: Square,
        to: Square,
        piece: PieceType,
    },

    #[error("{from} -> {to} would leave the king in check")]
    LeavesKingInCheck { from: Square, to: Square },

    #[error("{from} -> {to} promotes; a promotion piece is required")]
    PromotionRequired { from: Square, to: Square },

    #[error("{from} -> {to} is not a promotion")]
    PromotionNotApplicable { from: Square, to: Square },

    #[error("game is already over: {0}")]
    GameOver(GameStatus),
}

/// Input errors outside move attempts (position and notation parsing).
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid promotion piece: {0}")]
    InvalidPromotion(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
